/// MIME type of the downloaded result
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Download name for a cropped document: `<original-basename>-crop.pdf`
pub fn cropped_file_name(original: &str) -> String {
    let name = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original)
        .trim();

    let base = match name.len().checked_sub(4) {
        Some(split)
            if name.is_char_boundary(split) && name[split..].eq_ignore_ascii_case(".pdf") =>
        {
            &name[..split]
        }
        _ => name,
    };

    if base.is_empty() {
        "document-crop.pdf".to_string()
    } else {
        format!("{}-crop.pdf", base)
    }
}
