//! Upload validation and document info
//!
//! Runs before the bytes are handed to the viewer so that obviously broken
//! uploads get a clear message instead of a renderer failure.

use crate::error::CropError;
use lopdf::Document;
use serde::Serialize;
use tracing::{debug, warn};

/// Information about an uploaded PDF
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PdfInfo {
    pub page_count: usize,
    /// Header version string (e.g., "1.7")
    pub version: String,
    pub encrypted: bool,
    pub size_bytes: usize,
    pub title: Option<String>,
}

/// Cheap header check, no parsing
pub fn quick_validate(bytes: &[u8]) -> Result<(), CropError> {
    if bytes.len() < 8 {
        return Err(CropError::InvalidPdf(
            "File too small to be a valid PDF".to_string(),
        ));
    }

    if !bytes.starts_with(b"%PDF-") {
        return Err(CropError::InvalidPdf(
            "Not a PDF file (missing %PDF- header)".to_string(),
        ));
    }

    Ok(())
}

/// Validate a PDF upload and extract basic info
pub fn validate_pdf(bytes: &[u8]) -> Result<PdfInfo, CropError> {
    quick_validate(bytes)?;

    let version = extract_version(bytes);

    let document = Document::load_mem(bytes)
        .map_err(|e| CropError::InvalidPdf(format!("Failed to parse PDF: {}", e)))?;

    let encrypted = document.is_encrypted();
    if encrypted {
        warn!("Uploaded PDF is encrypted; cropping may fail");
    }

    let page_count = document.get_pages().len();
    if page_count == 0 {
        return Err(CropError::InvalidPdf("PDF has no pages".to_string()));
    }

    let title = extract_title(&document);
    debug!(page_count, %version, encrypted, "validated upload");

    Ok(PdfInfo {
        page_count,
        version,
        encrypted,
        size_bytes: bytes.len(),
        title,
    })
}

fn extract_version(bytes: &[u8]) -> String {
    // Header format: %PDF-1.7
    bytes
        .get(5..8)
        .and_then(|v| std::str::from_utf8(v).ok())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| "1.4".to_string())
}

fn extract_title(document: &Document) -> Option<String> {
    let info_id = document.trailer.get(b"Info").ok()?.as_reference().ok()?;
    let info = document.get_object(info_id).ok()?.as_dict().ok()?;
    let title = info.get(b"Title").ok()?.as_str().ok()?;
    let decoded = String::from_utf8_lossy(title).trim().to_string();
    if decoded.is_empty() {
        None
    } else {
        Some(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_test_pdf, FixturePdf};

    #[test]
    fn test_quick_validate_rejects_non_pdf() {
        assert!(matches!(
            quick_validate(b"not a pdf file"),
            Err(CropError::InvalidPdf(_))
        ));
    }

    #[test]
    fn test_quick_validate_rejects_small_file() {
        assert!(quick_validate(b"tiny").is_err());
    }

    #[test]
    fn test_validate_pdf_page_count() {
        let pdf = create_test_pdf(5);
        let info = validate_pdf(&pdf).unwrap();
        assert_eq!(info.page_count, 5);
        assert_eq!(info.version, "1.7");
        assert!(!info.encrypted);
        assert_eq!(info.size_bytes, pdf.len());
        assert_eq!(info.title, None);
    }

    #[test]
    fn test_validate_pdf_rejects_truncated_body() {
        let result = validate_pdf(b"%PDF-1.7\nthis is not really a pdf");
        assert!(matches!(result, Err(CropError::InvalidPdf(_))));
    }

    #[test]
    fn test_title_is_extracted() {
        let bytes = FixturePdf::new(1).title("Quarterly Report").build();
        let info = validate_pdf(&bytes).unwrap();
        assert_eq!(info.title.as_deref(), Some("Quarterly Report"));
    }

    #[test]
    fn test_blank_title_is_ignored() {
        let bytes = FixturePdf::new(2).page_size(595, 842).title("   ").build();
        let info = validate_pdf(&bytes).unwrap();
        assert_eq!(info.page_count, 2);
        assert_eq!(info.title, None);
    }

    #[test]
    fn test_extract_version() {
        assert_eq!(extract_version(b"%PDF-1.7\n"), "1.7");
        assert_eq!(extract_version(b"%PDF-2.0\n"), "2.0");
    }
}
