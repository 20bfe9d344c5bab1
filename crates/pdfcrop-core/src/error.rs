use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CropError {
    #[error("No active page: render a page before selecting")]
    NoActivePage,

    #[error("No document loaded")]
    NoDocument,

    #[error("Invalid page number: {page} (document has {count} pages)")]
    InvalidPage { page: usize, count: usize },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid PDF: {0}")]
    InvalidPdf(String),

    #[error("Invalid margin value: {0}")]
    InvalidMargin(String),

    #[error("Page range selects no pages: {0}")]
    EmptyPageRange(String),

    #[error("No content detected on page {0}")]
    EmptyDetection(usize),

    #[error("PDF processing failed: {0}")]
    Engine(String),

    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing page element: #{0}")]
    MissingElement(String),

    #[error("Browser error: {0}")]
    Browser(String),
}

impl CropError {
    /// Page number shown to the user is 1-based; `page` here is the zero-based index.
    pub fn invalid_page(index: usize, count: usize) -> Self {
        CropError::InvalidPage {
            page: index + 1,
            count,
        }
    }
}
