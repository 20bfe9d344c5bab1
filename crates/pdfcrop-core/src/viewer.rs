//! Boundary to the page rendering library

use crate::error::CropError;
use serde::{Deserialize, Serialize};

/// Rendered page size in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Loads a document and draws its pages onto the main page surface.
/// Page arguments are zero-based.
#[allow(async_fn_in_trait)]
pub trait DocumentViewer {
    /// Load document bytes and return the page count
    async fn load(&mut self, pdf: &[u8]) -> Result<usize, CropError>;

    /// Size of a page at the given scale, without drawing it
    async fn viewport(&self, page: usize, scale: f64) -> Result<Viewport, CropError>;

    /// Draw a page and return the size it was drawn at
    async fn render(&mut self, page: usize, scale: f64) -> Result<Viewport, CropError>;
}
