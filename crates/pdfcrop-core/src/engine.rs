//! Boundary to the external PDF processing module
//!
//! The module owns all byte-level PDF work. The front end only ever calls
//! these four entry points.

use crate::error::CropError;
use crate::geometry::PageBoundingBox;
use crate::options::CropOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Page size in PDF points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageDimensions {
    pub width: f64,
    pub height: f64,
}

/// External crop/detect service. Page arguments are zero-based.
#[allow(async_fn_in_trait)]
pub trait CropEngine {
    async fn page_count(&self, pdf: &[u8]) -> Result<usize, CropError>;

    async fn page_dimensions(&self, pdf: &[u8], page: usize) -> Result<PageDimensions, CropError>;

    /// Bounding box of the visible content on a page
    async fn detect_bbox(&self, pdf: &[u8], page: usize) -> Result<PageBoundingBox, CropError>;

    /// Crop the document. `boxes: None` lets the module pick boxes itself,
    /// `pages: None` means every page.
    async fn crop_pdf(
        &self,
        pdf: &[u8],
        options: &CropOptions,
        boxes: Option<&BTreeMap<usize, PageBoundingBox>>,
        pages: Option<&[usize]>,
    ) -> Result<Vec<u8>, CropError>;
}
