//! PDF crop front-end core
//!
//! Browser-independent logic of the cropping UI: coordinate mapping between
//! the rendered canvas and PDF page space, the rectangle selection overlay,
//! per-page crop boxes, page range parsing, and the controller that drives
//! the page viewer and the external PDF processing module.
//!
//! The browser specifics sit behind three traits:
//! - [`CropEngine`]: the external crop/detect module
//! - [`DocumentViewer`]: the page rendering library
//! - [`OverlaySurface`]: the canvas the selection is drawn on

pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod filename;
pub mod geometry;
pub mod options;
pub mod overlay;
pub mod page_ranges;
pub mod selections;
pub mod transform;
pub mod validation;
pub mod viewer;
pub mod zoom;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::{AppConfig, ElementIds};
pub use controller::{CropController, CropOutput};
pub use engine::{CropEngine, PageDimensions};
pub use error::CropError;
pub use filename::{cropped_file_name, PDF_MIME_TYPE};
pub use geometry::{DevicePoint, DeviceRectangle, PageBoundingBox};
pub use options::{CropOptions, Margins};
pub use overlay::{GestureState, OverlaySurface, RectangleStyle, SelectionEvent, SelectionOverlay};
pub use page_ranges::{parse_page_range, select_pages, validate_page_range};
pub use selections::PageSelections;
pub use transform::{CoordinateMapper, PageTransform};
pub use validation::{quick_validate, validate_pdf, PdfInfo};
pub use viewer::{DocumentViewer, Viewport};
pub use zoom::{thumbnail_scale, ZoomState};
