//! Application controller
//!
//! Holds the loaded document, the current page, zoom, per-page crop boxes and
//! the selection overlay, and drives the viewer and the processing engine.
//! The browser layer owns DOM events and forwards them here.

use crate::config::AppConfig;
use crate::engine::CropEngine;
use crate::error::CropError;
use crate::filename::{cropped_file_name, PDF_MIME_TYPE};
use crate::geometry::{DevicePoint, PageBoundingBox};
use crate::options::CropOptions;
use crate::overlay::{OverlaySurface, SelectionEvent, SelectionOverlay};
use crate::page_ranges::select_pages;
use crate::selections::PageSelections;
use crate::transform::PageTransform;
use crate::validation::{validate_pdf, PdfInfo};
use crate::viewer::DocumentViewer;
use crate::zoom::ZoomState;
use tracing::{debug, info, warn};

struct LoadedDocument {
    name: String,
    bytes: Vec<u8>,
    page_count: usize,
}

/// Result of a crop, ready to be offered as a download
#[derive(Debug, Clone, PartialEq)]
pub struct CropOutput {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: &'static str,
}

pub struct CropController<E, V, S> {
    engine: E,
    viewer: V,
    surface: S,
    config: AppConfig,
    document: Option<LoadedDocument>,
    current_page: usize,
    zoom: ZoomState,
    overlay: SelectionOverlay,
    selections: PageSelections,
}

impl<E, V, S> CropController<E, V, S>
where
    E: CropEngine,
    V: DocumentViewer,
    S: OverlaySurface,
{
    pub fn new(engine: E, viewer: V, surface: S, config: AppConfig) -> Self {
        Self {
            engine,
            viewer,
            surface,
            zoom: ZoomState::from_config(&config),
            overlay: SelectionOverlay::new(config.handle_size),
            config,
            document: None,
            current_page: 0,
            selections: PageSelections::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    pub fn document_name(&self) -> Option<&str> {
        self.document.as_ref().map(|d| d.name.as_str())
    }

    pub fn page_count(&self) -> usize {
        self.document.as_ref().map_or(0, |d| d.page_count)
    }

    /// Zero-based index of the page on screen
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn zoom(&self) -> &ZoomState {
        &self.zoom
    }

    pub fn selections(&self) -> &PageSelections {
        &self.selections
    }

    pub fn overlay(&self) -> &SelectionOverlay {
        &self.overlay
    }

    /// Load a new document and show its first page.
    ///
    /// Stored crop boxes are dropped only once the new document is on screen.
    /// If anything fails after the viewer has been touched, the previous
    /// document is loaded back in.
    pub async fn load_document(
        &mut self,
        name: &str,
        bytes: Vec<u8>,
    ) -> Result<PdfInfo, CropError> {
        info!(name, size = bytes.len(), "loading document");
        let info = validate_pdf(&bytes)?;

        let previous = self.document.take();
        let previous_page = self.current_page;
        let previous_zoom = self.zoom;
        self.overlay.deactivate(&mut self.surface);

        match self.open(name, bytes).await {
            Ok(()) => {
                // show_page may have drawn a box left over from the old document
                self.selections.clear();
                self.overlay.set_selection(None, &mut self.surface)?;
                info!(name, pages = self.page_count(), "document ready");
                Ok(info)
            }
            Err(err) => {
                warn!(name, error = %err, "load failed, restoring previous document");
                self.document = None;
                self.zoom = previous_zoom;
                if let Some(previous) = previous {
                    self.restore(previous, previous_page).await;
                }
                Err(err)
            }
        }
    }

    async fn open(&mut self, name: &str, bytes: Vec<u8>) -> Result<(), CropError> {
        let page_count = self.viewer.load(&bytes).await?;
        if page_count == 0 {
            return Err(CropError::InvalidPdf("PDF has no pages".to_string()));
        }

        // Fail now rather than after the user has drawn boxes
        let engine_pages = self.engine.page_count(&bytes).await?;
        if engine_pages != page_count {
            warn!(
                viewer = page_count,
                engine = engine_pages,
                "page count mismatch between viewer and processing module"
            );
        }

        self.document = Some(LoadedDocument {
            name: name.to_string(),
            bytes,
            page_count,
        });
        self.zoom.reset();
        self.show_page(0).await
    }

    async fn restore(&mut self, previous: LoadedDocument, page: usize) {
        if let Err(err) = self.viewer.load(&previous.bytes).await {
            warn!(error = %err, "could not reload previous document");
            return;
        }
        self.document = Some(previous);
        if let Err(err) = self.show_page(page).await {
            warn!(error = %err, "could not re-render previous page");
        }
    }

    async fn show_page(&mut self, index: usize) -> Result<(), CropError> {
        let page_count = self.page_count();
        if self.document.is_none() {
            return Err(CropError::NoDocument);
        }
        if index >= page_count {
            return Err(CropError::invalid_page(index, page_count));
        }

        let scale = self.zoom.scale();
        let viewport = self.viewer.render(index, scale).await?;
        let transform = PageTransform::from_viewport(scale, viewport.width, viewport.height)?;

        self.current_page = index;
        self.overlay.activate(index, transform, &mut self.surface);
        if let Some(bbox) = self.selections.get(index) {
            self.overlay.set_selection(Some(bbox), &mut self.surface)?;
        }
        debug!(page = index + 1, scale, "page rendered");
        Ok(())
    }

    /// Show a page by zero-based index, restoring its crop box if it has one
    pub async fn go_to_page(&mut self, index: usize) -> Result<(), CropError> {
        self.show_page(index).await
    }

    /// Returns false when already on the last page
    pub async fn next_page(&mut self) -> Result<bool, CropError> {
        if self.current_page + 1 >= self.page_count() {
            return Ok(false);
        }
        self.show_page(self.current_page + 1).await?;
        Ok(true)
    }

    /// Returns false when already on the first page
    pub async fn previous_page(&mut self) -> Result<bool, CropError> {
        if self.current_page == 0 || !self.is_loaded() {
            return Ok(false);
        }
        self.show_page(self.current_page - 1).await?;
        Ok(true)
    }

    pub async fn zoom_in(&mut self) -> Result<bool, CropError> {
        let changed = self.zoom.zoom_in();
        self.apply_zoom(changed).await
    }

    pub async fn zoom_out(&mut self) -> Result<bool, CropError> {
        let changed = self.zoom.zoom_out();
        self.apply_zoom(changed).await
    }

    pub async fn reset_zoom(&mut self) -> Result<bool, CropError> {
        let changed = self.zoom.reset();
        self.apply_zoom(changed).await
    }

    pub async fn set_zoom(&mut self, scale: f64) -> Result<bool, CropError> {
        let changed = self.zoom.set(scale);
        self.apply_zoom(changed).await
    }

    /// Fit the current page to a container `container_width` pixels wide
    pub async fn fit_width(&mut self, container_width: f64) -> Result<bool, CropError> {
        let document = self.document.as_ref().ok_or(CropError::NoDocument)?;
        let dimensions = self
            .engine
            .page_dimensions(&document.bytes, self.current_page)
            .await?;
        let changed = self.zoom.fit_width(container_width, dimensions.width);
        self.apply_zoom(changed).await
    }

    async fn apply_zoom(&mut self, changed: bool) -> Result<bool, CropError> {
        if !changed || !self.is_loaded() {
            return Ok(changed);
        }

        let scale = self.zoom.scale();
        let viewport = self.viewer.render(self.current_page, scale).await?;
        let transform = PageTransform::from_viewport(scale, viewport.width, viewport.height)?;
        self.overlay.rescale(transform, &mut self.surface);
        debug!(scale, "zoom applied");
        Ok(true)
    }

    pub fn pointer_down(&mut self, point: DevicePoint) -> Result<(), CropError> {
        self.overlay.pointer_down(point, &mut self.surface)
    }

    pub fn pointer_move(
        &mut self,
        point: DevicePoint,
    ) -> Result<Option<SelectionEvent>, CropError> {
        self.overlay.pointer_move(point, &mut self.surface)
    }

    /// Finish a drag. A zero-area result clears the page's crop box.
    pub fn pointer_up(
        &mut self,
        point: DevicePoint,
    ) -> Result<Option<SelectionEvent>, CropError> {
        let event = self.overlay.pointer_up(point, &mut self.surface)?;
        if let Some(SelectionEvent::Completed(bbox)) = event {
            if self.selections.record(self.current_page, bbox) {
                debug!(page = self.current_page + 1, ?bbox, "selection stored");
            } else {
                debug!(page = self.current_page + 1, "empty selection discarded");
                self.overlay.set_selection(None, &mut self.surface)?;
            }
        }
        Ok(event)
    }

    pub fn pointer_cancel(&mut self) {
        self.overlay.cancel(&mut self.surface);
    }

    /// Ask the processing module for the content box of the current page
    pub async fn detect_current_page(&mut self) -> Result<PageBoundingBox, CropError> {
        let document = self.document.as_ref().ok_or(CropError::NoDocument)?;
        let page = self.current_page;
        let bbox = self.engine.detect_bbox(&document.bytes, page).await?;

        let bbox = bbox.normalized();
        if !bbox.is_finite() || bbox.is_empty() {
            return Err(CropError::EmptyDetection(page + 1));
        }

        self.selections.record(page, bbox);
        self.overlay.set_selection(Some(bbox), &mut self.surface)?;
        info!(page = page + 1, ?bbox, "content box detected");
        Ok(bbox)
    }

    pub fn clear_current_selection(&mut self) -> Result<(), CropError> {
        self.selections.remove(self.current_page);
        if self.overlay.is_active() {
            self.overlay.set_selection(None, &mut self.surface)?;
        }
        Ok(())
    }

    pub fn clear_all_selections(&mut self) -> Result<(), CropError> {
        self.selections.clear();
        if self.overlay.is_active() {
            self.overlay.set_selection(None, &mut self.surface)?;
        }
        Ok(())
    }

    /// Run the external crop over the loaded document.
    ///
    /// `page_range` uses the 1-based syntax of the page range field; blank
    /// means every page.
    pub async fn crop(
        &self,
        options: CropOptions,
        page_range: &str,
    ) -> Result<CropOutput, CropError> {
        let document = self.document.as_ref().ok_or(CropError::NoDocument)?;

        let pages = select_pages(page_range, document.page_count)?;

        let boxes = if self.selections.is_empty() {
            None
        } else {
            Some(self.selections.as_map())
        };

        info!(
            pages = ?pages,
            boxes = self.selections.len(),
            ?options,
            "cropping document"
        );
        let bytes = self
            .engine
            .crop_pdf(&document.bytes, &options, boxes, pages.as_deref())
            .await?;
        if bytes.is_empty() {
            return Err(CropError::Engine(
                "processing module returned an empty document".to_string(),
            ));
        }

        Ok(CropOutput {
            bytes,
            file_name: cropped_file_name(&document.name),
            mime_type: PDF_MIME_TYPE,
        })
    }
}
