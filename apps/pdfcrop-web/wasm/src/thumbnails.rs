//! Page thumbnail strip

use crate::dom::{browser_error, document, EventListener};
use crate::pdf_viewer::PdfJsViewer;
use pdfcrop_core::{thumbnail_scale, CropError, DocumentViewer};
use std::rc::Rc;
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlCanvasElement};

const ACTIVE_CLASS: &str = "active";

struct Tile {
    element: Element,
    // Detached when the tile is dropped
    _click: EventListener,
}

pub struct Thumbnails {
    container: Element,
    tiles: Vec<Tile>,
}

impl Thumbnails {
    pub fn new(container: Element) -> Self {
        Self {
            container,
            tiles: Vec::new(),
        }
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
        self.container.set_inner_html("");
    }

    /// Render one thumbnail per page. A page that fails to render keeps an
    /// empty tile so indices still line up.
    pub async fn build(
        &mut self,
        viewer: &PdfJsViewer,
        target_width: f64,
        on_select: Rc<dyn Fn(usize)>,
    ) -> Result<(), CropError> {
        self.clear();
        for page in 0..viewer.page_count() {
            let canvas = self.add_tile(page, on_select.clone())?;
            if let Err(err) = render_thumbnail(viewer, &canvas, page, target_width).await {
                warn!(page = page + 1, error = %err, "thumbnail render failed");
            }
        }
        debug!(count = self.tile_count(), "thumbnails built");
        Ok(())
    }

    /// Append an empty tile for `page` and return its canvas
    fn add_tile(
        &mut self,
        page: usize,
        on_select: Rc<dyn Fn(usize)>,
    ) -> Result<HtmlCanvasElement, CropError> {
        let document = document()?;
        let element = document.create_element("div").map_err(browser_error)?;
        element.set_class_name("thumbnail");
        element
            .set_attribute("data-page", &(page + 1).to_string())
            .map_err(browser_error)?;

        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(browser_error)?
            .dyn_into()
            .map_err(|_| CropError::Browser("Could not create thumbnail canvas".to_string()))?;
        element.append_child(&canvas).map_err(browser_error)?;

        let label = document.create_element("span").map_err(browser_error)?;
        label.set_text_content(Some(&(page + 1).to_string()));
        element.append_child(&label).map_err(browser_error)?;

        self.container.append_child(&element).map_err(browser_error)?;

        let click = EventListener::new(&element, "click", move |_| on_select(page))?;
        self.tiles.push(Tile {
            element,
            _click: click,
        });
        Ok(canvas)
    }

    /// Mark the thumbnail of the page on screen
    pub fn highlight(&self, page: usize) {
        for (index, tile) in self.tiles.iter().enumerate() {
            let classes = tile.element.class_list();
            let _ = if index == page {
                classes.add_1(ACTIVE_CLASS)
            } else {
                classes.remove_1(ACTIVE_CLASS)
            };
        }
        if let Some(tile) = self.tiles.get(page) {
            tile.element.scroll_into_view_with_bool(false);
        }
    }
}

async fn render_thumbnail(
    viewer: &PdfJsViewer,
    canvas: &HtmlCanvasElement,
    page: usize,
    target_width: f64,
) -> Result<(), CropError> {
    let natural = viewer.viewport(page, 1.0).await?;
    let scale = thumbnail_scale(natural.width, target_width);
    viewer.render_to(canvas, page, scale).await?;
    Ok(())
}
