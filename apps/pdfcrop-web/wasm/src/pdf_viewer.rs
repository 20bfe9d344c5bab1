//! PDF.js integration for rendering pages in the browser via WASM

use crate::dom::{browser_error, js_error_message};
use js_sys::{Reflect, Uint8Array};
use pdfcrop_core::{CropError, DocumentViewer, Viewport};
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

// External JavaScript functions from pdf-bridge.js
#[wasm_bindgen(module = "/www/js/pdf-bridge.js")]
extern "C" {
    #[wasm_bindgen(catch, js_name = initPdfJs)]
    async fn init_pdf_js_internal(worker_src: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_name = loadDocument)]
    async fn load_document_internal(data: Uint8Array) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_name = renderPage)]
    async fn render_page_internal(
        page_num: u32,
        canvas: &HtmlCanvasElement,
        scale: f64,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_name = getViewport)]
    async fn get_viewport_internal(page_num: u32, scale: f64) -> Result<JsValue, JsValue>;
}

/// Initialize PDF.js with the given worker URL.
/// Must be called before any document is loaded.
pub async fn init_pdf_js_with_worker(worker_src: &str) -> Result<(), CropError> {
    init_pdf_js_internal(worker_src)
        .await
        .map_err(browser_error)?;
    Ok(())
}

/// Renders pages of the current document onto the main page canvas
pub struct PdfJsViewer {
    canvas: HtmlCanvasElement,
    document_proxy: Option<JsValue>,
    page_count: usize,
}

impl PdfJsViewer {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self {
            canvas,
            document_proxy: None,
            page_count: 0,
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    fn check_page(&self, page: usize) -> Result<u32, CropError> {
        if self.document_proxy.is_none() {
            return Err(CropError::NoDocument);
        }
        if page >= self.page_count {
            return Err(CropError::invalid_page(page, self.page_count));
        }
        // PDF.js numbers pages from 1
        Ok(page as u32 + 1)
    }

    /// Draw a page onto any canvas (used for thumbnails)
    pub async fn render_to(
        &self,
        canvas: &HtmlCanvasElement,
        page: usize,
        scale: f64,
    ) -> Result<Viewport, CropError> {
        let page_num = self.check_page(page)?;
        let result = render_page_internal(page_num, canvas, scale)
            .await
            .map_err(|e| CropError::Render(js_error_message(&e)))?;
        parse_viewport(result)
    }
}

fn parse_viewport(value: JsValue) -> Result<Viewport, CropError> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| CropError::Render(format!("Unexpected viewport from PDF.js: {}", e)))
}

impl DocumentViewer for PdfJsViewer {
    async fn load(&mut self, pdf: &[u8]) -> Result<usize, CropError> {
        // Copy out of WASM memory; PDF.js keeps the buffer
        let data = Uint8Array::from(pdf);

        let doc_result = load_document_internal(data)
            .await
            .map_err(|e| CropError::Render(js_error_message(&e)))?;

        let page_count = Reflect::get(&doc_result, &JsValue::from_str("numPages"))
            .ok()
            .and_then(|n| n.as_f64())
            .ok_or_else(|| CropError::Render("PDF.js did not report a page count".to_string()))?;

        self.page_count = page_count as usize;
        self.document_proxy = Some(doc_result);
        Ok(self.page_count)
    }

    async fn viewport(&self, page: usize, scale: f64) -> Result<Viewport, CropError> {
        let page_num = self.check_page(page)?;
        let result = get_viewport_internal(page_num, scale)
            .await
            .map_err(|e| CropError::Render(js_error_message(&e)))?;
        parse_viewport(result)
    }

    async fn render(&mut self, page: usize, scale: f64) -> Result<Viewport, CropError> {
        let canvas = self.canvas.clone();
        self.render_to(&canvas, page, scale).await
    }
}
