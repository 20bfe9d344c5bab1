//! Selection overlay drawn on a transparent canvas stacked over the page

use crate::dom::browser_error;
use js_sys::Array;
use pdfcrop_core::{CropError, DevicePoint, DeviceRectangle, OverlaySurface, RectangleStyle};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, DomRect, HtmlCanvasElement};

const STROKE_COLOR: &str = "#2563eb";
const LIVE_FILL: &str = "rgba(37, 99, 235, 0.08)";
const COMMITTED_FILL: &str = "rgba(37, 99, 235, 0.15)";
const HANDLE_FILL: &str = "#ffffff";

pub struct CanvasOverlay {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasOverlay {
    /// # Errors
    /// Fails when the canvas has no 2D context
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, CropError> {
        let context = canvas
            .get_context("2d")
            .map_err(browser_error)?
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or_else(|| {
                CropError::Browser("Overlay canvas has no 2D context".to_string())
            })?;
        Ok(Self { canvas, context })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Map client coordinates of a pointer event onto canvas pixels.
    /// The canvas may be displayed at a different CSS size than its backing store.
    pub fn to_device(&self, client_x: f64, client_y: f64) -> DevicePoint {
        let rect: DomRect = self.canvas.get_bounding_client_rect();
        let scale_x = if rect.width() > 0.0 {
            self.canvas.width() as f64 / rect.width()
        } else {
            1.0
        };
        let scale_y = if rect.height() > 0.0 {
            self.canvas.height() as f64 / rect.height()
        } else {
            1.0
        };
        DevicePoint::new(
            (client_x - rect.left()) * scale_x,
            (client_y - rect.top()) * scale_y,
        )
    }

    fn set_dash(&self, segments: &[f64]) {
        let pattern: Array = segments.iter().map(|&s| JsValue::from_f64(s)).collect();
        // Only fails for non-finite segments
        let _ = self.context.set_line_dash(&pattern);
    }
}

impl OverlaySurface for CanvasOverlay {
    fn resize(&mut self, width: f64, height: f64) {
        self.canvas.set_width(width.floor().max(0.0) as u32);
        self.canvas.set_height(height.floor().max(0.0) as u32);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", width.floor()));
        let _ = style.set_property("height", &format!("{}px", height.floor()));
    }

    fn clear(&mut self) {
        self.context.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }

    fn draw_rectangle(&mut self, rect: &DeviceRectangle, style: RectangleStyle) {
        let ctx = &self.context;
        match style {
            RectangleStyle::Live => {
                ctx.set_fill_style_str(LIVE_FILL);
                self.set_dash(&[6.0, 4.0]);
            }
            RectangleStyle::Committed => {
                ctx.set_fill_style_str(COMMITTED_FILL);
                self.set_dash(&[]);
            }
        }
        ctx.set_stroke_style_str(STROKE_COLOR);
        ctx.set_line_width(2.0);
        ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
        ctx.stroke_rect(rect.x, rect.y, rect.width, rect.height);
        self.set_dash(&[]);
    }

    fn draw_handle(&mut self, center: DevicePoint, size: f64) {
        let ctx = &self.context;
        let half = size / 2.0;
        ctx.set_fill_style_str(HANDLE_FILL);
        ctx.set_stroke_style_str(STROKE_COLOR);
        ctx.set_line_width(1.0);
        ctx.fill_rect(center.x - half, center.y - half, size, size);
        ctx.stroke_rect(center.x - half, center.y - half, size, size);
    }
}
