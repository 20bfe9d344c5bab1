//! WASM front end for the PDF crop tool
//!
//! Renders pages with PDF.js, lets the user draw a crop box per page, and
//! sends the boxes to the compiled processing module. All state lives in
//! Rust; JavaScript only provides the two bridge modules under `www/js/`.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { mountApp } from './pkg/pdfcrop_wasm.js';
//!
//! await init();
//! await mountApp({ initialScale: 1.25, logLevel: "debug" });
//! ```

pub mod app;
pub mod canvas;
pub mod dom;
pub mod engine;
pub mod download;
pub mod logging;
pub mod pdf_viewer;
pub mod thumbnails;

use pdfcrop_core::{AppConfig, CropError};
use wasm_bindgen::prelude::*;

pub use app::App;

/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Get the library version
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// `undefined`/`null` give the defaults; anything else must match `AppConfig`
pub fn config_from_js(value: JsValue) -> Result<AppConfig, CropError> {
    if value.is_undefined() || value.is_null() {
        return Ok(AppConfig::default());
    }
    let config: AppConfig = serde_wasm_bindgen::from_value(value)
        .map_err(|e| CropError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Set up logging and PDF.js, then attach the UI to the page elements.
/// Failures are logged and shown in an alert before the promise rejects.
#[wasm_bindgen(js_name = mountApp)]
pub async fn mount_app(config: JsValue) -> Result<(), JsValue> {
    start(config)
        .await
        .map_err(|err| startup_failure(&err, dom::alert))
}

async fn start(config: JsValue) -> Result<(), CropError> {
    let config = config_from_js(config);
    // A rejected config still gets logged, at the default level
    logging::init(
        config
            .as_ref()
            .map_or(logging::DEFAULT_LEVEL, |c| c.log_level.as_str()),
    );
    let config = config?;

    pdf_viewer::init_pdf_js_with_worker(&config.worker_src).await?;

    // Handlers hold the app; it stays alive for the page lifetime
    App::mount(config)?;
    Ok(())
}

fn startup_failure(err: &CropError, notify: impl FnOnce(&str)) -> JsValue {
    tracing::error!(error = %err, "startup failed");
    let message = format!("PDF crop could not start: {}", err);
    notify(&message);
    JsValue::from_str(&message)
}

/// Parse a page range field into zero-based indices; `null` means all pages
#[wasm_bindgen(js_name = parsePageRange)]
pub fn parse_page_range(input: &str) -> JsValue {
    match pdfcrop_core::parse_page_range(input) {
        Some(pages) => pages
            .into_iter()
            .map(|p| JsValue::from_f64(p as f64))
            .collect::<js_sys::Array>()
            .into(),
        None => JsValue::NULL,
    }
}

/// Download name for an uploaded file
#[wasm_bindgen(js_name = croppedFileName)]
pub fn cropped_file_name(original: &str) -> String {
    pdfcrop_core::cropped_file_name(original)
}


#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod wasm_tests {
    use super::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_parse_page_range_export() {
        let value = parse_page_range("1-3,5");
        let array: js_sys::Array = value.dyn_into().unwrap();
        let pages: Vec<f64> = array.iter().filter_map(|v| v.as_f64()).collect();
        assert_eq!(pages, vec![0.0, 1.0, 2.0, 4.0]);
        assert!(parse_page_range("").is_null());
    }

    #[wasm_bindgen_test]
    fn test_config_defaults_for_undefined() {
        let config = config_from_js(JsValue::UNDEFINED).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[wasm_bindgen_test]
    async fn test_bad_config_is_reported() {
        let obj = js_sys::Object::new();
        js_sys::Reflect::set(&obj, &"maxScale".into(), &JsValue::from_f64(0.0)).unwrap();

        let err = start(obj.into()).await.unwrap_err();
        assert!(matches!(err, CropError::Config(_)));

        let mut shown = None;
        let value = startup_failure(&err, |message| shown = Some(message.to_string()));
        let shown = shown.expect("failure should be shown to the user");
        assert!(shown.contains("maxScale"));
        assert_eq!(value.as_string(), Some(shown));
    }

    #[wasm_bindgen_test]
    fn test_missing_canvas_is_reported() {
        let mut config = AppConfig::default();
        config.elements.page_canvas = "no-such-canvas".to_string();

        let err = App::mount(config).err().expect("mount should fail");
        assert_eq!(err, CropError::MissingElement("no-such-canvas".to_string()));

        let mut shown = None;
        startup_failure(&err, |message| shown = Some(message.to_string()));
        assert!(shown.unwrap().contains("#no-such-canvas"));
    }

    #[wasm_bindgen_test]
    fn test_config_rejects_bad_scale() {
        let obj = js_sys::Object::new();
        js_sys::Reflect::set(&obj, &"initialScale".into(), &JsValue::from_f64(-1.0)).unwrap();
        assert!(matches!(config_from_js(obj.into()), Err(CropError::Config(_))));
    }
}
