//! Bridge to the compiled PDF processing module

use crate::dom::js_error_message;
use js_sys::Uint8Array;
use pdfcrop_core::{CropEngine, CropError, CropOptions, PageBoundingBox, PageDimensions};
use serde::Serialize;
use std::collections::BTreeMap;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/www/js/pdfcrop-bridge.js")]
extern "C" {
    #[wasm_bindgen(catch, js_name = pageCount)]
    async fn page_count_internal(bytes: Uint8Array) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_name = pageDimensions)]
    async fn page_dimensions_internal(bytes: Uint8Array, page_index: u32)
        -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_name = detectBbox)]
    async fn detect_bbox_internal(bytes: Uint8Array, page_index: u32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_name = cropPdf)]
    async fn crop_pdf_internal(
        bytes: Uint8Array,
        options: JsValue,
        boxes: JsValue,
        pages: JsValue,
    ) -> Result<JsValue, JsValue>;
}

fn engine_error(value: JsValue) -> CropError {
    CropError::Engine(js_error_message(&value))
}

/// Plain JS objects, so maps arrive as `{ "0": {...} }` rather than `Map`
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, CropError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| CropError::Engine(format!("Could not pass arguments to module: {}", e)))
}

/// `CropEngine` backed by the module loaded through `pdfcrop-bridge.js`
#[derive(Debug, Default, Clone, Copy)]
pub struct ModuleCropEngine;

impl ModuleCropEngine {
    pub fn new() -> Self {
        Self
    }
}

impl CropEngine for ModuleCropEngine {
    async fn page_count(&self, pdf: &[u8]) -> Result<usize, CropError> {
        let value = page_count_internal(Uint8Array::from(pdf))
            .await
            .map_err(engine_error)?;
        value
            .as_f64()
            .filter(|n| n.is_finite() && *n >= 0.0)
            .map(|n| n as usize)
            .ok_or_else(|| CropError::Engine("pageCount did not return a number".to_string()))
    }

    async fn page_dimensions(&self, pdf: &[u8], page: usize) -> Result<PageDimensions, CropError> {
        let value = page_dimensions_internal(Uint8Array::from(pdf), page as u32)
            .await
            .map_err(engine_error)?;
        serde_wasm_bindgen::from_value(value)
            .map_err(|e| CropError::Engine(format!("Unexpected page dimensions: {}", e)))
    }

    async fn detect_bbox(&self, pdf: &[u8], page: usize) -> Result<PageBoundingBox, CropError> {
        let value = detect_bbox_internal(Uint8Array::from(pdf), page as u32)
            .await
            .map_err(engine_error)?;
        if value.is_null() || value.is_undefined() {
            return Err(CropError::EmptyDetection(page + 1));
        }
        serde_wasm_bindgen::from_value(value)
            .map_err(|e| CropError::Engine(format!("Unexpected bounding box: {}", e)))
    }

    async fn crop_pdf(
        &self,
        pdf: &[u8],
        options: &CropOptions,
        boxes: Option<&BTreeMap<usize, PageBoundingBox>>,
        pages: Option<&[usize]>,
    ) -> Result<Vec<u8>, CropError> {
        let options = to_js(options)?;
        let boxes = match boxes {
            Some(map) => to_js(map)?,
            None => JsValue::NULL,
        };
        let pages = match pages {
            Some(list) => to_js(list)?,
            None => JsValue::NULL,
        };

        let result = crop_pdf_internal(Uint8Array::from(pdf), options, boxes, pages)
            .await
            .map_err(engine_error)?;
        if !result.is_instance_of::<Uint8Array>() {
            return Err(CropError::Engine(
                "cropPdf did not return a byte array".to_string(),
            ));
        }
        Ok(Uint8Array::new(&result).to_vec())
    }
}

#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod wasm_tests {
    use super::*;
    use js_sys::Reflect;
    use pdfcrop_core::Margins;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn get(obj: &JsValue, key: &str) -> JsValue {
        Reflect::get(obj, &JsValue::from_str(key)).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_options_cross_as_camel_case() {
        let options = CropOptions {
            margins: Margins::uniform(4.0),
            shrink_to_content: true,
            clip_content: false,
        };
        let value = to_js(&options).unwrap();
        assert_eq!(get(&value, "shrinkToContent").as_bool(), Some(true));
        assert_eq!(get(&value, "clipContent").as_bool(), Some(false));
        assert_eq!(get(&get(&value, "margins"), "left").as_f64(), Some(4.0));
    }

    #[wasm_bindgen_test]
    fn test_box_map_is_plain_object() {
        let mut boxes = BTreeMap::new();
        boxes.insert(2usize, PageBoundingBox::new(10.0, 20.0, 300.0, 400.0));
        let value = to_js(&boxes).unwrap();
        assert!(!value.is_instance_of::<js_sys::Map>());
        assert_eq!(get(&get(&value, "2"), "top").as_f64(), Some(400.0));
    }
}
