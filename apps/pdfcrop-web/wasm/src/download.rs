//! Offer cropped bytes as a file download

use crate::dom::{browser_error, document, window};
use js_sys::{Array, Uint8Array};
use pdfcrop_core::{CropError, CropOutput};
use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// Time the browser gets to start reading the blob before its URL is revoked
const REVOKE_DELAY_MS: i32 = 1_000;

pub fn make_blob(bytes: &[u8], mime_type: &str) -> Result<Blob, CropError> {
    let parts = Array::new();
    parts.push(&Uint8Array::from(bytes));

    let options = BlobPropertyBag::new();
    options.set_type(mime_type);
    Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(browser_error)
}

/// Trigger a browser download through a temporary anchor
pub fn download(output: &CropOutput) -> Result<(), CropError> {
    let blob = make_blob(&output.bytes, output.mime_type)?;
    let url = Url::create_object_url_with_blob(&blob).map_err(browser_error)?;

    if let Err(err) = click_link(&url, &output.file_name) {
        let _ = Url::revoke_object_url(&url);
        return Err(err);
    }
    if let Err(err) = revoke_later(url.clone(), REVOKE_DELAY_MS) {
        warn!(error = %err, "could not schedule object URL cleanup");
        let _ = Url::revoke_object_url(&url);
    }

    info!(file = %output.file_name, size = output.bytes.len(), "download started");
    Ok(())
}

/// Revoke an object URL from a timer instead of right after the click
fn revoke_later(url: String, delay_ms: i32) -> Result<(), CropError> {
    let revoke = Closure::once_into_js(move || {
        let _ = Url::revoke_object_url(&url);
    });
    window()?
        .set_timeout_with_callback_and_timeout_and_arguments_0(revoke.unchecked_ref(), delay_ms)
        .map_err(browser_error)?;
    Ok(())
}

fn click_link(url: &str, file_name: &str) -> Result<(), CropError> {
    let document = document()?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(browser_error)?
        .dyn_into()
        .map_err(|_| CropError::Browser("Could not create download link".to_string()))?;
    anchor.set_href(url);
    anchor.set_download(file_name);
    anchor.style().set_property("display", "none").map_err(browser_error)?;

    let body = document
        .body()
        .ok_or_else(|| CropError::Browser("Document has no body".to_string()))?;
    body.append_child(&anchor).map_err(browser_error)?;
    anchor.click();
    anchor.remove();
    Ok(())
}

#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod wasm_tests {
    use super::*;
    use js_sys::Promise;
    use pdfcrop_core::PDF_MIME_TYPE;
    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_blob_has_pdf_type_and_size() {
        let blob = make_blob(b"%PDF-1.7 fake", PDF_MIME_TYPE).unwrap();
        assert_eq!(blob.type_(), "application/pdf");
        assert_eq!(blob.size() as usize, 13);
    }

    async fn sleep(ms: i32) {
        let promise = Promise::new(&mut |resolve, _| {
            window()
                .unwrap()
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
                .unwrap();
        });
        JsFuture::from(promise).await.unwrap();
    }

    async fn readable(url: &str) -> bool {
        JsFuture::from(window().unwrap().fetch_with_str(url))
            .await
            .is_ok()
    }

    #[wasm_bindgen_test]
    async fn test_object_url_is_revoked_after_delay() {
        let blob = make_blob(b"%PDF-1.7 fake", PDF_MIME_TYPE).unwrap();
        let url = Url::create_object_url_with_blob(&blob).unwrap();

        revoke_later(url.clone(), 50).unwrap();
        assert!(readable(&url).await, "URL must survive the click");

        sleep(200).await;
        assert!(!readable(&url).await);
    }
}
