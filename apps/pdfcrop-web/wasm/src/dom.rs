//! DOM access helpers
//!
//! Lookups fail with `CropError::MissingElement` instead of panicking so that
//! a page missing a control gets a readable alert.

use pdfcrop_core::CropError;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, EventTarget, HtmlElement, HtmlInputElement, Window};

pub fn window() -> Result<Window, CropError> {
    web_sys::window().ok_or_else(|| CropError::Browser("No window object available".to_string()))
}

pub fn document() -> Result<Document, CropError> {
    window()?
        .document()
        .ok_or_else(|| CropError::Browser("No document object available".to_string()))
}

/// Element by id, cast to the expected type
pub fn element<T: JsCast>(id: &str) -> Result<T, CropError> {
    document()?
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<T>().ok())
        .ok_or_else(|| CropError::MissingElement(id.to_string()))
}

pub fn input_value(id: &str) -> Result<String, CropError> {
    Ok(element::<HtmlInputElement>(id)?.value())
}

pub fn is_checked(id: &str) -> Result<bool, CropError> {
    Ok(element::<HtmlInputElement>(id)?.checked())
}

pub fn set_text(id: &str, text: &str) -> Result<(), CropError> {
    element::<Element>(id)?.set_text_content(Some(text));
    Ok(())
}

/// Toggle the `disabled` state of an input or button
pub fn set_disabled(id: &str, disabled: bool) -> Result<(), CropError> {
    let el = element::<HtmlElement>(id)?;
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        input.set_disabled(disabled);
    } else if disabled {
        el.set_attribute("disabled", "").map_err(browser_error)?;
    } else {
        el.remove_attribute("disabled").map_err(browser_error)?;
    }
    Ok(())
}

/// Event listener that is detached from its target when dropped
pub struct EventListener {
    target: EventTarget,
    event: String,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl EventListener {
    pub fn new<F>(target: &EventTarget, event: &str, handler: F) -> Result<Self, CropError>
    where
        F: FnMut(web_sys::Event) + 'static,
    {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(browser_error)?;
        Ok(Self {
            target: target.clone(),
            event: event.to_string(),
            closure,
        })
    }

    /// Keep the listener attached for the lifetime of the page
    pub fn forget(self) {
        std::mem::forget(self);
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self.target.remove_event_listener_with_callback(
            &self.event,
            self.closure.as_ref().unchecked_ref(),
        );
    }
}

/// Attach a listener for the lifetime of the page
pub fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), CropError>
where
    F: FnMut(web_sys::Event) + 'static,
{
    EventListener::new(target, event, handler)?.forget();
    Ok(())
}

pub fn alert(message: &str) {
    if let Ok(window) = window() {
        let _ = window.alert_with_message(message);
    }
}

/// Best-effort message out of a thrown JS value
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    if let Some(text) = value.as_string() {
        return text;
    }
    format!("{:?}", value)
}

pub fn browser_error(value: JsValue) -> CropError {
    CropError::Browser(js_error_message(&value))
}

#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_missing_element() {
        let result = element::<HtmlElement>("definitely-not-on-the-page");
        assert_eq!(
            result.err(),
            Some(CropError::MissingElement(
                "definitely-not-on-the-page".to_string()
            ))
        );
    }

    #[wasm_bindgen_test]
    fn test_input_round_trip() {
        let doc = document().unwrap();
        let input: HtmlInputElement = doc.create_element("input").unwrap().unchecked_into();
        input.set_id("margin-sample");
        input.set_value("12.5");
        doc.body().unwrap().append_child(&input).unwrap();

        assert_eq!(input_value("margin-sample").unwrap(), "12.5");
        set_disabled("margin-sample", true).unwrap();
        assert!(input.disabled());
        input.remove();
    }

    #[wasm_bindgen_test]
    fn test_dropped_listener_is_detached() {
        use std::cell::Cell;
        use std::rc::Rc;

        let button: HtmlElement = document()
            .unwrap()
            .create_element("button")
            .unwrap()
            .unchecked_into();
        let clicks = Rc::new(Cell::new(0));

        let counter = clicks.clone();
        let listener =
            EventListener::new(&button, "click", move |_| counter.set(counter.get() + 1)).unwrap();
        button.click();
        drop(listener);
        button.click();
        assert_eq!(clicks.get(), 1);
    }

    #[wasm_bindgen_test]
    fn test_error_message_from_js_error() {
        let err = js_sys::Error::new("boom");
        assert_eq!(js_error_message(&err.into()), "boom");
        assert_eq!(js_error_message(&JsValue::from_str("plain")), "plain");
    }
}
