//! DOM wiring of the cropping page
//!
//! All controller work runs behind one async mutex. Button handlers queue on
//! it, so a second click waits for the render in flight. Pointer handlers
//! only `try_lock` and drop the event while something else is running.

use crate::canvas::CanvasOverlay;
use crate::dom::{
    alert, browser_error, element, input_value, is_checked, listen, set_disabled, set_text,
};
use crate::download::download;
use crate::engine::ModuleCropEngine;
use crate::pdf_viewer::PdfJsViewer;
use crate::thumbnails::Thumbnails;
use futures::lock::Mutex;
use js_sys::Uint8Array;
use pdfcrop_core::{
    validate_page_range, AppConfig, CropController, CropError, CropOptions, ElementIds, Margins,
    PageBoundingBox, SelectionEvent,
};
use std::future::Future;
use std::rc::Rc;
use tracing::{debug, error, info};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Element, Event, HtmlCanvasElement, HtmlInputElement, PointerEvent};

pub type Controller = CropController<ModuleCropEngine, PdfJsViewer, CanvasOverlay>;

struct State {
    controller: Controller,
    thumbnails: Thumbnails,
}

#[derive(Debug, Clone, Copy)]
enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

pub struct App {
    state: Mutex<State>,
    config: AppConfig,
}

/// Disables the long-running controls until dropped
struct BusyGuard {
    ids: Vec<String>,
}

impl BusyGuard {
    fn new(ids: &ElementIds) -> Self {
        let ids = vec![
            ids.file_input.clone(),
            ids.detect_button.clone(),
            ids.crop_button.clone(),
        ];
        for id in &ids {
            let _ = set_disabled(id, true);
        }
        Self { ids }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        for id in &self.ids {
            let _ = set_disabled(id, false);
        }
    }
}

fn format_box(bbox: &PageBoundingBox) -> String {
    format!(
        "{:.1}, {:.1}, {:.1}, {:.1} ({:.1} x {:.1} pt)",
        bbox.left,
        bbox.bottom,
        bbox.right,
        bbox.top,
        bbox.width(),
        bbox.height()
    )
}

impl App {
    /// Look up the page elements, build the controller and attach every handler
    pub fn mount(config: AppConfig) -> Result<Rc<Self>, CropError> {
        let ids = &config.elements;
        let page_canvas = element::<HtmlCanvasElement>(&ids.page_canvas)?;
        let overlay_canvas = element::<HtmlCanvasElement>(&ids.overlay_canvas)?;
        let thumbnails = Thumbnails::new(element::<Element>(&ids.thumbnails)?);

        let controller = CropController::new(
            ModuleCropEngine::new(),
            PdfJsViewer::new(page_canvas),
            CanvasOverlay::new(overlay_canvas.clone())?,
            config.clone(),
        );

        let app = Rc::new(Self {
            state: Mutex::new(State {
                controller,
                thumbnails,
            }),
            config,
        });
        app.wire(&overlay_canvas)?;
        app.refresh_idle()?;
        info!("pdfcrop mounted");
        Ok(app)
    }

    fn ids(&self) -> &ElementIds {
        &self.config.elements
    }

    fn wire(self: &Rc<Self>, overlay: &HtmlCanvasElement) -> Result<(), CropError> {
        let ids = self.ids();

        let app = Rc::clone(self);
        listen(&element::<Element>(&ids.file_input)?.into(), "change", move |_| {
            app.spawn(true, App::load_file(Rc::clone(&app)));
        })?;

        self.on_click(&ids.prev_button, false, App::previous_page)?;
        self.on_click(&ids.next_button, false, App::next_page)?;
        self.on_click(&ids.zoom_in_button, false, App::zoom_in)?;
        self.on_click(&ids.zoom_out_button, false, App::zoom_out)?;
        self.on_click(&ids.zoom_fit_button, false, App::fit_width)?;
        self.on_click(&ids.detect_button, true, App::detect)?;
        self.on_click(&ids.clear_button, false, App::clear_current)?;
        self.on_click(&ids.clear_all_button, false, App::clear_all)?;
        self.on_click(&ids.crop_button, true, App::crop)?;

        let app = Rc::clone(self);
        listen(&element::<Element>(&ids.page_range)?.into(), "input", move |_| {
            app.check_page_range();
        })?;

        for (event, phase) in [
            ("pointerdown", PointerPhase::Down),
            ("pointermove", PointerPhase::Move),
            ("pointerup", PointerPhase::Up),
            ("pointercancel", PointerPhase::Cancel),
        ] {
            let app = Rc::clone(self);
            listen(overlay, event, move |event| app.pointer(phase, event))?;
        }
        Ok(())
    }

    fn on_click<F, Fut>(self: &Rc<Self>, id: &str, busy: bool, task: F) -> Result<(), CropError>
    where
        F: Fn(Rc<App>) -> Fut + 'static,
        Fut: Future<Output = Result<(), CropError>> + 'static,
    {
        let app = Rc::clone(self);
        listen(&element::<Element>(id)?.into(), "click", move |_| {
            app.spawn(busy, task(Rc::clone(&app)));
        })
    }

    fn spawn(
        self: &Rc<Self>,
        busy: bool,
        task: impl Future<Output = Result<(), CropError>> + 'static,
    ) {
        let app = Rc::clone(self);
        spawn_local(async move {
            let _guard = busy.then(|| BusyGuard::new(app.ids()));
            if let Err(err) = task.await {
                app.report(&err);
            }
        });
    }

    /// Log, alert and show in the status line
    pub fn report(&self, err: &CropError) {
        error!(error = %err, "operation failed");
        let message = err.to_string();
        let _ = set_text(&self.ids().status, &message);
        alert(&message);
    }

    fn set_status(&self, message: &str) -> Result<(), CropError> {
        set_text(&self.ids().status, message)
    }

    /// Sync labels, navigation buttons and the thumbnail highlight
    fn refresh(&self, state: &State) -> Result<(), CropError> {
        let ids = self.ids();
        let controller = &state.controller;
        let count = controller.page_count();
        let page = controller.current_page();

        if controller.is_loaded() {
            set_text(&ids.page_label, &format!("Page {} of {}", page + 1, count))?;
        } else {
            set_text(&ids.page_label, "No document")?;
        }
        set_text(&ids.zoom_label, &format!("{}%", controller.zoom().percent()))?;
        set_disabled(&ids.prev_button, !controller.is_loaded() || page == 0)?;
        set_disabled(&ids.next_button, !controller.is_loaded() || page + 1 >= count)?;
        set_disabled(&ids.clear_button, controller.selections().get(page).is_none())?;
        set_disabled(&ids.clear_all_button, controller.selections().is_empty())?;
        state.thumbnails.highlight(page);
        Ok(())
    }

    fn refresh_idle(&self) -> Result<(), CropError> {
        match self.state.try_lock() {
            Some(state) => self.refresh(&state),
            None => Ok(()),
        }
    }

    fn page_selector(self: &Rc<Self>) -> Rc<dyn Fn(usize)> {
        let app = Rc::clone(self);
        Rc::new(move |page| app.spawn(false, App::show_page(Rc::clone(&app), page)))
    }

    async fn load_file(app: Rc<App>) -> Result<(), CropError> {
        let input = element::<HtmlInputElement>(&app.ids().file_input)?;
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return Ok(());
        };
        let name = file.name();
        app.set_status(&format!("Loading {}...", name))?;

        let buffer = JsFuture::from(file.array_buffer())
            .await
            .map_err(browser_error)?;
        let bytes = Uint8Array::new(&buffer).to_vec();
        // Picking the same file again should still fire `change`
        input.set_value("");

        let mut state = app.state.lock().await;
        let result = state.controller.load_document(&name, bytes).await;
        app.refresh(&state)?;
        let info = result?;

        let State {
            controller,
            thumbnails,
        } = &mut *state;
        thumbnails
            .build(
                controller.viewer(),
                app.config.thumbnail_width,
                app.page_selector(),
            )
            .await?;
        app.refresh(&state)?;

        let mut status = format!("{}: {} page(s), PDF {}", name, info.page_count, info.version);
        if info.encrypted {
            status.push_str(", encrypted");
        }
        app.set_status(&status)
    }

    async fn show_page(app: Rc<App>, page: usize) -> Result<(), CropError> {
        let mut state = app.state.lock().await;
        let result = state.controller.go_to_page(page).await;
        app.refresh(&state)?;
        result
    }

    async fn previous_page(app: Rc<App>) -> Result<(), CropError> {
        let mut state = app.state.lock().await;
        let result = state.controller.previous_page().await;
        app.refresh(&state)?;
        result.map(|_| ())
    }

    async fn next_page(app: Rc<App>) -> Result<(), CropError> {
        let mut state = app.state.lock().await;
        let result = state.controller.next_page().await;
        app.refresh(&state)?;
        result.map(|_| ())
    }

    async fn zoom_in(app: Rc<App>) -> Result<(), CropError> {
        let mut state = app.state.lock().await;
        let result = state.controller.zoom_in().await;
        app.refresh(&state)?;
        result.map(|_| ())
    }

    async fn zoom_out(app: Rc<App>) -> Result<(), CropError> {
        let mut state = app.state.lock().await;
        let result = state.controller.zoom_out().await;
        app.refresh(&state)?;
        result.map(|_| ())
    }

    async fn fit_width(app: Rc<App>) -> Result<(), CropError> {
        let width = element::<Element>(&app.ids().viewer_container)?.client_width() as f64;
        let mut state = app.state.lock().await;
        let result = state.controller.fit_width(width).await;
        app.refresh(&state)?;
        result.map(|_| ())
    }

    async fn detect(app: Rc<App>) -> Result<(), CropError> {
        let mut state = app.state.lock().await;
        let page = state.controller.current_page();
        app.set_status(&format!("Detecting content on page {}...", page + 1))?;
        let result = state.controller.detect_current_page().await;
        app.refresh(&state)?;
        let bbox = result?;
        app.set_status(&format!("Page {}: {}", page + 1, format_box(&bbox)))
    }

    async fn clear_current(app: Rc<App>) -> Result<(), CropError> {
        let mut state = app.state.lock().await;
        state.controller.clear_current_selection()?;
        app.refresh(&state)?;
        app.set_status("Selection cleared")
    }

    async fn clear_all(app: Rc<App>) -> Result<(), CropError> {
        let mut state = app.state.lock().await;
        state.controller.clear_all_selections()?;
        app.refresh(&state)?;
        app.set_status("All selections cleared")
    }

    async fn crop(app: Rc<App>) -> Result<(), CropError> {
        let ids = app.ids();
        let margins = Margins::parse(
            &input_value(&ids.margin_left)?,
            &input_value(&ids.margin_bottom)?,
            &input_value(&ids.margin_right)?,
            &input_value(&ids.margin_top)?,
        )?;
        let options = CropOptions {
            margins,
            shrink_to_content: is_checked(&ids.shrink_checkbox)?,
            clip_content: is_checked(&ids.clip_checkbox)?,
        };
        let range = input_value(&ids.page_range)?;

        let state = app.state.lock().await;
        app.set_status("Cropping...")?;
        let output = state.controller.crop(options, &range).await?;
        download(&output)?;
        app.set_status(&format!("Saved {}", output.file_name))
    }

    /// Inline feedback on the page range field
    fn check_page_range(&self) {
        let Ok(input) = element::<HtmlInputElement>(&self.ids().page_range) else {
            return;
        };
        let Some(state) = self.state.try_lock() else {
            return;
        };
        let total = state.controller.page_count();
        if total == 0 {
            input.set_custom_validity("");
            return;
        }
        let message = validate_page_range(&input.value(), total).unwrap_or_default();
        input.set_custom_validity(&message);
    }

    fn pointer(&self, phase: PointerPhase, event: Event) {
        let Some(event) = event.dyn_ref::<PointerEvent>() else {
            return;
        };
        let Some(mut state) = self.state.try_lock() else {
            debug!(?phase, "pointer event dropped while busy");
            return;
        };
        if !state.controller.is_loaded() {
            return;
        }

        let controller = &mut state.controller;
        let point = controller
            .surface()
            .to_device(event.client_x() as f64, event.client_y() as f64);

        let result = match phase {
            PointerPhase::Down => {
                event.prevent_default();
                let _ = controller
                    .surface()
                    .canvas()
                    .set_pointer_capture(event.pointer_id());
                controller.pointer_down(point).map(|()| None)
            }
            PointerPhase::Move => controller.pointer_move(point),
            PointerPhase::Up => controller.pointer_up(point),
            PointerPhase::Cancel => {
                controller.pointer_cancel();
                Ok(None)
            }
        };

        let page = controller.current_page() + 1;
        let outcome = match result {
            Ok(Some(SelectionEvent::Changed(bbox))) => self.set_status(&format_box(&bbox)),
            Ok(Some(SelectionEvent::Completed(bbox))) => {
                let message = if bbox.is_empty() {
                    format!("Selection cleared on page {}", page)
                } else {
                    format!("Page {}: {}", page, format_box(&bbox))
                };
                self.set_status(&message)
                    .and_then(|()| self.refresh(&state))
            }
            Ok(None) => Ok(()),
            Err(err) => Err(err),
        };
        if let Err(err) = outcome {
            self.report(&err);
        }
    }
}
