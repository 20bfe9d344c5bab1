//! Rectangle selection overlay drawn on top of the rendered page
//!
//! The overlay is a two-state gesture machine (Idle -> Drawing -> Idle).
//! Pointer handlers return a [`SelectionEvent`] for the caller to act on and
//! repaint the [`OverlaySurface`] on every state change.

use crate::error::CropError;
use crate::geometry::{DevicePoint, DeviceRectangle, PageBoundingBox};
use crate::transform::{CoordinateMapper, PageTransform};

/// How a rectangle should be painted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectangleStyle {
    /// Rectangle under an active drag
    Live,
    /// Finished selection
    Committed,
}

/// Drawing target for the overlay (a 2D canvas in the browser)
pub trait OverlaySurface {
    /// Match the surface to the rendered page size in device pixels
    fn resize(&mut self, width: f64, height: f64);
    fn clear(&mut self);
    fn draw_rectangle(&mut self, rect: &DeviceRectangle, style: RectangleStyle);
    fn draw_handle(&mut self, center: DevicePoint, size: f64);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    Idle,
    Drawing { anchor: DevicePoint },
}

/// Notification produced by a pointer gesture, in page space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionEvent {
    Changed(PageBoundingBox),
    Completed(PageBoundingBox),
}

#[derive(Debug, Clone)]
pub struct SelectionOverlay {
    mapper: CoordinateMapper,
    state: GestureState,
    live: Option<DeviceRectangle>,
    // Kept in page space so the selection follows zoom changes
    stored: Option<PageBoundingBox>,
    handle_size: f64,
}

impl SelectionOverlay {
    pub fn new(handle_size: f64) -> Self {
        Self {
            mapper: CoordinateMapper::new(),
            state: GestureState::Idle,
            live: None,
            stored: None,
            handle_size,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn is_active(&self) -> bool {
        self.mapper.is_active()
    }

    /// Stored selection for the active page
    pub fn selection(&self) -> Option<PageBoundingBox> {
        self.stored
    }

    /// Attach the overlay to a freshly rendered page; any previous selection is dropped
    pub fn activate(
        &mut self,
        page_index: usize,
        transform: PageTransform,
        surface: &mut impl OverlaySurface,
    ) {
        self.mapper.activate(page_index, transform);
        self.state = GestureState::Idle;
        self.live = None;
        self.stored = None;
        surface.resize(transform.canvas_width(), transform.canvas_height());
        self.redraw(surface);
    }

    /// Re-project after a zoom change, keeping the stored selection
    pub fn rescale(&mut self, transform: PageTransform, surface: &mut impl OverlaySurface) {
        if let Some(page_index) = self.mapper.page_index() {
            self.mapper.activate(page_index, transform);
            self.state = GestureState::Idle;
            self.live = None;
            surface.resize(transform.canvas_width(), transform.canvas_height());
            self.redraw(surface);
        }
    }

    pub fn deactivate(&mut self, surface: &mut impl OverlaySurface) {
        self.mapper.deactivate();
        self.state = GestureState::Idle;
        self.live = None;
        self.stored = None;
        surface.clear();
    }

    /// Replace the stored selection (restore on navigation, auto-detect result, clear)
    pub fn set_selection(
        &mut self,
        selection: Option<PageBoundingBox>,
        surface: &mut impl OverlaySurface,
    ) -> Result<(), CropError> {
        self.mapper.transform()?;
        self.stored = selection.map(|bbox| bbox.normalized());
        self.state = GestureState::Idle;
        self.live = None;
        self.redraw(surface);
        Ok(())
    }

    pub fn pointer_down(
        &mut self,
        point: DevicePoint,
        surface: &mut impl OverlaySurface,
    ) -> Result<(), CropError> {
        let anchor = self.mapper.transform()?.clamp_point(point);
        self.state = GestureState::Drawing { anchor };
        self.live = Some(DeviceRectangle::from_corners(anchor, anchor));
        self.redraw(surface);
        Ok(())
    }

    pub fn pointer_move(
        &mut self,
        point: DevicePoint,
        surface: &mut impl OverlaySurface,
    ) -> Result<Option<SelectionEvent>, CropError> {
        let transform = *self.mapper.transform()?;
        let GestureState::Drawing { anchor } = self.state else {
            return Ok(None);
        };

        let rect = DeviceRectangle::from_corners(anchor, transform.clamp_point(point));
        self.live = Some(rect);
        self.redraw(surface);
        Ok(Some(SelectionEvent::Changed(transform.device_to_page(&rect))))
    }

    pub fn pointer_up(
        &mut self,
        point: DevicePoint,
        surface: &mut impl OverlaySurface,
    ) -> Result<Option<SelectionEvent>, CropError> {
        let transform = *self.mapper.transform()?;
        let GestureState::Drawing { anchor } = self.state else {
            return Ok(None);
        };

        let rect = DeviceRectangle::from_corners(anchor, transform.clamp_point(point));
        let bbox = transform.device_to_page(&rect);
        self.state = GestureState::Idle;
        self.live = None;
        self.stored = Some(bbox);
        self.redraw(surface);
        Ok(Some(SelectionEvent::Completed(bbox)))
    }

    /// Abandon the current drag and keep whatever was stored before it
    pub fn cancel(&mut self, surface: &mut impl OverlaySurface) {
        if matches!(self.state, GestureState::Drawing { .. }) {
            self.state = GestureState::Idle;
            self.live = None;
            self.redraw(surface);
        }
    }

    pub fn redraw(&self, surface: &mut impl OverlaySurface) {
        surface.clear();
        let Ok(transform) = self.mapper.transform() else {
            return;
        };

        match self.state {
            GestureState::Drawing { .. } => {
                if let Some(live) = &self.live {
                    surface.draw_rectangle(live, RectangleStyle::Live);
                }
            }
            GestureState::Idle => {
                if let Some(bbox) = &self.stored {
                    let rect = transform.page_to_device(bbox);
                    surface.draw_rectangle(&rect, RectangleStyle::Committed);
                    for corner in rect.corners() {
                        surface.draw_handle(corner, self.handle_size);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Resize(f64, f64),
        Clear,
        Rect(DeviceRectangle, RectangleStyle),
        Handle(DevicePoint),
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
    }

    impl Recorder {
        /// Operations since the last clear
        fn frame(&self) -> &[Op] {
            let start = self
                .ops
                .iter()
                .rposition(|op| *op == Op::Clear)
                .map(|i| i + 1)
                .unwrap_or(0);
            &self.ops[start..]
        }

        fn handle_count(&self) -> usize {
            self.frame()
                .iter()
                .filter(|op| matches!(op, Op::Handle(_)))
                .count()
        }
    }

    impl OverlaySurface for Recorder {
        fn resize(&mut self, width: f64, height: f64) {
            self.ops.push(Op::Resize(width, height));
        }
        fn clear(&mut self) {
            self.ops.push(Op::Clear);
        }
        fn draw_rectangle(&mut self, rect: &DeviceRectangle, style: RectangleStyle) {
            self.ops.push(Op::Rect(*rect, style));
        }
        fn draw_handle(&mut self, center: DevicePoint, _size: f64) {
            self.ops.push(Op::Handle(center));
        }
    }

    fn active_overlay(surface: &mut Recorder) -> SelectionOverlay {
        let mut overlay = SelectionOverlay::new(8.0);
        let transform = PageTransform::new(1.0, 612.0, 792.0).unwrap();
        overlay.activate(0, transform, surface);
        overlay
    }

    #[test]
    fn test_pointer_events_without_page_fail() {
        let mut surface = Recorder::default();
        let mut overlay = SelectionOverlay::new(8.0);
        let p = DevicePoint::new(10.0, 10.0);
        assert_eq!(
            overlay.pointer_down(p, &mut surface),
            Err(CropError::NoActivePage)
        );
        assert_eq!(
            overlay.pointer_move(p, &mut surface),
            Err(CropError::NoActivePage)
        );
        assert_eq!(
            overlay.pointer_up(p, &mut surface),
            Err(CropError::NoActivePage)
        );
        assert_eq!(
            overlay.set_selection(None, &mut surface),
            Err(CropError::NoActivePage)
        );
    }

    #[test]
    fn test_activate_resizes_surface() {
        let mut surface = Recorder::default();
        let mut overlay = SelectionOverlay::new(8.0);
        let transform = PageTransform::new(2.0, 612.0, 792.0).unwrap();
        overlay.activate(0, transform, &mut surface);
        assert_eq!(surface.ops[0], Op::Resize(1224.0, 1584.0));
    }

    #[test]
    fn test_full_gesture() {
        let mut surface = Recorder::default();
        let mut overlay = active_overlay(&mut surface);

        overlay
            .pointer_down(DevicePoint::new(100.0, 100.0), &mut surface)
            .unwrap();
        assert!(matches!(overlay.state(), GestureState::Drawing { .. }));

        let changed = overlay
            .pointer_move(DevicePoint::new(200.0, 300.0), &mut surface)
            .unwrap();
        assert_eq!(
            changed,
            Some(SelectionEvent::Changed(PageBoundingBox::new(
                100.0, 492.0, 200.0, 692.0
            )))
        );
        // Live rectangle, no handles while drawing
        assert_eq!(surface.handle_count(), 0);
        assert!(surface
            .frame()
            .iter()
            .any(|op| matches!(op, Op::Rect(_, RectangleStyle::Live))));

        let completed = overlay
            .pointer_up(DevicePoint::new(200.0, 300.0), &mut surface)
            .unwrap();
        assert_eq!(
            completed,
            Some(SelectionEvent::Completed(PageBoundingBox::new(
                100.0, 492.0, 200.0, 692.0
            )))
        );
        assert_eq!(overlay.state(), GestureState::Idle);
        assert_eq!(surface.handle_count(), 4);
    }

    #[test]
    fn test_second_pointer_down_reanchors() {
        let mut surface = Recorder::default();
        let mut overlay = active_overlay(&mut surface);

        overlay
            .pointer_down(DevicePoint::new(10.0, 10.0), &mut surface)
            .unwrap();
        overlay
            .pointer_down(DevicePoint::new(300.0, 400.0), &mut surface)
            .unwrap();
        assert_eq!(
            overlay.state(),
            GestureState::Drawing {
                anchor: DevicePoint::new(300.0, 400.0)
            }
        );

        let changed = overlay
            .pointer_move(DevicePoint::new(350.0, 500.0), &mut surface)
            .unwrap();
        assert_eq!(
            changed,
            Some(SelectionEvent::Changed(PageBoundingBox::new(
                300.0, 292.0, 350.0, 392.0
            )))
        );
    }

    #[test]
    fn test_move_while_idle_is_ignored() {
        let mut surface = Recorder::default();
        let mut overlay = active_overlay(&mut surface);
        let event = overlay
            .pointer_move(DevicePoint::new(50.0, 50.0), &mut surface)
            .unwrap();
        assert_eq!(event, None);
        assert_eq!(overlay.selection(), None);
    }

    #[test]
    fn test_drag_outside_canvas_is_clamped() {
        let mut surface = Recorder::default();
        let mut overlay = active_overlay(&mut surface);
        overlay
            .pointer_down(DevicePoint::new(-40.0, -40.0), &mut surface)
            .unwrap();
        let event = overlay
            .pointer_up(DevicePoint::new(5000.0, 5000.0), &mut surface)
            .unwrap();
        assert_eq!(
            event,
            Some(SelectionEvent::Completed(PageBoundingBox::new(
                0.0, 0.0, 612.0, 792.0
            )))
        );
    }

    #[test]
    fn test_click_produces_zero_area_box() {
        let mut surface = Recorder::default();
        let mut overlay = active_overlay(&mut surface);
        let p = DevicePoint::new(60.0, 60.0);
        overlay.pointer_down(p, &mut surface).unwrap();
        match overlay.pointer_up(p, &mut surface).unwrap() {
            Some(SelectionEvent::Completed(bbox)) => assert!(bbox.is_empty()),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_cancel_restores_previous_selection() {
        let mut surface = Recorder::default();
        let mut overlay = active_overlay(&mut surface);
        let previous = PageBoundingBox::new(10.0, 10.0, 100.0, 100.0);
        overlay.set_selection(Some(previous), &mut surface).unwrap();

        overlay
            .pointer_down(DevicePoint::new(300.0, 300.0), &mut surface)
            .unwrap();
        overlay
            .pointer_move(DevicePoint::new(400.0, 400.0), &mut surface)
            .unwrap();
        overlay.cancel(&mut surface);

        assert_eq!(overlay.state(), GestureState::Idle);
        assert_eq!(overlay.selection(), Some(previous));
        assert_eq!(surface.handle_count(), 4);
    }

    #[test]
    fn test_rescale_keeps_selection_in_page_space() {
        let mut surface = Recorder::default();
        let mut overlay = active_overlay(&mut surface);
        let bbox = PageBoundingBox::new(100.0, 492.0, 200.0, 692.0);
        overlay.set_selection(Some(bbox), &mut surface).unwrap();

        let zoomed = PageTransform::new(2.0, 612.0, 792.0).unwrap();
        overlay.rescale(zoomed, &mut surface);

        assert_eq!(overlay.selection(), Some(bbox));
        assert!(surface.frame().contains(&Op::Rect(
            DeviceRectangle::new(200.0, 200.0, 200.0, 400.0),
            RectangleStyle::Committed
        )));
    }

    #[test]
    fn test_clearing_selection_removes_handles() {
        let mut surface = Recorder::default();
        let mut overlay = active_overlay(&mut surface);
        overlay
            .set_selection(Some(PageBoundingBox::new(0.0, 0.0, 50.0, 50.0)), &mut surface)
            .unwrap();
        assert_eq!(surface.handle_count(), 4);
        overlay.set_selection(None, &mut surface).unwrap();
        assert!(surface.frame().is_empty());
    }

    #[test]
    fn test_deactivate_drops_everything() {
        let mut surface = Recorder::default();
        let mut overlay = active_overlay(&mut surface);
        overlay
            .set_selection(Some(PageBoundingBox::new(0.0, 0.0, 50.0, 50.0)), &mut surface)
            .unwrap();
        overlay.deactivate(&mut surface);
        assert!(!overlay.is_active());
        assert_eq!(overlay.selection(), None);
    }
}
