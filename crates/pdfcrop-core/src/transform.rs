//! Coordinate transformation between the rendered canvas and PDF page space
//!
//! The mapping depends only on the render scale and the page height:
//! `page_x = device_x / scale`, `page_y = page_height - device_y / scale`.

use crate::error::CropError;
use crate::geometry::{DevicePoint, DeviceRectangle, PageBoundingBox};

/// Mapping for a single rendered page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageTransform {
    scale: f64,
    page_width: f64,
    page_height: f64,
}

impl PageTransform {
    /// # Errors
    /// Returns `InvalidGeometry` unless all values are finite and positive
    pub fn new(scale: f64, page_width: f64, page_height: f64) -> Result<Self, CropError> {
        for (name, value) in [
            ("scale", scale),
            ("page width", page_width),
            ("page height", page_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CropError::InvalidGeometry(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        Ok(Self {
            scale,
            page_width,
            page_height,
        })
    }

    /// Derive the transform from a rendered viewport size
    pub fn from_viewport(
        scale: f64,
        canvas_width: f64,
        canvas_height: f64,
    ) -> Result<Self, CropError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(CropError::InvalidGeometry(format!(
                "scale must be positive, got {}",
                scale
            )));
        }
        Self::new(scale, canvas_width / scale, canvas_height / scale)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn page_width(&self) -> f64 {
        self.page_width
    }

    pub fn page_height(&self) -> f64 {
        self.page_height
    }

    pub fn canvas_width(&self) -> f64 {
        self.page_width * self.scale
    }

    pub fn canvas_height(&self) -> f64 {
        self.page_height * self.scale
    }

    pub fn clamp_point(&self, point: DevicePoint) -> DevicePoint {
        DevicePoint::new(
            point.x.clamp(0.0, self.canvas_width()),
            point.y.clamp(0.0, self.canvas_height()),
        )
    }

    /// Device pixel -> PDF point (x, y)
    pub fn device_to_page_point(&self, point: DevicePoint) -> (f64, f64) {
        (
            point.x / self.scale,
            self.page_height - point.y / self.scale,
        )
    }

    /// PDF point -> device pixel
    pub fn page_to_device_point(&self, page_x: f64, page_y: f64) -> DevicePoint {
        DevicePoint::new(
            page_x * self.scale,
            (self.page_height - page_y) * self.scale,
        )
    }

    /// Convert a device rectangle to a page box, clamping to the canvas first
    pub fn device_to_page(&self, rect: &DeviceRectangle) -> PageBoundingBox {
        let rect = rect.clamp_to(self.canvas_width(), self.canvas_height());
        let (left, top) = self.device_to_page_point(DevicePoint::new(rect.x, rect.y));
        let (right, bottom) =
            self.device_to_page_point(DevicePoint::new(rect.right(), rect.bottom()));
        PageBoundingBox::new(left, bottom, right, top)
    }

    pub fn page_to_device(&self, bbox: &PageBoundingBox) -> DeviceRectangle {
        let bbox = bbox.normalized();
        let top_left = self.page_to_device_point(bbox.left, bbox.top);
        let bottom_right = self.page_to_device_point(bbox.right, bbox.bottom);
        DeviceRectangle::from_corners(top_left, bottom_right)
    }
}

/// Transform of the page currently on screen, if any
#[derive(Debug, Clone, Default)]
pub struct CoordinateMapper {
    active: Option<(usize, PageTransform)>,
}

impl CoordinateMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activate(&mut self, page_index: usize, transform: PageTransform) {
        self.active = Some((page_index, transform));
    }

    pub fn deactivate(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn page_index(&self) -> Option<usize> {
        self.active.map(|(index, _)| index)
    }

    /// # Errors
    /// Returns `NoActivePage` if nothing is rendered
    pub fn transform(&self) -> Result<&PageTransform, CropError> {
        self.active
            .as_ref()
            .map(|(_, transform)| transform)
            .ok_or(CropError::NoActivePage)
    }

    pub fn device_to_page(&self, rect: &DeviceRectangle) -> Result<PageBoundingBox, CropError> {
        Ok(self.transform()?.device_to_page(rect))
    }

    pub fn page_to_device(&self, bbox: &PageBoundingBox) -> Result<DeviceRectangle, CropError> {
        Ok(self.transform()?.page_to_device(bbox))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter(scale: f64) -> PageTransform {
        PageTransform::new(scale, 612.0, 792.0).unwrap()
    }

    #[test]
    fn test_device_origin_is_page_top_left() {
        let t = letter(1.5);
        let (x, y) = t.device_to_page_point(DevicePoint::new(0.0, 0.0));
        assert_eq!(x, 0.0);
        assert_eq!(y, 792.0);
    }

    #[test]
    fn test_y_axis_flip() {
        let t = letter(1.0);
        let dom = t.page_to_device_point(0.0, 100.0);
        // DOM y should be (792 - 100) * 1.0 = 692
        assert_eq!(dom.y, 692.0);
    }

    #[test]
    fn test_device_rect_to_page_box() {
        let t = letter(2.0);
        let rect = DeviceRectangle::new(100.0, 200.0, 400.0, 600.0);
        let bbox = t.device_to_page(&rect);
        assert!((bbox.left - 50.0).abs() < 1e-9);
        assert!((bbox.right - 250.0).abs() < 1e-9);
        assert!((bbox.top - 692.0).abs() < 1e-9);
        assert!((bbox.bottom - 392.0).abs() < 1e-9);
    }

    #[test]
    fn test_rect_is_clamped_before_conversion() {
        let t = letter(1.0);
        let rect = DeviceRectangle::new(-50.0, -50.0, 1000.0, 1000.0);
        let bbox = t.device_to_page(&rect);
        assert_eq!(bbox, PageBoundingBox::new(0.0, 0.0, 612.0, 792.0));
    }

    #[test]
    fn test_rejects_non_positive_scale() {
        assert!(matches!(
            PageTransform::new(0.0, 612.0, 792.0),
            Err(CropError::InvalidGeometry(_))
        ));
        assert!(PageTransform::new(f64::NAN, 612.0, 792.0).is_err());
        assert!(PageTransform::new(1.0, 612.0, -1.0).is_err());
    }

    #[test]
    fn test_from_viewport() {
        let t = PageTransform::from_viewport(1.5, 918.0, 1188.0).unwrap();
        assert!((t.page_width() - 612.0).abs() < 1e-9);
        assert!((t.page_height() - 792.0).abs() < 1e-9);
    }

    #[test]
    fn test_mapper_without_page_fails() {
        let mapper = CoordinateMapper::new();
        let rect = DeviceRectangle::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(mapper.device_to_page(&rect), Err(CropError::NoActivePage));
        assert_eq!(
            mapper.page_to_device(&PageBoundingBox::default()),
            Err(CropError::NoActivePage)
        );
    }

    #[test]
    fn test_mapper_tracks_page_index() {
        let mut mapper = CoordinateMapper::new();
        mapper.activate(3, letter(1.0));
        assert_eq!(mapper.page_index(), Some(3));
        mapper.deactivate();
        assert!(!mapper.is_active());
        assert_eq!(mapper.page_index(), None);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn dimension() -> impl Strategy<Value = f64> {
        1.0f64..2000.0
    }

    fn scale() -> impl Strategy<Value = f64> {
        0.1f64..5.0
    }

    proptest! {
        /// Property: device -> page -> device returns the original rectangle
        #[test]
        fn roundtrip_device_page_device(
            page_w in dimension(),
            page_h in dimension(),
            s in scale(),
            fx in 0.0f64..1.0,
            fy in 0.0f64..1.0,
            fw in 0.0f64..1.0,
            fh in 0.0f64..1.0,
        ) {
            let t = PageTransform::new(s, page_w, page_h).unwrap();
            let x = fx * t.canvas_width();
            let y = fy * t.canvas_height();
            let rect = DeviceRectangle::new(
                x,
                y,
                fw * (t.canvas_width() - x),
                fh * (t.canvas_height() - y),
            );

            let back = t.page_to_device(&t.device_to_page(&rect));

            let tolerance = 1e-6 * t.canvas_width().max(t.canvas_height());
            prop_assert!((back.x - rect.x).abs() < tolerance, "x: {} vs {}", back.x, rect.x);
            prop_assert!((back.y - rect.y).abs() < tolerance, "y: {} vs {}", back.y, rect.y);
            prop_assert!((back.width - rect.width).abs() < tolerance);
            prop_assert!((back.height - rect.height).abs() < tolerance);
        }

        /// Property: page -> device -> page returns the original box
        #[test]
        fn roundtrip_page_device_page(
            page_w in dimension(),
            page_h in dimension(),
            s in scale(),
            fl in 0.0f64..0.5,
            fb in 0.0f64..0.5,
            fr in 0.5f64..1.0,
            ft in 0.5f64..1.0,
        ) {
            let t = PageTransform::new(s, page_w, page_h).unwrap();
            let bbox = PageBoundingBox::new(fl * page_w, fb * page_h, fr * page_w, ft * page_h);

            let back = t.device_to_page(&t.page_to_device(&bbox));

            let tolerance = 1e-6 * page_w.max(page_h);
            prop_assert!((back.left - bbox.left).abs() < tolerance);
            prop_assert!((back.bottom - bbox.bottom).abs() < tolerance);
            prop_assert!((back.right - bbox.right).abs() < tolerance);
            prop_assert!((back.top - bbox.top).abs() < tolerance);
        }

        /// Property: any device rectangle maps inside the page
        #[test]
        fn converted_box_stays_on_page(
            page_w in dimension(),
            page_h in dimension(),
            s in scale(),
            x in -5000.0f64..5000.0,
            y in -5000.0f64..5000.0,
            w in 0.0f64..10000.0,
            h in 0.0f64..10000.0,
        ) {
            let t = PageTransform::new(s, page_w, page_h).unwrap();
            let bbox = t.device_to_page(&DeviceRectangle::new(x, y, w, h));
            let eps = 1e-9 * page_w.max(page_h);
            prop_assert!(bbox.left >= -eps && bbox.right <= page_w + eps);
            prop_assert!(bbox.bottom >= -eps && bbox.top <= page_h + eps);
            prop_assert!(bbox.left <= bbox.right && bbox.bottom <= bbox.top);
        }
    }
}
