//! Rectangles in the two coordinate systems the cropper works with
//!
//! - Page space: PDF points (1/72 inch), origin at the bottom-left of the page.
//! - Device space: canvas pixels, origin at the top-left of the rendered page.

use serde::{Deserialize, Serialize};

/// Crop rectangle in PDF points
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PageBoundingBox {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl PageBoundingBox {
    pub fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// A box with no area is treated as "no selection"
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.bottom.is_finite()
            && self.right.is_finite()
            && self.top.is_finite()
    }

    /// Swap edges so that left <= right and bottom <= top
    pub fn normalized(&self) -> Self {
        Self {
            left: self.left.min(self.right),
            bottom: self.bottom.min(self.top),
            right: self.left.max(self.right),
            top: self.bottom.max(self.top),
        }
    }
}

/// Point on the rendering surface
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DevicePoint {
    pub x: f64,
    pub y: f64,
}

impl DevicePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Rectangle on the rendering surface, always with non-negative width and height
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeviceRectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DeviceRectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
        .normalized()
    }

    /// Rectangle spanned by two opposite corners, in any drag direction
    pub fn from_corners(a: DevicePoint, b: DevicePoint) -> Self {
        let min_x = a.x.min(b.x);
        let min_y = a.y.min(b.y);
        Self {
            x: min_x,
            y: min_y,
            width: a.x.max(b.x) - min_x,
            height: a.y.max(b.y) - min_y,
        }
    }

    fn normalized(self) -> Self {
        Self::from_corners(
            DevicePoint::new(self.x, self.y),
            DevicePoint::new(self.x + self.width, self.y + self.height),
        )
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Intersect with the surface `[0, width] x [0, height]`
    pub fn clamp_to(&self, width: f64, height: f64) -> Self {
        let left = self.x.clamp(0.0, width);
        let top = self.y.clamp(0.0, height);
        let right = self.right().clamp(0.0, width);
        let bottom = self.bottom().clamp(0.0, height);
        Self {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        }
    }

    /// Corners in clockwise order starting top-left
    pub fn corners(&self) -> [DevicePoint; 4] {
        [
            DevicePoint::new(self.x, self.y),
            DevicePoint::new(self.right(), self.y),
            DevicePoint::new(self.right(), self.bottom()),
            DevicePoint::new(self.x, self.bottom()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_dimensions() {
        let bbox = PageBoundingBox::new(10.0, 20.0, 110.0, 220.0);
        assert_eq!(bbox.width(), 100.0);
        assert_eq!(bbox.height(), 200.0);
        assert!(!bbox.is_empty());
    }

    #[test]
    fn test_bbox_zero_area_is_empty() {
        assert!(PageBoundingBox::new(10.0, 20.0, 10.0, 220.0).is_empty());
        assert!(PageBoundingBox::new(10.0, 20.0, 110.0, 20.0).is_empty());
    }

    #[test]
    fn test_bbox_normalized() {
        let bbox = PageBoundingBox::new(110.0, 220.0, 10.0, 20.0).normalized();
        assert_eq!(bbox, PageBoundingBox::new(10.0, 20.0, 110.0, 220.0));
    }

    #[test]
    fn test_bbox_serializes_with_edge_names() {
        let bbox = PageBoundingBox::new(1.0, 2.0, 3.0, 4.0);
        let json = serde_json::to_string(&bbox).unwrap();
        assert_eq!(json, r#"{"left":1.0,"bottom":2.0,"right":3.0,"top":4.0}"#);
    }

    #[test]
    fn test_from_corners_any_direction() {
        // Dragged up and to the left
        let rect = DeviceRectangle::from_corners(
            DevicePoint::new(100.0, 100.0),
            DevicePoint::new(50.0, 40.0),
        );
        assert_eq!(rect, DeviceRectangle::new(50.0, 40.0, 50.0, 60.0));
    }

    #[test]
    fn test_new_normalizes_negative_size() {
        let rect = DeviceRectangle::new(100.0, 100.0, -30.0, -20.0);
        assert_eq!(rect.x, 70.0);
        assert_eq!(rect.y, 80.0);
        assert_eq!(rect.width, 30.0);
        assert_eq!(rect.height, 20.0);
    }

    #[test]
    fn test_clamp_to_surface() {
        let rect = DeviceRectangle::new(-10.0, 50.0, 100.0, 500.0);
        let clamped = rect.clamp_to(80.0, 300.0);
        assert_eq!(clamped, DeviceRectangle::new(0.0, 50.0, 80.0, 250.0));
    }

    #[test]
    fn test_clamp_fully_outside_collapses() {
        let rect = DeviceRectangle::new(500.0, 500.0, 10.0, 10.0);
        let clamped = rect.clamp_to(100.0, 100.0);
        assert!(clamped.is_empty());
    }

    #[test]
    fn test_zero_width_rect_is_empty() {
        let rect = DeviceRectangle::from_corners(
            DevicePoint::new(30.0, 10.0),
            DevicePoint::new(30.0, 90.0),
        );
        assert!(rect.is_empty());
        assert_eq!(rect.width, 0.0);
    }
}
