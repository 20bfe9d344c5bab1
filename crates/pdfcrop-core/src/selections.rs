//! Per-page crop boxes for the loaded document

use crate::geometry::PageBoundingBox;
use std::collections::BTreeMap;

/// Zero-based page index -> crop box
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSelections {
    boxes: BTreeMap<usize, PageBoundingBox>,
}

impl PageSelections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a box for a page. A zero-area box counts as "no selection" and
    /// removes any box the page had. Returns whether a box is now stored.
    pub fn record(&mut self, page: usize, bbox: PageBoundingBox) -> bool {
        let bbox = bbox.normalized();
        if bbox.is_empty() || !bbox.is_finite() {
            self.boxes.remove(&page);
            return false;
        }
        self.boxes.insert(page, bbox);
        true
    }

    pub fn get(&self, page: usize) -> Option<PageBoundingBox> {
        self.boxes.get(&page).copied()
    }

    pub fn remove(&mut self, page: usize) -> Option<PageBoundingBox> {
        self.boxes.remove(&page)
    }

    pub fn clear(&mut self) {
        self.boxes.clear();
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn pages(&self) -> impl Iterator<Item = usize> + '_ {
        self.boxes.keys().copied()
    }

    pub fn as_map(&self) -> &BTreeMap<usize, PageBoundingBox> {
        &self.boxes
    }
}
