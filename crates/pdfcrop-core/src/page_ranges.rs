//! Page range parsing for the crop page selection field
//!
//! Input is 1-based ("1-3, 5"), output is zero-based page indices.

use crate::error::CropError;
use std::collections::BTreeSet;

/// Page numbers above this are ignored so a typo like "1-99999999" can't stall the UI
pub const MAX_PAGE_NUMBER: usize = 100_000;

/// Parse a page range string into sorted, deduplicated zero-based page indices.
///
/// Returns `None` ("all pages") when the input is blank or no token can be
/// parsed at all. A reversed range such as "5-3" parses but selects nothing.
///
/// # Examples
/// ```
/// use pdfcrop_core::page_ranges::parse_page_range;
///
/// assert_eq!(parse_page_range("1-3,5"), Some(vec![0, 1, 2, 4]));
/// assert_eq!(parse_page_range(""), None);
/// assert_eq!(parse_page_range("5-3"), Some(vec![]));
/// ```
pub fn parse_page_range(input: &str) -> Option<Vec<usize>> {
    let mut pages = BTreeSet::new();
    let mut recognized = false;

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((start, end)) = part.split_once('-') {
            // Range like "1-3"
            let bounds = (start.trim().parse::<usize>(), end.trim().parse::<usize>());
            if let (Ok(start), Ok(end)) = bounds {
                recognized = true;
                for page in start.max(1)..=end.min(MAX_PAGE_NUMBER) {
                    pages.insert(page - 1);
                }
            }
        } else if let Ok(page) = part.parse::<usize>() {
            // Single page like "5"
            recognized = true;
            if (1..=MAX_PAGE_NUMBER).contains(&page) {
                pages.insert(page - 1);
            }
        }
    }

    if recognized {
        Some(pages.into_iter().collect())
    } else {
        None
    }
}

/// Resolve the page range field against a document of `total_pages` pages.
///
/// `Ok(None)` means every page. A range that selects nothing or reaches past
/// the last page is an error.
pub fn select_pages(input: &str, total_pages: usize) -> Result<Option<Vec<usize>>, CropError> {
    let Some(pages) = parse_page_range(input) else {
        return Ok(None);
    };
    if pages.is_empty() {
        return Err(CropError::EmptyPageRange(input.trim().to_string()));
    }
    if let Some(&bad) = pages.iter().find(|&&page| page >= total_pages) {
        return Err(CropError::invalid_page(bad, total_pages));
    }
    Ok(Some(pages))
}

/// Inline feedback for the page range field: the message crop would fail
/// with, or None when crop accepts the input.
pub fn validate_page_range(input: &str, total_pages: usize) -> Option<String> {
    select_pages(input, total_pages).err().map(|err| err.to_string())
}
