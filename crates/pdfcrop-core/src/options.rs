//! Crop options gathered from the form controls

use crate::error::CropError;
use serde::{Deserialize, Serialize};

/// Extra space around the crop box, in PDF points (negative values cut into it)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margins {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl Margins {
    pub fn uniform(value: f64) -> Self {
        Self {
            left: value,
            bottom: value,
            right: value,
            top: value,
        }
    }

    /// Parse the four margin input fields. Blank fields count as 0.
    ///
    /// # Errors
    /// Returns `InvalidMargin` for text that is not a finite number
    pub fn parse(left: &str, bottom: &str, right: &str, top: &str) -> Result<Self, CropError> {
        Ok(Self {
            left: parse_margin(left)?,
            bottom: parse_margin(bottom)?,
            right: parse_margin(right)?,
            top: parse_margin(top)?,
        })
    }
}

fn parse_margin(input: &str) -> Result<f64, CropError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(0.0);
    }
    match input.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CropError::InvalidMargin(input.to_string())),
    }
}

/// Options handed to the external crop function
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropOptions {
    pub margins: Margins,
    /// Shrink pages without a manual box to their detected content
    pub shrink_to_content: bool,
    /// Clip drawing outside the crop box instead of only hiding it
    pub clip_content: bool,
}
