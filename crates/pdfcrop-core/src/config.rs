//! Front-end configuration
//!
//! Every field has a default, so an empty object (or no config at all) gives
//! a working setup. The page host may override any subset as JSON.

use crate::error::CropError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Render scale used right after a document is loaded
    pub initial_scale: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub zoom_step: f64,
    /// Thumbnail width in pixels
    pub thumbnail_width: f64,
    /// Side length of the selection corner handles in pixels
    pub handle_size: f64,
    /// PDF.js worker script URL
    pub worker_src: String,
    /// One of trace, debug, info, warn, error
    pub log_level: String,
    pub elements: ElementIds,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            initial_scale: 1.5,
            min_scale: 0.25,
            max_scale: 4.0,
            zoom_step: 0.25,
            thumbnail_width: 120.0,
            handle_size: 8.0,
            worker_src: "https://cdn.jsdelivr.net/npm/pdfjs-dist@3.11.174/build/pdf.worker.min.js"
                .to_string(),
            log_level: "info".to_string(),
            elements: ElementIds::default(),
        }
    }
}

impl AppConfig {
    /// Parse and validate a JSON configuration
    ///
    /// # Errors
    /// Returns `Config` if the JSON is malformed or a value is out of range
    pub fn from_json(json: &str) -> Result<Self, CropError> {
        let config: AppConfig =
            serde_json::from_str(json).map_err(|e| CropError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Returns `Config` describing the first invalid value
    pub fn validate(&self) -> Result<(), CropError> {
        for (name, value) in [
            ("initialScale", self.initial_scale),
            ("minScale", self.min_scale),
            ("maxScale", self.max_scale),
            ("zoomStep", self.zoom_step),
            ("thumbnailWidth", self.thumbnail_width),
            ("handleSize", self.handle_size),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CropError::Config(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        if self.min_scale > self.max_scale {
            return Err(CropError::Config(format!(
                "minScale {} is greater than maxScale {}",
                self.min_scale, self.max_scale
            )));
        }

        if self.initial_scale < self.min_scale || self.initial_scale > self.max_scale {
            return Err(CropError::Config(format!(
                "initialScale {} is outside {}..={}",
                self.initial_scale, self.min_scale, self.max_scale
            )));
        }

        if !matches!(
            self.log_level.to_ascii_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        ) {
            return Err(CropError::Config(format!(
                "Unknown logLevel: {}",
                self.log_level
            )));
        }

        Ok(())
    }
}

/// DOM ids of the page controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementIds {
    pub file_input: String,
    pub viewer_container: String,
    pub page_canvas: String,
    pub overlay_canvas: String,
    pub thumbnails: String,
    pub prev_button: String,
    pub next_button: String,
    pub page_label: String,
    pub zoom_in_button: String,
    pub zoom_out_button: String,
    pub zoom_fit_button: String,
    pub zoom_label: String,
    pub detect_button: String,
    pub clear_button: String,
    pub clear_all_button: String,
    pub crop_button: String,
    pub margin_left: String,
    pub margin_bottom: String,
    pub margin_right: String,
    pub margin_top: String,
    pub shrink_checkbox: String,
    pub clip_checkbox: String,
    pub page_range: String,
    pub status: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            file_input: "file-input".to_string(),
            viewer_container: "viewer".to_string(),
            page_canvas: "page-canvas".to_string(),
            overlay_canvas: "overlay-canvas".to_string(),
            thumbnails: "thumbnails".to_string(),
            prev_button: "prev-page".to_string(),
            next_button: "next-page".to_string(),
            page_label: "page-label".to_string(),
            zoom_in_button: "zoom-in".to_string(),
            zoom_out_button: "zoom-out".to_string(),
            zoom_fit_button: "zoom-fit".to_string(),
            zoom_label: "zoom-label".to_string(),
            detect_button: "detect-bbox".to_string(),
            clear_button: "clear-selection".to_string(),
            clear_all_button: "clear-all-selections".to_string(),
            crop_button: "crop".to_string(),
            margin_left: "margin-left".to_string(),
            margin_bottom: "margin-bottom".to_string(),
            margin_right: "margin-right".to_string(),
            margin_top: "margin-top".to_string(),
            shrink_checkbox: "shrink-to-content".to_string(),
            clip_checkbox: "clip-content".to_string(),
            page_range: "page-range".to_string(),
            status: "status".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = AppConfig::from_json(
            r#"{"initialScale": 2.0, "elements": {"cropButton": "go"}}"#,
        )
        .unwrap();
        assert_eq!(config.initial_scale, 2.0);
        assert_eq!(config.elements.crop_button, "go");
        assert_eq!(config.elements.file_input, "file-input");
        assert_eq!(config.max_scale, 4.0);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            AppConfig::from_json("{not json"),
            Err(CropError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_initial_outside_range() {
        let err = AppConfig::from_json(r#"{"initialScale": 10.0}"#).unwrap_err();
        assert!(err.to_string().contains("initialScale"));
    }

    #[test]
    fn test_rejects_non_positive_values() {
        assert!(AppConfig::from_json(r#"{"zoomStep": 0}"#).is_err());
        assert!(AppConfig::from_json(r#"{"thumbnailWidth": -5}"#).is_err());
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        assert!(AppConfig::from_json(r#"{"logLevel": "loud"}"#).is_err());
        assert!(AppConfig::from_json(r#"{"logLevel": "DEBUG"}"#).is_ok());
    }
}
