//! Overlay styling and tooltip placement settings.
use ingest::Severity;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OverlayError {
    #[error("invalid overlay config: {0}")]
    InvalidConfig(String),
}

/// Highlight color per severity tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityPalette {
    pub high: String,
    pub medium: String,
    pub low: String,
}

impl Default for SeverityPalette {
    fn default() -> Self {
        Self {
            high: "rgba(239, 68, 68, 0.35)".into(),
            medium: "rgba(245, 158, 11, 0.35)".into(),
            low: "rgba(59, 130, 246, 0.30)".into(),
        }
    }
}

impl SeverityPalette {
    pub fn color(&self, severity: Severity) -> &str {
        match severity {
            Severity::High => &self.high,
            Severity::Medium => &self.medium,
            Severity::Low => &self.low,
        }
    }
}

/// Tooltip geometry, in container pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipConfig {
    pub width: f64,
    /// Vertical gap between the anchor rectangle and the tooltip.
    pub gap: f64,
    /// The tooltip top never goes above this.
    pub min_top: f64,
    /// Horizontal distance kept from the viewport edges.
    pub edge_padding: f64,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            width: 320.0,
            gap: 6.0,
            min_top: 8.0,
            edge_padding: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayConfig {
    pub version: u32,
    #[serde(default)]
    pub palette: SeverityPalette,
    #[serde(default)]
    pub tooltip: TooltipConfig,
    /// Coalesce scroll and resize recomputes into one per animation frame.
    #[serde(default = "OverlayConfig::default_throttle")]
    pub throttle_to_frames: bool,
}

impl OverlayConfig {
    pub const fn default_throttle() -> bool {
        true
    }

    pub fn validate(&self) -> Result<(), OverlayError> {
        if self.version == 0 {
            return Err(OverlayError::InvalidConfig("version must be >= 1".into()));
        }
        for (name, color) in [
            ("high", &self.palette.high),
            ("medium", &self.palette.medium),
            ("low", &self.palette.low),
        ] {
            if color.trim().is_empty() {
                return Err(OverlayError::InvalidConfig(format!(
                    "palette.{name} must not be empty"
                )));
            }
        }
        let tooltip = &self.tooltip;
        if !(tooltip.width.is_finite() && tooltip.width > 0.0) {
            return Err(OverlayError::InvalidConfig(
                "tooltip.width must be positive".into(),
            ));
        }
        for (name, value) in [
            ("gap", tooltip.gap),
            ("min_top", tooltip.min_top),
            ("edge_padding", tooltip.edge_padding),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(OverlayError::InvalidConfig(format!(
                    "tooltip.{name} must be >= 0"
                )));
            }
        }
        Ok(())
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            version: 1,
            palette: SeverityPalette::default(),
            tooltip: TooltipConfig::default(),
            throttle_to_frames: Self::default_throttle(),
        }
    }
}
