//! Target-based status classification

use serde::{Deserialize, Serialize};

/// Achievement ratio at or above which a value is Excellent
pub const EXCELLENT_RATIO: f64 = 1.00;
/// Achievement ratio at or above which a value is Good
pub const GOOD_RATIO: f64 = 0.81;
/// Achievement ratio at or above which a value is Warning
pub const WARNING_RATIO: f64 = 0.51;

/// Default tolerance for the summary table bands (20% off the target)
pub const DEFAULT_TOLERANCE: f64 = 0.2;

/// Whether higher or lower values are favourable for a KPI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    /// Higher is better (efficiency, GPS usage)
    Ascending,
    /// Lower is better (idle engine, maneuver time)
    Descending,
}

/// Four-tier status band plus a neutral band for degenerate input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusBand {
    Excellent,
    Good,
    Warning,
    Critical,
    Neutral,
}

impl StatusBand {
    /// Stable label used by the rendering collaborator
    pub fn label(&self) -> &'static str {
        match self {
            StatusBand::Excellent => "excellent",
            StatusBand::Good => "good",
            StatusBand::Warning => "warning",
            StatusBand::Critical => "critical",
            StatusBand::Neutral => "neutral",
        }
    }

    /// Colour for this band in the given palette
    pub fn color<'a>(&self, palette: &'a Palette) -> &'a str {
        match self {
            StatusBand::Excellent => &palette.green,
            StatusBand::Good => &palette.light_green,
            StatusBand::Warning => &palette.orange,
            StatusBand::Critical => &palette.red,
            StatusBand::Neutral => &palette.neutral,
        }
    }
}

/// Report colour palette
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Palette {
    pub green: String,
    pub light_green: String,
    pub orange: String,
    pub red: String,
    pub neutral: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            green: "#48BB78".to_string(),
            light_green: "#9ACD32".to_string(),
            orange: "#FF8C00".to_string(),
            red: "#E53E3E".to_string(),
            neutral: "#000000".to_string(),
        }
    }
}

/// Achievement ratio of `value` against `target`.
///
/// Returns `None` when the target is zero or either input is not finite.
pub fn achievement_ratio(value: f64, target: f64, direction: Direction) -> Option<f64> {
    if !value.is_finite() || !target.is_finite() || target == 0.0 {
        return None;
    }

    let ratio = match direction {
        Direction::Ascending => value / target,
        Direction::Descending => {
            if value <= target {
                1.0
            } else {
                target / value
            }
        }
    };

    ratio.is_finite().then_some(ratio)
}

/// Classify a value against its target
pub fn classify(value: f64, target: f64, direction: Direction) -> StatusBand {
    match achievement_ratio(value, target, direction) {
        None => StatusBand::Neutral,
        Some(r) if r >= EXCELLENT_RATIO => StatusBand::Excellent,
        Some(r) if r >= GOOD_RATIO => StatusBand::Good,
        Some(r) if r >= WARNING_RATIO => StatusBand::Warning,
        Some(_) => StatusBand::Critical,
    }
}

/// Whether a value meets its target in the given direction.
///
/// A zero or non-finite target is never met.
pub fn meets_target(value: f64, target: f64, direction: Direction) -> bool {
    if !value.is_finite() || !target.is_finite() || target == 0.0 {
        return false;
    }

    match direction {
        Direction::Ascending => value >= target,
        Direction::Descending => value <= target,
    }
}

/// Three-tier band used by the per-fleet summary table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToleranceBand {
    OnTarget,
    NearTarget,
    OffTarget,
    Neutral,
}

/// Classify with a relative tolerance around the target.
///
/// Ascending values within `target * (1 - tolerance)` are near the target,
/// descending values within `target * (1 + tolerance)`.
pub fn classify_with_tolerance(
    value: f64,
    target: f64,
    direction: Direction,
    tolerance: f64,
) -> ToleranceBand {
    if !value.is_finite() || !target.is_finite() || !tolerance.is_finite() {
        return ToleranceBand::Neutral;
    }
    if target == 0.0 {
        return ToleranceBand::Neutral;
    }

    if meets_target(value, target, direction) {
        return ToleranceBand::OnTarget;
    }

    let near = match direction {
        Direction::Ascending => value >= target * (1.0 - tolerance),
        Direction::Descending => value <= target * (1.0 + tolerance),
    };

    if near {
        ToleranceBand::NearTarget
    } else {
        ToleranceBand::OffTarget
    }
}
