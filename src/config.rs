//! Report engine configuration.
//!
//! Every threshold the engine uses has a default matching the printed report.
//! A TOML file may override any subset of them:
//!
//! ```toml
//! tolerance = 0.25
//!
//! [capacities]
//! pageCap = 30
//!
//! [directions]
//! averageSpeed = "ascending"
//! ```

use crate::error::{ReportError, ReportResult};
use crate::layout::{LayoutCapacities, TIMELINES_PER_PAGE};
use crate::metrics::{Direction, KpiDirectionRegistry, KpiId, Palette, DEFAULT_TOLERANCE};
use crate::timeline::TimelineScale;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tunable thresholds of the report engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportConfig {
    #[serde(default)]
    pub capacities: LayoutCapacities,
    #[serde(default)]
    pub timeline: TimelineScale,
    #[serde(default)]
    pub palette: Palette,
    /// Relative tolerance of the summary table bands
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Tolerance of the elevator hours column, looser than the others
    #[serde(default = "default_elevator_tolerance")]
    pub elevator_tolerance: f64,
    #[serde(default = "default_timelines_per_page")]
    pub timelines_per_page: usize,
    /// Offenders listed on the offenders chart
    #[serde(default = "default_offenders_limit")]
    pub offenders_limit: usize,
    /// Direction overrides per KPI
    #[serde(default)]
    pub directions: FxHashMap<KpiId, Direction>,
    /// Display names of known front codes
    #[serde(default = "default_front_names")]
    pub front_names: FxHashMap<String, String>,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_elevator_tolerance() -> f64 {
    0.5
}

fn default_front_names() -> FxHashMap<String, String> {
    let mut names = FxHashMap::default();
    names.insert("frente5".to_string(), "Frente BP Ituiutaba".to_string());
    names
}

fn default_timelines_per_page() -> usize {
    TIMELINES_PER_PAGE
}

fn default_offenders_limit() -> usize {
    5
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            capacities: LayoutCapacities::default(),
            timeline: TimelineScale::default(),
            palette: Palette::default(),
            tolerance: default_tolerance(),
            elevator_tolerance: default_elevator_tolerance(),
            timelines_per_page: default_timelines_per_page(),
            offenders_limit: default_offenders_limit(),
            directions: FxHashMap::default(),
            front_names: default_front_names(),
        }
    }
}

impl ReportConfig {
    /// Parse and validate a TOML configuration
    pub fn from_toml_str(content: &str) -> ReportResult<Self> {
        let config: ReportConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> ReportResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            ReportError::config(format!("Failed to read config file: {}", e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Reject values the planners cannot work with
    pub fn validate(&self) -> ReportResult<()> {
        let caps = &self.capacities;
        if caps.page_cap == 0 {
            return Err(ReportError::config("pageCap must be positive"));
        }
        if caps.single_page_rows == 0 || caps.shared_tables_rows == 0 || caps.colocated_rows == 0 {
            return Err(ReportError::config("row capacities must be positive"));
        }
        if self.timelines_per_page == 0 {
            return Err(ReportError::config("timelinesPerPage must be positive"));
        }
        for tolerance in [self.tolerance, self.elevator_tolerance] {
            if !(tolerance.is_finite() && (0.0..=1.0).contains(&tolerance)) {
                return Err(ReportError::config(format!(
                    "tolerance must lie in 0..=1, got {}",
                    tolerance
                )));
            }
        }

        let scale = &self.timeline;
        if !(scale.width.is_finite() && scale.width > 0.0) {
            return Err(ReportError::config("timeline width must be positive"));
        }
        if !(scale.bar_height > 0.0 && scale.bar_height <= scale.lane_height) {
            return Err(ReportError::config(
                "timeline bar height must be positive and fit its lane",
            ));
        }
        if !(scale.min_bar_minutes.is_finite() && scale.min_bar_minutes > 0.0) {
            return Err(ReportError::config("minimum bar length must be positive"));
        }
        Ok(())
    }

    /// Direction registry with this configuration's overrides applied
    pub fn registry(&self) -> KpiDirectionRegistry {
        let mut registry = KpiDirectionRegistry::new();
        for (kpi, direction) in &self.directions {
            registry.set(*kpi, *direction);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ReportConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.capacities.page_cap, 28);
        assert_eq!(config.offenders_limit, 5);
        assert_eq!(
            config.front_names.get("frente5").map(String::as_str),
            Some("Frente BP Ituiutaba")
        );
    }

    #[test]
    fn test_partial_toml() {
        let config = ReportConfig::from_toml_str(
            r##"
            tolerance = 0.25

            [capacities]
            pageCap = 30

            [palette]
            red = "#FF0000"

            [directions]
            averageSpeed = "ascending"
            "##,
        )
        .unwrap();

        assert_eq!(config.tolerance, 0.25);
        assert_eq!(config.capacities.page_cap, 30);
        assert_eq!(config.capacities.colocated_rows, 21);
        assert_eq!(config.palette.red, "#FF0000");
        assert_eq!(config.palette.green, "#48BB78");
        assert_eq!(config.timeline.width, 1440.0);

        let registry = config.registry();
        assert_eq!(registry.direction(KpiId::AverageSpeed), Direction::Ascending);
        assert_eq!(registry.direction(KpiId::IdleEngine), Direction::Descending);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(ReportConfig::from_toml_str("").unwrap(), ReportConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = ReportConfig::from_toml_str("[capacities]\npageCap = 0").unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));

        let err = ReportConfig::from_toml_str("tolerance = 1.5").unwrap_err();
        assert!(err.to_string().contains("tolerance"));

        let err = ReportConfig::from_toml_str("[timeline]\nbarHeight = 80.0").unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let err = ReportConfig::from_toml_str("capacities = [").unwrap_err();
        assert!(matches!(err, ReportError::ConfigFile(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = ReportConfig::from_file("/nonexistent/report.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
