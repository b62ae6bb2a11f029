//! Harvest report: planning engine for harvester fleet reports
//!
//! This crate turns one day (or week) of harvester telemetry into a fully
//! classified, paginated report plan:
//! - Target classification with per-KPI directions
//! - Averages that ignore missing (zero) readings
//! - Series normalized to a requested fleet count
//! - 24-hour operation timelines as positioned geometry
//! - Rule-table pagination of the wash / rollers / idle section

pub mod config;
pub mod error;
pub mod layout;
pub mod metrics;
pub mod report;
pub mod series;
pub mod timeline;
pub mod wasm;

// Re-export WASM types for direct use
pub use wasm::WasmReport;

// Re-export primary types
pub use config::ReportConfig;
pub use error::{ReportError, ReportResult};
pub use layout::{plan as plan_layout, LayoutCapacities, LayoutCounts, LayoutMode, PageDescriptor};
pub use metrics::{classify, Direction, KpiId, StatusBand, Targets};
pub use report::{assemble, JsonRenderer, PageRenderer, Period, ReportInput, ReportOptions, ReportPlan};
pub use timeline::{IntervalCategory, TimelineGeometry, TimelineScale};

use rand::Rng;
use serde::Serialize;
use std::path::Path;

/// Chart rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

/// The report engine: a validated configuration plus the assembly entry points
pub struct ReportEngine {
    config: ReportConfig,
}

impl Default for ReportEngine {
    fn default() -> Self {
        Self {
            config: ReportConfig::default(),
        }
    }
}

impl ReportEngine {
    /// Create an engine, rejecting configurations the planners cannot use
    pub fn new(config: ReportConfig) -> ReportResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create an engine from a TOML configuration file
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> ReportResult<Self> {
        Ok(Self {
            config: ReportConfig::from_file(path)?,
        })
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Plan a report from parsed input
    pub fn plan<R: Rng + ?Sized>(
        &self,
        input: &ReportInput,
        options: &ReportOptions,
        rng: &mut R,
    ) -> ReportPlan {
        assemble(input, options, &self.config, rng)
    }

    /// Parse the input JSON and plan a report from it
    pub fn plan_json<R: Rng + ?Sized>(
        &self,
        json: &str,
        options: &ReportOptions,
        rng: &mut R,
    ) -> ReportResult<ReportPlan> {
        let input = ReportInput::from_json(json)?;
        Ok(self.plan(&input, options, rng))
    }

    /// Hand a plan to a renderer
    pub fn export<W: PageRenderer>(&self, plan: &ReportPlan, renderer: &mut W) -> ReportResult<Vec<u8>> {
        report::export(plan, renderer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_engine_rejects_invalid_config() {
        let mut config = ReportConfig::default();
        config.timelines_per_page = 0;
        assert!(matches!(ReportEngine::new(config), Err(ReportError::Config(_))));
    }

    #[test]
    fn test_plan_json() {
        let engine = ReportEngine::default();
        let plan = engine
            .plan_json(
                r#"{ "metadata": { "date": "2025-05-10", "frente": "Frente 2" },
                     "eficiencia_energetica": [{ "nome": "7032", "eficiencia": 75 }] }"#,
                &ReportOptions::default(),
                &mut StdRng::seed_from_u64(3),
            )
            .unwrap();
        assert_eq!(plan.title, "Relatório Diário de Frotas - Colhedoras Frente 2");
        assert_eq!(plan.efficiency.len(), 1);
        assert_eq!(plan.efficiency[0].band, StatusBand::Excellent);
    }

    #[test]
    fn test_plan_json_rejects_malformed_input() {
        let engine = ReportEngine::default();
        let err = engine
            .plan_json("[", &ReportOptions::default(), &mut StdRng::seed_from_u64(3))
            .unwrap_err();
        assert!(matches!(err, ReportError::Input(_)));
    }

    #[test]
    fn test_export_through_engine() {
        let engine = ReportEngine::default();
        let plan = engine.plan(
            &ReportInput::default(),
            &ReportOptions::default(),
            &mut StdRng::seed_from_u64(3),
        );
        let bytes = engine.export(&plan, &mut JsonRenderer { pretty: true }).unwrap();
        assert!(bytes.starts_with(b"{\n"));
    }
}
