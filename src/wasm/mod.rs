//! WASM bindings for the report engine
//!
//! The plan crosses the bridge as JSON; timeline geometry, the bulkiest part,
//! is also exposed as flat buffers read straight from linear memory.

pub mod flat_buffer;

use crate::error::{ReportError, ReportResult};
use crate::layout::{plan, LayoutCounts};
use crate::metrics::{classify, Direction};
use crate::report::{export, JsonRenderer};
use crate::{ReportConfig, ReportEngine, ReportOptions, ReportPlan};
use flat_buffer::TimelineBuffer;
use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn to_js_error(err: ReportError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// WASM-exposed report wrapper
#[wasm_bindgen]
pub struct WasmReport {
    plan: ReportPlan,
    timelines: TimelineBuffer,
}

#[wasm_bindgen]
impl WasmReport {
    /// Plan a report.
    ///
    /// `options_json` holds `{ period, overrides }`, `config_toml` a
    /// configuration file's content. A `seed` makes filler rows reproducible.
    #[wasm_bindgen(constructor)]
    pub fn new(
        input_json: &str,
        options_json: Option<String>,
        config_toml: Option<String>,
        seed: Option<u64>,
    ) -> Result<WasmReport, JsValue> {
        Self::build(
            input_json,
            options_json.as_deref(),
            config_toml.as_deref(),
            seed,
        )
        .map_err(to_js_error)
    }

    /// Full plan as JSON
    #[wasm_bindgen(js_name = planJson)]
    pub fn plan_json(&self) -> Result<String, JsValue> {
        let bytes = export(&self.plan, &mut JsonRenderer::default()).map_err(to_js_error)?;
        String::from_utf8(bytes).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn title(&self) -> String {
        self.plan.title.clone()
    }

    #[wasm_bindgen(getter, js_name = fileName)]
    pub fn file_name(&self) -> String {
        self.plan.file_name.clone()
    }

    #[wasm_bindgen(getter, js_name = pageCount)]
    pub fn page_count(&self) -> usize {
        self.plan.pages.len()
    }

    // Timeline flat buffer accessors

    #[wasm_bindgen(js_name = timelineU32Ptr)]
    pub fn timeline_u32_ptr(&self) -> u32 {
        self.timelines.u32_ptr()
    }

    #[wasm_bindgen(js_name = timelineU32Len)]
    pub fn timeline_u32_len(&self) -> u32 {
        self.timelines.u32_len()
    }

    #[wasm_bindgen(js_name = timelineF32Ptr)]
    pub fn timeline_f32_ptr(&self) -> u32 {
        self.timelines.f32_ptr()
    }

    #[wasm_bindgen(js_name = timelineF32Len)]
    pub fn timeline_f32_len(&self) -> u32 {
        self.timelines.f32_len()
    }

    #[wasm_bindgen(js_name = timelineTextPtr)]
    pub fn timeline_text_ptr(&self) -> u32 {
        self.timelines.text_ptr()
    }

    #[wasm_bindgen(js_name = timelineTextLen)]
    pub fn timeline_text_len(&self) -> u32 {
        self.timelines.text_len()
    }
}

impl WasmReport {
    fn build(
        input_json: &str,
        options_json: Option<&str>,
        config_toml: Option<&str>,
        seed: Option<u64>,
    ) -> ReportResult<Self> {
        let options: ReportOptions = match options_json {
            Some(json) if !json.trim().is_empty() => serde_json::from_str(json)?,
            _ => ReportOptions::default(),
        };
        let config = match config_toml {
            Some(toml) => ReportConfig::from_toml_str(toml)?,
            None => ReportConfig::default(),
        };
        let engine = ReportEngine::new(config)?;

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let plan = engine.plan_json(input_json, &options, &mut rng)?;
        let timelines = TimelineBuffer::from_timelines(&plan.timelines);

        Ok(Self { plan, timelines })
    }

    pub fn plan(&self) -> &ReportPlan {
        &self.plan
    }
}

/// Layout mode for the wash / rollers / idle section with default capacities
#[wasm_bindgen(js_name = layoutMode)]
pub fn layout_mode(wash_rows: usize, roller_rows: usize, idle_rows: usize) -> String {
    let mode = plan(
        LayoutCounts::new(wash_rows, roller_rows, idle_rows),
        &ReportConfig::default().capacities,
    );
    serde_json::to_value(mode)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// Status band label of a value against its target
#[wasm_bindgen(js_name = classify)]
pub fn classify_value(value: f64, target: f64, higher_is_better: bool) -> String {
    let direction = if higher_is_better {
        Direction::Ascending
    } else {
        Direction::Descending
    };
    classify(value, target, direction).label().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = r#"{
        "metadata": { "date": "2025-05-10", "frente": "frente5" },
        "eficiencia_energetica": [{ "nome": "7032", "eficiencia": 60 }],
        "intervalos_operacao": [
            { "equipamento": "7032", "tipo": "Produtivo", "inicio": "06:00:00", "duracaoHoras": 2 }
        ]
    }"#;

    #[test]
    fn test_build_with_options_and_config() {
        let report = WasmReport::build(
            INPUT,
            Some(r#"{ "overrides": { "fleets": 3 } }"#),
            Some("offendersLimit = 3"),
            Some(7),
        )
        .unwrap();
        assert_eq!(report.plan().efficiency.len(), 3);
        assert_eq!(report.title(), "Relatório Diário de Frotas - Colhedoras Frente BP Ituiutaba");
        assert_eq!(report.timelines.u32_data[2], 1);
    }

    #[test]
    fn test_seed_is_reproducible() {
        let a = WasmReport::build(INPUT, Some(r#"{ "overrides": { "fleets": 4 } }"#), None, Some(9))
            .unwrap();
        let b = WasmReport::build(INPUT, Some(r#"{ "overrides": { "fleets": 4 } }"#), None, Some(9))
            .unwrap();
        assert_eq!(a.plan(), b.plan());
    }

    #[test]
    fn test_build_errors() {
        assert!(matches!(
            WasmReport::build("{", None, None, Some(1)),
            Err(ReportError::Input(_))
        ));
        assert!(matches!(
            WasmReport::build(INPUT, None, Some("tolerance = 2.0"), Some(1)),
            Err(ReportError::Config(_))
        ));
    }

    #[test]
    fn test_weekly_period_from_options() {
        let report =
            WasmReport::build(INPUT, Some(r#"{ "period": "semanal" }"#), None, Some(1)).unwrap();
        assert_eq!(report.plan().period, crate::Period::Weekly);
        assert_eq!(report.timelines.u32_data[2], 0);
        assert!(report.file_name().ends_with("04_05_2025-10_05_2025.pdf"));
    }

    #[test]
    fn test_free_functions() {
        assert_eq!(layout_mode(5, 1, 4), "singlePage");
        assert_eq!(layout_mode(0, 30, 5), "splitPaginatedCombined");
        assert_eq!(classify_value(95.0, 90.0, true), "excellent");
        assert_eq!(classify_value(8.0, 4.0, false), "critical");
        assert_eq!(classify_value(1.0, 0.0, true), "neutral");
    }
}
