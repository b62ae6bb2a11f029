//! Browser tests for the WASM bridge
#![cfg(target_arch = "wasm32")]

use harvest_report::wasm::flat_buffer::MAGIC;
use harvest_report::wasm::{classify_value, layout_mode};
use harvest_report::WasmReport;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const INPUT: &str = r#"{
    "metadata": { "date": "2025-05-10", "frente": "frente5" },
    "eficiencia_energetica": [{ "nome": "7032", "eficiencia": 72 }],
    "intervalos_operacao": [
        { "equipamento": "7032", "tipo": "Produtivo", "inicio": "06:00:00", "duracaoHoras": 2 }
    ]
}"#;

#[wasm_bindgen_test]
fn plan_round_trips_through_json() {
    let report = WasmReport::new(INPUT, None, None, Some(1)).unwrap();
    let json = report.plan_json().unwrap();
    assert!(json.contains("\"layoutMode\":\"singlePage\""));
    assert_eq!(report.page_count(), 9);
}

#[wasm_bindgen_test]
fn timeline_buffer_is_readable_from_memory() {
    let report = WasmReport::new(INPUT, None, None, Some(1)).unwrap();
    assert!(report.timeline_u32_len() > 0);
    let header = unsafe {
        std::slice::from_raw_parts(
            report.timeline_u32_ptr() as *const u32,
            report.timeline_u32_len() as usize,
        )
    };
    assert_eq!(header[0], MAGIC);
    assert_eq!(header[2], 1);
}

#[wasm_bindgen_test]
fn entropy_seeded_report_builds() {
    // No seed: filler rows come from the browser's crypto source
    let report = WasmReport::new(
        INPUT,
        Some(r#"{ "overrides": { "fleets": 5 } }"#.to_string()),
        None,
        None,
    )
    .unwrap();
    assert_eq!(report.page_count(), 9);
}

#[wasm_bindgen_test]
fn invalid_input_is_a_js_error() {
    assert!(WasmReport::new("{", None, None, None).is_err());
}

#[wasm_bindgen_test]
fn free_functions() {
    assert_eq!(layout_mode(12, 1, 4), "splitMotorOnly");
    assert_eq!(classify_value(3.0, 4.0, false), "excellent");
}
