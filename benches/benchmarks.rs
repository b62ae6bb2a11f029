//! Benchmarks for the report engine

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use harvest_report::report::{assemble, ReportOptions, RowOverrides};
use harvest_report::series::{normalize, FleetRow};
use harvest_report::timeline::{build_geometry, IntervalCategory, IntervalRecord, TimelineScale};
use harvest_report::wasm::flat_buffer::TimelineBuffer;
use harvest_report::{classify, plan_layout, Direction, LayoutCapacities, LayoutCounts, ReportConfig, ReportInput};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn fleet_input(fleets: usize) -> ReportInput {
    let rows: Vec<String> = (0..fleets)
        .map(|i| {
            format!(
                r#"{{ "nome": "{}", "eficiencia": {}, "horasMotor": 18, "horasElevador": 11,
                     "velocidade": 6.2, "percentual": 3.5, "porcentagem": 92, "disponibilidade": 88 }}"#,
                7000 + i,
                60 + i % 20
            )
        })
        .collect();
    let rows = rows.join(",");
    let intervals: Vec<String> = (0..fleets)
        .flat_map(|i| {
            (0..12).map(move |h| {
                let tipo = ["Produtivo", "Disponível", "Manutenção", "Falta de Informação"][h % 4];
                format!(
                    r#"{{ "equipamento": "{}", "tipo": "{}", "inicio": "{:02}:00:00", "duracaoHoras": 1.5 }}"#,
                    7000 + i,
                    tipo,
                    h * 2
                )
            })
        })
        .collect();

    let json = format!(
        r#"{{ "metadata": {{ "date": "2025-05-10", "frente": "frente5" }},
             "eficiencia_energetica": [{rows}], "uso_gps": [{rows}], "media_velocidade": [{rows}],
             "motor_ocioso": [{rows}], "disponibilidade_mecanica": [{rows}],
             "producao_total": [{{ "valor": 12000 }}],
             "intervalos_operacao": [{}] }}"#,
        intervals.join(",")
    );
    ReportInput::from_json(&json).unwrap()
}

fn intervals(count: usize) -> Vec<IntervalRecord> {
    (0..count)
        .map(|i| IntervalRecord {
            equipment: "7032".to_string(),
            category: IntervalCategory::LANES[i % 4],
            start: format!("{:02}:{:02}:00", (i / 4) % 24, (i * 7) % 60),
            duration_hours: 0.25 + (i % 5) as f64 * 0.3,
        })
        .collect()
}

fn bench_classify(c: &mut Criterion) {
    c.bench_function("classify_1000_values", |b| {
        b.iter(|| {
            for i in 0..1000 {
                black_box(classify(black_box(i as f64 * 0.1), 70.0, Direction::Ascending));
            }
        });
    });
}

fn bench_layout_plan(c: &mut Criterion) {
    let capacities = LayoutCapacities::default();
    c.bench_function("plan_layout_grid", |b| {
        b.iter(|| {
            for a in 0..20 {
                for t in (0..60).step_by(3) {
                    black_box(plan_layout(LayoutCounts::new(a, t, 12), &capacities));
                }
            }
        });
    });
}

fn bench_normalize(c: &mut Criterion) {
    let base: Vec<FleetRow> = (0..10).map(|i| FleetRow::named(format!("{}", 7000 + i))).collect();
    let names: Vec<String> = base.iter().map(|r| r.name.clone()).collect();
    c.bench_function("normalize_to_50_rows", |b| {
        let mut rng = StdRng::seed_from_u64(42);
        b.iter(|| {
            black_box(normalize(
                &base,
                50,
                &names,
                |name: &str, _: usize| FleetRow::named(name),
                &mut rng,
            ));
        });
    });
}

fn bench_timeline_geometry(c: &mut Criterion) {
    let records = intervals(96);
    let scale = TimelineScale::default();
    c.bench_function("timeline_geometry_96_intervals", |b| {
        b.iter(|| {
            black_box(build_geometry("7032", black_box(&records), &scale));
        });
    });
}

fn bench_timeline_buffer(c: &mut Criterion) {
    let scale = TimelineScale::default();
    let timelines: Vec<_> = (0..16)
        .map(|i| build_geometry(&format!("70{:02}", i), &intervals(48), &scale))
        .collect();
    c.bench_function("timeline_buffer_16_equipment", |b| {
        let mut buf = TimelineBuffer::new();
        b.iter(|| {
            buf.encode(black_box(&timelines));
        });
    });
}

fn bench_assemble(c: &mut Criterion) {
    let config = ReportConfig::default();
    let small = fleet_input(8);
    let large = fleet_input(40);

    c.bench_function("assemble_8_fleets", |b| {
        let mut rng = StdRng::seed_from_u64(1);
        b.iter(|| black_box(assemble(&small, &ReportOptions::default(), &config, &mut rng)));
    });

    c.bench_function("assemble_40_fleets", |b| {
        let mut rng = StdRng::seed_from_u64(1);
        b.iter(|| black_box(assemble(&large, &ReportOptions::default(), &config, &mut rng)));
    });

    let padded = ReportOptions {
        overrides: RowOverrides {
            fleets: Some(50),
            wash_rows: Some(30),
            roller_rows: Some(60),
        },
        ..ReportOptions::default()
    };
    c.bench_function("assemble_padded_to_limits", |b| {
        let mut rng = StdRng::seed_from_u64(1);
        b.iter(|| black_box(assemble(&small, &padded, &config, &mut rng)));
    });
}

criterion_group!(
    benches,
    bench_classify,
    bench_layout_plan,
    bench_normalize,
    bench_timeline_geometry,
    bench_timeline_buffer,
    bench_assemble,
);
criterion_main!(benches);
