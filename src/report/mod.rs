//! Report assembly: from raw input to an ordered, classified page plan
//!
//! Page order:
//! 1. energy efficiency + elevator hours
//! 2. tonnage per fleet + GPS usage
//! 3. GPS usage map (daily)
//! 4. worked area map (daily)
//! 5. average speed + maneuvers
//! 6. wash / rollers / idle engine, spread per [`LayoutMode`]
//! 7. top offenders + mechanical availability
//! 8. operation intervals, a few equipment per page (daily)
//! 9. summary cards and table

pub mod input;
mod render;
mod sections;
mod title;

pub use input::{EventRow, Metadata, NamedValue, OffenderRecord, ReportInput};
pub use render::{export, JsonRenderer, PageRenderer};
pub use sections::{
    chart_rows, format_kpi, idle_rows, maneuver_chart, maneuver_scale, operation_name,
    summary_rows, tonnage, top_offenders, ChartRow, Classifier, IdleRow, ManeuverBar,
    ManeuverChart, OffenderRow, SummaryCell, SummaryRow, SummarySources, Tonnage, TonnageRow,
};
pub use title::{
    date_label, date_range, file_name, front_name, parse_report_date, report_title, Period,
};

use crate::config::ReportConfig;
use crate::layout::{
    plan, timeline_pages, BlockId, LayoutCounts, LayoutMode, PageBlock, PageBlocks,
    PageDescriptor,
};
use crate::metrics::{KpiCard, KpiHeadline, KpiId};
use crate::series::{
    cycle_rows, fleet_names, normalize, FleetRow, ManeuverRow, MAX_SERIES_ROWS, MAX_TABLE_ROWS,
};
use crate::timeline::{build_geometry, group_by_equipment, TimelineGeometry};
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::smallvec;

/// First equipment id of padded wash rows
const WASH_FILLER_START: u32 = 8000;
/// First equipment id of padded roller rows
const ROLLER_FILLER_START: u32 = 9000;

/// Requested row counts that replace the real ones
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RowOverrides {
    /// Fleets per series, 1..=50
    pub fleets: Option<usize>,
    /// Wash table rows, 0..=100
    pub wash_rows: Option<usize>,
    /// Roller table rows, 0..=100
    pub roller_rows: Option<usize>,
}

impl RowOverrides {
    fn fleet_count(&self, real: usize) -> usize {
        match self.fleets {
            Some(n) => {
                let clamped = n.clamp(1, MAX_SERIES_ROWS);
                if clamped != n {
                    log::warn!("fleet override {} clamped to {}", n, clamped);
                }
                clamped
            }
            None => real,
        }
    }

    fn table_rows(requested: Option<usize>, label: &str) -> Option<usize> {
        requested.map(|n| {
            if n > MAX_TABLE_ROWS {
                log::warn!("{} override {} clamped to {}", label, n, MAX_TABLE_ROWS);
            }
            n.min(MAX_TABLE_ROWS)
        })
    }
}

/// How the report is generated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportOptions {
    pub period: Period,
    pub overrides: RowOverrides,
}

/// Everything a renderer needs to draw the report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPlan {
    pub title: String,
    pub date_label: String,
    pub file_name: String,
    pub front: String,
    pub period: Period,
    pub layout_mode: LayoutMode,
    pub layout_counts: LayoutCounts,
    pub pages: Vec<PageDescriptor>,
    pub headlines: Vec<KpiHeadline>,
    pub efficiency: Vec<ChartRow>,
    pub elevator_hours: Vec<ChartRow>,
    pub tonnage: Tonnage,
    pub gps_usage: Vec<ChartRow>,
    pub average_speed: Vec<ChartRow>,
    pub maneuvers: ManeuverChart,
    pub wash: Vec<EventRow>,
    pub rollers: Vec<EventRow>,
    pub idle_engine: Vec<IdleRow>,
    pub offenders: Vec<OffenderRow>,
    pub availability: Vec<ChartRow>,
    pub timelines: Vec<TimelineGeometry>,
    pub cards: Vec<KpiCard>,
    pub summary: Vec<SummaryRow>,
}

impl ReportPlan {
    /// Headline of a KPI
    pub fn headline(&self, kpi: KpiId) -> Option<&KpiHeadline> {
        self.headlines.iter().find(|h| h.kpi == kpi)
    }

    /// Pages that hold a given block
    pub fn pages_with(&self, id: BlockId) -> impl Iterator<Item = &PageDescriptor> {
        self.pages.iter().filter(move |page| page.contains_block(id))
    }
}

/// Accumulates pages with sequential indices under one header title
struct PageSink<'a> {
    title: &'a str,
    pages: Vec<PageDescriptor>,
}

impl<'a> PageSink<'a> {
    fn new(title: &'a str) -> Self {
        Self {
            title,
            pages: Vec::new(),
        }
    }

    fn push(&mut self, blocks: PageBlocks) -> &mut PageDescriptor {
        let index = self.pages.len();
        self.pages.push(PageDescriptor::new(index, self.title, blocks));
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }
}

/// Assemble the full report plan.
///
/// Never fails: absent data yields zero-valued, neutral sections. Filler rows
/// are only synthesized when overrides ask for more fleets than the input has.
pub fn assemble<R: Rng + ?Sized>(
    input: &ReportInput,
    options: &ReportOptions,
    config: &ReportConfig,
    rng: &mut R,
) -> ReportPlan {
    let period = options.period;
    let registry = config.registry();
    let classifier = Classifier {
        targets: &input.targets,
        registry: &registry,
        palette: &config.palette,
    };

    let front = front_name(
        input
            .front_name
            .as_deref()
            .or(input.metadata.front_name.as_deref()),
        input.metadata.front.as_deref(),
        &config.front_names,
    );
    let title = report_title(period, &front);
    let (_, end_date) = date_range(&input.metadata.date, period);

    // Per-fleet series
    let named = input.named_fleets();
    let count = options.overrides.fleet_count(named.len());
    let base_names: Vec<&str> = named.iter().map(|f| f.name.as_str()).collect();
    let names = fleet_names(&base_names, count);
    let fleet_fallback = |name: &str, _: usize| FleetRow::named(name);

    let fleets = normalize(&named, count, &names, fleet_fallback, rng);
    let gps: Vec<FleetRow> = input
        .gps_usage
        .iter()
        .filter(|row| !row.name.trim().is_empty())
        .cloned()
        .collect();
    let gps = normalize(&gps, count, &names, fleet_fallback, rng);
    let speed = normalize(&input.average_speed, count, &names, fleet_fallback, rng);
    let maneuver_rows = normalize(
        &input.maneuvers,
        count,
        &names,
        |name: &str, _: usize| ManeuverRow {
            fleet: name.to_string(),
            ..ManeuverRow::default()
        },
        rng,
    );
    let idle = normalize(&input.idle_engine, count, &names, fleet_fallback, rng);
    let availability = normalize(
        &input.mechanical_availability,
        count,
        &names,
        fleet_fallback,
        rng,
    );

    // Tables
    let wash = match RowOverrides::table_rows(options.overrides.wash_rows, "wash") {
        Some(n) => cycle_rows(&input.wash, n, |i| {
            EventRow::placeholder(&end_date, WASH_FILLER_START + i as u32, "Lavagem")
        }),
        None => input.wash.clone(),
    };
    let rollers = match RowOverrides::table_rows(options.overrides.roller_rows, "rollers") {
        Some(n) => cycle_rows(&input.rollers, n, |i| {
            EventRow::placeholder(&end_date, ROLLER_FILLER_START + i as u32, "Aferição")
        }),
        None => input.rollers.clone(),
    };

    // Charts
    let maneuvers = maneuver_chart(&maneuver_rows, &classifier);
    let headlines = vec![
        classifier.headline(KpiId::EnergyEfficiency, fleets.iter().map(FleetRow::efficiency)),
        classifier.headline(KpiId::ElevatorHours, fleets.iter().map(FleetRow::elevator_hours)),
        classifier.headline(KpiId::GpsUsage, gps.iter().map(FleetRow::gps_percent)),
        classifier.headline(KpiId::AverageSpeed, speed.iter().map(FleetRow::speed)),
        maneuvers.headline,
        classifier.headline(KpiId::IdleEngine, idle.iter().map(FleetRow::idle_percent)),
        classifier.headline(
            KpiId::MechanicalAvailability,
            availability.iter().map(FleetRow::availability),
        ),
    ];

    let idle_engine = idle_rows(&idle, &classifier);
    let offenders = top_offenders(&input.offenders, config.offenders_limit);

    let timelines: Vec<TimelineGeometry> = if period.is_daily() {
        group_by_equipment(&input.intervals)
            .iter()
            .map(|group| build_geometry(&group.equipment, &group.intervals, &config.timeline))
            .collect()
    } else {
        Vec::new()
    };

    // Summary
    let summary = summary_rows(
        &SummarySources {
            fleets: &fleets,
            speed: &speed,
            gps: &gps,
            idle: &idle,
            availability: &availability,
            maneuvers: &maneuver_rows,
            elevator_hours: &input.elevator_hours,
            production: &input.production_per_fleet,
        },
        &classifier,
        config.tolerance,
        config.elevator_tolerance,
    );
    let column = |pick: fn(&SummaryRow) -> f64| summary.iter().map(pick).collect::<Vec<f64>>();
    let cards = vec![
        classifier.card(KpiId::EnergyEfficiency, &column(|r| r.efficiency.value)),
        classifier.card(KpiId::GpsUsage, &column(|r| r.gps.value)),
        classifier.card(KpiId::AverageSpeed, &column(|r| r.speed.value)),
        classifier.card(KpiId::Maneuvers, &column(|r| r.maneuvers.value)),
        classifier.card(KpiId::IdleEngine, &column(|r| r.idle.value)),
        classifier.card(KpiId::MechanicalAvailability, &column(|r| r.availability.value)),
    ];

    // Pages
    let layout_counts = LayoutCounts::new(wash.len(), rollers.len(), idle_engine.len());
    let layout_mode = plan(layout_counts, &config.capacities);

    let mut sink = PageSink::new(&title);
    sink.push(smallvec![
        PageBlock::whole(BlockId::EnergyEfficiency, fleets.len()),
        PageBlock::whole(BlockId::ElevatorHours, fleets.len()),
    ]);
    sink.push(smallvec![
        PageBlock::whole(BlockId::Tonnage, fleets.len()),
        PageBlock::whole(BlockId::GpsUsage, gps.len()),
    ]);
    if period.is_daily() {
        sink.push(smallvec![PageBlock::whole(BlockId::GpsMap, 0)]);
        sink.push(smallvec![PageBlock::whole(BlockId::WorkedArea, 0)]);
    }
    sink.push(smallvec![
        PageBlock::whole(BlockId::AverageSpeed, speed.len()),
        PageBlock::whole(BlockId::Maneuvers, maneuver_rows.len()),
    ]);
    for blocks in layout_mode.pages(&layout_counts, &config.capacities) {
        sink.push(blocks);
    }
    sink.push(smallvec![
        PageBlock::whole(BlockId::Offenders, offenders.len()),
        PageBlock::whole(BlockId::MechanicalAvailability, availability.len()),
    ]);
    for (section_title, blocks) in timeline_pages(timelines.len(), config.timelines_per_page) {
        sink.push(blocks).section_title = Some(section_title);
    }
    sink.push(smallvec![
        PageBlock::whole(BlockId::KpiCards, cards.len()),
        PageBlock::whole(BlockId::SummaryTable, summary.len()),
    ])
    .section_title = Some(format!("Resumo do Relatório de Colheita {}", period.label()));
    let pages = sink.pages;

    log::debug!(
        "assembled {:?} with {} fleets, {} pages, layout {:?}",
        title,
        count,
        pages.len(),
        layout_mode
    );

    ReportPlan {
        date_label: date_label(&input.metadata.date, period),
        file_name: file_name(&title, &input.metadata.date, period),
        front,
        period,
        layout_mode,
        layout_counts,
        pages,
        headlines,
        efficiency: chart_rows(KpiId::EnergyEfficiency, &fleets, &classifier),
        elevator_hours: chart_rows(KpiId::ElevatorHours, &fleets, &classifier),
        tonnage: tonnage(input.total_production(), &fleets),
        gps_usage: chart_rows(KpiId::GpsUsage, &gps, &classifier),
        average_speed: chart_rows(KpiId::AverageSpeed, &speed, &classifier),
        maneuvers,
        wash,
        rollers,
        idle_engine,
        offenders,
        availability: chart_rows(KpiId::MechanicalAvailability, &availability, &classifier),
        timelines,
        cards,
        summary,
        title,
    }
}
