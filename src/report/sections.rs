//! Classified rows for each chart and table of the report

use crate::metrics::{
    average_nonzero, card, classify, classify_with_tolerance, headline, Direction,
    KpiDirectionRegistry, KpiCard, KpiHeadline, KpiId, Palette, StatusBand, Targets,
    ToleranceBand,
};
use crate::report::input::{NamedValue, OffenderRecord};
use crate::series::{FleetRow, ManeuverRow, SeriesRow};
use crate::timeline::clock::{format_hours_minutes, format_mm_ss};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::cmp::Ordering;

/// Text for a KPI value with its unit
pub fn format_kpi(kpi: KpiId, value: f64) -> String {
    match kpi {
        KpiId::Maneuvers => format_mm_ss(value),
        KpiId::EnergyEfficiency | KpiId::GpsUsage | KpiId::MechanicalAvailability => {
            format!("{:.1}{}", value, kpi.unit())
        }
        _ => format!("{:.2}{}", value, kpi.unit()),
    }
}

/// Context shared by the section builders
pub struct Classifier<'a> {
    pub targets: &'a Targets,
    pub registry: &'a KpiDirectionRegistry,
    pub palette: &'a Palette,
}

impl Classifier<'_> {
    pub fn band(&self, kpi: KpiId, value: f64) -> StatusBand {
        classify(value, self.targets.get(kpi), self.registry.direction(kpi))
    }

    pub fn direction(&self, kpi: KpiId) -> Direction {
        self.registry.direction(kpi)
    }

    pub fn headline<I>(&self, kpi: KpiId, values: I) -> KpiHeadline
    where
        I: IntoIterator<Item = f64>,
    {
        headline(kpi, values, self.targets, self.registry)
    }

    pub fn card(&self, kpi: KpiId, values: &[f64]) -> KpiCard {
        card(kpi, values, self.targets, self.registry)
    }
}

/// One bar of a per-fleet KPI chart
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRow {
    pub name: String,
    pub value: f64,
    pub label: String,
    pub band: StatusBand,
    pub color: String,
}

/// Chart rows for a KPI, in series order
pub fn chart_rows<T: SeriesRow>(kpi: KpiId, rows: &[T], classifier: &Classifier<'_>) -> Vec<ChartRow> {
    rows.iter()
        .map(|row| {
            let value = row.kpi_value(kpi);
            let band = classifier.band(kpi, value);
            ChartRow {
                name: row.name().to_string(),
                value,
                label: format_kpi(kpi, value),
                band,
                color: band.color(classifier.palette).to_string(),
            }
        })
        .collect()
}

/// One bar of the idle engine chart.
///
/// The idle segment is always drawn in the fixed idle colour; only the
/// percentage label follows the target status.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdleRow {
    pub name: String,
    pub percent: f64,
    /// Width of the idle segment, percent of the bar
    pub bar_width: f64,
    pub engine_on: String,
    pub idle: String,
    pub label: String,
    pub band: StatusBand,
    pub bar_color: String,
    pub label_color: String,
}

/// Idle engine rows, lowest idle percentage first
pub fn idle_rows(rows: &[FleetRow], classifier: &Classifier<'_>) -> Vec<IdleRow> {
    let mut out: Vec<IdleRow> = rows
        .iter()
        .map(|row| {
            let percent = row.idle_percent();
            let band = classifier.band(KpiId::IdleEngine, percent);
            IdleRow {
                name: row.name.clone(),
                percent,
                bar_width: if percent.is_finite() { percent.clamp(0.0, 100.0) } else { 0.0 },
                engine_on: format_hours_minutes(row.engine_on_hours()),
                idle: format_hours_minutes(row.idle_hours()),
                label: format!("{:.2}%", percent),
                band,
                bar_color: classifier.palette.red.clone(),
                label_color: band.color(classifier.palette).to_string(),
            }
        })
        .collect();
    out.sort_by(|a, b| a.percent.partial_cmp(&b.percent).unwrap_or(Ordering::Equal));
    out
}

/// One bar of the maneuver chart
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManeuverBar {
    pub name: String,
    pub mean_seconds: f64,
    pub label: String,
    pub valid_intervals: f64,
    pub total_time: String,
    /// Bar length, percent of the chart scale
    pub bar_width: f64,
    pub band: StatusBand,
    pub color: String,
}

/// Maneuver chart: bars, overall mean and scale
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManeuverChart {
    pub bars: Vec<ManeuverBar>,
    pub headline: KpiHeadline,
    /// Upper end of the horizontal scale, in seconds
    pub scale_max: f64,
    /// Target marker position, percent of the scale
    pub target_position: f64,
}

/// Largest of the target-based and data-based scale ends
pub fn maneuver_scale(target: f64, longest: f64) -> f64 {
    (target * 1.5).max(longest * 1.1)
}

/// Build the maneuver chart, shortest mean first.
///
/// The headline mean only counts fleets with at least one valid interval.
pub fn maneuver_chart(rows: &[ManeuverRow], classifier: &Classifier<'_>) -> ManeuverChart {
    let kpi = KpiId::Maneuvers;
    let target = classifier.targets.get(kpi);
    let longest = rows
        .iter()
        .map(ManeuverRow::mean_seconds)
        .fold(0.0, f64::max);
    let scale_max = maneuver_scale(target, longest);
    let width = |seconds: f64| {
        if scale_max > 0.0 {
            seconds / scale_max * 100.0
        } else {
            0.0
        }
    };

    let mut bars: Vec<ManeuverBar> = rows
        .iter()
        .map(|row| {
            let mean_seconds = row.mean_seconds();
            let band = classifier.band(kpi, mean_seconds);
            ManeuverBar {
                name: row.fleet.clone(),
                mean_seconds,
                label: format_mm_ss(mean_seconds),
                valid_intervals: row.valid_intervals(),
                total_time: row.total_time.clone().unwrap_or_default(),
                bar_width: width(mean_seconds),
                band,
                color: band.color(classifier.palette).to_string(),
            }
        })
        .collect();
    bars.sort_by(|a, b| {
        a.mean_seconds
            .partial_cmp(&b.mean_seconds)
            .unwrap_or(Ordering::Equal)
    });

    let headline = classifier.headline(
        kpi,
        rows.iter()
            .filter(|row| row.valid_intervals() > 0.0)
            .map(ManeuverRow::mean_seconds),
    );

    ManeuverChart {
        bars,
        headline,
        scale_max,
        target_position: width(target),
    }
}

/// Tonnes attributed to one fleet
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TonnageRow {
    pub name: String,
    pub tonnes: f64,
    /// Share of the total production, percent
    pub share: f64,
}

/// Tonnage per fleet chart
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tonnage {
    pub rows: Vec<TonnageRow>,
    pub total: f64,
    pub average_per_equipment: f64,
    pub tonnes_per_hour: f64,
}

/// Distribute total production over fleets in proportion to elevator hours.
///
/// Rows are sorted by tonnes, highest first. Without elevator hours every
/// fleet gets zero.
pub fn tonnage(total: f64, fleets: &[FleetRow]) -> Tonnage {
    let total = if total.is_finite() { total } else { 0.0 };
    let hours: f64 = fleets
        .iter()
        .map(FleetRow::elevator_hours)
        .filter(|h| h.is_finite())
        .sum();

    let mut rows: Vec<TonnageRow> = fleets
        .iter()
        .map(|fleet| {
            let tonnes = if hours > 0.0 {
                total * (fleet.elevator_hours() / hours)
            } else {
                0.0
            };
            TonnageRow {
                name: fleet.name.clone(),
                tonnes,
                share: if total > 0.0 { tonnes / total * 100.0 } else { 0.0 },
            }
        })
        .collect();
    rows.sort_by(|a, b| b.tonnes.partial_cmp(&a.tonnes).unwrap_or(Ordering::Equal));

    Tonnage {
        average_per_equipment: average_nonzero(rows.iter().map(|r| r.tonnes)),
        tonnes_per_hour: total / 24.0,
        rows,
        total,
    }
}

/// One column of the offenders chart
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OffenderRow {
    pub name: String,
    pub percentage: f64,
    pub duration: String,
}

/// Operation label without its numeric code ("8040 - MANUTENCAO" -> "MANUTENCAO")
pub fn operation_name(operation: &str) -> &str {
    match operation.split_once(" - ") {
        Some((_, rest)) => rest,
        None => operation,
    }
}

/// Highest-percentage offenders, at most `limit`
pub fn top_offenders(records: &[OffenderRecord], limit: usize) -> Vec<OffenderRow> {
    let mut rows: Vec<OffenderRow> = records
        .iter()
        .map(|record| OffenderRow {
            name: operation_name(&record.operation).to_string(),
            percentage: record.percentage.unwrap_or(0.0),
            duration: format_hours_minutes(record.hours.unwrap_or(0.0)),
        })
        .collect();
    rows.sort_by(|a, b| {
        b.percentage
            .partial_cmp(&a.percentage)
            .unwrap_or(Ordering::Equal)
    });
    rows.truncate(limit);
    rows
}

/// A summary table cell with its tolerance band
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCell {
    pub value: f64,
    pub band: ToleranceBand,
}

/// One fleet's line in the summary table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub fleet: String,
    pub efficiency: SummaryCell,
    pub elevator_hours: SummaryCell,
    pub production: f64,
    pub speed: SummaryCell,
    pub gps: SummaryCell,
    pub maneuvers: SummaryCell,
    pub idle: SummaryCell,
    pub availability: SummaryCell,
}

/// Normalized series the summary is joined from
pub struct SummarySources<'a> {
    pub fleets: &'a [FleetRow],
    pub speed: &'a [FleetRow],
    pub gps: &'a [FleetRow],
    pub idle: &'a [FleetRow],
    pub availability: &'a [FleetRow],
    pub maneuvers: &'a [ManeuverRow],
    pub elevator_hours: &'a [NamedValue],
    pub production: &'a [NamedValue],
}

fn index_by_name<T: SeriesRow>(rows: &[T]) -> FxHashMap<&str, &T> {
    rows.iter().map(|row| (row.name(), row)).collect()
}

/// Summary rows, one per fleet of the efficiency series, joined by name.
///
/// Elevator hours are summed over every matching entry; anything missing
/// counts as zero.
pub fn summary_rows(
    sources: &SummarySources<'_>,
    classifier: &Classifier<'_>,
    tolerance: f64,
    elevator_tolerance: f64,
) -> Vec<SummaryRow> {
    let speed = index_by_name(sources.speed);
    let gps = index_by_name(sources.gps);
    let idle = index_by_name(sources.idle);
    let availability = index_by_name(sources.availability);
    let maneuvers = index_by_name(sources.maneuvers);

    let cell = |kpi: KpiId, value: f64, tolerance: f64| SummaryCell {
        value,
        band: classify_with_tolerance(
            value,
            classifier.targets.get(kpi),
            classifier.direction(kpi),
            tolerance,
        ),
    };

    sources
        .fleets
        .iter()
        .map(|fleet| {
            let name = fleet.name.as_str();
            let value = |index: &FxHashMap<&str, &FleetRow>, kpi: KpiId| {
                index.get(name).map_or(0.0, |row| row.kpi_value(kpi))
            };
            let elevator: f64 = sources
                .elevator_hours
                .iter()
                .filter(|entry| entry.name == name)
                .map(NamedValue::value)
                .sum();
            let production = sources
                .production
                .iter()
                .find(|entry| entry.name == name)
                .map_or(0.0, NamedValue::value);
            let maneuver = maneuvers
                .get(name)
                .map_or(0.0, |row| row.mean_seconds());

            SummaryRow {
                fleet: name.to_string(),
                efficiency: cell(KpiId::EnergyEfficiency, fleet.efficiency(), tolerance),
                elevator_hours: cell(KpiId::ElevatorHours, elevator, elevator_tolerance),
                production,
                speed: cell(KpiId::AverageSpeed, value(&speed, KpiId::AverageSpeed), tolerance),
                gps: cell(KpiId::GpsUsage, value(&gps, KpiId::GpsUsage), tolerance),
                maneuvers: cell(KpiId::Maneuvers, maneuver, tolerance),
                idle: cell(KpiId::IdleEngine, value(&idle, KpiId::IdleEngine), tolerance),
                availability: cell(
                    KpiId::MechanicalAvailability,
                    value(&availability, KpiId::MechanicalAvailability),
                    tolerance,
                ),
            }
        })
        .collect()
}
