//! Filtered averages and KPI headline values
//!
//! A zero in a KPI series means "no data for this fleet", not "zero
//! performance", so headline averages skip zero and non-finite entries. An
//! average over an empty valid set is defined as `0.0`.

use crate::metrics::classify::{classify, meets_target, StatusBand};
use crate::metrics::kpi::{KpiDirectionRegistry, KpiId, Targets};
use crate::timeline::clock::parse_duration_seconds;
use serde::Serialize;

/// Default exclusion rule: zero, negative and non-finite entries
pub fn is_missing(value: f64) -> bool {
    !value.is_finite() || value <= 0.0
}

/// Mean of the values not matching `exclude`, or 0 when none remain
pub fn average<I, F>(values: I, exclude: F) -> f64
where
    I: IntoIterator<Item = f64>,
    F: Fn(f64) -> bool,
{
    let (sum, count) = values
        .into_iter()
        .filter(|v| !exclude(*v))
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Mean excluding zero and invalid entries
pub fn average_nonzero<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    average(values, is_missing)
}

/// Mean of percentages, each clamped into 0..=100 before averaging
pub fn average_percentage<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    average(
        values
            .into_iter()
            .map(|v| if v.is_finite() { v.clamp(0.0, 100.0) } else { v }),
        is_missing,
    )
}

/// Mean in seconds of duration strings ("HH:MM:SS", "MM:SS" or decimal hours).
///
/// Malformed strings parse to zero and are then excluded like any other
/// missing entry.
pub fn average_duration_seconds<'a, I>(values: I) -> f64
where
    I: IntoIterator<Item = &'a str>,
{
    average_nonzero(values.into_iter().map(parse_duration_seconds))
}

/// Plain mean over every entry (non-finite entries count as zero)
pub fn mean_all<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    average(
        values
            .into_iter()
            .map(|v| if v.is_finite() { v } else { 0.0 }),
        |_| false,
    )
}

/// Headline shown above a KPI chart: target, filtered average and status
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiHeadline {
    pub kpi: KpiId,
    pub target: f64,
    pub average: f64,
    pub band: StatusBand,
    pub meets_target: bool,
}

/// Compute the headline for a KPI from its raw series
pub fn headline<I>(
    kpi: KpiId,
    values: I,
    targets: &Targets,
    registry: &KpiDirectionRegistry,
) -> KpiHeadline
where
    I: IntoIterator<Item = f64>,
{
    let direction = registry.direction(kpi);
    let target = targets.get(kpi);
    let average = average_nonzero(values);

    KpiHeadline {
        kpi,
        target,
        average,
        band: classify(average, target, direction),
        meets_target: meets_target(average, target, direction),
    }
}

/// Summary card: how many fleets reached the target and the overall mean
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiCard {
    pub kpi: KpiId,
    pub target: f64,
    pub mean: f64,
    pub reached: usize,
    pub total: usize,
    pub reached_percent: f64,
    pub mean_meets_target: bool,
}

/// Build the summary card for a KPI.
///
/// Unlike the headline, the card mean is taken over every fleet, zeros
/// included, since the card reports on the whole fleet.
pub fn card(
    kpi: KpiId,
    values: &[f64],
    targets: &Targets,
    registry: &KpiDirectionRegistry,
) -> KpiCard {
    let direction = registry.direction(kpi);
    let target = targets.get(kpi);
    let mean = mean_all(values.iter().copied());
    let reached = values
        .iter()
        .filter(|v| meets_target(**v, target, direction))
        .count();
    let total = values.len();
    let reached_percent = if total == 0 {
        0.0
    } else {
        reached as f64 / total as f64 * 100.0
    };

    KpiCard {
        kpi,
        target,
        mean,
        reached,
        total,
        reached_percent,
        mean_meets_target: meets_target(mean, target, direction),
    }
}
