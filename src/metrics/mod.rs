//! KPI evaluation: status classification, filtered averages and targets

pub mod aggregate;
pub mod classify;
pub mod kpi;

pub use aggregate::{
    average, average_duration_seconds, average_nonzero, average_percentage, card, headline,
    KpiCard, KpiHeadline,
};
pub use classify::{
    achievement_ratio, classify, classify_with_tolerance, meets_target, Direction, Palette,
    StatusBand, ToleranceBand, DEFAULT_TOLERANCE,
};
pub use kpi::{KpiDirectionRegistry, KpiId, Targets};
