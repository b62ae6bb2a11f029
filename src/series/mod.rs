//! Per-fleet series rows and their normalization to a requested length

mod normalize;
mod row;

pub use normalize::{
    cycle_rows, fleet_names, normalize, FALLBACK_NAME_START, MAX_SERIES_ROWS, MAX_TABLE_ROWS,
};
pub use row::{FleetRow, ManeuverRow, SeriesRow};
