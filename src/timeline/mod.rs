//! Operation interval timelines (Gantt chart per equipment)

pub mod clock;
mod geometry;

pub use geometry::{
    build_geometry, hour_ticks, layout_bar, shows_label, tick_label, GridLine, LaneBand,
    TextAnchor, TimelineBar, TimelineGeometry, TimelineScale,
};

use crate::report::input::{lenient_number, string_or_number};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Category of an operation interval
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntervalCategory {
    #[serde(rename = "Produtivo", alias = "productive")]
    Productive,
    #[serde(rename = "Disponível", alias = "available")]
    Available,
    #[serde(rename = "Manutenção", alias = "maintenance")]
    Maintenance,
    #[serde(rename = "Falta de Informação", alias = "noData")]
    NoData,
    /// Anything else in the export; never drawn
    #[serde(other)]
    #[default]
    Unknown,
}

impl IntervalCategory {
    /// Categories with a lane, top to bottom
    pub const LANES: [IntervalCategory; 4] = [
        IntervalCategory::Productive,
        IntervalCategory::Available,
        IntervalCategory::Maintenance,
        IntervalCategory::NoData,
    ];

    /// Lane index, or `None` for categories that are not drawn
    pub fn lane(&self) -> Option<usize> {
        match self {
            IntervalCategory::Productive => Some(0),
            IntervalCategory::Available => Some(1),
            IntervalCategory::Maintenance => Some(2),
            IntervalCategory::NoData => Some(3),
            IntervalCategory::Unknown => None,
        }
    }

    /// Legend label
    pub fn label(&self) -> &'static str {
        match self {
            IntervalCategory::Productive => "Produtivo",
            IntervalCategory::Available => "Disponível",
            IntervalCategory::Maintenance => "Manutenção",
            IntervalCategory::NoData => "Falta de Informação",
            IntervalCategory::Unknown => "",
        }
    }
}

/// Anything but a known category name reads as `Unknown`
fn lenient_category<'de, D>(deserializer: D) -> Result<IntervalCategory, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(value @ Value::String(_)) => {
            serde_json::from_value(value).unwrap_or(IntervalCategory::Unknown)
        }
        _ => IntervalCategory::Unknown,
    })
}

/// Read a duration cell in hours; unreadable cells are zero
fn lenient_hours<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?.unwrap_or(0.0))
}

/// One timestamped interval of an equipment's day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalRecord {
    #[serde(
        rename = "equipamento",
        alias = "equipment",
        default,
        deserialize_with = "string_or_number"
    )]
    pub equipment: String,
    #[serde(
        rename = "tipo",
        alias = "category",
        default,
        deserialize_with = "lenient_category"
    )]
    pub category: IntervalCategory,
    /// "HH:MM:SS"
    #[serde(
        rename = "inicio",
        alias = "start",
        default,
        deserialize_with = "string_or_number"
    )]
    pub start: String,
    #[serde(
        rename = "duracaoHoras",
        alias = "durationHours",
        default,
        deserialize_with = "lenient_hours"
    )]
    pub duration_hours: f64,
}

/// All intervals of one equipment
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentIntervals {
    pub equipment: String,
    pub intervals: Vec<IntervalRecord>,
}

/// Group a flat interval list per equipment, sorted by equipment name.
///
/// Record order within an equipment is preserved.
pub fn group_by_equipment(records: &[IntervalRecord]) -> Vec<EquipmentIntervals> {
    let mut grouped: FxHashMap<&str, Vec<IntervalRecord>> = FxHashMap::default();
    for record in records {
        grouped
            .entry(record.equipment.as_str())
            .or_default()
            .push(record.clone());
    }

    let mut groups: Vec<EquipmentIntervals> = grouped
        .into_iter()
        .map(|(equipment, intervals)| EquipmentIntervals {
            equipment: equipment.to_string(),
            intervals,
        })
        .collect();
    groups.sort_by(|a, b| a.equipment.cmp(&b.equipment));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_records() {
        let json = r#"[
            {"equipamento": 7032, "tipo": "Produtivo", "inicio": "06:00:00", "duracaoHoras": 1.5},
            {"equipamento": "7036", "tipo": "Manutenção", "inicio": "09:10:00", "duracaoHoras": 0.2},
            {"equipamento": "7036", "tipo": "Deslocamento", "inicio": "10:00:00", "duracaoHoras": 1}
        ]"#;
        let records: Vec<IntervalRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records[0].equipment, "7032");
        assert_eq!(records[0].category, IntervalCategory::Productive);
        assert_eq!(records[1].category, IntervalCategory::Maintenance);
        assert_eq!(records[2].category, IntervalCategory::Unknown);
        assert_eq!(records[2].category.lane(), None);
    }

    #[test]
    fn test_malformed_cells_are_recovered() {
        let json = r#"[
            {"equipamento": "7032", "tipo": "Produtivo", "inicio": "06:00:00", "duracaoHoras": null},
            {"equipamento": "7032", "tipo": "Disponível", "inicio": "07:00:00", "duracaoHoras": "1,5"},
            {"equipamento": "7032", "inicio": "08:00:00", "duracaoHoras": 1},
            {"equipamento": "7032", "tipo": null, "inicio": null, "duracaoHoras": "n/a"},
            {"equipamento": "7032", "tipo": 3, "inicio": "09:00:00"}
        ]"#;
        let records: Vec<IntervalRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(records[0].duration_hours, 0.0);
        assert_eq!(records[1].category, IntervalCategory::Available);
        assert_eq!(records[1].duration_hours, 1.5);
        assert_eq!(records[2].category, IntervalCategory::Unknown);
        assert_eq!(records[3].category, IntervalCategory::Unknown);
        assert_eq!(records[3].start, "");
        assert_eq!(records[3].duration_hours, 0.0);
        assert_eq!(records[4].category, IntervalCategory::Unknown);
        assert_eq!(records[4].duration_hours, 0.0);
    }

    #[test]
    fn test_group_by_equipment_sorted() {
        let make = |equipment: &str, start: &str| IntervalRecord {
            equipment: equipment.to_string(),
            category: IntervalCategory::Available,
            start: start.to_string(),
            duration_hours: 1.0,
        };
        let groups = group_by_equipment(&[
            make("7037", "01:00:00"),
            make("7032", "02:00:00"),
            make("7037", "03:00:00"),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].equipment, "7032");
        assert_eq!(groups[1].equipment, "7037");
        assert_eq!(groups[1].intervals[0].start, "01:00:00");
        assert_eq!(groups[1].intervals[1].start, "03:00:00");
    }
}
