//! Report input as produced by the data-loading collaborator
//!
//! Keys follow the upstream JSON (Portuguese, snake_case sections). Cells are
//! read leniently: numbers may arrive as strings, names as numbers, and
//! sections as `null`.

use crate::metrics::Targets;
use crate::series::{FleetRow, ManeuverRow};
use crate::timeline::IntervalRecord;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Accept a string or a number, yielding its text ("" for anything else)
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

/// Accept a number or a numeric string ("12,5" included); anything else is
/// missing
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite()))
}

/// Accept a string or a number as text; anything else is missing
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Treat `null` like a missing section
pub fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Report metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Report date, "YYYY-MM-DD"
    #[serde(default, deserialize_with = "string_or_number")]
    pub date: String,
    /// Harvest front code ("frente5")
    #[serde(rename = "frente", default, deserialize_with = "lenient_string")]
    pub front: Option<String>,
    /// Explicit front display name
    #[serde(rename = "frente_nome", default, deserialize_with = "lenient_string")]
    pub front_name: Option<String>,
}

/// `{ nome, valor }` pair
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedValue {
    #[serde(rename = "nome", default, deserialize_with = "string_or_number")]
    pub name: String,
    #[serde(rename = "valor", default, deserialize_with = "lenient_number")]
    pub value: Option<f64>,
}

impl NamedValue {
    pub fn value(&self) -> f64 {
        self.value.unwrap_or(0.0)
    }
}

/// One row of the wash or roller gauge tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventRow {
    #[serde(rename = "Data", default, deserialize_with = "string_or_number")]
    pub date: String,
    #[serde(rename = "Equipamento", default, deserialize_with = "string_or_number")]
    pub equipment: String,
    #[serde(rename = "Intervalo", default, deserialize_with = "string_or_number")]
    pub interval: String,
    #[serde(rename = "Início", default, deserialize_with = "string_or_number")]
    pub start: String,
    #[serde(rename = "Fim", default, deserialize_with = "string_or_number")]
    pub end: String,
    #[serde(rename = "Duração (horas)", default, deserialize_with = "lenient_number")]
    pub duration_hours: Option<f64>,
    #[serde(rename = "Tempo Total do Dia", default, deserialize_with = "lenient_number")]
    pub day_total_hours: Option<f64>,
}

impl EventRow {
    /// Placeholder row used when a table is padded without any real rows
    pub fn placeholder(date: &str, equipment: u32, interval: &str) -> Self {
        Self {
            date: date.to_string(),
            equipment: equipment.to_string(),
            interval: interval.to_string(),
            start: "00:00:00".to_string(),
            end: "00:00:00".to_string(),
            duration_hours: Some(0.0),
            day_total_hours: Some(0.0),
        }
    }
}

/// Operation that cost the most time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OffenderRecord {
    /// "8040 - MANUTENCAO"
    #[serde(rename = "operacao", default, deserialize_with = "string_or_number")]
    pub operation: String,
    #[serde(rename = "porcentagem", default, deserialize_with = "lenient_number")]
    pub percentage: Option<f64>,
    #[serde(rename = "tempo", default, deserialize_with = "lenient_number")]
    pub hours: Option<f64>,
}

/// Full report input
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportInput {
    #[serde(deserialize_with = "nullable")]
    pub metadata: Metadata,
    /// Explicit front display name at top level
    #[serde(rename = "frente_nome", deserialize_with = "lenient_string")]
    pub front_name: Option<String>,
    #[serde(rename = "metas", deserialize_with = "nullable")]
    pub targets: Targets,
    #[serde(rename = "eficiencia_energetica", deserialize_with = "nullable")]
    pub energy_efficiency: Vec<FleetRow>,
    #[serde(rename = "motor_ocioso", deserialize_with = "nullable")]
    pub idle_engine: Vec<FleetRow>,
    #[serde(rename = "uso_gps", deserialize_with = "nullable")]
    pub gps_usage: Vec<FleetRow>,
    #[serde(rename = "media_velocidade", deserialize_with = "nullable")]
    pub average_speed: Vec<FleetRow>,
    #[serde(rename = "disponibilidade_mecanica", deserialize_with = "nullable")]
    pub mechanical_availability: Vec<FleetRow>,
    #[serde(rename = "manobras_frotas", deserialize_with = "nullable")]
    pub maneuvers: Vec<ManeuverRow>,
    #[serde(rename = "horas_elevador", deserialize_with = "nullable")]
    pub elevator_hours: Vec<NamedValue>,
    #[serde(rename = "producao", deserialize_with = "lenient_number")]
    pub production: Option<f64>,
    #[serde(rename = "producao_total", deserialize_with = "nullable")]
    pub production_total: Vec<NamedValue>,
    #[serde(rename = "producao_por_frota", deserialize_with = "nullable")]
    pub production_per_fleet: Vec<NamedValue>,
    #[serde(rename = "lavagem", deserialize_with = "nullable")]
    pub wash: Vec<EventRow>,
    #[serde(rename = "roletes", deserialize_with = "nullable")]
    pub rollers: Vec<EventRow>,
    #[serde(rename = "ofensores", deserialize_with = "nullable")]
    pub offenders: Vec<OffenderRecord>,
    #[serde(rename = "intervalos_operacao", deserialize_with = "nullable")]
    pub intervals: Vec<IntervalRecord>,
}

impl ReportInput {
    /// Parse the collaborator's JSON
    pub fn from_json(json: &str) -> crate::ReportResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Total production: first `producao_total` entry, else `producao`
    pub fn total_production(&self) -> f64 {
        self.production_total
            .first()
            .and_then(|entry| entry.value)
            .or(self.production)
            .unwrap_or(0.0)
    }

    /// Fleets of the efficiency series that carry a name
    pub fn named_fleets(&self) -> Vec<FleetRow> {
        self.energy_efficiency
            .iter()
            .filter(|row| !row.name.trim().is_empty())
            .cloned()
            .collect()
    }
}
