//! KPI identities, their targets and the direction each one is judged in

use crate::metrics::classify::Direction;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Every KPI the fleet report measures against a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KpiId {
    EnergyEfficiency,
    ElevatorHours,
    GpsUsage,
    AverageSpeed,
    Maneuvers,
    IdleEngine,
    MechanicalAvailability,
}

impl KpiId {
    pub const ALL: [KpiId; 7] = [
        KpiId::EnergyEfficiency,
        KpiId::ElevatorHours,
        KpiId::GpsUsage,
        KpiId::AverageSpeed,
        KpiId::Maneuvers,
        KpiId::IdleEngine,
        KpiId::MechanicalAvailability,
    ];

    /// Section title printed on the report
    pub fn title(&self) -> &'static str {
        match self {
            KpiId::EnergyEfficiency => "Eficiência Energética",
            KpiId::ElevatorHours => "Horas Elevador",
            KpiId::GpsUsage => "Uso GPS",
            KpiId::AverageSpeed => "Média Velocidade",
            KpiId::Maneuvers => "Manobras",
            KpiId::IdleEngine => "Motor Ocioso",
            KpiId::MechanicalAvailability => "Disponibilidade Mecânica",
        }
    }

    /// Unit suffix appended to formatted values
    pub fn unit(&self) -> &'static str {
        match self {
            KpiId::EnergyEfficiency
            | KpiId::GpsUsage
            | KpiId::IdleEngine
            | KpiId::MechanicalAvailability => "%",
            KpiId::ElevatorHours => " h",
            KpiId::AverageSpeed => " km/h",
            KpiId::Maneuvers => "",
        }
    }
}

/// Single source of truth for KPI directions.
///
/// Both the classifier and the aggregator look directions up here instead of
/// carrying their own ascending/descending literals.
#[derive(Debug, Clone)]
pub struct KpiDirectionRegistry {
    directions: FxHashMap<KpiId, Direction>,
}

impl Default for KpiDirectionRegistry {
    fn default() -> Self {
        let mut directions = FxHashMap::default();
        directions.insert(KpiId::EnergyEfficiency, Direction::Ascending);
        directions.insert(KpiId::ElevatorHours, Direction::Ascending);
        directions.insert(KpiId::GpsUsage, Direction::Ascending);
        directions.insert(KpiId::AverageSpeed, Direction::Descending);
        directions.insert(KpiId::Maneuvers, Direction::Descending);
        directions.insert(KpiId::IdleEngine, Direction::Descending);
        directions.insert(KpiId::MechanicalAvailability, Direction::Ascending);
        Self { directions }
    }
}

impl KpiDirectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direction for a KPI (ascending for anything not registered)
    pub fn direction(&self, kpi: KpiId) -> Direction {
        self.directions
            .get(&kpi)
            .copied()
            .unwrap_or(Direction::Ascending)
    }

    /// Override the direction of one KPI
    pub fn set(&mut self, kpi: KpiId, direction: Direction) {
        self.directions.insert(kpi, direction);
    }
}

/// Targets ("metas") per KPI, in the units the report displays.
///
/// Maneuvers are in seconds of mean maneuver time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Targets {
    #[serde(rename = "eficienciaEnergetica")]
    pub energy_efficiency: f64,
    #[serde(rename = "horaElevador")]
    pub elevator_hours: f64,
    #[serde(rename = "usoGPS")]
    pub gps_usage: f64,
    #[serde(rename = "mediaVelocidade")]
    pub average_speed: f64,
    #[serde(rename = "manobras")]
    pub maneuvers: f64,
    #[serde(rename = "motorOcioso")]
    pub idle_engine: f64,
    #[serde(rename = "disponibilidadeMecanica")]
    pub mechanical_availability: f64,
}

impl Default for Targets {
    fn default() -> Self {
        Self {
            energy_efficiency: 70.0,
            elevator_hours: 15.0,
            gps_usage: 90.0,
            average_speed: 7.0,
            maneuvers: 60.0,
            idle_engine: 4.0,
            mechanical_availability: 90.0,
        }
    }
}

impl Targets {
    /// Target value for a KPI
    pub fn get(&self, kpi: KpiId) -> f64 {
        match kpi {
            KpiId::EnergyEfficiency => self.energy_efficiency,
            KpiId::ElevatorHours => self.elevator_hours,
            KpiId::GpsUsage => self.gps_usage,
            KpiId::AverageSpeed => self.average_speed,
            KpiId::Maneuvers => self.maneuvers,
            KpiId::IdleEngine => self.idle_engine,
            KpiId::MechanicalAvailability => self.mechanical_availability,
        }
    }
}
