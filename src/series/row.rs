//! Per-fleet series rows and their derive-or-synthesize completion

use crate::metrics::KpiId;
use crate::report::input::{lenient_number, lenient_string, string_or_number};
use crate::timeline::clock::{format_hh_mm, format_hh_mm_ss, parse_duration_seconds};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A named row of a per-fleet series
pub trait SeriesRow: Clone {
    fn name(&self) -> &str;

    fn set_name(&mut self, name: String);

    /// Fill every missing field.
    ///
    /// Real rows (`synthetic == false`) get zeros; synthesized rows get
    /// plausible random values. Derived fields are computed from the values
    /// already settled on the same row, never rolled independently.
    fn complete<R: Rng + ?Sized>(&mut self, synthetic: bool, rng: &mut R);

    /// Value this row contributes to a KPI (0 when it carries none)
    fn kpi_value(&self, kpi: KpiId) -> f64;
}

/// Fill `slot` when it is missing or not finite
fn fill<R, F>(slot: &mut Option<f64>, synthetic: bool, rng: &mut R, synthesize: F)
where
    R: Rng + ?Sized,
    F: FnOnce(&mut R) -> f64,
{
    if slot.map_or(true, |v| !v.is_finite()) {
        *slot = Some(if synthetic { synthesize(rng) } else { 0.0 });
    }
}

/// Fill `slot` from an already settled value when it is missing
fn derive(slot: &mut Option<f64>, value: f64) {
    if slot.map_or(true, |v| !v.is_finite()) {
        *slot = Some(value);
    }
}

/// One fleet in any of the per-fleet KPI series.
///
/// Each input series only carries its own fields; the others stay `None`
/// until the row is completed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FleetRow {
    #[serde(rename = "nome", default, deserialize_with = "string_or_number")]
    pub name: String,
    #[serde(rename = "eficiencia", default, deserialize_with = "lenient_number")]
    pub efficiency: Option<f64>,
    #[serde(rename = "horasMotor", default, deserialize_with = "lenient_number")]
    pub motor_hours: Option<f64>,
    #[serde(rename = "horasElevador", default, deserialize_with = "lenient_number")]
    pub elevator_hours: Option<f64>,
    #[serde(rename = "velocidade", default, deserialize_with = "lenient_number")]
    pub speed: Option<f64>,
    #[serde(rename = "percentual", default, deserialize_with = "lenient_number")]
    pub idle_percent: Option<f64>,
    #[serde(rename = "tempoManutencao", default, deserialize_with = "lenient_number")]
    pub maintenance_hours: Option<f64>,
    #[serde(rename = "disponibilidade", default, deserialize_with = "lenient_number")]
    pub availability: Option<f64>,
    #[serde(rename = "porcentagem", default, deserialize_with = "lenient_number")]
    pub gps_percent: Option<f64>,
    #[serde(rename = "tempoLigado", default, deserialize_with = "lenient_number")]
    pub engine_on_hours: Option<f64>,
    #[serde(rename = "tempoOcioso", default, deserialize_with = "lenient_number")]
    pub idle_hours: Option<f64>,
}

impl FleetRow {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn efficiency(&self) -> f64 {
        self.efficiency.unwrap_or(0.0)
    }

    pub fn motor_hours(&self) -> f64 {
        self.motor_hours.unwrap_or(0.0)
    }

    pub fn elevator_hours(&self) -> f64 {
        self.elevator_hours.unwrap_or(0.0)
    }

    pub fn speed(&self) -> f64 {
        self.speed.unwrap_or(0.0)
    }

    pub fn idle_percent(&self) -> f64 {
        self.idle_percent.unwrap_or(0.0)
    }

    pub fn maintenance_hours(&self) -> f64 {
        self.maintenance_hours.unwrap_or(0.0)
    }

    pub fn availability(&self) -> f64 {
        self.availability.unwrap_or(0.0)
    }

    pub fn gps_percent(&self) -> f64 {
        self.gps_percent.unwrap_or(0.0)
    }

    pub fn engine_on_hours(&self) -> f64 {
        self.engine_on_hours.unwrap_or(0.0)
    }

    pub fn idle_hours(&self) -> f64 {
        self.idle_hours.unwrap_or(0.0)
    }
}

impl SeriesRow for FleetRow {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn complete<R: Rng + ?Sized>(&mut self, synthetic: bool, rng: &mut R) {
        fill(&mut self.efficiency, synthetic, rng, |r| r.gen::<f64>() * 100.0);
        fill(&mut self.motor_hours, synthetic, rng, |r| 5.0 + r.gen::<f64>() * 15.0);
        fill(&mut self.elevator_hours, synthetic, rng, |r| 3.0 + r.gen::<f64>() * 10.0);
        fill(&mut self.speed, synthetic, rng, |r| 3.0 + r.gen::<f64>() * 4.0);
        fill(&mut self.idle_percent, synthetic, rng, |r| r.gen::<f64>() * 20.0);

        // motor hours -> maintenance -> availability
        fill(&mut self.maintenance_hours, synthetic, rng, |r| r.gen::<f64>() * 2.0);
        let placeholder = synthetic && self.availability == Some(0.0);
        if placeholder || self.availability.map_or(true, |v| !v.is_finite()) {
            let motor = self.motor_hours();
            self.availability = Some(if motor > 0.0 {
                ((motor - self.maintenance_hours()) / motor * 100.0).max(0.0)
            } else if synthetic {
                80.0 + rng.gen::<f64>() * 20.0
            } else {
                0.0
            });
        }

        fill(&mut self.gps_percent, synthetic, rng, |r| 70.0 + r.gen::<f64>() * 30.0);

        // engine-on hours -> idle percentage -> idle hours
        let motor = self.motor_hours();
        derive(&mut self.engine_on_hours, motor);
        let idle = self.engine_on_hours() * self.idle_percent() / 100.0;
        derive(&mut self.idle_hours, idle);
    }

    fn kpi_value(&self, kpi: KpiId) -> f64 {
        match kpi {
            KpiId::EnergyEfficiency => self.efficiency(),
            KpiId::ElevatorHours => self.elevator_hours(),
            KpiId::GpsUsage => self.gps_percent(),
            KpiId::AverageSpeed => self.speed(),
            KpiId::IdleEngine => self.idle_percent(),
            KpiId::MechanicalAvailability => self.availability(),
            KpiId::Maneuvers => 0.0,
        }
    }
}

/// Maneuver statistics of one fleet
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ManeuverRow {
    #[serde(rename = "Frota", default, deserialize_with = "string_or_number")]
    pub fleet: String,
    /// Mean maneuver time, "HH:MM:SS"
    #[serde(rename = "Tempo Médio (hh:mm)", default, deserialize_with = "lenient_string")]
    pub mean_time: Option<String>,
    /// Mean maneuver time in decimal hours, when no clock string is given
    #[serde(rename = "Tempo Médio", default, deserialize_with = "lenient_number")]
    pub mean_hours: Option<f64>,
    /// Total maneuver time in decimal hours
    #[serde(rename = "Tempo Total", default, deserialize_with = "lenient_number")]
    pub total_hours: Option<f64>,
    #[serde(rename = "Tempo Total (hh:mm)", default, deserialize_with = "lenient_string")]
    pub total_time: Option<String>,
    #[serde(rename = "Intervalos Válidos", default, deserialize_with = "lenient_number")]
    pub valid_intervals: Option<f64>,
}

impl ManeuverRow {
    /// Mean maneuver time in seconds
    pub fn mean_seconds(&self) -> f64 {
        match (&self.mean_time, self.mean_hours) {
            (Some(clock), _) if !clock.trim().is_empty() => parse_duration_seconds(clock),
            (_, Some(hours)) if hours.is_finite() => (hours * 3600.0).round(),
            _ => 0.0,
        }
    }

    pub fn total_hours(&self) -> f64 {
        self.total_hours.unwrap_or(0.0)
    }

    pub fn valid_intervals(&self) -> f64 {
        self.valid_intervals.unwrap_or(0.0)
    }
}

impl SeriesRow for ManeuverRow {
    fn name(&self) -> &str {
        &self.fleet
    }

    fn set_name(&mut self, name: String) {
        self.fleet = name;
    }

    fn complete<R: Rng + ?Sized>(&mut self, synthetic: bool, rng: &mut R) {
        // mean time -> valid intervals -> total time
        let has_mean = self.mean_time.as_deref().is_some_and(|s| !s.trim().is_empty())
            || self.mean_hours.is_some_and(f64::is_finite);
        if !has_mean {
            let seconds = if synthetic {
                (20.0 + rng.gen::<f64>() * 100.0).round()
            } else {
                0.0
            };
            self.mean_time = Some(format_hh_mm_ss(seconds));
        }

        fill(&mut self.valid_intervals, synthetic, rng, |r| {
            (5.0 + r.gen::<f64>() * 40.0).round()
        });

        let total = self.mean_seconds() * self.valid_intervals() / 3600.0;
        derive(&mut self.total_hours, total);
        if self.total_time.is_none() {
            self.total_time = Some(format_hh_mm(self.total_hours()));
        }
    }

    fn kpi_value(&self, kpi: KpiId) -> f64 {
        match kpi {
            KpiId::Maneuvers => self.mean_seconds(),
            _ => 0.0,
        }
    }
}
