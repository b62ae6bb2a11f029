//! Report title, date label, front name and export file name

use chrono::{Duration, NaiveDate};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Days covered by a weekly report, the report date included
pub const WEEK_DAYS: i64 = 7;

/// Reporting period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Period {
    #[default]
    #[serde(alias = "diario")]
    Daily,
    #[serde(alias = "semanal")]
    Weekly,
}

impl Period {
    /// Label used in titles ("Diário" / "Semanal")
    pub fn label(&self) -> &'static str {
        match self {
            Period::Daily => "Diário",
            Period::Weekly => "Semanal",
        }
    }

    /// Whether map and interval pages are included
    pub fn is_daily(&self) -> bool {
        matches!(self, Period::Daily)
    }
}

/// Parse the report date ("2025-05-10" or "2025-05-10T00:00:00")
pub fn parse_report_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Display dates of a report: `(start, end)` as "dd/mm/yyyy".
///
/// Daily reports start and end on the same day. An unparseable date is
/// shown as given.
pub fn date_range(raw: &str, period: Period) -> (String, String) {
    match parse_report_date(raw) {
        Some(end) => {
            let start = match period {
                Period::Daily => end,
                Period::Weekly => end - Duration::days(WEEK_DAYS - 1),
            };
            (
                start.format("%d/%m/%Y").to_string(),
                end.format("%d/%m/%Y").to_string(),
            )
        }
        None => {
            log::warn!("unparseable report date {:?}", raw);
            (raw.to_string(), raw.to_string())
        }
    }
}

/// Date label printed in the page header
pub fn date_label(raw: &str, period: Period) -> String {
    let (start, end) = date_range(raw, period);
    match period {
        Period::Daily => end,
        Period::Weekly => format!("{} - {}", start, end),
    }
}

/// Resolve the front's display name.
///
/// An explicit name wins, then the known code mapping, then the code itself
/// when it already reads "Frente ...", then "Frente {code}".
pub fn front_name(
    explicit: Option<&str>,
    code: Option<&str>,
    known: &FxHashMap<String, String>,
) -> String {
    if let Some(name) = explicit.map(str::trim).filter(|n| !n.is_empty()) {
        return name.to_string();
    }

    match code.map(str::trim).filter(|c| !c.is_empty()) {
        Some(code) => match known.get(code) {
            Some(name) => name.clone(),
            None if code.starts_with("Frente") => code.to_string(),
            None => format!("Frente {}", code),
        },
        None => "Frente Desconhecida".to_string(),
    }
}

/// "Relatório Diário de Frotas - Colhedoras {front}"
pub fn report_title(period: Period, front: &str) -> String {
    format!("Relatório {} de Frotas - Colhedoras {}", period.label(), front)
}

/// PDF file name: "{title} - dd_mm_yyyy.pdf", or with a "start-end" range
/// for weekly reports
pub fn file_name(title: &str, raw_date: &str, period: Period) -> String {
    let (start, end) = date_range(raw_date, period);
    let date = match period {
        Period::Daily => end.replace('/', "_"),
        Period::Weekly => format!("{}-{}", start.replace('/', "_"), end.replace('/', "_")),
    };
    format!("{} - {}.pdf", title, date)
}
