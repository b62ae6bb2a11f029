//! Gantt geometry for a 24-hour operation timeline

use crate::timeline::clock::{format_clock, parse_clock_minutes, wrap_hour, MINUTES_PER_DAY};
use crate::timeline::{IntervalCategory, IntervalRecord};
use crate::Rect;
use serde::{Deserialize, Serialize};

/// Fixed dimensions of the timeline chart, in chart units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimelineScale {
    /// Width the 1440-minute domain is mapped onto
    pub width: f32,
    /// Height of the hour label header
    pub header_height: f32,
    /// Height of each category lane
    pub lane_height: f32,
    /// Height of a bar inside its lane
    pub bar_height: f32,
    /// Space below the last lane
    pub bottom_padding: f32,
    /// Shortest bar drawn, in minutes
    pub min_bar_minutes: f64,
    /// Bars longer than this carry a duration label
    pub label_min_minutes: f64,
    /// Maintenance bars longer than this carry a duration label
    pub maintenance_label_min_minutes: f64,
}

impl Default for TimelineScale {
    fn default() -> Self {
        Self {
            width: 1440.0,
            header_height: 40.0,
            lane_height: 60.0,
            bar_height: 40.0,
            bottom_padding: 10.0,
            min_bar_minutes: 1.0,
            label_min_minutes: 30.0,
            maintenance_label_min_minutes: 10.0,
        }
    }
}

impl TimelineScale {
    /// Chart units per minute
    pub fn units_per_minute(&self) -> f32 {
        self.width / MINUTES_PER_DAY as f32
    }

    /// Map minutes of day to a horizontal position
    pub fn x_for_minutes(&self, minutes: f64) -> f32 {
        minutes as f32 * self.units_per_minute()
    }

    /// Top of the lane assigned to a category
    pub fn lane_top(&self, lane: usize) -> f32 {
        self.header_height + lane as f32 * self.lane_height
    }

    /// Total chart height: header, every lane and the bottom padding
    pub fn height(&self) -> f32 {
        self.header_height
            + IntervalCategory::LANES.len() as f32 * self.lane_height
            + self.bottom_padding
    }
}

/// Horizontal anchor for a tick label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// One hour grid line with its label
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLine {
    pub hour: u32,
    pub x: f32,
    pub y_top: f32,
    pub y_bottom: f32,
    pub label: String,
    pub anchor: TextAnchor,
}

/// Background band of one category lane
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneBand {
    pub category: IntervalCategory,
    pub rect: Rect,
}

/// A positioned interval bar
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineBar {
    pub category: IntervalCategory,
    pub rect: Rect,
    pub start_minutes: f64,
    pub duration_minutes: f64,
    /// Duration in hours ("1.5h"), when the bar is long enough
    pub label: Option<String>,
    /// "HH:MM - HH:MM" under labelled maintenance bars
    pub caption: Option<String>,
}

/// Geometry for one equipment's timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineGeometry {
    pub equipment: String,
    pub width: f32,
    pub height: f32,
    pub lanes: Vec<LaneBand>,
    pub ticks: Vec<GridLine>,
    pub bars: Vec<TimelineBar>,
}

/// Whether a bar gets a duration label
pub fn shows_label(category: IntervalCategory, duration_minutes: f64, scale: &TimelineScale) -> bool {
    duration_minutes > scale.label_min_minutes
        || (category == IntervalCategory::Maintenance
            && duration_minutes > scale.maintenance_label_min_minutes)
}

/// Hour grid lines 0..=24
pub fn hour_ticks(scale: &TimelineScale) -> Vec<GridLine> {
    let y_bottom = scale.height();
    (0..=24u32)
        .map(|hour| GridLine {
            hour,
            x: scale.x_for_minutes(hour as f64 * 60.0),
            y_top: scale.header_height,
            y_bottom,
            label: tick_label(hour),
            anchor: match hour {
                0 => TextAnchor::Start,
                24 => TextAnchor::End,
                _ => TextAnchor::Middle,
            },
        })
        .collect()
}

/// Position a single interval, or `None` when its category has no lane
pub fn layout_bar(record: &IntervalRecord, scale: &TimelineScale) -> Option<TimelineBar> {
    let lane = record.category.lane()?;

    let start = parse_clock_minutes(&record.start);
    let duration = if record.duration_hours.is_finite() {
        record.duration_hours.max(0.0) * 60.0
    } else {
        0.0
    };
    let drawn = duration.max(scale.min_bar_minutes);

    let rect = Rect::new(
        scale.x_for_minutes(start),
        scale.lane_top(lane) + (scale.lane_height - scale.bar_height) / 2.0,
        scale.x_for_minutes(drawn),
        scale.bar_height,
    );

    let labelled = shows_label(record.category, duration, scale);
    let label = labelled.then(|| format!("{:.1}h", duration / 60.0));
    let caption = (labelled && record.category == IntervalCategory::Maintenance)
        .then(|| format!("{} - {}", format_clock(start), format_clock(start + duration)));

    Some(TimelineBar {
        category: record.category,
        rect,
        start_minutes: start,
        duration_minutes: duration,
        label,
        caption,
    })
}

/// Build the full geometry for one equipment's intervals.
///
/// Records whose category has no lane are dropped.
pub fn build_geometry(
    equipment: &str,
    intervals: &[IntervalRecord],
    scale: &TimelineScale,
) -> TimelineGeometry {
    let bars: Vec<TimelineBar> = intervals
        .iter()
        .filter_map(|record| {
            let bar = layout_bar(record, scale);
            if bar.is_none() {
                log::trace!(
                    "dropping interval of {} with unknown category at {}",
                    equipment,
                    record.start
                );
            }
            bar
        })
        .collect();

    let lanes = IntervalCategory::LANES
        .iter()
        .enumerate()
        .map(|(lane, category)| LaneBand {
            category: *category,
            rect: Rect::new(0.0, scale.lane_top(lane), scale.width, scale.lane_height),
        })
        .collect();

    TimelineGeometry {
        equipment: equipment.to_string(),
        width: scale.width,
        height: scale.height(),
        lanes,
        ticks: hour_ticks(scale),
        bars,
    }
}

/// Tick label for an hour that may lie past midnight
pub fn tick_label(hour: u32) -> String {
    wrap_hour(hour).to_string()
}
