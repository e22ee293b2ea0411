//! Result rows produced by the aggregation functions.
//!
//! Field names double as the column names seen by chart and dashboard code.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Trips starting in one hour of the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyCount {
    pub start_hour: u32,
    pub trip_count: usize,
}

/// Trips starting on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub trip_date: NaiveDate,
    pub trip_count: usize,
}

/// Trips starting in one ISO week, labelled `YYYY-Www`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyCount {
    pub week_label: String,
    pub trip_count: usize,
}

/// Trips starting in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    /// `YYYY-MM`.
    pub month: String,
    pub month_name: &'static str,
    pub trip_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationCount {
    pub station_name: String,
    pub trip_count: usize,
}

/// Trip count and mean duration for one rider category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserTypeSummary {
    pub user_type: String,
    pub trip_count: usize,
    /// `None` when no trip of this type has a duration.
    pub avg_duration_min: Option<f64>,
}

/// Summary statistics over trip durations in minutes.
///
/// Quantiles are keyed `q<percent>`, e.g. `q25`, and serialise alongside the
/// fixed statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationSummary {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    #[serde(flatten)]
    pub quantiles: BTreeMap<String, f64>,
}

impl DurationSummary {
    /// Looks up any statistic by its output key.
    pub fn get(&self, key: &str) -> Option<f64> {
        match key {
            "mean" => Some(self.mean),
            "median" => Some(self.median),
            "min" => Some(self.min),
            "max" => Some(self.max),
            _ => self.quantiles.get(key).copied(),
        }
    }
}

/// Start-station usage joined with coordinates, for map rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationPoint {
    pub station_id: String,
    pub station_name: String,
    pub lat: f64,
    pub lon: f64,
    pub trip_count: usize,
}
