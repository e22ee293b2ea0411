//! Slicing an enriched trip table and headline metrics over a slice.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

use crate::analytics::popular_stations;
use crate::analytics::utility::mean;
use crate::error::PipelineResult;
use crate::frame::TripFrame;
use crate::schema::TripSchema;

/// Row selection by trip date, user type and bike model.
///
/// A `None` selection keeps every row for that field; an empty set keeps none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripFilter {
    /// Inclusive `(from, to)` trip date range.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub user_types: Option<HashSet<String>>,
    pub models: Option<HashSet<String>>,
}

impl TripFilter {
    pub fn is_empty(&self) -> bool {
        self.date_range.is_none() && self.user_types.is_none() && self.models.is_none()
    }

    /// Returns a new frame holding only the selected rows, in input order.
    pub fn apply(&self, frame: &TripFrame, schema: &TripSchema) -> PipelineResult<TripFrame> {
        if self.date_range.is_some() {
            frame.require_column(&schema.trip_date)?;
        }

        let rows = frame
            .rows()
            .iter()
            .filter(|row| match self.date_range {
                Some((from, to)) => row.trip_date.is_some_and(|d| from <= d && d <= to),
                None => true,
            })
            .filter(|row| selected(&self.user_types, row.user_type.as_deref()))
            .filter(|row| selected(&self.models, row.model.as_deref()))
            .cloned()
            .collect();

        Ok(frame.with_rows(rows))
    }
}

fn selected(choices: &Option<HashSet<String>>, value: Option<&str>) -> bool {
    match (choices, value) {
        (None, _) => true,
        (Some(set), Some(v)) => set.contains(v),
        (Some(_), None) => false,
    }
}

/// Sorted distinct user types, for building a filter picker.
pub fn distinct_user_types(frame: &TripFrame) -> Vec<String> {
    distinct(frame.rows().iter().filter_map(|r| r.user_type.as_deref()))
}

/// Sorted distinct bike models, for building a filter picker.
pub fn distinct_models(frame: &TripFrame) -> Vec<String> {
    distinct(frame.rows().iter().filter_map(|r| r.model.as_deref()))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Headline numbers shown above the charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyMetrics {
    pub total_trips: usize,
    pub avg_duration_min: Option<f64>,
    pub top_start_station: Option<String>,
}

/// Total trips, mean trip duration and the busiest start station.
///
/// The top station follows the same tie-break as
/// [`crate::analytics::popular_stations`].
pub fn key_metrics(frame: &TripFrame, schema: &TripSchema) -> PipelineResult<KeyMetrics> {
    frame.require_column(&schema.trip_duration_min)?;

    let durations: Vec<f64> = frame
        .rows()
        .iter()
        .filter_map(|r| r.trip_duration_min)
        .filter(|m| !m.is_nan())
        .collect();
    let top_start_station = popular_stations(frame, schema, 1, "start")?
        .into_iter()
        .next()
        .map(|s| s.station_name);

    Ok(KeyMetrics {
        total_trips: frame.len(),
        avg_duration_min: if durations.is_empty() {
            None
        } else {
            Some(mean(&durations))
        },
        top_start_station,
    })
}
