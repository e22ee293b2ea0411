//! Row validation and datetime feature enrichment.
//!
//! [`clean_basic`] drops structurally invalid rows, [`parse_and_enrich_datetime`]
//! adds the calendar and duration features the analytics layer groups on, and
//! [`full_clean_pipeline`] runs both while recording how many rows were dropped.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{PipelineError, PipelineResult};
use crate::frame::{TripFrame, TripRecord};
use crate::schema::TripSchema;

/// Timestamp layout of the Start Time / End Time columns, e.g. `08/01/2024 08:00`.
pub const DATETIME_FORMAT: &str = "%m/%d/%Y %H:%M";

// English names, independent of the host locale.
const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn weekday_name(weekday: Weekday) -> &'static str {
    WEEKDAY_NAMES[weekday.num_days_from_monday() as usize]
}

/// Full month name for a chrono zero-based month (`0` is January).
pub fn month_name(month0: u32) -> &'static str {
    MONTH_NAMES[month0 as usize % 12]
}

/// Row counts before and after basic cleaning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineSummary {
    pub raw_rows: usize,
    pub clean_rows: usize,
    pub dropped_rows: usize,
}

/// Output of [`full_clean_pipeline`].
#[derive(Debug, Clone)]
pub struct CleanedTrips {
    pub frame: TripFrame,
    pub summary: PipelineSummary,
}

/// Drops rows missing Start Time, End Time or User Type, and rows whose trip
/// duration is negative when the duration column exists.
///
/// A row with no duration fails the `>= 0` check as well, so it is dropped
/// whenever the duration column is part of the frame. Surviving rows keep
/// their input order. The input frame is left untouched.
pub fn clean_basic(frame: &TripFrame, schema: &TripSchema) -> TripFrame {
    let check_duration = frame.has_column(&schema.trip_duration);

    let rows: Vec<TripRecord> = frame
        .rows()
        .iter()
        .filter(|row| has_required_fields(row))
        .filter(|row| !check_duration || row.trip_duration.is_some_and(|d| d >= 0.0))
        .cloned()
        .collect();

    debug!(
        rows_in = frame.len(),
        rows_out = rows.len(),
        dropped = frame.len() - rows.len(),
        "Basic cleaning finished"
    );

    frame.with_rows(rows)
}

fn has_required_fields(row: &TripRecord) -> bool {
    row.start_time.is_some() && row.end_time.is_some() && row.user_type.is_some()
}

/// Parses Start Time and End Time and derives trip date, start hour, start
/// weekday, start month and trip duration in minutes.
///
/// # Errors
///
/// Returns [`PipelineError::Parse`] for the first timestamp that is missing or
/// does not match [`DATETIME_FORMAT`]; no partial frame is produced.
pub fn parse_and_enrich_datetime(
    frame: &TripFrame,
    schema: &TripSchema,
) -> PipelineResult<TripFrame> {
    let has_duration = frame.has_column(&schema.trip_duration);
    let mut rows = Vec::with_capacity(frame.len());

    for (idx, row) in frame.rows().iter().enumerate() {
        let started_at = parse_timestamp(idx, &schema.start_time, row.start_time.as_deref())?;
        let ended_at = parse_timestamp(idx, &schema.end_time, row.end_time.as_deref())?;

        let mut enriched = row.clone();
        enriched.started_at = Some(started_at);
        enriched.ended_at = Some(ended_at);
        enriched.trip_date = Some(started_at.date());
        enriched.start_hour = Some(started_at.hour());
        enriched.start_weekday = Some(weekday_name(started_at.weekday()));
        enriched.start_month = Some(month_name(started_at.month0()));
        enriched.trip_duration_min = if has_duration {
            row.trip_duration.map(|seconds| seconds / 60.0)
        } else {
            None
        };

        rows.push(enriched);
    }

    let mut enriched = frame.with_rows(rows);
    for column in schema.derived_columns() {
        enriched.add_column(column);
    }

    debug!(rows = enriched.len(), "Datetime features derived");
    Ok(enriched)
}

fn parse_timestamp(
    row: usize,
    column: &str,
    value: Option<&str>,
) -> PipelineResult<NaiveDateTime> {
    let raw = value.unwrap_or_default();
    NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT).map_err(|_| PipelineError::Parse {
        row,
        column: column.to_string(),
        value: raw.to_string(),
    })
}

/// Runs [`clean_basic`] then [`parse_and_enrich_datetime`].
#[tracing::instrument(skip_all, fields(raw_rows = frame.len()))]
pub fn full_clean_pipeline(
    frame: &TripFrame,
    schema: &TripSchema,
) -> PipelineResult<CleanedTrips> {
    let cleaned = clean_basic(frame, schema);
    let enriched = parse_and_enrich_datetime(&cleaned, schema)?;

    let summary = PipelineSummary {
        raw_rows: frame.len(),
        clean_rows: enriched.len(),
        dropped_rows: frame.len() - enriched.len(),
    };

    info!(
        raw_rows = summary.raw_rows,
        clean_rows = summary.clean_rows,
        dropped_rows = summary.dropped_rows,
        "Trip table cleaned and enriched"
    );

    Ok(CleanedTrips {
        frame: enriched,
        summary,
    })
}
