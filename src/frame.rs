//! In-memory trip table.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{PipelineError, PipelineResult};
use crate::schema::TripSchema;

/// One row of the trip table.
///
/// Source fields are `None` where the CSV cell was empty. Derived fields stay
/// `None` until [`crate::cleaning::parse_and_enrich_datetime`] fills them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripRecord {
    pub trip_id: Option<String>,
    /// Seconds.
    pub trip_duration: Option<f64>,
    pub start_station_id: Option<String>,
    pub start_time: Option<String>,
    pub start_station_name: Option<String>,
    pub end_station_id: Option<String>,
    pub end_time: Option<String>,
    pub end_station_name: Option<String>,
    pub bike_id: Option<String>,
    pub user_type: Option<String>,
    pub model: Option<String>,

    pub started_at: Option<NaiveDateTime>,
    pub ended_at: Option<NaiveDateTime>,
    pub trip_date: Option<NaiveDate>,
    pub start_hour: Option<u32>,
    pub start_weekday: Option<&'static str>,
    pub start_month: Option<&'static str>,
    pub trip_duration_min: Option<f64>,
}

/// Named columns plus rows.
///
/// Column presence is what the analytics layer checks before aggregating, the
/// same way a dataframe would be inspected for a feature column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripFrame {
    columns: Vec<String>,
    rows: Vec<TripRecord>,
}

impl TripFrame {
    pub fn new(columns: Vec<String>, rows: Vec<TripRecord>) -> Self {
        Self { columns, rows }
    }

    /// Builds a frame carrying every source column of `schema`.
    pub fn from_schema(schema: &TripSchema, rows: Vec<TripRecord>) -> Self {
        let columns = schema
            .expected_columns()
            .iter()
            .map(|c| c.to_string())
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[TripRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Fails with [`PipelineError::MissingColumn`] when `name` is absent.
    pub fn require_column(&self, name: &str) -> PipelineResult<()> {
        if self.has_column(name) {
            Ok(())
        } else {
            Err(PipelineError::missing_column(name))
        }
    }

    /// New frame with the same columns and the given rows.
    pub(crate) fn with_rows(&self, rows: Vec<TripRecord>) -> Self {
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    pub(crate) fn add_column(&mut self, name: &str) {
        if !self.has_column(name) {
            self.columns.push(name.to_string());
        }
    }
}
