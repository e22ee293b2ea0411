//! The full set of aggregations for one (optionally filtered) trip table.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::analytics::types::{
    DailyCount, DurationSummary, HourlyCount, MonthlyCount, StationCount, StationPoint,
    UserTypeSummary, WeeklyCount,
};
use crate::analytics::{
    daily_trip_counts, hourly_trip_counts, monthly_trip_counts, popular_stations,
    station_usage_points, trip_duration_summary, user_type_summary, weekly_trip_counts,
};
use crate::cleaning::{CleanedTrips, PipelineSummary};
use crate::config::ReportConfig;
use crate::error::PipelineResult;
use crate::filter::{KeyMetrics, TripFilter, key_metrics};
use crate::loader::StationCoordinate;

#[derive(Debug, Clone, Serialize)]
pub struct TripReport {
    pub generated_at: DateTime<Utc>,
    pub rows: PipelineSummary,
    /// Rows left after the filter, i.e. the rows every aggregation covers.
    pub filtered_rows: usize,
    pub metrics: KeyMetrics,

    pub hourly: Vec<HourlyCount>,
    pub daily: Vec<DailyCount>,
    pub weekly: Vec<WeeklyCount>,
    pub monthly: Vec<MonthlyCount>,
    pub popular_start_stations: Vec<StationCount>,
    pub popular_end_stations: Vec<StationCount>,
    pub user_types: Vec<UserTypeSummary>,
    pub duration: Option<DurationSummary>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_points: Option<Vec<StationPoint>>,
}

impl TripReport {
    /// Applies `filter` to the cleaned table and runs every aggregation on
    /// the result.
    #[tracing::instrument(skip_all, fields(clean_rows = cleaned.frame.len()))]
    pub fn build(
        cleaned: &CleanedTrips,
        filter: &TripFilter,
        config: &ReportConfig,
        coordinates: Option<&[StationCoordinate]>,
    ) -> PipelineResult<Self> {
        let schema = &config.schema;
        let frame = filter.apply(&cleaned.frame, schema)?;
        if !filter.is_empty() {
            debug!(filtered_rows = frame.len(), "Filter applied");
        }

        let station_points = match coordinates {
            Some(coords) => Some(station_usage_points(&frame, schema, coords)?),
            None => None,
        };

        Ok(TripReport {
            generated_at: Utc::now(),
            rows: cleaned.summary,
            filtered_rows: frame.len(),
            metrics: key_metrics(&frame, schema)?,
            hourly: hourly_trip_counts(&frame, schema)?,
            daily: daily_trip_counts(&frame, schema)?,
            weekly: weekly_trip_counts(&frame, schema)?,
            monthly: monthly_trip_counts(&frame, schema)?,
            popular_start_stations: popular_stations(&frame, schema, config.top_n, "start")?,
            popular_end_stations: popular_stations(&frame, schema, config.top_n, "end")?,
            user_types: user_type_summary(&frame, schema)?,
            duration: trip_duration_summary(&frame, schema, &config.quantiles)?,
            station_points,
        })
    }
}
