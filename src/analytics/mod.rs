//! Grouped summaries over an enriched trip table.
//!
//! Every function here is pure and checks for the column it groups on first,
//! failing with [`crate::error::PipelineError::MissingColumn`] when the table
//! has not been through [`crate::cleaning::parse_and_enrich_datetime`].

pub mod counts;
pub mod duration;
pub mod stations;
pub mod types;
pub mod users;
pub mod utility;

pub use counts::{daily_trip_counts, hourly_trip_counts, monthly_trip_counts, weekly_trip_counts};
pub use duration::{DEFAULT_QUANTILES, trip_duration_summary};
pub use stations::{DEFAULT_TOP_N, StationSide, popular_stations, station_usage_points};
pub use users::user_type_summary;

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::cleaning::full_clean_pipeline;
    use crate::frame::{TripFrame, TripRecord};
    use crate::schema::TripSchema;

    fn record(
        id: usize,
        duration: f64,
        start: &str,
        start_station: &str,
        user: &str,
    ) -> TripRecord {
        TripRecord {
            trip_id: Some(id.to_string()),
            trip_duration: Some(duration),
            start_station_id: Some(if start_station == "A" { "1" } else { "2" }.to_string()),
            start_time: Some(start.to_string()),
            start_station_name: Some(start_station.to_string()),
            end_station_id: Some(if start_station == "A" { "10" } else { "20" }.to_string()),
            end_time: Some(start.to_string()),
            end_station_name: Some(if start_station == "A" { "X" } else { "Y" }.to_string()),
            bike_id: Some(id.to_string()),
            user_type: Some(user.to_string()),
            model: Some("ICONIC".to_string()),
            ..Default::default()
        }
    }

    /// Four trips over two days, two hours and two start stations.
    pub fn sample_enriched_frame() -> TripFrame {
        let schema = TripSchema::default();
        let raw = TripFrame::from_schema(
            &schema,
            vec![
                record(1, 300.0, "08/01/2024 08:00", "A", "Casual Member"),
                record(2, 600.0, "08/01/2024 09:00", "A", "Member"),
                record(3, 900.0, "08/02/2024 08:00", "B", "Member"),
                record(4, 1200.0, "08/02/2024 09:00", "B", "Casual Member"),
            ],
        );
        full_clean_pipeline(&raw, &schema).unwrap().frame
    }

    /// Enriched frame from `(start time, start station)` pairs.
    pub fn enriched_frame(trips: &[(&str, &str)]) -> TripFrame {
        let schema = TripSchema::default();
        let rows = trips
            .iter()
            .enumerate()
            .map(|(i, (start, station))| record(i + 1, 60.0, start, station, "Member"))
            .collect();
        full_clean_pipeline(&TripFrame::from_schema(&schema, rows), &schema)
            .unwrap()
            .frame
    }
}
