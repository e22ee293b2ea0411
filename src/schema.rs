//! Column names for the trip table.
//!
//! [`TripSchema`] is built once (from defaults or the JSON config file) and
//! passed by reference to every stage, so no stage depends on global names.

use serde::{Deserialize, Serialize};

/// Source and derived column names of a trip table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripSchema {
    pub trip_id: String,
    /// The Toronto export spells this header with two spaces.
    pub trip_duration: String,
    pub start_station_id: String,
    pub start_time: String,
    pub start_station_name: String,
    pub end_station_id: String,
    pub end_time: String,
    pub end_station_name: String,
    pub bike_id: String,
    pub user_type: String,
    pub model: String,

    pub trip_date: String,
    pub start_hour: String,
    pub start_weekday: String,
    pub start_month: String,
    pub trip_duration_min: String,
}

impl Default for TripSchema {
    fn default() -> Self {
        Self {
            trip_id: "Trip Id".into(),
            trip_duration: "Trip  Duration".into(),
            start_station_id: "Start Station Id".into(),
            start_time: "Start Time".into(),
            start_station_name: "Start Station Name".into(),
            end_station_id: "End Station Id".into(),
            end_time: "End Time".into(),
            end_station_name: "End Station Name".into(),
            bike_id: "Bike Id".into(),
            user_type: "User Type".into(),
            model: "Model".into(),
            trip_date: "trip_date".into(),
            start_hour: "start_hour".into(),
            start_weekday: "start_weekday".into(),
            start_month: "start_month".into(),
            trip_duration_min: "trip_duration_min".into(),
        }
    }
}

impl TripSchema {
    /// Columns a raw trip CSV must carry, in file order.
    pub fn expected_columns(&self) -> [&str; 11] {
        [
            self.trip_id.as_str(),
            self.trip_duration.as_str(),
            self.start_station_id.as_str(),
            self.start_time.as_str(),
            self.start_station_name.as_str(),
            self.end_station_id.as_str(),
            self.end_time.as_str(),
            self.end_station_name.as_str(),
            self.bike_id.as_str(),
            self.user_type.as_str(),
            self.model.as_str(),
        ]
    }

    /// Columns added by enrichment.
    pub fn derived_columns(&self) -> [&str; 5] {
        [
            self.trip_date.as_str(),
            self.start_hour.as_str(),
            self.start_weekday.as_str(),
            self.start_month.as_str(),
            self.trip_duration_min.as_str(),
        ]
    }
}
