use bikeshare_trips::analytics::{
    DEFAULT_QUANTILES, daily_trip_counts, hourly_trip_counts, popular_stations,
    station_usage_points, trip_duration_summary, user_type_summary, weekly_trip_counts,
};
use bikeshare_trips::cleaning::full_clean_pipeline;
use bikeshare_trips::config::ReportConfig;
use bikeshare_trips::filter::TripFilter;
use bikeshare_trips::loader::{load_station_coordinates, load_trips, read_trips};
use bikeshare_trips::output::export_enriched_csv;
use bikeshare_trips::report::TripReport;
use bikeshare_trips::schema::TripSchema;
use std::path::Path;

const TRIPS: &str = "tests/fixtures/trips_sample.csv";
const STATIONS: &str = "tests/fixtures/stations_coordinates.csv";

#[test]
fn test_full_pipeline() {
    let schema = TripSchema::default();
    let raw = load_trips(TRIPS, &schema).expect("Failed to load trips");
    let cleaned = full_clean_pipeline(&raw, &schema).expect("Failed to clean trips");

    assert_eq!(raw.len(), 8);
    assert_eq!(cleaned.summary.clean_rows, 5);
    assert_eq!(cleaned.summary.dropped_rows, 3);

    let frame = &cleaned.frame;
    let hourly = hourly_trip_counts(frame, &schema).unwrap();
    let hours: Vec<_> = hourly.iter().map(|h| (h.start_hour, h.trip_count)).collect();
    assert_eq!(hours, vec![(8, 2), (9, 1), (12, 1), (17, 1)]);

    let daily = daily_trip_counts(frame, &schema).unwrap();
    assert_eq!(daily.iter().map(|d| d.trip_count).sum::<usize>(), frame.len());

    let weekly = weekly_trip_counts(frame, &schema).unwrap();
    let weeks: Vec<_> = weekly.iter().map(|w| (w.week_label.as_str(), w.trip_count)).collect();
    assert_eq!(weeks, vec![("2024-W31", 4), ("2024-W32", 1)]);

    let top = popular_stations(frame, &schema, 2, "start").unwrap();
    assert_eq!(top[0].station_name, "Fort York Blvd / Capreol Ct");
    assert_eq!(top[0].trip_count, 2);
    assert_eq!(top[1].station_name, "Madison Ave / Bloor St W");

    let users = user_type_summary(frame, &schema).unwrap();
    assert_eq!(users[0].user_type, "Annual Member");
    assert_eq!(users[0].trip_count, 3);
    assert_eq!(users[1].avg_duration_min, Some(25.0));

    let durations = trip_duration_summary(frame, &schema, &DEFAULT_QUANTILES)
        .unwrap()
        .expect("durations present");
    assert_eq!(durations.median, 15.0);
    assert_eq!(durations.get("q25"), Some(10.0));
    assert_eq!(durations.get("q75"), Some(20.0));
    assert_eq!(durations.min, 4.0);
    assert_eq!(durations.max, 30.0);
}

#[test]
fn test_station_points_from_fixture() {
    let schema = TripSchema::default();
    let raw = load_trips(TRIPS, &schema).unwrap();
    let cleaned = full_clean_pipeline(&raw, &schema).unwrap();
    let coordinates = load_station_coordinates(STATIONS).unwrap().unwrap();

    let points = station_usage_points(&cleaned.frame, &schema, &coordinates).unwrap();
    let ids: Vec<_> = points.iter().map(|p| p.station_id.as_str()).collect();
    assert_eq!(ids, vec!["7000", "7001", "7003"]);
    assert_eq!(points[0].trip_count, 2);
}

#[test]
fn test_report_with_filter() {
    let config = ReportConfig::default();
    let raw = load_trips(TRIPS, &config.schema).unwrap();
    let cleaned = full_clean_pipeline(&raw, &config.schema).unwrap();
    let filter = TripFilter {
        models: Some(["EFIT".to_string()].into_iter().collect()),
        ..Default::default()
    };

    let report = TripReport::build(&cleaned, &filter, &config, None).unwrap();

    assert_eq!(report.rows.raw_rows, 8);
    assert_eq!(report.filtered_rows, 2);
    assert_eq!(report.metrics.avg_duration_min, Some(17.5));
    assert_eq!(report.hourly.iter().map(|h| h.trip_count).sum::<usize>(), 2);
}

#[test]
fn test_malformed_timestamp_fails_the_pipeline() {
    let schema = TripSchema::default();
    let csv = "Trip Id,Trip  Duration,Start Station Id,Start Time,Start Station Name,End Station Id,End Time,End Station Name,Bike Id,User Type,Model\n\
               1,60,7000,2024-08-01T08:00,A,7001,08/01/2024 08:01,B,1,Annual Member,ICONIC\n";
    let raw = read_trips(csv.as_bytes(), Path::new("inline.csv"), &schema).unwrap();

    let err = full_clean_pipeline(&raw, &schema).unwrap_err();
    assert!(err.to_string().contains("2024-08-01T08:00"));
}

#[test]
fn test_export_round_trips_row_count() {
    let schema = TripSchema::default();
    let raw = load_trips(TRIPS, &schema).unwrap();
    let cleaned = full_clean_pipeline(&raw, &schema).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("enriched.csv");
    export_enriched_csv(&path, &cleaned.frame, &schema, false).unwrap();

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert!(headers.iter().any(|h| h == "trip_duration_min"));
    assert_eq!(rdr.records().count(), cleaned.frame.len());
}
