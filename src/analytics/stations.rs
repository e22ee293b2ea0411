use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use crate::analytics::types::{StationCount, StationPoint};
use crate::analytics::utility::count_by;
use crate::error::{PipelineError, PipelineResult};
use crate::frame::{TripFrame, TripRecord};
use crate::loader::StationCoordinate;
use crate::schema::TripSchema;

pub const DEFAULT_TOP_N: usize = 10;

/// Which end of the trip a station ranking is computed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationSide {
    Start,
    End,
}

impl StationSide {
    fn column(self, schema: &TripSchema) -> &str {
        match self {
            StationSide::Start => &schema.start_station_name,
            StationSide::End => &schema.end_station_name,
        }
    }

    fn name(self, row: &TripRecord) -> Option<&str> {
        match self {
            StationSide::Start => row.start_station_name.as_deref(),
            StationSide::End => row.end_station_name.as_deref(),
        }
    }
}

impl FromStr for StationSide {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(StationSide::Start),
            "end" => Ok(StationSide::End),
            other => Err(PipelineError::InvalidArgument(format!(
                "Parameter 'by' must be 'start' or 'end', got {:?}",
                other
            ))),
        }
    }
}

/// The `top_n` most used start or end stations.
///
/// `by` must be `"start"` or `"end"`. Rows are ordered by trip count
/// descending; equal counts are ordered by station name ascending, so the
/// cut-off at `top_n` is deterministic. Rows without a station name are not
/// counted.
pub fn popular_stations(
    frame: &TripFrame,
    schema: &TripSchema,
    top_n: usize,
    by: &str,
) -> PipelineResult<Vec<StationCount>> {
    let side: StationSide = by.parse()?;
    frame.require_column(side.column(schema))?;

    let mut counts = count_by(frame.rows().iter().filter_map(|r| side.name(r)));
    // stable: ties keep the ascending name order from count_by
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    Ok(counts
        .into_iter()
        .take(top_n)
        .map(|(name, trip_count)| StationCount {
            station_name: name.to_string(),
            trip_count,
        })
        .collect())
}

/// Start-station trip counts joined with station coordinates by station id.
///
/// Stations without coordinates are left out. Ordered by trip count
/// descending, then station id ascending.
pub fn station_usage_points(
    frame: &TripFrame,
    schema: &TripSchema,
    coordinates: &[StationCoordinate],
) -> PipelineResult<Vec<StationPoint>> {
    frame.require_column(&schema.start_station_id)?;

    let by_id: HashMap<&str, &StationCoordinate> = coordinates
        .iter()
        .map(|c| (c.station_id.as_str(), c))
        .collect();

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for row in frame.rows() {
        if let Some(id) = row.start_station_id.as_deref() {
            *counts.entry(id).or_default() += 1;
        }
    }

    let mut points: Vec<StationPoint> = counts
        .into_iter()
        .filter_map(|(id, trip_count)| {
            let coord = by_id.get(id)?;
            Some(StationPoint {
                station_id: id.to_string(),
                station_name: coord.station_name.clone(),
                lat: coord.lat,
                lon: coord.lon,
                trip_count,
            })
        })
        .collect();
    points.sort_by(|a, b| b.trip_count.cmp(&a.trip_count));

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::fixtures::{enriched_frame, sample_enriched_frame};

    #[test]
    fn test_popular_stations_tie_breaks_by_name() {
        let schema = TripSchema::default();
        let frame = sample_enriched_frame();
        let top = popular_stations(&frame, &schema, 1, "start").unwrap();

        assert_eq!(
            top,
            vec![StationCount {
                station_name: "A".to_string(),
                trip_count: 2,
            }]
        );
    }

    #[test]
    fn test_popular_stations_sorted_by_count() {
        let schema = TripSchema::default();
        let frame = enriched_frame(&[
            ("08/01/2024 08:00", "Queen St"),
            ("08/01/2024 08:00", "Bay St"),
            ("08/01/2024 08:00", "Queen St"),
            ("08/01/2024 08:00", "Union"),
            ("08/01/2024 08:00", "Queen St"),
            ("08/01/2024 08:00", "Union"),
        ]);
        let top = popular_stations(&frame, &schema, DEFAULT_TOP_N, "start").unwrap();

        let names: Vec<_> = top.iter().map(|s| s.station_name.as_str()).collect();
        assert_eq!(names, vec!["Queen St", "Union", "Bay St"]);
        assert_eq!(top.iter().map(|s| s.trip_count).sum::<usize>(), frame.len());
    }

    #[test]
    fn test_popular_stations_by_end() {
        let schema = TripSchema::default();
        let top = popular_stations(&sample_enriched_frame(), &schema, 10, "end").unwrap();

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].station_name, "X");
        assert_eq!(top[1].station_name, "Y");
    }

    #[test]
    fn test_popular_stations_rejects_unknown_side() {
        let schema = TripSchema::default();
        let result = popular_stations(&sample_enriched_frame(), &schema, 10, "bogus");

        assert!(matches!(result, Err(PipelineError::InvalidArgument(_))));
    }

    #[test]
    fn test_popular_stations_skips_missing_names() {
        let schema = TripSchema::default();
        let mut frame = sample_enriched_frame();
        let mut rows = frame.rows().to_vec();
        rows[0].start_station_name = None;
        frame = frame.with_rows(rows);

        let top = popular_stations(&frame, &schema, 10, "start").unwrap();
        assert_eq!(top[0].station_name, "B");
        assert_eq!(top.iter().map(|s| s.trip_count).sum::<usize>(), 3);
    }

    #[test]
    fn test_station_usage_points_joins_coordinates() {
        let schema = TripSchema::default();
        let coordinates = vec![
            StationCoordinate {
                station_id: "1".to_string(),
                station_name: "A".to_string(),
                lat: 43.65,
                lon: -79.38,
            },
            StationCoordinate {
                station_id: "2".to_string(),
                station_name: "B".to_string(),
                lat: 43.66,
                lon: -79.39,
            },
        ];
        let mut rows = sample_enriched_frame().rows().to_vec();
        rows[2].start_station_id = Some("99".to_string());
        let frame = sample_enriched_frame().with_rows(rows);

        let points = station_usage_points(&frame, &schema, &coordinates).unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].station_id, "1");
        assert_eq!(points[0].trip_count, 2);
        assert_eq!(points[1].station_id, "2");
        assert_eq!(points[1].trip_count, 1);
    }
}
