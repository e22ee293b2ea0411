//! CSV readers for trip records and station coordinates.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::error::LoadError;
use crate::frame::{TripFrame, TripRecord};
use crate::schema::TripSchema;

const STATION_COLUMNS: [&str; 4] = ["station_id", "station_name", "lat", "lon"];

/// A station location, used to place station usage on a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationCoordinate {
    pub station_id: String,
    pub station_name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Loads a trip CSV into a [`TripFrame`].
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be opened and
/// [`LoadError::MissingColumns`] if any column of `schema` is absent.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_trips(path: impl AsRef<Path>, schema: &TripSchema) -> Result<TripFrame, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let frame = read_trips(file, path, schema)?;
    info!(rows = frame.len(), "Trip CSV loaded");
    Ok(frame)
}

/// Reads trip CSV data from any reader. `origin` only labels errors.
pub fn read_trips<R: Read>(
    reader: R,
    origin: &Path,
    schema: &TripSchema,
) -> Result<TripFrame, LoadError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();

    let missing: Vec<String> = schema
        .expected_columns()
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns {
            path: origin.to_path_buf(),
            columns: missing,
        });
    }

    let position = |name: &String| column_position(&headers, name);
    let idx = ColumnIndex {
        trip_id: position(&schema.trip_id),
        trip_duration: position(&schema.trip_duration),
        start_station_id: position(&schema.start_station_id),
        start_time: position(&schema.start_time),
        start_station_name: position(&schema.start_station_name),
        end_station_id: position(&schema.end_station_id),
        end_time: position(&schema.end_time),
        end_station_name: position(&schema.end_station_name),
        bike_id: position(&schema.bike_id),
        user_type: position(&schema.user_type),
        model: position(&schema.model),
    };

    let mut rows = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        let text = |i: Option<usize>| {
            i.and_then(|i| record.get(i))
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        };

        let trip_duration = match text(idx.trip_duration) {
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(seconds) if seconds.is_finite() => Some(seconds),
                _ => {
                    return Err(LoadError::InvalidValue {
                        row,
                        column: schema.trip_duration.clone(),
                        value: raw,
                    });
                }
            },
            None => None,
        };

        rows.push(TripRecord {
            trip_id: text(idx.trip_id),
            trip_duration,
            start_station_id: text(idx.start_station_id),
            start_time: text(idx.start_time),
            start_station_name: text(idx.start_station_name),
            end_station_id: text(idx.end_station_id),
            end_time: text(idx.end_time),
            end_station_name: text(idx.end_station_name),
            bike_id: text(idx.bike_id),
            user_type: text(idx.user_type),
            model: text(idx.model),
            ..Default::default()
        });
    }

    let columns = headers.iter().map(str::to_string).collect();
    debug!(rows = rows.len(), "Trip records parsed");
    Ok(TripFrame::new(columns, rows))
}

fn column_position(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

struct ColumnIndex {
    trip_id: Option<usize>,
    trip_duration: Option<usize>,
    start_station_id: Option<usize>,
    start_time: Option<usize>,
    start_station_name: Option<usize>,
    end_station_id: Option<usize>,
    end_time: Option<usize>,
    end_station_name: Option<usize>,
    bike_id: Option<usize>,
    user_type: Option<usize>,
    model: Option<usize>,
}

/// Loads the optional station-coordinate CSV.
///
/// A missing file is not an error: the map is optional, so `Ok(None)` is
/// returned instead.
pub fn load_station_coordinates(
    path: impl AsRef<Path>,
) -> Result<Option<Vec<StationCoordinate>>, LoadError> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(path = %path.display(), "No station coordinates file");
        return Ok(None);
    }

    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut rdr = csv::Reader::from_reader(file);

    let headers = rdr.headers()?.clone();
    let missing: Vec<String> = STATION_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns {
            path: path.to_path_buf(),
            columns: missing,
        });
    }

    let mut stations = Vec::new();
    for result in rdr.deserialize() {
        let record: StationCoordinate = result?;
        stations.push(record);
    }

    info!(stations = stations.len(), "Station coordinates loaded");
    Ok(Some(stations))
}
