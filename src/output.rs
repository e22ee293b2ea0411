//! Output formatting and persistence for reports and enriched tables.
//!
//! Supports pretty-printing, JSON serialization, and CSV export with optional
//! gzip compression.

use anyhow::Result;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::frame::{TripFrame, TripRecord};
use crate::report::TripReport;
use crate::schema::TripSchema;

/// Logs the report using Rust's debug pretty-print format.
pub fn print_pretty(report: &TripReport) {
    debug!("{:#?}", report);
}

/// Writes the report as pretty-printed JSON to `out`.
pub fn write_json<W: Write>(report: &TripReport, mut out: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, report)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Writes the report as JSON to a file, replacing it if it exists.
pub fn write_json_file(path: impl AsRef<Path>, report: &TripReport) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Writing JSON report");
    write_json(report, File::create(path)?)
}

/// Writes an enriched table as CSV: the source columns followed by the derived
/// feature columns, headed with the names in `schema`.
pub fn write_enriched_csv<W: Write>(frame: &TripFrame, schema: &TripSchema, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let header: Vec<&str> = schema
        .expected_columns()
        .into_iter()
        .chain(schema.derived_columns())
        .collect();
    writer.write_record(&header)?;

    for row in frame.rows() {
        writer.write_record(enriched_cells(row))?;
    }

    writer.flush()?;
    Ok(())
}

fn enriched_cells(row: &TripRecord) -> [String; 16] {
    fn text(value: &Option<String>) -> String {
        value.clone().unwrap_or_default()
    }
    fn num<T: ToString>(value: Option<T>) -> String {
        value.map(|v| v.to_string()).unwrap_or_default()
    }

    [
        text(&row.trip_id),
        num(row.trip_duration),
        text(&row.start_station_id),
        text(&row.start_time),
        text(&row.start_station_name),
        text(&row.end_station_id),
        text(&row.end_time),
        text(&row.end_station_name),
        text(&row.bike_id),
        text(&row.user_type),
        text(&row.model),
        num(row.trip_date),
        num(row.start_hour),
        num(row.start_weekday),
        num(row.start_month),
        num(row.trip_duration_min),
    ]
}

/// Writes an enriched table to `path` as CSV, gzip-compressed when `gzip`.
pub fn export_enriched_csv(
    path: impl AsRef<Path>,
    frame: &TripFrame,
    schema: &TripSchema,
    gzip: bool,
) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;

    if gzip {
        let mut encoder = GzEncoder::new(file, Compression::default());
        write_enriched_csv(frame, schema, &mut encoder)?;
        encoder.finish()?;
    } else {
        write_enriched_csv(frame, schema, file)?;
    }

    info!(path = %path.display(), rows = frame.len(), gzip, "Enriched CSV written");
    Ok(())
}
