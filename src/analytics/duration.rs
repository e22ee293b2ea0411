use std::collections::BTreeMap;

use crate::analytics::types::DurationSummary;
use crate::analytics::utility::{mean, quantile_sorted};
use crate::error::{PipelineError, PipelineResult};
use crate::frame::TripFrame;
use crate::schema::TripSchema;

pub const DEFAULT_QUANTILES: [f64; 3] = [0.25, 0.5, 0.75];

/// Output key for a quantile: `"q"` followed by the truncated percentage,
/// so `0.25` becomes `q25`.
pub fn quantile_key(q: f64) -> String {
    format!("q{}", (q * 100.0) as i64)
}

/// Mean, median, min, max and the requested quantiles of trip duration in
/// minutes, over trips that have a duration.
///
/// Returns `Ok(None)` when no trip has a duration.
///
/// # Errors
///
/// [`PipelineError::MissingColumn`] if the frame was not enriched, and
/// [`PipelineError::InvalidArgument`] for a quantile outside `[0, 1]`.
pub fn trip_duration_summary(
    frame: &TripFrame,
    schema: &TripSchema,
    quantiles: &[f64],
) -> PipelineResult<Option<DurationSummary>> {
    frame.require_column(&schema.trip_duration_min)?;

    if let Some(bad) = quantiles.iter().find(|q| !(0.0..=1.0).contains(*q)) {
        return Err(PipelineError::InvalidArgument(format!(
            "quantiles must be between 0 and 1, got {}",
            bad
        )));
    }

    let mut values: Vec<f64> = frame
        .rows()
        .iter()
        .filter_map(|r| r.trip_duration_min)
        .filter(|m| !m.is_nan())
        .collect();
    if values.is_empty() {
        return Ok(None);
    }
    values.sort_by(f64::total_cmp);

    let Some(median) = quantile_sorted(&values, 0.5) else {
        return Ok(None);
    };

    let mut by_key = BTreeMap::new();
    for &q in quantiles {
        if let Some(value) = quantile_sorted(&values, q) {
            by_key.insert(quantile_key(q), value);
        }
    }

    Ok(Some(DurationSummary {
        mean: mean(&values),
        median,
        min: values[0],
        max: values[values.len() - 1],
        quantiles: by_key,
    }))
}
