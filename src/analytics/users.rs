use std::collections::BTreeMap;

use crate::analytics::types::UserTypeSummary;
use crate::analytics::utility::mean;
use crate::error::PipelineResult;
use crate::frame::TripFrame;
use crate::schema::TripSchema;

/// Trip count and mean duration (minutes) per user type.
///
/// Trips without a duration count towards `trip_count` but not the mean.
/// Ordered by trip count descending, then user type ascending.
pub fn user_type_summary(
    frame: &TripFrame,
    schema: &TripSchema,
) -> PipelineResult<Vec<UserTypeSummary>> {
    frame.require_column(&schema.trip_duration_min)?;

    let mut groups: BTreeMap<&str, (usize, Vec<f64>)> = BTreeMap::new();
    for row in frame.rows() {
        let Some(user_type) = row.user_type.as_deref() else {
            continue;
        };
        let entry = groups.entry(user_type).or_default();
        entry.0 += 1;
        if let Some(minutes) = row.trip_duration_min.filter(|m| !m.is_nan()) {
            entry.1.push(minutes);
        }
    }

    let mut summary: Vec<UserTypeSummary> = groups
        .into_iter()
        .map(|(user_type, (trip_count, durations))| UserTypeSummary {
            user_type: user_type.to_string(),
            trip_count,
            avg_duration_min: if durations.is_empty() {
                None
            } else {
                Some(mean(&durations))
            },
        })
        .collect();
    summary.sort_by(|a, b| b.trip_count.cmp(&a.trip_count));

    Ok(summary)
}
