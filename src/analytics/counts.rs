use chrono::{Datelike, NaiveDate};

use crate::analytics::types::{DailyCount, HourlyCount, MonthlyCount, WeeklyCount};
use crate::analytics::utility::count_by;
use crate::cleaning::month_name;
use crate::error::PipelineResult;
use crate::frame::TripFrame;
use crate::schema::TripSchema;

/// Number of trips per start hour, ascending by hour.
pub fn hourly_trip_counts(
    frame: &TripFrame,
    schema: &TripSchema,
) -> PipelineResult<Vec<HourlyCount>> {
    frame.require_column(&schema.start_hour)?;

    let counts = count_by(frame.rows().iter().filter_map(|r| r.start_hour));
    Ok(counts
        .into_iter()
        .map(|(start_hour, trip_count)| HourlyCount {
            start_hour,
            trip_count,
        })
        .collect())
}

/// Number of trips per calendar day, ascending by date.
pub fn daily_trip_counts(
    frame: &TripFrame,
    schema: &TripSchema,
) -> PipelineResult<Vec<DailyCount>> {
    frame.require_column(&schema.trip_date)?;

    let counts = count_by(frame.rows().iter().filter_map(|r| r.trip_date));
    Ok(counts
        .into_iter()
        .map(|(trip_date, trip_count)| DailyCount {
            trip_date,
            trip_count,
        })
        .collect())
}

/// ISO-8601 week label, e.g. `2024-W31`. The year is the ISO week-numbering
/// year, which differs from the calendar year around January 1st.
pub fn iso_week_label(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{:04}-W{:02}", week.year(), week.week())
}

/// Number of trips per ISO week. Labels sort lexicographically, which for
/// `YYYY-Www` is also chronological.
pub fn weekly_trip_counts(
    frame: &TripFrame,
    schema: &TripSchema,
) -> PipelineResult<Vec<WeeklyCount>> {
    frame.require_column(&schema.trip_date)?;

    let counts = count_by(
        frame
            .rows()
            .iter()
            .filter_map(|r| r.trip_date)
            .map(iso_week_label),
    );
    Ok(counts
        .into_iter()
        .map(|(week_label, trip_count)| WeeklyCount {
            week_label,
            trip_count,
        })
        .collect())
}

/// Number of trips per calendar month, in chronological order.
pub fn monthly_trip_counts(
    frame: &TripFrame,
    schema: &TripSchema,
) -> PipelineResult<Vec<MonthlyCount>> {
    frame.require_column(&schema.trip_date)?;

    let counts = count_by(
        frame
            .rows()
            .iter()
            .filter_map(|r| r.trip_date)
            .map(|d| (d.year(), d.month0())),
    );
    Ok(counts
        .into_iter()
        .map(|((year, month0), trip_count)| MonthlyCount {
            month: format!("{:04}-{:02}", year, month0 + 1),
            month_name: month_name(month0),
            trip_count,
        })
        .collect())
}
