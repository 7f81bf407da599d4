use hifitime::{Epoch, TimeScale, Unit};

use crate::constants::{JulianDate, MAX_QUERY_RANGE_DAYS, MJD};
use crate::skymast_errors::SkymastError;

/// Parse a calendar date in the format YYYY-MM-DD into an [`Epoch`] at midnight UTC.
///
/// Argument
/// --------
/// * `date`: a date string in the format YYYY-MM-DD
///
/// Return
/// ------
/// * The corresponding [`Epoch`], or an error when the string does not follow the format.
pub fn parse_date(date: &str) -> Result<Epoch, SkymastError> {
    let mut parts = date.trim().splitn(3, '-');
    let (Some(year), Some(month), Some(day)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(SkymastError::InvalidTimeRange(format!(
            "expected YYYY-MM-DD, got: {date}"
        )));
    };

    let year: i32 = year.parse().map_err(|_| {
        SkymastError::InvalidTimeRange(format!("invalid year in date: {date}"))
    })?;
    let month: u8 = month.parse().map_err(|_| {
        SkymastError::InvalidTimeRange(format!("invalid month in date: {date}"))
    })?;
    let day: u8 = day.parse().map_err(|_| {
        SkymastError::InvalidTimeRange(format!("invalid day in date: {date}"))
    })?;

    Ok(Epoch::maybe_from_gregorian(
        year,
        month,
        day,
        0,
        0,
        0,
        0,
        TimeScale::UTC,
    )?)
}

/// Validate a calendar time range for an archive search.
///
/// The stop date must be strictly after the start date, and the span must not exceed
/// [`MAX_QUERY_RANGE_DAYS`]; wider windows produce search polygons too coarse to be useful
/// and are rejected before any network call.
///
/// Arguments
/// --------
/// * `start`: start date, YYYY-MM-DD
/// * `stop`: stop date, YYYY-MM-DD
///
/// Return
/// ------
/// * The parsed `(start, stop)` epochs, or an [`SkymastError::InvalidTimeRange`].
pub fn validate_time_range(start: &str, stop: &str) -> Result<(Epoch, Epoch), SkymastError> {
    let start_epoch = parse_date(start)?;
    let stop_epoch = parse_date(stop)?;

    if stop_epoch <= start_epoch {
        return Err(SkymastError::InvalidTimeRange(format!(
            "stop date {stop} is not after start date {start}"
        )));
    }
    if stop_epoch - start_epoch > Unit::Day * MAX_QUERY_RANGE_DAYS {
        return Err(SkymastError::InvalidTimeRange(format!(
            "range {start} .. {stop} exceeds {MAX_QUERY_RANGE_DAYS} days"
        )));
    }
    Ok((start_epoch, stop_epoch))
}

/// Format a Julian Date as an ISO-8601 UTC string.
pub fn jd_to_iso(jd: JulianDate) -> String {
    Epoch::from_jde_utc(jd).to_isoformat()
}

/// Format a Modified Julian Date as an ISO-8601 UTC string.
pub fn mjd_to_iso(mjd: MJD) -> String {
    Epoch::from_mjd_utc(mjd).to_isoformat()
}
