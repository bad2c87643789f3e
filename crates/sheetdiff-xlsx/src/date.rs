//! Excel serial dates and ISO-8601 normalization
//!
//! Dates in a workbook are stored as day counts from an epoch, with the time
//! of day as the fractional part. They are surfaced as ISO-8601 UTC text with
//! millisecond precision, e.g. `2024-01-15T00:00:00.000Z`.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, SecondsFormat};

const MS_PER_DAY: i64 = 86_400_000;

/// Last serial Excel can display (9999-12-31)
const MAX_SERIAL: f64 = 2_958_466.0;

/// Epoch a workbook's serial dates count from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateSystem {
    /// Day 1 is 1900-01-01, with the phantom 1900-02-29 as day 60
    #[default]
    Excel1900,
    /// Day 0 is 1904-01-01 (`workbookPr/@date1904`)
    Excel1904,
}

impl DateSystem {
    /// Pick the system from the `date1904` flag
    pub fn from_date1904(date1904: bool) -> Self {
        if date1904 {
            DateSystem::Excel1904
        } else {
            DateSystem::Excel1900
        }
    }
}

/// Split a serial into whole days and milliseconds into the day
fn split_serial(serial: f64) -> Option<(i64, i64)> {
    if !serial.is_finite() || serial < 0.0 || serial >= MAX_SERIAL {
        return None;
    }
    let total_ms = (serial * MS_PER_DAY as f64).round() as i64;
    Some((total_ms.div_euclid(MS_PER_DAY), total_ms.rem_euclid(MS_PER_DAY)))
}

/// Convert a serial to a calendar date and time
///
/// Returns `None` for negative or out-of-range serials, and for serial 60 in
/// the 1900 system, which names a day that never existed.
pub fn serial_to_datetime(serial: f64, system: DateSystem) -> Option<NaiveDateTime> {
    let (days, ms) = split_serial(serial)?;

    let date = match system {
        DateSystem::Excel1904 => {
            NaiveDate::from_ymd_opt(1904, 1, 1)?.checked_add_signed(Duration::days(days))?
        }
        DateSystem::Excel1900 => {
            if days == 60 {
                return None;
            }
            // Days after the phantom leap day are shifted by one
            let adjusted = if days > 60 { days - 1 } else { days };
            NaiveDate::from_ymd_opt(1899, 12, 31)?.checked_add_signed(Duration::days(adjusted))?
        }
    };

    date.and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::milliseconds(ms))
}

/// Render a serial as ISO-8601 UTC text
pub fn serial_to_iso(serial: f64, system: DateSystem) -> Option<String> {
    if let Some(dt) = serial_to_datetime(serial, system) {
        return Some(format_iso(dt));
    }

    // 1900-02-29 cannot be built as a date, but files do contain it
    let (days, ms) = split_serial(serial)?;
    if system == DateSystem::Excel1900 && days == 60 {
        let time = NaiveDate::from_ymd_opt(1900, 3, 1)?
            .and_hms_opt(0, 0, 0)?
            .checked_add_signed(Duration::milliseconds(ms))?;
        return Some(format!("1900-02-29T{}", time.format("%H:%M:%S%.3fZ")));
    }
    None
}

/// Format a timestamp the way every parsed date is rendered
pub fn format_iso(dt: NaiveDateTime) -> String {
    dt.and_utc().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Normalize date text (`t="d"` cells) to the same ISO-8601 form
///
/// Accepts RFC 3339 with an offset, a naive timestamp (taken as UTC) or a bare
/// date. Anything else is returned unchanged.
pub fn normalize_iso(text: &str) -> String {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return format_iso(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return format_iso(dt);
    }
    if let Some(dt) = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return format_iso(dt);
    }

    text.to_string()
}
