use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Text layouts accepted for the creation-date column, tried in order.
pub const IMPORT_DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%Y %I:%M%p",
    "%d/%m/%Y %I:%M %p",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

pub const IMPORT_DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y"];

/// Parses a spreadsheet date written as text. Times are taken as UTC.
pub fn parse_import_text(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for fmt in IMPORT_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.and_utc());
        }
    }
    for fmt in IMPORT_DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }
    None
}

/// Converts an Excel serial date (days since 1899-12-30, fraction = time of day).
pub fn from_excel_serial(serial: f64) -> Option<DateTime<Utc>> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch
        .checked_add_signed(Duration::milliseconds(millis))
        .map(|dt| dt.and_utc())
}

/// Parses a wall-clock time given as `HH:MM` or `HH:MM:SS`.
pub fn parse_clock_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_twelve_hour_clock_without_space() {
        let dt = parse_import_text("05/06/2025 12:20pm").unwrap();
        assert_eq!((dt.day(), dt.month(), dt.year()), (5, 6, 2025));
        assert_eq!((dt.hour(), dt.minute()), (12, 20));

        let dt = parse_import_text("05/06/2025 01:15pm").unwrap();
        assert_eq!(dt.hour(), 13);
    }

    #[test]
    fn parses_iso_and_date_only_values() {
        let dt = parse_import_text("2025-06-05 08:30:00").unwrap();
        assert_eq!((dt.month(), dt.day(), dt.hour()), (6, 5, 8));

        let dt = parse_import_text("05/06/2025").unwrap();
        assert_eq!((dt.day(), dt.month(), dt.hour()), (5, 6, 0));
    }

    #[test]
    fn unparseable_text_yields_none() {
        assert!(parse_import_text("ayer por la tarde").is_none());
        assert!(parse_import_text("   ").is_none());
    }

    #[test]
    fn excel_serial_dates_convert() {
        // 45813.5 is 2025-06-05 12:00
        let dt = from_excel_serial(45813.5).unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2025, 6, 5));
        assert_eq!(dt.hour(), 12);
        assert!(from_excel_serial(f64::NAN).is_none());
    }

    #[test]
    fn clock_times_with_or_without_seconds() {
        let t = parse_clock_time(" 09:30 ").unwrap();
        assert_eq!((t.hour(), t.minute()), (9, 30));
        assert_eq!(parse_clock_time("17:45:00").unwrap().hour(), 17);
        assert!(parse_clock_time("25:00").is_none());
        assert!(parse_clock_time("9.30").is_none());
    }
}
