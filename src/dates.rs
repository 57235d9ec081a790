//! Calendar date arithmetic and the on-disk date encoding.
//!
//! Calendar days are plain `NaiveDate`s; timestamps are `DateTime<Utc>`.

use chrono::{DateTime, Datelike, Duration, Local, Months, NaiveDate, Utc};

/// Format used for calendar days, both on disk and on the command line.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's date in the local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// First day of the month containing `date`.
pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

/// Last day of the month containing `date`.
pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    shift_months(start_of_month(date), 1) - Duration::days(1)
}

/// Moves `date` by `delta` months, clamping the day to the target month's
/// length. Saturates at the representable calendar range.
pub fn shift_months(date: NaiveDate, delta: i32) -> NaiveDate {
    let months = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    };
    shifted.unwrap_or(date)
}

/// Every day of the month containing `date`, in order.
pub fn days_of_month(date: NaiveDate) -> Vec<NaiveDate> {
    let end = end_of_month(date);
    start_of_month(date)
        .iter_days()
        .take_while(|day| *day <= end)
        .collect()
}

pub fn is_same_day(a: NaiveDate, b: NaiveDate) -> bool {
    a == b
}

pub fn is_same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Parses a `YYYY-MM-DD` day.
pub fn parse_day(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).ok()
}

/// Parses a `YYYY-MM` month into its first day.
pub fn parse_month(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", input.trim()), DATE_FORMAT).ok()
}

/// Reads a stored day. Accepts `YYYY-MM-DD` as well as full RFC 3339
/// timestamps, which are reduced to their UTC calendar day.
fn decode_day(raw: &str) -> Option<NaiveDate> {
    parse_day(raw).or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|ts| ts.with_timezone(&Utc).date_naive())
    })
}

/// Serde adapter for required calendar days.
pub mod day {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use super::{decode_day, DATE_FORMAT};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        decode_day(&raw).ok_or_else(|| D::Error::custom(format!("invalid date: {}", raw)))
    }
}

/// Serde adapter for optional calendar days.
pub mod opt_day {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use super::{decode_day, DATE_FORMAT};

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.collect_str(&date.format(DATE_FORMAT)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.is_empty() => Ok(None),
            Some(raw) => decode_day(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid date: {}", raw))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_boundaries() {
        assert_eq!(start_of_month(ymd(2024, 2, 17)), ymd(2024, 2, 1));
        assert_eq!(end_of_month(ymd(2024, 2, 17)), ymd(2024, 2, 29));
        assert_eq!(end_of_month(ymd(2023, 12, 5)), ymd(2023, 12, 31));
        assert_eq!(days_of_month(ymd(2023, 2, 10)).len(), 28);
    }

    #[test]
    fn shifting_clamps_day() {
        assert_eq!(shift_months(ymd(2024, 1, 31), 1), ymd(2024, 2, 29));
        assert_eq!(shift_months(ymd(2024, 1, 15), -1), ymd(2023, 12, 15));
    }

    #[test]
    fn decodes_browser_timestamps() {
        assert_eq!(decode_day("2024-06-03"), Some(ymd(2024, 6, 3)));
        assert_eq!(decode_day("2024-06-03T00:00:00.000Z"), Some(ymd(2024, 6, 3)));
        assert_eq!(decode_day("June 3rd"), None);
    }

    #[test]
    fn parses_months() {
        assert_eq!(parse_month("2024-06"), Some(ymd(2024, 6, 1)));
        assert!(parse_month("2024-13").is_none());
        assert!(is_same_month(ymd(2024, 6, 1), ymd(2024, 6, 30)));
        assert!(!is_same_month(ymd(2024, 6, 1), ymd(2023, 6, 1)));
    }
}
