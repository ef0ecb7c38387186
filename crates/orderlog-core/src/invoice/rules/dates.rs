//! Order placed date with US timezone abbreviation, converted to UTC.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Captures;

use super::patterns::ORDER_PLACED_DATE;
use super::FieldExtractor;
use crate::error::ExtractionError;

/// The date literal matched after `Order Placed Date`, not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDateLiteral {
    /// Matched literal, e.g. "Jan. 5, 2024 3:15:00 p.m. EST".
    pub source: String,
    pub month: String,
    pub day: u32,
    pub year: i32,
    /// Hour on the 12-hour clock.
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub pm: bool,
    /// Timezone abbreviation as written.
    pub zone: String,
}

impl OrderDateLiteral {
    /// Resolve the wall time in the zone the abbreviation maps to and
    /// convert it to UTC.
    ///
    /// The abbreviation only selects the zone; the offset comes from that
    /// zone's rules on the given date. A wall time skipped by a DST change
    /// is rejected, and a repeated one resolves to the earlier instant.
    pub fn to_utc(&self, zones: &ZoneTable) -> Result<DateTime<Utc>, ExtractionError> {
        let tz = zones.lookup(&self.zone)?;

        let month = month_to_number(&self.month)
            .ok_or_else(|| self.invalid(format!("unknown month {:?}", self.month)))?;
        let date = NaiveDate::from_ymd_opt(self.year, month, self.day)
            .ok_or_else(|| self.invalid("day out of range for month"))?;

        if self.hour > 12 {
            return Err(self.invalid("hour out of range for 12-hour clock"));
        }
        let hour = match (self.hour, self.pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, false) => h,
            (h, true) => h + 12,
        };
        let time = NaiveTime::from_hms_opt(hour, self.minute, self.second)
            .ok_or_else(|| self.invalid("time out of range"))?;

        tz.from_local_datetime(&date.and_time(time))
            .earliest()
            .map(|local| local.with_timezone(&Utc))
            .ok_or_else(|| self.invalid(format!("local time does not exist in {}", tz.name())))
    }

    fn invalid(&self, reason: impl Into<String>) -> ExtractionError {
        ExtractionError::InvalidDate {
            value: self.source.clone(),
            reason: reason.into(),
        }
    }
}

/// Finds the `Order Placed Date` literal.
///
/// A match whose numbers cannot be read (for instance digits outside ASCII)
/// is reported as `InvalidDate` rather than skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrderDateExtractor;

impl FieldExtractor for OrderDateExtractor {
    type Output = Result<OrderDateLiteral, ExtractionError>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let caps = ORDER_PLACED_DATE.captures(text)?;
        Some(literal_from_captures(&caps))
    }
}

fn literal_from_captures(caps: &Captures<'_>) -> Result<OrderDateLiteral, ExtractionError> {
    let source = &caps[1];
    let number = |idx: usize, name: &str| -> Result<u32, ExtractionError> {
        caps[idx].parse().map_err(|_| ExtractionError::InvalidDate {
            value: source.to_string(),
            reason: format!("{} {:?} is not a number", name, &caps[idx]),
        })
    };

    Ok(OrderDateLiteral {
        source: source.to_string(),
        month: caps[2].to_string(),
        day: number(3, "day")?,
        year: number(4, "year")? as i32,
        hour: number(5, "hour")?,
        minute: number(6, "minute")?,
        second: number(7, "second")?,
        pm: caps[8].eq_ignore_ascii_case("p"),
        zone: caps[9].to_string(),
    })
}

/// Explicit timezone abbreviation table.
///
/// Unknown abbreviations are an error; there is no fallback zone.
#[derive(Debug, Clone)]
pub struct ZoneTable {
    zones: HashMap<String, Tz>,
}

impl ZoneTable {
    /// An empty table.
    pub fn empty() -> Self {
        Self {
            zones: HashMap::new(),
        }
    }

    /// Add or replace an abbreviation.
    pub fn with_zone(mut self, abbreviation: &str, tz: Tz) -> Self {
        self.zones.insert(abbreviation.to_uppercase(), tz);
        self
    }

    /// Look up an abbreviation (case-insensitive).
    pub fn lookup(&self, abbreviation: &str) -> Result<Tz, ExtractionError> {
        self.zones
            .get(&abbreviation.to_uppercase())
            .copied()
            .ok_or_else(|| ExtractionError::UnknownTimezone(abbreviation.to_string()))
    }
}

impl Default for ZoneTable {
    fn default() -> Self {
        Self::empty()
            .with_zone("EST", chrono_tz::America::New_York)
            .with_zone("EDT", chrono_tz::America::New_York)
            .with_zone("CST", chrono_tz::America::Chicago)
            .with_zone("CDT", chrono_tz::America::Chicago)
    }
}

fn month_to_number(month: &str) -> Option<u32> {
    let number = match month.to_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(text: &str) -> Result<String, ExtractionError> {
        let literal = OrderDateExtractor.extract(text).expect("date literal should match")?;
        literal
            .to_utc(&ZoneTable::default())
            .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
    }

    #[test]
    fn test_extract_literal() {
        let literal = OrderDateExtractor
            .extract("Order Placed Date Jan. 5, 2024 3:15:00 p.m. EST\nShipping")
            .unwrap()
            .unwrap();

        assert_eq!(literal.source, "Jan. 5, 2024 3:15:00 p.m. EST");
        assert_eq!(literal.month, "Jan");
        assert_eq!((literal.day, literal.year), (5, 2024));
        assert_eq!((literal.hour, literal.minute, literal.second), (3, 15, 0));
        assert!(literal.pm);
        assert_eq!(literal.zone, "EST");
    }

    #[test]
    fn test_eastern_standard_time() {
        assert_eq!(
            resolve("Order Placed Date Jan. 5, 2024 3:15:00 p.m. EST").unwrap(),
            "2024-01-05T20:15:00Z"
        );
    }

    #[test]
    fn test_central_daylight_time() {
        assert_eq!(
            resolve("Order Placed Date Jul. 4, 2024 9:05:07 a.m. CDT").unwrap(),
            "2024-07-04T14:05:07Z"
        );
    }

    #[test]
    fn test_midnight_and_noon() {
        assert_eq!(
            resolve("Order Placed Date Mar. 1, 2024 12:30:00 a.m. EST").unwrap(),
            "2024-03-01T05:30:00Z"
        );
        assert_eq!(
            resolve("Order Placed Date Mar. 1, 2024 12:30:00 p.m. CST").unwrap(),
            "2024-03-01T18:30:00Z"
        );
    }

    #[test]
    fn test_zone_rules_decide_offset() {
        // EDT in January still resolves through America/New_York, which is on EST
        assert_eq!(
            resolve("Order Placed Date Jan. 5, 2024 3:15:00 p.m. EDT").unwrap(),
            "2024-01-05T20:15:00Z"
        );
    }

    #[test]
    fn test_case_insensitive_literal() {
        assert_eq!(
            resolve("order placed date DEC. 31, 2023 11:59:59 P.M. cst").unwrap(),
            "2024-01-01T05:59:59Z"
        );
    }

    #[test]
    fn test_unknown_timezone() {
        assert_eq!(
            resolve("Order Placed Date Jan. 5, 2024 3:15:00 p.m. PST"),
            Err(ExtractionError::UnknownTimezone("PST".to_string()))
        );
    }

    #[test]
    fn test_invalid_calendar_date() {
        let err = resolve("Order Placed Date Feb. 30, 2024 3:15:00 p.m. EST").unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidDate { .. }));

        let err = resolve("Order Placed Date Foo. 3, 2024 3:15:00 p.m. EST").unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidDate { .. }));
    }

    #[test]
    fn test_invalid_clock() {
        let err = resolve("Order Placed Date Jan. 5, 2024 13:15:00 p.m. EST").unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidDate { .. }));

        let err = resolve("Order Placed Date Jan. 5, 2024 3:75:00 p.m. EST").unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidDate { .. }));
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        // Arabic-Indic digits match `\d` but must not be read as zero
        let err = resolve("Order Placed Date Jan. 5, 2024 \u{0663}:15:00 p.m. EST").unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidDate { .. }));

        let err = resolve("Order Placed Date Jan. 5, 2024 3:\u{0661}\u{0665}:00 p.m. EST").unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidDate { .. }));
    }

    #[test]
    fn test_dst_gap_and_overlap() {
        let err = resolve("Order Placed Date Mar. 10, 2024 2:30:00 a.m. EST").unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidDate { .. }));

        assert_eq!(
            resolve("Order Placed Date Nov. 3, 2024 1:30:00 a.m. EST").unwrap(),
            "2024-11-03T05:30:00Z"
        );
    }

    #[test]
    fn test_no_literal() {
        assert_eq!(OrderDateExtractor.extract("Order Placed Date 2024-01-05"), None);
    }
}
