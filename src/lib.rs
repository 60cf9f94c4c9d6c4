//! A reusable date-input control for form-management hosts.
//!
//! [`DateField`] stores a [`CalendarDate`] in canonical `YYYY-MM-DD` form, renders it through a
//! configurable [`DisplayPattern`], and only promotes user-typed text to a new value when that
//! text survives a strict parse/format round-trip.

mod binding;
mod config;
mod consts;
mod field;
mod flags;
mod pattern;
mod prelude;
#[cfg(test)]
mod test_utils;
mod types;

pub use binding::{
    ChangeEmitter, ErrorCollector, ErrorSink, OnChangeFn, OnTouchedFn, ValidationError,
    ValidationErrors, ValueAccessor,
};
pub use config::FieldConfig;
pub use consts::*;
pub use field::{DateField, EditOutcome, EditState};
pub use flags::{AttributeFlags, coerce_boolean_property};
pub use pattern::{DisplayPattern, PatternError};
pub use types::{Day, Month, Year, is_leap_year};

use crate::prelude::*;
use std::str::FromStr;

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
struct ReadmeDoctests;

/// A complete, calendar-valid date.
///
/// Its `Display` output is the canonical, locale-independent `YYYY-MM-DD` form, which is
/// also the only shape `FromStr` accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{year}-{month}-{day}")]
pub struct CalendarDate {
    year:  Year,
    month: Month,
    day:   Day,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DateError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be 1-{})", "_0", MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { year: u16, month: u8, day: u8 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for DateError {}

impl CalendarDate {
    /// Validates each component in turn: year, then month, then day against that month.
    ///
    /// # Errors
    /// Returns the `DateError` of the first component that is out of range.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, DateError> {
        let year = Year::new(year)?;
        let month = Month::new(month)?;
        let day = Day::new(year, month, day)?;
        Ok(Self { year, month, day })
    }

    /// Assembles a date from components that are already validated.
    pub const fn from_parts(year: Year, month: Month, day: Day) -> Self {
        Self { year, month, day }
    }

    pub const fn year(&self) -> u16 {
        self.year.get()
    }

    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    pub const fn year_typed(&self) -> Year {
        self.year
    }

    pub const fn month_typed(&self) -> Month {
        self.month
    }

    pub const fn day_typed(&self) -> Day {
        self.day
    }

    /// Reads one fixed-width, all-digit canonical component.
    fn parse_component<T: FromStr>(s: &str, width: usize, whole: &str) -> Result<T, DateError> {
        if s.len() != width || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DateError::InvalidFormat(whole.to_owned()));
        }
        s.parse::<T>()
            .map_err(|_| DateError::InvalidFormat(whole.to_owned()))
    }
}

impl FromStr for CalendarDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DateError::EmptyInput);
        }

        let parts: Vec<&str> = trimmed.split(CANONICAL_SEPARATOR).collect();
        let [year, month, day] = parts.as_slice() else {
            return Err(DateError::InvalidFormat(format!(
                "Expected YYYY{sep}MM{sep}DD, found {} separators: {trimmed}",
                parts.len() - 1,
                sep = CANONICAL_SEPARATOR,
            )));
        };

        let year = Self::parse_component::<u16>(year, 4, trimmed)?;
        let month = Self::parse_component::<u8>(month, 2, trimmed)?;
        let day = Self::parse_component::<u8>(day, 2, trimmed)?;

        Self::new(year, month, day)
    }
}

impl TryFrom<(u16, u8, u8)> for CalendarDate {
    type Error = DateError;

    fn try_from((year, month, day): (u16, u8, u8)) -> Result<Self, Self::Error> {
        Self::new(year, month, day)
    }
}

impl serde::Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;

    #[test]
    fn test_parse_canonical() {
        let parsed = "2023-05-01".parse::<CalendarDate>().unwrap();
        assert_eq!(parsed, date(2023, 5, 1));
        assert_eq!(parsed.year(), 2023);
        assert_eq!(parsed.month(), 5);
        assert_eq!(parsed.day(), 1);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(" 2023-05-01\t".parse::<CalendarDate>().unwrap(), date(2023, 5, 1));
    }

    #[test]
    fn test_display_is_canonical() {
        assert_eq!(date(2023, 5, 1).to_string(), "2023-05-01");
        assert_eq!(date(7, 12, 31).to_string(), "0007-12-31");
    }

    #[test]
    fn test_parse_rejects_non_canonical_shapes() {
        struct TestCase {
            input:       &'static str,
            description: &'static str,
        }

        let cases = [
            TestCase {
                input:       "2023-5-1",
                description: "unpadded month and day",
            },
            TestCase {
                input:       "23-05-01",
                description: "two-digit year",
            },
            TestCase {
                input:       "05/01/2023",
                description: "display-style slashes",
            },
            TestCase {
                input:       "2023-05",
                description: "missing day",
            },
            TestCase {
                input:       "2023-05-01-02",
                description: "too many separators",
            },
            TestCase {
                input:       "2023-0a-01",
                description: "non-digit month",
            },
            TestCase {
                input:       "2023-+5-01",
                description: "sign inside component",
            },
        ];

        for case in &cases {
            assert!(
                matches!(case.input.parse::<CalendarDate>(), Err(DateError::InvalidFormat(_))),
                "Expected InvalidFormat for {:?} ({})",
                case.input,
                case.description
            );
        }
    }

    #[test]
    fn test_parse_rejects_impossible_dates() {
        assert!(matches!(
            "2023-02-30".parse::<CalendarDate>(),
            Err(DateError::InvalidDay {
                year:  2023,
                month: 2,
                day:   30,
            })
        ));
        assert!(matches!(
            "2023-13-01".parse::<CalendarDate>(),
            Err(DateError::InvalidMonth(13))
        ));
        assert!(matches!(
            "0000-01-01".parse::<CalendarDate>(),
            Err(DateError::InvalidYear(0))
        ));
        assert!("2024-02-29".parse::<CalendarDate>().is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!("".parse::<CalendarDate>(), Err(DateError::EmptyInput));
        assert_eq!("   ".parse::<CalendarDate>(), Err(DateError::EmptyInput));
    }

    #[test]
    fn test_ordering_is_chronological() {
        assert!(date(2023, 5, 1) < date(2023, 5, 2));
        assert!(date(2023, 4, 30) < date(2023, 5, 1));
        assert!(date(2022, 12, 31) < date(2023, 1, 1));
    }

    #[test]
    fn test_try_from_tuple() {
        let parsed: CalendarDate = (2024, 2, 29).try_into().unwrap();
        assert_eq!(parsed, date(2024, 2, 29));

        let result: Result<CalendarDate, _> = (2023, 2, 29).try_into();
        assert!(result.is_err());
    }

    #[test]
    fn test_serde_string_format() {
        let value = date(2023, 5, 1);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, "\"2023-05-01\"");

        let parsed: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, value);

        let invalid: Result<CalendarDate, _> = serde_json::from_str("\"2023-02-30\"");
        assert!(invalid.is_err());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(DateError::InvalidMonth(13).to_string(), "Invalid month: 13 (must be 1-12)");
        assert_eq!(
            DateError::InvalidDay {
                year:  2023,
                month: 2,
                day:   30,
            }
            .to_string(),
            "Invalid day 30 for month 2023-02"
        );
    }
}
