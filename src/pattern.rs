use std::fmt::{self, Write as _};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_FORMAT;
use crate::{CalendarDate, DateError};

/// Error type for display pattern compilation and pattern-driven parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// The pattern has no token for one of the date components.
    #[error("Pattern {pattern:?} has no {component} token")]
    MissingComponent {
        pattern:   String,
        component: &'static str,
    },

    /// The pattern names the same component twice.
    #[error("Pattern {pattern:?} has more than one {component} token")]
    DuplicateComponent {
        pattern:   String,
        component: &'static str,
    },

    /// The pattern uses a two-digit year, which cannot be read back into the same century.
    #[error("Pattern {0:?} uses a two-digit year; use YYYY")]
    TwoDigitYear(String),

    /// A `[` escape is never closed.
    #[error("Pattern {0:?} has an unclosed '[' escape")]
    UnclosedEscape(String),

    /// The text does not have the shape the pattern describes.
    #[error("{input:?} does not match the pattern {pattern:?}")]
    FormatMismatch { input: String, pattern: String },

    /// The text has the right shape but names a date that does not exist.
    #[error(transparent)]
    InvalidCalendarDate(#[from] DateError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Component {
    Year,
    Month,
    Day,
}

impl Component {
    const fn name(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// Four-digit, zero-padded year.
    FullYear,
    /// A month or day number; `padded` renders it with two digits.
    Number { component: Component, padded: bool },
    Literal(String),
}

impl Token {
    /// Most digits the token consumes while parsing.
    const fn max_width(&self) -> usize {
        match self {
            Self::FullYear => 4,
            Self::Number { .. } => 2,
            Self::Literal(_) => 0,
        }
    }

    const fn component(&self) -> Option<Component> {
        match self {
            Self::FullYear => Some(Component::Year),
            Self::Number { component, .. } => Some(*component),
            Self::Literal(_) => None,
        }
    }
}

/// Pattern tokens, longest first so `MM` wins over `M`.
const TOKENS: [(&str, Token); 5] = [
    ("YYYY", Token::FullYear),
    ("MM", Token::Number {
        component: Component::Month,
        padded:    true,
    }),
    ("M", Token::Number {
        component: Component::Month,
        padded:    false,
    }),
    ("DD", Token::Number {
        component: Component::Day,
        padded:    true,
    }),
    ("D", Token::Number {
        component: Component::Day,
        padded:    false,
    }),
];

/// The layout a date is rendered in for editing, and parsed back from.
///
/// Supported tokens are `YYYY`, `MM`, `M`, `DD` and `D`. Text inside `[...]` is copied
/// verbatim; any other character is a literal that must appear as-is in parsed input.
/// Two-digit years are refused because formatted text must parse back to the same date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayPattern {
    source: String,
    tokens: Vec<Token>,
}

impl DisplayPattern {
    /// Compiles a pattern string.
    ///
    /// # Errors
    /// Returns `PatternError` if the pattern is missing a component, repeats one, uses a
    /// two-digit year, or leaves an escape unclosed.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let tokens = tokenize(pattern)?;

        for component in [Component::Year, Component::Month, Component::Day] {
            match tokens.iter().filter(|t| t.component() == Some(component)).count() {
                0 => {
                    return Err(PatternError::MissingComponent {
                        pattern:   pattern.to_owned(),
                        component: component.name(),
                    });
                },
                1 => {},
                _ => {
                    return Err(PatternError::DuplicateComponent {
                        pattern:   pattern.to_owned(),
                        component: component.name(),
                    });
                },
            }
        }

        Ok(Self {
            source: pattern.to_owned(),
            tokens,
        })
    }

    /// The pattern string this was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Renders `date` under this pattern.
    pub fn format(&self, date: &CalendarDate) -> String {
        let mut out = String::with_capacity(self.source.len());
        for token in &self.tokens {
            // Writing into a String cannot fail.
            let _ = match token {
                Token::FullYear => write!(out, "{}", date.year_typed()),
                Token::Number { component, padded } => {
                    let n = match component {
                        Component::Year => date.year(),
                        Component::Month => u16::from(date.month()),
                        Component::Day => u16::from(date.day()),
                    };
                    if *padded {
                        write!(out, "{n:02}")
                    } else {
                        write!(out, "{n}")
                    }
                },
                Token::Literal(text) => out.write_str(text),
            };
        }
        out
    }

    /// Renders an optional value; no date renders as the empty string.
    pub fn format_value(&self, date: Option<&CalendarDate>) -> String {
        date.map(|d| self.format(d)).unwrap_or_default()
    }

    /// Reads a date out of `text`, tolerating unpadded numbers.
    ///
    /// Numeric tokens consume one up to their full width of digits, literals must match
    /// exactly and no trailing text is allowed. The result is always a real calendar date.
    ///
    /// # Errors
    /// Returns `PatternError::FormatMismatch` if the text does not follow the pattern, or
    /// `PatternError::InvalidCalendarDate` if the components do not name a real date.
    pub fn parse(&self, text: &str) -> Result<CalendarDate, PatternError> {
        let mismatch = || PatternError::FormatMismatch {
            input:   text.to_owned(),
            pattern: self.source.clone(),
        };

        let (mut year, mut month, mut day) = (None, None, None);
        let mut rest = text;

        for token in &self.tokens {
            if let Token::Literal(literal) = token {
                rest = rest.strip_prefix(literal.as_str()).ok_or_else(mismatch)?;
                continue;
            }

            let digits = rest
                .bytes()
                .take(token.max_width())
                .take_while(u8::is_ascii_digit)
                .count();
            if digits == 0 {
                return Err(mismatch());
            }
            let (number, tail) = rest.split_at(digits);
            rest = tail;
            let value: u16 = number.parse().map_err(|_| mismatch())?;

            match token {
                Token::FullYear => year = Some(value),
                Token::Number {
                    component: Component::Month,
                    ..
                } => month = Some(value),
                Token::Number { .. } => day = Some(value),
                Token::Literal(_) => {},
            }
        }

        if !rest.is_empty() {
            return Err(mismatch());
        }

        let (Some(year), Some(month), Some(day)) = (year, month, day) else {
            return Err(mismatch());
        };
        // Month and day tokens read at most two digits, so they always fit in a u8.
        let month = u8::try_from(month).map_err(|_| mismatch())?;
        let day = u8::try_from(day).map_err(|_| mismatch())?;

        Ok(CalendarDate::new(year, month, day)?)
    }

    /// Parses `text` and accepts it only if formatting the result reproduces `text` exactly.
    ///
    /// Empty text round-trips to "no date" and yields `Ok(None)`.
    ///
    /// # Errors
    /// Returns `PatternError::FormatMismatch` if the text does not round-trip, or
    /// `PatternError::InvalidCalendarDate` if it names a day that does not exist.
    pub fn parse_strict(&self, text: &str) -> Result<Option<CalendarDate>, PatternError> {
        if text.is_empty() {
            return Ok(None);
        }

        let date = self.parse(text)?;
        if self.format(&date) != text {
            return Err(PatternError::FormatMismatch {
                input:   text.to_owned(),
                pattern: self.source.clone(),
            });
        }

        Ok(Some(date))
    }
}

fn tokenize(pattern: &str) -> Result<Vec<Token>, PatternError> {
    let mut tokens = Vec::new();
    let mut rest = pattern;

    while let Some(c) = rest.chars().next() {
        if c == '[' {
            let close = rest
                .find(']')
                .ok_or_else(|| PatternError::UnclosedEscape(pattern.to_owned()))?;
            push_literal(&mut tokens, &rest[1..close]);
            rest = &rest[close + 1..];
            continue;
        }

        if rest.starts_with("YY") && !rest.starts_with("YYYY") {
            return Err(PatternError::TwoDigitYear(pattern.to_owned()));
        }

        if let Some((text, token)) = TOKENS.iter().find(|(text, _)| rest.starts_with(text)) {
            tokens.push(token.clone());
            rest = &rest[text.len()..];
        } else {
            push_literal(&mut tokens, &rest[..c.len_utf8()]);
            rest = &rest[c.len_utf8()..];
        }
    }

    Ok(tokens)
}

/// Appends literal text, merging with a preceding literal.
fn push_literal(tokens: &mut Vec<Token>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Token::Literal(prev)) = tokens.last_mut() {
        prev.push_str(text);
    } else {
        tokens.push(Token::Literal(text.to_owned()));
    }
}

impl Default for DisplayPattern {
    fn default() -> Self {
        Self::new(DEFAULT_FORMAT).unwrap_or_else(|_| unreachable!("default pattern compiles"))
    }
}

impl FromStr for DisplayPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for DisplayPattern {
    type Error = PatternError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl fmt::Display for DisplayPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Serialize for DisplayPattern {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for DisplayPattern {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, pattern};

    #[test]
    fn test_default_pattern() {
        assert_eq!(DisplayPattern::default().as_str(), "MM/DD/YYYY");
        assert_eq!(DisplayPattern::default(), pattern(DEFAULT_FORMAT));
    }

    #[test]
    fn test_format_cases() {
        struct TestCase {
            pattern:  &'static str,
            date:     CalendarDate,
            expected: &'static str,
        }

        let cases = [
            TestCase {
                pattern:  "MM/DD/YYYY",
                date:     date(2023, 5, 1),
                expected: "05/01/2023",
            },
            TestCase {
                pattern:  "DD.MM.YYYY",
                date:     date(2023, 12, 24),
                expected: "24.12.2023",
            },
            TestCase {
                pattern:  "M/D/YYYY",
                date:     date(1999, 5, 1),
                expected: "5/1/1999",
            },
            TestCase {
                pattern:  "YYYY-MM-DD",
                date:     date(7, 1, 9),
                expected: "0007-01-09",
            },
            TestCase {
                pattern:  "[Day] D [of] M, YYYY",
                date:     date(2023, 5, 1),
                expected: "Day 1 of 5, 2023",
            },
        ];

        for case in &cases {
            assert_eq!(
                pattern(case.pattern).format(&case.date),
                case.expected,
                "pattern {}",
                case.pattern
            );
        }
    }

    #[test]
    fn test_format_value_empty() {
        assert_eq!(DisplayPattern::default().format_value(None), "");
        assert_eq!(
            DisplayPattern::default().format_value(Some(&date(2023, 5, 1))),
            "05/01/2023"
        );
    }

    #[test]
    fn test_parse_is_lenient_about_padding() {
        let p = DisplayPattern::default();
        assert_eq!(p.parse("5/1/2023").unwrap(), date(2023, 5, 1));
        assert_eq!(p.parse("05/01/2023").unwrap(), date(2023, 5, 1));
    }

    #[test]
    fn test_two_digit_year_patterns_are_refused() {
        for source in ["MM/DD/YY", "YY-MM-DD", "D.M.YY", "YYYYYY-MM-DD"] {
            assert!(
                matches!(DisplayPattern::new(source), Err(PatternError::TwoDigitYear(_))),
                "{source} should be refused"
            );
        }
        assert!(DisplayPattern::new("[YY] MM/DD/YYYY").is_ok());
    }

    #[test]
    fn test_years_across_centuries_round_trip() {
        for source in ["MM/DD/YYYY", "M/D/YYYY", "YYYY.MM.DD"] {
            let p = pattern(source);
            for year in [1, 99, 1900, 1950, 1968, 1969, 2000, 2068, 2069, 2150, 9999] {
                let d = date(year, 5, 1);
                assert_eq!(p.parse_strict(&p.format(&d)).unwrap(), Some(d), "{source} / {d}");
            }
        }
    }

    #[test]
    fn test_parse_shape_errors() {
        let p = DisplayPattern::default();
        for input in ["05-01-2023", "05/01", "05/01/2023x", "ab/01/2023", "/01/2023", "05/01/20231"] {
            assert!(
                matches!(p.parse(input), Err(PatternError::FormatMismatch { .. })),
                "{input:?} should not match"
            );
        }
    }

    #[test]
    fn test_parse_calendar_errors() {
        let p = DisplayPattern::default();
        assert!(matches!(
            p.parse("02/30/2023"),
            Err(PatternError::InvalidCalendarDate(DateError::InvalidDay { day: 30, .. }))
        ));
        assert!(matches!(
            p.parse("13/01/2023"),
            Err(PatternError::InvalidCalendarDate(DateError::InvalidMonth(13)))
        ));
        assert!(matches!(
            p.parse("01/01/0000"),
            Err(PatternError::InvalidCalendarDate(DateError::InvalidYear(0)))
        ));
    }

    #[test]
    fn test_parse_strict_requires_exact_round_trip() {
        let p = DisplayPattern::default();
        assert_eq!(p.parse_strict("05/01/2023").unwrap(), Some(date(2023, 5, 1)));
        assert!(matches!(
            p.parse_strict("5/1/2023"),
            Err(PatternError::FormatMismatch { .. })
        ));
        assert!(matches!(
            p.parse_strict("05/01/23"),
            Err(PatternError::FormatMismatch { .. })
        ));
        assert!(matches!(
            p.parse_strict("02/30/2023"),
            Err(PatternError::InvalidCalendarDate(_))
        ));
    }

    #[test]
    fn test_parse_strict_empty_is_no_date() {
        assert_eq!(DisplayPattern::default().parse_strict(""), Ok(None));
    }

    #[test]
    fn test_unpadded_pattern_rejects_padded_input() {
        let p = pattern("M/D/YYYY");
        assert_eq!(p.parse_strict("5/1/2023").unwrap(), Some(date(2023, 5, 1)));
        assert!(p.parse_strict("05/01/2023").is_err());
    }

    #[test]
    fn test_format_then_parse_is_identity() {
        let dates = [
            date(2023, 5, 1),
            date(2024, 2, 29),
            date(1999, 12, 31),
            date(2000, 1, 1),
            date(1, 1, 1),
            date(9999, 12, 31),
        ];
        for source in ["MM/DD/YYYY", "DD.MM.YYYY", "YYYY-MM-DD", "M/D/YYYY", "[on] D M YYYY"] {
            let p = pattern(source);
            for d in &dates {
                assert_eq!(p.parse_strict(&p.format(d)).unwrap(), Some(*d), "{source} / {d}");
            }
        }
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(matches!(
            DisplayPattern::new("MM/YYYY"),
            Err(PatternError::MissingComponent {
                component: "day",
                ..
            })
        ));
        assert!(matches!(
            DisplayPattern::new("MM/DD/YYYY MM"),
            Err(PatternError::DuplicateComponent {
                component: "month",
                ..
            })
        ));
        assert!(matches!(
            DisplayPattern::new("[MM/DD/YYYY"),
            Err(PatternError::UnclosedEscape(_))
        ));
    }

    #[test]
    fn test_serde() {
        let p: DisplayPattern = serde_json::from_str("\"DD.MM.YYYY\"").unwrap();
        assert_eq!(p.as_str(), "DD.MM.YYYY");
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"DD.MM.YYYY\"");
        assert!(serde_json::from_str::<DisplayPattern>("\"YYYY\"").is_err());
    }
}
