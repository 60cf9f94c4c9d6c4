use crate::DateError;
use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE, LEAP_YEAR_CYCLE,
    MAX_MONTH, MAX_YEAR,
};
use crate::prelude::*;
use std::num::{NonZeroU8, NonZeroU16};

/// A year in `1..=MAX_YEAR`, rendered zero-padded to four digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}", "_0")]
pub struct Year(NonZeroU16);

impl Year {
    /// # Errors
    /// Returns `DateError::InvalidYear` if the value is 0 or > `MAX_YEAR`.
    pub fn new(value: u16) -> Result<Self, DateError> {
        match NonZeroU16::new(value) {
            Some(year) if value <= MAX_YEAR => Ok(Self(year)),
            _ => Err(DateError::InvalidYear(value)),
        }
    }

    #[inline]
    pub const fn get(self) -> u16 {
        self.0.get()
    }

    pub const fn is_leap(self) -> bool {
        is_leap_year(self.get())
    }
}

impl TryFrom<u16> for Year {
    type Error = DateError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Year> for u16 {
    fn from(year: Year) -> Self {
        year.get()
    }
}

/// A month in `1..=12`, rendered zero-padded to two digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:02}", "_0")]
pub struct Month(NonZeroU8);

impl Month {
    /// # Errors
    /// Returns `DateError::InvalidMonth` if the value is 0 or > `MAX_MONTH`.
    pub fn new(value: u8) -> Result<Self, DateError> {
        match NonZeroU8::new(value) {
            Some(month) if value <= MAX_MONTH => Ok(Self(month)),
            _ => Err(DateError::InvalidMonth(value)),
        }
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    /// Number of days this month has in `year`.
    pub const fn length_in(self, year: Year) -> u8 {
        days_in_month(year.get(), self.get())
    }
}

impl TryFrom<u8> for Month {
    type Error = DateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.get()
    }
}

/// A day of month, only constructible against the year and month it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:02}", "_0")]
pub struct Day(NonZeroU8);

impl Day {
    /// # Errors
    /// Returns `DateError::InvalidDay` if the value is 0 or past the end of the month.
    pub fn new(year: Year, month: Month, value: u8) -> Result<Self, DateError> {
        match NonZeroU8::new(value) {
            Some(day) if value <= month.length_in(year) => Ok(Self(day)),
            _ => Err(DateError::InvalidDay {
                year:  year.get(),
                month: month.get(),
                day:   value,
            }),
        }
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl From<Day> for u8 {
    fn from(day: Day) -> Self {
        day.get()
    }
}

pub const fn is_leap_year(year: u16) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

/// Callers pass a month already validated by [`Month`].
pub(crate) const fn days_in_month(year: u16, month: u8) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}
