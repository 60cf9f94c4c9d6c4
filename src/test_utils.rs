//! Shared helpers for unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::{CalendarDate, DisplayPattern};

pub fn date(year: u16, month: u8, day: u8) -> CalendarDate {
    CalendarDate::new(year, month, day).expect("test date should be valid")
}

pub fn pattern(source: &str) -> DisplayPattern {
    DisplayPattern::new(source).expect("test pattern should be valid")
}

/// Ordered record of callback invocations, shared between closures.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.0.borrow().iter().filter(|e| *e == entry).count()
    }
}
