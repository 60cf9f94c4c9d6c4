//! The contract between a [`DateField`](crate::DateField) and the form controller that owns it.
//!
//! A controller pushes values in through [`ValueAccessor::write_value`] and learns about user
//! edits through the callbacks it registers. Controllers that track validation state also hand
//! the field an [`ErrorSink`], which receives a [`ValidationErrors`] map whenever an edit is
//! rejected.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::consts::{INVALID_ERROR_KEY, INVALID_ERROR_MESSAGE};

/// Callback receiving the canonical value after an accepted edit.
pub type OnChangeFn = Box<dyn FnMut(&str)>;

/// Callback signalling that the user interacted with the field.
pub type OnTouchedFn = Box<dyn FnMut()>;

/// The binding protocol a form controller drives.
///
/// None of these methods fail: external writes and registrations are always safe to call.
pub trait ValueAccessor {
    /// Replaces the stored value from outside. Does not notify the change callback.
    fn write_value(&mut self, value: &str);

    fn register_on_change(&mut self, f: OnChangeFn);

    fn register_on_touched(&mut self, f: OnTouchedFn);

    /// Called by controllers that manage the disabled state themselves.
    fn set_disabled_state(&mut self, _disabled: bool) {}
}

/// A single validation failure as reported to the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub message: String,
}

/// Validation failures keyed by error kind.
pub type ValidationErrors = BTreeMap<String, ValidationError>;

/// Builds the error map reported for a rejected edit.
pub(crate) fn invalid_date_errors() -> ValidationErrors {
    BTreeMap::from([(
        INVALID_ERROR_KEY.to_owned(),
        ValidationError {
            message: INVALID_ERROR_MESSAGE.to_owned(),
        },
    )])
}

/// Where a field reports validation failures. `None` clears previously reported errors.
pub trait ErrorSink {
    fn set_errors(&self, errors: Option<ValidationErrors>);

    fn errors(&self) -> Option<ValidationErrors>;

    fn is_invalid(&self) -> bool {
        self.errors().is_some_and(|e| !e.is_empty())
    }
}

/// An [`ErrorSink`] whose clones all observe the same error state.
///
/// The controller keeps one clone and hands another to the field.
#[derive(Debug, Clone, Default)]
pub struct ErrorCollector {
    errors: Rc<RefCell<Option<ValidationErrors>>>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ErrorSink for ErrorCollector {
    fn set_errors(&self, errors: Option<ValidationErrors>) {
        *self.errors.borrow_mut() = errors;
    }

    fn errors(&self) -> Option<ValidationErrors> {
        self.errors.borrow().clone()
    }
}

impl<T: ErrorSink + ?Sized> ErrorSink for Rc<T> {
    fn set_errors(&self, errors: Option<ValidationErrors>) {
        (**self).set_errors(errors);
    }

    fn errors(&self) -> Option<ValidationErrors> {
        (**self).errors()
    }
}

/// The public `change` event: named listeners called in the order they subscribed.
#[derive(Default)]
pub struct ChangeEmitter {
    listeners: Vec<(String, OnChangeFn)>,
}

impl ChangeEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a listener. A listener already registered under `name` is replaced in place.
    pub fn subscribe(&mut self, name: impl Into<String>, listener: OnChangeFn) {
        let name = name.into();
        if let Some(slot) = self.listeners.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = listener;
        } else {
            self.listeners.push((name, listener));
        }
    }

    /// Removes the listener registered under `name`. Returns whether one was found.
    pub fn unsubscribe(&mut self, name: &str) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(n, _)| n != name);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, value: &str) {
        for (name, listener) in &mut self.listeners {
            tracing::trace!(listener = %name, value, "dispatching change event");
            listener(value);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for ChangeEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeEmitter")
            .field(
                "listeners",
                &self.listeners.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
