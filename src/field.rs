use std::fmt;

use serde_json::Value;

use crate::binding::{
    ChangeEmitter, ErrorSink, OnChangeFn, OnTouchedFn, ValueAccessor, invalid_date_errors,
};
use crate::consts::INVALID_ERROR_KEY;
use crate::flags::coerce_boolean_property;
use crate::{AttributeFlags, CalendarDate, DisplayPattern, FieldConfig, PatternError};

/// Where the field is in processing a text change.
///
/// Every event runs to completion synchronously, so outside of an input handler the field is
/// always `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditState {
    #[default]
    Idle,
    Editing,
    Accepted,
    Rejected,
}

/// Result of processing one text change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The text was promoted to the stored value. `None` means the field was cleared.
    Accepted(Option<CalendarDate>),
    /// The text was left in the view untouched; the stored value did not change.
    Rejected(PatternError),
}

impl EditOutcome {
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// A date input bound to an external form controller.
///
/// The stored value is always either empty or a valid [`CalendarDate`]. The view text is what
/// the user sees and edits; it is derived from the stored value on external writes and only
/// flows back into the stored value when it round-trips exactly under the display pattern.
pub struct DateField {
    format:      DisplayPattern,
    placeholder: String,
    flags:       AttributeFlags,
    value:       Option<CalendarDate>,
    view_value:  String,
    state:       EditState,
    invalid:     bool,
    on_change:   OnChangeFn,
    on_touched:  OnTouchedFn,
    change:      ChangeEmitter,
    control:     Option<Box<dyn ErrorSink>>,
}

impl DateField {
    pub fn new() -> Self {
        Self {
            format:      DisplayPattern::default(),
            placeholder: String::new(),
            flags:       AttributeFlags::default(),
            value:       None,
            view_value:  String::new(),
            state:       EditState::Idle,
            invalid:     false,
            on_change:   Box::new(|_: &str| {}),
            on_touched:  Box::new(|| {}),
            change:      ChangeEmitter::new(),
            control:     None,
        }
    }

    pub fn from_config(config: FieldConfig) -> Self {
        let flags = config.flags();
        let mut field = Self {
            format: config.format,
            placeholder: config.placeholder,
            flags,
            ..Self::new()
        };
        if let Some(value) = config.value {
            field.set_value(&value);
        }
        field
    }

    /// Attaches the controller's error sink. Without one, rejected edits are only visible
    /// through [`DateField::is_invalid`].
    #[must_use]
    pub fn with_control<S: ErrorSink + 'static>(mut self, control: S) -> Self {
        self.control = Some(Box::new(control));
        self
    }

    /// Finalizes initial state once the host has applied every configuration input.
    pub fn after_content_init(&mut self) {
        self.render();
        tracing::debug!(
            value = %self.value(),
            view = %self.view_value,
            format = %self.format,
            "date field initialized"
        );
    }

    /// Stores an external value and re-renders the view. Never fires the change callback.
    ///
    /// The value is read as canonical `YYYY-MM-DD` first, then under the display pattern.
    /// Anything else clears the field.
    pub fn set_value(&mut self, raw: &str) {
        self.value = self.resolve_external(raw);
        self.clear_invalid();
        self.render();
        tracing::debug!(raw, value = %self.value(), "external value written");
    }

    fn resolve_external(&self, raw: &str) -> Option<CalendarDate> {
        if raw.trim().is_empty() {
            return None;
        }
        if let Ok(date) = raw.parse::<CalendarDate>() {
            return Some(date);
        }
        match self.format.parse_strict(raw) {
            Ok(date) => date,
            Err(err) => {
                tracing::warn!(raw, error = %err, "discarding unparseable external value");
                None
            },
        }
    }

    fn render(&mut self) {
        self.view_value = self.format.format_value(self.value.as_ref());
    }

    /// Processes one change of the input text.
    ///
    /// Accepted text updates the stored value, then calls the change callback, then emits the
    /// public change event. Rejected text stays in the view and is reported to the error sink.
    /// Either way the touched callback runs exactly once, last.
    pub fn on_input_change(&mut self, raw: &str) -> EditOutcome {
        self.state = EditState::Editing;
        self.view_value = raw.to_owned();

        let outcome = match self.format.parse_strict(raw) {
            Ok(date) => {
                self.state = EditState::Accepted;
                self.accept(date);
                EditOutcome::Accepted(date)
            },
            Err(err) => {
                self.state = EditState::Rejected;
                self.reject(raw, &err);
                EditOutcome::Rejected(err)
            },
        };

        (self.on_touched)();
        self.state = EditState::Idle;
        outcome
    }

    fn accept(&mut self, date: Option<CalendarDate>) {
        self.value = date;
        self.render();
        self.clear_invalid();

        let value = self.value();
        tracing::debug!(value = %value, "date edit accepted");
        (self.on_change)(&value);
        self.change.emit(&value);
    }

    /// Drops this field's own error, leaving errors from other validators in place.
    fn clear_invalid(&mut self) {
        self.invalid = false;

        let Some(control) = &self.control else {
            return;
        };
        if let Some(mut errors) = control.errors() {
            if errors.remove(INVALID_ERROR_KEY).is_some() {
                control.set_errors((!errors.is_empty()).then_some(errors));
            }
        }
    }

    fn reject(&mut self, raw: &str, err: &PatternError) {
        self.invalid = true;
        tracing::debug!(raw, error = %err, "date edit rejected");

        let Some(control) = &self.control else {
            return;
        };
        let mut errors = control.errors().unwrap_or_default();
        errors.extend(invalid_date_errors());
        control.set_errors(Some(errors));
    }

    /// Signals that the input lost focus.
    pub fn on_blur(&mut self) {
        (self.on_touched)();
    }

    /// The stored value in canonical form, or the empty string when no date is set.
    pub fn value(&self) -> String {
        self.value.map(|d| d.to_string()).unwrap_or_default()
    }

    pub const fn date(&self) -> Option<CalendarDate> {
        self.value
    }

    pub fn view_value(&self) -> &str {
        &self.view_value
    }

    pub const fn state(&self) -> EditState {
        self.state
    }

    pub const fn format(&self) -> &DisplayPattern {
        &self.format
    }

    /// Switches the display pattern and re-renders the view from the stored value.
    ///
    /// # Errors
    /// Returns `PatternError` if `pattern` does not compile; the current pattern is kept.
    pub fn set_format(&mut self, pattern: &str) -> Result<(), PatternError> {
        self.format = pattern.parse()?;
        self.render();
        Ok(())
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }

    pub const fn flags(&self) -> AttributeFlags {
        self.flags
    }

    pub const fn readonly(&self) -> bool {
        self.flags.readonly
    }

    pub fn set_readonly(&mut self, value: impl Into<Value>) {
        self.flags.readonly = coerce_boolean_property(&value.into());
    }

    pub const fn required(&self) -> bool {
        self.flags.required
    }

    pub fn set_required(&mut self, value: impl Into<Value>) {
        self.flags.required = coerce_boolean_property(&value.into());
    }

    pub const fn disabled(&self) -> bool {
        self.flags.disabled
    }

    pub fn set_disabled(&mut self, value: impl Into<Value>) {
        self.flags.disabled = coerce_boolean_property(&value.into());
    }

    /// Whether the field is currently invalid, as the controller sees it when one is attached.
    pub fn is_invalid(&self) -> bool {
        self.control
            .as_ref()
            .map_or(self.invalid, |control| control.is_invalid())
    }

    pub fn aria_invalid(&self) -> &'static str {
        if self.is_invalid() { "true" } else { "false" }
    }

    /// Listens to the public change event, which fires after every accepted edit.
    pub fn subscribe_change(&mut self, name: impl Into<String>, listener: OnChangeFn) {
        self.change.subscribe(name, listener);
    }

    pub fn unsubscribe_change(&mut self, name: &str) -> bool {
        self.change.unsubscribe(name)
    }
}

impl Default for DateField {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueAccessor for DateField {
    fn write_value(&mut self, value: &str) {
        self.set_value(value);
    }

    fn register_on_change(&mut self, f: OnChangeFn) {
        self.on_change = f;
    }

    fn register_on_touched(&mut self, f: OnTouchedFn) {
        self.on_touched = f;
    }

    fn set_disabled_state(&mut self, disabled: bool) {
        self.flags.disabled = disabled;
    }
}

impl fmt::Debug for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateField")
            .field("format", &self.format)
            .field("placeholder", &self.placeholder)
            .field("flags", &self.flags)
            .field("value", &self.value)
            .field("view_value", &self.view_value)
            .field("state", &self.state)
            .field("invalid", &self.invalid)
            .field("change", &self.change)
            .field("has_control", &self.control.is_some())
            .finish_non_exhaustive()
    }
}
