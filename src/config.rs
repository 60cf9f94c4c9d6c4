use serde::{Deserialize, Serialize};

use crate::flags::deserialize_flag;
use crate::{AttributeFlags, DisplayPattern};

/// Host-supplied configuration of a [`DateField`](crate::DateField).
///
/// Every key is optional. Flags accept any JSON value and are coerced the way HTML attributes
/// are, see [`coerce_boolean_property`](crate::coerce_boolean_property).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Display pattern, `MM/DD/YYYY` unless given.
    pub format:      DisplayPattern,
    pub placeholder: String,
    #[serde(deserialize_with = "deserialize_flag")]
    pub readonly:    bool,
    #[serde(deserialize_with = "deserialize_flag")]
    pub required:    bool,
    #[serde(deserialize_with = "deserialize_flag")]
    pub disabled:    bool,
    /// Initial value, canonical `YYYY-MM-DD`.
    pub value:       Option<String>,
}

impl FieldConfig {
    /// # Errors
    /// Returns the `serde_json` error if `json` is malformed or names an invalid pattern.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub const fn flags(&self) -> AttributeFlags {
        AttributeFlags {
            readonly: self.readonly,
            required: self.required,
            disabled: self.disabled,
        }
    }
}
