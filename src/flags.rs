use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Coerces a host-supplied attribute into a boolean.
///
/// Absent (`null`) and the textual or boolean `false` are false; any other value, including
/// empty strings and objects, is true. A bare attribute such as `<date-field disabled>`
/// arrives as `""` and therefore enables the flag.
pub fn coerce_boolean_property(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => s != "false",
        _ => true,
    }
}

/// Presentational switches of the field. None of them touch the stored value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeFlags {
    #[serde(deserialize_with = "deserialize_flag")]
    pub readonly: bool,
    #[serde(deserialize_with = "deserialize_flag")]
    pub required: bool,
    #[serde(deserialize_with = "deserialize_flag")]
    pub disabled: bool,
}

/// Deserializes any JSON value through [`coerce_boolean_property`].
pub(crate) fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|v| coerce_boolean_property(&v))
}
