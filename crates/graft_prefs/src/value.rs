//! Stored value type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A persisted setting value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// Toggle state.
    Bool(bool),
    /// Slider position.
    Int(i64),
    /// Dropdown choice or free text.
    Str(String),
}

impl SettingValue {
    /// The boolean payload, if this is a bool.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The integer payload, if this is an int that fits in `i32`.
    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int(value) => i32::try_from(*value).ok(),
            _ => None,
        }
    }

    /// The string payload, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for SettingValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Str(value) => write!(f, "{value:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_match_variant() {
        assert_eq!(SettingValue::from(true).as_bool(), Some(true));
        assert_eq!(SettingValue::from(7).as_i32(), Some(7));
        assert_eq!(SettingValue::from("x").as_str(), Some("x"));
        assert_eq!(SettingValue::from(7).as_bool(), None);
    }

    #[test]
    fn test_out_of_range_int() {
        assert_eq!(SettingValue::Int(i64::MAX).as_i32(), None);
    }
}
