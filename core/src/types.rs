//! Core option schema types.
//!
//! This module defines the raw records that make up the wire shape of a
//! command option tree, plus the small value enums stored in them. The
//! records are plain serde structs; all validation lives on the node types
//! that wrap them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Maximum number of sub-options a single option may hold.
pub const MAX_OPTIONS: usize = 25;

/// Maximum number of choices a single option may hold.
pub const MAX_CHOICES: usize = 25;

/// Maximum option name length, in characters.
pub const MAX_NAME_LEN: usize = 32;

/// Maximum option description length, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 100;

/// Maximum choice name and string-value length, in characters.
pub const MAX_CHOICE_LEN: usize = 100;

/// Largest magnitude a numeric bound may have (2^53).
pub const MAX_SAFE_NUMBER: i64 = 1 << 53;

/// Field names accepted by the generic assignment path.
///
/// # Examples
///
/// ```
/// use command_option_core::FIELD_NAMES;
///
/// assert_eq!(FIELD_NAMES.len(), 10);
/// assert!(FIELD_NAMES.contains(&"autocomplete"));
/// assert!(!FIELD_NAMES.contains(&"id"));
/// ```
pub const FIELD_NAMES: [&str; 10] = [
    "type",
    "name",
    "description",
    "required",
    "choices",
    "options",
    "channel_types",
    "min_value",
    "max_value",
    "autocomplete",
];

/// Kind of a command option.
///
/// The discriminants are the integers used on the wire.
///
/// # Examples
///
/// ```
/// use command_option_core::OptionType;
///
/// assert_eq!(OptionType::try_from(3_i64).unwrap(), OptionType::String);
/// assert!(OptionType::try_from(11_i64).is_err());
/// assert_eq!(OptionType::Number.as_i64(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionType {
    SubCommand = 1,
    SubCommandGroup = 2,
    String = 3,
    Integer = 4,
    Boolean = 5,
    User = 6,
    Channel = 7,
    Role = 8,
    Mentionable = 9,
    Number = 10,
}

impl OptionType {
    /// All option types in wire order.
    pub const ALL: [OptionType; 10] = [
        OptionType::SubCommand,
        OptionType::SubCommandGroup,
        OptionType::String,
        OptionType::Integer,
        OptionType::Boolean,
        OptionType::User,
        OptionType::Channel,
        OptionType::Role,
        OptionType::Mentionable,
        OptionType::Number,
    ];

    /// Returns the wire integer for this type.
    pub fn as_i64(self) -> i64 {
        self as i64
    }

    /// Whether options of this type may carry nested options.
    pub fn is_subcommand(self) -> bool {
        matches!(self, OptionType::SubCommand | OptionType::SubCommandGroup)
    }

    /// Whether options of this type may offer choices or autocomplete.
    pub fn accepts_choices(self) -> bool {
        matches!(
            self,
            OptionType::String | OptionType::Integer | OptionType::Number
        )
    }

    /// Whether options of this type may carry `min_value`/`max_value`.
    pub fn accepts_bounds(self) -> bool {
        matches!(self, OptionType::Integer | OptionType::Number)
    }
}

impl TryFrom<i64> for OptionType {
    type Error = SchemaError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        OptionType::ALL
            .into_iter()
            .find(|kind| kind.as_i64() == value)
            .ok_or_else(|| {
                SchemaError::InvalidArgument(format!(
                    "option type must be between 1 and 10, got {value}"
                ))
            })
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OptionType::SubCommand => "SUB_COMMAND",
            OptionType::SubCommandGroup => "SUB_COMMAND_GROUP",
            OptionType::String => "STRING",
            OptionType::Integer => "INTEGER",
            OptionType::Boolean => "BOOLEAN",
            OptionType::User => "USER",
            OptionType::Channel => "CHANNEL",
            OptionType::Role => "ROLE",
            OptionType::Mentionable => "MENTIONABLE",
            OptionType::Number => "NUMBER",
        };
        f.write_str(name)
    }
}

/// A numeric option bound.
///
/// Serialized untagged, so `5` and `5.5` both appear as bare JSON numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericValue {
    Integer(i64),
    Number(f64),
}

impl NumericValue {
    /// Returns the bound as a float for comparisons.
    pub fn as_f64(self) -> f64 {
        match self {
            NumericValue::Integer(v) => v as f64,
            NumericValue::Number(v) => v,
        }
    }

    /// Whether the bound lies within ±2^53.
    pub fn is_safe(self) -> bool {
        match self {
            NumericValue::Integer(v) => v.unsigned_abs() <= MAX_SAFE_NUMBER as u64,
            NumericValue::Number(v) => v.is_finite() && v.abs() <= MAX_SAFE_NUMBER as f64,
        }
    }

    /// Whether the bound has no fractional part.
    pub fn is_integral(self) -> bool {
        match self {
            NumericValue::Integer(_) => true,
            NumericValue::Number(v) => v.fract() == 0.0,
        }
    }
}

impl From<i64> for NumericValue {
    fn from(value: i64) -> Self {
        NumericValue::Integer(value)
    }
}

impl From<i32> for NumericValue {
    fn from(value: i32) -> Self {
        NumericValue::Integer(value.into())
    }
}

impl From<f64> for NumericValue {
    fn from(value: f64) -> Self {
        NumericValue::Number(value)
    }
}

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericValue::Integer(v) => write!(f, "{v}"),
            NumericValue::Number(v) => write!(f, "{v}"),
        }
    }
}

/// Value offered by a choice.
///
/// # Examples
///
/// ```
/// use command_option_core::ChoiceValue;
///
/// let v: ChoiceValue = serde_json::from_str("7").unwrap();
/// assert_eq!(v, ChoiceValue::Integer(7));
///
/// let v: ChoiceValue = serde_json::from_str("\"dark\"").unwrap();
/// assert_eq!(v, ChoiceValue::String("dark".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChoiceValue {
    Integer(i64),
    Number(f64),
    String(String),
}

impl ChoiceValue {
    /// Whether this value may be offered by an option of `kind`.
    pub fn fits(&self, kind: OptionType) -> bool {
        match self {
            ChoiceValue::String(_) => kind == OptionType::String,
            ChoiceValue::Integer(_) => {
                matches!(kind, OptionType::Integer | OptionType::Number)
            }
            ChoiceValue::Number(_) => kind == OptionType::Number,
        }
    }
}

impl From<&str> for ChoiceValue {
    fn from(value: &str) -> Self {
        ChoiceValue::String(value.to_string())
    }
}

impl From<String> for ChoiceValue {
    fn from(value: String) -> Self {
        ChoiceValue::String(value)
    }
}

impl From<i64> for ChoiceValue {
    fn from(value: i64) -> Self {
        ChoiceValue::Integer(value)
    }
}

impl From<f64> for ChoiceValue {
    fn from(value: f64) -> Self {
        ChoiceValue::Number(value)
    }
}

impl fmt::Display for ChoiceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChoiceValue::Integer(v) => write!(f, "{v}"),
            ChoiceValue::Number(v) => write!(f, "{v}"),
            ChoiceValue::String(v) => f.write_str(v),
        }
    }
}

/// Raw stored form of a choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChoiceRecord {
    /// Display name shown to the user.
    pub name: String,
    /// Value sent back when the choice is picked.
    pub value: ChoiceValue,
}

/// Raw stored form of an option, and its wire shape.
///
/// Every field is optional: a record only carries what was explicitly set,
/// and unset fields are omitted when serialized. Unknown keys are rejected
/// on deserialization.
///
/// # Examples
///
/// ```
/// use command_option_core::OptionRecord;
///
/// let record: OptionRecord =
///     serde_json::from_str(r#"{"type": 3, "name": "query"}"#).unwrap();
/// assert_eq!(record.kind, Some(3));
/// assert!(record.choices.is_none());
///
/// let err = serde_json::from_str::<OptionRecord>(r#"{"id": 1}"#);
/// assert!(err.is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionRecord {
    /// Raw option type integer.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// `None` when choices were never set, distinct from an empty list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<ChoiceRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<OptionRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_types: Option<Vec<u16>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<NumericValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<NumericValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autocomplete: Option<bool>,
}

/// Length of `s` in characters.
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_type_range() {
        for value in 1..=10_i64 {
            assert_eq!(OptionType::try_from(value).unwrap().as_i64(), value);
        }
        for value in [-1_i64, 0, 11, 255] {
            assert!(matches!(
                OptionType::try_from(value),
                Err(SchemaError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_numeric_value_untagged() {
        let v: NumericValue = serde_json::from_str("5").unwrap();
        assert_eq!(v, NumericValue::Integer(5));
        let v: NumericValue = serde_json::from_str("5.5").unwrap();
        assert_eq!(v, NumericValue::Number(5.5));
        assert_eq!(serde_json::to_string(&NumericValue::Integer(-3)).unwrap(), "-3");
    }

    #[test]
    fn test_numeric_value_safe_range() {
        assert!(NumericValue::Integer(MAX_SAFE_NUMBER).is_safe());
        assert!(!NumericValue::Integer(MAX_SAFE_NUMBER + 1).is_safe());
        assert!(NumericValue::Number(-1.5).is_safe());
        assert!(!NumericValue::Number(f64::INFINITY).is_safe());
    }

    #[test]
    fn test_choice_value_fits() {
        assert!(ChoiceValue::from("a").fits(OptionType::String));
        assert!(!ChoiceValue::from("a").fits(OptionType::Integer));
        assert!(ChoiceValue::from(2_i64).fits(OptionType::Number));
        assert!(!ChoiceValue::from(2.5).fits(OptionType::Integer));
    }

    #[test]
    fn test_record_omits_unset_fields() {
        let record = OptionRecord {
            kind: Some(5),
            name: Some("flag".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({ "type": 5, "name": "flag" }));
    }

    #[test]
    fn test_char_len_counts_characters() {
        assert_eq!(char_len("héllo"), 5);
        assert_eq!(char_len("日本"), 2);
        assert_eq!(char_len(""), 0);
    }
}
