//! Choice leaves offered by STRING, INTEGER and NUMBER options.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};
use crate::types::{ChoiceRecord, ChoiceValue, MAX_CHOICE_LEN, char_len};

/// A fixed name/value pair an option offers to the user.
///
/// # Examples
///
/// ```
/// use command_option_core::{ChoiceNode, ChoiceValue};
///
/// let choice = ChoiceNode::new("Dark mode", "dark").unwrap();
/// assert_eq!(choice.name(), "Dark mode");
/// assert_eq!(choice.value(), &ChoiceValue::String("dark".into()));
///
/// assert!(ChoiceNode::new("", 1_i64).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ChoiceRecord", into = "ChoiceRecord")]
pub struct ChoiceNode {
    record: ChoiceRecord,
}

impl ChoiceNode {
    /// Creates a choice, checking name and value lengths.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument`](SchemaError::InvalidArgument) if the name
    /// is empty or longer than 100 characters, or if a string value is longer
    /// than 100 characters.
    pub fn new(name: impl Into<String>, value: impl Into<ChoiceValue>) -> Result<Self> {
        let record = ChoiceRecord {
            name: name.into(),
            value: value.into(),
        };
        check_record(&record)?;
        Ok(Self { record })
    }

    /// Builds a checked choice from a raw record.
    pub fn try_from_record(record: ChoiceRecord) -> Result<Self> {
        check_record(&record)?;
        Ok(Self { record })
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn value(&self) -> &ChoiceValue {
        &self.record.value
    }

    /// Returns the raw record backing this choice.
    pub fn record(&self) -> &ChoiceRecord {
        &self.record
    }
}

impl ChoiceNode {
    /// Wraps a stored record without re-checking it.
    pub(crate) fn materialize(record: ChoiceRecord) -> Self {
        Self { record }
    }
}

impl TryFrom<ChoiceRecord> for ChoiceNode {
    type Error = SchemaError;

    fn try_from(record: ChoiceRecord) -> Result<Self> {
        Self::try_from_record(record)
    }
}

impl From<ChoiceNode> for ChoiceRecord {
    fn from(node: ChoiceNode) -> Self {
        node.record
    }
}

fn check_record(record: &ChoiceRecord) -> Result<()> {
    let name_len = char_len(&record.name);
    if name_len == 0 || name_len > MAX_CHOICE_LEN {
        return Err(SchemaError::InvalidArgument(format!(
            "choice name must be 1-{MAX_CHOICE_LEN} characters, got {name_len}"
        )));
    }
    if let ChoiceValue::String(value) = &record.value {
        let value_len = char_len(value);
        if value_len > MAX_CHOICE_LEN {
            return Err(SchemaError::InvalidArgument(format!(
                "choice value must be at most {MAX_CHOICE_LEN} characters, got {value_len}"
            )));
        }
    }
    Ok(())
}
