//! The option node: one parameter or sub-command of a command schema.
//!
//! An [`OptionNode`] wraps an [`OptionRecord`] and guards every write to it.
//! Children are stored as raw records copied at attach time, and the
//! [`options`](OptionNode::options) / [`choices`](OptionNode::choices)
//! accessors rebuild nodes from those records on every call.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::choice::ChoiceNode;
use crate::error::{Result, SchemaError};
use crate::types::{
    ChoiceRecord, MAX_CHOICES, MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_OPTIONS, NumericValue,
    OptionRecord, OptionType, char_len,
};

/// A single node of a command option tree.
///
/// # Examples
///
/// ```
/// use command_option_core::*;
///
/// let mut color = OptionNode::new(OptionType::String, "color", "Pick a color").unwrap();
/// color.add_choice(&ChoiceNode::new("Red", "red").unwrap()).unwrap();
/// color.add_choice(&ChoiceNode::new("Blue", "blue").unwrap()).unwrap();
///
/// let mut paint = OptionNode::new(OptionType::SubCommand, "paint", "Paint a wall").unwrap();
/// paint.add_option(&color).unwrap();
///
/// // The parent holds a snapshot: later edits to `color` are not seen.
/// color.set_name("colour").unwrap();
/// assert_eq!(paint.options()[0].name(), "color");
/// assert_eq!(paint.options()[0].choices().unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OptionRecord", into = "OptionRecord")]
pub struct OptionNode {
    record: OptionRecord,
}

impl OptionNode {
    /// Creates a node with its type, name and description set.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument`](SchemaError::InvalidArgument) if the name
    /// or description is over its length limit.
    pub fn new(kind: OptionType, name: &str, description: &str) -> Result<Self> {
        let mut node = Self::default();
        node.set_type(kind.as_i64())?;
        node.set_name(name)?;
        node.set_description(description)?;
        Ok(node)
    }

    /// Builds a node from a raw record, running every field through its
    /// checked setter. Nested options and choices are checked recursively.
    ///
    /// Autocomplete is applied before choices, so a record carrying both is
    /// accepted here and left for [`validate_option`](crate::validate_option)
    /// to report.
    pub fn try_from_record(record: OptionRecord) -> Result<Self> {
        let mut node = Self::default();
        if let Some(kind) = record.kind {
            node.set_type(kind)?;
        }
        if let Some(name) = &record.name {
            node.set_name(name)?;
        }
        if let Some(description) = &record.description {
            node.set_description(description)?;
        }
        if let Some(required) = record.required {
            node.set_required(required);
        }
        if let Some(channel_types) = record.channel_types {
            node.set_channel_types(channel_types);
        }
        if let Some(min) = record.min_value {
            node.set_min_value(min);
        }
        if let Some(max) = record.max_value {
            node.set_max_value(max);
        }
        if let Some(autocomplete) = record.autocomplete {
            node.set_auto_complete(autocomplete)?;
        }
        if let Some(options) = record.options {
            let children = options
                .into_iter()
                .map(OptionNode::try_from_record)
                .collect::<Result<Vec<_>>>()?;
            node.set_options(&children)?;
        }
        if let Some(choices) = record.choices {
            let choices = choices
                .into_iter()
                .map(ChoiceNode::try_from_record)
                .collect::<Result<Vec<_>>>()?;
            node.set_choices(&choices)?;
        }
        Ok(node)
    }

    /// Parses a JSON option record and builds a checked node from it.
    ///
    /// # Errors
    ///
    /// Returns [`Json`](SchemaError::Json) for malformed input or unknown
    /// keys, and any setter error for out-of-range values.
    pub fn from_json(raw: &str) -> Result<Self> {
        let record: OptionRecord = serde_json::from_str(raw)?;
        Self::try_from_record(record)
    }

    /// Returns the raw record, which is also the wire shape.
    pub fn record(&self) -> &OptionRecord {
        &self.record
    }

    /// Consumes the node and returns its raw record.
    pub fn into_record(self) -> OptionRecord {
        self.record
    }

    /// Returns the option type, if set.
    pub fn kind(&self) -> Option<OptionType> {
        self.record
            .kind
            .and_then(|kind| OptionType::try_from(kind).ok())
    }

    /// Returns the name, or `""` when unset.
    pub fn name(&self) -> &str {
        self.record.name.as_deref().unwrap_or_default()
    }

    /// Returns the description, or `""` when unset.
    pub fn description(&self) -> &str {
        self.record.description.as_deref().unwrap_or_default()
    }

    pub fn is_required(&self) -> bool {
        self.record.required.unwrap_or(false)
    }

    pub fn channel_types(&self) -> &[u16] {
        self.record.channel_types.as_deref().unwrap_or_default()
    }

    pub fn min_value(&self) -> Option<NumericValue> {
        self.record.min_value
    }

    pub fn max_value(&self) -> Option<NumericValue> {
        self.record.max_value
    }

    pub fn autocomplete(&self) -> bool {
        self.record.autocomplete.unwrap_or(false)
    }

    /// Sets the option type from its wire integer.
    ///
    /// Attached choices, channel types and bounds are not re-checked
    /// against the new type.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument`](SchemaError::InvalidArgument) unless
    /// `1 <= kind <= 10`.
    pub fn set_type(&mut self, kind: i64) -> Result<()> {
        let kind = OptionType::try_from(kind)?;
        self.record.kind = Some(kind.as_i64());
        Ok(())
    }

    /// Sets the name. An empty string clears it.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument`](SchemaError::InvalidArgument) if the name
    /// is longer than 32 characters.
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.record.name = checked_text("name", name, MAX_NAME_LEN)?;
        Ok(())
    }

    /// Sets the description. An empty string clears it.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument`](SchemaError::InvalidArgument) if the
    /// description is longer than 100 characters.
    pub fn set_description(&mut self, description: &str) -> Result<()> {
        self.record.description = checked_text("description", description, MAX_DESCRIPTION_LEN)?;
        Ok(())
    }

    pub fn set_required(&mut self, required: bool) {
        self.record.required = Some(required);
    }

    /// Restricts a CHANNEL option to the given channel kinds. Not checked
    /// against the option type.
    pub fn set_channel_types(&mut self, channel_types: Vec<u16>) {
        self.record.channel_types = Some(channel_types);
    }

    /// Sets the lower bound. Neither the kind nor `min <= max` is checked.
    pub fn set_min_value(&mut self, value: impl Into<NumericValue>) {
        self.record.min_value = Some(value.into());
    }

    /// Sets the upper bound. Neither the kind nor `min <= max` is checked.
    pub fn set_max_value(&mut self, value: impl Into<NumericValue>) {
        self.record.max_value = Some(value.into());
    }

    /// Turns autocomplete on or off.
    ///
    /// Only enabling is guarded: adding a choice while autocomplete is on
    /// is still allowed.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument`](SchemaError::InvalidArgument) when
    /// enabling while choices are attached.
    pub fn set_auto_complete(&mut self, enable: bool) -> Result<()> {
        let choice_count = self.record.choices.as_ref().map_or(0, Vec::len);
        if enable && choice_count > 0 {
            debug!(option = self.name(), choice_count, "rejected autocomplete with choices");
            return Err(SchemaError::InvalidArgument(
                "autocomplete cannot be enabled while choices are set".to_string(),
            ));
        }
        self.record.autocomplete = Some(enable);
        Ok(())
    }

    /// Appends a snapshot of `child` to the sub-options.
    ///
    /// # Errors
    ///
    /// Returns [`RangeExceeded`](SchemaError::RangeExceeded) if 25 options
    /// are already attached.
    pub fn add_option(&mut self, child: &OptionNode) -> Result<()> {
        let count = self.record.options.as_ref().map_or(0, Vec::len);
        if count >= MAX_OPTIONS {
            debug!(option = self.name(), child = child.name(), "sub-option limit reached");
            return Err(SchemaError::RangeExceeded {
                field: "options",
                limit: MAX_OPTIONS,
            });
        }
        self.record
            .options
            .get_or_insert_with(Vec::new)
            .push(child.record.clone());
        debug!(option = self.name(), child = child.name(), count = count + 1, "attached sub-option");
        Ok(())
    }

    /// Appends a snapshot of `choice` to the choices.
    ///
    /// # Errors
    ///
    /// Returns [`RangeExceeded`](SchemaError::RangeExceeded) if 25 choices
    /// are already attached.
    pub fn add_choice(&mut self, choice: &ChoiceNode) -> Result<()> {
        let count = self.record.choices.as_ref().map_or(0, Vec::len);
        if count >= MAX_CHOICES {
            debug!(option = self.name(), choice = choice.name(), "choice limit reached");
            return Err(SchemaError::RangeExceeded {
                field: "choices",
                limit: MAX_CHOICES,
            });
        }
        self.record
            .choices
            .get_or_insert_with(Vec::new)
            .push(choice.record().clone());
        debug!(option = self.name(), choice = choice.name(), count = count + 1, "attached choice");
        Ok(())
    }

    /// Replaces all sub-options with snapshots of `children`.
    ///
    /// # Errors
    ///
    /// Returns [`RangeExceeded`](SchemaError::RangeExceeded) for more than
    /// 25 children.
    pub fn set_options(&mut self, children: &[OptionNode]) -> Result<()> {
        if children.len() > MAX_OPTIONS {
            return Err(SchemaError::RangeExceeded {
                field: "options",
                limit: MAX_OPTIONS,
            });
        }
        self.record.options = Some(children.iter().map(|c| c.record.clone()).collect());
        Ok(())
    }

    /// Replaces all choices with snapshots of `choices`. An empty slice
    /// marks choices as configured but empty.
    ///
    /// # Errors
    ///
    /// Returns [`RangeExceeded`](SchemaError::RangeExceeded) for more than
    /// 25 choices.
    pub fn set_choices(&mut self, choices: &[ChoiceNode]) -> Result<()> {
        if choices.len() > MAX_CHOICES {
            return Err(SchemaError::RangeExceeded {
                field: "choices",
                limit: MAX_CHOICES,
            });
        }
        self.record.choices = Some(choices.iter().map(|c| c.record().clone()).collect());
        Ok(())
    }

    /// Removes the first sub-option, in insertion order, whose name matches
    /// `child`'s name. Does nothing if there is no match.
    pub fn remove_option(&mut self, child: &OptionNode) {
        let Some(options) = self.record.options.as_mut() else {
            return;
        };
        let name = child.name();
        if let Some(index) = options
            .iter()
            .position(|o| o.name.as_deref().unwrap_or_default() == name)
        {
            options.remove(index);
            debug!(child = name, "removed sub-option");
        }
    }

    /// Removes the first choice, in insertion order, whose name matches
    /// `choice`'s name. Does nothing if there is no match.
    pub fn remove_choice(&mut self, choice: &ChoiceNode) {
        let Some(choices) = self.record.choices.as_mut() else {
            return;
        };
        if let Some(index) = choices.iter().position(|c| c.name == choice.name()) {
            choices.remove(index);
            debug!(choice = choice.name(), "removed choice");
        }
    }

    /// Materializes the attached choices.
    ///
    /// Returns `None` if choices were never set, which is distinct from
    /// `Some` of an empty list.
    pub fn choices(&self) -> Option<Vec<ChoiceNode>> {
        self.record
            .choices
            .as_ref()
            .map(|records| records.iter().cloned().map(ChoiceNode::materialize).collect())
    }

    /// Materializes the attached sub-options. Empty when none were set.
    pub fn options(&self) -> Vec<OptionNode> {
        self.record
            .options
            .iter()
            .flatten()
            .cloned()
            .map(OptionNode::materialize)
            .collect()
    }

    /// Finds the first sub-option with the given name.
    pub fn find_option(&self, name: &str) -> Option<OptionNode> {
        self.record
            .options
            .iter()
            .flatten()
            .find(|o| o.name.as_deref() == Some(name))
            .cloned()
            .map(OptionNode::materialize)
    }

    /// Assigns a field by name from a raw JSON value.
    ///
    /// Only the names in [`FIELD_NAMES`](crate::FIELD_NAMES) are settable,
    /// and each goes through its checked setter.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownField`](SchemaError::UnknownField) for any other
    /// name, [`Json`](SchemaError::Json) if the value has the wrong shape,
    /// and the setter's own error otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_option_core::{OptionNode, SchemaError};
    /// use serde_json::json;
    ///
    /// let mut node = OptionNode::default();
    /// node.set_field("type", json!(4)).unwrap();
    /// node.set_field("min_value", json!(1)).unwrap();
    /// assert!(matches!(
    ///     node.set_field("version", json!("1")),
    ///     Err(SchemaError::UnknownField(_))
    /// ));
    /// ```
    pub fn set_field(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "type" => self.set_type(serde_json::from_value(value)?),
            "name" => self.set_name(&serde_json::from_value::<String>(value)?),
            "description" => self.set_description(&serde_json::from_value::<String>(value)?),
            "required" => {
                self.set_required(serde_json::from_value(value)?);
                Ok(())
            }
            "choices" => {
                let records: Vec<ChoiceRecord> = serde_json::from_value(value)?;
                let choices = records
                    .into_iter()
                    .map(ChoiceNode::try_from_record)
                    .collect::<Result<Vec<_>>>()?;
                self.set_choices(&choices)
            }
            "options" => {
                let records: Vec<OptionRecord> = serde_json::from_value(value)?;
                let children = records
                    .into_iter()
                    .map(OptionNode::try_from_record)
                    .collect::<Result<Vec<_>>>()?;
                self.set_options(&children)
            }
            "channel_types" => {
                self.set_channel_types(serde_json::from_value(value)?);
                Ok(())
            }
            "min_value" => {
                self.set_min_value(serde_json::from_value::<NumericValue>(value)?);
                Ok(())
            }
            "max_value" => {
                self.set_max_value(serde_json::from_value::<NumericValue>(value)?);
                Ok(())
            }
            "autocomplete" => self.set_auto_complete(serde_json::from_value(value)?),
            other => {
                debug!(field = other, "rejected unknown option field");
                Err(SchemaError::UnknownField(other.to_string()))
            }
        }
    }
}

impl OptionNode {
    /// Wraps a stored child record without re-checking it. Only used for
    /// records that were snapshotted from already checked nodes.
    fn materialize(record: OptionRecord) -> Self {
        Self { record }
    }
}

impl TryFrom<OptionRecord> for OptionNode {
    type Error = SchemaError;

    fn try_from(record: OptionRecord) -> Result<Self> {
        Self::try_from_record(record)
    }
}

impl From<OptionNode> for OptionRecord {
    fn from(node: OptionNode) -> Self {
        node.record
    }
}

fn checked_text(field: &str, value: &str, limit: usize) -> Result<Option<String>> {
    if value.is_empty() {
        return Ok(None);
    }
    let len = char_len(value);
    if len > limit {
        return Err(SchemaError::InvalidArgument(format!(
            "{field} must be at most {limit} characters, got {len}"
        )));
    }
    Ok(Some(value.to_string()))
}
