//! Whole-tree validation.
//!
//! Setters only enforce per-field limits and collection capacities. Before a
//! tree is handed to the transport layer it should also pass the cross-field
//! checks here: type-dependent fields, nesting rules, sibling uniqueness and
//! ordering.
//!
//! # Examples
//!
//! ```
//! use command_option_core::*;
//!
//! let query = OptionNode::new(OptionType::String, "query", "Search text").unwrap();
//! assert!(validate_option(&query).is_empty());
//!
//! // Invalid: choices on a BOOLEAN option
//! let mut flag = OptionNode::new(OptionType::Boolean, "flag", "A flag").unwrap();
//! flag.add_choice(&ChoiceNode::new("Yes", "yes").unwrap()).unwrap();
//! assert!(!validate_option(&flag).is_empty());
//! ```

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::{OptionNode, OptionType};

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-_\p{L}\p{N}]{1,32}$").expect("static regex must compile"));

/// Structural problems found in an option tree.
///
/// The `String` payload is the option path, names joined by spaces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Option has no type.
    #[error("option type is not set: {0}")]
    MissingType(String),
    /// Option has no name.
    #[error("option name is not set: {0}")]
    MissingName(String),
    /// Option has no description.
    #[error("option description is not set: {0}")]
    MissingDescription(String),
    /// Name contains uppercase letters, whitespace or punctuation.
    #[error("invalid option name: {0}")]
    InvalidName(String),
    /// Choices on a type other than STRING, INTEGER or NUMBER.
    #[error("choices are not allowed on {kind} option: {path}")]
    ChoicesNotAllowed { path: String, kind: OptionType },
    /// A choice value does not match the option type.
    #[error("choice value does not match option type: {0}")]
    ChoiceTypeMismatch(String),
    /// Autocomplete on a type other than STRING, INTEGER or NUMBER.
    #[error("autocomplete is not allowed on {kind} option: {path}")]
    AutocompleteNotAllowed { path: String, kind: OptionType },
    /// Autocomplete enabled together with a non-empty choice list.
    #[error("autocomplete cannot be combined with choices: {0}")]
    AutocompleteWithChoices(String),
    /// Channel types on a non-CHANNEL option.
    #[error("channel types are only allowed on CHANNEL options: {0}")]
    ChannelTypesNotAllowed(String),
    /// Bounds on a type other than INTEGER or NUMBER.
    #[error("min/max values are only allowed on INTEGER and NUMBER options: {0}")]
    BoundsNotAllowed(String),
    /// Bound magnitude beyond 2^53, or a fractional bound on an INTEGER.
    #[error("invalid min/max value: {0}")]
    InvalidBound(String),
    /// `min_value` is greater than `max_value`.
    #[error("min_value is greater than max_value: {0}")]
    InvertedBounds(String),
    /// Sub-options on a type that is not a sub-command or group.
    #[error("nested options are only allowed on sub-commands and groups: {0}")]
    NestedOptionsNotAllowed(String),
    /// Group containing something other than sub-commands, or a
    /// sub-command containing sub-commands.
    #[error("invalid sub-command nesting: {0}")]
    InvalidNesting(String),
    /// Two sibling options share a name.
    #[error("duplicate option in scope: {0}")]
    DuplicateOption(String),
    /// Two choices of one option share a name.
    #[error("duplicate choice in option: {0}")]
    DuplicateChoice(String),
    /// A required option follows an optional sibling.
    #[error("required option follows optional option: {0}")]
    RequiredAfterOptional(String),
}

/// Validates a single option and everything below it.
///
/// Returns an empty list when the tree is ready to send. Validation stops at
/// the first problem found.
pub fn validate_option(option: &OptionNode) -> Vec<ValidationError> {
    let mut path = Vec::new();
    validate_node(option, &mut path)
}

/// Validates the top-level options of a command.
///
/// Checks sibling rules (unique names, required before optional) and then
/// each option.
///
/// # Examples
///
/// ```
/// use command_option_core::*;
///
/// let mut a = OptionNode::new(OptionType::String, "a", "First").unwrap();
/// let mut b = OptionNode::new(OptionType::String, "b", "Second").unwrap();
/// b.set_required(true);
///
/// let errors = validate_options(&[a.clone(), b.clone()]);
/// assert!(matches!(errors[0], ValidationError::RequiredAfterOptional(_)));
///
/// a.set_required(true);
/// assert!(validate_options(&[a, b]).is_empty());
/// ```
pub fn validate_options(options: &[OptionNode]) -> Vec<ValidationError> {
    let mut path = Vec::new();
    validate_siblings(options, &mut path)
}

fn validate_siblings(options: &[OptionNode], path: &mut Vec<String>) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut saw_optional = false;

    for option in options {
        let name = option.name();
        if !name.is_empty() && !seen.insert(name) {
            errors.push(ValidationError::DuplicateOption(join(path, name)));
            return errors;
        }

        // Sub-commands carry no required flag of their own.
        if !option.kind().is_some_and(OptionType::is_subcommand) {
            if option.is_required() && saw_optional {
                errors.push(ValidationError::RequiredAfterOptional(join(path, name)));
                return errors;
            }
            saw_optional |= !option.is_required();
        }

        errors.extend(validate_node(option, path));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

fn validate_node(option: &OptionNode, path: &mut Vec<String>) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let name = option.name();
    let here = join(path, display_name(name));

    let Some(kind) = option.kind() else {
        errors.push(ValidationError::MissingType(here));
        return errors;
    };
    if name.is_empty() {
        errors.push(ValidationError::MissingName(here));
        return errors;
    }
    if !NAME_RE.is_match(name) || name.to_lowercase() != name {
        errors.push(ValidationError::InvalidName(here));
        return errors;
    }
    if option.description().is_empty() {
        errors.push(ValidationError::MissingDescription(here));
        return errors;
    }

    errors.extend(validate_choices(option, kind, &here));
    if !errors.is_empty() {
        return errors;
    }

    if !option.channel_types().is_empty() && kind != OptionType::Channel {
        errors.push(ValidationError::ChannelTypesNotAllowed(here));
        return errors;
    }

    errors.extend(validate_bounds(option, kind, &here));
    if !errors.is_empty() {
        return errors;
    }

    let children = option.options();
    if children.is_empty() {
        return errors;
    }
    if !kind.is_subcommand() {
        errors.push(ValidationError::NestedOptionsNotAllowed(here));
        return errors;
    }
    for child in &children {
        let nested = match (kind, child.kind()) {
            (OptionType::SubCommandGroup, Some(OptionType::SubCommand)) => false,
            (OptionType::SubCommandGroup, _) => true,
            (_, Some(child_kind)) => child_kind.is_subcommand(),
            (_, None) => false,
        };
        if nested {
            errors.push(ValidationError::InvalidNesting(format!(
                "{here} {}",
                display_name(child.name())
            )));
            return errors;
        }
    }

    path.push(name.to_string());
    errors.extend(validate_siblings(&children, path));
    path.pop();

    errors
}

fn validate_choices(option: &OptionNode, kind: OptionType, here: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let choices = option.choices().unwrap_or_default();

    if option.autocomplete() {
        if !kind.accepts_choices() {
            errors.push(ValidationError::AutocompleteNotAllowed {
                path: here.to_string(),
                kind,
            });
            return errors;
        }
        if !choices.is_empty() {
            errors.push(ValidationError::AutocompleteWithChoices(here.to_string()));
            return errors;
        }
    }

    if choices.is_empty() {
        return errors;
    }
    if !kind.accepts_choices() {
        errors.push(ValidationError::ChoicesNotAllowed {
            path: here.to_string(),
            kind,
        });
        return errors;
    }

    let mut seen = HashSet::new();
    for choice in &choices {
        if !choice.value().fits(kind) {
            errors.push(ValidationError::ChoiceTypeMismatch(format!(
                "{here} ({})",
                choice.name()
            )));
            return errors;
        }
        if !seen.insert(choice.name().to_string()) {
            errors.push(ValidationError::DuplicateChoice(format!(
                "{here} ({})",
                choice.name()
            )));
            return errors;
        }
    }

    errors
}

fn validate_bounds(option: &OptionNode, kind: OptionType, here: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let bounds: Vec<_> = [option.min_value(), option.max_value()]
        .into_iter()
        .flatten()
        .collect();
    if bounds.is_empty() {
        return errors;
    }

    if !kind.accepts_bounds() {
        errors.push(ValidationError::BoundsNotAllowed(here.to_string()));
        return errors;
    }
    for bound in &bounds {
        if !bound.is_safe() || (kind == OptionType::Integer && !bound.is_integral()) {
            errors.push(ValidationError::InvalidBound(format!("{here} ({bound})")));
            return errors;
        }
    }
    if let (Some(min), Some(max)) = (option.min_value(), option.max_value()) {
        if min.as_f64() > max.as_f64() {
            errors.push(ValidationError::InvertedBounds(here.to_string()));
        }
    }

    errors
}

fn display_name(name: &str) -> &str {
    if name.is_empty() { "<unnamed>" } else { name }
}

fn join(path: &[String], name: &str) -> String {
    path.iter()
        .map(String::as_str)
        .chain(std::iter::once(name))
        .collect::<Vec<_>>()
        .join(" ")
}
