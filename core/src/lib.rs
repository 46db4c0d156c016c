//! Command option schema nodes and validation.
//!
//! This crate models the parameters of a remote slash-command API as a tree
//! of option nodes:
//!
//! - [`OptionNode`] — one parameter or sub-command, with checked setters and
//!   bounded child collections.
//! - [`ChoiceNode`] — a fixed name/value pair offered by an option.
//! - [`OptionRecord`] / [`ChoiceRecord`] — the raw stored form of each node,
//!   which is also what goes over the wire.
//!
//! Setters enforce per-field limits and return [`SchemaError`] on failure.
//! Cross-field rules for a whole tree ([`validate_option`],
//! [`validate_options`]) are checked separately before sending.
//!
//! # Example
//!
//! ```
//! use command_option_core::*;
//!
//! let mut level = OptionNode::new(OptionType::Integer, "level", "Log level").unwrap();
//! level.set_required(true);
//! level.add_choice(&ChoiceNode::new("Debug", 0_i64).unwrap()).unwrap();
//! level.add_choice(&ChoiceNode::new("Info", 1_i64).unwrap()).unwrap();
//!
//! let mut set = OptionNode::new(OptionType::SubCommand, "set", "Set the level").unwrap();
//! set.add_option(&level).unwrap();
//!
//! assert!(validate_option(&set).is_empty());
//! let wire = serde_json::to_value(&set).unwrap();
//! assert_eq!(wire["options"][0]["choices"][1]["value"], 1);
//! ```

mod choice;
mod error;
mod option;
mod types;
mod validate;

pub use choice::ChoiceNode;
pub use error::{Result, SchemaError};
pub use option::OptionNode;
pub use types::*;
pub use validate::{ValidationError, validate_option, validate_options};
