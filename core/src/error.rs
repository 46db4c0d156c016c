//! Error types for option node mutations.
//!
//! Every failed setter or attach call returns one of these and leaves the
//! node untouched.

use thiserror::Error;

/// Errors raised by [`OptionNode`](crate::OptionNode) and
/// [`ChoiceNode`](crate::ChoiceNode) mutations.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A field value violates a static constraint (type out of range,
    /// name too long, autocomplete enabled while choices are present).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A child collection is already at capacity.
    #[error("{field} cannot hold more than {limit} entries")]
    RangeExceeded {
        /// Collection that is full (`options` or `choices`).
        field: &'static str,
        /// Fixed capacity of the collection.
        limit: usize,
    },

    /// Assignment to a field name outside the settable allow-list.
    #[error("unknown option field: {0}")]
    UnknownField(String),

    /// A raw value could not be decoded into the field's type.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results with [`SchemaError`].
pub type Result<T> = std::result::Result<T, SchemaError>;
