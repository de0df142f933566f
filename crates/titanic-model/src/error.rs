use thiserror::Error;

use crate::field::{Field, FieldKind};

/// Errors raised while resolving field names or coercing field values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// The name is not one of the twelve canonical passenger fields.
    #[error("unknown attribute: {name}")]
    UnknownAttribute { name: String },

    /// A projection was requested with no attributes at all.
    #[error("attributes cannot be empty")]
    EmptyProjection,

    /// A raw or typed value does not fit the declared type of its field.
    #[error("cannot convert {value:?} to {expected} for {field}")]
    TypeConversion {
        field: Field,
        value: String,
        expected: FieldKind,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
