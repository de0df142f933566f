//! Passenger record model.
//!
//! Defines the canonical twelve-field passenger record shared by every
//! storage backend, the typed field values used to read and write it, and
//! validated attribute projections.

#![deny(unsafe_code)]

pub mod error;
pub mod field;
pub mod passenger;
pub mod projection;

pub use error::{ModelError, Result};
pub use field::{Field, FieldKind, FieldValue};
pub use passenger::Passenger;
pub use projection::Projection;

/// Canonical attribute names in column order, as advertised to API callers.
pub fn allowed_attributes() -> Vec<&'static str> {
    Field::ALL.into_iter().map(Field::name).collect()
}
