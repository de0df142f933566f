use std::fmt;

use crate::error::{ModelError, Result};
use crate::field::Field;

/// An ordered, duplicate-free, non-empty selection of passenger fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    fields: Vec<Field>,
}

impl Projection {
    /// Resolves caller-supplied attribute names.
    ///
    /// Fails on the first name outside the canonical set, or when no names
    /// are given. Repeated names keep their first position.
    pub fn parse<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fields = Vec::new();
        for name in names {
            let field = Field::lookup(name.as_ref())?;
            if !fields.contains(&field) {
                fields.push(field);
            }
        }
        Self::from_fields(fields)
    }

    pub fn from_fields(fields: Vec<Field>) -> Result<Self> {
        if fields.is_empty() {
            return Err(ModelError::EmptyProjection);
        }
        Ok(Self { fields })
    }

    /// Every canonical field, in column order.
    pub fn all() -> Self {
        Self {
            fields: Field::ALL.to_vec(),
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, field) in self.fields.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            f.write_str(field.name())?;
        }
        Ok(())
    }
}
