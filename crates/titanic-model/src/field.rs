use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Declared storage type of a passenger field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Integer,
    Float,
    Text,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Text => "text",
        };
        f.write_str(label)
    }
}

/// One of the twelve canonical passenger attributes, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    PassengerId,
    Survived,
    Pclass,
    Name,
    Sex,
    Age,
    SibSp,
    Parch,
    Ticket,
    Fare,
    Cabin,
    Embarked,
}

impl Field {
    /// Every field, in the column order shared by the flat file and the table.
    pub const ALL: [Field; 12] = [
        Field::PassengerId,
        Field::Survived,
        Field::Pclass,
        Field::Name,
        Field::Sex,
        Field::Age,
        Field::SibSp,
        Field::Parch,
        Field::Ticket,
        Field::Fare,
        Field::Cabin,
        Field::Embarked,
    ];

    /// Number of columns in a well-formed row.
    pub const COUNT: usize = Self::ALL.len();

    /// Canonical exact-case name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::PassengerId => "PassengerId",
            Self::Survived => "Survived",
            Self::Pclass => "Pclass",
            Self::Name => "Name",
            Self::Sex => "Sex",
            Self::Age => "Age",
            Self::SibSp => "SibSp",
            Self::Parch => "Parch",
            Self::Ticket => "Ticket",
            Self::Fare => "Fare",
            Self::Cabin => "Cabin",
            Self::Embarked => "Embarked",
        }
    }

    /// Resolves a caller-supplied name. Matching is case-sensitive; the
    /// relational schema spelling `PassengerID` is accepted as an alias.
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "PassengerID" {
            return Some(Self::PassengerId);
        }
        Self::ALL.into_iter().find(|field| field.name() == name)
    }

    /// Like [`Field::from_name`] but reports the rejected name.
    pub fn lookup(name: &str) -> Result<Self> {
        Self::from_name(name).ok_or_else(|| ModelError::UnknownAttribute {
            name: name.to_string(),
        })
    }

    pub const fn kind(self) -> FieldKind {
        match self {
            Self::PassengerId | Self::Survived | Self::Pclass | Self::SibSp | Self::Parch => {
                FieldKind::Integer
            }
            Self::Age | Self::Fare => FieldKind::Float,
            Self::Name | Self::Sex | Self::Ticket | Self::Cabin | Self::Embarked => {
                FieldKind::Text
            }
        }
    }

    /// Fields whose source value may be absent; absence reads as the zero-value.
    pub const fn is_nullable(self) -> bool {
        matches!(self, Self::Age | Self::Cabin | Self::Embarked)
    }

    /// Zero-based column position.
    pub const fn column_index(self) -> usize {
        self as usize
    }

    /// Converts raw text from a delimited file into a typed value.
    ///
    /// Numeric text is trimmed before parsing. An empty value is the
    /// zero-value for nullable fields and an error for every other
    /// numeric field.
    pub fn parse_raw(self, raw: &str) -> Result<FieldValue> {
        let kind = self.kind();
        let trimmed = raw.trim();
        if trimmed.is_empty() && self.is_nullable() {
            return Ok(FieldValue::zero(kind));
        }
        let conversion_error = || ModelError::TypeConversion {
            field: self,
            value: raw.to_string(),
            expected: kind,
        };
        match kind {
            FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
            FieldKind::Integer => trimmed
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|_| conversion_error()),
            FieldKind::Float => trimmed
                .parse::<f64>()
                .map(FieldValue::Float)
                .map_err(|_| conversion_error()),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed value read from or written to a passenger field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    pub fn zero(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Integer => Self::Integer(0),
            FieldKind::Float => Self::Float(0.0),
            FieldKind::Text => Self::Text(String::new()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}
