use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::field::{Field, FieldValue};
use crate::projection::Projection;

/// One row of the passenger manifest.
///
/// `Default` is the all-zero record that projections start from. Absent
/// source values (age, cabin, port) are stored as the zero-value of their
/// type rather than as a separate missing marker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Passenger {
    pub passenger_id: i64,
    pub survived: i64,
    pub pclass: i64,
    pub name: String,
    pub sex: String,
    pub age: f64,
    pub sib_sp: i64,
    pub parch: i64,
    pub ticket: String,
    pub fare: f64,
    pub cabin: String,
    pub embarked: String,
}

impl Passenger {
    pub fn get(&self, field: Field) -> FieldValue {
        match field {
            Field::PassengerId => FieldValue::Integer(self.passenger_id),
            Field::Survived => FieldValue::Integer(self.survived),
            Field::Pclass => FieldValue::Integer(self.pclass),
            Field::Name => FieldValue::Text(self.name.clone()),
            Field::Sex => FieldValue::Text(self.sex.clone()),
            Field::Age => FieldValue::Float(self.age),
            Field::SibSp => FieldValue::Integer(self.sib_sp),
            Field::Parch => FieldValue::Integer(self.parch),
            Field::Ticket => FieldValue::Text(self.ticket.clone()),
            Field::Fare => FieldValue::Float(self.fare),
            Field::Cabin => FieldValue::Text(self.cabin.clone()),
            Field::Embarked => FieldValue::Text(self.embarked.clone()),
        }
    }

    /// Stores a typed value. Integers widen into float fields; any other
    /// mismatch between value and field kind is rejected.
    pub fn set(&mut self, field: Field, value: FieldValue) -> Result<()> {
        match (field, value) {
            (Field::PassengerId, FieldValue::Integer(v)) => self.passenger_id = v,
            (Field::Survived, FieldValue::Integer(v)) => self.survived = v,
            (Field::Pclass, FieldValue::Integer(v)) => self.pclass = v,
            (Field::SibSp, FieldValue::Integer(v)) => self.sib_sp = v,
            (Field::Parch, FieldValue::Integer(v)) => self.parch = v,
            (Field::Age, FieldValue::Float(v)) => self.age = v,
            (Field::Age, FieldValue::Integer(v)) => self.age = v as f64,
            (Field::Fare, FieldValue::Float(v)) => self.fare = v,
            (Field::Fare, FieldValue::Integer(v)) => self.fare = v as f64,
            (Field::Name, FieldValue::Text(v)) => self.name = v,
            (Field::Sex, FieldValue::Text(v)) => self.sex = v,
            (Field::Ticket, FieldValue::Text(v)) => self.ticket = v,
            (Field::Cabin, FieldValue::Text(v)) => self.cabin = v,
            (Field::Embarked, FieldValue::Text(v)) => self.embarked = v,
            (field, value) => {
                return Err(ModelError::TypeConversion {
                    field,
                    value: value.to_string(),
                    expected: field.kind(),
                });
            }
        }
        Ok(())
    }

    /// Copies only the projected fields onto a zero record.
    pub fn project(&self, projection: &Projection) -> Passenger {
        let mut projected = Passenger::default();
        for &field in projection.fields() {
            projected.copy_field(self, field);
        }
        projected
    }

    fn copy_field(&mut self, source: &Passenger, field: Field) {
        match field {
            Field::PassengerId => self.passenger_id = source.passenger_id,
            Field::Survived => self.survived = source.survived,
            Field::Pclass => self.pclass = source.pclass,
            Field::Name => self.name.clone_from(&source.name),
            Field::Sex => self.sex.clone_from(&source.sex),
            Field::Age => self.age = source.age,
            Field::SibSp => self.sib_sp = source.sib_sp,
            Field::Parch => self.parch = source.parch,
            Field::Ticket => self.ticket.clone_from(&source.ticket),
            Field::Fare => self.fare = source.fare,
            Field::Cabin => self.cabin.clone_from(&source.cabin),
            Field::Embarked => self.embarked.clone_from(&source.embarked),
        }
    }
}
