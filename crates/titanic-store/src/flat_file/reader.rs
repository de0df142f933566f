//! Row-level access to the delimited passenger file.

use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use titanic_model::{Field, FieldValue, ModelError, Passenger, Projection};

use crate::error::{BackendError, Result, StoreError};

/// One data row with its physical line number.
#[derive(Debug, Clone)]
pub struct RawRow {
    pub line: u64,
    record: StringRecord,
}

impl RawRow {
    /// Raw text of a field; rows are only constructed with all columns present.
    pub fn raw(&self, field: Field) -> &str {
        self.record.get(field.column_index()).unwrap_or_default()
    }

    pub fn id(&self) -> Result<i64> {
        match self.parse(Field::PassengerId)? {
            FieldValue::Integer(id) => Ok(id),
            other => Err(self.malformed(format!("unexpected PassengerId value {other}"))),
        }
    }

    pub fn fare(&self) -> Result<f64> {
        match self.parse(Field::Fare)? {
            FieldValue::Float(fare) => Ok(fare),
            other => Err(self.malformed(format!("unexpected Fare value {other}"))),
        }
    }

    /// Full record. Conversion failures are reported as malformed rows.
    pub fn to_passenger(&self) -> Result<Passenger> {
        let mut passenger = Passenger::default();
        for field in Field::ALL {
            let value = self.parse(field)?;
            passenger.set(field, value)?;
        }
        Ok(passenger)
    }

    /// Record with only the projected fields converted. Conversion failures
    /// are reported against the requested field.
    pub fn to_projected(&self, projection: &Projection) -> Result<Passenger> {
        let mut passenger = Passenger::default();
        for &field in projection.fields() {
            let value = field.parse_raw(self.raw(field))?;
            passenger.set(field, value)?;
        }
        Ok(passenger)
    }

    fn parse(&self, field: Field) -> Result<FieldValue> {
        field
            .parse_raw(self.raw(field))
            .map_err(|err: ModelError| self.malformed(err.to_string()))
    }

    fn malformed(&self, message: String) -> StoreError {
        StoreError::Parse {
            line: self.line,
            message,
        }
    }
}

/// Opens the file and yields its data rows, skipping the header.
///
/// Rows with a field count other than twelve are yielded as
/// [`StoreError::Parse`] so that scans stop at them.
pub fn read_rows(path: &Path) -> Result<impl Iterator<Item = Result<RawRow>>> {
    let file = File::open(path).map_err(|source| BackendError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);
    let path = path.to_path_buf();

    Ok(reader.into_records().map(move |result| {
        let record = result.map_err(|source| BackendError::Csv {
            path: path.clone(),
            source,
        })?;
        let line = record.position().map_or(0, csv::Position::line);
        if record.len() != Field::COUNT {
            return Err(StoreError::Parse {
                line,
                message: format!(
                    "expected {} fields, found {}",
                    Field::COUNT,
                    record.len()
                ),
            });
        }
        Ok(RawRow { line, record })
    }))
}
