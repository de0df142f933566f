//! Flat-file backend over a comma-delimited passenger manifest.
//!
//! The file is re-read on every call. Its first row is a header and is
//! skipped; every following row must carry the twelve canonical columns in
//! order. A malformed row aborts the operation that reaches it.

mod reader;

use std::path::PathBuf;

use titanic_model::{Passenger, Projection};
use tracing::{debug, debug_span};

use crate::error::{Result, StoreError};
use crate::store::{Backend, PassengerStore};

pub use reader::{RawRow, read_rows};

#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Linear scan for the first row with a matching id.
    fn find_row(&self, id: i64) -> Result<RawRow> {
        for row in read_rows(&self.path)? {
            let row = row?;
            if row.id()? == id {
                debug!(id, line = row.line, "matched passenger row");
                return Ok(row);
            }
        }
        Err(StoreError::NotFound { id })
    }
}

impl PassengerStore for CsvStore {
    fn backend(&self) -> Backend {
        Backend::Csv
    }

    fn list(&self) -> Result<Vec<Passenger>> {
        let span = debug_span!("csv_list", path = %self.path.display());
        let _guard = span.enter();
        let mut passengers = Vec::new();
        for row in read_rows(&self.path)? {
            passengers.push(row?.to_passenger()?);
        }
        debug!(rows = passengers.len(), "loaded passengers");
        Ok(passengers)
    }

    fn get(&self, id: i64) -> Result<Passenger> {
        let span = debug_span!("csv_get", path = %self.path.display(), id);
        let _guard = span.enter();
        self.find_row(id)?.to_passenger()
    }

    fn project(&self, id: i64, projection: &Projection) -> Result<Passenger> {
        let span = debug_span!(
            "csv_project",
            path = %self.path.display(),
            id,
            fields = %projection
        );
        let _guard = span.enter();
        self.find_row(id)?.to_projected(projection)
    }

    fn fares(&self) -> Result<Vec<f64>> {
        let span = debug_span!("csv_fares", path = %self.path.display());
        let _guard = span.enter();
        let mut fares = Vec::new();
        for row in read_rows(&self.path)? {
            fares.push(row?.fare()?);
        }
        debug!(rows = fares.len(), "extracted fares");
        Ok(fares)
    }
}
