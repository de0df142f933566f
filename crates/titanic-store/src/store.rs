use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use titanic_model::{Passenger, Projection};
use tracing::{info, warn};

use crate::error::Result;
use crate::flat_file::CsvStore;
use crate::histogram::{FareHistogram, compute_fare_histogram};
use crate::sqlite::SqliteStore;

/// Which storage backend serves the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Csv,
    Sqlite,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => f.write_str("csv"),
            Self::Sqlite => f.write_str("sqlite"),
        }
    }
}

/// Read-only access to the passenger dataset.
///
/// Every call reads the backing store afresh; implementations keep no
/// cache and no cross-call state.
pub trait PassengerStore: Send + Sync {
    fn backend(&self) -> Backend;

    /// Every record, in source order.
    fn list(&self) -> Result<Vec<Passenger>>;

    /// The first record whose `PassengerId` equals `id`.
    fn get(&self, id: i64) -> Result<Passenger>;

    /// The record for `id` with only the projected fields populated.
    fn project(&self, id: i64, projection: &Projection) -> Result<Passenger>;

    /// The fare of every record, in source order.
    fn fares(&self) -> Result<Vec<f64>>;

    /// Validates caller-supplied attribute names, then projects.
    fn get_projected(&self, id: i64, names: &[String]) -> Result<Passenger> {
        let projection = Projection::parse(names)?;
        self.project(id, &projection)
    }

    fn fare_histogram(&self) -> Result<FareHistogram> {
        let fares = self.fares()?;
        compute_fare_histogram(&fares)
    }
}

/// Startup selection of the backend and its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Csv { path: PathBuf },
    Sqlite { path: PathBuf },
}

/// Builds the configured backend. Held for the process lifetime.
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn PassengerStore>> {
    match config {
        StoreConfig::Csv { path } => {
            if !path.is_file() {
                warn!(path = %path.display(), "CSV dataset not found; requests will fail until it exists");
            }
            info!(backend = %Backend::Csv, path = %path.display(), "opened passenger store");
            Ok(Arc::new(CsvStore::new(path.clone())))
        }
        StoreConfig::Sqlite { path } => {
            let store = SqliteStore::open(path)?;
            info!(backend = %Backend::Sqlite, path = %path.display(), "opened passenger store");
            Ok(Arc::new(store))
        }
    }
}
