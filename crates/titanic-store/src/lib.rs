//! Read-only passenger storage.
//!
//! Two structurally different backends answer the same four queries
//! through [`PassengerStore`]:
//!
//! - **Flat file** ([`CsvStore`]): a comma-delimited manifest, re-parsed on
//!   every call
//! - **Relational** ([`SqliteStore`]): a `titanic` table queried with bound
//!   parameters
//!
//! Fare histograms are computed once, backend-agnostically, by
//! [`compute_fare_histogram`] over the extracted fare column.
//!
//! # Example
//!
//! ```ignore
//! use titanic_store::{StoreConfig, open_store};
//!
//! let store = open_store(&StoreConfig::Csv { path: "datastore/titanic.csv".into() })?;
//! let passenger = store.get(1)?;
//! let histogram = store.fare_histogram()?;
//! ```

#![deny(unsafe_code)]

mod error;
mod flat_file;
mod histogram;
mod sqlite;
mod store;

// === Error Types ===
pub use error::{BackendError, Result, StoreError};

// === Access Interface ===
pub use store::{Backend, PassengerStore, StoreConfig, open_store};

// === Backends ===
pub use flat_file::{CsvStore, RawRow, read_rows};
pub use sqlite::{SqliteStore, TABLE_NAME};

// === Histogram ===
pub use histogram::{
    FareHistogram, HistogramBucket, PERCENTILES, compute_fare_histogram, percentile_index,
    percentile_label,
};
