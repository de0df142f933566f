//! Backend selection from flags and environment.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use titanic_store::StoreConfig;

pub const DEFAULT_CSV_PATH: &str = "./datastore/titanic.csv";
pub const DEFAULT_DB_PATH: &str = "./datastore/titanic.db";

/// CLI backend choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Csv,
    Sqlite,
}

#[derive(Debug, Clone, Args)]
pub struct StoreArgs {
    /// Storage backend serving the dataset.
    #[arg(long, value_enum, env = "TITANIC_BACKEND", global = true)]
    pub backend: Option<BackendArg>,

    /// Selects the SQLite backend when no backend is given explicitly.
    #[arg(long, env = "USE_SQLITE", hide = true, global = true)]
    pub use_sqlite: bool,

    /// Path to the passenger CSV file.
    #[arg(
        long = "csv-path",
        value_name = "PATH",
        env = "TITANIC_CSV_PATH",
        default_value = DEFAULT_CSV_PATH,
        global = true
    )]
    pub csv_path: PathBuf,

    /// Path to the SQLite database file.
    #[arg(
        long = "db-path",
        value_name = "PATH",
        env = "TITANIC_DB_PATH",
        default_value = DEFAULT_DB_PATH,
        global = true
    )]
    pub db_path: PathBuf,
}

impl StoreArgs {
    /// The explicit backend wins; otherwise `USE_SQLITE` picks SQLite and
    /// CSV is the default.
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        let backend = self.backend.unwrap_or(if self.use_sqlite {
            BackendArg::Sqlite
        } else {
            BackendArg::Csv
        });
        match backend {
            BackendArg::Csv => StoreConfig::Csv {
                path: self.csv_path.clone(),
            },
            BackendArg::Sqlite => StoreConfig::Sqlite {
                path: self.db_path.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(backend: Option<BackendArg>, use_sqlite: bool) -> StoreArgs {
        StoreArgs {
            backend,
            use_sqlite,
            csv_path: PathBuf::from("a.csv"),
            db_path: PathBuf::from("a.db"),
        }
    }

    #[test]
    fn defaults_to_csv() {
        assert_eq!(
            args(None, false).store_config(),
            StoreConfig::Csv {
                path: PathBuf::from("a.csv")
            }
        );
    }

    #[test]
    fn use_sqlite_selects_database() {
        assert_eq!(
            args(None, true).store_config(),
            StoreConfig::Sqlite {
                path: PathBuf::from("a.db")
            }
        );
    }

    #[test]
    fn explicit_backend_overrides_toggle() {
        assert!(matches!(
            args(Some(BackendArg::Csv), true).store_config(),
            StoreConfig::Csv { .. }
        ));
        assert!(matches!(
            args(Some(BackendArg::Sqlite), false).store_config(),
            StoreConfig::Sqlite { .. }
        ));
    }
}
