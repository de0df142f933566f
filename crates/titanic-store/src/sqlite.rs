//! Relational backend over a SQLite `titanic` table.
//!
//! The table has one row per passenger and one column per canonical field,
//! named identically; `Age`, `Cabin` and `Embarked` are nullable. Column
//! lists in generated SQL are built only from canonical field names, and
//! the passenger id is always a bound parameter.

use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, TryLockError};

use rusqlite::{Connection, OpenFlags, Row, params};
use titanic_model::{Field, FieldKind, FieldValue, Passenger, Projection};
use tracing::{debug, debug_span};

use crate::error::{BackendError, Result, StoreError};
use crate::store::{Backend, PassengerStore};

/// Name of the passenger table.
pub const TABLE_NAME: &str = "titanic";

/// Read connections opened by `SqliteStore::open`.
const READ_POOL_SIZE: usize = 4;

/// Read-only access to the `titanic` table.
///
/// Queries are spread round-robin over a pool of connections, and a call
/// never waits on a connection another call is using: when every pooled
/// connection is busy, a file-backed store opens a dedicated connection for
/// the call. A store built with [`SqliteStore::new`] has no path to reopen
/// and shares its single connection.
pub struct SqliteStore {
    path: Option<PathBuf>,
    read_connections: Vec<Mutex<Connection>>,
    read_cursor: AtomicUsize,
}

/// A pooled connection held for one call, or one opened just for it.
enum ReadConnection<'a> {
    Pooled(MutexGuard<'a, Connection>),
    Dedicated(Connection),
}

impl Deref for ReadConnection<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        match self {
            Self::Pooled(guard) => guard,
            Self::Dedicated(conn) => conn,
        }
    }
}

impl SqliteStore {
    /// Wraps an already open connection as a pool of one.
    pub fn new(conn: Connection) -> Self {
        Self {
            path: None,
            read_connections: vec![Mutex::new(conn)],
            read_cursor: AtomicUsize::new(0),
        }
    }

    /// Opens a pool of read-only connections to the database file.
    pub fn open(path: &Path) -> Result<Self> {
        let mut read_connections = Vec::with_capacity(READ_POOL_SIZE);
        for _ in 0..READ_POOL_SIZE {
            read_connections.push(Mutex::new(open_read_only(path)?));
        }
        Ok(Self {
            path: Some(path.to_path_buf()),
            read_connections,
            read_cursor: AtomicUsize::new(0),
        })
    }

    /// Next free pooled connection, starting from the round-robin cursor.
    fn connection(&self) -> Result<ReadConnection<'_>> {
        let len = self.read_connections.len();
        let start = self.read_cursor.fetch_add(1, Ordering::Relaxed) % len;
        for offset in 0..len {
            match self.read_connections[(start + offset) % len].try_lock() {
                Ok(guard) => return Ok(ReadConnection::Pooled(guard)),
                Err(TryLockError::WouldBlock) => {}
                Err(TryLockError::Poisoned(_)) => {
                    return Err(StoreError::Backend(BackendError::LockPoisoned));
                }
            }
        }
        match &self.path {
            Some(path) => {
                debug!(pool = len, "read pool busy; opening dedicated connection");
                Ok(ReadConnection::Dedicated(open_read_only(path)?))
            }
            None => self.read_connections[start]
                .lock()
                .map(ReadConnection::Pooled)
                .map_err(|_| StoreError::Backend(BackendError::LockPoisoned)),
        }
    }

    fn fetch_one(&self, id: i64, projection: &Projection) -> Result<Passenger> {
        let sql = format!("{} WHERE \"PassengerId\" = ?1", select_sql(projection));
        let conn = self.connection()?;
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params![id])?;
        match rows.next()? {
            Some(row) => read_passenger(row, projection),
            None => Err(StoreError::NotFound { id }),
        }
    }
}

fn open_read_only(path: &Path) -> Result<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    Ok(conn)
}

impl PassengerStore for SqliteStore {
    fn backend(&self) -> Backend {
        Backend::Sqlite
    }

    fn list(&self) -> Result<Vec<Passenger>> {
        let span = debug_span!("sqlite_list");
        let _guard = span.enter();
        let projection = Projection::all();
        let sql = format!("{} ORDER BY \"PassengerId\"", select_sql(&projection));
        let conn = self.connection()?;
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut passengers = Vec::new();
        while let Some(row) = rows.next()? {
            passengers.push(read_passenger(row, &projection)?);
        }
        debug!(rows = passengers.len(), "loaded passengers");
        Ok(passengers)
    }

    fn get(&self, id: i64) -> Result<Passenger> {
        let span = debug_span!("sqlite_get", id);
        let _guard = span.enter();
        self.fetch_one(id, &Projection::all())
    }

    fn project(&self, id: i64, projection: &Projection) -> Result<Passenger> {
        let span = debug_span!("sqlite_project", id, fields = %projection);
        let _guard = span.enter();
        self.fetch_one(id, projection)
    }

    fn fares(&self) -> Result<Vec<f64>> {
        let span = debug_span!("sqlite_fares");
        let _guard = span.enter();
        let sql = format!("SELECT \"Fare\" FROM {TABLE_NAME} ORDER BY \"PassengerId\"");
        let conn = self.connection()?;
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut fares = Vec::new();
        while let Some(row) = rows.next()? {
            match read_value(row, 0, Field::Fare)? {
                FieldValue::Float(fare) => fares.push(fare),
                other => {
                    return Err(StoreError::TypeConversion {
                        field: Field::Fare,
                        value: other.to_string(),
                        expected: FieldKind::Float,
                    });
                }
            }
        }
        debug!(rows = fares.len(), "extracted fares");
        Ok(fares)
    }
}

/// `SELECT` over exactly the projected columns, quoted, in projection order.
fn select_sql(projection: &Projection) -> String {
    let columns = projection
        .fields()
        .iter()
        .map(|field| format!("\"{}\"", field.name()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("SELECT {columns} FROM {TABLE_NAME}")
}

fn read_passenger(row: &Row<'_>, projection: &Projection) -> Result<Passenger> {
    let mut passenger = Passenger::default();
    for (idx, &field) in projection.fields().iter().enumerate() {
        let value = read_value(row, idx, field)?;
        passenger.set(field, value)?;
    }
    Ok(passenger)
}

/// Reads one column as its field's declared type. NULL is the zero-value
/// for nullable fields and a conversion error for the rest.
fn read_value(row: &Row<'_>, idx: usize, field: Field) -> Result<FieldValue> {
    let kind = field.kind();
    let value = match kind {
        FieldKind::Integer => row
            .get::<_, Option<i64>>(idx)
            .map(|value| value.map(FieldValue::Integer)),
        FieldKind::Float => row
            .get::<_, Option<f64>>(idx)
            .map(|value| value.map(FieldValue::Float)),
        FieldKind::Text => row
            .get::<_, Option<String>>(idx)
            .map(|value| value.map(FieldValue::Text)),
    };
    let conversion_error = |value: String| StoreError::TypeConversion {
        field,
        value,
        expected: kind,
    };
    match value {
        Ok(Some(value)) => Ok(value),
        Ok(None) if field.is_nullable() => Ok(FieldValue::zero(kind)),
        Ok(None) => Err(conversion_error("NULL".to_string())),
        Err(rusqlite::Error::InvalidColumnType(_, _, stored)) => {
            Err(conversion_error(format!("<{stored}>")))
        }
        Err(rusqlite::Error::FromSqlConversionFailure(_, stored, _)) => {
            Err(conversion_error(format!("<{stored}>")))
        }
        Err(rusqlite::Error::IntegralValueOutOfRange(_, stored)) => {
            Err(conversion_error(stored.to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn database_file() -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        let conn = Connection::open(file.path()).unwrap();
        conn.execute_batch(
            "CREATE TABLE titanic (
                PassengerID INTEGER PRIMARY KEY, Survived INTEGER, Pclass INTEGER,
                Name TEXT, Sex TEXT, Age REAL, SibSp INTEGER, Parch INTEGER,
                Ticket TEXT, Fare REAL, Cabin TEXT, Embarked TEXT
            );
            INSERT INTO titanic VALUES
                (1, 0, 3, 'Braund, Mr. Owen Harris', 'male', 22.0, 1, 0, 'A/5 21171', 7.25, NULL, 'S');",
        )
        .unwrap();
        file
    }

    #[test]
    fn open_fills_read_pool() {
        let file = database_file();
        let store = SqliteStore::open(file.path()).unwrap();
        assert_eq!(store.read_connections.len(), READ_POOL_SIZE);
    }

    #[test]
    fn get_does_not_wait_for_busy_connections() {
        let file = database_file();
        let store = SqliteStore::open(file.path()).unwrap();
        let _in_use: Vec<_> = store
            .read_connections
            .iter()
            .map(|conn| conn.lock().unwrap())
            .collect();

        let passenger = store.get(1).expect("get while pool is busy");
        assert_eq!(passenger.name, "Braund, Mr. Owen Harris");
        assert_eq!(store.list().expect("list while pool is busy").len(), 1);
    }

    #[test]
    fn connection_skips_busy_slot() {
        let file = database_file();
        let store = SqliteStore::open(file.path()).unwrap();
        let _first = store.read_connections[0].lock().unwrap();
        assert!(matches!(
            store.connection().unwrap(),
            ReadConnection::Pooled(_)
        ));
    }

    #[test]
    fn select_sql_quotes_canonical_names() {
        let projection = Projection::parse(["PassengerID", "Name"]).unwrap();
        assert_eq!(
            select_sql(&projection),
            "SELECT \"PassengerId\", \"Name\" FROM titanic"
        );
    }

    #[test]
    fn select_sql_all_fields_in_column_order() {
        let sql = select_sql(&Projection::all());
        assert!(sql.starts_with("SELECT \"PassengerId\", \"Survived\", \"Pclass\""));
        assert!(sql.ends_with("\"Cabin\", \"Embarked\" FROM titanic"));
    }
}
