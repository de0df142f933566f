//! Shared fixtures for storage integration tests.
#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;

use rusqlite::{Connection, params};
use tempfile::NamedTempFile;
use titanic_model::Passenger;
use titanic_store::{CsvStore, PassengerStore, SqliteStore};

pub const HEADER: &str =
    "PassengerId,Survived,Pclass,Name,Sex,Age,SibSp,Parch,Ticket,Fare,Cabin,Embarked";

pub const SCHEMA: &str = "CREATE TABLE titanic (
    PassengerID INTEGER PRIMARY KEY,
    Survived INTEGER,
    Pclass INTEGER,
    Name TEXT,
    Sex TEXT,
    Age REAL,
    SibSp INTEGER,
    Parch INTEGER,
    Ticket TEXT,
    Fare REAL,
    Cabin TEXT,
    Embarked TEXT
)";

/// The ten-row sample manifest shipped in `datastore/`.
pub fn sample_csv_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../datastore/titanic.csv")
}

/// Writes a CSV with the canonical header followed by `rows`.
pub fn create_temp_csv(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp csv");
    writeln!(file, "{HEADER}").expect("write header");
    for row in rows {
        writeln!(file, "{row}").expect("write row");
    }
    file
}

/// Empty `titanic` table in an in-memory database.
pub fn empty_database() -> Connection {
    let conn = Connection::open_in_memory().expect("open in-memory db");
    conn.execute_batch(SCHEMA).expect("create table");
    conn
}

/// On-disk database holding `passengers`.
pub fn database_file(passengers: &[Passenger]) -> NamedTempFile {
    let file = NamedTempFile::new().expect("create temp db");
    let conn = Connection::open(file.path()).expect("open temp db");
    conn.execute_batch(SCHEMA).expect("create table");
    conn.execute_batch("BEGIN").expect("begin");
    insert_passengers(&conn, passengers);
    conn.execute_batch("COMMIT").expect("commit");
    file
}

/// Inserts passengers, storing zero-valued nullable fields as NULL.
pub fn insert_passengers(conn: &Connection, passengers: &[Passenger]) {
    let mut stmt = conn
        .prepare("INSERT INTO titanic VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)")
        .expect("prepare insert");
    for p in passengers {
        let age = (p.age != 0.0).then_some(p.age);
        let cabin = (!p.cabin.is_empty()).then_some(p.cabin.as_str());
        let embarked = (!p.embarked.is_empty()).then_some(p.embarked.as_str());
        stmt.execute(params![
            p.passenger_id,
            p.survived,
            p.pclass,
            p.name,
            p.sex,
            age,
            p.sib_sp,
            p.parch,
            p.ticket,
            p.fare,
            cabin,
            embarked,
        ])
        .expect("insert passenger");
    }
}

/// Both backends loaded with the sample manifest.
pub fn sample_stores() -> (CsvStore, SqliteStore) {
    let csv = CsvStore::new(sample_csv_path());
    let passengers = csv.list().expect("list sample csv");
    let conn = empty_database();
    insert_passengers(&conn, &passengers);
    (csv, SqliteStore::new(conn))
}
