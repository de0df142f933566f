//! Integration tests for the flat-file backend.

mod common;

use titanic_model::{Field, Projection};
use titanic_store::{Backend, BackendError, CsvStore, PassengerStore, StoreError};

use common::{create_temp_csv, sample_csv_path};

const BRAUND: &str = "1,0,3,\"Braund, Mr. Owen Harris\",male,22,1,0,A/5 21171,7.25,,S";
const CUMINGS: &str = "2,1,1,\"Cumings, Mrs. John Bradley (Florence Briggs Thayer)\",female,38,1,0,PC 17599,71.2833,C85,C";
const MORAN: &str = "6,0,3,\"Moran, Mr. James\",male,,0,0,330877,8.4583,,Q";
const SHORT_ROW: &str = "4,1,1,\"Futrelle, Mrs. Jacques Heath (Lily May Peel)\",female,35,1,0,113803,53.1,C123";

#[test]
fn list_returns_rows_in_source_order_with_typed_fields() {
    let file = create_temp_csv(&[MORAN, BRAUND, CUMINGS]);
    let store = CsvStore::new(file.path());
    let passengers = store.list().expect("list");

    let ids: Vec<i64> = passengers.iter().map(|p| p.passenger_id).collect();
    assert_eq!(ids, vec![6, 1, 2]);

    let cumings = &passengers[2];
    assert_eq!(cumings.survived, 1);
    assert_eq!(cumings.pclass, 1);
    assert_eq!(cumings.sib_sp, 1);
    assert!((cumings.age - 38.0).abs() < f64::EPSILON);
    assert!((cumings.fare - 71.2833).abs() < 1e-9);
    assert_eq!(cumings.cabin, "C85");
    assert_eq!(store.backend(), Backend::Csv);
}

#[test]
fn empty_age_reads_as_zero() {
    let file = create_temp_csv(&[MORAN]);
    let store = CsvStore::new(file.path());
    let moran = store.get(6).expect("get");
    assert_eq!(moran.age, 0.0);
    assert_eq!(moran.cabin, "");
    assert_eq!(moran.embarked, "Q");
}

#[test]
fn get_finds_matching_id() {
    let store = CsvStore::new(sample_csv_path());
    let passenger = store.get(7).expect("get 7");
    assert_eq!(passenger.passenger_id, 7);
    assert_eq!(passenger.name, "McCarthy, Mr. Timothy J");
    assert_eq!(passenger.cabin, "E46");
}

#[test]
fn get_missing_id_is_not_found() {
    let store = CsvStore::new(sample_csv_path());
    let err = store.get(9999).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { id: 9999 }));
}

#[test]
fn short_row_fails_list_without_partial_results() {
    let file = create_temp_csv(&[BRAUND, SHORT_ROW, CUMINGS]);
    let store = CsvStore::new(file.path());
    let err = store.list().unwrap_err();
    assert!(matches!(err, StoreError::Parse { line: 3, .. }), "{err}");
}

#[test]
fn short_row_fails_scans_that_reach_it() {
    let file = create_temp_csv(&[BRAUND, SHORT_ROW, CUMINGS]);
    let store = CsvStore::new(file.path());

    // Stops before the malformed row.
    assert_eq!(store.get(1).expect("get 1").passenger_id, 1);

    assert!(matches!(store.get(2), Err(StoreError::Parse { .. })));
    let names = vec!["Name".to_string()];
    assert!(matches!(
        store.get_projected(2, &names),
        Err(StoreError::Parse { .. })
    ));
    assert!(matches!(store.fares(), Err(StoreError::Parse { .. })));
}

#[test]
fn unparseable_number_fails_list() {
    let file = create_temp_csv(&["1,0,three,\"Braund, Mr. Owen Harris\",male,22,1,0,A/5 21171,7.25,,S"]);
    let store = CsvStore::new(file.path());
    let err = store.list().unwrap_err();
    match err {
        StoreError::Parse { line, message } => {
            assert_eq!(line, 2);
            assert!(message.contains("Pclass"), "{message}");
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn projection_populates_only_requested_fields() {
    let store = CsvStore::new(sample_csv_path());
    let names = vec!["Name".to_string(), "Fare".to_string(), "Embarked".to_string()];
    let passenger = store.get_projected(2, &names).expect("project");

    assert_eq!(
        passenger.name,
        "Cumings, Mrs. John Bradley (Florence Briggs Thayer)"
    );
    assert!((passenger.fare - 71.2833).abs() < 1e-9);
    assert_eq!(passenger.embarked, "C");
    assert_eq!(passenger.passenger_id, 0);
    assert_eq!(passenger.survived, 0);
    assert_eq!(passenger.sex, "");
    assert_eq!(passenger.cabin, "");
    assert_eq!(passenger.age, 0.0);
}

#[test]
fn projection_rejects_unknown_attribute() {
    let store = CsvStore::new(sample_csv_path());
    let names = vec!["Name".to_string(), "Lifeboat".to_string()];
    let err = store.get_projected(1, &names).unwrap_err();
    assert!(matches!(err, StoreError::UnknownAttribute { ref name } if name == "Lifeboat"));
}

#[test]
fn projection_rejects_empty_attribute_list() {
    let store = CsvStore::new(sample_csv_path());
    let err = store.get_projected(1, &[]).unwrap_err();
    assert!(matches!(err, StoreError::EmptyProjection));
}

#[test]
fn projection_reports_type_conversion_for_requested_field() {
    let file = create_temp_csv(&["1,0,3,\"Braund, Mr. Owen Harris\",male,twenty,1,0,A/5 21171,7.25,,S"]);
    let store = CsvStore::new(file.path());

    // Fields that convert cleanly are unaffected by the bad age.
    let ok = store
        .project(1, &Projection::parse(["Name"]).unwrap())
        .expect("project name");
    assert_eq!(ok.name, "Braund, Mr. Owen Harris");

    let err = store
        .project(1, &Projection::parse(["Age"]).unwrap())
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::TypeConversion {
            field: Field::Age,
            ..
        }
    ));
}

#[test]
fn missing_file_is_backend_error() {
    let store = CsvStore::new("/definitely/not/here.csv");
    let err = store.list().unwrap_err();
    assert!(matches!(err, StoreError::Backend(BackendError::Io { .. })));
}

#[test]
fn header_only_file_has_no_fares() {
    let file = create_temp_csv(&[]);
    let store = CsvStore::new(file.path());
    assert!(store.list().expect("list").is_empty());
    assert!(matches!(store.fare_histogram(), Err(StoreError::EmptyDataset)));
}
