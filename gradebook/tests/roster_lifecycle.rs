//! Library-level lifecycle tests: mutate a roster, checkpoint it to disk,
//! reload it, and swap catalogs under both orphan policies.

use std::fs;
use std::path::PathBuf;

use gradebook::io::codec::{decode, encode};
use gradebook::io::roster_store::{load_catalog, load_snapshot};
use gradebook::test_support::{TestDir, sample_roster};
use gradebook::{OrphanPolicy, Roster, RosterError, StoreError, load_roster, save_roster};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Record → duplicate → alter → save → load keeps the altered grade.
#[test]
fn grades_survive_checkpoint() {
    let dir = TestDir::new().expect("test dir");
    let mut roster = sample_roster();

    roster.record_grade(2, 1, 70.0).expect("record");
    assert!(matches!(
        roster.record_grade(2, 1, 75.0),
        Err(RosterError::DuplicateGrade { .. })
    ));
    roster.alter_grade(2, 1, 75.0).expect("alter");

    save_roster(&dir.data_path, &roster).expect("save");
    let loaded = load_roster(&dir.data_path, OrphanPolicy::Strict).expect("load");
    assert_eq!(loaded, roster);

    let report = loaded.query(2).expect("query");
    assert_eq!(report.lines[0].score, 75.0);
    assert_eq!(report.weighted_average, Some(75.0));
}

#[test]
fn legacy_document_loads_with_integer_keys() {
    let roster = load_roster(&fixture("student_data.json"), OrphanPolicy::Strict).expect("load");

    assert_eq!(roster.len(), 2);
    let ids: Vec<u32> = roster.list_courses().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2, 10]);

    let avg = roster.weighted_average(2023001).expect("average");
    assert!((avg - (80.0 * 2.0 + 90.0) / 3.0).abs() < 1e-9);
    assert_eq!(roster.weighted_average(2023002), Err(RosterError::NoGrades));
}

#[test]
fn encode_decode_round_trip_from_fixture() {
    let snapshot = load_snapshot(&fixture("student_data.json")).expect("load");
    let decoded = decode(&encode(&snapshot).expect("encode")).expect("decode");
    assert_eq!(decoded, snapshot);
}

#[test]
fn smaller_catalog_orphans_grades_under_lenient_policy() {
    let mut roster =
        load_roster(&fixture("student_data.json"), OrphanPolicy::Lenient).expect("load");
    let catalog = load_catalog(&fixture("small_catalog.json")).expect("catalog");

    let before = roster.clone();
    let err = roster
        .replace_catalog(catalog.clone(), OrphanPolicy::Strict)
        .expect_err("strict rejects orphans");
    assert!(matches!(err, RosterError::InconsistentSnapshot(ref f) if f.iter().any(|x| x.contains("unknown course 10"))));
    assert_eq!(roster, before);

    roster
        .replace_catalog(catalog, OrphanPolicy::Lenient)
        .expect("lenient accepts");
    let report = roster.query(2023001).expect("query");
    assert_eq!(report.orphaned().count(), 1);
    assert_eq!(report.weighted_average, Some(80.0));
}

#[test]
fn malformed_file_is_reported_as_malformed_data() {
    let dir = TestDir::new().expect("test dir");
    fs::write(
        &dir.data_path,
        r#"{"courses": {"1": {"course_id": 1, "name": "A", "credit": 1}},
            "students": [{"student_id": 1, "name": "Ada", "courses": {"first": 90}}]}"#,
    )
    .expect("write fixture");

    let err = load_roster(&dir.data_path, OrphanPolicy::Lenient).expect_err("malformed");
    assert!(matches!(err, StoreError::MalformedData { .. }));
    assert_eq!(err.kind(), "MalformedData");
}

#[test]
fn empty_roster_round_trips() {
    let dir = TestDir::new().expect("test dir");
    let roster = Roster::default();
    dir.seed(&roster).expect("seed");
    assert_eq!(dir.load(OrphanPolicy::Strict).expect("load"), roster);

    let text = fs::read_to_string(&dir.data_path).expect("read");
    assert_eq!(text, "{\n  \"courses\": {},\n  \"students\": []\n}\n");
}

/// Values outside the data model never reach the roster, even when the
/// lenient policy trusts everything else in the file.
#[test]
fn lenient_load_still_rejects_out_of_model_values() {
    let dir = TestDir::new().expect("test dir");
    let documents = [
        r#"{"courses": {"1": {"course_id": 1, "name": "A", "credit": 3},
                        "2": {"course_id": 2, "name": "B", "credit": -1}},
            "students": [{"student_id": 1, "name": "Ada", "courses": {"1": 100, "2": 70}}]}"#,
        r#"{"courses": {"1": {"course_id": 1, "name": "A", "credit": 1}},
            "students": [{"student_id": 1, "name": "Ada", "courses": {"1": 150}}]}"#,
        r#"{"courses": {"1": {"course_id": 1, "name": "A", "credit": 1}},
            "students": [{"student_id": 1, "name": "Ada", "courses": {"0": 10}}]}"#,
    ];

    for document in documents {
        fs::write(&dir.data_path, document).expect("write fixture");
        let err = load_roster(&dir.data_path, OrphanPolicy::Lenient).expect_err("malformed");
        assert!(
            matches!(err, StoreError::MalformedData { .. }),
            "expected MalformedData for {document}, got {err:?}"
        );
    }
}
