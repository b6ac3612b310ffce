use std::fs;
use std::path::PathBuf;

use serde_json::Value;

use reefscout::config::ScoutConfig;
use reefscout::store::{RecordFileName, RecordStore};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn store_in(dir: &tempfile::TempDir) -> RecordStore {
    let mut cfg = ScoutConfig::rooted_at(dir.path());
    cfg.parallelism = 2;
    RecordStore::new(&cfg)
}

fn fixture_value(name: &str) -> Value {
    serde_json::from_str(&read_fixture(name)).expect("fixture should parse")
}

#[test]
fn ingest_writes_raw_and_processed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir);
    let saved = store
        .ingest(fixture_value("qualification_12_team_6907.json"))
        .expect("ingest should succeed");

    let name = RecordFileName::parse(&saved.file_name).expect("generated name should parse");
    assert_eq!(name.event_code, "CNSH");
    assert_eq!(name.team_no, 6907);
    assert_eq!(name.tournament_level, "Qualification");
    assert_eq!(name.match_no, 12);

    let raw: Value = serde_json::from_str(
        &fs::read_to_string(store.raw_dir().join(&saved.file_name)).expect("raw file"),
    )
    .expect("raw json");
    assert_eq!(raw["filename"], Value::String(saved.file_name.clone()));
    assert_eq!(raw["serverReceivedTimestamp"], Value::String(saved.received_at.clone()));

    let loaded = store.load_all_match_statistics().expect("load");
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].file_name, saved.file_name);
    assert_eq!(loaded[0].timestamp, name.timestamp);
    assert_eq!(loaded[0].score_coral.cycle_times, vec![4.0, 8.0, 10.0, 14.0]);
    assert!(store.pending().expect("pending").is_empty());
}

#[test]
fn ingest_rejects_missing_header_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir);
    let err = store
        .ingest(serde_json::json!({ "teamNo": 1, "action": [] }))
        .expect_err("missing fields must fail");
    assert!(err.to_string().contains("matchNumber"));
}

#[test]
fn process_pending_isolates_bad_records() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir);
    store.ensure_dirs().expect("dirs");

    let good = "match_record_CNSH_6907_Qualification_12_1000.json";
    let bad = "match_record_CNSH_254_Practice_3_2000.json";
    fs::write(store.raw_dir().join(good), read_fixture("qualification_12_team_6907.json")).expect("write");
    fs::write(store.raw_dir().join(bad), read_fixture("unknown_action_type.json")).expect("write");

    let summary = store.process_pending().expect("process");
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.errors.len(), 1);
    assert!(summary.errors[0].starts_with(bad));

    assert_eq!(store.pending().expect("pending"), vec![bad.to_string()]);
    let loaded = store.load_all_match_statistics().expect("load");
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].timestamp, 1000);
}

#[test]
fn unreadable_processed_files_are_skipped() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir);
    store.ensure_dirs().expect("dirs");
    fs::write(store.processed_dir().join("match_record_E_1_Practice_1_5.json"), "{ not json").expect("write");
    fs::write(store.processed_dir().join("match_record_E_2_Practice_1_6.json"), "{\"team_no\": 2}").expect("write");

    let loaded = store.load_all_match_statistics().expect("load");
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].team_no, 2);
    assert_eq!(loaded[0].timestamp, 6);
}

#[test]
fn records_list_by_level_match_and_time() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir);
    store.ensure_dirs().expect("dirs");
    let names = [
        "match_record_E_1_Playoff_1_10.json",
        "match_record_E_1_Qualification_2_30.json",
        "match_record_E_1_Qualification_2_20.json",
        "match_record_E_1_Practice_9_40.json",
        "match_record_E_1_Scrimmage_5_50.json",
    ];
    for name in names {
        fs::write(store.raw_dir().join(name), "{}").expect("write");
        fs::write(store.processed_dir().join(name), "{}").expect("write");
    }
    fs::write(store.raw_dir().join("match_record_E_1_Practice_1_1.json"), "{}").expect("write");

    let listed: Vec<String> = store
        .list_records()
        .expect("list")
        .iter()
        .map(RecordFileName::file_name)
        .collect();
    assert_eq!(
        listed,
        vec![
            "match_record_E_1_Scrimmage_5_50.json",
            "match_record_E_1_Practice_9_40.json",
            "match_record_E_1_Qualification_2_20.json",
            "match_record_E_1_Qualification_2_30.json",
            "match_record_E_1_Playoff_1_10.json",
        ]
    );
}

fn files_under(dir: &std::path::Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).expect("read dir") {
        let path = entry.expect("entry").path();
        if path.is_dir() {
            out.extend(files_under(&path));
        } else {
            out.push(path);
        }
    }
    out
}

#[test]
fn header_text_cannot_leave_the_raw_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir);
    let uploads = [
        serde_json::json!({
            "eventCode": "x/../../../escaped",
            "teamNo": 1,
            "matchNumber": 2,
            "tournamentLevel": "Practice",
            "action": []
        }),
        serde_json::json!({
            "eventCode": "CNSH",
            "teamNo": 1,
            "matchNumber": 2,
            "tournamentLevel": "..\\Practice",
            "action": []
        }),
    ];
    for upload in uploads {
        let err = store.save_raw_record(upload).expect_err("unsafe header must fail");
        assert!(err.to_string().contains("file name"), "{err:#}");
    }

    let written = files_under(dir.path());
    assert!(written.is_empty(), "unexpected files: {written:?}");
}

#[test]
fn unreadable_header_numbers_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = store_in(&dir);
    let err = store
        .ingest(serde_json::json!({
            "eventCode": "CNSH",
            "teamNo": "abc",
            "matchNumber": 3,
            "tournamentLevel": "Qualification",
            "action": []
        }))
        .expect_err("non-numeric team must fail");
    assert!(format!("{err:#}").contains("teamNo"));

    let err = store
        .ingest(serde_json::json!({
            "eventCode": "CNSH",
            "teamNo": 254,
            "matchNumber": -1,
            "action": []
        }))
        .expect_err("negative match number must fail");
    assert!(format!("{err:#}").contains("matchNumber"));
    assert!(!store.raw_dir().exists() || files_under(store.raw_dir()).is_empty());
}
