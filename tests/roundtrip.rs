use std::fs;
use std::path::PathBuf;

use serde_json::json;

use reefscout::action::{ClimbStatus, MatchRecord};
use reefscout::index_set::IndexSet;
use reefscout::match_builder::build_match_statistics;
use reefscout::match_stats::MatchStatistics;
use reefscout::team_stats::TeamStatistics;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn match_statistics_survive_json() {
    let record = MatchRecord::from_json_str(&read_fixture("qualification_12_team_6907.json"))
        .expect("fixture should parse");
    let stats = build_match_statistics(&record).expect("fixture should build");
    let raw = serde_json::to_string(&stats).expect("serialize");
    let back: MatchStatistics = serde_json::from_str(&raw).expect("deserialize");
    assert_eq!(back, stats);
}

#[test]
fn index_sets_load_from_any_order() {
    let raw = json!({
        "team_no": 6907,
        "score_coral": {
            "cycle_times": [3.0, 1.5, 2.0],
            "successful_index": [2, 0, 2],
            "l1_index": [1]
        },
        "climb_up": { "time": 148000.0, "duration": 6.0, "status": "touch_chain" }
    });
    let stats: MatchStatistics = serde_json::from_value(raw).expect("deserialize");
    assert_eq!(stats.score_coral.cycle_times, vec![3.0, 1.5, 2.0]);
    assert_eq!(stats.score_coral.successful_index, IndexSet::from([0, 2]));
    assert_eq!(stats.score_coral.l1_index, IndexSet::from([1]));
    assert!(stats.score_algae.cycle_times.is_empty());
    assert_eq!(stats.climb_up.status, ClimbStatus::TouchChain);

    let out = serde_json::to_value(&stats).expect("serialize");
    assert_eq!(out["score_coral"]["successful_index"], json!([0, 2]));
}

#[test]
fn null_climb_status_loads_as_none() {
    let stats: MatchStatistics =
        serde_json::from_value(json!({ "climb_up": { "status": null } })).expect("deserialize");
    assert_eq!(stats.climb_up.status, ClimbStatus::None);
}

#[test]
fn legacy_last_second_key_is_accepted() {
    let raw = json!({
        "team_no": 254,
        "last_second_processer_matches": { "match_nos": [5], "tournament_levels": ["Playoff"] }
    });
    let team: TeamStatistics = serde_json::from_value(raw).expect("deserialize");
    assert_eq!(team.last_second_processor_matches.match_nos, vec![5]);

    let out = serde_json::to_value(&team).expect("serialize");
    assert!(out.get("last_second_processor_matches").is_some());
    assert_eq!(out["bps_value"]["rank"], json!(-1));
}
