use reefscout::ranking::{Direction, metric_by_name, rank_teams, ranked_metrics};
use reefscout::report::{ranking_tables, select_teams};
use reefscout::team_stats::{RankValue, RankValueMatch, TeamStatistics};

fn team(team_no: u32) -> TeamStatistics {
    TeamStatistics::new(team_no)
}

#[test]
fn bps_ranks_descending() {
    let mut teams = vec![team(1), team(2), team(3)];
    for (t, v) in teams.iter_mut().zip([0.5, 0.8, 0.2]) {
        t.bps_value = RankValue::new(v);
    }
    rank_teams(&mut teams);
    let ranks: Vec<i32> = teams.iter().map(|t| t.bps_value.rank).collect();
    assert_eq!(ranks, vec![2, 1, 3]);
}

#[test]
fn lower_is_better_ranks_ascending() {
    let mut teams = vec![team(1), team(2), team(3)];
    for (t, v) in teams.iter_mut().zip([140.0, 150.0, 132.0]) {
        t.climb_park_time_median = RankValue::new(v);
    }
    rank_teams(&mut teams);
    let ranks: Vec<i32> = teams.iter().map(|t| t.climb_park_time_median.rank).collect();
    assert_eq!(ranks, vec![2, 3, 1]);
}

#[test]
fn ties_take_distinct_ranks_in_team_order() {
    let mut teams = vec![team(10), team(20), team(30)];
    teams[0].epa_value = RankValue::new(4.0);
    teams[1].epa_value = RankValue::new(9.0);
    teams[2].epa_value = RankValue::new(9.0);
    rank_teams(&mut teams);
    let ranks: Vec<i32> = teams.iter().map(|t| t.epa_value.rank).collect();
    assert_eq!(ranks, vec![3, 1, 2]);
}

#[test]
fn every_metric_gets_a_full_rank_permutation() {
    let mut teams: Vec<TeamStatistics> = (1..=4).map(team).collect();
    rank_teams(&mut teams);
    for metric in ranked_metrics() {
        let mut ranks: Vec<i32> = teams.iter().map(|t| (metric.rank)(t)).collect();
        ranks.sort();
        assert_eq!(ranks, vec![1, 2, 3, 4], "metric {}", metric.name);
    }
}

#[test]
fn unlisted_preferences_default_to_higher_better() {
    for name in [
        "processor_success_max_single_match",
        "coral_source_station_percentage",
        "coral_source_ground_percentage",
        "algae_success_cycle_count_max",
        "coral_defended_max_single_match",
        "defended_success_coral_cycle_time_max",
    ] {
        let metric = metric_by_name(name).expect("metric should exist");
        assert_eq!(metric.direction, Direction::HigherBetter, "{name}");
    }
}

#[test]
fn selection_keeps_full_scope_ranks() {
    let mut teams = vec![team(1), team(2), team(3)];
    for (t, v) in teams.iter_mut().zip([0.5, 0.8, 0.2]) {
        t.bps_value = RankValue::new(v);
    }
    rank_teams(&mut teams);
    let picked = select_teams(teams, &[3]);
    assert_eq!(picked.len(), 1);
    assert_eq!(picked[0].bps_value.rank, 3);
}

#[test]
fn ranking_table_carries_origin_match() {
    let mut teams = vec![team(1), team(2)];
    teams[0].ppg_max_single_match = RankValueMatch {
        value: 30.0,
        match_no: 7,
        tournament_level: "Qualification".to_string(),
        ..RankValueMatch::default()
    };
    teams[1].ppg_max_single_match = RankValueMatch {
        value: 42.0,
        match_no: 2,
        tournament_level: "Playoff".to_string(),
        ..RankValueMatch::default()
    };
    rank_teams(&mut teams);

    let tables = ranking_tables(&teams, &["ppg_max_single_match".to_string()]);
    let rows = &tables["ppg_max_single_match"];
    assert_eq!(rows[0].team_no, 2);
    assert_eq!(rows[0].rank, 1);
    assert_eq!(rows[0].match_no, Some(2));
    assert_eq!(rows[0].tournament_level.as_deref(), Some("Playoff"));
    assert_eq!(rows[1].team_no, 1);
}
