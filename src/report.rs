use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::match_stats::MatchStatistics;
use crate::ranking::metric_by_name;
use crate::team_stats::{TeamStatistics, UNRANKED};

/// Request scope. Empty lists allow everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchFilter {
    pub tournament_levels: Vec<String>,
    pub match_nos: Vec<u32>,
}

impl MatchFilter {
    pub fn is_empty(&self) -> bool {
        self.tournament_levels.is_empty() && self.match_nos.is_empty()
    }

    /// True when the match falls outside the requested scope.
    pub fn excludes(&self, m: &MatchStatistics) -> bool {
        (!self.tournament_levels.is_empty() && !self.tournament_levels.contains(&m.tournament_level))
            || (!self.match_nos.is_empty() && !self.match_nos.contains(&m.match_no))
    }
}

/// Keep only the requested teams, in aggregation order. Ranks stay as they
/// were computed over the full scope. An empty request keeps everyone.
pub fn select_teams(teams: Vec<TeamStatistics>, team_nos: &[u32]) -> Vec<TeamStatistics> {
    if team_nos.is_empty() {
        return teams;
    }
    teams.into_iter().filter(|t| team_nos.contains(&t.team_no)).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRow {
    pub team_no: u32,
    pub value: f64,
    pub rank: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_no: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tournament_level: Option<String>,
}

/// One table per known ranked attribute, rows ordered by rank with unranked
/// teams last.
pub fn ranking_tables(teams: &[TeamStatistics], attributes: &[String]) -> BTreeMap<String, Vec<RankingRow>> {
    let mut out = BTreeMap::new();
    for attr in attributes {
        let Some(metric) = metric_by_name(attr) else {
            tracing::debug!(attribute = %attr, "no ranking for attribute");
            continue;
        };
        let mut rows: Vec<RankingRow> = teams
            .iter()
            .map(|t| {
                let origin = metric.origin.and_then(|f| f(t));
                RankingRow {
                    team_no: t.team_no,
                    value: (metric.value)(t),
                    rank: (metric.rank)(t),
                    match_no: origin.map(|(no, _)| no),
                    tournament_level: origin.map(|(_, level)| level.to_string()),
                }
            })
            .collect();
        rows.sort_by_key(|r| if r.rank == UNRANKED { i32::MAX } else { r.rank });
        out.insert(attr.clone(), rows);
    }
    out
}

pub fn available_teams(matches: &[MatchStatistics]) -> Vec<u32> {
    let set: BTreeSet<u32> = matches.iter().map(|m| m.team_no).collect();
    set.into_iter().collect()
}

pub fn available_tournament_levels(matches: &[MatchStatistics]) -> Vec<String> {
    let set: BTreeSet<&str> = matches.iter().map(|m| m.tournament_level.as_str()).collect();
    set.into_iter().map(str::to_string).collect()
}

/// Every metric key a `TeamStatistics` carries, sorted.
pub fn attribute_names() -> Vec<String> {
    match serde_json::to_value(TeamStatistics::default()) {
        Ok(serde_json::Value::Object(map)) => map.keys().filter(|k| *k != "team_no").cloned().collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team_stats::RankValue;

    fn played(level: &str, match_no: u32) -> MatchStatistics {
        MatchStatistics {
            tournament_level: level.to_string(),
            match_no,
            ..MatchStatistics::default()
        }
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let f = MatchFilter::default();
        assert!(!f.excludes(&played("Practice", 3)));
    }

    #[test]
    fn filter_requires_both_lists_to_match() {
        let f = MatchFilter {
            tournament_levels: vec!["Qualification".to_string()],
            match_nos: vec![1, 2],
        };
        assert!(!f.excludes(&played("Qualification", 2)));
        assert!(f.excludes(&played("Qualification", 3)));
        assert!(f.excludes(&played("Practice", 1)));
    }

    #[test]
    fn unranked_rows_sort_last() {
        let mut ranked = TeamStatistics::new(10);
        ranked.epa_value = RankValue { value: 4.0, rank: 1 };
        let unranked = TeamStatistics::new(20);
        let tables = ranking_tables(&[unranked, ranked], &["epa_value".to_string(), "nope".to_string()]);
        assert_eq!(tables.len(), 1);
        let rows = &tables["epa_value"];
        assert_eq!(rows[0].team_no, 10);
        assert_eq!(rows[1].rank, UNRANKED);
    }

    #[test]
    fn attribute_names_are_sorted_and_complete() {
        let names = attribute_names();
        assert!(names.windows(2).all(|w| w[0] < w[1]));
        assert!(names.iter().any(|n| n == "last_second_processor_matches"));
        assert!(!names.iter().any(|n| n == "team_no"));
    }
}
