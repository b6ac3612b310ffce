use serde::{Deserialize, Serialize};

use crate::match_stats::MatchStatistics;

/// Rank stays at this value until the ranking pass has run.
pub const UNRANKED: i32 = -1;

/// A metric value plus its rank across the teams of one request (1 = best).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankValue {
    pub value: f64,
    pub rank: i32,
}

impl Default for RankValue {
    fn default() -> Self {
        Self {
            value: 0.0,
            rank: UNRANKED,
        }
    }
}

impl RankValue {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }
}

/// A "best single match" metric: the value and the match it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankValueMatch {
    pub value: f64,
    pub rank: i32,
    pub match_no: u32,
    pub tournament_level: String,
}

impl Default for RankValueMatch {
    fn default() -> Self {
        Self {
            value: 0.0,
            rank: UNRANKED,
            match_no: 0,
            tournament_level: String::new(),
        }
    }
}

impl RankValueMatch {
    /// A value with no originating match.
    pub fn bare(value: f64) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    pub fn from_match(value: f64, m: &MatchStatistics) -> Self {
        Self {
            value,
            rank: UNRANKED,
            match_no: m.match_no,
            tournament_level: m.tournament_level.clone(),
        }
    }
}

/// Parallel lists of matches satisfying some condition, in match order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchList {
    pub match_nos: Vec<u32>,
    pub tournament_levels: Vec<String>,
}

impl MatchList {
    pub fn push(&mut self, m: &MatchStatistics) {
        self.match_nos.push(m.match_no);
        self.tournament_levels.push(m.tournament_level.clone());
    }

    pub fn len(&self) -> usize {
        self.match_nos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.match_nos.is_empty()
    }
}

/// One team's aggregate over the matches that survived the request filter.
///
/// Except for the climb, BPS/EPA/PPG and auto families, metrics only look at
/// teleop cycles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamStatistics {
    pub team_no: u32,

    // Teleop time split, as a share of the 135 s teleop period.
    pub cycle_teleop_coral_time_ratio: RankValue,
    pub cycle_teleop_algae_time_ratio: RankValue,
    pub cycle_teleop_defense_time_ratio: RankValue,
    pub cycle_teleop_give_up_time_ratio: RankValue,

    // Climb and processor.
    pub climb_success_matches: MatchList,
    pub climb_fail_matches: MatchList,
    pub climb_touch_chain_matches: MatchList,
    pub climb_success_percentage: RankValue,
    pub climb_success_cycle_time_min: RankValueMatch,
    pub climb_park_time_median: RankValue,
    pub processor_success_max_single_match: RankValueMatch,

    // Scoring proxies.
    pub bps_value: RankValue,
    pub epa_value: RankValue,
    pub ppg_avg: RankValue,
    pub ppg_max_single_match: RankValueMatch,

    // Auto.
    pub auto_line_cross_percentage: RankValue,
    pub auto_preload_coral_percentage: RankValue,
    pub auto_high_mid_coral_max: RankValueMatch,
    pub auto_high_mid_coral_success_rate: RankValue,
    pub auto_low_slot_coral_max: RankValueMatch,
    pub auto_low_slot_coral_success_rate: RankValue,
    pub auto_net_place_max: RankValueMatch,
    pub auto_algae_process_max: RankValueMatch,

    // Teleop coral.
    pub coral_source_station_percentage: RankValue,
    pub coral_source_ground_percentage: RankValue,
    pub l1_teleop_success_count_avg: RankValue,
    pub l1_teleop_success_percentage: RankValue,
    pub l2_teleop_success_count_avg: RankValue,
    pub l2_teleop_success_percentage: RankValue,
    pub l3_teleop_success_count_avg: RankValue,
    pub l3_teleop_success_percentage: RankValue,
    pub l4_teleop_success_count_avg: RankValue,
    pub l4_teleop_success_percentage: RankValue,
    pub stack_l1_teleop_success_count_avg: RankValue,
    pub stack_l1_teleop_success_percentage: RankValue,
    pub l1_teleop_undefended_success_cycle_time_median: RankValue,
    pub l2_teleop_undefended_success_cycle_time_median: RankValue,
    pub l3_teleop_undefended_success_cycle_time_median: RankValue,
    pub l4_teleop_undefended_success_cycle_time_median: RankValue,
    pub stack_l1_teleop_undefended_success_cycle_time_median: RankValue,
    pub total_teleop_success_count_avg: RankValue,
    pub total_teleop_success_percentage: RankValue,
    pub total_teleop_undefended_success_cycle_time_median: RankValue,

    // Teleop algae.
    pub avg_scrape_algae_count: RankValue,
    pub avg_pickup_algae_count: RankValue,
    pub algae_success_cycle_count_median: RankValue,
    pub algae_success_cycle_count_max: RankValueMatch,
    pub net_success_undefended_cycle_time_median: RankValue,
    pub algae_source_reef_percentage: RankValue,
    pub algae_source_back_percentage: RankValue,
    pub algae_source_mid_percentage: RankValue,
    pub algae_source_front_percentage: RankValue,
    pub net_place_percentage: RankValue,
    pub net_shoot_percentage: RankValue,
    pub net_place_success_rate: RankValue,
    pub net_shoot_success_rate: RankValue,
    pub tactical_max_single_match: RankValueMatch,
    #[serde(alias = "last_second_processer_matches")]
    pub last_second_processor_matches: MatchList,

    // Defense resistance.
    pub coral_defended_percentage: RankValue,
    pub coral_defended_max_single_match: RankValueMatch,
    pub defended_success_coral_cycle_time_max: RankValueMatch,
    pub defended_success_coral_cycle_time_median: RankValue,
    pub undefended_success_coral_cycle_time_median: RankValue,
    pub defended_vs_undefended_success_coral_cycle_time_increase_percentage: RankValue,
}

impl TeamStatistics {
    pub fn new(team_no: u32) -> Self {
        Self {
            team_no,
            ..Self::default()
        }
    }
}
