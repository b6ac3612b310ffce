use serde::{Deserialize, Serialize};

use crate::action::{ClimbStatus, CoralLevel};
use crate::error::MatchIdentity;
use crate::index_set::IndexSet;

/// Length of the teleop period in seconds; time ratios are taken against it.
pub const TELEOP_SECONDS: f64 = 135.0;
/// Average cycle time reported when a category has no cycles at all.
pub const NO_CYCLE_AVG_SENTINEL: f64 = 999.0;

/// Everything derived from one team's action log in one match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchStatistics {
    pub file_name: String,
    pub timestamp: i64,
    pub tournament_level: String,
    pub match_no: u32,
    pub team_no: u32,
    pub event_code: String,

    pub score_coral: ScoreCoralStats,
    pub intake_coral: IntakeCoralStats,
    pub score_algae: ScoreAlgaeStats,
    pub intake_algae: IntakeAlgaeStats,
    pub defense: TimedTaskStats,
    pub foul: FoulStats,
    pub give_up: TimedTaskStats,
    pub climb_up: ClimbUpStats,
    pub leave: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TeleopTaskTimes {
    pub coral: f64,
    pub algae: f64,
    pub defense: f64,
    pub give_up: f64,
}

impl MatchStatistics {
    pub fn new(identity: MatchIdentity) -> Self {
        Self {
            tournament_level: identity.tournament_level,
            match_no: identity.match_no,
            team_no: identity.team_no,
            event_code: identity.event_code,
            ..Self::default()
        }
    }

    pub fn identity(&self) -> MatchIdentity {
        MatchIdentity {
            event_code: self.event_code.clone(),
            tournament_level: self.tournament_level.clone(),
            match_no: self.match_no,
            team_no: self.team_no,
        }
    }

    pub fn coral_teleop_time(&self) -> f64 {
        self.score_coral.teleop_total_time()
    }

    pub fn algae_teleop_time(&self) -> f64 {
        self.score_algae.teleop_total_time()
    }

    pub fn defense_total_time(&self) -> f64 {
        self.defense.total_time()
    }

    pub fn give_up_total_time(&self) -> f64 {
        self.give_up.total_time()
    }

    pub fn teleop_task_times(&self) -> TeleopTaskTimes {
        TeleopTaskTimes {
            coral: self.coral_teleop_time(),
            algae: self.algae_teleop_time(),
            defense: self.defense_total_time(),
            give_up: self.give_up_total_time(),
        }
    }

    /// Share of the teleop period spent on each task family.
    pub fn teleop_task_time_ratios(&self) -> TeleopTaskTimes {
        let t = self.teleop_task_times();
        TeleopTaskTimes {
            coral: t.coral / TELEOP_SECONDS,
            algae: t.algae / TELEOP_SECONDS,
            defense: t.defense / TELEOP_SECONDS,
            give_up: t.give_up / TELEOP_SECONDS,
        }
    }

    /// Every tag set only references existing cycles.
    pub fn indices_in_bounds(&self) -> bool {
        let coral_len = self.score_coral.cycle_times.len();
        let algae_len = self.score_algae.cycle_times.len();
        self.score_coral
            .tag_sets()
            .iter()
            .all(|set| set.max().is_none_or(|m| m < coral_len))
            && self
                .score_algae
                .tag_sets()
                .iter()
                .all(|set| set.max().is_none_or(|m| m < algae_len))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreCoralStats {
    pub cycle_times: Vec<f64>,
    pub faces: Vec<Option<i64>>,
    pub auto_index: IndexSet,
    pub stack_l1_index: IndexSet,
    pub l1_index: IndexSet,
    pub l2_index: IndexSet,
    pub l3_index: IndexSet,
    pub l4_index: IndexSet,
    pub successful_index: IndexSet,
    pub defended_index: IndexSet,
}

impl ScoreCoralStats {
    pub fn level_index(&self, level: CoralLevel) -> &IndexSet {
        match level {
            CoralLevel::L1 => &self.l1_index,
            CoralLevel::L2 => &self.l2_index,
            CoralLevel::L3 => &self.l3_index,
            CoralLevel::L4 => &self.l4_index,
            CoralLevel::StackL1 => &self.stack_l1_index,
        }
    }

    pub fn level_index_mut(&mut self, level: CoralLevel) -> &mut IndexSet {
        match level {
            CoralLevel::L1 => &mut self.l1_index,
            CoralLevel::L2 => &mut self.l2_index,
            CoralLevel::L3 => &mut self.l3_index,
            CoralLevel::L4 => &mut self.l4_index,
            CoralLevel::StackL1 => &mut self.stack_l1_index,
        }
    }

    pub fn teleop_index(&self) -> IndexSet {
        &IndexSet::all(self.cycle_times.len()) - &self.auto_index
    }

    pub fn avg_cycle_time(&self) -> f64 {
        mean_or(&self.cycle_times, NO_CYCLE_AVG_SENTINEL)
    }

    pub fn avg_successful_undefended_cycle_time(&self) -> f64 {
        let picked = self
            .successful_index
            .minus(&self.defended_index)
            .minus(&self.auto_index)
            .pick(&self.cycle_times);
        mean_or(&picked, NO_CYCLE_AVG_SENTINEL)
    }

    pub fn teleop_total_time(&self) -> f64 {
        self.teleop_index().sum_of(&self.cycle_times)
    }

    fn tag_sets(&self) -> [&IndexSet; 8] {
        [
            &self.auto_index,
            &self.stack_l1_index,
            &self.l1_index,
            &self.l2_index,
            &self.l3_index,
            &self.l4_index,
            &self.successful_index,
            &self.defended_index,
        ]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeCoralStats {
    pub auto_load_station_cnt: u32,
    pub auto_ground_cnt: u32,
    pub auto_fixed_cnt: u32,
    pub teleop_load_station_cnt: u32,
    pub teleop_ground_cnt: u32,
    pub teleop_fixed_cnt: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreAlgaeStats {
    pub cycle_times: Vec<f64>,
    pub auto_index: IndexSet,
    pub place_net_index: IndexSet,
    pub shoot_net_index: IndexSet,
    pub processor_index: IndexSet,
    pub last_sec_processor_index: IndexSet,
    pub tactical_index: IndexSet,
    pub success_index: IndexSet,
    pub defended_index: IndexSet,
}

impl ScoreAlgaeStats {
    /// Placed or shot into the net.
    pub fn net_index(&self) -> IndexSet {
        self.place_net_index.or(&self.shoot_net_index)
    }

    pub fn teleop_index(&self) -> IndexSet {
        &IndexSet::all(self.cycle_times.len()) - &self.auto_index
    }

    pub fn avg_cycle_time(&self) -> f64 {
        mean_or(&self.cycle_times, NO_CYCLE_AVG_SENTINEL)
    }

    pub fn avg_successful_undefended_cycle_time(&self) -> f64 {
        let picked = self
            .success_index
            .minus(&self.defended_index)
            .minus(&self.auto_index)
            .pick(&self.cycle_times);
        mean_or(&picked, NO_CYCLE_AVG_SENTINEL)
    }

    pub fn teleop_total_time(&self) -> f64 {
        self.teleop_index().sum_of(&self.cycle_times)
    }

    fn tag_sets(&self) -> [&IndexSet; 8] {
        [
            &self.auto_index,
            &self.place_net_index,
            &self.shoot_net_index,
            &self.processor_index,
            &self.last_sec_processor_index,
            &self.tactical_index,
            &self.success_index,
            &self.defended_index,
        ]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeAlgaeStats {
    pub auto_ground_front_cnt: u32,
    pub auto_ground_middle_cnt: u32,
    pub auto_ground_back_cnt: u32,
    pub auto_reef_cnt: u32,
    pub auto_scrape_cnt: u32,
    pub teleop_ground_front_cnt: u32,
    pub teleop_ground_middle_cnt: u32,
    pub teleop_ground_back_cnt: u32,
    pub teleop_reef_cnt: u32,
    pub teleop_scrape_cnt: u32,
}

/// Defense and give-up only keep their durations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimedTaskStats {
    pub cycle_times: Vec<f64>,
}

impl TimedTaskStats {
    pub fn avg_cycle_time(&self) -> f64 {
        mean_or(&self.cycle_times, 0.0)
    }

    pub fn total_time(&self) -> f64 {
        self.cycle_times.iter().sum()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoulStats {
    pub cnt: u32,
}

/// Last climb-up action of the match. `time` is in milliseconds, `duration`
/// in seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimbUpStats {
    pub time: f64,
    pub duration: f64,
    pub status: ClimbStatus,
}

fn mean_or(values: &[f64], empty: f64) -> f64 {
    if values.is_empty() {
        empty
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
