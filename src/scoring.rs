//! Point weights behind the BPS / EPA / PPG proxies.
//!
//! EPA is a scouting-side "extra points added" estimate; PPG mirrors the
//! game manual's point values. The two tables differ on purpose.

use crate::action::{ClimbStatus, CoralLevel};
use crate::index_set::IndexSet;
use crate::match_stats::MatchStatistics;

#[derive(Debug, Clone, Copy)]
pub struct EpaWeights {
    pub leave: f64,
    pub auto_high_mid_coral: f64,
    pub auto_low_slot_coral: f64,
    pub teleop_slot_coral: f64,
    pub processor: f64,
    pub net: f64,
    pub last_second_processor: f64,
    pub climb_success: f64,
}

pub const EPA_WEIGHTS: EpaWeights = EpaWeights {
    leave: 3.0,
    auto_high_mid_coral: 2.0,
    auto_low_slot_coral: 1.0,
    teleop_slot_coral: 2.0,
    processor: 2.0,
    net: 4.0,
    last_second_processor: 2.0,
    climb_success: 10.0,
};

/// Points for one successful coral at a level, plus the extra awarded when it
/// was scored in auto.
#[derive(Debug, Clone, Copy)]
pub struct CoralPoints {
    pub base: f64,
    pub auto_bonus: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct PpgWeights {
    pub leave: f64,
    pub trough: CoralPoints,
    pub l2: CoralPoints,
    pub l3: CoralPoints,
    pub l4: CoralPoints,
    pub processor: f64,
    pub net: f64,
    pub climb_success: f64,
    pub park: f64,
}

pub const PPG_WEIGHTS: PpgWeights = PpgWeights {
    leave: 3.0,
    trough: CoralPoints {
        base: 2.0,
        auto_bonus: 1.0,
    },
    l2: CoralPoints {
        base: 3.0,
        auto_bonus: 1.0,
    },
    l3: CoralPoints {
        base: 4.0,
        auto_bonus: 2.0,
    },
    l4: CoralPoints {
        base: 5.0,
        auto_bonus: 2.0,
    },
    processor: 6.0,
    net: 4.0,
    climb_success: 12.0,
    park: 2.0,
};

impl PpgWeights {
    pub fn coral(&self, level: CoralLevel) -> CoralPoints {
        match level {
            CoralLevel::L1 | CoralLevel::StackL1 => self.trough,
            CoralLevel::L2 => self.l2,
            CoralLevel::L3 => self.l3,
            CoralLevel::L4 => self.l4,
        }
    }
}

/// Reef branches: everything above the trough.
pub fn branch_index(m: &MatchStatistics) -> IndexSet {
    let c = &m.score_coral;
    c.l2_index.or(&c.l3_index).or(&c.l4_index)
}

/// Successful branch scores and the time spent on every branch cycle
/// (auto included, failures included).
pub fn branch_totals(m: &MatchStatistics) -> (usize, f64) {
    let branches = branch_index(m);
    let scored = m.score_coral.successful_index.and(&branches).len();
    let time = branches.sum_of(&m.score_coral.cycle_times);
    (scored, time)
}

pub fn epa_points(m: &MatchStatistics) -> f64 {
    let w = &EPA_WEIGHTS;
    let c = &m.score_coral;
    let a = &m.score_algae;

    let auto_scored = c.successful_index.and(&c.auto_index);
    let high_mid = auto_scored.and(&c.l3_index.or(&c.l4_index)).len();
    let low_slot = auto_scored
        .and(&c.l1_index.or(&c.l2_index).or(&c.stack_l1_index))
        .len();
    let teleop_slot = c
        .successful_index
        .and(&c.stack_l1_index.or(&c.l1_index))
        .minus(&c.auto_index)
        .len();

    let processor = a.success_index.and(&a.processor_index).len();
    let place_net = a.success_index.and(&a.place_net_index).len();
    let shoot_net = a.success_index.and(&a.shoot_net_index).len();
    let last_second = a.success_index.and(&a.last_sec_processor_index).len();

    let mut points = 0.0;
    if m.leave {
        points += w.leave;
    }
    points += high_mid as f64 * w.auto_high_mid_coral;
    points += low_slot as f64 * w.auto_low_slot_coral;
    points += teleop_slot as f64 * w.teleop_slot_coral;
    points += processor as f64 * w.processor;
    points += (place_net + shoot_net) as f64 * w.net;
    points += last_second as f64 * w.last_second_processor;
    if m.climb_up.status == ClimbStatus::Success {
        points += w.climb_success;
    }
    points
}

/// Game points scored in one match.
pub fn match_points(m: &MatchStatistics) -> f64 {
    let w = &PPG_WEIGHTS;
    let c = &m.score_coral;
    let a = &m.score_algae;

    let mut points = if m.leave { w.leave } else { 0.0 };
    for level in CoralLevel::ALL {
        let scored = c.successful_index.and(c.level_index(level));
        let auto_scored = scored.and(&c.auto_index).len();
        let weights = w.coral(level);
        points += scored.len() as f64 * weights.base + auto_scored as f64 * weights.auto_bonus;
    }
    points += a.success_index.and(&a.processor_index).len() as f64 * w.processor;
    points += a.success_index.and(&a.net_index()).len() as f64 * w.net;
    points += match m.climb_up.status {
        ClimbStatus::Success => w.climb_success,
        ClimbStatus::Park => w.park,
        _ => 0.0,
    };
    points
}
