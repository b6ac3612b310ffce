use std::cmp::Ordering;

use once_cell::sync::OnceCell;

use crate::team_stats::TeamStatistics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HigherBetter,
    LowerBetter,
}

/// One rankable attribute of `TeamStatistics`.
#[derive(Clone, Copy)]
pub struct RankedMetric {
    pub name: &'static str,
    pub direction: Direction,
    pub value: fn(&TeamStatistics) -> f64,
    pub rank: fn(&TeamStatistics) -> i32,
    pub set_rank: fn(&mut TeamStatistics, i32),
    /// Match the value came from, for "best single match" metrics.
    pub origin: Option<fn(&TeamStatistics) -> Option<(u32, &str)>>,
}

impl std::fmt::Debug for RankedMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankedMetric")
            .field("name", &self.name)
            .field("direction", &self.direction)
            .field("per_match", &self.origin.is_some())
            .finish()
    }
}

macro_rules! metric {
    ($field:ident, $dir:ident) => {{
        fn value(t: &TeamStatistics) -> f64 {
            t.$field.value
        }
        fn rank(t: &TeamStatistics) -> i32 {
            t.$field.rank
        }
        fn set_rank(t: &mut TeamStatistics, rank: i32) {
            t.$field.rank = rank;
        }
        RankedMetric {
            name: stringify!($field),
            direction: Direction::$dir,
            value,
            rank,
            set_rank,
            origin: None,
        }
    }};
}

macro_rules! metric_match {
    ($field:ident, $dir:ident) => {{
        fn origin(t: &TeamStatistics) -> Option<(u32, &str)> {
            let v = &t.$field;
            (!v.tournament_level.is_empty()).then(|| (v.match_no, v.tournament_level.as_str()))
        }
        RankedMetric {
            origin: Some(origin),
            ..metric!($field, $dir)
        }
    }};
}

static METRICS: OnceCell<Vec<RankedMetric>> = OnceCell::new();

/// Every ranked attribute with its direction. Attributes without a stated
/// preference rank higher-is-better.
pub fn ranked_metrics() -> &'static [RankedMetric] {
    METRICS.get_or_init(|| {
        vec![
            // Teleop time split.
            metric!(cycle_teleop_coral_time_ratio, HigherBetter),
            metric!(cycle_teleop_algae_time_ratio, HigherBetter),
            metric!(cycle_teleop_defense_time_ratio, HigherBetter),
            metric!(cycle_teleop_give_up_time_ratio, LowerBetter),
            // Climb and processor.
            metric!(climb_success_percentage, HigherBetter),
            metric_match!(climb_success_cycle_time_min, LowerBetter),
            metric!(climb_park_time_median, LowerBetter),
            metric_match!(processor_success_max_single_match, HigherBetter),
            // Scoring proxies.
            metric!(bps_value, HigherBetter),
            metric!(epa_value, HigherBetter),
            metric!(ppg_avg, HigherBetter),
            metric_match!(ppg_max_single_match, HigherBetter),
            // Auto.
            metric!(auto_line_cross_percentage, HigherBetter),
            metric!(auto_preload_coral_percentage, HigherBetter),
            metric_match!(auto_high_mid_coral_max, HigherBetter),
            metric!(auto_high_mid_coral_success_rate, HigherBetter),
            metric_match!(auto_low_slot_coral_max, HigherBetter),
            metric!(auto_low_slot_coral_success_rate, HigherBetter),
            metric_match!(auto_net_place_max, HigherBetter),
            metric_match!(auto_algae_process_max, HigherBetter),
            // Teleop coral.
            metric!(coral_source_station_percentage, HigherBetter),
            metric!(coral_source_ground_percentage, HigherBetter),
            metric!(l1_teleop_success_count_avg, HigherBetter),
            metric!(l1_teleop_success_percentage, HigherBetter),
            metric!(l2_teleop_success_count_avg, HigherBetter),
            metric!(l2_teleop_success_percentage, HigherBetter),
            metric!(l3_teleop_success_count_avg, HigherBetter),
            metric!(l3_teleop_success_percentage, HigherBetter),
            metric!(l4_teleop_success_count_avg, HigherBetter),
            metric!(l4_teleop_success_percentage, HigherBetter),
            metric!(stack_l1_teleop_success_count_avg, HigherBetter),
            metric!(stack_l1_teleop_success_percentage, HigherBetter),
            metric!(l1_teleop_undefended_success_cycle_time_median, LowerBetter),
            metric!(l2_teleop_undefended_success_cycle_time_median, LowerBetter),
            metric!(l3_teleop_undefended_success_cycle_time_median, LowerBetter),
            metric!(l4_teleop_undefended_success_cycle_time_median, LowerBetter),
            metric!(stack_l1_teleop_undefended_success_cycle_time_median, LowerBetter),
            metric!(total_teleop_success_count_avg, HigherBetter),
            metric!(total_teleop_success_percentage, HigherBetter),
            metric!(total_teleop_undefended_success_cycle_time_median, LowerBetter),
            // Teleop algae.
            metric!(avg_scrape_algae_count, HigherBetter),
            metric!(avg_pickup_algae_count, HigherBetter),
            metric!(algae_success_cycle_count_median, HigherBetter),
            metric_match!(algae_success_cycle_count_max, HigherBetter),
            metric!(net_success_undefended_cycle_time_median, LowerBetter),
            metric!(algae_source_reef_percentage, HigherBetter),
            metric!(algae_source_back_percentage, HigherBetter),
            metric!(algae_source_mid_percentage, HigherBetter),
            metric!(algae_source_front_percentage, HigherBetter),
            metric!(net_place_percentage, HigherBetter),
            metric!(net_shoot_percentage, HigherBetter),
            metric!(net_place_success_rate, HigherBetter),
            metric!(net_shoot_success_rate, HigherBetter),
            metric_match!(tactical_max_single_match, HigherBetter),
            // Defense resistance.
            metric!(coral_defended_percentage, HigherBetter),
            metric_match!(coral_defended_max_single_match, HigherBetter),
            metric_match!(defended_success_coral_cycle_time_max, HigherBetter),
            metric!(defended_success_coral_cycle_time_median, LowerBetter),
            metric!(undefended_success_coral_cycle_time_median, LowerBetter),
            metric!(
                defended_vs_undefended_success_coral_cycle_time_increase_percentage,
                LowerBetter
            ),
        ]
    })
}

pub fn metric_by_name(name: &str) -> Option<&'static RankedMetric> {
    ranked_metrics().iter().find(|m| m.name == name)
}

/// Assign ranks 1..=N for every ranked attribute. Equal values keep the
/// teams' current order, so ties never share a rank.
pub fn rank_teams(teams: &mut [TeamStatistics]) {
    for metric in ranked_metrics() {
        rank_metric(teams, metric);
    }
}

pub fn rank_metric(teams: &mut [TeamStatistics], metric: &RankedMetric) {
    let mut order: Vec<(usize, f64)> = teams
        .iter()
        .enumerate()
        .map(|(i, t)| (i, (metric.value)(t)))
        .collect();
    order.sort_by(|a, b| compare(a.1, b.1, metric.direction));
    for (rank, (i, _)) in order.into_iter().enumerate() {
        (metric.set_rank)(&mut teams[i], rank as i32 + 1);
    }
}

fn compare(a: f64, b: f64, dir: Direction) -> Ordering {
    match dir {
        Direction::HigherBetter => b.total_cmp(&a),
        Direction::LowerBetter => a.total_cmp(&b),
    }
}
