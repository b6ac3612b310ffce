use std::collections::HashMap;

use rayon::prelude::*;

use crate::action::{ClimbStatus, CoralLevel};
use crate::index_set::IndexSet;
use crate::match_stats::{MatchStatistics, TELEOP_SECONDS};
use crate::ranking::rank_teams;
use crate::scoring::{branch_totals, epa_points, match_points};
use crate::team_stats::{MatchList, RankValue, RankValueMatch, TeamStatistics};

/// Reported for median cycle-time metrics with no qualifying cycle.
pub const ABSENT_MEDIAN_SENTINEL: f64 = 9999.0;
/// Park-time median when no match reached an end-game state.
pub const NO_PARK_TIME_SENTINEL: f64 = 150.0;
/// Climb duration when no successful climb exists, or the success closed no
/// measurable cycle.
pub const NO_CLIMB_TIME_SENTINEL: f64 = 151.0;

/// Returns true for matches that must be left out of the aggregation.
pub type ExcludeFn<'a> = &'a (dyn Fn(&MatchStatistics) -> bool + Sync);

/// Group the surviving matches by team, teams in first-seen order.
pub fn group_by_team<'a>(
    matches: &'a [MatchStatistics],
    exclude: Option<ExcludeFn<'_>>,
) -> Vec<(u32, Vec<&'a MatchStatistics>)> {
    let mut slot_of: HashMap<u32, usize> = HashMap::new();
    let mut groups: Vec<(u32, Vec<&MatchStatistics>)> = Vec::new();
    for m in matches {
        if exclude.is_some_and(|f| f(m)) {
            continue;
        }
        let slot = *slot_of.entry(m.team_no).or_insert_with(|| {
            groups.push((m.team_no, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(m);
    }
    groups
}

/// Per-team metrics for every team with at least one surviving match. Ranks
/// are left unset.
pub fn aggregate(matches: &[MatchStatistics], exclude: Option<ExcludeFn<'_>>) -> Vec<TeamStatistics> {
    let groups = group_by_team(matches, exclude);
    let out: Vec<TeamStatistics> = groups
        .par_iter()
        .map(|(team_no, team_matches)| aggregate_team(*team_no, team_matches))
        .collect();
    tracing::debug!(
        teams = out.len(),
        matches = groups.iter().map(|(_, ms)| ms.len()).sum::<usize>(),
        "aggregated team statistics"
    );
    out
}

/// Aggregate, then rank every team against the others in the same scope.
pub fn team_statistics(matches: &[MatchStatistics], exclude: Option<ExcludeFn<'_>>) -> Vec<TeamStatistics> {
    let mut teams = aggregate(matches, exclude);
    rank_teams(&mut teams);
    teams
}

pub fn aggregate_team(team_no: u32, matches: &[&MatchStatistics]) -> TeamStatistics {
    if matches.is_empty() {
        return TeamStatistics::new(team_no);
    }

    let ratios = time_ratios(matches);
    let climb = climb_metrics(matches);
    let scoring = scoring_metrics(matches);
    let auto = auto_metrics(matches);
    let coral = teleop_coral_metrics(matches);
    let algae = teleop_algae_metrics(matches);
    let defense = defense_metrics(matches);

    let [l1, l2, l3, l4, stack_l1] = coral.levels;

    TeamStatistics {
        team_no,

        cycle_teleop_coral_time_ratio: RankValue::new(ratios.coral),
        cycle_teleop_algae_time_ratio: RankValue::new(ratios.algae),
        cycle_teleop_defense_time_ratio: RankValue::new(ratios.defense),
        cycle_teleop_give_up_time_ratio: RankValue::new(ratios.give_up),

        climb_success_matches: climb.success_matches,
        climb_fail_matches: climb.fail_matches,
        climb_touch_chain_matches: climb.touch_chain_matches,
        climb_success_percentage: RankValue::new(climb.success_percentage),
        climb_success_cycle_time_min: climb.success_cycle_time_min,
        climb_park_time_median: RankValue::new(climb.park_time_median),
        processor_success_max_single_match: algae.processor_max,

        bps_value: RankValue::new(scoring.bps),
        epa_value: RankValue::new(scoring.epa),
        ppg_avg: RankValue::new(scoring.ppg_avg),
        ppg_max_single_match: scoring.ppg_max,

        auto_line_cross_percentage: RankValue::new(auto.line_cross_percentage),
        auto_preload_coral_percentage: RankValue::new(auto.preload_coral_percentage),
        auto_high_mid_coral_max: auto.high_mid_coral_max,
        auto_high_mid_coral_success_rate: RankValue::new(auto.high_mid_coral_success_rate),
        auto_low_slot_coral_max: auto.low_slot_coral_max,
        auto_low_slot_coral_success_rate: RankValue::new(auto.low_slot_coral_success_rate),
        auto_net_place_max: auto.net_place_max,
        auto_algae_process_max: auto.algae_process_max,

        coral_source_station_percentage: RankValue::new(coral.source_station_percentage),
        coral_source_ground_percentage: RankValue::new(coral.source_ground_percentage),
        l1_teleop_success_count_avg: RankValue::new(l1.success_count_avg),
        l1_teleop_success_percentage: RankValue::new(l1.success_percentage),
        l2_teleop_success_count_avg: RankValue::new(l2.success_count_avg),
        l2_teleop_success_percentage: RankValue::new(l2.success_percentage),
        l3_teleop_success_count_avg: RankValue::new(l3.success_count_avg),
        l3_teleop_success_percentage: RankValue::new(l3.success_percentage),
        l4_teleop_success_count_avg: RankValue::new(l4.success_count_avg),
        l4_teleop_success_percentage: RankValue::new(l4.success_percentage),
        stack_l1_teleop_success_count_avg: RankValue::new(stack_l1.success_count_avg),
        stack_l1_teleop_success_percentage: RankValue::new(stack_l1.success_percentage),
        l1_teleop_undefended_success_cycle_time_median: RankValue::new(l1.undefended_cycle_time_median),
        l2_teleop_undefended_success_cycle_time_median: RankValue::new(l2.undefended_cycle_time_median),
        l3_teleop_undefended_success_cycle_time_median: RankValue::new(l3.undefended_cycle_time_median),
        l4_teleop_undefended_success_cycle_time_median: RankValue::new(l4.undefended_cycle_time_median),
        stack_l1_teleop_undefended_success_cycle_time_median: RankValue::new(
            stack_l1.undefended_cycle_time_median,
        ),
        total_teleop_success_count_avg: RankValue::new(coral.total.success_count_avg),
        total_teleop_success_percentage: RankValue::new(coral.total.success_percentage),
        total_teleop_undefended_success_cycle_time_median: RankValue::new(
            coral.total.undefended_cycle_time_median,
        ),

        avg_scrape_algae_count: RankValue::new(algae.avg_scrape_count),
        avg_pickup_algae_count: RankValue::new(algae.avg_pickup_count),
        algae_success_cycle_count_median: RankValue::new(algae.success_cycle_count_median),
        algae_success_cycle_count_max: algae.success_cycle_count_max,
        net_success_undefended_cycle_time_median: RankValue::new(algae.net_undefended_cycle_time_median),
        algae_source_reef_percentage: RankValue::new(algae.source.reef),
        algae_source_back_percentage: RankValue::new(algae.source.back),
        algae_source_mid_percentage: RankValue::new(algae.source.mid),
        algae_source_front_percentage: RankValue::new(algae.source.front),
        net_place_percentage: RankValue::new(algae.net_place_percentage),
        net_shoot_percentage: RankValue::new(algae.net_shoot_percentage),
        net_place_success_rate: RankValue::new(algae.net_place_success_rate),
        net_shoot_success_rate: RankValue::new(algae.net_shoot_success_rate),
        tactical_max_single_match: algae.tactical_max,
        last_second_processor_matches: algae.last_second_processor_matches,

        coral_defended_percentage: RankValue::new(defense.defended_percentage),
        coral_defended_max_single_match: defense.defended_max_single_match,
        defended_success_coral_cycle_time_max: defense.defended_cycle_time_max,
        defended_success_coral_cycle_time_median: RankValue::new(defense.defended_cycle_time_median),
        undefended_success_coral_cycle_time_median: RankValue::new(defense.undefended_cycle_time_median),
        defended_vs_undefended_success_coral_cycle_time_increase_percentage: RankValue::new(
            defense.increase_percentage,
        ),
    }
}

#[derive(Debug, Clone, Copy)]
struct TimeRatios {
    coral: f64,
    algae: f64,
    defense: f64,
    give_up: f64,
}

fn time_ratios(matches: &[&MatchStatistics]) -> TimeRatios {
    let n = matches.len() as f64;
    let mut totals = [0.0f64; 4];
    for &m in matches {
        let t = m.teleop_task_times();
        totals[0] += t.coral;
        totals[1] += t.algae;
        totals[2] += t.defense;
        totals[3] += t.give_up;
    }
    TimeRatios {
        coral: totals[0] / n / TELEOP_SECONDS,
        algae: totals[1] / n / TELEOP_SECONDS,
        defense: totals[2] / n / TELEOP_SECONDS,
        give_up: totals[3] / n / TELEOP_SECONDS,
    }
}

#[derive(Debug, Clone)]
struct ClimbMetrics {
    success_matches: MatchList,
    fail_matches: MatchList,
    touch_chain_matches: MatchList,
    success_percentage: f64,
    success_cycle_time_min: RankValueMatch,
    park_time_median: f64,
}

fn climb_metrics(matches: &[&MatchStatistics]) -> ClimbMetrics {
    let mut success_matches = MatchList::default();
    let mut fail_matches = MatchList::default();
    let mut touch_chain_matches = MatchList::default();
    let mut climb_times: Vec<(f64, &MatchStatistics)> = Vec::new();
    let mut park_times: Vec<f64> = Vec::new();

    for &m in matches {
        let climb = &m.climb_up;
        if climb.status.is_terminal() {
            park_times.push(climb.time / 1000.0);
        }
        match climb.status {
            ClimbStatus::Success => {
                success_matches.push(m);
                let duration = if climb.duration > 0.0 {
                    climb.duration
                } else {
                    NO_CLIMB_TIME_SENTINEL
                };
                climb_times.push((duration, m));
            }
            ClimbStatus::Fail => fail_matches.push(m),
            ClimbStatus::TouchChain => touch_chain_matches.push(m),
            _ => {}
        }
    }

    let attempts = success_matches.len() + fail_matches.len() + touch_chain_matches.len();
    let success_percentage = ratio(success_matches.len() as f64, attempts as f64);
    let success_cycle_time_min = first_min(climb_times)
        .map(|(value, m)| RankValueMatch::from_match(value, m))
        .unwrap_or_else(|| RankValueMatch::bare(NO_CLIMB_TIME_SENTINEL));

    ClimbMetrics {
        success_matches,
        fail_matches,
        touch_chain_matches,
        success_percentage,
        success_cycle_time_min,
        park_time_median: median(&park_times).unwrap_or(NO_PARK_TIME_SENTINEL),
    }
}

#[derive(Debug, Clone)]
struct ScoringMetrics {
    bps: f64,
    epa: f64,
    ppg_avg: f64,
    ppg_max: RankValueMatch,
}

fn scoring_metrics(matches: &[&MatchStatistics]) -> ScoringMetrics {
    let mut branches = 0usize;
    let mut branch_time = 0.0f64;
    let mut epa_total = 0.0f64;
    let mut ppg: Vec<(f64, &MatchStatistics)> = Vec::with_capacity(matches.len());

    for &m in matches {
        let (scored, time) = branch_totals(m);
        branches += scored;
        branch_time += time;
        epa_total += epa_points(m);
        ppg.push((match_points(m), m));
    }

    let points: Vec<f64> = ppg.iter().map(|(p, _)| *p).collect();
    ScoringMetrics {
        bps: ratio(branches as f64, branch_time),
        epa: epa_total / matches.len() as f64,
        ppg_avg: mean(&points),
        ppg_max: best_or_default(ppg),
    }
}

#[derive(Debug, Clone)]
struct AutoMetrics {
    line_cross_percentage: f64,
    preload_coral_percentage: f64,
    high_mid_coral_max: RankValueMatch,
    high_mid_coral_success_rate: f64,
    low_slot_coral_max: RankValueMatch,
    low_slot_coral_success_rate: f64,
    net_place_max: RankValueMatch,
    algae_process_max: RankValueMatch,
}

/// Auto rates pool attempts across matches instead of averaging per match.
fn auto_metrics(matches: &[&MatchStatistics]) -> AutoMetrics {
    let mut leave_cnt = 0usize;
    let mut preload_cnt = 0usize;
    let mut high_mid_success_total = 0usize;
    let mut high_mid_total = 0usize;
    let mut low_slot_success_total = 0usize;
    let mut low_slot_total = 0usize;
    let mut high_mid_counts: Vec<(f64, &MatchStatistics)> = Vec::new();
    let mut low_slot_counts: Vec<(f64, &MatchStatistics)> = Vec::new();
    let mut net_place_counts: Vec<(f64, &MatchStatistics)> = Vec::new();
    let mut algae_process_counts: Vec<(f64, &MatchStatistics)> = Vec::new();

    for &m in matches {
        let c = &m.score_coral;
        let a = &m.score_algae;
        if m.leave {
            leave_cnt += 1;
        }

        let auto_scored = c.successful_index.and(&c.auto_index);
        if auto_scored.contains(0) {
            preload_cnt += 1;
        }

        let high_mid = c.l3_index.or(&c.l4_index);
        let high_mid_success = auto_scored.and(&high_mid).len();
        high_mid_total += c.auto_index.and(&high_mid).len();
        high_mid_success_total += high_mid_success;
        if high_mid_success > 0 {
            high_mid_counts.push((high_mid_success as f64, m));
        }

        // Successes include L2 while attempts only cover the trough levels,
        // so this rate can exceed 1.
        let low_slot_success = auto_scored
            .and(&c.stack_l1_index.or(&c.l1_index).or(&c.l2_index))
            .len();
        low_slot_total += c.auto_index.and(&c.l1_index.or(&c.stack_l1_index)).len();
        low_slot_success_total += low_slot_success;
        if low_slot_success > 0 {
            low_slot_counts.push((low_slot_success as f64, m));
        }

        let net_success = a.success_index.and(&a.auto_index).and(&a.net_index()).len();
        if net_success > 0 {
            net_place_counts.push((net_success as f64, m));
        }

        let processed = m.intake_algae.auto_reef_cnt + m.intake_algae.auto_scrape_cnt;
        if processed > 0 {
            algae_process_counts.push((processed as f64, m));
        }
    }

    let n = matches.len() as f64;
    AutoMetrics {
        line_cross_percentage: leave_cnt as f64 / n,
        preload_coral_percentage: preload_cnt as f64 / n,
        high_mid_coral_max: best_or_default(high_mid_counts),
        high_mid_coral_success_rate: ratio(high_mid_success_total as f64, high_mid_total as f64),
        low_slot_coral_max: best_or_default(low_slot_counts),
        low_slot_coral_success_rate: ratio(low_slot_success_total as f64, low_slot_total as f64),
        net_place_max: best_or_default(net_place_counts),
        algae_process_max: best_or_default(algae_process_counts),
    }
}

#[derive(Debug, Clone, Copy)]
struct LevelMetrics {
    success_count_avg: f64,
    success_percentage: f64,
    undefended_cycle_time_median: f64,
}

#[derive(Debug, Clone, Copy)]
struct TeleopCoralMetrics {
    /// In `CoralLevel::ALL` order.
    levels: [LevelMetrics; 5],
    total: LevelMetrics,
    source_station_percentage: f64,
    source_ground_percentage: f64,
}

#[derive(Debug, Default)]
struct LevelSamples {
    success_counts: Vec<f64>,
    attempt_counts: Vec<f64>,
    undefended_times: Vec<f64>,
}

impl LevelSamples {
    fn metrics(&self) -> LevelMetrics {
        let mean_success = mean(&self.success_counts);
        let mean_attempts = mean(&self.attempt_counts);
        LevelMetrics {
            success_count_avg: mean_success,
            success_percentage: ratio(mean_success, mean_attempts),
            undefended_cycle_time_median: median(&self.undefended_times).unwrap_or(ABSENT_MEDIAN_SENTINEL),
        }
    }
}

/// Success percentage is mean successes over mean attempts, not the mean of
/// per-match ratios.
fn teleop_coral_metrics(matches: &[&MatchStatistics]) -> TeleopCoralMetrics {
    let mut per_level: [LevelSamples; 5] = Default::default();
    let mut total = LevelSamples::default();
    let mut ground_cnt = 0u32;
    let mut station_cnt = 0u32;

    for &m in matches {
        let c = &m.score_coral;
        ground_cnt += m.intake_coral.teleop_ground_cnt;
        station_cnt += m.intake_coral.teleop_load_station_cnt;

        let mut match_success = 0usize;
        let mut match_attempts = 0usize;
        for (samples, level) in per_level.iter_mut().zip(CoralLevel::ALL) {
            let teleop_level = c.level_index(level).minus(&c.auto_index);
            let scored = c.successful_index.and(&teleop_level);
            let undefended = scored.minus(&c.defended_index).pick(&c.cycle_times);

            match_success += scored.len();
            match_attempts += teleop_level.len();
            samples.success_counts.push(scored.len() as f64);
            samples.attempt_counts.push(teleop_level.len() as f64);
            total.undefended_times.extend_from_slice(&undefended);
            samples.undefended_times.extend(undefended);
        }
        total.success_counts.push(match_success as f64);
        total.attempt_counts.push(match_attempts as f64);
    }

    let sources = (ground_cnt + station_cnt) as f64;
    TeleopCoralMetrics {
        levels: per_level.each_ref().map(LevelSamples::metrics),
        total: total.metrics(),
        source_station_percentage: ratio(station_cnt as f64, sources),
        source_ground_percentage: ratio(ground_cnt as f64, sources),
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct AlgaeSourceShare {
    front: f64,
    mid: f64,
    back: f64,
    reef: f64,
}

#[derive(Debug, Clone)]
struct TeleopAlgaeMetrics {
    avg_scrape_count: f64,
    avg_pickup_count: f64,
    success_cycle_count_median: f64,
    success_cycle_count_max: RankValueMatch,
    net_undefended_cycle_time_median: f64,
    source: AlgaeSourceShare,
    net_place_percentage: f64,
    net_shoot_percentage: f64,
    net_place_success_rate: f64,
    net_shoot_success_rate: f64,
    tactical_max: RankValueMatch,
    last_second_processor_matches: MatchList,
    processor_max: RankValueMatch,
}

fn teleop_algae_metrics(matches: &[&MatchStatistics]) -> TeleopAlgaeMetrics {
    let mut scrape_cnt: Vec<f64> = Vec::with_capacity(matches.len());
    let mut pickup_cnt: Vec<f64> = Vec::with_capacity(matches.len());
    let mut success_cycles: Vec<(f64, &MatchStatistics)> = Vec::with_capacity(matches.len());
    let mut tactical: Vec<(f64, &MatchStatistics)> = Vec::with_capacity(matches.len());
    let mut processor: Vec<(f64, &MatchStatistics)> = Vec::new();
    let mut net_undefended_times: Vec<f64> = Vec::new();
    let mut last_second_processor_matches = MatchList::default();
    let (mut front, mut middle, mut back, mut reef) = (0u32, 0u32, 0u32, 0u32);
    let (mut place, mut shoot, mut place_success, mut shoot_success) = (0usize, 0usize, 0usize, 0usize);

    for &m in matches {
        let a = &m.score_algae;
        let intake = &m.intake_algae;

        scrape_cnt.push(intake.teleop_scrape_cnt as f64);
        pickup_cnt.push(intake.teleop_reef_cnt as f64);
        success_cycles.push((a.success_index.minus(&a.auto_index).len() as f64, m));

        front += intake.teleop_ground_front_cnt;
        middle += intake.teleop_ground_middle_cnt;
        back += intake.teleop_ground_back_cnt;
        reef += intake.teleop_reef_cnt;

        place += a.place_net_index.len();
        shoot += a.shoot_net_index.len();
        place_success += a.success_index.and(&a.place_net_index).len();
        shoot_success += a.success_index.and(&a.shoot_net_index).len();

        let net_undefended = a.success_index.and(&a.net_index().minus(&a.defended_index));
        net_undefended_times.extend(net_undefended.pick(&a.cycle_times));

        tactical.push((a.tactical_index.len() as f64, m));
        if !a.last_sec_processor_index.is_disjoint(&a.success_index) {
            last_second_processor_matches.push(m);
        }
        if !a.processor_index.is_empty() {
            processor.push((a.processor_index.len() as f64, m));
        }
    }

    let success_counts: Vec<f64> = success_cycles.iter().map(|(v, _)| *v).collect();
    let sources = (front + middle + back + reef) as f64;
    let net_attempts = (place + shoot) as f64;

    TeleopAlgaeMetrics {
        avg_scrape_count: mean(&scrape_cnt),
        avg_pickup_count: mean(&pickup_cnt),
        success_cycle_count_median: median(&success_counts).unwrap_or(0.0),
        success_cycle_count_max: best_or_default(success_cycles),
        net_undefended_cycle_time_median: median(&net_undefended_times).unwrap_or(ABSENT_MEDIAN_SENTINEL),
        source: AlgaeSourceShare {
            front: ratio(front as f64, sources),
            mid: ratio(middle as f64, sources),
            back: ratio(back as f64, sources),
            reef: ratio(reef as f64, sources),
        },
        net_place_percentage: ratio(place as f64, net_attempts),
        net_shoot_percentage: ratio(shoot as f64, net_attempts),
        net_place_success_rate: ratio(place_success as f64, place as f64),
        net_shoot_success_rate: ratio(shoot_success as f64, shoot as f64),
        tactical_max: best_or_default(tactical),
        last_second_processor_matches,
        processor_max: best_or_default(processor),
    }
}

#[derive(Debug, Clone)]
struct DefenseMetrics {
    defended_percentage: f64,
    defended_max_single_match: RankValueMatch,
    defended_cycle_time_max: RankValueMatch,
    defended_cycle_time_median: f64,
    undefended_cycle_time_median: f64,
    increase_percentage: f64,
}

/// How a team's teleop coral cycles hold up when defended.
fn defense_metrics(matches: &[&MatchStatistics]) -> DefenseMetrics {
    let mut successful_total = 0usize;
    let mut defended_total = 0usize;
    let mut undefended_total = 0usize;
    let mut defended_counts: Vec<(f64, &MatchStatistics)> = Vec::with_capacity(matches.len());
    let mut defended_times: Vec<(f64, &MatchStatistics)> = Vec::new();
    let mut undefended_times: Vec<f64> = Vec::new();

    for &m in matches {
        let c = &m.score_coral;
        let teleop: IndexSet = c.teleop_index();
        let defended = teleop.and(&c.defended_index);
        let undefended = teleop.minus(&c.defended_index);

        successful_total += teleop.and(&c.successful_index).len();
        defended_total += defended.len();
        undefended_total += undefended.len();
        defended_counts.push((defended.len() as f64, m));

        for t in defended.and(&c.successful_index).pick(&c.cycle_times) {
            defended_times.push((t, m));
        }
        undefended_times.extend(undefended.and(&c.successful_index).pick(&c.cycle_times));
    }

    let defended_percentage = if successful_total > 0 {
        ratio(defended_total as f64, (defended_total + undefended_total) as f64)
    } else {
        0.0
    };

    let defended_values: Vec<f64> = defended_times.iter().map(|(t, _)| *t).collect();
    let defended_median = median(&defended_values);
    let undefended_median = median(&undefended_times);
    let increase_percentage = match (defended_median, undefended_median) {
        (Some(d), Some(u)) if u > 0.0 => (d - u) / u,
        _ => 0.0,
    };

    DefenseMetrics {
        defended_percentage,
        defended_max_single_match: best_or_default(defended_counts),
        defended_cycle_time_max: first_max(defended_times)
            .map(|(value, m)| RankValueMatch::from_match(value, m))
            .unwrap_or_else(|| RankValueMatch::bare(ABSENT_MEDIAN_SENTINEL)),
        defended_cycle_time_median: defended_median.unwrap_or(ABSENT_MEDIAN_SENTINEL),
        undefended_cycle_time_median: undefended_median.unwrap_or(ABSENT_MEDIAN_SENTINEL),
        increase_percentage,
    }
}

/// Largest value with its match; on ties the earliest entry wins.
fn first_max<'a>(items: Vec<(f64, &'a MatchStatistics)>) -> Option<(f64, &'a MatchStatistics)> {
    items
        .into_iter()
        .fold(None, |best, (v, m)| match best {
            Some((bv, _)) if v <= bv => best,
            _ => Some((v, m)),
        })
}

/// Smallest value with its match; on ties the earliest entry wins.
fn first_min<'a>(items: Vec<(f64, &'a MatchStatistics)>) -> Option<(f64, &'a MatchStatistics)> {
    items
        .into_iter()
        .fold(None, |best, (v, m)| match best {
            Some((bv, _)) if v >= bv => best,
            _ => Some((v, m)),
        })
}

/// `first_max`, or a zero value with no match when nothing qualified.
fn best_or_default(items: Vec<(f64, &MatchStatistics)>) -> RankValueMatch {
    first_max(items)
        .map(|(value, m)| RankValueMatch::from_match(value, m))
        .unwrap_or_default()
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 { num / den } else { 0.0 }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Middle value, or the mean of the two middle values for even lengths.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_handles_odd_and_even_lengths() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn first_max_and_min_keep_earliest_on_ties() {
        let a = MatchStatistics {
            match_no: 1,
            ..MatchStatistics::default()
        };
        let b = MatchStatistics {
            match_no: 2,
            ..MatchStatistics::default()
        };
        let best = first_max(vec![(3.0, &a), (3.0, &b)]).unwrap();
        assert_eq!(best.1.match_no, 1);
        let least = first_min(vec![(2.0, &a), (2.0, &b)]).unwrap();
        assert_eq!(least.1.match_no, 1);
    }

    #[test]
    fn zero_denominator_rates_are_zero() {
        assert_eq!(ratio(3.0, 0.0), 0.0);
        assert_eq!(ratio(1.0, 4.0), 0.25);
    }
}
