use rayon::prelude::*;

use crate::action::{
    Action, ActionKind, AlgaeIntake, AlgaeTarget, CoralSource, GroundSource,
    LAST_SECOND_PROCESSOR_MS, MatchRecord,
};
use crate::error::{MatchBuildError, MatchIdentity};
use crate::match_stats::MatchStatistics;
use crate::segment::{Cycle, segment_cycles};

/// Build the statistics for one uploaded record. Any action that can't be
/// classified fails the whole match.
pub fn build_match_statistics(record: &MatchRecord) -> Result<MatchStatistics, MatchBuildError> {
    let actions = record
        .classify_actions()
        .map_err(|source| MatchBuildError {
            identity: record.identity.clone(),
            source,
        })?;
    Ok(build_from_actions(record.identity.clone(), &actions))
}

/// Build every record independently. Failures stay in their own slot so one
/// bad log never hides the others.
pub fn build_all(records: &[MatchRecord]) -> Vec<Result<MatchStatistics, MatchBuildError>> {
    records.par_iter().map(build_match_statistics).collect()
}

/// Counting pass followed by the cycle pass over already classified actions.
pub fn build_from_actions(identity: MatchIdentity, actions: &[Action]) -> MatchStatistics {
    let mut stats = MatchStatistics::new(identity);
    count_actions(&mut stats, actions);
    for cycle in segment_cycles(actions) {
        record_cycle(&mut stats, &cycle);
    }
    stats
}

fn count_actions(stats: &mut MatchStatistics, actions: &[Action]) {
    let auto_actions = actions.iter().filter(|a| a.is_auto()).count();
    // The match-start marker alone doesn't mean the robot moved.
    stats.leave = auto_actions > 1;

    for action in actions {
        let auto = action.is_auto();
        match &action.kind {
            ActionKind::IntakeCoral(source) => {
                let c = &mut stats.intake_coral;
                let slot = match (auto, source) {
                    (true, CoralSource::LoadStation) => &mut c.auto_load_station_cnt,
                    (true, CoralSource::Ground) => &mut c.auto_ground_cnt,
                    (true, CoralSource::Fixed) => &mut c.auto_fixed_cnt,
                    (false, CoralSource::LoadStation) => &mut c.teleop_load_station_cnt,
                    (false, CoralSource::Ground) => &mut c.teleop_ground_cnt,
                    (false, CoralSource::Fixed) => &mut c.teleop_fixed_cnt,
                };
                *slot += 1;
            }
            ActionKind::IntakeAlgae(kind) => {
                let a = &mut stats.intake_algae;
                let slot = match (auto, kind) {
                    (true, AlgaeIntake::Ground(GroundSource::Front)) => &mut a.auto_ground_front_cnt,
                    (true, AlgaeIntake::Ground(GroundSource::Middle)) => &mut a.auto_ground_middle_cnt,
                    (true, AlgaeIntake::Ground(GroundSource::Back)) => &mut a.auto_ground_back_cnt,
                    (true, AlgaeIntake::Reef) => &mut a.auto_reef_cnt,
                    (true, AlgaeIntake::Scrape) => &mut a.auto_scrape_cnt,
                    (false, AlgaeIntake::Ground(GroundSource::Front)) => &mut a.teleop_ground_front_cnt,
                    (false, AlgaeIntake::Ground(GroundSource::Middle)) => &mut a.teleop_ground_middle_cnt,
                    (false, AlgaeIntake::Ground(GroundSource::Back)) => &mut a.teleop_ground_back_cnt,
                    (false, AlgaeIntake::Reef) => &mut a.teleop_reef_cnt,
                    (false, AlgaeIntake::Scrape) => &mut a.teleop_scrape_cnt,
                };
                *slot += 1;
            }
            ActionKind::Foul => stats.foul.cnt += 1,
            _ => {}
        }
    }
}

fn record_cycle(stats: &mut MatchStatistics, cycle: &Cycle<'_>) {
    let auto = cycle.action.is_auto();
    match &cycle.action.kind {
        ActionKind::ScoreCoral {
            level,
            success,
            defended,
            face,
        } => {
            let coral = &mut stats.score_coral;
            coral.cycle_times.push(cycle.duration);
            coral.faces.push(*face);
            let idx = coral.cycle_times.len() - 1;
            if *success {
                coral.successful_index.insert(idx);
            }
            if *defended {
                coral.defended_index.insert(idx);
            }
            coral.level_index_mut(*level).insert(idx);
            if auto {
                coral.auto_index.insert(idx);
            }
        }
        ActionKind::ScoreAlgae {
            target,
            success,
            defended,
        } => {
            let algae = &mut stats.score_algae;
            algae.cycle_times.push(cycle.duration);
            let idx = algae.cycle_times.len() - 1;
            if *success {
                algae.success_index.insert(idx);
            }
            if *defended {
                algae.defended_index.insert(idx);
            }
            if auto {
                algae.auto_index.insert(idx);
            }
            match target {
                AlgaeTarget::PlaceNet => {
                    algae.place_net_index.insert(idx);
                }
                AlgaeTarget::ShootNet => {
                    algae.shoot_net_index.insert(idx);
                }
                AlgaeTarget::Processor => {
                    algae.processor_index.insert(idx);
                    if cycle.timestamp() > LAST_SECOND_PROCESSOR_MS {
                        algae.last_sec_processor_index.insert(idx);
                    }
                }
                AlgaeTarget::Tactical => {
                    algae.tactical_index.insert(idx);
                }
            }
        }
        ActionKind::GiveUp => stats.give_up.cycle_times.push(cycle.duration),
        ActionKind::Defense => stats.defense.cycle_times.push(cycle.duration),
        ActionKind::ClimbUp(status) => {
            // Only the last climb of the match is kept.
            stats.climb_up.time = cycle.timestamp() as f64;
            stats.climb_up.duration = cycle.duration;
            stats.climb_up.status = status.clone();
        }
        _ => {}
    }
}
