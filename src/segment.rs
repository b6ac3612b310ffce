use crate::action::Action;

/// A boundary action together with the seconds elapsed since the previous
/// boundary (or since match start for the first one).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cycle<'a> {
    pub action: &'a Action,
    pub duration: f64,
}

impl Cycle<'_> {
    pub fn timestamp(&self) -> i64 {
        self.action.timestamp
    }
}

/// Split a match's action log into cycles.
///
/// Only boundary actions (scores, give-up, defense, climb, teleop start)
/// survive; they are ordered by timestamp with a stable sort, so equal
/// timestamps keep their log order and produce zero-length cycles.
pub fn segment_cycles(actions: &[Action]) -> Vec<Cycle<'_>> {
    let mut boundaries: Vec<&Action> = actions.iter().filter(|a| a.kind.is_boundary()).collect();
    boundaries.sort_by_key(|a| a.timestamp);

    let mut prev_ts = 0i64;
    boundaries
        .into_iter()
        .map(|action| {
            let duration = action.timestamp.saturating_sub(prev_ts) as f64 / 1000.0;
            prev_ts = action.timestamp;
            Cycle { action, duration }
        })
        .collect()
}
