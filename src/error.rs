use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised while turning a raw action into a typed one. Any of these fails the
/// whole match it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("unknown action type: {0}")]
    UnknownActionType(String),

    #[error("unknown {field}: {value}")]
    UnknownSubtype { field: &'static str, value: String },

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid {field}: {value}")]
    InvalidField { field: &'static str, value: String },
}

/// Header fields that identify one scouted match for one team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchIdentity {
    pub event_code: String,
    pub tournament_level: String,
    pub match_no: u32,
    pub team_no: u32,
}

impl fmt::Display for MatchIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} #{} team {}",
            self.event_code, self.tournament_level, self.match_no, self.team_no
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("match {identity}: {source}")]
pub struct MatchBuildError {
    pub identity: MatchIdentity,
    #[source]
    pub source: ClassifyError,
}
