use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClassifyError, MatchIdentity};

/// Actions strictly before this timestamp belong to the autonomous phase.
pub const AUTO_PHASE_END_MS: i64 = 15_000;
/// Processor scores closing after this timestamp count as last-second.
pub const LAST_SECOND_PROCESSOR_MS: i64 = 144_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoralSource {
    LoadStation,
    Ground,
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundSource {
    Front,
    Middle,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgaeIntake {
    Ground(GroundSource),
    Reef,
    Scrape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoralLevel {
    L1,
    L2,
    L3,
    L4,
    StackL1,
}

impl CoralLevel {
    pub const ALL: [CoralLevel; 5] = [
        CoralLevel::L1,
        CoralLevel::L2,
        CoralLevel::L3,
        CoralLevel::L4,
        CoralLevel::StackL1,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgaeTarget {
    PlaceNet,
    ShootNet,
    Processor,
    Tactical,
}

/// Final state reported for a climb attempt. Unrecognised results are kept
/// verbatim so newer scouting clients don't break older servers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum ClimbStatus {
    #[default]
    None,
    Success,
    Fail,
    TouchChain,
    Park,
    Other(String),
}

impl ClimbStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "" => ClimbStatus::None,
            "success" => ClimbStatus::Success,
            "fail" => ClimbStatus::Fail,
            "touch_chain" => ClimbStatus::TouchChain,
            "park" => ClimbStatus::Park,
            other => ClimbStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ClimbStatus::None => "",
            ClimbStatus::Success => "success",
            ClimbStatus::Fail => "fail",
            ClimbStatus::TouchChain => "touch_chain",
            ClimbStatus::Park => "park",
            ClimbStatus::Other(raw) => raw,
        }
    }

    /// True when the robot ended the match in one of the end-game states.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ClimbStatus::Success | ClimbStatus::Fail | ClimbStatus::TouchChain | ClimbStatus::Park
        )
    }
}

impl From<Option<String>> for ClimbStatus {
    fn from(raw: Option<String>) -> Self {
        raw.as_deref().map(ClimbStatus::parse).unwrap_or_default()
    }
}

impl From<ClimbStatus> for String {
    fn from(status: ClimbStatus) -> Self {
        status.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionKind {
    MatchStart,
    TeleopStart,
    IntakeCoral(CoralSource),
    IntakeAlgae(AlgaeIntake),
    Foul,
    ScoreCoral {
        level: CoralLevel,
        success: bool,
        defended: bool,
        face: Option<i64>,
    },
    ScoreAlgae {
        target: AlgaeTarget,
        success: bool,
        defended: bool,
    },
    Defense,
    GiveUp,
    ClimbUp(ClimbStatus),
}

impl ActionKind {
    /// Boundary actions close a cycle; everything else only feeds counters.
    pub fn is_boundary(&self) -> bool {
        matches!(
            self,
            ActionKind::ScoreCoral { .. }
                | ActionKind::ScoreAlgae { .. }
                | ActionKind::GiveUp
                | ActionKind::Defense
                | ActionKind::ClimbUp(_)
                | ActionKind::TeleopStart
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub timestamp: i64,
    pub kind: ActionKind,
}

impl Action {
    pub fn new(timestamp: i64, kind: ActionKind) -> Self {
        Self { timestamp, kind }
    }

    pub fn is_auto(&self) -> bool {
        self.timestamp < AUTO_PHASE_END_MS
    }

    /// Classify one raw action mapping from the scouting client.
    pub fn from_value(v: &Value) -> Result<Self, ClassifyError> {
        let type_str = v
            .get("type")
            .and_then(|x| x.as_str())
            .ok_or(ClassifyError::MissingField("type"))?;
        let timestamp = v
            .get("timestamp")
            .and_then(as_i64_any)
            .ok_or(ClassifyError::MissingField("timestamp"))?;

        let kind = match type_str {
            "start" => ActionKind::MatchStart,
            "teleop start" => ActionKind::TeleopStart,
            "foul" => ActionKind::Foul,
            "defense" => ActionKind::Defense,
            "give up" => ActionKind::GiveUp,
            "intake coral" => ActionKind::IntakeCoral(parse_coral_source(v)?),
            "intake algae" => ActionKind::IntakeAlgae(parse_algae_intake(v)?),
            "score coral" => ActionKind::ScoreCoral {
                level: parse_coral_level(v)?,
                success: truthy(v.get("success")),
                defended: truthy(v.get("defended")),
                face: v.get("face").and_then(as_i64_any),
            },
            "score algae" => ActionKind::ScoreAlgae {
                target: parse_algae_target(v)?,
                success: truthy(v.get("success")),
                defended: truthy(v.get("defended")),
            },
            "climb up" => ActionKind::ClimbUp(
                v.get("climb result")
                    .and_then(|x| x.as_str())
                    .map(ClimbStatus::parse)
                    .unwrap_or_default(),
            ),
            other => return Err(ClassifyError::UnknownActionType(other.to_string())),
        };

        Ok(Self { timestamp, kind })
    }
}

/// One uploaded match record: header plus the still-unclassified action list.
#[derive(Debug, Clone, Default)]
pub struct MatchRecord {
    pub identity: MatchIdentity,
    pub actions: Vec<Value>,
}

impl MatchRecord {
    pub fn from_value(v: &Value) -> Self {
        let identity = MatchIdentity {
            event_code: string_any(v.get("eventCode")),
            tournament_level: string_any(v.get("tournamentLevel")),
            match_no: v.get("matchNumber").and_then(as_u32_any).unwrap_or(0),
            team_no: v.get("teamNo").and_then(as_u32_any).unwrap_or(0),
        };
        let actions = v
            .get("action")
            .and_then(|x| x.as_array())
            .cloned()
            .unwrap_or_default();
        Self { identity, actions }
    }

    /// Strict header read for records about to be filed: numbers must parse
    /// and every field must be present.
    pub fn identity_from_value(v: &Value) -> Result<MatchIdentity, ClassifyError> {
        Ok(MatchIdentity {
            event_code: required_header(v, "eventCode").map(|x| string_any(Some(x)))?,
            tournament_level: string_any(v.get("tournamentLevel")),
            match_no: header_u32(v, "matchNumber")?,
            team_no: header_u32(v, "teamNo")?,
        })
    }

    pub fn from_json_str(raw: &str) -> serde_json::Result<Self> {
        let v: Value = serde_json::from_str(raw.trim())?;
        Ok(Self::from_value(&v))
    }

    /// Classify every action, stopping at the first one that can't be.
    pub fn classify_actions(&self) -> Result<Vec<Action>, ClassifyError> {
        self.actions.iter().map(Action::from_value).collect()
    }
}

fn parse_coral_source(v: &Value) -> Result<CoralSource, ClassifyError> {
    const FIELD: &str = "intake coral type";
    match required_str(v, FIELD)? {
        "load station A" | "load station B" => Ok(CoralSource::LoadStation),
        "ground" => Ok(CoralSource::Ground),
        "fixed" => Ok(CoralSource::Fixed),
        other => Err(unknown(FIELD, other)),
    }
}

fn parse_algae_intake(v: &Value) -> Result<AlgaeIntake, ClassifyError> {
    const FIELD: &str = "intake algae type";
    match required_str(v, FIELD)? {
        "ground" => {
            const SOURCE: &str = "ground algae source";
            let source = match required_str(v, SOURCE)? {
                "front" => GroundSource::Front,
                "middle" => GroundSource::Middle,
                "back" => GroundSource::Back,
                other => return Err(unknown(SOURCE, other)),
            };
            Ok(AlgaeIntake::Ground(source))
        }
        "reef" => Ok(AlgaeIntake::Reef),
        "scrape" => Ok(AlgaeIntake::Scrape),
        other => Err(unknown(FIELD, other)),
    }
}

fn parse_coral_level(v: &Value) -> Result<CoralLevel, ClassifyError> {
    const FIELD: &str = "score coral type";
    match required_str(v, FIELD)? {
        "L1" => Ok(CoralLevel::L1),
        "L2" => Ok(CoralLevel::L2),
        "L3" => Ok(CoralLevel::L3),
        "L4" => Ok(CoralLevel::L4),
        "Stack L1" => Ok(CoralLevel::StackL1),
        other => Err(unknown(FIELD, other)),
    }
}

fn parse_algae_target(v: &Value) -> Result<AlgaeTarget, ClassifyError> {
    const FIELD: &str = "score algae type";
    match required_str(v, FIELD)? {
        "net" => Ok(AlgaeTarget::PlaceNet),
        "shooting" => Ok(AlgaeTarget::ShootNet),
        "processor" => Ok(AlgaeTarget::Processor),
        "tactical" => Ok(AlgaeTarget::Tactical),
        other => Err(unknown(FIELD, other)),
    }
}

fn required_str<'a>(v: &'a Value, field: &'static str) -> Result<&'a str, ClassifyError> {
    v.get(field)
        .and_then(|x| x.as_str())
        .ok_or(ClassifyError::MissingField(field))
}

fn unknown(field: &'static str, value: &str) -> ClassifyError {
    ClassifyError::UnknownSubtype {
        field,
        value: value.to_string(),
    }
}

fn truthy(v: Option<&Value>) -> bool {
    match v {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|x| x != 0.0),
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn string_any(v: Option<&Value>) -> String {
    match v {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn required_header<'a>(v: &'a Value, field: &'static str) -> Result<&'a Value, ClassifyError> {
    v.get(field)
        .filter(|x| !x.is_null())
        .ok_or(ClassifyError::MissingField(field))
}

fn header_u32(v: &Value, field: &'static str) -> Result<u32, ClassifyError> {
    let raw = required_header(v, field)?;
    as_u32_any(raw).ok_or_else(|| ClassifyError::InvalidField {
        field,
        value: raw.to_string(),
    })
}

fn as_i64_any(v: &Value) -> Option<i64> {
    if let Some(n) = v.as_i64() {
        return Some(n);
    }
    if let Some(f) = v.as_f64() {
        return Some(f.round() as i64);
    }
    v.as_str()?.trim().parse::<i64>().ok()
}

fn as_u32_any(v: &Value) -> Option<u32> {
    let n = as_i64_any(v)?;
    u32::try_from(n).ok()
}
