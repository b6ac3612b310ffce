use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;

use crate::action::MatchRecord;
use crate::config::ScoutConfig;
use crate::match_builder::build_match_statistics;
use crate::match_stats::MatchStatistics;

const FILE_PREFIX: &str = "match_record_";
const FILE_SUFFIX: &str = ".json";
const REQUIRED_FIELDS: &[&str] = &["teamNo", "matchNumber", "eventCode"];
const UNKNOWN_LEVEL: &str = "Unknown";

/// `match_record_{event}_{team}_{level}_{match}_{timestamp_ms}.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordFileName {
    pub event_code: String,
    pub team_no: u32,
    pub tournament_level: String,
    pub match_no: u32,
    pub timestamp: i64,
}

impl RecordFileName {
    /// Event codes may contain underscores; the team number is taken from the
    /// last all-digit segment that still leaves a tournament level after it.
    pub fn parse(name: &str) -> Option<Self> {
        let body = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_SUFFIX)?;
        let (rest, timestamp) = body.rsplit_once('_')?;
        let (rest, match_no) = rest.rsplit_once('_')?;
        let timestamp = parse_digits::<i64>(timestamp)?;
        let match_no = parse_digits::<u32>(match_no)?;

        let parts: Vec<&str> = rest.split('_').collect();
        if parts.len() < 3 {
            return None;
        }
        let team_at = (1..parts.len() - 1)
            .rev()
            .find(|&i| parse_digits::<u32>(parts[i]).is_some())?;
        Some(Self {
            event_code: parts[..team_at].join("_"),
            team_no: parse_digits(parts[team_at])?,
            tournament_level: parts[team_at + 1..].join("_"),
            match_no,
            timestamp,
        })
    }

    pub fn file_name(&self) -> String {
        format!(
            "{FILE_PREFIX}{}_{}_{}_{}_{}{FILE_SUFFIX}",
            self.event_code, self.team_no, self.tournament_level, self.match_no, self.timestamp
        )
    }

    /// Practice < Qualification < Playoff; anything else sorts first.
    pub fn level_weight(&self) -> u8 {
        match self.tournament_level.as_str() {
            "Practice" => 1,
            "Qualification" => 2,
            "Playoff" => 3,
            _ => 0,
        }
    }
}

impl fmt::Display for RecordFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

fn parse_digits<T: std::str::FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedRecord {
    pub file_name: String,
    pub received_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessSummary {
    pub processed: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

/// Raw uploads and their processed statistics, one JSON file each, sharing a
/// file name across the two directories.
#[derive(Debug, Clone)]
pub struct RecordStore {
    raw_dir: PathBuf,
    processed_dir: PathBuf,
    parallelism: usize,
}

impl RecordStore {
    pub fn new(cfg: &ScoutConfig) -> Self {
        Self {
            raw_dir: cfg.raw_dir.clone(),
            processed_dir: cfg.processed_dir.clone(),
            parallelism: cfg.parallelism,
        }
    }

    pub fn raw_dir(&self) -> &Path {
        &self.raw_dir
    }

    pub fn processed_dir(&self) -> &Path {
        &self.processed_dir
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.raw_dir, &self.processed_dir] {
            fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        }
        Ok(())
    }

    /// Store an uploaded record, then build and store its statistics. The raw
    /// file is kept even when the build fails, so the record stays pending.
    pub fn ingest(&self, raw: Value) -> Result<SavedRecord> {
        let (saved, stored) = self.save_raw_record(raw)?;
        let stats = build_stored(&saved.file_name, &stored)?;
        self.save_match_statistics(&saved.file_name, &stats)?;
        tracing::info!(file = %saved.file_name, "saved match record");
        Ok(saved)
    }

    /// Write the raw upload under a fresh record file name, stamped with the
    /// server receive time. Returns the name and the value as written.
    pub fn save_raw_record(&self, mut raw: Value) -> Result<(SavedRecord, Value)> {
        let missing: Vec<&str> = REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|f| raw.get(*f).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(anyhow!("missing required fields: {}", missing.join(", ")));
        }

        let identity = MatchRecord::identity_from_value(&raw).context("invalid match record header")?;
        check_name_segment("eventCode", &identity.event_code)?;
        check_name_segment("tournamentLevel", &identity.tournament_level)?;
        let now = Utc::now();
        let name = RecordFileName {
            tournament_level: if identity.tournament_level.is_empty() {
                UNKNOWN_LEVEL.to_string()
            } else {
                identity.tournament_level
            },
            event_code: identity.event_code,
            team_no: identity.team_no,
            match_no: identity.match_no,
            timestamp: now.timestamp_millis(),
        };
        let file_name = name.file_name();
        let received_at = now.to_rfc3339();

        let obj = raw
            .as_object_mut()
            .ok_or_else(|| anyhow!("match record must be a JSON object"))?;
        obj.insert("serverReceivedTimestamp".to_string(), Value::String(received_at.clone()));
        obj.insert("filename".to_string(), Value::String(file_name.clone()));

        self.ensure_dirs()?;
        write_json_atomic(&self.raw_dir.join(&file_name), &raw)?;
        Ok((
            SavedRecord {
                file_name,
                received_at,
            },
            raw,
        ))
    }

    pub fn save_match_statistics(&self, file_name: &str, stats: &MatchStatistics) -> Result<()> {
        fs::create_dir_all(&self.processed_dir)
            .with_context(|| format!("create {}", self.processed_dir.display()))?;
        write_json_atomic(&self.processed_dir.join(file_name), stats)
    }

    /// Raw records with no processed counterpart, sorted by file name.
    pub fn pending(&self) -> Result<Vec<String>> {
        let processed: HashSet<String> = json_files(&self.processed_dir)?.into_iter().collect();
        let mut pending: Vec<String> = json_files(&self.raw_dir)?
            .into_iter()
            .filter(|name| !processed.contains(name))
            .collect();
        pending.sort();
        Ok(pending)
    }

    /// Build statistics for every pending raw record. A record that fails is
    /// reported in the summary and left pending; the rest still get written.
    pub fn process_pending(&self) -> Result<ProcessSummary> {
        let pending = self.pending()?;
        if pending.is_empty() {
            return Ok(ProcessSummary::default());
        }
        tracing::info!(count = pending.len(), threads = self.parallelism, "processing pending records");

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.parallelism)
            .build()
            .ok();
        let results: Vec<(String, Result<()>)> = with_pool(&pool, || {
            pending
                .par_iter()
                .map(|name| (name.clone(), self.process_one(name)))
                .collect()
        });

        let mut summary = ProcessSummary::default();
        for (name, result) in results {
            match result {
                Ok(()) => summary.processed += 1,
                Err(err) => {
                    let reason = format!("{err:#}");
                    tracing::warn!(file = %name, error = %reason, "failed to process record");
                    summary.failed += 1;
                    summary.errors.push(format!("{name}: {reason}"));
                }
            }
        }
        Ok(summary)
    }

    fn process_one(&self, file_name: &str) -> Result<()> {
        let path = self.raw_dir.join(file_name);
        let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        let value: Value =
            serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
        let stats = build_stored(file_name, &value)?;
        self.save_match_statistics(file_name, &stats)
    }

    /// Every processed record. Unreadable files are logged and skipped.
    pub fn load_all_match_statistics(&self) -> Result<Vec<MatchStatistics>> {
        let mut names = json_files(&self.processed_dir)?;
        names.sort();
        let mut out = Vec::with_capacity(names.len());
        for name in names {
            match self.load_match_statistics(&name) {
                Ok(stats) => out.push(stats),
                Err(err) => {
                    let reason = format!("{err:#}");
                    tracing::error!(file = %name, error = %reason, "skipping unreadable record");
                }
            }
        }
        tracing::debug!(count = out.len(), "loaded match statistics");
        Ok(out)
    }

    pub fn load_match_statistics(&self, file_name: &str) -> Result<MatchStatistics> {
        let path = self.processed_dir.join(file_name);
        let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        let mut stats: MatchStatistics =
            serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
        stamp(&mut stats, file_name);
        Ok(stats)
    }

    /// Records present in both directories, ordered by tournament level,
    /// match number, then upload time.
    pub fn list_records(&self) -> Result<Vec<RecordFileName>> {
        let processed: HashSet<String> = json_files(&self.processed_dir)?.into_iter().collect();
        let mut records: Vec<RecordFileName> = json_files(&self.raw_dir)?
            .into_iter()
            .filter(|name| processed.contains(name))
            .filter_map(|name| RecordFileName::parse(&name))
            .collect();
        records.sort_by_key(|r| (r.level_weight(), r.match_no, r.timestamp));
        Ok(records)
    }
}

/// Header text ends up inside a file name; keep it from naming another
/// directory.
fn check_name_segment(field: &str, value: &str) -> Result<()> {
    if value.contains(['/', '\\', '\0']) || value.contains("..") {
        return Err(anyhow!("{field} is not usable in a file name: {value:?}"));
    }
    Ok(())
}

fn build_stored(file_name: &str, raw: &Value) -> Result<MatchStatistics> {
    let record = MatchRecord::from_value(raw);
    let mut stats = build_match_statistics(&record)?;
    stamp(&mut stats, file_name);
    Ok(stats)
}

fn stamp(stats: &mut MatchStatistics, file_name: &str) {
    stats.file_name = file_name.to_string();
    if let Some(parsed) = RecordFileName::parse(file_name) {
        stats.timestamp = parsed.timestamp;
    }
}

fn with_pool<T>(pool: &Option<rayon::ThreadPool>, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    if let Some(pool) = pool.as_ref() {
        pool.install(action)
    } else {
        action()
    }
}

fn json_files(dir: &Path) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("list {}", dir.display()))? {
        let entry = entry.with_context(|| format!("list {}", dir.display()))?;
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if name.ends_with(FILE_SUFFIX) {
            out.push(name);
        }
    }
    Ok(out)
}

fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize json")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("rename into {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_file_name() {
        let parsed = RecordFileName::parse("match_record_CNSH_6907_Qualification_12_1712345678901.json")
            .expect("valid name");
        assert_eq!(parsed.event_code, "CNSH");
        assert_eq!(parsed.team_no, 6907);
        assert_eq!(parsed.tournament_level, "Qualification");
        assert_eq!(parsed.match_no, 12);
        assert_eq!(parsed.timestamp, 1_712_345_678_901);
        assert_eq!(
            parsed.file_name(),
            "match_record_CNSH_6907_Qualification_12_1712345678901.json"
        );
    }

    #[test]
    fn event_code_may_contain_underscores_and_digits() {
        let parsed = RecordFileName::parse("match_record_2025_CN_SH_254_Playoff_3_99.json").expect("valid name");
        assert_eq!(parsed.event_code, "2025_CN_SH");
        assert_eq!(parsed.team_no, 254);
        assert_eq!(parsed.tournament_level, "Playoff");
    }

    #[test]
    fn rejects_foreign_names() {
        assert!(RecordFileName::parse("notes.json").is_none());
        assert!(RecordFileName::parse("match_record_E_1_Practice_x_5.json").is_none());
        assert!(RecordFileName::parse("match_record_E_Practice_2_5.json").is_none());
        assert!(RecordFileName::parse("match_record_E_1_Practice_2_5.json.tmp").is_none());
    }

    #[test]
    fn name_segments_stay_inside_the_directory() {
        assert!(check_name_segment("eventCode", "2025_CN_SH").is_ok());
        assert!(check_name_segment("eventCode", "a/b").is_err());
        assert!(check_name_segment("eventCode", "a\\b").is_err());
        assert!(check_name_segment("tournamentLevel", "..").is_err());
    }

    #[test]
    fn unknown_levels_weigh_least() {
        let mut r = RecordFileName::parse("match_record_E_1_Practice_2_5.json").expect("valid name");
        assert_eq!(r.level_weight(), 1);
        r.tournament_level = "Scrimmage".to_string();
        assert_eq!(r.level_weight(), 0);
    }
}
