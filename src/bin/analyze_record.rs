use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use reefscout::action::MatchRecord;
use reefscout::config::{init_tracing, load_dotenv};
use reefscout::match_builder::build_match_statistics;

fn main() -> Result<()> {
    load_dotenv();
    init_tracing();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: analyze_record <match_record.json>")?;
    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let record = MatchRecord::from_json_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    tracing::debug!(match_identity = %record.identity, actions = record.actions.len(), "analyzing record");

    let mut stats = build_match_statistics(&record)?;
    stats.file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    println!(
        "{}",
        serde_json::to_string_pretty(&stats).context("serialize match statistics")?
    );
    Ok(())
}
