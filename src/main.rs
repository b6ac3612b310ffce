use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use serde_json::Value;

use reefscout::aggregate::{ExcludeFn, team_statistics};
use reefscout::config::{ScoutConfig, init_tracing, load_dotenv};
use reefscout::export::export_team_statistics;
use reefscout::match_stats::MatchStatistics;
use reefscout::report::{
    MatchFilter, attribute_names, available_teams, available_tournament_levels, ranking_tables,
    select_teams,
};
use reefscout::store::RecordStore;
use reefscout::team_stats::TeamStatistics;

const USAGE: &str = "usage: reefscout <command> [options]

commands:
  ingest --file=PATH       store an uploaded record and its statistics
  process                  build statistics for every pending raw record
  records                  list stored records
  teams                    list team numbers with processed matches
  levels                   list tournament levels with processed matches
  attributes               list team statistics attribute names
  stats                    ranked team statistics
  rankings --attr=A,B      ranking tables for the given attributes
  export --out=PATH        write ranked team statistics to an xlsx workbook

scope options (stats, rankings, export):
  --levels=Qualification,Playoff   --matches=1,2,3   --teams=254,6907";

fn main() -> Result<()> {
    load_dotenv();
    init_tracing();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let Some(command) = args.first().map(String::as_str) else {
        eprintln!("{USAGE}");
        return Err(anyhow!("missing command"));
    };
    let cfg = ScoutConfig::from_env();
    let store = RecordStore::new(&cfg);

    match command {
        "ingest" => {
            let path = arg_value(&args, "--file")
                .map(PathBuf::from)
                .context("ingest needs --file=PATH")?;
            let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
            let value: Value =
                serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
            print_json(&store.ingest(value)?)
        }
        "process" => {
            let summary = store.process_pending()?;
            if summary.failed > 0 {
                tracing::warn!(failed = summary.failed, "some records could not be processed");
            }
            print_json(&summary)
        }
        "records" => print_json(&store.list_records()?),
        "teams" => print_json(&available_teams(&store.load_all_match_statistics()?)),
        "levels" => print_json(&available_tournament_levels(&store.load_all_match_statistics()?)),
        "attributes" => print_json(&attribute_names()),
        "stats" => {
            let matches = store.load_all_match_statistics()?;
            print_json(&scoped_teams(&matches, &args))
        }
        "rankings" => {
            let attributes = arg_value(&args, "--attr")
                .map(|raw| parse_list(&raw))
                .filter(|list| !list.is_empty())
                .context("rankings needs --attr=NAME[,NAME...]")?;
            let matches = store.load_all_match_statistics()?;
            print_json(&ranking_tables(&scoped_teams(&matches, &args), &attributes))
        }
        "export" => {
            let out = arg_value(&args, "--out")
                .map(PathBuf::from)
                .context("export needs --out=PATH")?;
            let matches = store.load_all_match_statistics()?;
            let report = export_team_statistics(&out, &scoped_teams(&matches, &args))?;
            println!(
                "Exported {} teams, {} metrics, {} ranking rows to {}",
                report.teams,
                report.metrics,
                report.ranking_rows,
                out.display()
            );
            Ok(())
        }
        "help" | "--help" | "-h" => {
            println!("{USAGE}");
            Ok(())
        }
        other => {
            eprintln!("{USAGE}");
            Err(anyhow!("unknown command: {other}"))
        }
    }
}

/// Aggregate and rank over the requested levels and matches, then keep the
/// requested teams.
fn scoped_teams(matches: &[MatchStatistics], args: &[String]) -> Vec<TeamStatistics> {
    let filter = MatchFilter {
        tournament_levels: arg_value(args, "--levels")
            .map(|raw| parse_list(&raw))
            .unwrap_or_default(),
        match_nos: arg_value(args, "--matches")
            .map(|raw| parse_ids(&raw))
            .unwrap_or_default(),
    };
    let team_nos = arg_value(args, "--teams")
        .map(|raw| parse_ids(&raw))
        .unwrap_or_default();

    let exclude: ExcludeFn<'_> = &|m: &MatchStatistics| filter.excludes(m);
    let teams = team_statistics(matches, (!filter.is_empty()).then_some(exclude));
    select_teams(teams, &team_nos)
}

/// `--key=value` or `--key value`.
fn arg_value(args: &[String], key: &str) -> Option<String> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(key).and_then(|rest| rest.strip_prefix('=')) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == key {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_ids(raw: &str) -> Vec<u32> {
    raw.split([',', ';', ' '])
        .filter_map(|part| part.trim().parse::<u32>().ok())
        .collect()
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{out}");
    Ok(())
}
