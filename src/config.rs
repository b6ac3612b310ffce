use std::env;
use std::path::PathBuf;

const DEFAULT_RECORDS_DIR: &str = "match_records";
const DEFAULT_PARALLELISM: usize = 4;

/// Where records live and how many worker threads the store may use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoutConfig {
    pub records_dir: PathBuf,
    pub raw_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub parallelism: usize,
}

impl ScoutConfig {
    /// Directory layout rooted at `records_dir`, default parallelism.
    pub fn rooted_at(records_dir: impl Into<PathBuf>) -> Self {
        let records_dir = records_dir.into();
        Self {
            raw_dir: records_dir.join("raw"),
            processed_dir: records_dir.join("processed"),
            records_dir,
            parallelism: DEFAULT_PARALLELISM,
        }
    }

    pub fn from_env() -> Self {
        let records_dir = env::var("SCOUT_RECORDS_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RECORDS_DIR));
        let mut cfg = Self::rooted_at(records_dir);
        if let Some(dir) = path_env("SCOUT_RAW_DIR") {
            cfg.raw_dir = dir;
        }
        if let Some(dir) = path_env("SCOUT_PROCESSED_DIR") {
            cfg.processed_dir = dir;
        }
        cfg.parallelism = env::var("SCOUT_PARALLELISM")
            .ok()
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_PARALLELISM)
            .clamp(1, 32);
        cfg
    }
}

/// `.env.local` wins over `.env`; both are optional.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

/// Log to stderr so stdout stays machine-readable. `SCOUT_LOG` takes an
/// env-filter directive, default `info`.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("SCOUT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn path_env(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}
