mod file_config;

pub use file_config::{AnalyticsConfig, FileConfig};

use anyhow::{anyhow, bail, Result};
use chrono_tz::Tz;
use std::path::{Path, PathBuf};

pub const DEFAULT_TOP_TRACKS_LIMIT: usize = 50;
pub const DEFAULT_RECENT_EVENTS_LIMIT: usize = 300;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// Civil time zone synthesized timestamps are expressed in
    pub time_zone: Tz,
    pub analytics: AnalyticsSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsSettings {
    pub top_tracks_limit: usize,
    pub recent_events_limit: usize,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            top_tracks_limit: DEFAULT_TOP_TRACKS_LIMIT,
            recent_events_limit: DEFAULT_RECENT_EVENTS_LIMIT,
        }
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| anyhow!("db_path must be specified via --db or in config file"))?;

        // The database file itself is created on first open
        let db_dir = match db_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        if !db_dir.is_dir() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if db_path.is_dir() {
            bail!("db_path is a directory: {:?}", db_path);
        }

        let time_zone = match file.time_zone.or_else(|| cli.time_zone.clone()) {
            Some(name) => parse_time_zone(&name)?,
            None => Tz::UTC,
        };

        let analytics_file = file.analytics.unwrap_or_default();
        let analytics = AnalyticsSettings {
            top_tracks_limit: analytics_file
                .top_tracks_limit
                .unwrap_or(DEFAULT_TOP_TRACKS_LIMIT),
            recent_events_limit: analytics_file
                .recent_events_limit
                .unwrap_or(DEFAULT_RECENT_EVENTS_LIMIT),
        };

        Ok(AppConfig {
            db_path,
            time_zone,
            analytics,
        })
    }
}

fn parse_time_zone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|e| anyhow!("Unknown time zone {:?}: {}", name, e))
}
