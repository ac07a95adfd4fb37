use anyhow::{Context, Result};
use chrono::DateTime;
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use listen_catalog::cli_style::{
    get_styles, print_bar_chart, print_empty_list, print_error, print_key_value,
    print_key_value_highlight, print_section_footer, print_section_header, print_success,
    print_warning, TableBuilder,
};
use listen_catalog::config::{AppConfig, CliConfig, FileConfig};
use listen_catalog::listen_store::{
    AnalyticsReport, ListenAnalytics, SqliteListenStore, TableCounts,
};
use listen_catalog::{run_import, ImportOptions, ImportReport, STUDY_WINDOW};
use std::path::PathBuf;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(
    name = "listen-catalog",
    version = env!("LISTEN_CATALOG_VERSION"),
    about = "Import listening CSV exports into a normalized database and report on them",
    styles = get_styles()
)]
struct CliArgs {
    /// Path to a TOML config file. Its values override the command line.
    #[clap(long, global = true, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite listening database file.
    #[clap(long, global = true, value_parser = parse_path)]
    pub db: Option<PathBuf>,

    /// IANA time zone synthesized timestamps are expressed in (default UTC).
    #[clap(long, global = true)]
    pub time_zone: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a listening CSV export in a single transaction.
    Import {
        /// Path to the CSV file.
        #[clap(value_parser = parse_path)]
        csv_path: PathBuf,

        /// Read at most this many rows (0 = no limit).
        #[clap(long, default_value_t = 0)]
        limit: usize,

        /// Delete all existing data before importing.
        #[clap(long)]
        reset: bool,

        /// Print the run summary as JSON.
        #[clap(long)]
        json: bool,
    },
    /// Show analytics over the imported data.
    Stats {
        /// Print the report as JSON.
        #[clap(long)]
        json: bool,

        /// Number of top tracks to show.
        #[clap(long)]
        top: Option<usize>,

        /// Number of recent events to show.
        #[clap(long)]
        recent: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let cli_config = CliConfig {
        db_path: cli_args.db.clone(),
        time_zone: cli_args.time_zone.clone(),
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Opening listen database at {:?}...", config.db_path);
    let mut store = SqliteListenStore::new(&config.db_path)?;

    match cli_args.command {
        Command::Import {
            csv_path,
            limit,
            reset,
            json,
        } => {
            let options = ImportOptions {
                csv_path,
                limit: Some(limit),
                reset,
                time_zone: config.time_zone,
            };
            match run_import(&mut store, &options, &mut rand::rng()) {
                Ok(report) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&report)?);
                    } else {
                        print_import_report(&report);
                    }
                }
                Err(err) => {
                    error!("Import failed: {}", err);
                    print_error(&format!("Import failed: {}", err));
                    print_error("Nothing was committed, the database is unchanged.");
                    std::process::exit(1);
                }
            }
        }
        Command::Stats { json, top, recent } => {
            let report = store.analytics_report(
                &STUDY_WINDOW,
                top.unwrap_or(config.analytics.top_tracks_limit),
                recent.unwrap_or(config.analytics.recent_events_limit),
            )?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_analytics_report(&report, &config.time_zone);
            }
        }
    }

    Ok(())
}

fn print_import_report(report: &ImportReport) {
    if let Some(deleted) = &report.reset {
        print_warning(&format_reset(deleted));
    }

    print_section_header("Import finished");
    print_key_value("Processed rows", &report.processed.to_string());
    print_key_value("Skipped empty", &report.skipped_empty.to_string());
    print_key_value(
        "Skipped by year",
        &format!("{}  (only {} kept)", report.skipped_year, report.window),
    );
    print_key_value_highlight("Artists created", &report.created.artists.to_string());
    print_key_value_highlight("Albums created", &report.created.albums.to_string());
    print_key_value_highlight("Tracks created", &report.created.tracks.to_string());
    print_key_value_highlight("Events created", &report.created.events.to_string());
    print_section_footer();

    print_success("Import committed");
}

fn format_reset(deleted: &TableCounts) -> String {
    format!(
        "Reset: deleted {} events, {} tracks, {} albums, {} artists, {} users, {} event types",
        deleted.events,
        deleted.tracks,
        deleted.albums,
        deleted.artists,
        deleted.users,
        deleted.event_types
    )
}

fn format_share(share: Option<f64>) -> String {
    match share {
        Some(share) => format!("{:.1}%", share * 100.0),
        None => "n/a".to_string(),
    }
}

fn format_ts(ts: i64, time_zone: &Tz) -> String {
    match DateTime::from_timestamp(ts, 0) {
        Some(utc) => utc
            .with_timezone(time_zone)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        None => ts.to_string(),
    }
}

fn format_organic(is_organic: Option<bool>) -> String {
    match is_organic {
        Some(true) => "yes".to_string(),
        Some(false) => "no".to_string(),
        None => "?".to_string(),
    }
}

fn print_analytics_report(report: &AnalyticsReport, time_zone: &Tz) {
    let summary = &report.summary;

    print_section_header(&format!("Listening {}–{}", summary.year_min, summary.year_max));
    print_key_value("Artists", &summary.artists_count.to_string());
    print_key_value("Albums", &summary.albums_count.to_string());
    print_key_value("Tracks", &summary.tracks_count.to_string());
    print_key_value("Users", &summary.users_count.to_string());
    print_key_value_highlight("Events", &summary.events_count.to_string());
    print_key_value_highlight("Organic share", &format_share(summary.organic_share));
    print_section_footer();

    print_section_header("Events by type");
    if report.events_by_type.is_empty() {
        print_empty_list("No event types");
    } else {
        let mut table = TableBuilder::new(vec!["Type", "Events"]).align_right(1);
        for entry in &report.events_by_type {
            table.add_row(vec![entry.code.clone(), entry.count.to_string()]);
        }
        table.print();
    }

    print_section_header("Top tracks");
    if report.top_tracks.is_empty() {
        print_empty_list("No listens in the window");
    } else {
        let mut table = TableBuilder::new(vec!["#", "Artist", "Track", "Listens"])
            .align_right(0)
            .align_right(3);
        for (rank, track) in report.top_tracks.iter().enumerate() {
            table.add_row(vec![
                (rank + 1).to_string(),
                track.artist.clone(),
                track.title.clone(),
                track.listen_count.to_string(),
            ]);
        }
        table.print();
    }

    print_section_header("Events by year");
    let bars: Vec<(String, u64)> = report
        .events_by_year
        .iter()
        .map(|y| (y.year.to_string(), y.count))
        .collect();
    print_bar_chart(&bars);

    print_section_header("Recent events");
    if report.recent_events.is_empty() {
        print_empty_list("No listens in the window");
    } else {
        let mut table =
            TableBuilder::new(vec!["When", "User", "Type", "Artist", "Track", "Organic"]);
        for event in &report.recent_events {
            table.add_row(vec![
                format_ts(event.ts, time_zone),
                event.user.clone(),
                event.event_type.clone(),
                event.artist.clone(),
                event.track.clone(),
                format_organic(event.is_organic),
            ]);
        }
        table.print();
    }
}
