use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use maptap_stats::api::state::AppState;
use maptap_stats::calculate::{
    get_aggregations, get_analytics_summary, get_leaderboard, get_player_stats,
    AggregationQuery, LeaderboardQuery,
};
use maptap_stats::config::AppConfig;
use maptap_stats::ingest;
use maptap_stats::storage::{Snapshot, SnapshotStore};

#[derive(Parser)]
#[command(name = "maptap-stats")]
#[command(about = "Score tracker and analytics for the daily MapTap game")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Score CSV path (overrides the config file)
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Import chat-message entries into the score file
    Import {
        /// Text file with one entry per line
        file: PathBuf,

        /// Year for the entry dates
        #[arg(long)]
        year: Option<i32>,

        /// Parse and report but don't write
        #[arg(long)]
        dry_run: bool,
    },

    /// Print a leaderboard
    Leaderboard {
        /// Single date (YYYY-MM-DD); all time when omitted
        #[arg(long)]
        date: Option<String>,

        /// totalScore, avgScore, perfectScores or gamesPlayed
        #[arg(long)]
        sort_by: Option<String>,
    },

    /// Print one player's stats
    Player {
        name: String,
    },

    /// Print the analytics summary
    Summary,

    /// Print period aggregations
    Aggregate {
        /// day, week, month, quarter or year
        #[arg(long, default_value = "day")]
        period: String,

        #[arg(long)]
        start_date: Option<String>,

        #[arg(long)]
        end_date: Option<String>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config {:?}", cli.config))?;
    if let Some(path) = &cli.data_file {
        config.data_file = path.clone();
    }

    // Initialize tracing
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(cli.json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!cli.json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("Starting maptap-stats v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let store = SnapshotStore::open(config.data_file.clone())
                .with_context(|| format!("loading {:?}", config.data_file))?;
            let addr = format!("{}:{}", config.server.host, config.server.port);
            let state = AppState {
                store: Arc::new(store),
                server: Arc::new(config.server),
            };
            let app = maptap_stats::api::build_router(state);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("binding {}", addr))?;
            tracing::info!("Dashboard: http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Import {
            file,
            year,
            dry_run,
        } => {
            let config = config.with_import_year(year)?;
            let report = ingest::import_entries(
                &file,
                &config.data_file,
                config.import.default_year,
                dry_run,
            )
            .with_context(|| format!("importing {:?}", file))?;
            for entry in &report.entries {
                println!("{} {}: {}", entry.date, entry.user, entry.final_score);
            }
            tracing::info!(
                "{} new entries, {} rows written to {:?}",
                report.entries.len(),
                report.rows_written,
                config.data_file
            );
        }
        Commands::Leaderboard { date, sort_by } => {
            let query = LeaderboardQuery::from_params(date.as_deref(), sort_by.as_deref())?;
            let snapshot = Snapshot::load(&config.data_file)?;
            print_json(&get_leaderboard(&snapshot.scores, &query))?;
        }
        Commands::Player { name } => {
            let snapshot = Snapshot::load(&config.data_file)?;
            print_json(&get_player_stats(&snapshot.scores, &name)?)?;
        }
        Commands::Summary => {
            let snapshot = Snapshot::load(&config.data_file)?;
            print_json(&get_analytics_summary(&snapshot.scores))?;
        }
        Commands::Aggregate {
            period,
            start_date,
            end_date,
        } => {
            let query = AggregationQuery::from_params(
                Some(&period),
                start_date.as_deref(),
                end_date.as_deref(),
            )?;
            let snapshot = Snapshot::load(&config.data_file)?;
            print_json(&get_aggregations(&snapshot.scores, &query))?;
        }
    }

    Ok(())
}
