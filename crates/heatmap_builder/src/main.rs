//! Heatmap Builder CLI
//!
//! Match list → player list → per-period heatmap PNGs

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use heatmap_builder::{resolve_config, write_heatmaps, ConfigOverrides};
#[cfg(feature = "cli")]
use pitch_core::{no_data_message, HeatmapSession, Period};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "heatmap_builder")]
#[command(about = "Render player heatmaps from football tracking data", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct GlobalArgs {
    /// Directory with one sub-directory per match id
    #[arg(long, env = "HEATMAP_DATA_ROOT", global = true)]
    data_root: Option<PathBuf>,

    /// JSON or YAML config file
    #[arg(long, env = "HEATMAP_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Comma-separated match ids (overrides the configured list)
    #[arg(long, value_delimiter = ',', global = true)]
    matches: Option<Vec<String>>,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// List the matches in the catalog
    Matches,

    /// List the selectable players of a match
    Players {
        /// Match id
        #[arg(long = "match")]
        match_id: String,
    },

    /// Render per-period heatmaps for one player
    Render {
        /// Match id
        #[arg(long = "match")]
        match_id: String,

        /// Player trackable object id
        #[arg(long)]
        player: String,

        /// Output directory
        #[arg(long, default_value = "heatmaps")]
        out: PathBuf,

        /// Background pitch image (drawn when omitted)
        #[arg(long)]
        pitch: Option<PathBuf>,

        /// Also write a JSON metadata file per image
        #[arg(long, default_value = "false")]
        metadata: bool,
    },
}

#[cfg(feature = "cli")]
fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "heatmap_builder=info,pitch_core=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let pitch = match &cli.command {
        Commands::Render { pitch, .. } => pitch.clone(),
        _ => None,
    };
    let config = resolve_config(&ConfigOverrides {
        config_file: cli.global.config,
        data_root: cli.global.data_root,
        match_ids: cli.global.matches,
        pitch_image: pitch,
    })?;

    let session = HeatmapSession::from_config(&config).with_context(|| {
        format!("Failed to open match catalog under {}", config.data_root.display())
    })?;

    match cli.command {
        Commands::Matches => {
            for (id, name) in session.list_matches() {
                println!("{id}: {name}");
            }
        }

        Commands::Players { match_id } => {
            let selected = session.select_match(&match_id)?;
            println!("Selected Match: {}", selected.summary.scoreline());

            for (id, label) in session.list_players(&selected) {
                println!("{id}: {label}");
            }
            for anomaly in selected.roster.anomalies() {
                eprintln!(
                    "warning: team id {} matches neither side (trackable object {})",
                    anomaly.raw_team_id,
                    anomaly.trackable_object.as_deref().unwrap_or("-")
                );
            }
        }

        Commands::Render { match_id, player, out, metadata, .. } => {
            let selected = session.select_match(&match_id)?;
            println!("Selected Match: {}", selected.summary.scoreline());

            let heatmaps = session.render_player(&selected, &player)?;
            let report = write_heatmaps(&out, &match_id, &heatmaps, metadata)?;

            for period in report.no_data.iter().filter_map(|&n| Period::from_raw(n as i64)) {
                println!("{}", no_data_message(period));
            }
            for path in &report.images {
                println!("🖼  {}", path.display());
            }
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("heatmap_builder CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
