use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rebound_core::{Edge, RefreshConfig, RefreshKind};

mod commands;

#[derive(Parser)]
#[command(name = "rebound")]
#[command(author, version, about = "Pull-to-refresh and load-more controls for scrolling lists")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Read configuration from this file instead of ~/.config/rebound/config.toml
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scroll a paged list in the terminal
    Demo {
        /// Footer behavior
        #[arg(short = 'm', long, value_enum, default_value_t = KindArg::Auto)]
        mode: KindArg,
        /// Simulated load latency in milliseconds
        #[arg(long = "latency-ms")]
        latency_ms: Option<u64>,
        /// Items per loaded page
        #[arg(long = "page-size")]
        page_size: Option<usize>,
    },
    /// Replay an offset script against one component and print each step
    Simulate {
        /// Script file, or - for stdin
        script: PathBuf,
        #[arg(short = 'e', long, value_enum, default_value_t = EdgeArg::Top)]
        edge: EdgeArg,
        #[arg(short = 'k', long, value_enum, default_value_t = KindArg::Pull)]
        kind: KindArg,
        /// Visible container height in points
        #[arg(long, default_value_t = 100.0)]
        height: f64,
        /// Content height in points
        #[arg(long, default_value_t = 400.0)]
        content: f64,
        /// Emit one JSON object per step
        #[arg(long)]
        json: bool,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(short = 'f', long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EdgeArg {
    Top,
    Bottom,
}

impl From<EdgeArg> for Edge {
    fn from(edge: EdgeArg) -> Self {
        match edge {
            EdgeArg::Top => Edge::Top,
            EdgeArg::Bottom => Edge::Bottom,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Pull,
    Auto,
}

impl From<KindArg> for RefreshKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Pull => RefreshKind::Pull,
            KindArg::Auto => RefreshKind::AutoLoad,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(RefreshConfig::config_path);

    match cli.command {
        Some(Commands::Demo {
            mode,
            latency_ms,
            page_size,
        }) => {
            let mut config = RefreshConfig::load_from(&config_path)?;
            if let Some(latency) = latency_ms {
                config.demo.load_latency_ms = latency;
            }
            if let Some(size) = page_size {
                config.demo.page_size = size.max(1);
            }
            commands::demo::run(config, mode.into()).await
        }
        None => {
            let config = RefreshConfig::load_from(&config_path)?;
            commands::demo::run(config, RefreshKind::AutoLoad).await
        }
        Some(Commands::Simulate {
            script,
            edge,
            kind,
            height,
            content,
            json,
        }) => {
            let config = RefreshConfig::load_from(&config_path)?;
            let setup = rebound_core::simulate::Setup {
                edge: edge.into(),
                kind: kind.into(),
                height,
                content_height: content,
            };
            commands::simulate::run(&script, setup, config, json)
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => commands::config::show(&config_path),
            ConfigAction::Path => commands::config::path(&config_path),
            ConfigAction::Init { force } => commands::config::init(&config_path, force),
        },
    }
}
