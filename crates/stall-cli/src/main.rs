use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use stall_core::config::StallConfig;
use stall_infrastructure::ConfigService;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "stall")]
#[command(about = "STALL - conversational order taking for a breakfast stall", long_about = None)]
struct Cli {
    /// Read configuration from this file instead of ~/.config/stall/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take an order interactively
    Chat {
        /// Session id (a random one is generated if omitted)
        #[arg(long)]
        session: Option<String>,
    },
    /// Feed utterances to one session and print each reply
    Say {
        #[arg(long)]
        session: Option<String>,

        /// Print the order summary as JSON after the last reply
        #[arg(long)]
        summary: bool,

        #[arg(required = true)]
        utterances: Vec<String>,
    },
    /// Inspect submitted orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Print the menu grouped by category
    Menu,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List orders, newest first
    List {
        /// Only orders created on this UTC date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        status: Option<String>,

        #[arg(long, default_value_t = 20)]
        limit: usize,

        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Show one order as JSON
    Show { order_id: String },
}

fn init_tracing(verbose: bool, json: bool) {
    let fallback = if verbose { "stall=debug" } else { "stall=info" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

fn load_config(path: Option<PathBuf>) -> Result<StallConfig> {
    let service = match path {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new().context("Failed to resolve the config directory")?,
    };
    service
        .get_config()
        .with_context(|| format!("Failed to load {}", service.path().display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);
    let config = load_config(cli.config)?;

    match cli.command {
        Commands::Chat { session } => commands::chat::run(&config, session).await?,
        Commands::Say {
            session,
            summary,
            utterances,
        } => commands::say::run(&config, session, &utterances, summary).await?,
        Commands::Orders { action } => match action {
            OrdersAction::List {
                date,
                status,
                limit,
                offset,
            } => commands::orders::list(&config, date, status, limit, offset).await?,
            OrdersAction::Show { order_id } => commands::orders::show(&config, &order_id).await?,
        },
        Commands::Menu => commands::menu::run(&config)?,
    }

    Ok(())
}
