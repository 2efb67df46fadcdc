mod db;
mod discover;
mod extract;
mod scan;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::db::DbCommands;

#[derive(Debug, Parser)]
#[command(name = "teun")]
#[command(about = "Generate AI search prompts for a business and check who AI assistants recommend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the full discovery pipeline for a website or keyword
    Discover(discover::DiscoverArgs),
    /// Extract a site's page context and inferred keyword profile
    Extract {
        /// Website to read (scheme optional)
        #[arg(long)]
        url: String,
    },
    /// Ask the configured answer engines about ad-hoc prompts
    Scan {
        /// Company to look for in the answers
        #[arg(long)]
        company: String,
        /// Company website, also matched as a mention
        #[arg(long)]
        domain: Option<String>,
        /// Prompts to scan
        #[arg(required = true)]
        prompts: Vec<String>,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("teun: run `teun --help` for available commands");
        return Ok(());
    };

    let config = teun_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Discover(args) => discover::run_discover(&config, &args).await,
        Commands::Extract { url } => extract::run_extract(&config, &url).await,
        Commands::Scan {
            company,
            domain,
            prompts,
        } => scan::run_scan(&config, &company, domain.as_deref(), &prompts).await,
        Commands::Db { command } => db::run_db(&config, &command).await,
    }
}
