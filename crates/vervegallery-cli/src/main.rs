//! VerveGallery CLI - Command-line front end for the gallery stores
//!
//! Provides commands for:
//! - Signing in with Google
//! - Listing photos, recent photos and categories
//! - Uploading photos into a category
//! - Searching photos by face
//! - Inspecting and validating the configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vervegallery_core::config::Config;

mod commands;
mod context;
mod output;

use commands::{
    auth::AuthCommand, categories::CategoriesCommand, completions::CompletionsCommand,
    config::ConfigCommand, face_search::FaceSearchCommand, photo::PhotoCommand,
    photos::PhotosCommand, upload::UploadCommand,
};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "verve", version, about = "Google Drive photo gallery")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Authentication commands
    #[command(subcommand)]
    Auth(AuthCommand),
    /// List photos
    #[command(subcommand)]
    Photos(PhotosCommand),
    /// List gallery categories
    Categories(CategoriesCommand),
    /// Show a single photo's metadata
    Photo(PhotoCommand),
    /// Upload a photo
    Upload(UploadCommand),
    /// Find photos containing a face
    FaceSearch(FaceSearchCommand),
    /// View and validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Generate shell completions
    Completions(CompletionsCommand),
}

/// Options shared by every command
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub format: OutputFormat,
    pub config_path: PathBuf,
    pub quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);

    // Setup tracing: -v wins over the configured level, RUST_LOG over both
    let filter = match (cli.quiet, cli.verbose) {
        (true, _) => "error".to_string(),
        (false, 0) => Config::load_or_default(&config_path).logging.level,
        (false, 1) => "debug".to_string(),
        (false, _) => "trace".to_string(),
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let opts = GlobalOptions {
        format: if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        },
        config_path,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Auth(cmd) => cmd.execute(&opts).await,
        Commands::Photos(cmd) => cmd.execute(&opts).await,
        Commands::Categories(cmd) => cmd.execute(&opts).await,
        Commands::Photo(cmd) => cmd.execute(&opts).await,
        Commands::Upload(cmd) => cmd.execute(&opts).await,
        Commands::FaceSearch(cmd) => cmd.execute(&opts).await,
        Commands::Config(cmd) => cmd.execute(&opts).await,
        Commands::Completions(cmd) => cmd.execute(&opts).await,
    }
}
