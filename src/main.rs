//! CLI entry point for postline

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use postline::{Mode, Site};

#[derive(Parser)]
#[command(name = "postline")]
#[command(version)]
#[command(about = "Front-matter, ordering and rendering for a markdown blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Build mode; development includes drafts
    #[arg(
        short,
        long,
        global = true,
        env = "POSTLINE_MODE",
        default_value = "production"
    )]
    mode: Mode,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the most recent posts
    #[command(alias = "ls")]
    List {
        /// Number of posts (defaults to `recent_posts` from the config)
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Render a single post
    Show {
        /// Post slug, with or without the leading `/`
        slug: String,

        /// Print JSON instead of HTML
        #[arg(long)]
        json: bool,
    },

    /// Print every route to pre-generate
    Paths,

    /// Validate all posts
    Check,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "postline=debug,info"
    } else {
        "postline=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };

    match cli.command {
        Commands::List { limit, json } => {
            let site = Site::new(&base_dir)?;
            postline::commands::list::run(&site, cli.mode, limit, json).await?;
        }

        Commands::Show { slug, json } => {
            let site = Site::new(&base_dir)?;
            postline::commands::show::run(&site, cli.mode, &slug, json).await?;
        }

        Commands::Paths => {
            let site = Site::new(&base_dir)?;
            postline::commands::paths::run(&site, cli.mode).await?;
        }

        Commands::Check => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Checking posts in {:?}", site.posts_dir);
            postline::commands::check::run(&site, cli.mode).await?;
        }

        Commands::Version => {
            println!("postline version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
