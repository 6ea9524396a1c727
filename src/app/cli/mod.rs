//! CLI Adapter.

mod dashboard;
mod forms;
mod track;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::app::api::{self, LiveContext};
use crate::app::content::fetch_content;
use crate::domain::{AppError, ContentResource, FormKind, PlayerState, load_config};

const LOG_FILTER_ENV: &str = "ONAIR_LOG";
const LOG_JSON_ENV: &str = "ONAIR_LOG_JSON";

#[derive(Parser)]
#[command(name = "onair")]
#[command(version)]
#[command(
    about = "Drive the radio station website flows against its backend",
    long_about = None
)]
struct Cli {
    /// Config file (defaults to ./onair.toml, or $ONAIR_CONFIG)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send visitor or click telemetry
    #[clap(visible_alias = "t")]
    Track {
        #[command(subcommand)]
        command: track::TrackCommands,
    },
    /// Submit the contact form
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        message: String,
    },
    /// Submit a donation (fields as name=value)
    Donate {
        #[arg(short, long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,
    },
    /// Submit a pledge (fields as name=value)
    Pledge {
        #[arg(short, long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,
    },
    /// Subscribe to the newsletter
    Newsletter {
        #[arg(long)]
        email: String,
    },
    /// Print a content resource as JSON
    Content {
        /// Resource name (see --list)
        #[arg(required_unless_present = "list")]
        resource: Option<String>,
        /// List available resources
        #[arg(long)]
        list: bool,
    },
    /// Load the Listen Live page and start the stream
    Listen,
    /// Presenter dashboard
    #[clap(visible_alias = "d")]
    Dashboard {
        #[command(subcommand)]
        command: dashboard::DashboardCommands,
    },
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    init_tracing();

    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(AppError::from)
        .and_then(|runtime| runtime.block_on(dispatch(cli)));

    match result {
        Ok(exit_code) => {
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn dispatch(cli: Cli) -> Result<i32, AppError> {
    if let Commands::Content { list: true, .. } = cli.command {
        for resource in ContentResource::ALL {
            println!("{:<24} {}", resource.name(), resource.path());
        }
        return Ok(0);
    }

    let config = load_config(cli.config.as_deref())?;
    let ctx = api::connect(config)?;

    match cli.command {
        Commands::Track { command } => track::run_track(&ctx, command).await.map(|_| 0),
        Commands::Contact { name, email, subject, message } => {
            forms::run_contact(&ctx, name, email, subject, message).await
        }
        Commands::Donate { fields } => {
            forms::run_form(&ctx, FormKind::Donation, &fields).await
        }
        Commands::Pledge { fields } => {
            forms::run_form(&ctx, FormKind::Pledge, &fields).await
        }
        Commands::Newsletter { email } => forms::run_newsletter(&ctx, email).await,
        Commands::Content { resource, .. } => run_content(&ctx, resource).await.map(|_| 0),
        Commands::Listen => run_listen(&ctx).await,
        Commands::Dashboard { command } => dashboard::run_dashboard(&ctx, command).await,
    }
}

async fn run_content(ctx: &LiveContext, resource: Option<String>) -> Result<(), AppError> {
    let name = resource.unwrap_or_default();
    let resource = ContentResource::from_name(&name)?;
    let value = fetch_content(ctx.backend().as_ref(), resource).await?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

async fn run_listen(ctx: &LiveContext) -> Result<i32, AppError> {
    let mut page = api::mount_listen_live(ctx).await?;

    if page.programs().is_empty() {
        println!("No programs listed");
    } else {
        println!("Programs:");
        for program in page.programs() {
            match &program.host {
                Some(host) => println!("  • {} (with {})", program.title, host),
                None => println!("  • {}", program.title),
            }
        }
    }

    let state = page.play().await.clone();
    match state {
        PlayerState::Playing => {
            println!("✅ Playing {}", page.stream_url());
            Ok(0)
        }
        other => {
            eprintln!("Player {}", other);
            Ok(1)
        }
    }
}

/// Structured logging to stderr. `ONAIR_LOG` (or `RUST_LOG`) sets the filter.
///
/// Returns `false` when a global subscriber was already installed; that one
/// stays in place.
fn init_tracing() -> bool {
    let filter = std::env::var(LOG_FILTER_ENV)
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    let json = std::env::var(LOG_JSON_ENV).is_ok_and(|value| value == "1" || value == "true");

    let installed = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    match installed {
        Ok(()) => true,
        Err(err) => {
            tracing::debug!(error = %err, "keeping existing tracing subscriber");
            false
        }
    }
}
