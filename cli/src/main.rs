//! CLI for the repository notifier.
//!
//! Polls a GitHub account and posts new and updated repository
//! notifications to a Discord channel until interrupted.

use clap::Parser;
use repo_notifier::{CycleSummary, Runner, RunnerConfig, RunnerError, SkipReason};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Repository Notifier - Announce new and updated GitHub repositories on Discord.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the settings file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Discord bot token.
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    discord_token: Option<String>,

    /// GitHub Personal Access Token. Unauthenticated requests are heavily rate limited.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// GitHub API root, for GitHub Enterprise.
    #[arg(long)]
    github_api_url: Option<String>,

    /// Discord API root.
    #[arg(long, default_value = repo_notifier::chat::DEFAULT_API_BASE)]
    discord_api_url: String,

    /// Log notifications instead of posting them.
    #[arg(long)]
    dry_run: bool,

    /// Run a single cycle and exit.
    #[arg(long)]
    once: bool,

    /// Milliseconds a settings file change must settle before it is reloaded.
    #[arg(long, default_value_t = 500)]
    reload_debounce_ms: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    // Ignoring the error: a provider may already be installed by a dependency.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let args = Args::parse();
    let once = args.once;

    let runner = match build_runner(args) {
        Ok(runner) => runner,
        Err(e) => {
            error!(error = %e, "Critical failure");
            return ExitCode::from(2);
        }
    };

    if once {
        let summary = runner.run_once().await;
        print_summary(&summary);
        return if summary.has_failures() {
            ExitCode::from(1)
        } else {
            ExitCode::from(0)
        };
    }

    tokio::select! {
        _ = runner.run() => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!(error = %e, "Failed to listen for shutdown signal");
                return ExitCode::from(2);
            }
            info!("Shutting down");
        }
    }

    ExitCode::from(0)
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

fn build_runner(args: Args) -> Result<Runner, RunnerError> {
    let mut config = RunnerConfig::new(args.config, args.discord_token, args.dry_run)
        .with_discord_api_url(args.discord_api_url)
        .with_reload_debounce(Duration::from_millis(args.reload_debounce_ms));
    if let Some(token) = args.github_token {
        config = config.with_github_token(token);
    }
    if let Some(api_url) = args.github_api_url {
        config = config.with_github_api_url(api_url);
    }
    Runner::new(config)
}

/// Prints the summary of a single cycle.
fn print_summary(summary: &CycleSummary) {
    println!("\nSummary:");
    match &summary.skipped {
        Some(SkipReason::NoAccount) => println!("  Skipped: no GitHub account configured"),
        Some(SkipReason::NoChannel) => println!("  Skipped: no Discord channel configured"),
        Some(SkipReason::FetchFailed { error }) => println!("  Skipped: fetch failed ({error})"),
        None => {
            println!("  Repositories fetched: {}", summary.fetched);
            println!("  Announced: {}", summary.announced);
            println!("  Edited: {}", summary.edited);
            println!("  Reposted: {}", summary.reposted);
            println!("  Recorded: {}", summary.recorded);
            println!("  Unchanged: {}", summary.unchanged);
            println!("  Failed: {}", summary.failed);
            println!("  Evicted: {}", summary.evicted);
        }
    }
}
