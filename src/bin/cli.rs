//! ARCA Agent CLI
//!
//! Analyzes one failed GitHub Actions run and mails the diagnosis.

use std::path::PathBuf;
use std::process::ExitCode;

use arca::{
    error::Result,
    models::{Config, Credentials, RunTarget},
    pipeline,
};
use clap::Parser;

/// ARCA Agent: Automated Root Cause Analysis
#[derive(Parser, Debug)]
#[command(name = "arca", version, about = "Automated Root Cause Analysis")]
struct Cli {
    /// The GitHub Action Run ID to analyze
    #[arg(long)]
    run_id: u64,

    /// The full 'owner/repo' name
    #[arg(long)]
    repo: String,

    /// GitHub Personal Access Token
    #[arg(long)]
    token: String,

    /// Google Gemini API Key
    #[arg(long)]
    gemini_key: String,

    /// Address to send from (also the SMTP login)
    #[arg(long)]
    smtp_user: String,

    /// SMTP password or app password
    #[arg(long)]
    smtp_pass: String,

    /// Recipient email address
    #[arg(long)]
    to_email: String,

    /// Optional TOML configuration file
    #[arg(short, long, default_value = "arca.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    let config = Config::load_or_default(&cli.config);
    config.validate()?;

    let target = RunTarget::new(cli.repo, cli.run_id)?;
    let credentials = Credentials {
        github_token: cli.token,
        gemini_key: cli.gemini_key,
        smtp_user: cli.smtp_user,
        smtp_pass: cli.smtp_pass,
        recipient: cli.to_email,
    };

    let report = pipeline::run_analysis(config, credentials, &target).await?;
    Ok(report.exit_code())
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("ARCA Agent Initialized!");

    match run(cli).await {
        Ok(0) => ExitCode::SUCCESS,
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
