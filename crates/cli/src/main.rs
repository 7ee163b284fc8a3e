use std::process::ExitCode;

use clap::Parser;

mod commands;
mod config;
mod error;

use crate::error::Result;

#[derive(Debug, Parser)]
#[command(name = "campuscash", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:5000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override the directory holding persisted session state.
    #[arg(long)]
    state_dir: Option<String>,
    #[command(subcommand)]
    command: commands::Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // The single place errors become user-visible output.
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let settings = config::load(args.config.as_deref(), args.base_url, args.state_dir)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "campuscash={level},client={level},cache={level}",
            level = settings.level
        ))
        .init();

    tracing::info!("using backend at {}", settings.base_url);

    let ctx = commands::Context::new(&settings)?;
    commands::run(&ctx, args.command).await
}
