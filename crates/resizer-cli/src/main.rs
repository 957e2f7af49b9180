//! resizer: ingest image files into a destination directory.
//!
//! Configure with RESIZER_* variables (see `UploadOptions::from_env`) or flags.

use anyhow::Context;
use clap::Parser;
use resizer_cli::{error_body, init_tracing, Cli};
use resizer_core::{LogLevel, UploadOptions};
use serde::Serialize;

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize result")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut options = UploadOptions::from_env().context("Invalid RESIZER_* configuration")?;
    cli.apply(&mut options);

    match cli.run(options).await {
        Ok(outcome) => print_json(&outcome),
        Err(e) => {
            match e.log_level() {
                LogLevel::Debug => tracing::debug!(error = %e, "Upload rejected"),
                LogLevel::Warn => tracing::warn!(error = %e, "Upload rejected"),
                LogLevel::Error => tracing::error!(error = %e, "Upload failed"),
            }
            print_json(&error_body(&e))?;
            std::process::exit(if e.is_rejection() { 2 } else { 1 });
        }
    }
}
