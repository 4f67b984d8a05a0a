//! SMS classifier load generator entrypoint.
//!
//! Environment:
//! - `.env` values loaded at startup
//! - `ISTIO_URL`, `CANARY_URL` override the target deployments
//! - `SMS_CORPUS` overrides the corpus path
//! - `RUST_LOG` controls diagnostic logging on stderr

use anyhow::{Context, Result};
use sms_spam_load::client::SmsClient;
use sms_spam_load::sig_down::SigDown;
use sms_spam_load::{telemetry, Config, LoadRun, MessagePool};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from CLI args and environment
    let config = Config::load()?;

    telemetry::init_tracing();

    let pool = MessagePool::from_file(&config.corpus, config.run.unique_message_cap)
        .context("Failed to load SMS corpus")?;
    let client = SmsClient::new().context("Failed to build HTTP client")?;

    // Must be registered before the first status line is printed
    let sig_down = SigDown::try_new().context("Failed to install signal handlers")?;

    let run = LoadRun::new(config.run, &config.env, pool, client);
    let report = run.run(sig_down.recv()).await;
    tracing::debug!(
        workers = report.workers.len(),
        attempted = report.total_attempted(),
        "Load run complete"
    );

    Ok(())
}
