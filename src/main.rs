mod config;
mod error;
mod model;
mod providers;
mod remover;
mod status;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use config::{AmbientContext, EnvInputs, InputSource, Inputs};
use error::Result;
use providers::github::GitHubClient;
use remover::Outcome;
use status::{ActionsStatus, StatusSink};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let status = ActionsStatus;
    match execute(&EnvInputs, &status).await {
        Ok(outcome) => {
            tracing::debug!(?outcome, "run finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            status.failed(&format!("❌ Action failed with error: {err:#}"));
            ExitCode::FAILURE
        }
    }
}

/// Validates all inputs before the client exists, so configuration
/// errors never reach the network.
async fn execute(source: &dyn InputSource, status: &dyn StatusSink) -> Result<Outcome> {
    let ambient = AmbientContext::from_env()?;
    let inputs = Inputs::resolve(source, &ambient)?;
    let client = GitHubClient::from_env(inputs.token.clone())?;
    remover::run(&inputs, &client, &client, status).await
}
