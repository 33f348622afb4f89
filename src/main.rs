//! `pullwatch` entrypoint: reads a check request, prints the versions.

use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use pullwatch::{
    CheckError, CheckRequest, ConfigError, OctocrabGateway, PullwatchConfig, Version, VersionCheck,
};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::debug!(?error, "check failed");
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; stdout carries only the version list.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

async fn run() -> Result<(), CheckError> {
    let config = load_config()?;
    let payload = read_request(config.request.as_deref())?;

    let mut request = CheckRequest::from_json(&payload)?;
    config.apply_to(&mut request);
    let validated = request.validate()?;

    let gateway = OctocrabGateway::for_source(&validated.source)
        .map_err(|source| CheckError::Client { source })?;
    let versions = VersionCheck::new(&gateway).run(&validated).await?;

    write_versions(&versions)
}

/// Loads options from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidOptions`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<PullwatchConfig, ConfigError> {
    PullwatchConfig::load().map_err(|error| ConfigError::InvalidOptions {
        message: error.to_string(),
    })
}

fn read_request(path: Option<&str>) -> Result<String, CheckError> {
    let payload = match path {
        Some(file) => fs::read_to_string(file),
        None => io::read_to_string(io::stdin().lock()),
    };
    payload.map_err(|error| CheckError::Io {
        message: format!("failed to read check request: {error}"),
    })
}

fn write_versions(versions: &[Version]) -> Result<(), CheckError> {
    let rendered = serde_json::to_string(versions).map_err(|error| CheckError::Io {
        message: format!("failed to encode versions: {error}"),
    })?;
    writeln!(io::stdout().lock(), "{rendered}").map_err(|error| CheckError::Io {
        message: error.to_string(),
    })
}
