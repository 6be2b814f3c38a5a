// File: shutter/src/main.rs
use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use shutter::cli::{Cli, OutputFormat};
use shutter::config::{resolve_region, ConfigManager};
use shutter::http::InstanceMetadataClient;
use shutter::signals::SignalWatcher;
use shutter::snapshot::Credentials;
use shutter::{CommandFreezer, Ec2SnapshotClient, Orchestrator, RunContext, ShutterError, TargetSet};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.debug) {
        eprintln!("Failed to initialise logging: {}", e);
    }

    match run(cli).await {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn init_logging(debug: bool) -> Result<()> {
    let level = if debug { "shutter=debug" } else { "shutter=info" };

    let env_filter = EnvFilter::from_default_env()
        .add_directive(level.parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    // stdout is reserved for --output json
    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

async fn run(cli: Cli) -> Result<i32, ShutterError> {
    let settings = ConfigManager::new(&cli).await?.into_settings();

    // Input errors must surface before any network call or freeze
    let targets = TargetSet::build(&settings.volumes, &settings.descriptions)?;

    let metadata = InstanceMetadataClient::new()?;
    let region = resolve_region(settings.region.as_deref(), &metadata).await?;
    info!("✓ Backing up volumes in {} region", region);

    let credentials = Credentials::resolve(&metadata).await?;
    let backend = match &settings.endpoint {
        Some(endpoint) => Ec2SnapshotClient::with_endpoint(endpoint, &region, credentials)?,
        None => Ec2SnapshotClient::new(&region, credentials)?,
    };

    if settings.partitions.is_empty() {
        warn!("No partitions given, snapshots will only be crash-consistent at the block level");
    }

    // SIGINT/SIGTERM are swallowed from here on so the thaw phase always runs
    let _signals = match SignalWatcher::spawn() {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            warn!("Cannot listen for termination signals: {}", e);
            None
        }
    };

    let ctx = RunContext::new(settings.debug).with_region(&region);
    let orchestrator = Orchestrator::new(
        Arc::new(CommandFreezer::from(settings.freeze_tool)),
        Arc::new(backend),
    );

    let report = orchestrator
        .execute(&ctx, targets, settings.partitions.clone())
        .await;
    report.log_summary();

    if settings.output == OutputFormat::Json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| ShutterError::Other(format!("Failed to serialize report: {}", e)))?;
        println!("{}", json);
    }

    Ok(report.exit_code(settings.strict))
}
