//! Feed a captured notification event through the pipeline against the
//! real upstream registers. Useful for re-driving an event that was
//! skipped or failed, and for verifying configuration changes.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use notify_client::NotifyApiClient;
use zaakmelder_common::config::{load_config, AppConfig};
use zaakmelder_common::events::NotificationEvent;
use zaakmelder_engine::report::PartyRegisterReporter;
use zaakmelder_engine::{process_event, EngineDeps, ProcessingOutcome, Settings};
use zgw_client::{ZgwClient, ZgwCredentials};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("zaakmelder=info".parse()?))
        .init();

    let mut args = std::env::args().skip(1);
    let usage = "usage: zaakmelder-replay <config.toml> <event.json>";
    let config_path = args.next().map(PathBuf::from).context(usage)?;
    let event_path = args.next().map(PathBuf::from).context(usage)?;

    let app_config = AppConfig::from_env()?;
    let file_config = load_config(&config_path)?;
    let settings = Settings::from_file_config(file_config);

    let raw = std::fs::read_to_string(&event_path)
        .with_context(|| format!("Failed to read event file: {}", event_path.display()))?;
    let event: NotificationEvent =
        serde_json::from_str(&raw).context("Event file is not a valid notification event")?;

    let zgw = Arc::new(ZgwClient::new(ZgwCredentials {
        openzaak_token: app_config.openzaak_api_key.clone(),
        openklant_token: app_config.openklant_api_key.clone(),
        objecten_token: app_config.objecten_api_key.clone(),
        besluiten_token: app_config.besluiten_api_key.clone(),
    }));
    let dispatcher = Arc::new(NotifyApiClient::new(
        settings.services.notify.clone(),
        app_config.notify_api_key.clone(),
    ));
    let reporter = Arc::new(PartyRegisterReporter::new(
        zgw.clone(),
        settings.services.openklant.clone(),
    ));
    let deps = EngineDeps::new(zgw, dispatcher, reporter, Arc::new(settings));

    info!(
        action = %event.action,
        channel = %event.channel,
        resource = %event.resource,
        "Replaying event"
    );

    match process_event(&deps, &event).await {
        Ok(ProcessingOutcome::Sent { scenario, receipts }) => {
            println!("sent ({scenario}): {} notification(s)", receipts.len());
            for receipt in receipts {
                println!("  {} -> {} ({})", receipt.method, receipt.recipient, receipt.id);
            }
        }
        Ok(ProcessingOutcome::NothingToSend { scenario }) => {
            println!("nothing to send ({scenario}): no channel available");
        }
        Ok(ProcessingOutcome::Skipped { scenario, reason }) => {
            println!("skipped ({scenario}): {reason}");
        }
        Err(err) => {
            eprintln!("failed: {err}");
            std::process::exit(1);
        }
    }

    Ok(())
}
