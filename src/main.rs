use std::fs::File;
use std::io::Read as _;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use btleplug::api::Manager as _;
use btleplug::platform::{Adapter, Manager};
use clap::Parser;
use log::{debug, error, info, warn};

mod clock;
mod config;
mod identity;
mod presence;
mod relay;
mod report;
mod scanner;
mod session;

#[derive(Parser, Debug)]
#[command(about = "BLE presence logger with relay control")]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();

    let mut file = File::open(&args.config)
        .with_context(|| format!("opening config file {}", args.config.display()))?;
    let mut config_contents = String::new();
    file.read_to_string(&mut config_contents)?;
    let config: config::AppConfig = toml::de::from_str(&config_contents)?;

    let identities = identity::IdentityTable::new(&config.devices)?;
    if identities.is_empty() {
        warn!("Device whitelist is empty, no sessions will ever start");
    }
    info!("Tracking {} known devices", identities.len());

    let reporter = report::ReportClient::new(&config.report)?;
    let relay = relay::GpioRelay::new(&config.relay.gpio_value_path);
    let clock = clock::SystemClock;

    // Startup is the only place where blocking retries are acceptable; in
    // steady state nothing is allowed to stall the relay.
    let central = wait_for_adapter().await;
    clock::wait_for_sync(&clock).await;

    let scan = config.scan.unwrap_or_default();
    let scanner = scanner::Scanner::new(
        central,
        scan.window(),
        scan.manufacturer.as_ref().map(|m| m.company_ids()),
    );

    let mut tracker = presence::PresenceTracker::new(Box::new(relay), Box::new(clock));

    run_loop(
        &scanner,
        &identities,
        &mut tracker,
        &reporter,
        scan.cycle_delay(),
    )
    .await
}

async fn wait_for_adapter() -> Adapter {
    loop {
        match first_adapter().await {
            Ok(adapter) => return adapter,
            Err(err) => {
                info!("Waiting for Bluetooth adapter: {err:?}");
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
    }
}

async fn first_adapter() -> Result<Adapter, btleplug::Error> {
    let manager = Manager::new().await?;
    let adapters = manager.adapters().await?;
    adapters
        .into_iter()
        .next()
        .ok_or(btleplug::Error::DeviceNotFound)
}

async fn run_loop(
    scanner: &scanner::Scanner,
    identities: &identity::IdentityTable,
    tracker: &mut presence::PresenceTracker,
    reporter: &report::ReportClient,
    cycle_delay: Duration,
) -> anyhow::Result<()> {
    loop {
        match scanner.scan_cycle().await {
            Ok(detections) => {
                // Resolve each advertisement in scan order; when several
                // known devices show up in one window, the last one
                // processed wins and earlier ones go unreported.
                let user = detections
                    .iter()
                    .filter_map(|uuid| identities.resolve(uuid))
                    .last();

                if let Some(record) = tracker.observe(user) {
                    reporter.send(&record).await;
                }
                debug!("Presence state: {:?}", tracker.state());
            }
            Err(err) => {
                // Presence state is left as-is; a failed scan says nothing
                // about who is present.
                error!("Error running scan cycle: {err:?}");
            }
        }

        tokio::time::sleep(cycle_delay).await;
    }
}
