use std::time::Duration;

use serde_derive::Deserialize;
use uuid::Uuid;

#[derive(Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub report: ReportConfig,
    pub relay: RelayConfig,
    pub devices: Vec<KnownDevice>,
    pub scan: Option<ScanConfig>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ReportConfig {
    pub url: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RelayConfig {
    pub gpio_value_path: String,
}

#[derive(Deserialize, Debug, Clone)]
pub enum Manufacturer {
    Apple,
    Google,
}

impl Manufacturer {
    /// https://bitbucket.org/bluetooth-SIG/public/src/main/assigned_numbers/company_identifiers/company_identifiers.yaml
    pub fn company_ids(&self) -> Vec<u16> {
        match self {
            Manufacturer::Apple => vec![0x004C],
            Manufacturer::Google => vec![0x018E, 0x00E0],
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct KnownDevice {
    pub uuid: Uuid,
    pub name: String,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct ScanConfig {
    pub window_seconds: Option<u64>,
    pub cycle_delay_seconds: Option<u64>,
    /// Restrict beacon parsing to this vendor's company IDs. Off by default:
    /// any manufacturer payload long enough to carry a beacon frame counts.
    pub manufacturer: Option<Manufacturer>,
}

impl ScanConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_seconds.unwrap_or(5))
    }

    pub fn cycle_delay(&self) -> Duration {
        Duration::from_secs(self.cycle_delay_seconds.unwrap_or(1))
    }
}

impl ReportConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(10))
    }
}
