use std::time::Duration;

use btleplug::api::{Central as _, CentralEvent, ScanFilter};
use btleplug::platform::Adapter;
use futures::StreamExt as _;
use log::debug;
use tokio::time::{Instant, sleep_until};
use uuid::Uuid;

/// Beacon frames start with a two-byte type/length header; the proximity
/// UUID follows, then major, minor, and measured power.
const BEACON_HEADER_LEN: usize = 2;
const BEACON_PAYLOAD_MIN_LEN: usize = 20;

pub struct Scanner {
    adapter: Adapter,
    window: Duration,
    company_ids: Option<Vec<u16>>,
}

impl Scanner {
    pub fn new(adapter: Adapter, window: Duration, company_ids: Option<Vec<u16>>) -> Self {
        Scanner {
            adapter,
            window,
            company_ids,
        }
    }

    /// Run one scan window for the configured duration and return the beacon
    /// UUIDs observed, in observation order, duplicates included. An empty
    /// result is a normal outcome.
    pub async fn scan_cycle(&self) -> Result<Vec<Uuid>, btleplug::Error> {
        let mut events = self.adapter.events().await?;
        self.adapter.start_scan(ScanFilter::default()).await?;

        let deadline = Instant::now() + self.window;
        let mut detections = Vec::new();

        loop {
            tokio::select! {
                _ = sleep_until(deadline) => break,
                event = events.next() => {
                    match event {
                        Some(CentralEvent::ManufacturerDataAdvertisement {
                            manufacturer_data, ..
                        }) => {
                            for (company_id, payload) in &manufacturer_data {
                                if let Some(ids) = &self.company_ids {
                                    if !ids.contains(company_id) {
                                        continue;
                                    }
                                }
                                if let Some(uuid) = extract_beacon_uuid(payload) {
                                    debug!("Beacon advertisement: {uuid}");
                                    detections.push(uuid);
                                }
                            }
                        }
                        Some(_) => {}
                        None => break,
                    }
                }
            }
        }

        self.adapter.stop_scan().await?;
        Ok(detections)
    }
}

/// Pull the proximity UUID out of a manufacturer data payload (the bytes
/// after the company ID). Anything too short to carry one is not a beacon.
pub fn extract_beacon_uuid(payload: &[u8]) -> Option<Uuid> {
    if payload.len() < BEACON_PAYLOAD_MIN_LEN {
        return None;
    }
    let bytes: [u8; 16] = payload[BEACON_HEADER_LEN..BEACON_HEADER_LEN + 16]
        .try_into()
        .ok()?;
    Some(Uuid::from_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    const UUID_STR: &str = "2f234454-cf6d-4a0f-adf2-f4911ba9ffa6";

    fn beacon_payload(uuid: &Uuid) -> Vec<u8> {
        let mut payload = vec![0x02, 0x15];
        payload.extend_from_slice(uuid.as_bytes());
        // major, minor
        payload.extend_from_slice(&[0x00, 0x01, 0x00, 0x02]);
        payload
    }

    #[test]
    fn test_extract_beacon_uuid() {
        let uuid = Uuid::parse_str(UUID_STR).unwrap();
        assert_eq!(extract_beacon_uuid(&beacon_payload(&uuid)), Some(uuid));
    }

    #[test]
    fn test_minimum_length_payload() {
        let uuid = Uuid::parse_str(UUID_STR).unwrap();
        let mut payload = beacon_payload(&uuid);
        payload.truncate(BEACON_PAYLOAD_MIN_LEN);
        assert_eq!(extract_beacon_uuid(&payload), Some(uuid));
    }

    #[test]
    fn test_short_payload_is_not_a_beacon() {
        assert_eq!(extract_beacon_uuid(&[0x02, 0x15, 0x01, 0x02]), None);
        assert_eq!(extract_beacon_uuid(&[]), None);
    }
}
