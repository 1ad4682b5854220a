use std::collections::HashMap;

use anyhow::bail;
use uuid::Uuid;

use crate::config::KnownDevice;

/// Immutable whitelist mapping beacon UUIDs to display names.
pub struct IdentityTable {
    names: HashMap<Uuid, String>,
}

impl IdentityTable {
    pub fn new(devices: &[KnownDevice]) -> anyhow::Result<Self> {
        let mut names = HashMap::with_capacity(devices.len());
        for device in devices {
            if names.insert(device.uuid, device.name.clone()).is_some() {
                bail!("duplicate device uuid in config: {}", device.uuid);
            }
        }
        Ok(IdentityTable { names })
    }

    /// Exact-match lookup. An unknown UUID is a normal outcome, not an error.
    pub fn resolve(&self, uuid: &Uuid) -> Option<&str> {
        self.names.get(uuid).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(uuid: &str, name: &str) -> KnownDevice {
        KnownDevice {
            uuid: Uuid::parse_str(uuid).unwrap(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_resolve_known() {
        let table = IdentityTable::new(&[
            device("2f234454-cf6d-4a0f-adf2-f4911ba9ffa6", "Worker_A"),
            device("12345678-1234-5678-1234-567812345678", "Worker_B"),
        ])
        .unwrap();
        let uuid = Uuid::parse_str("12345678-1234-5678-1234-567812345678").unwrap();
        assert_eq!(table.resolve(&uuid), Some("Worker_B"));
    }

    #[test]
    fn test_near_miss_is_unknown() {
        let table =
            IdentityTable::new(&[device("2f234454-cf6d-4a0f-adf2-f4911ba9ffa6", "Worker_A")])
                .unwrap();
        // Differs from the configured UUID in the last character only.
        let near_miss = Uuid::parse_str("2f234454-cf6d-4a0f-adf2-f4911ba9ffa7").unwrap();
        assert_eq!(table.resolve(&near_miss), None);
    }

    #[test]
    fn test_duplicate_uuid_rejected() {
        let result = IdentityTable::new(&[
            device("2f234454-cf6d-4a0f-adf2-f4911ba9ffa6", "Worker_A"),
            device("2f234454-cf6d-4a0f-adf2-f4911ba9ffa6", "Worker_B"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_table() {
        let table = IdentityTable::new(&[]).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
    }
}
