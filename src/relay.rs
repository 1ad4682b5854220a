use std::fs;

use log::{debug, error};

/// Physical output channel. Writes are assumed infallible by callers; an
/// implementation that can fail must log and carry on, since relay control
/// takes priority over everything else the device does.
pub trait Relay {
    fn set(&mut self, on: bool);
}

/// Relay driven through a sysfs GPIO value file.
pub struct GpioRelay {
    value_path: String,
}

impl GpioRelay {
    pub fn new(value_path: impl Into<String>) -> Self {
        GpioRelay {
            value_path: value_path.into(),
        }
    }
}

impl Relay for GpioRelay {
    fn set(&mut self, on: bool) {
        let level = if on { "1" } else { "0" };
        debug!("Setting relay {}", if on { "high" } else { "low" });
        if let Err(err) = fs::write(&self.value_path, level) {
            error!("Error writing {} to {}: {:?}", level, self.value_path, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpio_relay_writes_level() {
        let path = std::env::temp_dir().join(format!("relay-test-{}", std::process::id()));
        let mut relay = GpioRelay::new(path.to_string_lossy());

        relay.set(true);
        assert_eq!(fs::read_to_string(&path).unwrap(), "1");
        relay.set(false);
        assert_eq!(fs::read_to_string(&path).unwrap(), "0");

        fs::remove_file(&path).unwrap();
    }
}
