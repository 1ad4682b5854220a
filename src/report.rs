use log::{error, info};

use crate::config::ReportConfig;
use crate::session::SessionRecord;

#[derive(Debug, Clone)]
pub struct ReportClient {
    client: reqwest::Client,
    url: String,
}

impl ReportClient {
    pub fn new(config: &ReportConfig) -> anyhow::Result<Self> {
        // The sink has no timeout of its own; an unbounded POST would stall
        // the scan loop indefinitely.
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(ReportClient {
            client,
            url: config.url.clone(),
        })
    }

    /// Best effort: the outcome is logged and a failed record is dropped.
    /// Never blocks presence control beyond the configured timeout.
    pub async fn send(&self, record: &SessionRecord) {
        let duration = format_duration(record.duration_seconds);
        info!("Reporting session for {} ({})", record.user, duration);

        let form = [
            ("username", record.user.as_str()),
            ("startTime", record.start.as_str()),
            ("endTime", record.end.as_str()),
            ("duration", duration.as_str()),
        ];

        match self.client.post(&self.url).form(&form).send().await {
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                info!("Report response: {status} {body}");
            }
            Err(err) => {
                error!("Error sending session report: {err:?}");
            }
        }
    }
}

pub fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        return format!("{seconds} seconds");
    }
    let minutes = seconds / 60;
    let remaining = seconds % 60;
    if remaining == 0 {
        format!("{minutes} minutes")
    } else {
        format!("{minutes} minutes {remaining} seconds")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_seconds_only() {
        assert_eq!(format_duration(0), "0 seconds");
        assert_eq!(format_duration(45), "45 seconds");
        assert_eq!(format_duration(59), "59 seconds");
    }

    #[test]
    fn test_format_duration_minutes_and_seconds() {
        assert_eq!(format_duration(90), "1 minutes 30 seconds");
        assert_eq!(format_duration(330), "5 minutes 30 seconds");
    }

    #[test]
    fn test_format_duration_whole_minutes() {
        assert_eq!(format_duration(60), "1 minutes");
        assert_eq!(format_duration(120), "2 minutes");
    }
}
