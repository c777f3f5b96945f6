//! Upstream liveness probes.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Serialize, Serializer};
use strum::Display;
use tracing::{debug, instrument};

/// Outcome of a single liveness probe.
///
/// Serialized as its display string (`"OK"` / `"Unavailable: <detail>"`) so
/// the status response stays flat.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ProbeStatus {
    /// The upstream answered 200.
    #[strum(serialize = "OK")]
    Ok,
    /// Transport failure or non-200 answer, with detail.
    #[strum(to_string = "Unavailable: {0}")]
    Unavailable(String),
}

impl ProbeStatus {
    /// Whether the probe succeeded.
    pub fn is_ok(&self) -> bool {
        matches!(self, ProbeStatus::Ok)
    }
}

impl Serialize for ProbeStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Issue a single GET against `{base_url}{check_path}` with a bounded timeout.
///
/// This is a liveness heuristic, not a deep health check. It never fails:
/// transport errors and non-200 answers are folded into the returned value,
/// because aggregate status reporting must always produce a result.
#[instrument(skip_all, fields(base_url = %base_url, check_path = %check_path))]
pub async fn probe(
    http: &reqwest::Client,
    base_url: &str,
    check_path: &str,
    timeout: Duration,
) -> ProbeStatus {
    let url = format!("{}{}", base_url.trim_end_matches('/'), check_path);

    let status = match http.get(&url).timeout(timeout).send().await {
        Err(err) => ProbeStatus::Unavailable(err.to_string()),
        Ok(response) if response.status() == StatusCode::OK => ProbeStatus::Ok,
        Ok(response) => ProbeStatus::Unavailable(response.status().to_string()),
    };

    debug!(%status, "probe finished");

    status
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_status_renders_as_flat_strings() {
        assert_eq!(ProbeStatus::Ok.to_string(), "OK");
        assert_eq!(
            ProbeStatus::Unavailable("503 Service Unavailable".to_string()).to_string(),
            "Unavailable: 503 Service Unavailable"
        );
    }

    #[test]
    fn probe_status_serializes_as_string() {
        let json = serde_json::to_string(&ProbeStatus::Ok).unwrap();
        assert_eq!(json, r#""OK""#);

        let json =
            serde_json::to_string(&ProbeStatus::Unavailable("connection refused".to_string()))
                .unwrap();
        assert_eq!(json, r#""Unavailable: connection refused""#);
    }

    #[tokio::test]
    async fn probe_folds_transport_failure_into_value() {
        let http = reqwest::Client::new();

        // Nothing listens on port 1.
        let status = probe(
            &http,
            "http://127.0.0.1:1",
            "/alpha/no",
            Duration::from_secs(1),
        )
        .await;

        match status {
            ProbeStatus::Unavailable(detail) => assert!(!detail.is_empty()),
            ProbeStatus::Ok => panic!("probe against unreachable host reported OK"),
        }
    }
}
