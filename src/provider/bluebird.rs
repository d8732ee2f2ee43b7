//! HTTP position provider backed by the BlueBird simulation service

use crate::core::AircraftId;
use crate::provider::{CommError, CommResult, PositionProvider, RawPosition};
use crate::utils::config::ClientConfig;
use reqwest::blocking::ClientBuilder;
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Aircraft entry of the positions payload. Other fields are ignored.
#[derive(Debug, Deserialize)]
struct AircraftEntry {
    lat: f64,
    lon: f64,
    /// Feet
    alt: f64,
}

impl From<AircraftEntry> for RawPosition {
    fn from(entry: AircraftEntry) -> Self {
        RawPosition::new(entry.lat, entry.lon, entry.alt)
    }
}

/// Blocking BlueBird client
#[derive(Clone)]
pub struct BlueBirdClient {
    client: reqwest::blocking::Client,
    positions_url: String,
}

impl BlueBirdClient {
    pub fn new(config: &ClientConfig) -> CommResult<Self> {
        Self::from_builder(config, reqwest::blocking::Client::builder())
    }

    fn from_builder(config: &ClientConfig, builder: ClientBuilder) -> CommResult<Self> {
        let client = builder
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CommError::ClientSetup {
                details: e.to_string(),
            })?;

        Ok(Self {
            client,
            positions_url: config.endpoint_url(&config.endpoint_aircraft_position),
        })
    }

    pub fn positions_url(&self) -> &str {
        &self.positions_url
    }

    /// Check that BlueBird is listening.
    ///
    /// The positions endpoint only accepts GET, so a POST answered with 405
    /// proves the service is up.
    pub fn ping(&self) -> bool {
        debug!(url = %self.positions_url, "Pinging BlueBird");
        match self.client.post(&self.positions_url).send() {
            Ok(response) => response.status() == StatusCode::METHOD_NOT_ALLOWED,
            Err(e) => {
                warn!(error = %e, "BlueBird unreachable");
                false
            }
        }
    }

    /// Raw positions payload for every aircraft in the simulation
    fn positions_payload(&self) -> CommResult<Vec<u8>> {
        let url = format!("{}?acid=ALL", self.positions_url);
        debug!(url = %url, "Requesting aircraft positions");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| transport_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CommError::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response
            .bytes()
            .map_err(|e| transport_error(&url, e))?;
        trace!(bytes = body.len(), "Positions payload received");

        Ok(body.to_vec())
    }
}

impl PositionProvider for BlueBirdClient {
    /// Fetches all positions in one request and keeps the requested ids.
    fn fetch_positions(&self, ids: &[AircraftId]) -> CommResult<HashMap<AircraftId, RawPosition>> {
        let body = self.positions_payload()?;
        parse_positions(&body, ids)
    }
}

fn transport_error(url: &str, error: reqwest::Error) -> CommError {
    if error.is_timeout() {
        CommError::Timeout {
            url: url.to_string(),
        }
    } else {
        CommError::ConnectionFailed {
            url: url.to_string(),
            details: error.to_string(),
        }
    }
}

/// Extract the positions of `ids` from a BlueBird positions payload.
///
/// The body must be a JSON object keyed by callsign. Entries for other
/// aircraft are never decoded. A requested entry that is null or malformed
/// is logged and left out, so the aircraft counts as unknown.
pub fn parse_positions(body: &[u8], ids: &[AircraftId]) -> CommResult<HashMap<AircraftId, RawPosition>> {
    let payload: serde_json::Map<String, serde_json::Value> =
        serde_json::from_slice(body).map_err(|e| CommError::InvalidResponse {
            details: format!("positions payload is not a JSON object: {}", e),
        })?;

    let mut reported: HashMap<AircraftId, serde_json::Value> = payload
        .into_iter()
        .filter_map(|(key, value)| AircraftId::new(&key).ok().map(|id| (id, value)))
        .collect();

    let mut positions = HashMap::with_capacity(ids.len());
    for id in ids {
        if let Some(value) = reported.remove(id) {
            match serde_json::from_value::<AircraftEntry>(value) {
                Ok(entry) => {
                    positions.insert(id.clone(), entry.into());
                }
                Err(e) => warn!(aircraft = %id, error = %e, "Ignoring malformed position entry"),
            }
        }
    }

    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    const PAYLOAD: &str = r#"{
        "TST1001": {"actype": "B744", "alt": 25000.0, "gs": 200.0, "lat": 51.5, "lon": -0.1, "vs": 0.0},
        "tst1002": {"actype": "A320", "alt": 10000, "lat": 52.0, "lon": 0.5},
        "scenario_time": 12.5
    }"#;

    fn id(s: &str) -> AircraftId {
        AircraftId::new(s).unwrap()
    }

    fn ids(list: &[&str]) -> Vec<AircraftId> {
        list.iter().map(|s| id(s)).collect()
    }

    /// Answer one HTTP request with a canned response; yields the request head
    fn serve_once(status_line: &'static str, body: &'static str) -> (u16, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = String::new();
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
                head.push_str(&line);
            }
            write!(
                stream,
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            )
            .unwrap();
            stream.flush().unwrap();
            let _ = tx.send(head);
        });

        (port, rx)
    }

    fn local_client(port: u16) -> BlueBirdClient {
        let config = ClientConfig::new()
            .with_host("127.0.0.1")
            .with_port(port)
            .with_timeout(5);
        BlueBirdClient::from_builder(&config, reqwest::blocking::Client::builder().no_proxy()).unwrap()
    }

    fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    #[test]
    fn test_parse_positions() {
        let positions = parse_positions(PAYLOAD.as_bytes(), &ids(&["TST1001", "TST1002"])).unwrap();
        assert_eq!(positions.len(), 2);

        let first = &positions[&id("TST1001")];
        assert_eq!(first.latitude, 51.5);
        assert_eq!(first.altitude_ft, 25000.0);

        // keys are normalized to uppercase
        let second = &positions[&id("TST1002")];
        assert_eq!(second.longitude, 0.5);
    }

    #[test]
    fn test_parse_keeps_only_requested_ids() {
        let positions = parse_positions(PAYLOAD.as_bytes(), &ids(&["TST1002", "GHOST"])).unwrap();
        assert_eq!(positions.len(), 1);
        assert!(positions.contains_key(&id("TST1002")));
    }

    #[test]
    fn test_bad_entry_for_other_aircraft_is_ignored() {
        let body = br#"{
            "TST1001": {"lat": 1.0, "lon": 2.0, "alt": 1000.0},
            "OTHER99": {"lat": 3.0, "lon": 4.0, "alt": null}
        }"#;
        let positions = parse_positions(body, &ids(&["TST1001"])).unwrap();
        assert_eq!(positions[&id("TST1001")].altitude_ft, 1000.0);
    }

    #[test]
    fn test_bad_requested_entry_becomes_unknown() {
        let body = br#"{
            "TST1001": {"lat": 1.0, "lon": 2.0, "alt": 1000.0},
            "TST1002": {"lat": 3.0, "lon": 4.0, "alt": null},
            "TST1003": null,
            "TST1004": {"lat": 1.0}
        }"#;
        let positions =
            parse_positions(body, &ids(&["TST1001", "TST1002", "TST1003", "TST1004"])).unwrap();
        assert_eq!(positions.len(), 1);
        assert!(positions.contains_key(&id("TST1001")));
    }

    #[test]
    fn test_parse_rejects_non_object_payloads() {
        let requested = ids(&["TST1001"]);
        assert!(matches!(
            parse_positions(b"[1, 2, 3]", &requested),
            Err(CommError::InvalidResponse { .. })
        ));
        assert!(matches!(
            parse_positions(b"not json", &requested),
            Err(CommError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn test_parse_empty_simulation() {
        let positions = parse_positions(br#"{"scenario_time": 0}"#, &ids(&["TST1001"])).unwrap();
        assert!(positions.is_empty());
    }

    #[test]
    fn test_client_uses_configured_endpoint() {
        let config = ClientConfig::new().with_host("bluebird").with_port(5002);
        let client = BlueBirdClient::new(&config).unwrap();
        assert_eq!(client.positions_url(), "http://bluebird:5002/api/v2/pos");
    }

    #[test]
    fn test_fetch_requests_all_and_filters() {
        let (port, request) = serve_once("200 OK", PAYLOAD);
        let client = local_client(port);

        let positions = client.fetch_positions(&ids(&["TST1001", "GHOST"])).unwrap();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[&id("TST1001")].altitude_ft, 25000.0);

        let head = request.recv().unwrap();
        assert!(head.starts_with("GET /api/v2/pos?acid=ALL "));
    }

    #[test]
    fn test_error_status_maps_to_http_status() {
        let (port, _request) = serve_once("503 Service Unavailable", "{}");
        let client = local_client(port);

        let err = client.fetch_positions(&ids(&["TST1001"])).unwrap_err();
        assert!(matches!(err, CommError::HttpStatus { status: 503, .. }));
    }

    #[test]
    fn test_closed_port_maps_to_connection_failed() {
        let client = local_client(closed_port());

        let err = client.fetch_positions(&ids(&["TST1001"])).unwrap_err();
        assert!(matches!(err, CommError::ConnectionFailed { .. }));
        assert!(!client.ping());
    }

    #[test]
    fn test_ping_succeeds_only_on_method_not_allowed() {
        let (port, request) = serve_once("405 Method Not Allowed", "");
        assert!(local_client(port).ping());
        assert!(request.recv().unwrap().starts_with("POST /api/v2/pos "));

        let (port, _request) = serve_once("200 OK", "{}");
        assert!(!local_client(port).ping());
    }
}
