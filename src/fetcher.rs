use crate::status::SharedStatus;
use crate::types::{AircraftRecord, ConnectionStatus, ICAOAddress};

/// Anything that can report the current state of one aircraft.
pub trait AircraftSource: Send + 'static {
    /// # Errors
    ///
    /// Returns a `FetchError` describing why no record could be produced.
    fn fetch(&mut self, icao_address: ICAOAddress) -> Result<AircraftRecord, FetchError>;
}

/// Queries `<base endpoint><icao address>` over blocking HTTP.
pub struct HttpAircraftSource {
    base_endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpAircraftSource {
    /// # Errors
    ///
    /// Returns `FetchError::Client` if the HTTP client cannot be built.
    pub fn new(
        base_endpoint: impl Into<String>,
        request_timeout: std::time::Duration,
    ) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(request_timeout)
            .user_agent(concat!("airspace-watch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| FetchError::Client(error.to_string()))?;
        Ok(HttpAircraftSource {
            base_endpoint: base_endpoint.into(),
            client,
        })
    }

    #[must_use]
    pub fn url_for(&self, icao_address: ICAOAddress) -> String {
        format!("{0}{1}", self.base_endpoint, icao_address)
    }
}

impl AircraftSource for HttpAircraftSource {
    fn fetch(&mut self, icao_address: ICAOAddress) -> Result<AircraftRecord, FetchError> {
        let url = self.url_for(icao_address);
        log::debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|error| FetchError::Transport {
                url: url.clone(),
                message: error.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                code: status.as_u16(),
            });
        }

        let body = response.text().map_err(|error| FetchError::Transport {
            url: url.clone(),
            message: error.to_string(),
        })?;
        decode_record(&body, icao_address)
    }
}

#[derive(serde::Deserialize, Default)]
struct AircraftJson {
    #[serde(default)]
    hex: Option<String>,
    #[serde(default)]
    flight: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

/// Decodes either a bare aircraft object or an `{"ac": [...]}` envelope.
///
/// For an envelope the entry whose `hex` matches `requested` wins, falling back to the
/// first entry. An empty envelope yields a record with no position.
///
/// # Errors
///
/// Returns `FetchError::Decode` when the body is not one of the accepted shapes.
pub fn decode_record(body: &str, requested: ICAOAddress) -> Result<AircraftRecord, FetchError> {
    let decode_error = |error: serde_json::Error| FetchError::Decode {
        icao_address: requested,
        message: error.to_string(),
    };
    let mut value: serde_json::Value = serde_json::from_str(body).map_err(decode_error)?;

    // an "ac" key means an envelope; a bad envelope must not be read as a bare object
    let envelope = value.as_object_mut().and_then(|object| object.remove("ac"));
    let aircraft = match envelope {
        None => serde_json::from_value::<AircraftJson>(value).map_err(decode_error)?,
        Some(ac) => {
            let ac: Vec<AircraftJson> = serde_json::from_value(ac).map_err(decode_error)?;
            let wanted = requested.to_string();
            let mut entries = ac.into_iter();
            let first = entries.next();
            match first {
                Some(first) if matches_hex(&first, &wanted) => first,
                Some(first) => entries
                    .find(|entry| matches_hex(entry, &wanted))
                    .unwrap_or(first),
                None => AircraftJson::default(),
            }
        }
    };

    let callsign = aircraft
        .flight
        .map(|flight| flight.trim().to_string())
        .filter(|flight| !flight.is_empty());

    Ok(AircraftRecord {
        icao_address: requested,
        callsign,
        latitude: aircraft.lat,
        longitude: aircraft.lon,
    })
}

fn matches_hex(aircraft: &AircraftJson, wanted: &str) -> bool {
    aircraft
        .hex
        .as_deref()
        .is_some_and(|hex| hex.trim().eq_ignore_ascii_case(wanted))
}

/// Wraps a source, swallowing its errors and tracking connectivity.
pub struct Fetcher<S: AircraftSource> {
    source: S,
    status: SharedStatus,
}

impl<S: AircraftSource> Fetcher<S> {
    #[must_use]
    pub fn new(source: S, status: SharedStatus) -> Self {
        Fetcher { source, status }
    }

    /// Fetches one aircraft. Any failure is logged, flips the status to disconnected
    /// and yields `None`.
    pub fn fetch(&mut self, icao_address: ICAOAddress) -> Option<AircraftRecord> {
        match self.source.fetch(icao_address) {
            Ok(record) => {
                self.status.set(ConnectionStatus::Connected);
                Some(record)
            }
            Err(err) => {
                log::warn!("Fetcher: {err}");
                self.status.set(ConnectionStatus::Disconnected);
                None
            }
        }
    }

    #[must_use]
    pub fn status(&self) -> &SharedStatus {
        &self.status
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum FetchError {
    Client(String),
    Transport { url: String, message: String },
    Status { url: String, code: u16 },
    Decode { icao_address: ICAOAddress, message: String },
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Client(message) => write!(f, "Failed to build HTTP client: {message}"),
            FetchError::Transport { url, message } => {
                write!(f, "Request error for '{url}': {message}")
            }
            FetchError::Status { url, code } => write!(f, "HTTP error {code} for '{url}'"),
            FetchError::Decode {
                icao_address,
                message,
            } => write!(f, "JSON decode error for {icao_address}: {message}"),
        }
    }
}

impl std::error::Error for FetchError {}

#[cfg(test)]
mod tests {
    use super::{decode_record, AircraftSource, FetchError, Fetcher, HttpAircraftSource};
    use crate::status::SharedStatus;
    use crate::types::{AircraftRecord, ConnectionStatus, ICAOAddress};
    use std::io::{Read, Write};

    fn icao(hex: &str) -> ICAOAddress {
        hex.parse().expect("valid test address")
    }

    // Serves a single canned HTTP response and hands back the request line.
    fn serve_once(status_line: &str, body: &str) -> (String, std::thread::JoinHandle<String>) {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buffer = [0u8; 1024];
            while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                let read = stream.read(&mut buffer).unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buffer[..read]);
            }
            stream.write_all(response.as_bytes()).unwrap();
            let request = String::from_utf8_lossy(&request).to_string();
            request.lines().next().unwrap_or_default().to_string()
        });
        (format!("http://{address}/v2/icao/"), handle)
    }

    #[test]
    fn when_body_is_a_bare_object_then_fields_are_extracted() {
        let record = decode_record(
            r#"{"hex":"45211e","flight":"TEST1   ","lat":37.0,"lon":-116.0,"alt_baro":3000}"#,
            icao("45211e"),
        )
        .expect("should decode");
        assert_eq!(
            record,
            AircraftRecord {
                icao_address: icao("45211e"),
                callsign: Some(String::from("TEST1")),
                latitude: Some(37.0),
                longitude: Some(-116.0),
            }
        );
    }

    #[test]
    fn when_body_is_an_envelope_then_matching_entry_is_used() {
        let body = r#"{"ac":[{"hex":"a12345","lat":1.0,"lon":2.0},{"hex":"45211E","flight":"X","lat":37.0,"lon":-116.0}],"msg":"No error","total":2}"#;
        let record = decode_record(body, icao("45211e")).expect("should decode");
        assert_eq!(record.callsign.as_deref(), Some("X"));
        assert_eq!(record.latitude, Some(37.0));
    }

    #[test]
    fn when_envelope_is_empty_then_record_has_no_fix() {
        let record = decode_record(r#"{"ac":[],"msg":"No error"}"#, icao("45211e"))
            .expect("should decode");
        assert_eq!(record.position(), None);
        assert_eq!(record.callsign_or_placeholder(), "N/A");
    }

    #[test]
    fn when_coordinates_are_missing_or_null_then_they_stay_absent() {
        let record = decode_record(r#"{"hex":"45211e","lat":null}"#, icao("45211e"))
            .expect("should decode");
        assert_eq!(record.latitude, None);
        assert_eq!(record.longitude, None);
    }

    #[test]
    fn when_body_is_not_json_then_decode_error_is_returned() {
        let result = decode_record("<html>bad gateway</html>", icao("45211e"));
        assert!(matches!(result, Err(FetchError::Decode { .. })));
    }

    #[test]
    fn when_envelope_entry_has_wrong_field_type_then_decode_error_is_returned() {
        let body = r#"{"ac":[{"hex":"45211e","lat":"37.0","lon":-116.0}]}"#;
        let result = decode_record(body, icao("45211e"));
        assert!(matches!(
            result,
            Err(FetchError::Decode { icao_address, .. }) if icao_address == icao("45211e")
        ));
    }

    #[test]
    fn when_envelope_is_not_a_list_then_decode_error_is_returned() {
        let result = decode_record(r#"{"ac":{"hex":"45211e"}}"#, icao("45211e"));
        assert!(matches!(result, Err(FetchError::Decode { .. })));
    }

    struct FailingSource;
    impl AircraftSource for FailingSource {
        fn fetch(&mut self, _icao_address: ICAOAddress) -> Result<AircraftRecord, FetchError> {
            Err(FetchError::Status {
                url: String::from("http://example.invalid/"),
                code: 503,
            })
        }
    }

    #[test]
    fn when_source_fails_then_fetcher_returns_none_and_marks_disconnected() {
        let status = SharedStatus::new();
        let mut fetcher = Fetcher::new(FailingSource, status.clone());
        assert_eq!(fetcher.fetch(icao("45211e")), None);
        assert_eq!(status.get(), ConnectionStatus::Disconnected);
    }

    #[test]
    fn when_http_server_answers_then_record_is_fetched_from_base_plus_identifier() {
        let (base, server) = serve_once("200 OK", r#"{"hex":"45211e","lat":37.0,"lon":-116.0}"#);
        let source = HttpAircraftSource::new(base, std::time::Duration::from_secs(5)).unwrap();
        let status = SharedStatus::new();
        let mut fetcher = Fetcher::new(source, status.clone());

        let record = fetcher.fetch(icao("45211e")).expect("should fetch");
        assert_eq!(record.latitude, Some(37.0));
        assert_eq!(status.get(), ConnectionStatus::Connected);

        let request_line = server.join().unwrap();
        assert_eq!(request_line, "GET /v2/icao/45211e HTTP/1.1");
    }

    #[test]
    fn when_http_server_returns_error_status_then_status_error_is_returned() {
        let (base, server) = serve_once("503 Service Unavailable", "{}");
        let mut source =
            HttpAircraftSource::new(base, std::time::Duration::from_secs(5)).unwrap();
        let result = source.fetch(icao("a12345"));
        assert!(matches!(result, Err(FetchError::Status { code: 503, .. })));
        server.join().unwrap();
    }

    #[test]
    fn when_host_is_unreachable_then_transport_error_is_returned() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let mut source = HttpAircraftSource::new(
            format!("http://{address}/"),
            std::time::Duration::from_secs(2),
        )
        .unwrap();
        let result = source.fetch(icao("a12345"));
        assert!(matches!(result, Err(FetchError::Transport { .. })));
    }
}
