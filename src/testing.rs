use crate::fetcher::{AircraftSource, FetchError};
use crate::types::{AircraftRecord, ICAOAddress};

pub fn icao(hex: &str) -> ICAOAddress {
    hex.parse().expect("valid test address")
}

pub fn record_at(hex: &str, callsign: Option<&str>, lat: Option<f64>, lon: Option<f64>) -> AircraftRecord {
    AircraftRecord {
        icao_address: icao(hex),
        callsign: callsign.map(String::from),
        latitude: lat,
        longitude: lon,
    }
}

type Response = Result<AircraftRecord, FetchError>;

/// Replays canned responses per address. Once a script runs out the last response repeats;
/// an address without a script gets a 404.
#[derive(Clone, Default)]
pub struct ScriptedSource {
    scripts: std::sync::Arc<
        std::sync::Mutex<std::collections::HashMap<ICAOAddress, std::collections::VecDeque<Response>>>,
    >,
    calls: std::sync::Arc<std::sync::Mutex<Vec<ICAOAddress>>>,
    latency: Option<std::time::Duration>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        ScriptedSource::default()
    }

    pub fn script(self, hex: &str, responses: Vec<Response>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(icao(hex), responses.into_iter().collect());
        self
    }

    /// Every fetch sleeps for `latency` after it is recorded.
    pub fn with_latency(mut self, latency: std::time::Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn calls(&self) -> Vec<ICAOAddress> {
        self.calls.lock().unwrap().clone()
    }
}

impl AircraftSource for ScriptedSource {
    fn fetch(&mut self, icao_address: ICAOAddress) -> Result<AircraftRecord, FetchError> {
        self.calls.lock().unwrap().push(icao_address);
        if let Some(latency) = self.latency {
            std::thread::sleep(latency);
        }
        let mut scripts = self.scripts.lock().unwrap();
        let not_found = || FetchError::Status {
            url: format!("scripted://{icao_address}"),
            code: 404,
        };
        let Some(script) = scripts.get_mut(&icao_address) else {
            return Err(not_found());
        };
        match script.len() {
            0 => Err(not_found()),
            1 => script.front().cloned().unwrap_or_else(|| Err(not_found())),
            _ => script.pop_front().unwrap_or_else(|| Err(not_found())),
        }
    }
}
