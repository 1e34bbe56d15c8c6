use crate::fetcher::{AircraftSource, FetchError, Fetcher, HttpAircraftSource};
use crate::monitor::{Monitor, Session};
use crate::record_log::RecordLogError;
use crate::region::{Region, RegionError, RegionInputs};
use crate::status::SharedStatus;
use crate::thread_manager::{TaskID, ThreadManager};
use crate::transcript::Transcript;
use crate::types::ICAOAddress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Running,
    Stopped,
}

/// Deploy-time settings that do not change between sessions.
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub tracked: Vec<ICAOAddress>,
    pub poll_interval: std::time::Duration,
    pub request_timeout: std::time::Duration,
    pub log_path: std::path::PathBuf,
}

/// Owns the session lifecycle and the single background worker.
pub struct MonitorController {
    settings: MonitorSettings,
    status: SharedStatus,
    transcript: Transcript,
    thread_manager: ThreadManager,
    worker: Option<TaskID>,
    started_once: bool,
}

impl MonitorController {
    #[must_use]
    pub fn new(settings: MonitorSettings) -> Self {
        MonitorController {
            settings,
            status: SharedStatus::new(),
            transcript: Transcript::new(),
            thread_manager: ThreadManager::new(),
            worker: None,
            started_once: false,
        }
    }

    /// Validates the operator's input and starts polling `endpoint` over HTTP.
    ///
    /// # Errors
    ///
    /// See `StartError`. Nothing is started when an error is returned.
    pub fn start(&mut self, endpoint: &str, bounds: &RegionInputs) -> Result<(), StartError> {
        let region = Region::from_inputs(bounds).map_err(StartError::Region)?;
        self.start_in_region(endpoint, region)
    }

    /// Starts polling `endpoint` over HTTP for an already validated region.
    ///
    /// # Errors
    ///
    /// See `StartError`.
    pub fn start_in_region(&mut self, endpoint: &str, region: Region) -> Result<(), StartError> {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return Err(StartError::EmptyEndpoint);
        }
        self.ensure_not_running()?;
        let source = HttpAircraftSource::new(endpoint, self.settings.request_timeout)
            .map_err(StartError::Fetcher)?;
        log::info!("MonitorController: Polling '{endpoint}' for {region}");
        self.start_with_source(region, source)
    }

    /// Starts a new session against an arbitrary source.
    ///
    /// # Errors
    ///
    /// Returns `StartError::AlreadyRunning` if a session is active, or the error raised
    /// while recreating the log or spawning the worker.
    pub fn start_with_source<S: AircraftSource>(
        &mut self,
        region: Region,
        source: S,
    ) -> Result<(), StartError> {
        self.ensure_not_running()?;
        self.reap_worker();

        let session = Session::begin(region, &self.settings.log_path, self.transcript.clone())
            .map_err(StartError::Log)?;
        let monitor = Monitor::new(
            self.settings.tracked.clone(),
            Fetcher::new(source, self.status.clone()),
            session,
        );
        let worker = self
            .thread_manager
            .add_task("monitor", monitor, self.settings.poll_interval)
            .map_err(StartError::Spawn)?;

        self.worker = Some(worker);
        self.started_once = true;
        Ok(())
    }

    /// Signals the worker to stop and waits for it. A fetch in flight completes first;
    /// the rest of the cycle is skipped.
    pub fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            log::info!("MonitorController: Stopping monitor");
            self.thread_manager.stop_task(worker);
            self.thread_manager.wait_on_task_finish(worker);
        }
    }

    /// Blocks until the worker exits on its own or is stopped from another handle.
    pub fn wait(&mut self) {
        if let Some(worker) = self.worker.take() {
            self.thread_manager.wait_on_task_finish(worker);
        }
    }

    #[must_use]
    pub fn state(&self) -> MonitorState {
        match self.worker {
            Some(worker) if !self.thread_manager.is_task_finished(worker) => MonitorState::Running,
            _ if self.started_once => MonitorState::Stopped,
            _ => MonitorState::Idle,
        }
    }

    #[must_use]
    pub fn status(&self) -> &SharedStatus {
        &self.status
    }

    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    fn ensure_not_running(&self) -> Result<(), StartError> {
        if self.state() == MonitorState::Running {
            return Err(StartError::AlreadyRunning);
        }
        Ok(())
    }

    // join a worker that ended without being stopped
    fn reap_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            self.thread_manager.wait_on_task_finish(worker);
        }
    }
}

impl Drop for MonitorController {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug)]
pub enum StartError {
    AlreadyRunning,
    EmptyEndpoint,
    Region(RegionError),
    Fetcher(FetchError),
    Log(RecordLogError),
    Spawn(std::io::Error),
}

impl std::fmt::Display for StartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartError::AlreadyRunning => write!(f, "Monitoring is already running"),
            StartError::EmptyEndpoint => write!(f, "API base URL must not be empty"),
            StartError::Region(error) => write!(f, "Invalid region: {error}"),
            StartError::Fetcher(error) => write!(f, "{error}"),
            StartError::Log(error) => write!(f, "{error}"),
            StartError::Spawn(error) => write!(f, "Failed to start monitor thread: {error}"),
        }
    }
}

impl std::error::Error for StartError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StartError::AlreadyRunning | StartError::EmptyEndpoint => None,
            StartError::Region(error) => Some(error),
            StartError::Fetcher(error) => Some(error),
            StartError::Log(error) => Some(error),
            StartError::Spawn(error) => Some(error),
        }
    }
}
