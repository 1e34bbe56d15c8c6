use crate::types::ConnectionStatus;

/// Connectivity flag written by the monitor worker and read by the operator surface.
#[derive(Debug, Clone, Default)]
pub struct SharedStatus {
    inner: std::sync::Arc<std::sync::RwLock<ConnectionStatus>>,
}

impl SharedStatus {
    #[must_use]
    pub fn new() -> Self {
        SharedStatus::default()
    }

    pub fn set(&self, status: ConnectionStatus) {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if *guard != status {
            log::debug!("Connection status changed: {} -> {status}", *guard);
        }
        *guard = status;
    }

    #[must_use]
    pub fn get(&self) -> ConnectionStatus {
        *self
            .inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
