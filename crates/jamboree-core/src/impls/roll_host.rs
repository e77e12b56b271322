//! RecordingRollHost - stands in for the host's roll dialog.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{Actor, TrackerError};
use crate::ports::{CheckHandle, RollHost};

/// Remembers which checks were requested. Optionally refuses them.
#[derive(Debug, Default)]
pub struct RecordingRollHost {
    requests: Mutex<Vec<(String, CheckHandle)>>,
    refuse: bool,
}

impl RecordingRollHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A host whose roll dialog always fails to open.
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }

    /// `(actor id, handle)` pairs in request order.
    pub fn requests(&self) -> Vec<(String, CheckHandle)> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl RollHost for RecordingRollHost {
    async fn open_skill_check(&self, actor: &Actor, check: CheckHandle) -> Result<(), TrackerError> {
        if self.refuse {
            return Err(TrackerError::Host(format!(
                "could not open roll dialog for {}",
                actor.name
            )));
        }
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((actor.id.clone(), check));
        Ok(())
    }
}
