//! Progress notifications for in-flight requests
//!
//! The pipeline reports progress through a [`ProgressRegistry`] it is handed at
//! construction time. Delivery is best-effort: a client that is not registered
//! simply misses the update, and a client whose receiver has gone away is
//! deregistered on the first failed send.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// One progress update as delivered to a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressMessage {
    pub stage: String,
    /// Percent complete, 0..=100
    pub progress: u8,
}

impl ProgressMessage {
    pub fn new(stage: impl Into<String>, progress: u8) -> Self {
        Self {
            stage: stage.into(),
            progress: progress.min(100),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressSendError {
    #[error("client {0} is not registered")]
    NotRegistered(String),

    #[error("channel for client {0} is closed")]
    Closed(String),
}

/// Capability for delivering progress to connected clients
pub trait ProgressRegistry: Send + Sync {
    fn register(&self, client_id: &str) -> UnboundedReceiver<ProgressMessage>;

    fn deregister(&self, client_id: &str);

    fn send(&self, client_id: &str, message: ProgressMessage) -> Result<(), ProgressSendError>;
}

/// In-process registry backed by unbounded tokio channels
#[derive(Default)]
pub struct ChannelRegistry {
    clients: RwLock<HashMap<String, UnboundedSender<ProgressMessage>>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_registered(&self, client_id: &str) -> bool {
        self.clients
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains_key(client_id)
    }
}

impl ProgressRegistry for ChannelRegistry {
    fn register(&self, client_id: &str) -> UnboundedReceiver<ProgressMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut clients = self
            .clients
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if clients.insert(client_id.to_string(), tx).is_some() {
            log::debug!("Replaced existing progress channel for {}", client_id);
        }
        rx
    }

    fn deregister(&self, client_id: &str) {
        self.clients
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(client_id);
    }

    fn send(&self, client_id: &str, message: ProgressMessage) -> Result<(), ProgressSendError> {
        let clients = self
            .clients
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let sender = clients
            .get(client_id)
            .ok_or_else(|| ProgressSendError::NotRegistered(client_id.to_string()))?;
        sender
            .send(message)
            .map_err(|_| ProgressSendError::Closed(client_id.to_string()))
    }
}

/// Per-run handle that swallows delivery failures
#[derive(Clone)]
pub struct ProgressReporter {
    registry: Arc<dyn ProgressRegistry>,
    client_id: String,
}

impl ProgressReporter {
    pub fn new(registry: Arc<dyn ProgressRegistry>, client_id: impl Into<String>) -> Self {
        Self {
            registry,
            client_id: client_id.into(),
        }
    }

    pub fn report(&self, stage: &str, progress: u8) {
        log::debug!("[{}] {}% {}", self.client_id, progress, stage);
        match self
            .registry
            .send(&self.client_id, ProgressMessage::new(stage, progress))
        {
            Ok(()) | Err(ProgressSendError::NotRegistered(_)) => {}
            Err(ProgressSendError::Closed(_)) => {
                log::debug!("Progress receiver for {} dropped, deregistering", self.client_id);
                self.registry.deregister(&self.client_id);
            }
        }
    }
}
