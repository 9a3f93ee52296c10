use serde::{Deserialize, Serialize};
use std::{
    fmt,
    time::{Duration, Instant},
};
use tokio::sync::mpsc;

/// Event posted by a preview document to its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SandboxMessage {
    Loaded,
    Error {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lineno: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        colno: Option<u32>,
    },
}

impl fmt::Display for SandboxMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded => f.write_str("loaded"),
            Self::Error {
                message,
                lineno: Some(lineno),
                ..
            } => write!(f, "{message} (Line: {lineno})"),
            Self::Error { message, .. } => f.write_str(message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "kebab-case")]
pub enum PreviewStatus {
    Loading,
    Loaded,
    /// No event arrived before the load timeout.
    AssumedLoaded,
    Failed(String),
}

impl PreviewStatus {
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Loading)
    }
}

/// Load state of the preview currently on screen.
///
/// An error is sticky: a `loaded` event arriving after it does not clear it.
#[derive(Debug, Clone)]
pub struct PreviewTracker {
    started_at: Instant,
    load_timeout: Duration,
    status: PreviewStatus,
}

impl PreviewTracker {
    #[must_use]
    pub fn start(load_timeout: Duration) -> Self {
        Self {
            started_at: Instant::now(),
            load_timeout,
            status: PreviewStatus::Loading,
        }
    }

    pub fn apply(&mut self, message: &SandboxMessage) {
        match message {
            SandboxMessage::Loaded => {
                if !matches!(self.status, PreviewStatus::Failed(_)) {
                    self.status = PreviewStatus::Loaded;
                }
            }
            SandboxMessage::Error { .. } => {
                self.status = PreviewStatus::Failed(message.to_string());
            }
        }
    }

    #[must_use]
    pub fn status(&self) -> PreviewStatus {
        self.status_at(Instant::now())
    }

    #[must_use]
    pub fn status_at(&self, now: Instant) -> PreviewStatus {
        match &self.status {
            PreviewStatus::Loading
                if now.saturating_duration_since(self.started_at) >= self.load_timeout =>
            {
                PreviewStatus::AssumedLoaded
            }
            status => status.clone(),
        }
    }
}

/// Sending half handed to whatever relays events out of the sandbox.
#[derive(Debug, Clone)]
pub struct SandboxSender {
    sender: mpsc::UnboundedSender<SandboxMessage>,
}

impl SandboxSender {
    /// Fire and forget; events sent after the monitor is gone are dropped.
    pub fn send(&self, message: SandboxMessage) {
        if self.sender.send(message).is_err() {
            tracing::debug!("sandbox monitor dropped, discarding event");
        }
    }
}

#[derive(Debug)]
pub struct PreviewMonitor {
    receiver: mpsc::UnboundedReceiver<SandboxMessage>,
}

impl PreviewMonitor {
    /// Next event, or `None` once every sender is gone.
    pub async fn next(&mut self) -> Option<SandboxMessage> {
        self.receiver.recv().await
    }

    /// Wait for the first event from a freshly loaded preview.
    ///
    /// Resolves to [`PreviewStatus::AssumedLoaded`] when nothing arrives
    /// within `load_timeout` or every sender is dropped.
    pub async fn wait_ready(&mut self, load_timeout: Duration) -> PreviewStatus {
        match tokio::time::timeout(load_timeout, self.receiver.recv()).await {
            Ok(Some(SandboxMessage::Loaded)) => PreviewStatus::Loaded,
            Ok(Some(message)) => PreviewStatus::Failed(message.to_string()),
            Ok(None) | Err(_) => PreviewStatus::AssumedLoaded,
        }
    }
}

#[must_use]
pub fn sandbox_channel() -> (SandboxSender, PreviewMonitor) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (SandboxSender { sender }, PreviewMonitor { receiver })
}
