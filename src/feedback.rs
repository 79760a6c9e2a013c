//! Process-wide feedback channel (alerts/toasts)

use tokio::sync::mpsc;

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// A single user-facing notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

/// Fire-and-forget notification surface
#[cfg_attr(test, mockall::automock)]
pub trait Notify: Send + Sync {
    /// Report a notice. Never blocks and never fails.
    fn notify(&self, notice: Notice);
}

/// Channel-backed [`Notify`] implementation; the shell drains the receiver
#[derive(Debug, Clone)]
pub struct AlertChannel {
    tx: mpsc::UnboundedSender<Notice>,
}

impl AlertChannel {
    /// Create a new channel and the receiving end the UI drains
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notify for AlertChannel {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Success => tracing::info!(message = %notice.message, "notice"),
            Severity::Error => tracing::warn!(message = %notice.message, "error notice"),
        }
        // Nobody listening is fine.
        let _ = self.tx.send(notice);
    }
}
