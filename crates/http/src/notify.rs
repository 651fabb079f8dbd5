//! User-facing notification channel
//!
//! Every failed call surfaces at most one [`Notice`] through the [`Notifier`]
//! installed on the session client. Applications render notices as toasts;
//! the default notifier only logs them.

use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};

use crate::client::error::ClientError;

/// Title shared by every error notice
pub const ERROR_TITLE: &str = "Error";
pub const SESSION_EXPIRED_TITLE: &str = "Session expired";

pub const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again later.";
pub const NOT_FOUND_MESSAGE: &str = "The requested resource was not found.";
pub const FORBIDDEN_MESSAGE: &str = "You do not have permission to perform this action.";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred.";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

/// Visual weight of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeVariant {
    Default,
    Destructive,
}

/// A single toast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

impl Notice {
    /// Destructive error notice with the shared title
    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: ERROR_TITLE.to_string(),
            description: description.into(),
            variant: NoticeVariant::Destructive,
        }
    }

    pub fn network_error() -> Self {
        Self::error(NETWORK_ERROR_MESSAGE)
    }

    pub fn session_expired() -> Self {
        Self {
            title: SESSION_EXPIRED_TITLE.to_string(),
            description: SESSION_EXPIRED_MESSAGE.to_string(),
            variant: NoticeVariant::Destructive,
        }
    }

    /// Notice to show for a failed call, if the failure is user-facing
    ///
    /// Local failures (configuration, store, decoding) return `None`; they are
    /// programming or environment errors, not something a toast can explain.
    pub fn for_error(error: &ClientError) -> Option<Self> {
        match error {
            ClientError::Network(_) => Some(Self::network_error()),
            ClientError::SessionExpired => Some(Self::session_expired()),
            other => other.user_message().map(Self::error),
        }
    }
}

/// Sink for user-facing notices
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

impl<F> Notifier for F
where
    F: Fn(Notice) + Send + Sync,
{
    fn notify(&self, notice: Notice) {
        self(notice);
    }
}

/// Notifier that writes notices to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.variant {
            NoticeVariant::Destructive => {
                warn!(title = %notice.title, "{}", notice.description);
            }
            NoticeVariant::Default => {
                info!(title = %notice.title, "{}", notice.description);
            }
        }
    }
}

/// Notifier that keeps every notice in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the notices recorded so far
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain the recorded notices
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}
