// Notices and the import busy guard used by the invoice service handlers.
use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient message for the user, dismissed once `duration` has elapsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub issued_at: DateTime<Utc>,
    pub duration: Duration,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>, duration: Duration) -> Self {
        Self {
            kind,
            message: message.into(),
            issued_at: Utc::now(),
            duration,
        }
    }

    pub fn success(message: impl Into<String>, duration: Duration) -> Self {
        Self::new(NoticeKind::Success, message, duration)
    }

    pub fn error(message: impl Into<String>, duration: Duration) -> Self {
        Self::new(NoticeKind::Error, message, duration)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.issued_at + self.duration
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

/// Holds the "importing" flag for the lifetime of one import.
///
/// The flag is set synchronously on acquire and cleared on drop, whether the
/// import succeeded or failed.
pub struct ImportGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ImportGuard<'a> {
    pub fn acquire(flag: &'a AtomicBool) -> Result<Self, EngineError> {
        if flag.swap(true, Ordering::SeqCst) {
            return Err(EngineError::ImportInProgress);
        }
        Ok(Self { flag })
    }
}

impl Drop for ImportGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
