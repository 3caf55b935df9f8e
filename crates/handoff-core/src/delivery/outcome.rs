//! Delivery outcomes and their error mapping.

use std::fmt;

use crate::transport::FailureKind;

/// Why a job could not be handed to the companion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnreachableCause {
    /// The sweep found no live companion on any candidate port.
    NotFound,
    /// The endpoint was resolved but the delivery request failed or timed out.
    Transport(FailureKind),
}

/// Result of one delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The companion accepted the job (2xx).
    Success,
    /// The companion answered with a non-success status. The endpoint stays cached.
    Rejected(u32),
    /// No companion could be reached. Recoverable: launch the companion and retry.
    Unreachable(UnreachableCause),
}

impl DeliveryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DeliveryOutcome::Success)
    }

    /// Map onto [`HandoffError`] for callers that prefer `Result`.
    pub fn into_result(self) -> Result<(), HandoffError> {
        match self {
            DeliveryOutcome::Success => Ok(()),
            DeliveryOutcome::Rejected(code) => Err(HandoffError::Rejected(code)),
            DeliveryOutcome::Unreachable(UnreachableCause::NotFound) => {
                Err(HandoffError::CompanionNotFound)
            }
            DeliveryOutcome::Unreachable(UnreachableCause::Transport(kind)) => {
                Err(HandoffError::Unreachable(kind))
            }
        }
    }
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryOutcome::Success => write!(f, "delivered"),
            DeliveryOutcome::Rejected(code) => write!(f, "rejected with HTTP {}", code),
            DeliveryOutcome::Unreachable(UnreachableCause::NotFound) => {
                write!(f, "companion not found")
            }
            DeliveryOutcome::Unreachable(UnreachableCause::Transport(kind)) => {
                write!(f, "companion unreachable ({:?})", kind)
            }
        }
    }
}

/// Failed handoff. None of these are fatal; the worst case is "retry later".
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HandoffError {
    /// No candidate port hosts the companion; it is probably not running.
    #[error("companion application not found; launch it and retry")]
    CompanionNotFound,
    /// The companion is reachable but refused this job.
    #[error("companion rejected the job with HTTP {0}")]
    Rejected(u32),
    /// The cached endpoint stopped answering; the cache has been cleared.
    #[error("companion stopped responding ({0:?}); retry to rediscover it")]
    Unreachable(FailureKind),
}

impl HandoffError {
    /// Whether calling `submit` again can reasonably succeed without user changes.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, HandoffError::Rejected(_))
    }
}
