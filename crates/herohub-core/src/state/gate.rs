use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::api::ApiError;
use crate::validation::ValidationFailure;

#[derive(Error, Debug)]
pub enum StateError {
    #[error("{0} is already in progress")]
    AlreadyInFlight(&'static str),

    #[error(transparent)]
    Invalid(#[from] ValidationFailure),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Superhero {0} is not loaded")]
    UnknownHero(i64),

    #[error("Team {0} is not loaded")]
    UnknownTeam(i64),

    #[error("Result discarded, a newer request replaced it")]
    Stale,
}

impl StateError {
    /// The API error behind this failure, for `friendly_message`
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            StateError::Api(e) => Some(e),
            _ => None,
        }
    }
}

/// A submitting flag. At most one guarded action runs at a time.
#[derive(Debug, Clone)]
pub struct SubmitGate {
    action: &'static str,
    busy: Arc<AtomicBool>,
}

impl SubmitGate {
    pub fn new(action: &'static str) -> Self {
        Self {
            action,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Claim the gate, or refuse if the action is already running.
    pub fn try_begin(&self) -> Result<SubmitGuard, StateError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(StateError::AlreadyInFlight(self.action));
        }
        Ok(SubmitGuard {
            busy: Arc::clone(&self.busy),
        })
    }

    pub fn is_submitting(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases its gate on drop, whether the action succeeded or not.
#[derive(Debug)]
pub struct SubmitGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for SubmitGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Handed out per fetch; only the latest one may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Generation counter for fetches that can be superseded.
///
/// Each fetch takes a ticket. A result is applied only if its ticket is
/// still the newest and the view has not been closed.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: AtomicU64,
    closed: AtomicBool,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        !self.closed.load(Ordering::Acquire) && self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// The view went away; every outstanding result is now stale.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    pub fn reopen(&self) {
        self.closed.store(false, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}
