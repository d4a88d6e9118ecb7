//! Subscription handshake state machine
//!
//! After a subscribe/unsubscribe request is sent, inbound frames are fed to
//! [`Handshake::observe`] one at a time until it leaves `Waiting`:
//!
//! ```text
//! Waiting { attempt } --confirmation--> Confirmed
//!         |           --error frame--> Failed(Rejected)
//!         |           --other frame--> Waiting { attempt + 1 }
//!         +-- attempt == max ---------> Failed(RetriesExceeded)
//! ```

use super::types::{FeedMessage, ERROR};
use thiserror::Error;

/// Why a handshake did not complete
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandshakeFailure {
    /// Provider answered with an error frame
    #[error("{message} reason: {reason}")]
    Rejected { message: String, reason: String },
    /// No confirmation within the attempt ceiling
    #[error("fail to {op}:{channel} after {attempts} attempts")]
    RetriesExceeded {
        op: String,
        channel: String,
        attempts: u32,
    },
}

/// Handshake state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeState {
    /// Awaiting confirmation; `attempt` frames seen so far
    Waiting { attempt: u32 },
    Confirmed,
    Failed(HandshakeFailure),
}

/// Handshake for one request on one channel
#[derive(Debug, Clone)]
pub struct Handshake {
    op: String,
    channel: String,
    confirmation: String,
    max_attempts: u32,
    state: HandshakeState,
}

impl Handshake {
    /// Start waiting for `confirmation` after sending an `op` request.
    /// At most `max_attempts` frames are inspected (at least one).
    pub fn new(
        op: impl Into<String>,
        channel: impl Into<String>,
        confirmation: impl Into<String>,
        max_attempts: u32,
    ) -> Self {
        Self {
            op: op.into(),
            channel: channel.into(),
            confirmation: confirmation.into(),
            max_attempts: max_attempts.max(1),
            state: HandshakeState::Waiting { attempt: 0 },
        }
    }

    pub fn state(&self) -> &HandshakeState {
        &self.state
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self.state, HandshakeState::Waiting { .. })
    }

    /// Number of frames inspected so far
    pub fn attempts(&self) -> u32 {
        match self.state {
            HandshakeState::Waiting { attempt } => attempt,
            HandshakeState::Failed(HandshakeFailure::RetriesExceeded { attempts, .. }) => attempts,
            _ => 0,
        }
    }

    /// Feed one inbound frame. Frames received after the handshake left
    /// `Waiting` are ignored.
    pub fn observe(&mut self, msg: &FeedMessage) -> &HandshakeState {
        let HandshakeState::Waiting { attempt } = self.state else {
            return &self.state;
        };
        let attempt = attempt + 1;

        self.state = if msg.kind == ERROR {
            HandshakeState::Failed(HandshakeFailure::Rejected {
                message: msg.message.clone().unwrap_or_default(),
                reason: msg.reason.clone().unwrap_or_default(),
            })
        } else if msg.kind == self.confirmation {
            HandshakeState::Confirmed
        } else if attempt >= self.max_attempts {
            HandshakeState::Failed(HandshakeFailure::RetriesExceeded {
                op: self.op.clone(),
                channel: self.channel.clone(),
                attempts: self.max_attempts,
            })
        } else {
            tracing::trace!(kind = %msg.kind, attempt, "Ignoring frame while waiting for confirmation");
            HandshakeState::Waiting { attempt }
        };

        &self.state
    }

    /// Consume the handshake into its outcome
    pub fn into_result(self) -> Result<(), HandshakeFailure> {
        match self.state {
            HandshakeState::Confirmed => Ok(()),
            HandshakeState::Failed(failure) => Err(failure),
            HandshakeState::Waiting { attempt } => Err(HandshakeFailure::RetriesExceeded {
                op: self.op,
                channel: self.channel,
                attempts: attempt,
            }),
        }
    }
}
