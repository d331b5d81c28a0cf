//! Order status workflow.
//!
//! ```text
//!                 cancel
//!   IN_PROGRESS ──────────► CANCELLED (term.)
//!        │
//!        │ complete
//!        ▼
//!   COMPLETED (term.)
//! ```
//!
//! Transitions are only legal out of `IN_PROGRESS`. A rejected event leaves
//! the order untouched; callers must not persist anything on error.
//!
//! The full-replace endpoint deliberately bypasses this module and can write
//! any status.

use std::fmt;

use crate::{Order, OrderStatus};

/// Events accepted by the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderEvent {
    Cancel,
    Complete,
}

impl OrderEvent {
    /// Verb used in messages and link relations.
    pub fn verb(&self) -> &'static str {
        match self {
            OrderEvent::Cancel => "cancel",
            OrderEvent::Complete => "complete",
        }
    }
}

/// Returned when an event cannot be applied in the current status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionError {
    /// Status the order was in when the event arrived.
    pub from: OrderStatus,
    pub event: OrderEvent,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "You can't {} an order that is in the {} status",
            self.event.verb(),
            self.from
        )
    }
}

impl std::error::Error for TransitionError {}

impl OrderStatus {
    /// Status reached by applying `event`, or the reason it is refused.
    pub fn transition(self, event: OrderEvent) -> Result<OrderStatus, TransitionError> {
        use OrderEvent::*;
        use OrderStatus::*;

        match (self, event) {
            (InProgress, Cancel) => Ok(Cancelled),
            (InProgress, Complete) => Ok(Completed),
            (from, event) => Err(TransitionError { from, event }),
        }
    }
}

impl Order {
    /// Apply `event` in place. On error the order is not modified.
    pub fn apply(&mut self, event: OrderEvent) -> Result<(), TransitionError> {
        self.status = self.status.transition(event)?;
        Ok(())
    }

    /// Whether the workflow currently offers `event`.
    pub fn allows(&self, event: OrderEvent) -> bool {
        self.status.transition(event).is_ok()
    }
}
