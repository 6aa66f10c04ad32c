//! Error types at the engine boundary.
//!
//! Nothing in this crate is fatal: denied production is backpressure,
//! out-of-range actions are answered with a move order, and every other
//! engine outcome is ignored. These enums exist so callers can tell the
//! recoverable conditions apart.

use thiserror::Error;

/// Why the production facility refused to produce a unit.
///
/// All variants are expected battlefield states; the scheduler retries
/// the same priority branch next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// Not enough stored resource to pay for the requested body.
    #[error("insufficient resource for requested body")]
    InsufficientResources,

    /// The facility is mid-production and cannot accept another order.
    #[error("production facility is busy")]
    Busy,

    /// The requested body composition is empty or malformed.
    #[error("invalid body composition")]
    InvalidBody,
}

/// Why a unit action (attack, heal, withdraw, transfer) did not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Target is outside the action's engagement radius.
    ///
    /// Recoverable: the unit moves toward the target instead; the action
    /// is not retried in the same tick.
    #[error("target out of range")]
    NotInRange,

    /// Any other engine-side failure. Treated the same as success.
    #[error("action failed")]
    Failed,
}
