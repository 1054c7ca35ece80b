use crate::models::BookingStatus;
use thiserror::Error;

/// Errors surfaced by the booking/matching core.
///
/// Data-integrity gaps during aggregation are not represented here: an
/// offering whose professional or catalog service cannot be resolved is
/// skipped, not reported (see `listings`).
#[derive(Debug, Error)]
pub enum MarketplaceError {
    /// Caller-supplied input failed a precondition. Nothing was written.
    #[error("validation error: {0}")]
    Validation(String),

    /// The requested booking state change is not permitted from the
    /// current state or by the requesting actor.
    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    /// The actor does not own or control the entity being accessed.
    #[error("permission denied: {0}")]
    Permission(String),

    /// The entity store or identity collaborator failed; propagated
    /// verbatim, no retry.
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

impl MarketplaceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn permission(msg: impl Into<String>) -> Self {
        Self::Permission(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, MarketplaceError>;
