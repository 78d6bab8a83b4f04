//! Status transition policy for applications.
//!
//! The review pipeline is a fixed state machine:
//!
//! ```text
//! APPLIED ──► SHORTLISTED ──► INTERVIEW ──► OFFERED
//!    │             │              │
//!    └─────────────┴──────────────┴──────► REJECTED
//! ```
//!
//! `OFFERED` and `REJECTED` are terminal. Self-transitions are illegal. Both
//! single and bulk updates must go through [`is_legal`] so they cannot
//! diverge.

use super::{ApplicationStatus, Error};

/// Statuses reachable in one step from `from`.
#[must_use]
pub const fn successors(from: ApplicationStatus) -> &'static [ApplicationStatus] {
    use ApplicationStatus::{Applied, Interview, Offered, Rejected, Shortlisted};
    match from {
        Applied => &[Shortlisted, Rejected],
        Shortlisted => &[Interview, Rejected],
        Interview => &[Offered, Rejected],
        Offered | Rejected => &[],
    }
}

/// Whether moving from `from` to `to` is permitted.
#[must_use]
pub fn is_legal(from: ApplicationStatus, to: ApplicationStatus) -> bool {
    successors(from).contains(&to)
}

/// Whether `status` has no outgoing transitions.
#[must_use]
pub fn is_terminal(status: ApplicationStatus) -> bool {
    successors(status).is_empty()
}

/// Fail with [`super::ErrorCode::InvalidTransition`] unless the move is legal.
pub fn ensure_legal(from: ApplicationStatus, to: ApplicationStatus) -> Result<(), Error> {
    if is_legal(from, to) {
        return Ok(());
    }
    Err(
        Error::invalid_transition(format!("cannot move an application from {from} to {to}"))
            .with_details(serde_json::json!({
                "from": from,
                "to": to,
                "allowed": successors(from),
            })),
    )
}
