//! Driving ports for the application workflow mutations.
//!
//! Inbound adapters call these with the authenticated [`Principal`]; the
//! services behind them own authorisation, validation, and transaction
//! boundaries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ApplicationId, ApplicationStatus, Error, IntentId, JobId, Principal};

/// Acknowledgement for a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReserveIntentResponse {
    /// Reserved intent; pass it to the confirm call.
    pub intent_id: IntentId,
    /// Instant after which the reservation lapses.
    pub expires_at: DateTime<Utc>,
    /// External registration form to complete before confirming.
    pub redirect_url: Option<String>,
}

/// Acknowledgement for a confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConfirmApplicationResponse {
    /// The new application.
    pub application_id: ApplicationId,
    /// Always `APPLIED` for a fresh application.
    pub status: ApplicationStatus,
    /// Human-readable acknowledgement.
    pub message: String,
}

/// Bulk status change input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BulkTransitionRequest {
    /// Applications to move. Duplicates are ignored.
    pub application_ids: Vec<ApplicationId>,
    /// Target status.
    pub new_status: ApplicationStatus,
}

/// Bulk status change outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BulkTransitionResponse {
    /// Rows updated.
    pub updated_count: u64,
    /// Status now held by every updated row.
    pub new_status: ApplicationStatus,
}

/// Reserve a job for the calling student.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IntentCommand: Send + Sync {
    /// Create or refresh the caller's intent for `job_id`.
    async fn reserve(
        &self,
        principal: &Principal,
        job_id: JobId,
    ) -> Result<ReserveIntentResponse, Error>;
}

/// Convert an intent into an application.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfirmationCommand: Send + Sync {
    /// Consume `intent_id` and create the application.
    async fn confirm(
        &self,
        principal: &Principal,
        intent_id: IntentId,
    ) -> Result<ConfirmApplicationResponse, Error>;
}

/// Move a batch of applications to a new status.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BulkTransitionCommand: Send + Sync {
    /// Validate ownership and legality for every id, then update them all.
    async fn bulk_update(
        &self,
        principal: &Principal,
        request: BulkTransitionRequest,
    ) -> Result<BulkTransitionResponse, Error>;
}
