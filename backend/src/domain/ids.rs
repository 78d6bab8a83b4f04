//! Strongly typed entity identifiers.
//!
//! Every entity the workflow touches is keyed by a positive 64-bit integer.
//! Each gets its own newtype so a job id can never be passed where an intent
//! id is expected. Construction rejects zero and negative values, which lets
//! adapters validate path and body parameters before touching the store.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Error;

/// Validation failure raised when an identifier is not positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{kind} must be a positive integer, got {value}")]
pub struct IdValidationError {
    /// Identifier kind, for example `job_id`.
    pub kind: &'static str,
    /// Rejected raw value.
    pub value: i64,
}

impl From<IdValidationError> for Error {
    fn from(err: IdValidationError) -> Self {
        Error::invalid_request(err.to_string()).with_details(serde_json::json!({
            "field": err.kind,
            "value": err.value,
        }))
    }
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            Serialize,
            Deserialize,
            ToSchema,
        )]
        #[serde(try_from = "i64", into = "i64")]
        pub struct $name(i64);

        impl $name {
            /// Validate and wrap a raw identifier.
            pub fn new(value: i64) -> Result<Self, IdValidationError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(IdValidationError { kind: $kind, value })
                }
            }

            /// Raw identifier value.
            #[must_use]
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl TryFrom<i64> for $name {
            type Error = IdValidationError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Identifier of a job posting.
    JobId,
    "job_id"
);
define_id!(
    /// Identifier of a user (student, college admin, or platform admin).
    UserId,
    "user_id"
);
define_id!(
    /// Identifier of a college.
    CollegeId,
    "college_id"
);
define_id!(
    /// Identifier of an application intent.
    IntentId,
    "intent_id"
);
define_id!(
    /// Identifier of a confirmed application.
    ApplicationId,
    "application_id"
);
define_id!(
    /// Identifier of a durable notification.
    NotificationId,
    "notification_id"
);
