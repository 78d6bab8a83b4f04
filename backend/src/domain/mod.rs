//! Domain entities, policies and services for the application workflow.
//!
//! Purpose: own the rules of the workflow (who may reserve, confirm, review
//! and read applications, and which status moves are legal) independently of
//! HTTP, PostgreSQL or Redis. Services depend only on the traits in
//! [`ports`]; adapters live under `inbound` and `outbound`.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Entities: [`Intent`], [`Application`], [`Notification`], job and profile
//!   snapshots, typed ids and the caller [`Principal`].
//! - Policy: [`transition`] (legal status moves).
//! - Queries: [`listing`] (role scope, filters, sort, pagination).
//! - Services: intent ledger, confirmation, bulk transition, application
//!   queries, notification inbox, and the post-commit feed fan-out.

pub mod application;
pub mod application_query_service;
pub mod bulk_transition;
pub mod confirmation;
pub mod deadline;
pub mod error;
pub mod ids;
pub mod intent;
pub mod intent_ledger;
pub mod job;
pub mod listing;
pub mod notification;
pub mod notification_fanout;
pub mod notification_inbox_service;
pub mod ports;
pub mod principal;
pub mod trace_id;
pub mod transition;

pub use self::application::{
    Application, ApplicationStatus, NewApplication, TransitionCandidate, UnknownStatus,
};
pub use self::application_query_service::ApplicationQueryService;
pub use self::bulk_transition::{BulkTransitionService, MAX_BULK_IDS};
pub use self::confirmation::{CONFIRMATION_MESSAGE, ConfirmationService};
pub use self::deadline::Deadlines;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{
    ApplicationId, CollegeId, IdValidationError, IntentId, JobId, NotificationId, UserId,
};
pub use self::intent::{DEFAULT_INTENT_TTL_HOURS, Intent, IntentReservation};
pub use self::intent_ledger::IntentLedgerService;
pub use self::job::{JobDomain, JobSnapshot, JobType, StudentProfile};
pub use self::listing::{
    ApplicationFilter, ApplicationListQuery, ApplicationSort, ListingRequest, ListingScope,
    SearchTerm, SortColumn, SortDirection, page_request,
};
pub use self::notification::{Notification, NotificationDraft, NotificationKind};
pub use self::notification_fanout::{
    FanoutReport, FeedFanout, PostCommitHook, SHARED_QUEUE_CHANNEL, USER_CHANNEL_PREFIX,
};
pub use self::notification_inbox_service::NotificationInboxService;
pub use self::principal::{Principal, Role};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

