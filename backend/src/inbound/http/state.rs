//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they stay testable with mocks and free of I/O.

use std::sync::Arc;

use crate::domain::ports::{
    ApplicationQuery, BulkTransitionCommand, ConfirmationCommand, IntentCommand,
    NotificationInbox,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Reservation of jobs.
    pub intents: Arc<dyn IntentCommand>,
    /// Intent confirmation.
    pub confirmations: Arc<dyn ConfirmationCommand>,
    /// Bulk status changes.
    pub bulk_transitions: Arc<dyn BulkTransitionCommand>,
    /// Scoped listing and lookup.
    pub applications: Arc<dyn ApplicationQuery>,
    /// Notification inbox.
    pub notifications: Arc<dyn NotificationInbox>,
}
