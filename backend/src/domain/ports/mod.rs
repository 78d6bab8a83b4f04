//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`JobCatalogue`], [`StudentProfiles`],
//! [`NotificationFeed`]) are implemented by outbound adapters. Driving ports
//! ([`IntentCommand`], [`ConfirmationCommand`], [`BulkTransitionCommand`],
//! [`ApplicationQuery`], [`NotificationInbox`]) are implemented by domain
//! services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod application_commands;
mod application_query;
mod application_repository;
mod intent_repository;
mod job_catalogue;
mod notification_inbox;
mod notification_repository;

#[cfg(test)]
pub use application_commands::{
    MockBulkTransitionCommand, MockConfirmationCommand, MockIntentCommand,
};
pub use application_commands::{
    BulkTransitionCommand, BulkTransitionRequest, BulkTransitionResponse,
    ConfirmApplicationResponse, ConfirmationCommand, IntentCommand, ReserveIntentResponse,
};
pub use application_query::ApplicationQuery;
#[cfg(test)]
pub use application_query::MockApplicationQuery;
#[cfg(test)]
pub use application_repository::MockApplicationRepository;
pub use application_repository::{
    AppliedStatusChange, ApplicationPage, ApplicationRepository, ApplicationRepositoryError,
    ConfirmedApplication, StatusChange,
};
#[cfg(test)]
pub use intent_repository::MockIntentRepository;
pub use intent_repository::{IntentRepository, IntentRepositoryError, ReservedIntent};
#[cfg(test)]
pub use job_catalogue::{MockJobCatalogue, MockStudentProfiles};
pub use job_catalogue::{CatalogueError, JobCatalogue, StudentProfiles};
#[cfg(test)]
pub use notification_inbox::MockNotificationInbox;
pub use notification_inbox::NotificationInbox;
#[cfg(test)]
pub use notification_repository::{MockNotificationFeed, MockNotificationRepository};
pub use notification_repository::{
    NotificationFeed, NotificationFeedError, NotificationPage, NotificationRepository,
    NotificationRepositoryError,
};
