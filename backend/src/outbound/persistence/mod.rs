//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories are thin: they translate between Diesel rows and domain types
//! and keep each port method inside at most one transaction. Row structs and
//! the schema never leave this module.

mod diesel_application_repository;
mod diesel_basic_error_mapping;
mod diesel_helpers;
mod diesel_intent_repository;
mod diesel_job_catalogue;
mod diesel_notification_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_application_repository::DieselApplicationRepository;
pub use diesel_intent_repository::DieselIntentRepository;
pub use diesel_job_catalogue::DieselJobCatalogue;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
