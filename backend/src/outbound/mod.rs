//! Outbound adapters implementing the domain's driven ports.
//!
//! - [`memory`]: in-process store used without a database and in tests.
//! - [`persistence`]: PostgreSQL via Diesel.
//! - [`feed`]: Redis list feed and a logging stand-in.

pub mod feed;
pub mod memory;
pub mod persistence;
