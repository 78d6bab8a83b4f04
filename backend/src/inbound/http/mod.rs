//! HTTP inbound adapter exposing REST endpoints.

pub mod applications;
pub mod error;
pub mod health;
pub mod jobs;
pub mod notifications;
pub mod principal;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
