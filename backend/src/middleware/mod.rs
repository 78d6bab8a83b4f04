//! Request middleware.
//!
//! [`Trace`] tags every request with a trace identifier that follows it into
//! logs, error payloads and the `trace-id` response header.

pub mod trace;

pub use trace::Trace;
