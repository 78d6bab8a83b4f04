//! Test doubles shared by unit and integration tests.
//!
//! Compiled for `cfg(test)` and for the `test-support` feature so
//! integration tests in `tests/` can reuse them.

pub mod clock;
pub mod feeds;
pub mod fixtures;

pub use clock::{MutableClock, fixture_now};
pub use feeds::{RecordingFeed, UnreachableFeed};
