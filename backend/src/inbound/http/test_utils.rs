//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::test::TestRequest;

use crate::domain::ports::{
    MockApplicationQuery, MockBulkTransitionCommand, MockConfirmationCommand, MockIntentCommand,
    MockNotificationInbox,
};
use crate::inbound::http::principal::{COLLEGE_ID_HEADER, ROLE_HEADER, USER_ID_HEADER};
use crate::inbound::http::state::HttpState;

/// Mock driving ports; any call without a configured expectation panics.
#[derive(Default)]
pub struct MockPorts {
    pub intents: MockIntentCommand,
    pub confirmations: MockConfirmationCommand,
    pub bulk_transitions: MockBulkTransitionCommand,
    pub applications: MockApplicationQuery,
    pub notifications: MockNotificationInbox,
}

impl MockPorts {
    /// Freeze the mocks into handler state.
    pub fn into_state(self) -> HttpState {
        HttpState {
            intents: Arc::new(self.intents),
            confirmations: Arc::new(self.confirmations),
            bulk_transitions: Arc::new(self.bulk_transitions),
            applications: Arc::new(self.applications),
            notifications: Arc::new(self.notifications),
        }
    }
}

/// Attach identity headers for a student of `college`.
pub fn as_student(req: TestRequest, user: i64, college: i64) -> TestRequest {
    req.insert_header((USER_ID_HEADER, user.to_string()))
        .insert_header((ROLE_HEADER, "student"))
        .insert_header((COLLEGE_ID_HEADER, college.to_string()))
}

/// Attach identity headers for an administrator of `college`.
pub fn as_college_admin(req: TestRequest, user: i64, college: i64) -> TestRequest {
    req.insert_header((USER_ID_HEADER, user.to_string()))
        .insert_header((ROLE_HEADER, "college_admin"))
        .insert_header((COLLEGE_ID_HEADER, college.to_string()))
}
