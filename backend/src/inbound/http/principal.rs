//! Caller identity extraction.
//!
//! The identity gateway in front of the portal authenticates users and
//! forwards who they are in three headers. This extractor turns those headers
//! into a domain [`Principal`] so handlers never parse them directly.

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::{CollegeId, Error, Principal, Role, UserId};

/// Header carrying the authenticated user id.
pub const USER_ID_HEADER: &str = "x-portal-user-id";
/// Header carrying the caller's role.
pub const ROLE_HEADER: &str = "x-portal-role";
/// Header carrying the caller's college, when the role has one.
pub const COLLEGE_ID_HEADER: &str = "x-portal-college-id";

/// Extractor wrapping the authenticated [`Principal`].
#[derive(Debug, Clone, Copy)]
pub struct PrincipalContext(Principal);

impl PrincipalContext {
    /// The authenticated caller.
    pub fn principal(&self) -> &Principal {
        &self.0
    }
}

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn unauthorized(reason: &str) -> Error {
    debug!(reason, "rejecting request without a usable identity");
    Error::unauthorized("authentication required")
}

fn parse_principal(req: &HttpRequest) -> Result<Principal, Error> {
    let user_id = header(req, USER_ID_HEADER)
        .ok_or_else(|| unauthorized("missing user id header"))?
        .parse::<i64>()
        .ok()
        .and_then(|raw| UserId::new(raw).ok())
        .ok_or_else(|| unauthorized("malformed user id header"))?;
    let role: Role = header(req, ROLE_HEADER)
        .ok_or_else(|| unauthorized("missing role header"))?
        .parse()
        .map_err(|_| unauthorized("unknown role"))?;
    let college_id = match header(req, COLLEGE_ID_HEADER) {
        None => None,
        Some(raw) => Some(
            raw.parse::<i64>()
                .ok()
                .and_then(|value| CollegeId::new(value).ok())
                .ok_or_else(|| unauthorized("malformed college id header"))?,
        ),
    };
    Ok(Principal::new(user_id, role, college_id))
}

impl FromRequest for PrincipalContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            parse_principal(req)
                .map(PrincipalContext)
                .map_err(actix_web::Error::from),
        )
    }
}
