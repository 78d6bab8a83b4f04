//! Authenticated caller identity and role-based authorisation helpers.
//!
//! The identity gateway authenticates callers and hands the core an opaque
//! principal. The core trusts those fields as-is and only uses them to
//! authorise operations and scope queries.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{CollegeId, Error, UserId};

/// Closed set of caller roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A student applying to jobs at their college.
    Student,
    /// A placement officer reviewing applications for one college.
    CollegeAdmin,
    /// Platform operator with unscoped read access.
    Admin,
}

impl Role {
    /// Wire representation used in headers and payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::CollegeAdmin => "college_admin",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a role string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "college_admin" => Ok(Self::CollegeAdmin),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// Authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    user_id: UserId,
    role: Role,
    college_id: Option<CollegeId>,
}

impl Principal {
    /// Build a principal from gateway-supplied fields.
    #[must_use]
    pub fn new(user_id: UserId, role: Role, college_id: Option<CollegeId>) -> Self {
        Self {
            user_id,
            role,
            college_id,
        }
    }

    /// Caller's user id.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Caller's role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Caller's college, when the role carries one.
    #[must_use]
    pub fn college_id(&self) -> Option<CollegeId> {
        self.college_id
    }

    /// Require a student caller.
    pub fn require_student(&self) -> Result<UserId, Error> {
        match self.role {
            Role::Student => Ok(self.user_id),
            Role::CollegeAdmin | Role::Admin => {
                Err(Error::forbidden("only students may perform this action"))
            }
        }
    }

    /// Require a student caller enrolled at a college.
    pub fn require_enrolled_student(&self) -> Result<(UserId, CollegeId), Error> {
        let student = self.require_student()?;
        let college = self
            .college_id
            .ok_or_else(|| Error::forbidden("student is not enrolled at a college"))?;
        Ok((student, college))
    }

    /// Require a college admin caller and return the college they manage.
    pub fn require_college_admin(&self) -> Result<CollegeId, Error> {
        match self.role {
            Role::CollegeAdmin => self
                .college_id
                .ok_or_else(|| Error::forbidden("college admin has no college assigned")),
            Role::Student | Role::Admin => Err(Error::forbidden(
                "only college admins may perform this action",
            )),
        }
    }
}
