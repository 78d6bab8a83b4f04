//! Job and student-profile snapshots consumed from the catalogue and profile
//! collaborators.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{CollegeId, JobId, UserId};

macro_rules! wire_enum {
    (
        $(#[$meta:meta])* $name:ident, $error:ident {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Stored and wire representation.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        /// Raised when a wire value is not recognised.
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        #[error("unknown {kind}: {0}", kind = stringify!($name))]
        pub struct $error(pub String);

        impl std::str::FromStr for $name {
            type Err = $error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalised = s.trim().to_ascii_uppercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|value| value.as_str() == normalised)
                    .ok_or($error(normalised))
            }
        }
    };
}

wire_enum!(
    /// Engagement type of a job.
    JobType, UnknownJobType {
        /// Internship.
        Intern => "INTERN",
        /// Full-time employment.
        FullTime => "FTE",
        /// Internship with a pre-placement offer.
        InternPpo => "INTERN_PPO",
    }
);

wire_enum!(
    /// Engineering domain a job belongs to.
    JobDomain, UnknownJobDomain {
        /// Frontend engineering.
        Frontend => "FRONTEND",
        /// Backend engineering.
        Backend => "BACKEND",
        /// Full-stack engineering.
        Fullstack => "FULLSTACK",
        /// General software development.
        Sde => "SDE",
        /// Electronics and communication.
        Ece => "ECE",
        /// AI and machine learning.
        Aiml => "AIML",
        /// Anything else.
        Other => "OTHER",
    }
);

/// The fields of a job posting the workflow needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSnapshot {
    /// Job identifier.
    pub id: JobId,
    /// College the job is posted to.
    pub college_id: CollegeId,
    /// Job title.
    pub title: String,
    /// Hiring company name.
    pub company: String,
    /// Engineering domain.
    pub domain: JobDomain,
    /// Engagement type.
    pub job_type: JobType,
    /// Whether the job accepts new applications.
    pub is_active: bool,
    /// Graduation batches allowed to apply. Job postings always list at least
    /// one batch, so an empty set admits nobody.
    pub eligible_batches: Vec<i32>,
    /// External registration form the student completes before confirming.
    pub registration_url: Option<String>,
}

impl JobSnapshot {
    /// Whether a student graduating in `batch` may apply.
    #[must_use]
    pub fn accepts_batch(&self, batch: i32) -> bool {
        self.eligible_batches.contains(&batch)
    }
}

/// The fields of a student profile the workflow needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    /// Student user id.
    pub user_id: UserId,
    /// Graduation batch, unset until the student completes their profile.
    pub batch: Option<i32>,
    /// Current resume location, if uploaded.
    pub resume_url: Option<String>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn job(eligible_batches: Vec<i32>) -> JobSnapshot {
        JobSnapshot {
            id: JobId::new(1).expect("valid id"),
            college_id: CollegeId::new(1).expect("valid id"),
            title: "Backend Engineer".to_owned(),
            company: "Acme".to_owned(),
            domain: JobDomain::Backend,
            job_type: JobType::FullTime,
            is_active: true,
            eligible_batches,
            registration_url: None,
        }
    }

    #[rstest]
    #[case(vec![], 2026, false)]
    #[case(vec![2025, 2026], 2026, true)]
    #[case(vec![2025], 2026, false)]
    fn batch_eligibility(#[case] batches: Vec<i32>, #[case] batch: i32, #[case] expected: bool) {
        assert_eq!(job(batches).accepts_batch(batch), expected);
    }

    #[rstest]
    #[case("fte", JobType::FullTime)]
    #[case("INTERN_PPO", JobType::InternPpo)]
    fn job_types_parse(#[case] raw: &str, #[case] expected: JobType) {
        assert_eq!(raw.parse::<JobType>(), Ok(expected));
    }

    #[rstest]
    fn job_domain_round_trips_wire_form() {
        for domain in JobDomain::ALL {
            assert_eq!(domain.as_str().parse::<JobDomain>(), Ok(*domain));
        }
        assert!("DEVOPS".parse::<JobDomain>().is_err());
    }

    #[rstest]
    fn unknown_wire_values_name_their_type() {
        let err = "DEVOPS".parse::<JobDomain>().expect_err("unknown domain");
        assert_eq!(err.to_string(), "unknown JobDomain: DEVOPS");
    }
}
