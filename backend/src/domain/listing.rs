//! Role-scoped, filterable, sortable application listings.
//!
//! [`ListingRequest`] carries raw caller input. [`ApplicationListQuery::build`]
//! validates it and pairs it with a [`ListingScope`] derived from the caller.
//! Scoping is unconditional: every adapter applies the scope predicate before
//! and independently of any optional filter, so no filter combination can
//! widen visibility.

use pagination::{PageRequest, PageRequestError};

use super::{
    ApplicationStatus, CollegeId, Error, JobDomain, JobId, JobType, Principal, Role, UserId,
};

/// Longest accepted free-text search term, in characters.
pub const MAX_SEARCH_CHARS: usize = 100;

/// Mandatory row-level restriction derived from the caller's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingScope {
    /// Only rows where the student reference equals this id.
    Student(UserId),
    /// Only rows where the college reference equals this id.
    College(CollegeId),
    /// Every row.
    Unscoped,
}

impl ListingScope {
    /// Derive the scope for `principal`.
    ///
    /// A college admin without a college cannot be scoped and is refused.
    pub fn for_principal(principal: &Principal) -> Result<Self, Error> {
        match principal.role() {
            Role::Student => Ok(Self::Student(principal.user_id())),
            Role::CollegeAdmin => principal
                .college_id()
                .map(Self::College)
                .ok_or_else(|| Error::forbidden("college admin has no college assigned")),
            Role::Admin => Ok(Self::Unscoped),
        }
    }

    /// Whether a row owned by `student_id` at `college_id` is visible.
    #[must_use]
    pub fn admits(self, student_id: UserId, college_id: CollegeId) -> bool {
        match self {
            Self::Student(id) => id == student_id,
            Self::College(id) => id == college_id,
            Self::Unscoped => true,
        }
    }
}

/// Sortable columns. Anything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    /// Confirmation time.
    #[default]
    CreatedAt,
    /// Review status.
    Status,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Ascending.
    Asc,
    /// Descending.
    #[default]
    Desc,
}

/// Ordering applied to a listing; defaults to newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApplicationSort {
    /// Column to sort on.
    pub column: SortColumn,
    /// Direction.
    pub direction: SortDirection,
}

impl ApplicationSort {
    fn parse(column: Option<&str>, direction: Option<&str>) -> Result<Self, Error> {
        let column = match column.map(|raw| raw.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("created_at") => SortColumn::CreatedAt,
            Some("status") => SortColumn::Status,
            Some(other) => {
                return Err(Error::invalid_request(format!("cannot sort by {other}"))
                    .with_details(serde_json::json!({
                        "field": "sort_by",
                        "allowed": ["created_at", "status"],
                    })));
            }
        };
        let direction = match direction.map(|raw| raw.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("desc") => SortDirection::Desc,
            Some("asc") => SortDirection::Asc,
            Some(other) => {
                return Err(Error::invalid_request(format!("unknown sort direction {other}"))
                    .with_details(serde_json::json!({
                        "field": "sort_dir",
                        "allowed": ["asc", "desc"],
                    })));
            }
        };
        Ok(Self { column, direction })
    }
}

/// Case-insensitive substring searched across student name, job title, and
/// company name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Trim and validate a caller-supplied term; blank input means no search.
    pub fn parse(raw: &str) -> Result<Option<Self>, Error> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.chars().count() > MAX_SEARCH_CHARS {
            return Err(Error::invalid_request(format!(
                "search must be at most {MAX_SEARCH_CHARS} characters"
            )));
        }
        Ok(Some(Self(trimmed.to_owned())))
    }

    /// The term as entered, trimmed.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// SQL `LIKE` pattern matching the term anywhere, with wildcard
    /// characters in the term escaped (escape character `\`).
    #[must_use]
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.0.len() + 2);
        pattern.push('%');
        for ch in self.0.chars() {
            if matches!(ch, '\\' | '%' | '_') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    }

    /// Case-insensitive substring test used by in-process stores.
    #[must_use]
    pub fn matches(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.0.to_lowercase())
    }
}

/// Optional, additive filters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplicationFilter {
    /// Exact status.
    pub status: Option<ApplicationStatus>,
    /// Exact job.
    pub job_id: Option<JobId>,
    /// Job domain, resolved through the jobs table.
    pub job_domain: Option<JobDomain>,
    /// Job type, resolved through the jobs table.
    pub job_type: Option<JobType>,
    /// Free-text search.
    pub search: Option<SearchTerm>,
}

/// Raw listing input as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingRequest {
    /// One-based page.
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
    /// Status filter.
    pub status: Option<String>,
    /// Job filter.
    pub job_id: Option<i64>,
    /// Job domain filter.
    pub job_domain: Option<String>,
    /// Job type filter.
    pub job_type: Option<String>,
    /// Free-text search.
    pub search: Option<String>,
    /// Sort column.
    pub sort_by: Option<String>,
    /// Sort direction.
    pub sort_dir: Option<String>,
}

/// A validated, scoped listing query ready for a store adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationListQuery {
    /// Mandatory scope.
    pub scope: ListingScope,
    /// Optional filters.
    pub filter: ApplicationFilter,
    /// Ordering.
    pub sort: ApplicationSort,
    /// Page window.
    pub page: PageRequest,
}

/// Validate a raw page window, reporting the offending field in the error
/// details.
pub fn page_request(page: Option<u32>, limit: Option<u32>) -> Result<PageRequest, Error> {
    PageRequest::new(page, limit).map_err(page_error)
}

fn page_error(err: PageRequestError) -> Error {
    let field = match err {
        PageRequestError::ZeroPage => "page",
        PageRequestError::LimitOutOfRange { .. } => "limit",
    };
    Error::invalid_request(err.to_string()).with_details(serde_json::json!({ "field": field }))
}

fn parse_optional<T>(raw: Option<&str>, field: &str) -> Result<Option<T>, Error>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|err: T::Err| {
            Error::invalid_request(err.to_string())
                .with_details(serde_json::json!({ "field": field }))
        }),
    }
}

impl ApplicationListQuery {
    /// Validate `request` and attach `scope`.
    pub fn build(scope: ListingScope, request: &ListingRequest) -> Result<Self, Error> {
        let page = page_request(request.page, request.limit)?;
        let filter = ApplicationFilter {
            status: parse_optional(request.status.as_deref(), "status")?,
            job_id: request.job_id.map(JobId::new).transpose()?,
            job_domain: parse_optional(request.job_domain.as_deref(), "job_domain")?,
            job_type: parse_optional(request.job_type.as_deref(), "job_type")?,
            search: match request.search.as_deref() {
                Some(raw) => SearchTerm::parse(raw)?,
                None => None,
            },
        };
        let sort = ApplicationSort::parse(request.sort_by.as_deref(), request.sort_dir.as_deref())?;
        Ok(Self {
            scope,
            filter,
            sort,
            page,
        })
    }
}
