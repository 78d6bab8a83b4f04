//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes a table, regenerate with `diesel print-schema` or update
//! by hand.

diesel::table! {
    /// Colleges hosting job postings.
    colleges (id) {
        id -> Int8,
        name -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Portal users. `name` feeds the listing search.
    users (id) {
        id -> Int8,
        name -> Text,
        email -> Nullable<Text>,
        college_id -> Nullable<Int8>,
        /// One of `student`, `college_admin`, `admin`.
        role -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Student-specific profile data keyed by user.
    student_profiles (user_id) {
        user_id -> Int8,
        batch -> Nullable<Int4>,
        resume_url -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Job postings owned by a college.
    jobs (id) {
        id -> Int8,
        college_id -> Int8,
        title -> Text,
        company -> Text,
        job_type -> Varchar,
        domain -> Varchar,
        eligible_batches -> Array<Int4>,
        registration_form_url -> Nullable<Text>,
        is_active -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Time-boxed reservations; unique on `(job_id, student_id)`.
    application_intents (id) {
        id -> Int8,
        job_id -> Int8,
        student_id -> Int8,
        college_id -> Int8,
        expires_at -> Timestamptz,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Confirmed applications; unique on `(job_id, student_id)`.
    applications (id) {
        id -> Int8,
        job_id -> Int8,
        student_id -> Int8,
        college_id -> Int8,
        status -> Varchar,
        resume_snapshot_url -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-user notification inbox.
    notifications (id) {
        id -> Int8,
        user_id -> Int8,
        #[sql_name = "type"]
        kind -> Varchar,
        target_id -> Nullable<Int8>,
        payload -> Jsonb,
        is_read -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(applications -> jobs (job_id));
diesel::joinable!(applications -> users (student_id));
diesel::joinable!(application_intents -> jobs (job_id));
diesel::joinable!(jobs -> colleges (college_id));
diesel::joinable!(student_profiles -> users (user_id));
diesel::joinable!(notifications -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    colleges,
    users,
    student_profiles,
    jobs,
    application_intents,
    applications,
    notifications,
);
