//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`
//! exactly. `diesel print-schema` against a migrated database regenerates
//! them; keep the doc comments when doing so.

diesel::table! {
    /// Officer accounts awaiting or past admin approval.
    officers (id) {
        id -> Uuid,
        /// National identity number; unique.
        id_number -> Varchar,
        /// Trimmed, lower-cased email; unique.
        email -> Varchar,
        phone_number -> Varchar,
        full_name -> Varchar,
        station -> Varchar,
        /// PHC-encoded Argon2 credential.
        password_hash -> Text,
        /// `pending`, `approved` or `rejected`.
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Administrator accounts seeded from configuration.
    admins (id) {
        id -> Uuid,
        username -> Varchar,
        full_name -> Varchar,
        password_hash -> Text,
    }
}

diesel::table! {
    /// One counter row per identifier scope.
    identifier_sequences (scope) {
        scope -> Varchar,
        last_value -> Int8,
    }
}

diesel::table! {
    /// Citizen ID applications.
    applications (id) {
        id -> Uuid,
        application_number -> Varchar,
        officer_id -> Uuid,
        application_type -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        date_of_birth -> Date,
        gender -> Varchar,
        place_of_birth -> Varchar,
        phone_number -> Varchar,
        address -> Text,
        father_name -> Varchar,
        mother_name -> Varchar,
        previous_id_number -> Nullable<Varchar>,
        supporting_documents -> Jsonb,
        /// `submitted`, `approved`, `rejected` or `dispatched`.
        status -> Varchar,
        /// Set iff status is approved or dispatched.
        generated_id_number -> Nullable<Varchar>,
        card_arrived -> Bool,
        collected -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Uploaded supporting documents.
    documents (id) {
        id -> Uuid,
        application_id -> Uuid,
        document_type -> Varchar,
        file_path -> Text,
        original_name -> Text,
        uploaded_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only audit log of application lifecycle events.
    application_events (id) {
        id -> Uuid,
        application_id -> Uuid,
        action -> Varchar,
        from_status -> Nullable<Varchar>,
        to_status -> Varchar,
        actor_role -> Varchar,
        actor_id -> Uuid,
        occurred_at -> Timestamptz,
    }
}

diesel::joinable!(applications -> officers (officer_id));
diesel::joinable!(documents -> applications (application_id));
diesel::joinable!(application_events -> applications (application_id));

diesel::allow_tables_to_appear_in_same_query!(
    officers,
    admins,
    identifier_sequences,
    applications,
    documents,
    application_events,
);
