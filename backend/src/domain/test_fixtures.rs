//! Shared fixtures for domain service tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    ApplicantDetails, ApplicantDraft, Application, ApplicationId, ApplicationNumber,
    ApplicationType, NewApplication, OfficerId, OfficerSignup, OfficerSignupDraft, PasswordHash,
};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn signup_draft() -> OfficerSignupDraft {
    OfficerSignupDraft {
        id_number: Some("12345678".into()),
        email: Some("Jane.Wanjiru@Example.org".into()),
        phone_number: Some("+254700000001".into()),
        full_name: Some("Jane Wanjiru".into()),
        station: Some("Nairobi Central".into()),
        password: Some("correct horse".into()),
    }
}

pub(crate) fn signup() -> OfficerSignup {
    OfficerSignup::try_from_draft(signup_draft()).expect("valid signup")
}

pub(crate) fn stored_hash() -> PasswordHash {
    PasswordHash::new("$argon2id$v=19$fixture")
}

pub(crate) fn applicant_draft() -> ApplicantDraft {
    ApplicantDraft {
        first_name: Some("Amina".into()),
        last_name: Some("Odhiambo".into()),
        date_of_birth: Some("1990-05-17".into()),
        gender: Some("female".into()),
        place_of_birth: Some("Kisumu".into()),
        phone_number: Some("+254711000002".into()),
        address: Some("12 Lake Road, Kisumu".into()),
        father_name: Some("Peter Odhiambo".into()),
        mother_name: Some("Grace Achieng".into()),
        previous_id_number: None,
    }
}

pub(crate) fn submitted_application(officer_id: OfficerId, sequence: u64) -> Application {
    let submitted_at = fixture_timestamp();
    let applicant = ApplicantDetails::try_from_draft(applicant_draft(), submitted_at.date_naive())
        .expect("valid applicant");
    Application::submit(
        NewApplication {
            id: ApplicationId::random(),
            officer_id,
            application_type: ApplicationType::New,
            applicant,
            supporting_documents: serde_json::json!({}),
            submitted_at,
        },
        ApplicationNumber::from_sequence(submitted_at, sequence),
    )
}
