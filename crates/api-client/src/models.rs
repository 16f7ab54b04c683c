//! Wire types for the JobberWobber backend.

use serde::{Deserialize, Serialize};
use session_store::{Profile, Role};

/// Successful response from `/login` or `/signup`.
///
/// Signup returns the account under `user` for job seekers and
/// `employer` for employers; `account()` folds the two together the way
/// the web client does.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthPayload {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub user: Option<Profile>,
    #[serde(default)]
    pub employer: Option<Profile>,
}

impl AuthPayload {
    /// The account record, whichever key it arrived under.
    pub fn account(self) -> Option<Profile> {
        self.user.or(self.employer)
    }
}

/// Request body for `/signup`. Role-conditional fields are omitted from
/// the JSON when unset.
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer_name: Option<String>,
}

impl SignupRequest {
    /// Signup payload for a job seeker.
    pub fn user(
        username: impl Into<String>,
        password: impl Into<String>,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role: Role::User,
            first_name,
            last_name,
            employer_name: None,
        }
    }

    /// Signup payload for an employer.
    pub fn employer(
        username: impl Into<String>,
        password: impl Into<String>,
        employer_name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role: Role::Employer,
            first_name: None,
            last_name: None,
            employer_name: Some(employer_name.into()),
        }
    }
}

/// A job listing as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListing {
    #[serde(default)]
    pub id: Option<i64>,
    pub employer_id: i64,
    pub title: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub experience: String,
    pub salary: String,
    pub description: String,
}

/// Payload for creating or updating a listing.
#[derive(Debug, Clone, Serialize)]
pub struct NewListing {
    pub employer_id: i64,
    pub title: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub experience: String,
    pub salary: String,
    pub description: String,
}

/// A listing joined with its employer's display name, as returned by
/// `/jobcard` and `/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCard {
    #[serde(default)]
    pub id: Option<i64>,
    pub employer_id: i64,
    pub title: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub experience: String,
    pub salary: String,
    pub description: String,
    pub company: String,
}

/// A job from the Adzuna aggregator, via `/adzuna`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdzunaJob {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    /// Either a salary figure or a placeholder string, depending on
    /// whether the aggregator predicted it.
    #[serde(default)]
    pub salary: Option<serde_json::Value>,
    pub url: String,
    #[serde(default)]
    pub publication_date: Option<String>,
}

/// Remote match inside a `/listings/{id}/similar` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteMatch {
    pub title: String,
    pub company: String,
    pub url: String,
    #[serde(default)]
    pub publication_date: Option<String>,
    #[serde(default)]
    pub salary: Option<serde_json::Value>,
}

/// Response of `/listings/{id}/similar`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarJobs {
    pub local_listing: JobListing,
    pub remote_matches: Vec<RemoteMatch>,
}

/// Application payload for `/apply`: the listing coordinates plus a
/// snapshot of the applicant's resume fields at submission time.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationForm {
    pub user_id: i64,
    pub employer_id: i64,
    pub job_listing_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<String>,
}

impl ApplicationForm {
    /// Build an application from the current profile snapshot.
    pub fn from_profile(user_id: i64, employer_id: i64, job_listing_id: i64, profile: &Profile) -> Self {
        let take = |name: &str| profile.field(name).map(str::to_string);
        Self {
            user_id,
            employer_id,
            job_listing_id,
            first_name: take("first_name"),
            last_name: take("last_name"),
            email: take("email"),
            phone: take("phone"),
            location: take("location"),
            linkedin_url: take("linkedin_url"),
            experience: take("experience"),
            skills: take("skills"),
            education: take("education"),
            summary: take("summary"),
            other: take("other"),
        }
    }
}

/// An application row as the backend stores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub user_id: i64,
    pub employer_id: i64,
    pub job_listing_id: i64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub snapshot: serde_json::Map<String, serde_json::Value>,
}

/// A seeker's application joined with the listing it targets, as
/// returned by `/applications/{user_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedJob {
    pub app_id: i64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub experience: String,
    pub salary: String,
    pub company: String,
}

/// An application received by an employer, joined with the title of the
/// listing it targets (`/employers/{id}/applications`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceivedApplication {
    pub id: i64,
    pub user_id: i64,
    pub job_listing_id: i64,
    #[serde(default)]
    pub status: Option<String>,
    pub title: String,
    #[serde(flatten)]
    pub snapshot: serde_json::Map<String, serde_json::Value>,
}

/// Full detail for one application: the stored row, the listing it
/// targets, and the applicant's contact/resume snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationDetail {
    pub application: ApplicationRecord,
    pub listing: serde_json::Value,
    pub applicant: serde_json::Map<String, serde_json::Value>,
}

/// Per-status application counts for the dashboards
/// (`Submitted`, `Under Review`, `Interview`, `Rejected`, `Accepted`,
/// plus `Total`).
pub type StatusSummary = std::collections::BTreeMap<String, i64>;

/// One turn of the chat transcript. The transcript lives client-side
/// and is echoed in full on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// A job suggestion attached to a chat reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestedJob {
    pub title: String,
    pub company: String,
    pub url: String,
}

/// Response of `/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    #[serde(default)]
    pub jobs: Vec<SuggestedJob>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_payload_account_prefers_user_key() {
        let payload: AuthPayload = serde_json::from_str(
            r#"{"access_token": "t", "user": {"id": 1, "role": "user"}}"#,
        )
        .unwrap();
        assert_eq!(payload.account().and_then(|p| p.id), Some(1));
    }

    #[test]
    fn test_auth_payload_account_falls_back_to_employer_key() {
        let payload: AuthPayload = serde_json::from_str(
            r#"{"access_token": "t", "employer": {"id": 2, "role": "employer"}}"#,
        )
        .unwrap();
        let account = payload.account().unwrap();
        assert_eq!(account.id, Some(2));
        assert_eq!(account.role, Role::Employer);
    }

    #[test]
    fn test_auth_payload_tolerates_missing_fields() {
        let payload: AuthPayload = serde_json::from_str(r#"{}"#).unwrap();
        assert!(payload.access_token.is_none());
        assert!(payload.account().is_none());
    }

    #[test]
    fn test_signup_request_user_omits_employer_name() {
        let request = SignupRequest::user("casey", "pw", Some("Casey".into()), None);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["role"], "user");
        assert_eq!(json["first_name"], "Casey");
        assert!(json.get("last_name").is_none());
        assert!(json.get("employer_name").is_none());
    }

    #[test]
    fn test_signup_request_employer_omits_name_fields() {
        let request = SignupRequest::employer("acme", "pw", "Acme Inc");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["role"], "employer");
        assert_eq!(json["employer_name"], "Acme Inc");
        assert!(json.get("first_name").is_none());
    }

    #[test]
    fn test_job_listing_type_field_renamed() {
        let raw = r#"{
            "id": 5, "employer_id": 2, "title": "Backend Engineer",
            "location": "Remote", "type": "Full-time",
            "experience": "Mid", "salary": "$120k", "description": "..."
        }"#;
        let listing: JobListing = serde_json::from_str(raw).unwrap();
        assert_eq!(listing.job_type, "Full-time");

        let back = serde_json::to_value(&listing).unwrap();
        assert_eq!(back["type"], "Full-time");
    }

    #[test]
    fn test_adzuna_salary_tolerates_mixed_types() {
        let with_number: AdzunaJob = serde_json::from_str(
            r#"{"id": "adzuna_1", "title": "Dev", "company": "A", "location": "NY",
                "salary": 90000, "url": "https://x", "publication_date": "2024-01-01"}"#,
        )
        .unwrap();
        assert!(with_number.salary.is_some());

        let with_marker: AdzunaJob = serde_json::from_str(
            r#"{"id": "adzuna_2", "title": "Dev", "company": "A", "location": "NY",
                "salary": "$", "url": "https://x"}"#,
        )
        .unwrap();
        assert_eq!(with_marker.salary, Some(serde_json::json!("$")));
    }

    #[test]
    fn test_application_form_snapshots_profile_fields() {
        let mut profile = Profile::new(7, Role::User);
        profile.set_field("first_name", "Casey");
        profile.set_field("skills", "Rust");

        let form = ApplicationForm::from_profile(7, 2, 5, &profile);
        let json = serde_json::to_value(&form).unwrap();

        assert_eq!(json["user_id"], 7);
        assert_eq!(json["employer_id"], 2);
        assert_eq!(json["job_listing_id"], 5);
        assert_eq!(json["first_name"], "Casey");
        assert_eq!(json["skills"], "Rust");
        // Unset resume fields are omitted, not null.
        assert!(json.get("email").is_none());
    }

    #[test]
    fn test_status_summary_decodes() {
        let summary: StatusSummary = serde_json::from_str(
            r#"{"Submitted": 2, "Under Review": 1, "Interview": 0,
                "Rejected": 0, "Accepted": 1, "Total": 4}"#,
        )
        .unwrap();
        assert_eq!(summary["Total"], 4);
        assert_eq!(summary["Submitted"], 2);
    }

    #[test]
    fn test_chat_reply_without_jobs() {
        let reply: ChatReply = serde_json::from_str(r#"{"reply": "hi"}"#).unwrap();
        assert_eq!(reply.reply, "hi");
        assert!(reply.jobs.is_empty());
    }
}
