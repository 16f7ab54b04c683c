//! REST client for the JobberWobber backend.

use crate::models::*;
use crate::{ApiError, ApiResult};
use session_store::Profile;

/// Typed HTTP client for the backend API.
///
/// Calls are asynchronous and uncoalesced; there is no client-side
/// timeout or retry policy. Whatever ordering the network produces is
/// the ordering the caller sees.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client for the backend at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build a full URL for an endpoint path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a non-success response to `ApiError::Backend`, extracting the
    /// backend's `{detail}` message when there is one.
    async fn check(response: reqwest::Response) -> ApiResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        tracing::debug!(status = %status, detail = %detail, "backend rejected request");
        Err(ApiError::Backend {
            status: status.as_u16(),
            detail,
        })
    }

    // ==========================================
    // Auth
    // ==========================================

    /// `POST /login` with the password grant form the backend expects.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<AuthPayload> {
        let form = [
            ("username", username),
            ("password", password),
            ("grant_type", "password"),
        ];
        let response = self.http.post(self.url("/login")).form(&form).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `POST /signup`.
    pub async fn signup(&self, request: &SignupRequest) -> ApiResult<AuthPayload> {
        let response = self
            .http
            .post(self.url("/signup"))
            .json(request)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `POST /reset/password`. The caller proves ownership by logging in
    /// first and presenting the resulting token.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> ApiResult<()> {
        let body = serde_json::json!({ "new_password": new_password });
        let response = self
            .http
            .post(self.url("/reset/password"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    // ==========================================
    // Listings
    // ==========================================

    /// `GET /jobcard`: every listing joined with its company name.
    pub async fn jobcards(&self) -> ApiResult<Vec<JobCard>> {
        let response = self.http.get(self.url("/jobcard")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `GET /search?q=`: substring search over listings.
    pub async fn search(&self, q: &str) -> ApiResult<Vec<JobCard>> {
        let response = self
            .http
            .get(self.url("/search"))
            .query(&[("q", q)])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `GET /adzuna?q=`: external aggregator results.
    pub async fn adzuna(&self, q: &str) -> ApiResult<Vec<AdzunaJob>> {
        let response = self
            .http
            .get(self.url("/adzuna"))
            .query(&[("q", q)])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `GET /listings/{id}`.
    pub async fn listing(&self, id: i64) -> ApiResult<JobListing> {
        let response = self
            .http
            .get(self.url(&format!("/listings/{}", id)))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `GET /listings/{id}/similar`: remote jobs resembling a listing.
    pub async fn similar(&self, id: i64, limit: usize) -> ApiResult<SimilarJobs> {
        let response = self
            .http
            .get(self.url(&format!("/listings/{}/similar", id)))
            .query(&[("limit", limit.to_string())])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `GET /employers/{id}/listings`.
    pub async fn employer_listings(&self, employer_id: i64) -> ApiResult<Vec<JobListing>> {
        let response = self
            .http
            .get(self.url(&format!("/employers/{}/listings", employer_id)))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `POST /listings`.
    pub async fn create_listing(&self, listing: &NewListing) -> ApiResult<JobListing> {
        let response = self
            .http
            .post(self.url("/listings"))
            .json(listing)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `PUT /listings/{id}`.
    pub async fn update_listing(&self, id: i64, listing: &NewListing) -> ApiResult<JobListing> {
        let response = self
            .http
            .put(self.url(&format!("/listings/{}", id)))
            .json(listing)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `DELETE /listings/{id}`.
    pub async fn delete_listing(&self, id: i64) -> ApiResult<()> {
        let response = self
            .http
            .delete(self.url(&format!("/listings/{}", id)))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// `POST /upload_csv`: bulk listing upload. Returns the backend's
    /// summary message.
    pub async fn upload_listings_csv(
        &self,
        employer_id: i64,
        file_name: &str,
        contents: Vec<u8>,
    ) -> ApiResult<String> {
        let part = reqwest::multipart::Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let form = reqwest::multipart::Form::new()
            .text("employer_id", employer_id.to_string())
            .part("file", part);

        let response = self
            .http
            .post(self.url("/upload_csv"))
            .multipart(form)
            .send()
            .await?;
        let value: serde_json::Value = Self::check(response).await?.json().await?;
        Ok(value
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Upload complete")
            .to_string())
    }

    // ==========================================
    // Applications
    // ==========================================

    /// `POST /apply`. A 409 means the seeker already applied and comes
    /// back as a normal backend error.
    pub async fn apply(&self, form: &ApplicationForm, token: &str) -> ApiResult<()> {
        let response = self
            .http
            .post(self.url("/apply"))
            .bearer_auth(token)
            .json(form)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// `GET /applications/{user_id}`: the seeker's applications joined
    /// with the listings they target.
    pub async fn applied_jobs(&self, user_id: i64) -> ApiResult<Vec<AppliedJob>> {
        let response = self
            .http
            .get(self.url(&format!("/applications/{}", user_id)))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `GET /applications/status/user/{id}`: per-status counts.
    pub async fn user_status_summary(&self, user_id: i64) -> ApiResult<StatusSummary> {
        let response = self
            .http
            .get(self.url(&format!("/applications/status/user/{}", user_id)))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `GET /applications/status/employer/{id}`: per-status counts.
    pub async fn employer_status_summary(&self, employer_id: i64) -> ApiResult<StatusSummary> {
        let response = self
            .http
            .get(self.url(&format!("/applications/status/employer/{}", employer_id)))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `GET /employers/{id}/applications`: everything submitted to an
    /// employer's listings.
    pub async fn received_applications(
        &self,
        employer_id: i64,
    ) -> ApiResult<Vec<ReceivedApplication>> {
        let response = self
            .http
            .get(self.url(&format!("/employers/{}/applications", employer_id)))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `GET /application/{id}`: one application with listing and
    /// applicant detail.
    pub async fn application_detail(&self, app_id: i64) -> ApiResult<ApplicationDetail> {
        let response = self
            .http
            .get(self.url(&format!("/application/{}", app_id)))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `PUT /application/{id}/status`.
    pub async fn set_application_status(&self, app_id: i64, status: &str) -> ApiResult<()> {
        let body = serde_json::json!({ "status": status });
        let response = self
            .http
            .put(self.url(&format!("/application/{}/status", app_id)))
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    // ==========================================
    // Profiles
    // ==========================================

    /// `PUT /users/{id}`: save profile/resume edits. Returns the
    /// refreshed profile to feed back into the session.
    pub async fn update_user(&self, user_id: i64, profile: &Profile) -> ApiResult<Profile> {
        let response = self
            .http
            .put(self.url(&format!("/users/{}", user_id)))
            .json(profile)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `PUT /employers/{id}`: save employer profile edits.
    pub async fn update_employer(
        &self,
        employer_id: i64,
        profile: &Profile,
    ) -> ApiResult<Profile> {
        let response = self
            .http
            .put(self.url(&format!("/employers/{}", employer_id)))
            .json(profile)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    // ==========================================
    // Chat
    // ==========================================

    /// `POST /chat`: send the whole transcript plus recent search terms,
    /// get the assistant's reply and any job suggestions back.
    pub async fn chat(
        &self,
        history: &[ChatMessage],
        search_history: &[String],
    ) -> ApiResult<ChatReply> {
        let body = serde_json::json!({
            "history": history,
            "search_history": search_history,
        });
        let response = self.http.post(self.url("/chat")).json(&body).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }
}
