//! HTTP client for the JobberWobber backend.
//!
//! The backend owns all business logic: persistence, credential checks,
//! status transitions. This crate is a thin typed layer over its REST
//! endpoints: auth, listings, applications, profiles, and chat.

mod client;
mod models;

pub use client::ApiClient;
pub use models::{
    AdzunaJob, ApplicationDetail, ApplicationForm, ApplicationRecord, AppliedJob, AuthPayload,
    ChatMessage, ChatReply, JobCard, JobListing, NewListing, ReceivedApplication, RemoteMatch,
    SignupRequest, SimilarJobs, StatusSummary, SuggestedJob,
};

use thiserror::Error;

/// Error type for backend calls.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure (connection, TLS, decoding).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{detail}")]
    Backend { status: u16, detail: String },
}

impl ApiError {
    /// HTTP status of a backend rejection, if that is what this is.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for backend calls.
pub type ApiResult<T> = Result<T, ApiError>;
