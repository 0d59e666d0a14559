//! The three backend collaborators the portal delegates to.
//!
//! Handlers and page renderers only ever talk to these traits. `AppState`
//! carries each one as an `Arc<dyn _>`; production wires PostgreSQL and S3,
//! tests wire the in-memory versions in [`memory`].

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use uuid::Uuid;

use crate::models::application::{ApplicationRow, ApplicationStatus, NewApplication};
use crate::models::job::{JobInput, JobRow};
use crate::models::user::{Session, User};

pub mod password;
pub mod postgres;
pub mod s3;

#[cfg(test)]
pub mod memory;

pub const PDF_MIME: &str = "application/pdf";
pub const DOC_MIME: &str = "application/msword";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// MIME types accepted for resumes.
pub const RESUME_MIME_TYPES: [&str; 3] = [PDF_MIME, DOC_MIME, DOCX_MIME];

/// Resume size ceiling: 10 MB.
pub const RESUME_MAX_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The backend refused the request and said why (bad credentials,
    /// duplicate email, referenced rows...). The message is user-facing.
    #[error("{0}")]
    Rejected(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Auth
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Returns the live session for a token, if any.
    async fn current_session(&self, token: Uuid) -> Result<Option<Session>, GatewayError>;

    async fn current_user(&self, token: Uuid) -> Result<Option<User>, GatewayError> {
        Ok(self.current_session(token).await?.map(|s| s.user))
    }

    /// Registers a new account and signs it in.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, GatewayError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, GatewayError>;

    async fn sign_out(&self, token: Uuid) -> Result<(), GatewayError>;

    /// Issues an admin grant token. Grants are independent of user sessions
    /// and lapse after a fixed lifetime.
    async fn grant_admin(&self) -> Result<Uuid, GatewayError>;

    /// True only for a grant that exists and has not expired.
    async fn has_admin_grant(&self, token: Uuid) -> Result<bool, GatewayError>;

    async fn revoke_admin(&self, token: Uuid) -> Result<(), GatewayError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Data
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait DataGateway: Send + Sync {
    /// All postings, oldest first.
    async fn list_jobs(&self) -> Result<Vec<JobRow>, GatewayError>;

    async fn get_job(&self, id: Uuid) -> Result<Option<JobRow>, GatewayError>;

    async fn insert_job(&self, job: &JobInput) -> Result<JobRow, GatewayError>;

    async fn update_job(&self, id: Uuid, job: &JobInput) -> Result<Option<JobRow>, GatewayError>;

    /// Returns `false` if no posting had that id.
    async fn delete_job(&self, id: Uuid) -> Result<bool, GatewayError>;

    async fn insert_application(
        &self,
        application: &NewApplication,
    ) -> Result<ApplicationRow, GatewayError>;

    async fn get_application(&self, id: Uuid) -> Result<Option<ApplicationRow>, GatewayError>;

    async fn list_applications_for_job(
        &self,
        job_id: Uuid,
    ) -> Result<Vec<ApplicationRow>, GatewayError>;

    async fn count_applications_for_job(&self, job_id: Uuid) -> Result<i64, GatewayError>;

    async fn count_applications(&self) -> Result<i64, GatewayError>;

    /// Returns `false` if no application had that id.
    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<bool, GatewayError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Object storage
// ────────────────────────────────────────────────────────────────────────────

/// Bucket settings applied on creation and enforced on upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketConfig {
    pub name: String,
    pub public: bool,
    pub allowed_mime_types: Vec<String>,
    pub file_size_limit: u64,
}

impl BucketConfig {
    /// The resumes bucket: public links, PDF/DOC/DOCX only, 10 MB ceiling.
    pub fn resumes(name: &str) -> Self {
        BucketConfig {
            name: name.to_string(),
            public: true,
            allowed_mime_types: RESUME_MIME_TYPES.iter().map(|m| m.to_string()).collect(),
            file_size_limit: RESUME_MAX_BYTES,
        }
    }

    /// Checks an upload against the bucket's MIME and size limits.
    pub fn check_upload(&self, content_type: &str, size: u64) -> Result<(), GatewayError> {
        if !self.allowed_mime_types.iter().any(|m| m == content_type) {
            return Err(GatewayError::Storage(format!(
                "mime type {content_type} is not supported by bucket {}",
                self.name
            )));
        }
        if size > self.file_size_limit {
            return Err(GatewayError::Storage(format!(
                "object exceeded the maximum allowed size of {} bytes",
                self.file_size_limit
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Bytes,
    pub content_type: String,
}

#[async_trait]
pub trait StorageGateway: Send + Sync {
    async fn list_buckets(&self) -> Result<Vec<String>, GatewayError>;

    /// Creates the bucket. Creating an existing bucket is not an error.
    async fn create_bucket(&self, config: &BucketConfig) -> Result<(), GatewayError>;

    /// Stores `bytes` under `path` and returns the stored key.
    async fn upload(
        &self,
        path: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<String, GatewayError>;

    async fn download(&self, path: &str) -> Result<StoredObject, GatewayError>;

    fn public_url(&self, path: &str) -> String;

    async fn delete(&self, path: &str) -> Result<(), GatewayError>;
}

/// True when a storage error says the bucket is missing.
pub fn is_missing_bucket(err: &GatewayError) -> bool {
    match err {
        GatewayError::Storage(msg) | GatewayError::NotFound(msg) => {
            msg.to_lowercase().contains("bucket not found")
        }
        _ => false,
    }
}
