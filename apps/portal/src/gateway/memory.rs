//! In-memory gateways for tests. They record the calls that matter to the
//! handler tests (uploads, inserts, status updates) so tests can assert on
//! what did or did not reach the backend.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::gateway::{
    AuthGateway, BucketConfig, DataGateway, GatewayError, StorageGateway, StoredObject,
};
use crate::models::application::{ApplicationRow, ApplicationStatus, NewApplication};
use crate::models::job::{JobInput, JobRow};
use crate::models::user::{Session, User};

// ────────────────────────────────────────────────────────────────────────────
// Auth
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryAuth {
    users: Mutex<Vec<(User, String)>>,
    sessions: Mutex<HashMap<Uuid, Session>>,
    admin_grants: Mutex<HashMap<Uuid, DateTime<Utc>>>,
}

impl MemoryAuth {
    /// Creates a user with an open session and returns the session token.
    pub fn signed_in_user(&self, email: &str) -> Session {
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        self.users
            .lock()
            .unwrap()
            .push((user.clone(), "password".to_string()));
        self.open_session(user)
    }

    /// Stores a session for a new user that expired an hour ago.
    pub fn expired_session(&self, email: &str) -> Session {
        let session = Session {
            token: Uuid::new_v4(),
            user: User {
                id: Uuid::new_v4(),
                email: email.to_string(),
                created_at: Utc::now(),
            },
            expires_at: Utc::now() - Duration::hours(1),
        };
        self.sessions
            .lock()
            .unwrap()
            .insert(session.token, session.clone());
        session
    }

    /// Stores an admin grant that expired an hour ago.
    pub fn expired_admin_grant(&self) -> Uuid {
        let token = Uuid::new_v4();
        self.admin_grants
            .lock()
            .unwrap()
            .insert(token, Utc::now() - Duration::hours(1));
        token
    }

    pub fn admin_grant_count(&self) -> usize {
        self.admin_grants.lock().unwrap().len()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    fn open_session(&self, user: User) -> Session {
        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4(),
            user,
            expires_at: now + Duration::hours(1),
        };
        let mut sessions = self.sessions.lock().unwrap();
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(session.token, session.clone());
        session
    }
}

#[async_trait]
impl AuthGateway for MemoryAuth {
    async fn current_session(&self, token: Uuid) -> Result<Option<Session>, GatewayError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .get(&token)
            .filter(|s| s.expires_at > Utc::now())
            .cloned())
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, GatewayError> {
        let user = {
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|(u, _)| u.email == email) {
                return Err(GatewayError::Rejected("User already registered".to_string()));
            }
            let user = User {
                id: Uuid::new_v4(),
                email: email.to_string(),
                created_at: Utc::now(),
            };
            users.push((user.clone(), password.to_string()));
            user
        };
        Ok(self.open_session(user))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, GatewayError> {
        let user = self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|(u, p)| u.email == email && p == password)
            .map(|(u, _)| u.clone());
        match user {
            Some(user) => Ok(self.open_session(user)),
            None => Err(GatewayError::Rejected(
                "Invalid login credentials".to_string(),
            )),
        }
    }

    async fn sign_out(&self, token: Uuid) -> Result<(), GatewayError> {
        self.sessions.lock().unwrap().remove(&token);
        Ok(())
    }

    async fn grant_admin(&self) -> Result<Uuid, GatewayError> {
        let now = Utc::now();
        let token = Uuid::new_v4();
        let mut grants = self.admin_grants.lock().unwrap();
        grants.retain(|_, expires_at| *expires_at > now);
        grants.insert(token, now + Duration::hours(12));
        Ok(token)
    }

    async fn has_admin_grant(&self, token: Uuid) -> Result<bool, GatewayError> {
        Ok(self
            .admin_grants
            .lock()
            .unwrap()
            .get(&token)
            .is_some_and(|expires_at| *expires_at > Utc::now()))
    }

    async fn revoke_admin(&self, token: Uuid) -> Result<(), GatewayError> {
        self.admin_grants.lock().unwrap().remove(&token);
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Data
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryData {
    jobs: Mutex<Vec<JobRow>>,
    applications: Mutex<Vec<ApplicationRow>>,
    pub application_inserts: Mutex<usize>,
    pub status_updates: Mutex<Vec<(Uuid, ApplicationStatus)>>,
    pub count_queries: Mutex<Vec<Uuid>>,
}

impl MemoryData {
    pub fn seed_job(&self, title: &str) -> JobRow {
        let job = JobRow {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: format!("{title} description"),
            required_qualifications: "BS in a relevant field".to_string(),
            recommended_qualifications: None,
            salary_range: None,
            location: None,
            work_type: None,
            created_at: Utc::now(),
        };
        self.jobs.lock().unwrap().push(job.clone());
        job
    }

    pub fn seed_application(&self, application: &NewApplication) -> ApplicationRow {
        let row = ApplicationRow {
            id: Uuid::new_v4(),
            job_id: application.job_id,
            user_id: application.user_id,
            applicant: application.applicant.clone(),
            resume_path: application.resume_path.clone(),
            status: ApplicationStatus::Submitted,
            submitted_at: application.submitted_at,
        };
        self.applications.lock().unwrap().push(row.clone());
        row
    }

    pub fn applications(&self) -> Vec<ApplicationRow> {
        self.applications.lock().unwrap().clone()
    }

    pub fn jobs(&self) -> Vec<JobRow> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl DataGateway for MemoryData {
    async fn list_jobs(&self) -> Result<Vec<JobRow>, GatewayError> {
        Ok(self.jobs())
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<JobRow>, GatewayError> {
        Ok(self.jobs.lock().unwrap().iter().find(|j| j.id == id).cloned())
    }

    async fn insert_job(&self, job: &JobInput) -> Result<JobRow, GatewayError> {
        let row = JobRow {
            id: Uuid::new_v4(),
            title: job.title.clone(),
            description: job.description.clone(),
            required_qualifications: job.required_qualifications.clone(),
            recommended_qualifications: job.recommended_qualifications.clone(),
            salary_range: job.salary_range.clone(),
            location: job.location.clone(),
            work_type: job.work_type.clone(),
            created_at: Utc::now(),
        };
        self.jobs.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn update_job(&self, id: Uuid, job: &JobInput) -> Result<Option<JobRow>, GatewayError> {
        let mut jobs = self.jobs.lock().unwrap();
        let Some(row) = jobs.iter_mut().find(|j| j.id == id) else {
            return Ok(None);
        };
        row.title = job.title.clone();
        row.description = job.description.clone();
        row.required_qualifications = job.required_qualifications.clone();
        row.recommended_qualifications = job.recommended_qualifications.clone();
        row.salary_range = job.salary_range.clone();
        row.location = job.location.clone();
        row.work_type = job.work_type.clone();
        Ok(Some(row.clone()))
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool, GatewayError> {
        if self
            .applications
            .lock()
            .unwrap()
            .iter()
            .any(|a| a.job_id == id)
        {
            return Err(GatewayError::Rejected(
                "This posting has applications and cannot be deleted".to_string(),
            ));
        }
        let mut jobs = self.jobs.lock().unwrap();
        let before = jobs.len();
        jobs.retain(|j| j.id != id);
        Ok(jobs.len() < before)
    }

    async fn insert_application(
        &self,
        application: &NewApplication,
    ) -> Result<ApplicationRow, GatewayError> {
        *self.application_inserts.lock().unwrap() += 1;
        if !self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .any(|j| j.id == application.job_id)
        {
            return Err(GatewayError::Rejected(
                "This job posting is no longer available".to_string(),
            ));
        }
        Ok(self.seed_application(application))
    }

    async fn get_application(&self, id: Uuid) -> Result<Option<ApplicationRow>, GatewayError> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn list_applications_for_job(
        &self,
        job_id: Uuid,
    ) -> Result<Vec<ApplicationRow>, GatewayError> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn count_applications_for_job(&self, job_id: Uuid) -> Result<i64, GatewayError> {
        self.count_queries.lock().unwrap().push(job_id);
        Ok(self
            .applications
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.job_id == job_id)
            .count() as i64)
    }

    async fn count_applications(&self) -> Result<i64, GatewayError> {
        Ok(self.applications.lock().unwrap().len() as i64)
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<bool, GatewayError> {
        self.status_updates.lock().unwrap().push((id, status));
        let mut applications = self.applications.lock().unwrap();
        match applications.iter_mut().find(|a| a.id == id) {
            Some(row) => {
                row.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Storage
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryStorage {
    buckets: Mutex<Vec<BucketConfig>>,
    objects: Mutex<HashMap<String, StoredObject>>,
    pub uploads: Mutex<Vec<String>>,
    pub deletes: Mutex<Vec<String>>,
    /// When set, every upload fails with this storage error message.
    pub fail_uploads_with: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn bucket_names(&self) -> Vec<String> {
        self.buckets
            .lock()
            .unwrap()
            .iter()
            .map(|b| b.name.clone())
            .collect()
    }

    pub fn put_object(&self, path: &str, bytes: &'static [u8], content_type: &str) {
        self.objects.lock().unwrap().insert(
            path.to_string(),
            StoredObject {
                bytes: Bytes::from_static(bytes),
                content_type: content_type.to_string(),
            },
        );
    }

    pub fn contains(&self, path: &str) -> bool {
        self.objects.lock().unwrap().contains_key(path)
    }
}

#[async_trait]
impl StorageGateway for MemoryStorage {
    async fn list_buckets(&self) -> Result<Vec<String>, GatewayError> {
        Ok(self.bucket_names())
    }

    async fn create_bucket(&self, config: &BucketConfig) -> Result<(), GatewayError> {
        let mut buckets = self.buckets.lock().unwrap();
        if !buckets.iter().any(|b| b.name == config.name) {
            buckets.push(config.clone());
        }
        Ok(())
    }

    async fn upload(
        &self,
        path: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<String, GatewayError> {
        self.uploads.lock().unwrap().push(path.to_string());
        if let Some(message) = self.fail_uploads_with.lock().unwrap().clone() {
            return Err(GatewayError::Storage(message));
        }
        self.objects.lock().unwrap().insert(
            path.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(path.to_string())
    }

    async fn download(&self, path: &str) -> Result<StoredObject, GatewayError> {
        self.objects
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("object {path}")))
    }

    fn public_url(&self, path: &str) -> String {
        format!("http://storage.test/resumes/{path}")
    }

    async fn delete(&self, path: &str) -> Result<(), GatewayError> {
        self.deletes.lock().unwrap().push(path.to_string());
        self.objects.lock().unwrap().remove(path);
        Ok(())
    }
}
