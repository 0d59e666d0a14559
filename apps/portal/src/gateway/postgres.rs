//! PostgreSQL-backed auth and data gateways.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::gateway::password::{hash_password, verify_password};
use crate::gateway::{AuthGateway, DataGateway, GatewayError};
use crate::models::application::{ApplicationRow, ApplicationStatus, NewApplication};
use crate::models::job::{JobInput, JobRow};
use crate::models::user::{Session, User};

const FOREIGN_KEY_VIOLATION: &str = "23503";
const MIN_PASSWORD_LEN: usize = 6;

const JOB_COLUMNS: &str = "id, title, description, required_qualifications, \
     recommended_qualifications, salary_range, location, work_type, created_at";

const APPLICATION_COLUMNS: &str = "id, job_id, user_id, prefix, full_name, suffix, email, \
     phone, age, street, city, state, country, education, experience, pitch, \
     referral_source, gender, ethnicity, attests_qualifications, attests_work_eligibility, \
     accepts_terms, resume_path, status, submitted_at";

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// ────────────────────────────────────────────────────────────────────────────
// Auth
// ────────────────────────────────────────────────────────────────────────────

#[derive(FromRow)]
struct CredentialRow {
    id: Uuid,
    email: String,
    password_hash: String,
    created_at: chrono::DateTime<Utc>,
}

#[derive(FromRow)]
struct SessionUserRow {
    token: Uuid,
    expires_at: chrono::DateTime<Utc>,
    user_id: Uuid,
    email: String,
    created_at: chrono::DateTime<Utc>,
}

#[derive(Clone)]
pub struct PgAuthGateway {
    pool: PgPool,
    session_ttl: Duration,
    admin_grant_ttl: Duration,
}

impl PgAuthGateway {
    pub fn new(pool: PgPool, session_ttl_hours: i64, admin_grant_ttl_hours: i64) -> Self {
        Self {
            pool,
            session_ttl: Duration::hours(session_ttl_hours),
            admin_grant_ttl: Duration::hours(admin_grant_ttl_hours),
        }
    }

    /// Opens a session, clearing out sessions that have already expired.
    async fn open_session(&self, user: User) -> Result<Session, GatewayError> {
        let purged = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await?
            .rows_affected();
        if purged > 0 {
            debug!("Purged {purged} expired sessions");
        }

        let token = Uuid::new_v4();
        let expires_at = Utc::now() + self.session_ttl;
        sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(token)
            .bind(user.id)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;
        Ok(Session {
            token,
            user,
            expires_at,
        })
    }
}

#[async_trait]
impl AuthGateway for PgAuthGateway {
    async fn current_session(&self, token: Uuid) -> Result<Option<Session>, GatewayError> {
        let row: Option<SessionUserRow> = sqlx::query_as(
            r#"
            SELECT s.token, s.expires_at, u.id AS user_id, u.email, u.created_at
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = $1 AND s.expires_at > NOW()
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Session {
            token: r.token,
            expires_at: r.expires_at,
            user: User {
                id: r.user_id,
                email: r.email,
                created_at: r.created_at,
            },
        }))
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, GatewayError> {
        let email = normalize_email(email);
        if !email.contains('@') {
            return Err(GatewayError::Rejected(
                "Unable to validate email address: invalid format".to_string(),
            ));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(GatewayError::Rejected(format!(
                "Password should be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let user: Option<User> = sqlx::query_as(
            r#"
            INSERT INTO users (id, email, password_hash)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&email)
        .bind(hash_password(password))
        .fetch_optional(&self.pool)
        .await?;

        let user =
            user.ok_or_else(|| GatewayError::Rejected("User already registered".to_string()))?;
        info!("Registered user {}", user.id);
        self.open_session(user).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, GatewayError> {
        let email = normalize_email(email);
        let row: Option<CredentialRow> = sqlx::query_as(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(&email)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) if verify_password(password, &row.password_hash) => {
                let user = User {
                    id: row.id,
                    email: row.email,
                    created_at: row.created_at,
                };
                info!("User {} signed in", user.id);
                self.open_session(user).await
            }
            _ => Err(GatewayError::Rejected(
                "Invalid login credentials".to_string(),
            )),
        }
    }

    async fn sign_out(&self, token: Uuid) -> Result<(), GatewayError> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn grant_admin(&self) -> Result<Uuid, GatewayError> {
        let purged = sqlx::query("DELETE FROM admin_grants WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await?
            .rows_affected();
        if purged > 0 {
            debug!("Purged {purged} expired admin grants");
        }

        let token = Uuid::new_v4();
        let expires_at = Utc::now() + self.admin_grant_ttl;
        sqlx::query("INSERT INTO admin_grants (token, expires_at) VALUES ($1, $2)")
            .bind(token)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;
        info!("Issued admin grant valid until {expires_at}");
        Ok(token)
    }

    async fn has_admin_grant(&self, token: Uuid) -> Result<bool, GatewayError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM admin_grants WHERE token = $1 AND expires_at > NOW())",
        )
        .bind(token)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn revoke_admin(&self, token: Uuid) -> Result<(), GatewayError> {
        sqlx::query("DELETE FROM admin_grants WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Data
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PgDataGateway {
    pool: PgPool,
}

impl PgDataGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DataGateway for PgDataGateway {
    async fn list_jobs(&self) -> Result<Vec<JobRow>, GatewayError> {
        Ok(sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs ORDER BY created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<JobRow>, GatewayError> {
        Ok(
            sqlx::query_as::<_, JobRow>(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn insert_job(&self, job: &JobInput) -> Result<JobRow, GatewayError> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            r#"
            INSERT INTO jobs
                (id, title, description, required_qualifications,
                 recommended_qualifications, salary_range, location, work_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.required_qualifications)
        .bind(&job.recommended_qualifications)
        .bind(&job.salary_range)
        .bind(&job.location)
        .bind(&job.work_type)
        .fetch_one(&self.pool)
        .await?;

        info!("Created job {} ({})", row.id, row.title);
        Ok(row)
    }

    async fn update_job(&self, id: Uuid, job: &JobInput) -> Result<Option<JobRow>, GatewayError> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            r#"
            UPDATE jobs SET
                title = $2,
                description = $3,
                required_qualifications = $4,
                recommended_qualifications = $5,
                salary_range = $6,
                location = $7,
                work_type = $8
            WHERE id = $1
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.required_qualifications)
        .bind(&job.recommended_qualifications)
        .bind(&job.salary_range)
        .bind(&job.location)
        .bind(&job.work_type)
        .fetch_optional(&self.pool)
        .await?;

        if row.is_some() {
            info!("Updated job {id}");
        }
        Ok(row)
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool, GatewayError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    GatewayError::Rejected(
                        "This posting has applications and cannot be deleted".to_string(),
                    )
                } else {
                    GatewayError::Database(e)
                }
            })?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Deleted job {id}");
        }
        Ok(deleted)
    }

    async fn insert_application(
        &self,
        application: &NewApplication,
    ) -> Result<ApplicationRow, GatewayError> {
        let a = &application.applicant;
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            r#"
            INSERT INTO applications
                (id, job_id, user_id, prefix, full_name, suffix, email, phone, age,
                 street, city, state, country, education, experience, pitch,
                 referral_source, gender, ethnicity, attests_qualifications,
                 attests_work_eligibility, accepts_terms, resume_path, status, submitted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                    $17, $18, $19, $20, $21, $22, $23, $24, $25)
            RETURNING {APPLICATION_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(application.job_id)
        .bind(application.user_id)
        .bind(&a.prefix)
        .bind(&a.full_name)
        .bind(&a.suffix)
        .bind(&a.email)
        .bind(&a.phone)
        .bind(a.age)
        .bind(&a.street)
        .bind(&a.city)
        .bind(&a.state)
        .bind(&a.country)
        .bind(&a.education)
        .bind(&a.experience)
        .bind(&a.pitch)
        .bind(&a.referral_source)
        .bind(&a.gender)
        .bind(&a.ethnicity)
        .bind(a.attests_qualifications)
        .bind(a.attests_work_eligibility)
        .bind(a.accepts_terms)
        .bind(&application.resume_path)
        .bind(ApplicationStatus::Submitted)
        .bind(application.submitted_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                GatewayError::Rejected("This job posting is no longer available".to_string())
            } else {
                GatewayError::Database(e)
            }
        })?;

        info!(
            "Inserted application {} for job {} by user {}",
            row.id, row.job_id, row.user_id
        );
        Ok(row)
    }

    async fn get_application(&self, id: Uuid) -> Result<Option<ApplicationRow>, GatewayError> {
        Ok(sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_applications_for_job(
        &self,
        job_id: Uuid,
    ) -> Result<Vec<ApplicationRow>, GatewayError> {
        Ok(sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE job_id = $1 ORDER BY submitted_at DESC"
        ))
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn count_applications_for_job(&self, job_id: Uuid) -> Result<i64, GatewayError> {
        Ok(
            sqlx::query_scalar("SELECT COUNT(*) FROM applications WHERE job_id = $1")
                .bind(job_id)
                .fetch_one(&self.pool)
                .await?,
        )
    }

    async fn count_applications(&self) -> Result<i64, GatewayError> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM applications")
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<bool, GatewayError> {
        let result = sqlx::query("UPDATE applications SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        let updated = result.rows_affected() > 0;
        if updated {
            info!("Application {id} moved to '{}'", status.as_str());
        }
        Ok(updated)
    }
}
