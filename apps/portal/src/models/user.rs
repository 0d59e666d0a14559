use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A signed-in user session as handed out by the auth gateway.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: Uuid,
    pub user: User,
    pub expires_at: DateTime<Utc>,
}
