use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A candidate's uploaded resume. `user_id` is the candidate identifier;
/// `file_path` is the key of the blob in resume storage.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_path: String,
    pub original_filename: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewResume {
    pub user_id: Uuid,
    pub file_path: String,
    pub original_filename: String,
}
