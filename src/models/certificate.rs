// src/models/certificate.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: i64,
    pub course_title: String,
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub download_url: Option<String>,
}
