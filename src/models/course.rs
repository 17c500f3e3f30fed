// src/models/course.rs

use serde::{Deserialize, Serialize};

/// A catalog course. The catalog list and the detail endpoint expose
/// different subsets of these fields, hence the optionals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Total duration in minutes.
    #[serde(default)]
    pub estimated_duration: Option<u32>,
}
