// src/models/enrollment.rs

use serde::{Deserialize, Serialize};

/// One row of the learner's enrollment list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub course_id: i64,
    pub course_title: String,
    #[serde(default)]
    pub category: Option<String>,
    pub progress_percentage: f64,
}

/// DTO for enrolling into a course.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    pub course_id: i64,
}

/// Aggregates shown on the student dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    pub enrolled: usize,
    pub completed: usize,
    pub certificates: usize,
}

/// A course counts as completed at 100% progress; each completed course
/// corresponds to one certificate.
pub fn dashboard_stats(enrollments: &[Enrollment]) -> DashboardStats {
    let enrolled = enrollments.len();
    let completed = enrollments
        .iter()
        .filter(|e| e.progress_percentage >= 100.0)
        .count();
    DashboardStats {
        enrolled,
        completed,
        certificates: completed,
    }
}
