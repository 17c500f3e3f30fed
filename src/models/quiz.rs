// src/models/quiz.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A quiz as exposed to learners. The backend never sends correctness
/// flags; scoring is entirely server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    /// Passing threshold in percent.
    pub passing_score: f64,
    /// Time limit in seconds, when the backend provides one.
    #[serde(default)]
    pub time_limit: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub question_text: String,
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: i64,
    pub answer_text: String,
}

/// One timed instance of a user taking a quiz, tracked server-side.
/// `submitted_at == None` is the sole liveness signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub id: i64,
    pub score: f64,
    pub earned_points: i64,
    pub total_points: i64,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_taken: Option<u32>,
}

impl Attempt {
    pub fn is_active(&self) -> bool {
        self.submitted_at.is_none()
    }
}

/// A user's selected answer for one question within one attempt.
/// `selected_answer_id` serializes as `null` when the question was left
/// unanswered (auto-submit on timeout).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResponse {
    pub attempt_id: i64,
    pub question_id: i64,
    pub selected_answer_id: Option<i64>,
}

/// Authoritative outcome returned by the submit call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptResult {
    pub score: f64,
    pub earned_points: i64,
    pub total_points: i64,
    pub passed: bool,
}
