// src/api/quiz.rs

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::quiz::{Attempt, AttemptResult, Quiz, QuizResponse};

use super::ApiClient;

/// Remote operations behind the quiz-attempt flow.
///
/// The attempt controller talks to this seam only, so the whole state
/// machine can be exercised against a mock backend.
#[async_trait]
pub trait QuizService: Send + Sync {
    async fn quiz_by_course(&self, course_id: i64) -> Result<Quiz, AppError>;
    async fn remaining_attempts(&self, quiz_id: i64) -> Result<u32, AppError>;
    async fn attempt_history(&self, quiz_id: i64) -> Result<Vec<Attempt>, AppError>;
    async fn start_attempt(&self, quiz_id: i64) -> Result<i64, AppError>;
    async fn save_response(&self, response: QuizResponse) -> Result<(), AppError>;
    async fn submit_attempt(
        &self,
        attempt_id: i64,
        time_taken: u32,
    ) -> Result<AttemptResult, AppError>;
    async fn issue_certificate(&self, course_id: i64) -> Result<(), AppError>;
}

#[derive(Debug, Deserialize)]
struct RemainingResponse {
    remaining: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartAttemptResponse {
    attempt_id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitAttemptRequest {
    time_taken: u32,
}

#[async_trait]
impl QuizService for ApiClient {
    async fn quiz_by_course(&self, course_id: i64) -> Result<Quiz, AppError> {
        self.get_json(&format!("/api/Quizzes/course/{}", course_id))
            .await
    }

    async fn remaining_attempts(&self, quiz_id: i64) -> Result<u32, AppError> {
        let res: RemainingResponse = self
            .get_json(&format!("/api/QuizAttempts/remaining/{}", quiz_id))
            .await?;
        Ok(res.remaining)
    }

    async fn attempt_history(&self, quiz_id: i64) -> Result<Vec<Attempt>, AppError> {
        self.get_json(&format!("/api/QuizAttempts/my/{}", quiz_id))
            .await
    }

    async fn start_attempt(&self, quiz_id: i64) -> Result<i64, AppError> {
        let res: StartAttemptResponse = self
            .post_empty(&format!("/api/QuizAttempts/start/{}", quiz_id))
            .await?;
        Ok(res.attempt_id)
    }

    async fn save_response(&self, response: QuizResponse) -> Result<(), AppError> {
        // The endpoint returns Ok() with no JSON body.
        self.post_unit("/api/QuizResponses", Some(&response)).await
    }

    async fn submit_attempt(
        &self,
        attempt_id: i64,
        time_taken: u32,
    ) -> Result<AttemptResult, AppError> {
        self.put_json(
            &format!("/api/QuizAttempts/{}/submit", attempt_id),
            &SubmitAttemptRequest { time_taken },
        )
        .await
    }

    async fn issue_certificate(&self, course_id: i64) -> Result<(), AppError> {
        self.post_unit::<()>(&format!("/api/Certificates?courseId={}", course_id), None)
            .await
    }
}
