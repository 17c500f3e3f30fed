// src/api/catalog.rs

use crate::error::AppError;
use crate::models::certificate::Certificate;
use crate::models::course::Course;
use crate::models::enrollment::{EnrollRequest, Enrollment};
use crate::models::lesson::{self, Lesson};
use crate::models::user::NotificationSettings;

use super::ApiClient;

impl ApiClient {
    pub async fn courses(&self) -> Result<Vec<Course>, AppError> {
        self.get_json("/api/courses").await
    }

    pub async fn course(&self, course_id: i64) -> Result<Course, AppError> {
        self.get_json(&format!("/api/Courses/{}", course_id)).await
    }

    /// Lessons for an enrolled learner, with completion flags. Returned
    /// in playback order regardless of wire ordering.
    pub async fn course_lessons(&self, course_id: i64) -> Result<Vec<Lesson>, AppError> {
        let mut lessons: Vec<Lesson> = self
            .get_json(&format!("/api/Courses/{}/lessons", course_id))
            .await?;
        lesson::sort_lessons(&mut lessons);
        Ok(lessons)
    }

    /// Public lesson listing shown on the course detail page before
    /// enrollment. Carries no completion state.
    pub async fn public_lessons(&self, course_id: i64) -> Result<Vec<Lesson>, AppError> {
        let mut lessons: Vec<Lesson> = self
            .get_json(&format!("/api/Lessons/course/{}", course_id))
            .await?;
        lesson::sort_lessons(&mut lessons);
        Ok(lessons)
    }

    pub async fn complete_lesson(&self, lesson_id: i64) -> Result<(), AppError> {
        self.post_unit::<()>(&format!("/api/Lessons/{}/complete", lesson_id), None)
            .await
    }

    pub async fn my_enrollments(&self) -> Result<Vec<Enrollment>, AppError> {
        self.get_json("/api/Enrollments/my").await
    }

    /// Enrolls into a course. Enrolling is idempotent from the client's
    /// point of view: an "already enrolled" conflict lands the user in
    /// the same place as a fresh enrollment, so it is not an error.
    pub async fn enroll(&self, course_id: i64) -> Result<(), AppError> {
        match self
            .post_unit("/api/Enrollments", Some(&EnrollRequest { course_id }))
            .await
        {
            Err(AppError::Http { status: 409, .. }) => Ok(()),
            other => other,
        }
    }

    pub async fn my_certificates(&self) -> Result<Vec<Certificate>, AppError> {
        self.get_json("/api/Certificates/my").await
    }

    pub async fn notification_settings(&self) -> Result<NotificationSettings, AppError> {
        self.get_json("/api/Users/settings").await
    }

    pub async fn update_notification_settings(
        &self,
        settings: &NotificationSettings,
    ) -> Result<(), AppError> {
        self.put_unit("/api/Users/settings", settings).await
    }
}
