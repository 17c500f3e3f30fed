// src/attempt.rs

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::api::quiz::QuizService;
use crate::error::AppError;
use crate::models::quiz::{Attempt, AttemptResult, Quiz, QuizResponse};

/// Countdown budget when the quiz carries no time limit of its own.
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 2 * 60;

/// Where the controller is in the attempt lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Quiz loaded, no active attempt, starting is allowed.
    Idle,
    /// No attempts remaining and nothing live; starting is disabled.
    Locked,
    /// The latest known result is a pass; starting is disabled.
    AlreadyPassed,
    /// An attempt is live: countdown running, answers editable.
    Active,
    /// A submit is in flight: inputs disabled, countdown frozen.
    Submitting,
    /// The last submit's outcome is on display.
    Resulted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    /// User-initiated; blocked while any question is unanswered.
    Manual,
    /// Countdown expiry; proceeds with whatever answers exist.
    Auto,
}

/// Result of advancing the countdown by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Running,
    /// The countdown just hit zero. Reported exactly once per attempt;
    /// the caller reacts by triggering an auto submit.
    Expired,
    /// No live countdown; the tick was a no-op.
    Stopped,
}

/// What the front end should do once a submit resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub result: AttemptResult,
    /// Set when the pass earned a certificate and the view should move
    /// on to the certificates page.
    pub go_to_certificates: bool,
}

/// Client-side state machine for taking a timed quiz.
///
/// Owns the transient attempt state (selected answers, countdown,
/// in-flight guard) and drives every transition that matters through the
/// remote service: start, response persistence, submit, certificate
/// issuance. The countdown here is an approximation of the server's
/// authoritative timing; elapsed time is reported at submit but pass or
/// fail is decided by the backend alone.
pub struct AttemptController {
    api: Arc<dyn QuizService>,
    quiz: Quiz,
    remaining: u32,
    history: Vec<Attempt>,
    phase: Phase,
    attempt_id: Option<i64>,
    answers: HashMap<i64, i64>,
    seconds_left: u32,
    last_result: Option<AttemptResult>,
    /// Reentrancy guard: at most one submit executes per attempt. The
    /// first trigger wins, racing triggers become no-ops.
    submit_in_flight: bool,
}

impl AttemptController {
    /// Loads quiz metadata and attempt state for a course.
    ///
    /// A live attempt found in the history (no submit timestamp) is
    /// resumed rather than duplicate-started; otherwise the phase is
    /// decided by the pass/lock status on record.
    pub async fn load(api: Arc<dyn QuizService>, course_id: i64) -> Result<Self, AppError> {
        let quiz = api.quiz_by_course(course_id).await?;
        let remaining = api.remaining_attempts(quiz.id).await?;
        let history = api.attempt_history(quiz.id).await?;

        let budget = quiz.time_limit.unwrap_or(DEFAULT_TIME_LIMIT_SECS);

        let mut controller = Self {
            api,
            quiz,
            remaining,
            history,
            phase: Phase::Idle,
            attempt_id: None,
            answers: HashMap::new(),
            seconds_left: budget,
            last_result: None,
            submit_in_flight: false,
        };

        if let Some(open) = controller.history.iter().find(|a| a.is_active()) {
            controller.attempt_id = Some(open.id);
            controller.phase = Phase::Active;
        } else if controller.latest_score_passed() {
            controller.phase = Phase::AlreadyPassed;
        } else if controller.remaining == 0 {
            controller.phase = Phase::Locked;
        }

        Ok(controller)
    }

    fn latest_score_passed(&self) -> bool {
        self.history
            .iter()
            .filter(|a| a.submitted_at.is_some())
            .max_by_key(|a| a.submitted_at)
            .map(|a| a.score >= self.quiz.passing_score)
            .unwrap_or(false)
    }

    fn time_budget(&self) -> u32 {
        self.quiz.time_limit.unwrap_or(DEFAULT_TIME_LIMIT_SECS)
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn history(&self) -> &[Attempt] {
        &self.history
    }

    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    pub fn last_result(&self) -> Option<&AttemptResult> {
        self.last_result.as_ref()
    }

    pub fn selected(&self, question_id: i64) -> Option<i64> {
        self.answers.get(&question_id).copied()
    }

    /// Whether a (new) attempt may be started right now.
    pub fn can_start(&self) -> bool {
        matches!(self.phase, Phase::Idle | Phase::Resulted)
            && self.remaining > 0
            && !self.last_result.as_ref().is_some_and(|r| r.passed)
    }

    /// Begins a new attempt. Refused locally, with no network call,
    /// while locked, already passed, or an attempt is live.
    pub async fn start(&mut self) -> Result<(), AppError> {
        match self.phase {
            Phase::Active | Phase::Submitting => {
                return Err(AppError::Validation(
                    "an attempt is already in progress".to_string(),
                ));
            }
            Phase::AlreadyPassed => {
                return Err(AppError::Validation(
                    "quiz already passed".to_string(),
                ));
            }
            Phase::Locked => {
                return Err(AppError::Validation("no attempts remaining".to_string()));
            }
            Phase::Idle | Phase::Resulted => {}
        }
        if self.remaining == 0 {
            return Err(AppError::Validation("no attempts remaining".to_string()));
        }
        if self.last_result.as_ref().is_some_and(|r| r.passed) {
            return Err(AppError::Validation("quiz already passed".to_string()));
        }

        let attempt_id = self.api.start_attempt(self.quiz.id).await?;

        self.attempt_id = Some(attempt_id);
        self.answers.clear();
        self.last_result = None;
        self.seconds_left = self.time_budget();
        self.submit_in_flight = false;
        self.phase = Phase::Active;
        Ok(())
    }

    /// Records a selection locally. No network traffic until submit.
    pub fn select_answer(&mut self, question_id: i64, answer_id: i64) {
        if self.phase == Phase::Active {
            self.answers.insert(question_id, answer_id);
        }
    }

    /// Advances the countdown by one driving second.
    ///
    /// Only an `Active` attempt ticks; a tick that lands after the
    /// controller has moved past `Active` must never mutate state.
    pub fn tick(&mut self) -> Tick {
        if self.phase != Phase::Active || self.seconds_left == 0 {
            return Tick::Stopped;
        }
        self.seconds_left -= 1;
        if self.seconds_left == 0 {
            Tick::Expired
        } else {
            Tick::Running
        }
    }

    /// Submits the active attempt.
    ///
    /// Returns `Ok(None)` when the call lost the race against another
    /// trigger (or there is nothing to submit). On transport failure the
    /// guard is released and the attempt stays live, countdown state
    /// preserved, so the user can retry.
    pub async fn submit(
        &mut self,
        trigger: SubmitTrigger,
    ) -> Result<Option<SubmitOutcome>, AppError> {
        if self.phase != Phase::Active || self.submit_in_flight {
            return Ok(None);
        }
        let Some(attempt_id) = self.attempt_id else {
            return Ok(None);
        };

        if trigger == SubmitTrigger::Manual {
            let unanswered = self
                .quiz
                .questions
                .iter()
                .filter(|q| !self.answers.contains_key(&q.id))
                .count();
            if unanswered > 0 {
                return Err(AppError::Validation(format!(
                    "{} question(s) still unanswered",
                    unanswered
                )));
            }
        }

        self.submit_in_flight = true;
        self.phase = Phase::Submitting; // freezes the countdown

        let time_taken = self.time_budget().saturating_sub(self.seconds_left);

        // Persist responses concurrently, best effort. A duplicate or
        // late save must not abort the submit: the authoritative score
        // comes from the submit call alone. All saves are attempted
        // before the submit goes out.
        let mut saves = JoinSet::new();
        for question in &self.quiz.questions {
            let payload = QuizResponse {
                attempt_id,
                question_id: question.id,
                selected_answer_id: self.answers.get(&question.id).copied(),
            };
            let api = Arc::clone(&self.api);
            saves.spawn(async move {
                let question_id = payload.question_id;
                (question_id, api.save_response(payload).await)
            });
        }
        while let Some(joined) = saves.join_next().await {
            match joined {
                Ok((question_id, Err(e))) => {
                    tracing::warn!(question_id, error = %e, "response save failed, continuing");
                }
                Ok((_, Ok(()))) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "response save task panicked");
                }
            }
        }

        let result = match self.api.submit_attempt(attempt_id, time_taken).await {
            Ok(result) => result,
            Err(e) => {
                self.submit_in_flight = false;
                self.phase = Phase::Active;
                return Err(e);
            }
        };

        self.last_result = Some(result.clone());
        self.attempt_id = None;
        self.answers.clear();
        self.seconds_left = self.time_budget();
        self.phase = Phase::Resulted;
        self.submit_in_flight = false;

        self.refresh_meta().await;

        let go_to_certificates = result.passed;
        if result.passed {
            self.api.issue_certificate(self.quiz.course_id).await?;
        }

        Ok(Some(SubmitOutcome {
            result,
            go_to_certificates,
        }))
    }

    /// Re-reads remaining attempts and history. Best effort: the submit
    /// already resolved, a stale counter only affects the next render.
    async fn refresh_meta(&mut self) {
        match self.api.remaining_attempts(self.quiz.id).await {
            Ok(remaining) => self.remaining = remaining,
            Err(e) => tracing::warn!(error = %e, "failed to refresh remaining attempts"),
        }
        match self.api.attempt_history(self.quiz.id).await {
            Ok(history) => self.history = history,
            Err(e) => tracing::warn!(error = %e, "failed to refresh attempt history"),
        }
    }
}
