// tests/api_tests.rs

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};

use lms_client::api::ApiClient;
use lms_client::api::quiz::QuizService;
use lms_client::attempt::{AttemptController, Phase, SubmitTrigger};
use lms_client::auth::AuthContext;
use lms_client::config::Config;
use lms_client::error::AppError;

/// Shared state of the stub backend: canned payloads plus recorders for
/// what the client actually sent.
struct Stub {
    quiz: Value,
    submit_result: Value,
    remaining: AtomicU32,
    fail_save_question: Option<i64>,

    last_auth: Mutex<Option<String>>,
    responses: Mutex<Vec<Value>>,
    start_calls: AtomicUsize,
    cert_calls: AtomicUsize,
}

impl Stub {
    fn new(question_count: i64, remaining: u32, passed: bool) -> Self {
        let questions: Vec<Value> = (1..=question_count)
            .map(|qid| {
                json!({
                    "id": qid,
                    "questionText": format!("Question {}", qid),
                    "answers": [
                        { "id": qid * 10 + 1, "answerText": "first" },
                        { "id": qid * 10 + 2, "answerText": "second" },
                    ],
                })
            })
            .collect();
        let earned = if passed { question_count } else { 0 };
        Self {
            quiz: json!({
                "id": 9,
                "courseId": 4,
                "title": "Final Quiz",
                "passingScore": 50.0,
                "timeLimit": 120,
                "questions": questions,
            }),
            submit_result: json!({
                "score": if passed { 100.0 } else { 0.0 },
                "earnedPoints": earned,
                "totalPoints": question_count,
                "passed": passed,
            }),
            remaining: AtomicU32::new(remaining),
            fail_save_question: None,
            last_auth: Mutex::new(None),
            responses: Mutex::new(Vec::new()),
            start_calls: AtomicUsize::new(0),
            cert_calls: AtomicUsize::new(0),
        }
    }

    fn record_auth(&self, headers: &HeaderMap) {
        let value = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        *self.last_auth.lock().unwrap() = value;
    }
}

fn stub_token() -> String {
    #[derive(serde::Serialize)]
    struct StubClaims {
        id: String,
        role: String,
        exp: usize,
    }
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &StubClaims {
            id: "7".to_string(),
            role: "Student".to_string(),
            exp: 4_102_444_800,
        },
        &jsonwebtoken::EncodingKey::from_secret(b"stub-secret"),
    )
    .expect("failed to sign stub token")
}

/// Spawns the stub backend on a random port and returns its base URL,
/// in the same shape the real backend serves.
async fn spawn_stub(stub: Arc<Stub>) -> String {
    let app = Router::new()
        .route("/api/Auth/login", post(login))
        .route("/api/courses", get(courses))
        .route("/api/Courses/{id}", get(course_detail))
        .route("/api/Courses/{id}/lessons", get(lessons))
        .route("/api/Lessons/{id}/complete", post(complete_lesson))
        .route("/api/Enrollments", post(enroll))
        .route("/api/Quizzes/course/{id}", get(quiz_by_course))
        .route("/api/QuizAttempts/remaining/{id}", get(remaining))
        .route("/api/QuizAttempts/my/{id}", get(history))
        .route("/api/QuizAttempts/start/{id}", post(start_attempt))
        .route("/api/QuizResponses", post(save_response))
        .route("/api/QuizAttempts/{id}/submit", put(submit_attempt))
        .route("/api/Certificates", post(issue_certificate))
        .route("/api/Certificates/my", get(my_certificates))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://127.0.0.1:{}", port)
}

async fn login() -> impl IntoResponse {
    Json(json!({ "token": stub_token() }))
}

async fn courses(State(stub): State<Arc<Stub>>, headers: HeaderMap) -> impl IntoResponse {
    stub.record_auth(&headers);
    Json(json!([
        { "id": 4, "title": "Web Development Fundamentals", "description": "HTML and friends" },
    ]))
}

async fn course_detail(Path(id): Path<i64>) -> impl IntoResponse {
    if id == 999 {
        return (StatusCode::NOT_FOUND, "Course not found").into_response();
    }
    Json(json!({
        "id": id,
        "title": "Web Development Fundamentals",
        "shortDescription": "HTML and friends",
        "category": "Web",
        "estimatedDuration": 90,
    }))
    .into_response()
}

async fn lessons() -> impl IntoResponse {
    Json(json!([
        { "id": 31, "title": "Intro", "order": 1, "isCompleted": true, "videoUrl": "/v/31" },
        { "id": 32, "title": "Tags", "order": 2, "isCompleted": false, "videoUrl": "/v/32" },
    ]))
}

async fn complete_lesson() -> impl IntoResponse {
    // Ok() with no JSON body.
    StatusCode::OK
}

async fn enroll() -> impl IntoResponse {
    (StatusCode::CONFLICT, "User already enrolled in this course")
}

async fn quiz_by_course(State(stub): State<Arc<Stub>>, headers: HeaderMap) -> impl IntoResponse {
    stub.record_auth(&headers);
    Json(stub.quiz.clone())
}

async fn remaining(State(stub): State<Arc<Stub>>) -> impl IntoResponse {
    Json(json!({ "remaining": stub.remaining.load(Ordering::SeqCst) }))
}

async fn history() -> impl IntoResponse {
    Json(json!([]))
}

async fn start_attempt(State(stub): State<Arc<Stub>>) -> impl IntoResponse {
    stub.start_calls.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "attemptId": 501 }))
}

async fn save_response(State(stub): State<Arc<Stub>>, Json(body): Json<Value>) -> impl IntoResponse {
    let question_id = body.get("questionId").and_then(|v| v.as_i64());
    stub.responses.lock().unwrap().push(body);
    if stub.fail_save_question.is_some() && question_id == stub.fail_save_question {
        return (StatusCode::INTERNAL_SERVER_ERROR, "save blew up").into_response();
    }
    StatusCode::OK.into_response()
}

async fn submit_attempt(State(stub): State<Arc<Stub>>) -> impl IntoResponse {
    let _ = stub
        .remaining
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    Json(stub.submit_result.clone())
}

async fn issue_certificate(State(stub): State<Arc<Stub>>) -> impl IntoResponse {
    stub.cert_calls.fetch_add(1, Ordering::SeqCst);
    StatusCode::CREATED
}

async fn my_certificates() -> impl IntoResponse {
    Json(json!([
        {
            "id": 12,
            "courseTitle": "Web Development Fundamentals",
            "generatedAt": "2026-08-20T10:30:00Z",
            "downloadUrl": "/api/Certificates/12/download",
        },
    ]))
}

async fn client_for(stub: Arc<Stub>) -> ApiClient {
    let base = spawn_stub(stub).await;
    let config = Config {
        api_base_url: base,
        rust_log: "info".to_string(),
        accept_invalid_certs: false,
    };
    ApiClient::new(&config, AuthContext::new()).expect("failed to build client")
}

#[tokio::test]
async fn login_stores_token_and_attaches_bearer_header() {
    let stub = Arc::new(Stub::new(1, 2, true));
    let client = client_for(stub.clone()).await;

    client.login("student@example.com", "hunter2").await.unwrap();
    assert!(client.auth().is_logged_in());

    let user = client.auth().user().expect("claims should decode");
    assert_eq!(user.id, Some(7));
    assert_eq!(user.role.as_deref(), Some("Student"));

    client.courses().await.unwrap();
    let header = stub.last_auth.lock().unwrap().clone();
    assert_eq!(header, Some(format!("Bearer {}", stub_token())));
}

#[tokio::test]
async fn anonymous_requests_carry_no_auth_header() {
    let stub = Arc::new(Stub::new(1, 2, true));
    let client = client_for(stub.clone()).await;

    client.courses().await.unwrap();
    assert!(stub.last_auth.lock().unwrap().is_none());
}

#[tokio::test]
async fn http_error_carries_response_body_text() {
    let stub = Arc::new(Stub::new(1, 2, true));
    let client = client_for(stub).await;

    match client.course(999).await {
        Err(AppError::Http { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Course not found");
        }
        other => panic!("expected HTTP error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn enroll_conflict_counts_as_success() {
    let stub = Arc::new(Stub::new(1, 2, true));
    let client = client_for(stub).await;

    // Already enrolled: the canonical policy is idempotent success.
    client.enroll(4).await.unwrap();
}

#[tokio::test]
async fn empty_body_endpoint_is_a_null_result() {
    let stub = Arc::new(Stub::new(1, 2, true));
    let client = client_for(stub).await;

    client.complete_lesson(31).await.unwrap();
}

#[tokio::test]
async fn lessons_come_back_in_playback_order() {
    let stub = Arc::new(Stub::new(1, 2, true));
    let client = client_for(stub).await;

    let lessons = client.course_lessons(4).await.unwrap();
    assert_eq!(lessons.len(), 2);
    assert!(lessons[0].order < lessons[1].order);
    assert!(lessons[0].is_completed);
}

#[tokio::test]
async fn quiz_pass_flow_over_http() {
    // Scenario A end to end: pick the right answer, pass, certificate.
    let stub = Arc::new(Stub::new(1, 2, true));
    let client = client_for(stub.clone()).await;
    client.login("student@example.com", "hunter2").await.unwrap();

    let api: Arc<dyn QuizService> = Arc::new(client.clone());
    let mut controller = AttemptController::load(api, 4).await.unwrap();
    assert_eq!(controller.phase(), Phase::Idle);

    controller.start().await.unwrap();
    controller.select_answer(1, 11);
    let outcome = controller
        .submit(SubmitTrigger::Manual)
        .await
        .unwrap()
        .expect("first submit wins");

    assert!(outcome.result.passed);
    assert!(outcome.go_to_certificates);
    assert_eq!(stub.cert_calls.load(Ordering::SeqCst), 1);

    let responses = stub.responses.lock().unwrap();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["attemptId"], json!(501));
    assert_eq!(responses[0]["selectedAnswerId"], json!(11));

    let certs = client.my_certificates().await.unwrap();
    assert_eq!(certs[0].course_title, "Web Development Fundamentals");
}

#[tokio::test]
async fn locked_quiz_never_hits_the_start_endpoint() {
    // Scenario C: no attempts remaining on load.
    let stub = Arc::new(Stub::new(1, 0, false));
    let client = client_for(stub.clone()).await;

    let api: Arc<dyn QuizService> = Arc::new(client.clone());
    let mut controller = AttemptController::load(api, 4).await.unwrap();

    assert_eq!(controller.phase(), Phase::Locked);
    assert!(controller.start().await.is_err());
    assert_eq!(stub.start_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn partial_save_failure_still_returns_authoritative_score() {
    // Scenario D: the save for question 2 500s, question 1 succeeds.
    let mut stub = Stub::new(2, 2, false);
    stub.fail_save_question = Some(2);
    let stub = Arc::new(stub);
    let client = client_for(stub.clone()).await;

    let api: Arc<dyn QuizService> = Arc::new(client.clone());
    let mut controller = AttemptController::load(api, 4).await.unwrap();

    controller.start().await.unwrap();
    controller.select_answer(1, 11);
    controller.select_answer(2, 21);
    let outcome = controller
        .submit(SubmitTrigger::Manual)
        .await
        .unwrap()
        .expect("submit proceeds past the failed save");

    assert!(!outcome.result.passed);
    assert_eq!(outcome.result.score, 0.0);
    assert_eq!(stub.responses.lock().unwrap().len(), 2);
}
