// src/app.rs

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::time::{Instant, interval_at};

use crate::api::ApiClient;
use crate::api::quiz::QuizService;
use crate::attempt::{AttemptController, Phase, SubmitOutcome, SubmitTrigger, Tick};
use crate::auth::{Destination, post_login_destination};
use crate::error::AppError;
use crate::models::enrollment::dashboard_stats;
use crate::models::lesson::{Lesson, neighbor, unlocked_flags};

type Input = Lines<BufReader<Stdin>>;

/// Interactive terminal session. Every operation failure is printed and
/// control returns to the menu; nothing here kills the process.
pub async fn run(client: ApiClient) -> Result<(), AppError> {
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    println!("== e-learning platform ==");
    loop {
        let choice = if client.auth().is_logged_in() {
            menu(
                &mut input,
                &[
                    ("d", "dashboard"),
                    ("c", "course catalog"),
                    ("t", "my certificates"),
                    ("s", "settings"),
                    ("o", "log out"),
                    ("q", "quit"),
                ],
            )
            .await?
        } else {
            menu(
                &mut input,
                &[
                    ("l", "log in"),
                    ("r", "register"),
                    ("c", "browse courses"),
                    ("q", "quit"),
                ],
            )
            .await?
        };

        let result = match choice.as_str() {
            "q" => return Ok(()),
            "l" => login(&client, &mut input).await,
            "r" => register(&client, &mut input).await,
            "o" => {
                client.logout();
                println!("logged out");
                Ok(())
            }
            "c" => catalog(&client, &mut input).await,
            "d" => dashboard(&client, &mut input).await,
            "t" => certificates(&client).await,
            "s" => settings(&client, &mut input).await,
            _ => {
                println!("unknown choice");
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("error: {}", e);
        }
    }
}

async fn menu(input: &mut Input, items: &[(&str, &str)]) -> Result<String, AppError> {
    println!();
    for (key, label) in items {
        println!("  [{}] {}", key, label);
    }
    prompt(input, "> ").await
}

async fn prompt(input: &mut Input, label: &str) -> Result<String, AppError> {
    use std::io::Write;
    print!("{}", label);
    std::io::stdout().flush().ok();
    let line = input
        .next_line()
        .await
        .map_err(|e| AppError::Validation(format!("stdin closed: {}", e)))?;
    Ok(line.unwrap_or_default().trim().to_string())
}

async fn login(client: &ApiClient, input: &mut Input) -> Result<(), AppError> {
    let email = prompt(input, "email: ").await?;
    let password = prompt(input, "password: ").await?;
    client.login(&email, &password).await?;

    let role = client.auth().user().and_then(|u| u.role);
    match post_login_destination(role.as_deref()) {
        Destination::InstructorDashboard => {
            // Instructor tooling lives in the web console; this client
            // only covers the learner flows.
            println!("logged in as instructor; learner views only here");
        }
        Destination::StudentDashboard => println!("logged in"),
    }
    Ok(())
}

async fn register(client: &ApiClient, input: &mut Input) -> Result<(), AppError> {
    let email = prompt(input, "email: ").await?;
    let password = prompt(input, "password: ").await?;
    client.register(&email, &password).await?;
    println!("registered; you can log in now");
    Ok(())
}

async fn catalog(client: &ApiClient, input: &mut Input) -> Result<(), AppError> {
    let courses = client.courses().await?;
    if courses.is_empty() {
        println!("no courses available");
        return Ok(());
    }
    for course in &courses {
        println!(
            "  #{} {} - {}",
            course.id,
            course.title,
            course.description.as_deref().unwrap_or("")
        );
    }

    let choice = prompt(input, "course id (blank to go back): ").await?;
    let Ok(course_id) = choice.parse::<i64>() else {
        return Ok(());
    };

    let course = client.course(course_id).await?;
    println!("\n{}", course.title);
    if let Some(desc) = course.short_description.as_deref() {
        println!("{}", desc);
    }
    if let Some(minutes) = course.estimated_duration {
        println!("~{} min", minutes);
    }
    let lessons = client.public_lessons(course_id).await?;
    for lesson in &lessons {
        println!("  {}. {}", lesson.order, lesson.title);
    }

    if client.auth().is_logged_in() {
        let choice = prompt(input, "enroll? [y/N]: ").await?;
        if choice.eq_ignore_ascii_case("y") {
            client.enroll(course_id).await?;
            println!("enrolled");
        }
    }
    Ok(())
}

async fn dashboard(client: &ApiClient, input: &mut Input) -> Result<(), AppError> {
    let enrollments = client.my_enrollments().await?;
    let stats = dashboard_stats(&enrollments);
    println!(
        "\nenrolled: {}  completed: {}  certificates: {}",
        stats.enrolled, stats.completed, stats.certificates
    );
    for enrollment in &enrollments {
        println!(
            "  #{} {} ({:.0}%)",
            enrollment.course_id, enrollment.course_title, enrollment.progress_percentage
        );
    }

    let choice = prompt(input, "course id (blank to go back): ").await?;
    let Ok(course_id) = choice.parse::<i64>() else {
        return Ok(());
    };
    if !enrollments.iter().any(|e| e.course_id == course_id) {
        println!("not enrolled in that course");
        return Ok(());
    }
    enrolled_course(client, input, course_id).await
}

async fn enrolled_course(
    client: &ApiClient,
    input: &mut Input,
    course_id: i64,
) -> Result<(), AppError> {
    loop {
        let lessons = client.course_lessons(course_id).await?;
        let unlocked = unlocked_flags(&lessons);
        println!();
        for (lesson, unlocked) in lessons.iter().zip(&unlocked) {
            let status = if lesson.is_completed {
                "completed"
            } else if *unlocked {
                "available"
            } else {
                "locked"
            };
            println!("  {}. {} [{}]", lesson.order, lesson.title, status);
        }
        println!("  [z] take quiz  [b] back");

        let choice = prompt(input, "> ").await?;
        match choice.as_str() {
            "b" => return Ok(()),
            "z" => {
                // A pass already navigated to the certificates view.
                if quiz(client, input, course_id).await? {
                    return Ok(());
                }
            }
            other => {
                let Ok(order) = other.parse::<u32>() else {
                    continue;
                };
                let Some(index) = lessons.iter().position(|l| l.order == order) else {
                    println!("no such lesson");
                    continue;
                };
                if !unlocked[index] {
                    println!("lesson is locked; complete the previous one first");
                    continue;
                }
                play_lesson(client, input, course_id, lessons[index].id).await?;
            }
        }
    }
}

async fn play_lesson(
    client: &ApiClient,
    input: &mut Input,
    course_id: i64,
    mut lesson_id: i64,
) -> Result<(), AppError> {
    loop {
        let lessons = client.course_lessons(course_id).await?;
        let Some(current) = lessons.iter().find(|l| l.id == lesson_id) else {
            println!("no lesson found");
            return Ok(());
        };

        println!("\n{}", current.title);
        if let Some(url) = current.video_url.as_deref() {
            println!("video: {}", url);
        }
        println!("  [c] complete  [p] previous  [n] next  [b] back");

        match prompt(input, "> ").await?.as_str() {
            "b" => return Ok(()),
            "c" => {
                client.complete_lesson(lesson_id).await?;
                // Move on to the next lesson, or back to the course
                // overview after the last one.
                match next_lesson(client, course_id, lesson_id).await? {
                    Some(next_id) => lesson_id = next_id,
                    None => return Ok(()),
                }
            }
            "p" => {
                if let Some(prev) = neighbor(&lessons, current, -1) {
                    lesson_id = prev.id;
                }
            }
            "n" => {
                if let Some(next) = neighbor(&lessons, current, 1) {
                    lesson_id = next.id;
                }
            }
            _ => {}
        }
    }
}

async fn next_lesson(
    client: &ApiClient,
    course_id: i64,
    lesson_id: i64,
) -> Result<Option<i64>, AppError> {
    let lessons: Vec<Lesson> = client.course_lessons(course_id).await?;
    let current = lessons.iter().find(|l| l.id == lesson_id);
    Ok(current.and_then(|c| neighbor(&lessons, c, 1)).map(|l| l.id))
}

/// Runs the timed quiz screen. Returns true when a pass should land the
/// user on the certificates view.
async fn quiz(client: &ApiClient, input: &mut Input, course_id: i64) -> Result<bool, AppError> {
    let api: Arc<dyn QuizService> = Arc::new(client.clone());
    let mut controller = AttemptController::load(api, course_id).await?;

    let quiz = controller.quiz();
    println!("\n{} (pass at {:.0}%)", quiz.title, quiz.passing_score);
    if let Some(desc) = quiz.description.as_deref() {
        println!("{}", desc);
    }
    println!("remaining attempts: {}", controller.remaining());
    for attempt in controller.history() {
        let status = if attempt.is_active() {
            "in progress"
        } else {
            "submitted"
        };
        println!("  attempt #{} - {:.0}% [{}]", attempt.id, attempt.score, status);
    }

    match controller.phase() {
        Phase::Locked => {
            println!("quiz locked - no attempts remaining");
            return Ok(false);
        }
        Phase::AlreadyPassed => {
            println!("you already passed this quiz");
            return Ok(false);
        }
        Phase::Active => {
            println!("resuming your open attempt");
        }
        _ => {
            let choice = prompt(input, "press enter to start (b to go back): ").await?;
            if choice == "b" {
                return Ok(false);
            }
            controller.start().await?;
        }
    }

    render_questions(&controller);

    // One driving timer; the select below serializes the only two
    // triggers that can race, timer expiry and user input, so submit
    // runs through the controller guard exactly once.
    let mut timer = interval_at(Instant::now() + Duration::from_secs(1), Duration::from_secs(1));

    loop {
        tokio::select! {
            _ = timer.tick() => {
                if controller.tick() == Tick::Expired {
                    println!("\ntime is up, submitting...");
                    match controller.submit(SubmitTrigger::Auto).await {
                        Ok(Some(outcome)) => return finish(client, outcome).await,
                        Ok(None) => {}
                        Err(e) => println!("error: {}", e),
                    }
                }
            }
            line = input.next_line() => {
                let line = line
                    .map_err(|e| AppError::Validation(format!("stdin closed: {}", e)))?
                    .unwrap_or_default();
                match handle_quiz_line(&mut controller, line.trim()).await {
                    QuizStep::Continue => {}
                    QuizStep::Back => return Ok(false),
                    QuizStep::Done(outcome) => return finish(client, outcome).await,
                }
            }
        }
    }
}

enum QuizStep {
    Continue,
    Back,
    Done(SubmitOutcome),
}

async fn handle_quiz_line(controller: &mut AttemptController, line: &str) -> QuizStep {
    match line {
        "b" => return QuizStep::Back,
        "s" => match controller.submit(SubmitTrigger::Manual).await {
            Ok(Some(outcome)) => return QuizStep::Done(outcome),
            Ok(None) => {}
            Err(e) => println!("error: {}", e),
        },
        "r" => render_questions(controller),
        other => {
            // "<question number> <answer number>"
            let mut parts = other.split_whitespace();
            let picked = (
                parts.next().and_then(|p| p.parse::<usize>().ok()),
                parts.next().and_then(|p| p.parse::<usize>().ok()),
            );
            if let (Some(q_no), Some(a_no)) = picked {
                let quiz = controller.quiz();
                let selection = quiz.questions.get(q_no.wrapping_sub(1)).and_then(|q| {
                    q.answers.get(a_no.wrapping_sub(1)).map(|a| (q.id, a.id))
                });
                match selection {
                    Some((question_id, answer_id)) => {
                        controller.select_answer(question_id, answer_id);
                    }
                    None => println!("no such question/answer"),
                }
            } else if !other.is_empty() {
                println!("enter '<question> <answer>', s to submit, r to redraw, b to leave");
            }
        }
    }
    let mm = controller.seconds_left() / 60;
    let ss = controller.seconds_left() % 60;
    println!("[{:01}:{:02} left]", mm, ss);
    QuizStep::Continue
}

fn render_questions(controller: &AttemptController) {
    for (qi, question) in controller.quiz().questions.iter().enumerate() {
        println!("\n{}. {}", qi + 1, question.question_text);
        for (ai, answer) in question.answers.iter().enumerate() {
            let marker = if controller.selected(question.id) == Some(answer.id) {
                "*"
            } else {
                " "
            };
            println!("   {}{}) {}", marker, ai + 1, answer.answer_text);
        }
    }
    println!("\nanswer with '<question> <answer>', s to submit, b to leave");
}

async fn finish(client: &ApiClient, outcome: SubmitOutcome) -> Result<bool, AppError> {
    let result = &outcome.result;
    if result.passed {
        println!(
            "passed! score {:.0}% ({}/{})",
            result.score, result.earned_points, result.total_points
        );
    } else {
        println!(
            "failed. score {:.0}% ({}/{})",
            result.score, result.earned_points, result.total_points
        );
    }

    if outcome.go_to_certificates {
        // The certificate record is persisted asynchronously server-side;
        // give it a moment before fetching the list.
        tokio::time::sleep(Duration::from_millis(800)).await;
        certificates(client).await?;
        return Ok(true);
    }
    Ok(false)
}

async fn certificates(client: &ApiClient) -> Result<(), AppError> {
    let certs = client.my_certificates().await?;
    if certs.is_empty() {
        println!("no certificates yet");
        return Ok(());
    }
    println!("\nmy certificates:");
    for cert in &certs {
        println!(
            "  #{} {} ({})",
            cert.id,
            cert.course_title,
            cert.generated_at.format("%Y-%m-%d")
        );
        if let Some(url) = cert.download_url.as_deref() {
            println!("     download: {}", url);
        }
    }
    Ok(())
}

async fn settings(client: &ApiClient, input: &mut Input) -> Result<(), AppError> {
    let mut settings = client.notification_settings().await?;
    println!(
        "\n[1] email notifications: {}\n[2] course reminders: {}",
        settings.email_notifications, settings.course_reminders
    );
    match prompt(input, "toggle which (blank to go back): ").await?.as_str() {
        "1" => settings.email_notifications = !settings.email_notifications,
        "2" => settings.course_reminders = !settings.course_reminders,
        _ => return Ok(()),
    }
    client.update_notification_settings(&settings).await?;
    println!("saved");
    Ok(())
}
