//! Session + console end to end over real HTTP.

mod support;

use std::time::Duration;

use axum::{extract::Path, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use tokio::io::BufReader;

use nova_tasks::api::ApiClient;
use nova_tasks::console;
use nova_tasks::domain::Difficulty;
use nova_tasks::interview::{InterviewState, Phase, Transition};
use nova_tasks::session::Session;

/// The water-filter scenario: one question, then one task.
fn water_filter_backend() -> Router {
    Router::new()
        .route(
            "/api/projects/create",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["description"], "Design a water filter");
                Json(json!({
                    "project_id": "p1",
                    "current_question": { "id": "q1", "question_text": "What is the scale?" },
                    "total_questions_so_far": 1
                }))
            }),
        )
        .route(
            "/api/projects/:id/answer",
            post(|Path(id): Path<String>, Json(body): Json<Value>| async move {
                assert_eq!(id, "p1");
                assert_eq!(body, json!({ "question_id": "q1", "answer": "Community, 500 people" }));
                Json(json!({ "all_answered": true }))
            }),
        )
        .route(
            "/api/projects/:id/generate-tasks",
            post(|Path(id): Path<String>| async move {
                assert_eq!(id, "p1");
                Json(json!({ "tasks": [{
                    "id": 1,
                    "title": "Research Phase: Design a water filter",
                    "description": "Conduct comprehensive research on existing solutions.",
                    "difficulty": "Beginner",
                    "estimated_hours": "8-12 hours",
                    "skills": ["Research", "Analysis", "Documentation"],
                    "reward_credits": 100
                }]}))
            }),
        )
}

async fn session_for(base: &str) -> Session<ApiClient> {
    let cfg = support::api_config(base, 5);
    Session::new(ApiClient::new(&cfg).unwrap(), Duration::from_secs(5), cfg.question_cap())
}

#[tokio::test]
async fn water_filter_scenario() {
    let base = support::serve(water_filter_backend()).await;
    let mut s = session_for(&base).await;

    s.submit_problem("Design a water filter").await.unwrap();
    let v = s.view();
    assert_eq!(v.phase, Phase::Interviewing);
    let q = v.current_question.unwrap();
    assert_eq!(q.text, "What is the scale?");

    assert_eq!(s.submit_answer(&q.id, "Community, 500 people").await.unwrap(), Transition::Presenting);
    let v = s.view();
    assert_eq!(v.tasks.len(), 1);
    assert_eq!(v.tasks[0].title, "Research Phase: Design a water filter");
    assert_eq!(v.tasks[0].difficulty, Difficulty::Beginner);
    assert_eq!(v.tasks[0].reward_credits, 100);
    assert_eq!(v.history.len(), 1);
    assert_eq!(v.history[0].answer_text, "Community, 500 people");

    s.reset();
    assert_eq!(s.view(), InterviewState::default().view());
}

#[tokio::test]
async fn intake_500_leaves_text_in_place() {
    let app = Router::new().route(
        "/api/projects/create",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))) }),
    );
    let base = support::serve(app).await;
    let mut s = session_for(&base).await;

    assert!(s.submit_problem("Design a water filter").await.is_err());
    let v = s.view();
    assert_eq!(v.project_id, None);
    assert_eq!(v.draft, "Design a water filter");
    assert_eq!(v.error.as_deref(), Some("Failed to start the analysis. Please try again."));
    assert!(s.state().can_submit_problem());
}

#[tokio::test]
async fn client_cap_cuts_a_long_interview_short() {
    let base = support::serve_stub(50).await;
    let cfg = nova_tasks::config::ApiConfig { max_questions: 2, ..support::api_config(&base, 5) };
    let mut s = Session::new(ApiClient::new(&cfg).unwrap(), Duration::from_secs(5), cfg.question_cap());

    s.submit_problem("Design a water filter").await.unwrap();
    let q1 = s.view().current_question.unwrap();
    assert_eq!(s.submit_answer(&q1.id, "Clean water").await.unwrap(), Transition::AwaitingAnswer);
    let q2 = s.view().current_question.unwrap();
    // The stub would keep asking; the cap ends the interview and the stub
    // refuses generation because it still expects answers.
    let err = s.submit_answer(&q2.id, "Village").await.unwrap_err();
    assert_eq!(err.user_message(nova_tasks::error::Operation::GenerateTasks), "Interview is not complete");
    assert_eq!(s.view().phase, Phase::Materializing);
    assert_eq!(s.view().history.len(), 2);
}

#[tokio::test]
async fn console_walks_through_the_stub_interview() {
    colored::control::set_override(false);
    let base = support::serve_stub(2).await;
    let mut s = session_for(&base).await;

    // Blank intake line, problem, blank answer, two answers, decline restart.
    let input = "\nDesign a water filter\n\nClean drinking water\nA village of 500\nn\n";
    let mut out = Vec::new();
    console::run(&mut s, BufReader::new(input.as_bytes()), &mut out, None).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("Please describe the problem first."));
    assert!(text.contains("Question 1\nWhat is the primary goal"));
    assert!(text.contains("An answer is required."));
    assert!(text.contains("Question 2\n"));
    assert!(text.contains("Research Phase: Design a water [Beginner]"));
    assert!(text.contains("Prototype Development [Advanced]"));
    assert_eq!(s.view().phase, Phase::Presenting);
    assert_eq!(s.view().history.len(), 2);
}

#[tokio::test]
async fn console_restart_resets_state() {
    colored::control::set_override(false);
    let base = support::serve_stub(1).await;
    let mut s = session_for(&base).await;

    let input = "Solar dryer\nDry mangoes\ny\nWind pump\nIrrigation\n";
    let mut out = Vec::new();
    console::run(&mut s, BufReader::new(input.as_bytes()), &mut out, None).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("Research Phase: Solar dryer"));
    assert!(text.contains("Research Phase: Wind pump"));
    // Second interview only carries its own answer.
    let v = s.view();
    assert_eq!(v.history.len(), 1);
    assert_eq!(v.history[0].answer_text, "Irrigation");
    assert_eq!(v.problem.as_deref(), Some("Wind pump"));
}
