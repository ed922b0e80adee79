//! HTTP endpoint handlers for the stub. These are thin wrappers that forward to
//! `StubState` and translate refusals into `{error}` bodies.

use std::sync::Arc;

use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument};

use crate::protocol::*;
use crate::stub::state::{StubError, StubState};

impl IntoResponse for StubError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      StubError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      StubError::NotFound => (StatusCode::NOT_FOUND, "Project not found"),
      StubError::Conflict(m) => (StatusCode::CONFLICT, m),
    };
    (status, Json(ErrorOut { error: Some(message.to_string()) })).into_response()
  }
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state, body), fields(description_len = body.description.len()))]
pub async fn http_create_project(
  State(state): State<Arc<StubState>>,
  Json(body): Json<CreateProjectIn>,
) -> Result<Json<CreateProjectOut>, StubError> {
  let out = state.create_project(&body.description).await?;
  info!(target: "stub", project_id = %out.project_id, "HTTP create_project served");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, body), fields(%project_id, question_id = %body.question_id, answer_len = body.answer.len()))]
pub async fn http_post_answer(
  State(state): State<Arc<StubState>>,
  Path(project_id): Path<String>,
  Json(body): Json<AnswerIn>,
) -> Result<Json<AnswerOut>, StubError> {
  let out = state.answer(&project_id, &body.question_id, &body.answer).await?;
  info!(target: "stub", %project_id, all_answered = out.all_answered, "HTTP answer evaluated");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state), fields(%project_id))]
pub async fn http_generate_tasks(
  State(state): State<Arc<StubState>>,
  Path(project_id): Path<String>,
) -> Result<Json<GenerateTasksOut>, StubError> {
  let tasks = state.generate_tasks(&project_id).await?;
  Ok(Json(GenerateTasksOut { tasks }))
}
