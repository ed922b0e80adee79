//! HTTP client for the decomposition service.
//!
//! Three POST calls, all JSON in / JSON out. Calls are instrumented and log
//! status, latency and payload sizes (not contents).
//!
//! NOTE: these endpoints are called without a bearer token, unlike the rest of
//! the platform API. Left as-is until the product side settles it.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::ApiConfig;
use crate::domain::{ProblemStatement, ProjectId, QuestionId, TaskItem};
use crate::error::ClientError;
use crate::protocol::{
  AnswerIn, AnswerOut, AnswerOutcome, CreateProjectIn, CreateProjectOut, ErrorOut, GenerateTasksIn,
  GenerateTasksOut, OpenedProject,
};
use crate::util::trunc_for_log;

/// The service contract. `ApiClient` speaks HTTP; tests plug in scripted fakes.
#[async_trait]
pub trait DecompositionApi: Send + Sync {
  async fn create_project(&self, problem: &ProblemStatement) -> Result<OpenedProject, ClientError>;

  async fn submit_answer(
    &self,
    project_id: &ProjectId,
    question_id: &QuestionId,
    answer: &str,
  ) -> Result<AnswerOutcome, ClientError>;

  async fn generate_tasks(&self, project_id: &ProjectId) -> Result<Vec<TaskItem>, ClientError>;
}

#[derive(Clone)]
pub struct ApiClient {
  pub client: reqwest::Client,
  pub base_url: String,
  pub timeout: Duration,
}

impl ApiClient {
  pub fn new(cfg: &ApiConfig) -> Result<Self, ClientError> {
    let timeout = cfg.request_timeout();
    let client = reqwest::Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| ClientError::Network(e.to_string()))?;
    Ok(Self {
      client,
      base_url: cfg.base_url.trim_end_matches('/').to_string(),
      timeout,
    })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }

  /// POST a JSON body and decode a JSON reply. Non-2xx becomes `Http` with
  /// the body's `error` field when there is one.
  #[instrument(level = "debug", skip(self, body), fields(%path))]
  async fn post_json<B: Serialize + Sync, R: DeserializeOwned>(
    &self,
    path: &str,
    body: &B,
  ) -> Result<R, ClientError> {
    let start = Instant::now();
    let res = self
      .client
      .post(self.url(path))
      .header(USER_AGENT, concat!("nova-tasks/", env!("CARGO_PKG_VERSION")))
      .header(CONTENT_TYPE, "application/json")
      .header(ACCEPT, "application/json")
      .json(body)
      .send()
      .await
      .map_err(|e| self.transport_error(e))?;

    let status = res.status();
    let text = res.text().await.map_err(|e| self.transport_error(e))?;
    let elapsed = start.elapsed();

    if !status.is_success() {
      let message = extract_api_error(&text);
      warn!(target: "nova_tasks", %path, status = status.as_u16(), ?elapsed, body = %trunc_for_log(&text, 120), "API call failed");
      return Err(ClientError::Http { status: status.as_u16(), message });
    }

    debug!(target: "nova_tasks", %path, status = status.as_u16(), ?elapsed, body_len = text.len(), "API call succeeded");
    serde_json::from_str::<R>(&text).map_err(|e| ClientError::Malformed(e.to_string()))
  }

  fn transport_error(&self, e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
      ClientError::Timeout(self.timeout)
    } else {
      e.into()
    }
  }
}

#[async_trait]
impl DecompositionApi for ApiClient {
  #[instrument(level = "info", skip(self, problem), fields(problem_len = problem.as_str().len()))]
  async fn create_project(&self, problem: &ProblemStatement) -> Result<OpenedProject, ClientError> {
    let body = CreateProjectIn { description: problem.as_str().to_string() };
    let out: CreateProjectOut = self.post_json("/api/projects/create", &body).await?;
    let opened = OpenedProject::from(out);
    info!(target: "nova_tasks", project_id = %opened.project_id, "Project opened");
    Ok(opened)
  }

  #[instrument(level = "info", skip(self, answer), fields(%project_id, %question_id, answer_len = answer.len()))]
  async fn submit_answer(
    &self,
    project_id: &ProjectId,
    question_id: &QuestionId,
    answer: &str,
  ) -> Result<AnswerOutcome, ClientError> {
    let body = AnswerIn { question_id: question_id.0.clone(), answer: answer.to_string() };
    let path = format!("/api/projects/{}/answer", project_id);
    let out: AnswerOut = self.post_json(&path, &body).await?;
    AnswerOutcome::try_from(out)
  }

  #[instrument(level = "info", skip(self), fields(%project_id))]
  async fn generate_tasks(&self, project_id: &ProjectId) -> Result<Vec<TaskItem>, ClientError> {
    let path = format!("/api/projects/{}/generate-tasks", project_id);
    let out: GenerateTasksOut = self.post_json(&path, &GenerateTasksIn::default()).await?;
    info!(target: "nova_tasks", %project_id, count = out.tasks.len(), "Tasks generated");
    Ok(out.tasks.into_iter().map(TaskItem::from).collect())
  }
}

/// Pull the `error` string out of a failure body, if it has one.
fn extract_api_error(body: &str) -> Option<String> {
  serde_json::from_str::<ErrorOut>(body).ok().and_then(|e| e.error)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn extracts_error_field_only_when_present() {
    assert_eq!(extract_api_error(r#"{"error": "Project not found"}"#).as_deref(), Some("Project not found"));
    assert_eq!(extract_api_error("{}"), None);
    assert_eq!(extract_api_error("<html>502</html>"), None);
  }

  #[test]
  fn base_url_trailing_slash_is_dropped() {
    let cfg = ApiConfig { base_url: "http://localhost:5000/".into(), ..ApiConfig::default() };
    let client = ApiClient::new(&cfg).unwrap();
    assert_eq!(client.url("/api/projects/create"), "http://localhost:5000/api/projects/create");
  }
}
