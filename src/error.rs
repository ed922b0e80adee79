//! Error taxonomy for the interview client.
//!
//! Every failure is handled at the session boundary and reduced to one banner
//! string via [`ClientError::user_message`].

use std::time::Duration;

use thiserror::Error;

/// Which network-bound step failed. Selects the generic banner text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
  CreateProject,
  SubmitAnswer,
  GenerateTasks,
}

impl Operation {
  pub fn as_str(&self) -> &'static str {
    match self {
      Operation::CreateProject => "create_project",
      Operation::SubmitAnswer => "submit_answer",
      Operation::GenerateTasks => "generate_tasks",
    }
  }

  fn generic_message(&self) -> &'static str {
    match self {
      Operation::CreateProject => "Failed to start the analysis. Please try again.",
      Operation::SubmitAnswer => "Failed to submit your answer. Please try again.",
      Operation::GenerateTasks => "Failed to generate tasks. Start a new problem to try again.",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
  /// Local input check; never reaches the network.
  #[error("Invalid input: {0}")]
  Validation(String),

  #[error("A request is already in flight")]
  Busy,

  #[error("Network error: {0}")]
  Network(String),

  #[error("HTTP {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
  Http { status: u16, message: Option<String> },

  #[error("Malformed response: {0}")]
  Malformed(String),

  #[error("Timed out after {0:?}")]
  Timeout(Duration),

  #[error("Request cancelled")]
  Cancelled,
}

impl ClientError {
  /// Banner text shown to the user. A server-provided `error` field is shown
  /// verbatim; everything else collapses to a per-operation message.
  pub fn user_message(&self, op: Operation) -> String {
    match self {
      ClientError::Validation(msg) => msg.clone(),
      ClientError::Http { message: Some(m), .. } if !m.trim().is_empty() => m.clone(),
      ClientError::Timeout(_) => "The server took too long to respond. Please try again.".into(),
      ClientError::Cancelled => "Request cancelled.".into(),
      _ => op.generic_message().into(),
    }
  }
}

impl From<reqwest::Error> for ClientError {
  fn from(e: reqwest::Error) -> Self {
    if e.is_decode() {
      ClientError::Malformed(e.to_string())
    } else {
      ClientError::Network(e.to_string())
    }
  }
}
