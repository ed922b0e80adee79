//! Domain models for the decomposition interview: problem statement, questions,
//! acknowledged answers, and the generated task batch.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ClientError;

/// Opaque server handle for a project.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub String);

impl fmt::Display for ProjectId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// Opaque server handle for a question.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub String);

impl fmt::Display for QuestionId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// The user's problem description. Can only be built from non-blank text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProblemStatement(String);

impl ProblemStatement {
  pub fn parse(text: &str) -> Result<Self, ClientError> {
    if text.trim().is_empty() {
      return Err(ClientError::Validation("problem description is empty".into()));
    }
    Ok(Self(text.to_string()))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

/// One adaptive prompt issued by the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
  pub id: QuestionId,
  pub text: String,
}

/// An answer the server has acknowledged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Answer {
  pub question_id: QuestionId,
  pub question_text: String,
  pub answer_text: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
  Beginner,
  Intermediate,
  Advanced,
}

impl Difficulty {
  pub fn label(&self) -> &'static str {
    match self {
      Difficulty::Beginner => "Beginner",
      Difficulty::Intermediate => "Intermediate",
      Difficulty::Advanced => "Advanced",
    }
  }
}

impl std::str::FromStr for Difficulty {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "beginner" => Ok(Difficulty::Beginner),
      "intermediate" => Ok(Difficulty::Intermediate),
      "advanced" => Ok(Difficulty::Advanced),
      other => Err(format!("unknown difficulty '{other}'")),
    }
  }
}

// The backend capitalizes difficulty ("Beginner"); accept any casing.
impl<'de> Deserialize<'de> for Difficulty {
  fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(d)?;
    raw.parse().map_err(serde::de::Error::custom)
  }
}

impl Serialize for Difficulty {
  fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(self.label())
  }
}

impl fmt::Display for Difficulty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

/// A generated unit of work.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskItem {
  pub id: String,
  pub title: String,
  pub description: String,
  pub difficulty: Difficulty,
  pub estimated_hours: String,
  pub skills: Vec<String>,
  pub reward_credits: u32,
}
