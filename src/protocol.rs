//! Wire DTOs for the decomposition endpoints (serde ready).
//! Shared by the HTTP client and the stub backend so both ends agree on shape.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{Difficulty, ProjectId, Question, QuestionId, TaskItem};
use crate::error::ClientError;

/// Ids are opaque strings on our side; the platform backend hands out SQLite
/// integer keys, so accept either.
fn opaque_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
    }
    Ok(match Raw::deserialize(d)? {
        Raw::Str(s) => s,
        Raw::Int(n) => n.to_string(),
    })
}

fn default_reward() -> u32 {
    100
}

/// Credits are a JSON number; some backends emit `150.0`. Round and clamp
/// into `u32` rather than failing the whole batch.
fn credits<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u64),
        Float(f64),
    }
    Ok(match Raw::deserialize(d)? {
        Raw::Int(n) => u32::try_from(n).unwrap_or(u32::MAX),
        Raw::Float(f) if f.is_nan() => default_reward(),
        Raw::Float(f) => f.round().clamp(0.0, u32::MAX as f64) as u32,
    })
}

//
// Create project
//

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateProjectIn {
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOut {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub question_text: String,
}

impl From<QuestionOut> for Question {
    fn from(q: QuestionOut) -> Self {
        Question { id: QuestionId(q.id), text: q.question_text }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateProjectOut {
    #[serde(deserialize_with = "opaque_id")]
    pub project_id: String,
    pub current_question: QuestionOut,
    #[serde(default)]
    pub total_questions_so_far: u32,
}

/// Decoded intake result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenedProject {
    pub project_id: ProjectId,
    pub first_question: Question,
    pub total_questions_so_far: u32,
}

impl From<CreateProjectOut> for OpenedProject {
    fn from(o: CreateProjectOut) -> Self {
        OpenedProject {
            project_id: ProjectId(o.project_id),
            first_question: o.current_question.into(),
            total_questions_so_far: o.total_questions_so_far,
        }
    }
}

//
// Submit answer
//

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerIn {
    #[serde(deserialize_with = "opaque_id")]
    pub question_id: String,
    pub answer: String,
}

/// Raw body as it travels. Converted into [`AnswerOutcome`] before anyone
/// looks at it, so the flag/field combination is checked exactly once.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerOut {
    pub all_answered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_question: Option<QuestionOut>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_questions_so_far: Option<u32>,
}

impl AnswerOut {
    pub fn next(question: QuestionOut, total_questions_so_far: u32) -> Self {
        Self { all_answered: false, next_question: Some(question), total_questions_so_far: Some(total_questions_so_far) }
    }

    pub fn complete() -> Self {
        Self { all_answered: true, next_question: None, total_questions_so_far: None }
    }
}

/// Server decision after an answer: keep asking, or stop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnswerOutcome {
    Next { question: Question, total_questions_so_far: u32 },
    Complete,
}

impl TryFrom<AnswerOut> for AnswerOutcome {
    type Error = ClientError;

    fn try_from(raw: AnswerOut) -> Result<Self, Self::Error> {
        match (raw.all_answered, raw.next_question) {
            (true, None) => Ok(AnswerOutcome::Complete),
            (false, Some(q)) => Ok(AnswerOutcome::Next {
                question: q.into(),
                total_questions_so_far: raw.total_questions_so_far.unwrap_or_default(),
            }),
            (true, Some(_)) => Err(ClientError::Malformed(
                "all_answered is true but a next_question was sent".into(),
            )),
            (false, None) => Err(ClientError::Malformed(
                "all_answered is false but no next_question was sent".into(),
            )),
        }
    }
}

//
// Generate tasks
//

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerateTasksIn {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOut {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub estimated_hours: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default = "default_reward", deserialize_with = "credits")]
    pub reward_credits: u32,
}

impl From<TaskOut> for TaskItem {
    fn from(t: TaskOut) -> Self {
        TaskItem {
            id: t.id,
            title: t.title,
            description: t.description,
            difficulty: t.difficulty,
            estimated_hours: t.estimated_hours,
            skills: t.skills,
            reward_credits: t.reward_credits,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateTasksOut {
    pub tasks: Vec<TaskOut>,
}

//
// Errors + health
//

/// Body of a non-2xx response. `error` is optional: the client falls back to
/// a generic message when it is missing.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ErrorOut {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
