//! Stub backend state: in-memory project store and the interview script.
//!
//! Each project owns its issued questions, the answers received, and (once
//! generated) its task batch. All access goes through the methods here so the
//! HTTP handlers stay thin.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::StubConfig;
use crate::protocol::{AnswerOut, CreateProjectOut, QuestionOut, TaskOut};
use crate::stub::script::{fallback_tasks, follow_up_question, OPENING_QUESTION};

#[derive(Clone, Debug)]
pub struct StubProject {
    pub description: String,
    pub questions: Vec<QuestionOut>,
    pub answers: Vec<(String, String)>,
    pub tasks: Option<Vec<TaskOut>>,
}

impl StubProject {
    fn current_question(&self) -> Option<&QuestionOut> {
        (self.answers.len() < self.questions.len()).then(|| &self.questions[self.answers.len()])
    }
}

/// Why a stub call was refused. Mapped to a status code by the HTTP layer.
#[derive(Debug, PartialEq, Eq)]
pub enum StubError {
    BadRequest(&'static str),
    NotFound,
    Conflict(&'static str),
}

#[derive(Clone)]
pub struct StubState {
    pub projects: Arc<RwLock<HashMap<String, StubProject>>>,
    pub questions_per_interview: usize,
}

impl StubState {
    #[instrument(level = "info", skip_all)]
    pub fn new(cfg: &StubConfig) -> Self {
        let questions_per_interview = cfg.questions_per_interview.max(1) as usize;
        info!(target: "stub", questions_per_interview, "Stub backend state ready");
        Self {
            projects: Arc::new(RwLock::new(HashMap::new())),
            questions_per_interview,
        }
    }

    /// Open a project and issue the opening question.
    #[instrument(level = "info", skip(self, description), fields(description_len = description.len()))]
    pub async fn create_project(&self, description: &str) -> Result<CreateProjectOut, StubError> {
        if description.trim().is_empty() {
            return Err(StubError::BadRequest("Description is required"));
        }
        let project_id = Uuid::new_v4().to_string();
        let first = QuestionOut { id: Uuid::new_v4().to_string(), question_text: OPENING_QUESTION.into() };
        let project = StubProject {
            description: description.to_string(),
            questions: vec![first.clone()],
            answers: Vec::new(),
            tasks: None,
        };
        self.projects.write().await.insert(project_id.clone(), project);
        info!(target: "stub", %project_id, "Project created");
        Ok(CreateProjectOut { project_id, current_question: first, total_questions_so_far: 1 })
    }

    /// Record an answer to the current question and decide what comes next.
    #[instrument(level = "info", skip(self, answer), fields(%project_id, %question_id, answer_len = answer.len()))]
    pub async fn answer(&self, project_id: &str, question_id: &str, answer: &str) -> Result<AnswerOut, StubError> {
        if answer.trim().is_empty() {
            return Err(StubError::BadRequest("Answer is required"));
        }
        let mut projects = self.projects.write().await;
        let project = projects.get_mut(project_id).ok_or(StubError::NotFound)?;

        match project.current_question() {
            Some(q) if q.id == question_id => {}
            Some(_) => return Err(StubError::Conflict("Question is not the current question")),
            None => return Err(StubError::Conflict("Interview is already complete")),
        }
        project.answers.push((question_id.to_string(), answer.to_string()));

        let answered = project.answers.len();
        if answered >= self.questions_per_interview {
            info!(target: "stub", %project_id, answered, "Interview complete");
            return Ok(AnswerOut::complete());
        }
        let next = QuestionOut { id: Uuid::new_v4().to_string(), question_text: follow_up_question(answered).into() };
        project.questions.push(next.clone());
        Ok(AnswerOut::next(next, project.questions.len() as u32))
    }

    /// Produce (or replay) the project's task batch.
    #[instrument(level = "info", skip(self), fields(%project_id))]
    pub async fn generate_tasks(&self, project_id: &str) -> Result<Vec<TaskOut>, StubError> {
        let mut projects = self.projects.write().await;
        let project = projects.get_mut(project_id).ok_or(StubError::NotFound)?;
        if project.answers.len() < self.questions_per_interview {
            warn!(target: "stub", %project_id, answered = project.answers.len(), "Tasks requested before interview completed");
            return Err(StubError::Conflict("Interview is not complete"));
        }
        let description = project.description.clone();
        let tasks = project.tasks.get_or_insert_with(|| fallback_tasks(&description));
        info!(target: "stub", %project_id, count = tasks.len(), "Tasks served");
        Ok(tasks.clone())
    }
}
