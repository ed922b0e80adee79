//! Interview state machine: intake, adaptive Q&A, task materialization, reset.
//!
//! Every network-bound step is split in two:
//!   - `begin_*` checks preconditions and hands out a ticket naming the
//!     in-flight request (and carrying its payload),
//!   - `apply_*` commits the result, but only if that ticket is still the
//!     outstanding one.
//!
//! Reset and cancellation retire the outstanding ticket, so a response that
//! arrives afterwards is dropped instead of overwriting fresh state.

use tracing::{debug, info, warn};

use crate::domain::{Answer, ProblemStatement, ProjectId, Question, QuestionId, TaskItem};
use crate::error::{ClientError, Operation};
use crate::protocol::{AnswerOutcome, OpenedProject};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for (or submitting) the problem statement.
    Idle,
    /// A question is current.
    Interviewing,
    /// The server said it has enough context; tasks are being requested.
    Materializing,
    /// Task batch received.
    Presenting,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Stage {
    Idle,
    Interviewing { question: Question },
    Materializing { attempted: bool },
    Presenting,
}

/// What a committed response moved the machine to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// A question is waiting for an answer.
    AwaitingAnswer,
    /// Interview finished; call `begin_generate_tasks` next.
    ReadyToMaterialize,
    /// Tasks are on screen.
    Presenting,
    /// The ticket was retired before its response arrived; nothing changed.
    Stale,
}

#[derive(Debug)]
#[must_use = "a ticket must be applied, or the machine stays busy"]
pub struct CreateTicket {
    id: u64,
    problem: ProblemStatement,
}

impl CreateTicket {
    pub fn problem(&self) -> &ProblemStatement {
        &self.problem
    }
}

#[derive(Debug)]
#[must_use = "a ticket must be applied, or the machine stays busy"]
pub struct AnswerTicket {
    id: u64,
    project_id: ProjectId,
    question: Question,
    answer_text: String,
}

impl AnswerTicket {
    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn question_id(&self) -> &QuestionId {
        &self.question.id
    }

    pub fn answer_text(&self) -> &str {
        &self.answer_text
    }
}

#[derive(Debug)]
#[must_use = "a ticket must be applied, or the machine stays busy"]
pub struct GenerateTicket {
    id: u64,
    project_id: ProjectId,
}

impl GenerateTicket {
    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }
}

/// Everything a front end needs to draw the current screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterviewView {
    pub phase: Phase,
    pub draft: String,
    pub problem: Option<String>,
    pub project_id: Option<ProjectId>,
    pub current_question: Option<Question>,
    pub history: Vec<Answer>,
    pub tasks: Vec<TaskItem>,
    pub total_questions_so_far: u32,
    pub error: Option<String>,
    pub processing: bool,
}

#[derive(Clone, Debug)]
pub struct InterviewState {
    draft: String,
    problem: Option<ProblemStatement>,
    project_id: Option<ProjectId>,
    stage: Stage,
    history: Vec<Answer>,
    tasks: Vec<TaskItem>,
    total_questions_so_far: u32,
    error: Option<String>,
    /// Ticket id of the outstanding request, if any.
    in_flight: Option<u64>,
    /// Monotonic; never reused, so retired tickets can't match again.
    next_ticket: u64,
    max_questions: Option<u32>,
}

impl Default for InterviewState {
    fn default() -> Self {
        Self::new(None)
    }
}

impl InterviewState {
    pub fn new(max_questions: Option<u32>) -> Self {
        Self {
            draft: String::new(),
            problem: None,
            project_id: None,
            stage: Stage::Idle,
            history: Vec::new(),
            tasks: Vec::new(),
            total_questions_so_far: 0,
            error: None,
            in_flight: None,
            next_ticket: 0,
            max_questions,
        }
    }

    // --- Accessors ---

    pub fn phase(&self) -> Phase {
        match self.stage {
            Stage::Idle => Phase::Idle,
            Stage::Interviewing { .. } => Phase::Interviewing,
            Stage::Materializing { .. } => Phase::Materializing,
            Stage::Presenting => Phase::Presenting,
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn project_id(&self) -> Option<&ProjectId> {
        self.project_id.as_ref()
    }

    pub fn current_question(&self) -> Option<&Question> {
        match &self.stage {
            Stage::Interviewing { question } => Some(question),
            _ => None,
        }
    }

    pub fn history(&self) -> &[Answer] {
        &self.history
    }

    pub fn tasks(&self) -> &[TaskItem] {
        &self.tasks
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_processing(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn view(&self) -> InterviewView {
        InterviewView {
            phase: self.phase(),
            draft: self.draft.clone(),
            problem: self.problem.as_ref().map(|p| p.as_str().to_string()),
            project_id: self.project_id.clone(),
            current_question: self.current_question().cloned(),
            history: self.history.clone(),
            tasks: self.tasks.clone(),
            total_questions_so_far: self.total_questions_so_far,
            error: self.error.clone(),
            processing: self.is_processing(),
        }
    }

    // --- Intake ---

    /// Edit the problem text. Ignored once a project is open.
    pub fn set_draft(&mut self, text: &str) {
        if self.stage == Stage::Idle && !self.is_processing() {
            self.draft = text.to_string();
        }
    }

    /// Whether the "submit problem" control should be enabled.
    pub fn can_submit_problem(&self) -> bool {
        self.stage == Stage::Idle && !self.is_processing() && !self.draft.trim().is_empty()
    }

    pub fn begin_create_project(&mut self) -> Result<CreateTicket, ClientError> {
        self.ensure_idle_slot()?;
        if self.stage != Stage::Idle {
            return Err(ClientError::Validation("a project is already open".into()));
        }
        let problem = ProblemStatement::parse(&self.draft)?;
        let id = self.issue();
        debug!(target: "interview", ticket = id, "create_project started");
        Ok(CreateTicket { id, problem })
    }

    pub fn apply_create_project(
        &mut self,
        ticket: CreateTicket,
        result: Result<OpenedProject, ClientError>,
    ) -> Result<Transition, ClientError> {
        if !self.settle(ticket.id, Operation::CreateProject) {
            return Ok(Transition::Stale);
        }
        match result {
            Ok(opened) => {
                info!(target: "interview", project_id = %opened.project_id, "Interview started");
                self.problem = Some(ticket.problem);
                self.project_id = Some(opened.project_id);
                self.total_questions_so_far = opened.total_questions_so_far.max(1);
                self.stage = Stage::Interviewing { question: opened.first_question };
                Ok(Transition::AwaitingAnswer)
            }
            Err(e) => Err(self.fail(Operation::CreateProject, e)),
        }
    }

    // --- Q&A ---

    pub fn begin_submit_answer(
        &mut self,
        question_id: &QuestionId,
        answer_text: &str,
    ) -> Result<AnswerTicket, ClientError> {
        self.ensure_idle_slot()?;
        let (Some(project_id), Stage::Interviewing { question }) = (&self.project_id, &self.stage) else {
            return Err(ClientError::Validation("no question is awaiting an answer".into()));
        };
        if &question.id != question_id {
            return Err(ClientError::Validation(format!(
                "question {question_id} is not the current question"
            )));
        }
        if answer_text.trim().is_empty() {
            return Err(ClientError::Validation("answer is empty".into()));
        }
        let project_id = project_id.clone();
        let question = question.clone();
        let id = self.issue();
        debug!(target: "interview", ticket = id, %question_id, "submit_answer started");
        Ok(AnswerTicket { id, project_id, question, answer_text: answer_text.to_string() })
    }

    pub fn apply_submit_answer(
        &mut self,
        ticket: AnswerTicket,
        result: Result<AnswerOutcome, ClientError>,
    ) -> Result<Transition, ClientError> {
        if !self.settle(ticket.id, Operation::SubmitAnswer) {
            return Ok(Transition::Stale);
        }
        let outcome = match result {
            Ok(o) => o,
            Err(e) => return Err(self.fail(Operation::SubmitAnswer, e)),
        };

        // Acknowledged: the answer is now part of history.
        self.history.push(Answer {
            question_id: ticket.question.id,
            question_text: ticket.question.text,
            answer_text: ticket.answer_text,
        });

        match outcome {
            AnswerOutcome::Complete => {
                info!(target: "interview", answers = self.history.len(), "Server has enough context");
                self.stage = Stage::Materializing { attempted: false };
                Ok(Transition::ReadyToMaterialize)
            }
            AnswerOutcome::Next { question, .. } if self.at_question_cap() => {
                warn!(
                    target: "interview",
                    answers = self.history.len(),
                    dropped_question = %question.id,
                    "Question cap reached; generating tasks with the context gathered so far"
                );
                self.stage = Stage::Materializing { attempted: false };
                Ok(Transition::ReadyToMaterialize)
            }
            AnswerOutcome::Next { question, total_questions_so_far } => {
                self.total_questions_so_far = total_questions_so_far.max(self.history.len() as u32 + 1);
                self.stage = Stage::Interviewing { question };
                Ok(Transition::AwaitingAnswer)
            }
        }
    }

    fn at_question_cap(&self) -> bool {
        self.max_questions.is_some_and(|cap| self.history.len() as u32 >= cap)
    }

    // --- Materialization ---

    /// Allowed once per interview. After a failure the only way on is `reset`.
    pub fn begin_generate_tasks(&mut self) -> Result<GenerateTicket, ClientError> {
        self.ensure_idle_slot()?;
        let (Some(project_id), Stage::Materializing { attempted: false }) = (&self.project_id, &self.stage) else {
            return Err(ClientError::Validation("task generation is not available".into()));
        };
        let project_id = project_id.clone();
        self.stage = Stage::Materializing { attempted: true };
        let id = self.issue();
        debug!(target: "interview", ticket = id, %project_id, "generate_tasks started");
        Ok(GenerateTicket { id, project_id })
    }

    pub fn apply_generate_tasks(
        &mut self,
        ticket: GenerateTicket,
        result: Result<Vec<TaskItem>, ClientError>,
    ) -> Result<Transition, ClientError> {
        if !self.settle(ticket.id, Operation::GenerateTasks) {
            return Ok(Transition::Stale);
        }
        match result {
            Ok(tasks) => {
                info!(target: "interview", project_id = %ticket.project_id, count = tasks.len(), "Tasks ready");
                self.tasks = tasks;
                self.stage = Stage::Presenting;
                Ok(Transition::Presenting)
            }
            Err(e) => Err(self.fail(Operation::GenerateTasks, e)),
        }
    }

    // --- Global transitions ---

    /// Retire the outstanding request, if any. Its response will be ignored.
    pub fn cancel_in_flight(&mut self) -> bool {
        match self.in_flight.take() {
            Some(id) => {
                info!(target: "interview", ticket = id, "Request cancelled");
                self.error = Some(ClientError::Cancelled.user_message(Operation::SubmitAnswer));
                true
            }
            None => false,
        }
    }

    /// Back to the initial state. Any outstanding ticket is retired.
    pub fn reset(&mut self) {
        let next_ticket = self.next_ticket;
        let max_questions = self.max_questions;
        if let Some(id) = self.in_flight {
            debug!(target: "interview", ticket = id, "Reset retired outstanding request");
        }
        *self = Self::new(max_questions);
        self.next_ticket = next_ticket;
        info!(target: "interview", "Interview reset");
    }

    // --- Ticket bookkeeping ---

    fn ensure_idle_slot(&self) -> Result<(), ClientError> {
        if self.is_processing() {
            return Err(ClientError::Busy);
        }
        Ok(())
    }

    fn issue(&mut self) -> u64 {
        self.next_ticket += 1;
        self.in_flight = Some(self.next_ticket);
        self.error = None;
        self.next_ticket
    }

    /// True when `id` is the outstanding ticket; clears it.
    fn settle(&mut self, id: u64, op: Operation) -> bool {
        if self.in_flight == Some(id) {
            self.in_flight = None;
            true
        } else {
            debug!(target: "interview", ticket = id, op = op.as_str(), "Dropping stale response");
            false
        }
    }

    fn fail(&mut self, op: Operation, e: ClientError) -> ClientError {
        warn!(target: "interview", op = op.as_str(), error = %e, "Request failed");
        self.error = Some(e.user_message(op));
        e
    }
}
