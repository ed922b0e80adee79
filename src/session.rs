//! Async driver that couples the interview state machine to a
//! `DecompositionApi`. Each call runs under a deadline and can be aborted
//! from another task through a [`CancelHandle`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tracing::{info, instrument, warn};

use crate::api::DecompositionApi;
use crate::domain::QuestionId;
use crate::error::ClientError;
use crate::interview::{InterviewState, InterviewView, Transition};

/// Aborts whatever request the owning session has in flight.
#[derive(Clone, Default)]
pub struct CancelHandle {
    notify: Arc<Notify>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.notify.notify_waiters();
    }

    async fn cancelled(&self) {
        self.notify.notified().await
    }
}

/// Run `fut` until it finishes, the deadline passes, or the handle fires.
async fn guarded<T, F>(deadline: Duration, cancel: &CancelHandle, fut: F) -> Result<T, ClientError>
where
    F: Future<Output = Result<T, ClientError>>,
{
    tokio::select! {
        r = tokio::time::timeout(deadline, fut) => r.unwrap_or(Err(ClientError::Timeout(deadline))),
        _ = cancel.cancelled() => Err(ClientError::Cancelled),
    }
}

pub struct Session<A> {
    api: A,
    state: InterviewState,
    deadline: Duration,
    cancel: CancelHandle,
}

impl<A: DecompositionApi> Session<A> {
    pub fn new(api: A, deadline: Duration, max_questions: Option<u32>) -> Self {
        Self {
            api,
            state: InterviewState::new(max_questions),
            deadline,
            cancel: CancelHandle::default(),
        }
    }

    pub fn state(&self) -> &InterviewState {
        &self.state
    }

    pub fn view(&self) -> InterviewView {
        self.state.view()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn set_draft(&mut self, text: &str) {
        self.state.set_draft(text);
    }

    /// Open a project for `text`. Blank text is refused before any request.
    #[instrument(level = "info", skip(self, text), fields(text_len = text.len()))]
    pub async fn submit_problem(&mut self, text: &str) -> Result<Transition, ClientError> {
        self.state.set_draft(text);
        let ticket = self.state.begin_create_project()?;
        let result = guarded(self.deadline, &self.cancel, self.api.create_project(ticket.problem())).await;
        self.state.apply_create_project(ticket, result)
    }

    /// Answer the current question. When the server reports it has enough
    /// context, tasks are requested right away (once).
    #[instrument(level = "info", skip(self, answer), fields(%question_id, answer_len = answer.len()))]
    pub async fn submit_answer(&mut self, question_id: &QuestionId, answer: &str) -> Result<Transition, ClientError> {
        let ticket = self.state.begin_submit_answer(question_id, answer)?;
        let result = guarded(
            self.deadline,
            &self.cancel,
            self.api.submit_answer(ticket.project_id(), ticket.question_id(), ticket.answer_text()),
        )
        .await;
        match self.state.apply_submit_answer(ticket, result)? {
            Transition::ReadyToMaterialize => self.generate_tasks().await,
            other => Ok(other),
        }
    }

    async fn generate_tasks(&mut self) -> Result<Transition, ClientError> {
        let ticket = self.state.begin_generate_tasks()?;
        info!(target: "interview", project_id = %ticket.project_id(), "Requesting task batch");
        let result = guarded(self.deadline, &self.cancel, self.api.generate_tasks(ticket.project_id())).await;
        if let Err(e) = &result {
            warn!(target: "interview", error = %e, "Task generation failed; only a reset can recover");
        }
        self.state.apply_generate_tasks(ticket, result)
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::domain::{Difficulty, ProblemStatement, ProjectId, Question, TaskItem};
    use crate::interview::Phase;
    use crate::protocol::{AnswerOutcome, OpenedProject};

    /// Scripted backend: pops one canned reply per call and records calls.
    #[derive(Default)]
    struct Scripted {
        create: Mutex<VecDeque<Result<OpenedProject, ClientError>>>,
        answers: Mutex<VecDeque<Result<AnswerOutcome, ClientError>>>,
        tasks: Mutex<VecDeque<Result<Vec<TaskItem>, ClientError>>>,
        calls: Mutex<Vec<String>>,
        delay: Option<Duration>,
    }

    impl Scripted {
        fn log(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        async fn pause(&self) {
            if let Some(d) = self.delay {
                tokio::time::sleep(d).await;
            }
        }
    }

    #[async_trait]
    impl DecompositionApi for Scripted {
        async fn create_project(&self, problem: &ProblemStatement) -> Result<OpenedProject, ClientError> {
            self.log(format!("create:{}", problem.as_str()));
            self.pause().await;
            self.create.lock().unwrap().pop_front().expect("unexpected create_project")
        }

        async fn submit_answer(
            &self,
            project_id: &ProjectId,
            question_id: &QuestionId,
            answer: &str,
        ) -> Result<AnswerOutcome, ClientError> {
            self.log(format!("answer:{project_id}:{question_id}:{answer}"));
            self.pause().await;
            self.answers.lock().unwrap().pop_front().expect("unexpected submit_answer")
        }

        async fn generate_tasks(&self, project_id: &ProjectId) -> Result<Vec<TaskItem>, ClientError> {
            self.log(format!("generate:{project_id}"));
            self.pause().await;
            self.tasks.lock().unwrap().pop_front().expect("unexpected generate_tasks")
        }
    }

    fn water_filter_task() -> TaskItem {
        TaskItem {
            id: "1".into(),
            title: "Research Phase: Design a water filter".into(),
            description: "Conduct comprehensive research on existing solutions.".into(),
            difficulty: Difficulty::Beginner,
            estimated_hours: "8-12 hours".into(),
            skills: vec!["Research".into(), "Analysis".into()],
            reward_credits: 100,
        }
    }

    fn opened_p1() -> OpenedProject {
        OpenedProject {
            project_id: ProjectId("p1".into()),
            first_question: Question { id: QuestionId("q1".into()), text: "What is the scale?".into() },
            total_questions_so_far: 1,
        }
    }

    fn session(api: Scripted) -> Session<Scripted> {
        Session::new(api, Duration::from_secs(5), None)
    }

    #[tokio::test]
    async fn water_filter_happy_path() {
        let api = Scripted::default();
        api.create.lock().unwrap().push_back(Ok(opened_p1()));
        api.answers.lock().unwrap().push_back(Ok(AnswerOutcome::Complete));
        api.tasks.lock().unwrap().push_back(Ok(vec![water_filter_task()]));
        let mut s = session(api);

        assert_eq!(s.submit_problem("Design a water filter").await.unwrap(), Transition::AwaitingAnswer);
        let q = s.view().current_question.unwrap();
        assert_eq!(q.text, "What is the scale?");

        let t = s.submit_answer(&q.id, "Community, 500 people").await.unwrap();
        assert_eq!(t, Transition::Presenting);

        let v = s.view();
        assert_eq!(v.phase, Phase::Presenting);
        assert_eq!(v.tasks, vec![water_filter_task()]);
        assert_eq!(v.history.len(), 1);
        assert_eq!(v.history[0].question_text, "What is the scale?");
        assert_eq!(v.history[0].answer_text, "Community, 500 people");
        assert_eq!(
            *s.api.calls.lock().unwrap(),
            vec![
                "create:Design a water filter".to_string(),
                "answer:p1:q1:Community, 500 people".to_string(),
                "generate:p1".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn http_500_on_intake_keeps_text_and_shows_generic_message() {
        let api = Scripted::default();
        api.create.lock().unwrap().push_back(Err(ClientError::Http { status: 500, message: None }));
        let mut s = session(api);

        let err = s.submit_problem("Design a water filter").await.unwrap_err();
        assert!(matches!(err, ClientError::Http { status: 500, .. }));
        let v = s.view();
        assert_eq!(v.project_id, None);
        assert_eq!(v.draft, "Design a water filter");
        assert_eq!(v.error.as_deref(), Some("Failed to start the analysis. Please try again."));
        assert!(!v.processing);
    }

    #[tokio::test]
    async fn blank_problem_never_reaches_the_api() {
        let mut s = session(Scripted::default());
        for blank in ["", "   "] {
            assert!(matches!(s.submit_problem(blank).await, Err(ClientError::Validation(_))));
        }
        assert!(s.api.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn generation_is_requested_exactly_once() {
        let api = Scripted::default();
        api.create.lock().unwrap().push_back(Ok(opened_p1()));
        api.answers.lock().unwrap().push_back(Ok(AnswerOutcome::Complete));
        api.tasks.lock().unwrap().push_back(Err(ClientError::Network("connection reset".into())));
        let mut s = session(api);

        s.submit_problem("Design a water filter").await.unwrap();
        let err = s.submit_answer(&QuestionId("q1".into()), "Community").await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
        assert_eq!(s.view().phase, Phase::Materializing);
        assert!(s.view().tasks.is_empty());

        // No forward path: answering again is refused locally.
        assert!(s.submit_answer(&QuestionId("q1".into()), "again").await.is_err());
        let generates = s.api.calls.lock().unwrap().iter().filter(|c| c.starts_with("generate")).count();
        assert_eq!(generates, 1);

        s.reset();
        assert_eq!(s.view(), InterviewState::default().view());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_backend_times_out_and_restores_state() {
        let api = Scripted { delay: Some(Duration::from_secs(60)), ..Scripted::default() };
        api.create.lock().unwrap().push_back(Ok(opened_p1()));
        let mut s = Session::new(api, Duration::from_secs(2), None);

        let err = s.submit_problem("Design a water filter").await.unwrap_err();
        assert_eq!(err, ClientError::Timeout(Duration::from_secs(2)));
        let v = s.view();
        assert_eq!(v.phase, Phase::Idle);
        assert!(!v.processing);
        assert_eq!(v.draft, "Design a water filter");
        assert!(v.error.unwrap().contains("too long"));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_handle_aborts_in_flight_request() {
        let api = Scripted { delay: Some(Duration::from_secs(60)), ..Scripted::default() };
        api.create.lock().unwrap().push_back(Ok(opened_p1()));
        let mut s = Session::new(api, Duration::from_secs(120), None);
        let cancel = s.cancel_handle();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            cancel.cancel();
        });

        let err = s.submit_problem("Design a water filter").await.unwrap_err();
        assert_eq!(err, ClientError::Cancelled);
        assert_eq!(s.view().project_id, None);
        assert!(!s.view().processing);
        assert_eq!(s.view().error.as_deref(), Some("Request cancelled."));
    }
}
