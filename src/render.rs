//! Terminal presentation of an `InterviewView`.
//!
//! Every function returns a `String` so the console can print it and tests can
//! look at it without a terminal.

use colored::Colorize;

use crate::domain::{Answer, Difficulty, TaskItem};
use crate::interview::{InterviewView, Phase};

pub fn title() -> String {
    format!(
        "{}\n{}\n",
        "Task Decomposition Engine".bold(),
        "Transform complex engineering problems into actionable tasks through AI-guided analysis".dimmed()
    )
}

pub fn intake_prompt() -> String {
    format!(
        "{}\n{}\n",
        "Describe your engineering problem:".bold(),
        "e.g. We need a sustainable water purification system for a rural community of 500 people...".dimmed()
    )
}

pub fn processing() -> String {
    format!("{}", "Processing...".yellow())
}

pub fn error_banner(message: &str) -> String {
    format!("{} {}", "error:".red().bold(), message)
}

fn difficulty_badge(d: Difficulty) -> String {
    let label = format!("[{}]", d.label());
    match d {
        Difficulty::Beginner => label.green().to_string(),
        Difficulty::Intermediate => label.yellow().to_string(),
        Difficulty::Advanced => label.red().to_string(),
    }
}

pub fn previous_answers(history: &[Answer]) -> String {
    if history.is_empty() {
        return String::new();
    }
    let mut out = format!("{}\n", "Previous answers:".bold());
    for a in history {
        out.push_str(&format!("  Q: {}\n  A: {}\n", a.question_text, a.answer_text));
    }
    out
}

/// Progress line + the current question, or nothing if none is current.
/// Numbered by the server's running count.
pub fn question(view: &InterviewView) -> String {
    let Some(q) = &view.current_question else {
        return String::new();
    };
    let number = view.total_questions_so_far.max(view.history.len() as u32 + 1);
    format!(
        "{}\n{}\n",
        format!("Question {number}").cyan().bold(),
        q.text
    )
}

pub fn task_card(task: &TaskItem) -> String {
    let mut out = format!("{} {}\n", task.title.bold(), difficulty_badge(task.difficulty));
    out.push_str(&format!("  {}\n", task.description));
    out.push_str(&format!("  Time: {}\n", task.estimated_hours));
    if !task.skills.is_empty() {
        out.push_str(&format!("  Skills: {}\n", task.skills.join(", ")));
    }
    out.push_str(&format!("  Reward: {} credits\n", task.reward_credits));
    out
}

pub fn tasks(view: &InterviewView) -> String {
    let mut out = format!(
        "{}\nBased on your problem and answers, here are the decomposed tasks:\n\n",
        "Generated Tasks".bold()
    );
    for t in &view.tasks {
        out.push_str(&task_card(t));
        out.push('\n');
    }
    out
}

/// Whole screen for the current phase.
pub fn screen(view: &InterviewView) -> String {
    let mut out = String::new();
    match view.phase {
        Phase::Idle => out.push_str(&intake_prompt()),
        Phase::Interviewing => {
            out.push_str(&previous_answers(&view.history));
            out.push_str(&question(view));
        }
        Phase::Materializing => {
            out.push_str(&previous_answers(&view.history));
            if view.error.is_some() {
                out.push_str("Task generation did not finish. Start a new problem to try again.\n");
            }
        }
        Phase::Presenting => {
            out.push_str(&previous_answers(&view.history));
            out.push('\n');
            out.push_str(&tasks(view));
        }
    }
    if let Some(e) = &view.error {
        out.push_str(&error_banner(e));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProjectId, Question, QuestionId};
    use crate::interview::InterviewState;

    fn plain() {
        colored::control::set_override(false);
    }

    fn presenting_view() -> InterviewView {
        InterviewView {
            phase: Phase::Presenting,
            draft: "Design a water filter".into(),
            problem: Some("Design a water filter".into()),
            project_id: Some(ProjectId("p1".into())),
            current_question: None,
            history: vec![Answer {
                question_id: QuestionId("q1".into()),
                question_text: "What is the scale?".into(),
                answer_text: "Community, 500 people".into(),
            }],
            tasks: vec![TaskItem {
                id: "1".into(),
                title: "Research Phase: Design a water filter".into(),
                description: "Conduct research.".into(),
                difficulty: Difficulty::Beginner,
                estimated_hours: "8-12 hours".into(),
                skills: vec!["Research".into(), "Analysis".into()],
                reward_credits: 100,
            }],
            total_questions_so_far: 1,
            error: None,
            processing: false,
        }
    }

    #[test]
    fn presenting_screen_shows_one_pair_and_one_card() {
        plain();
        let s = screen(&presenting_view());
        assert_eq!(s.matches("Q: ").count(), 1);
        assert!(s.contains("A: Community, 500 people"));
        assert!(s.contains("Research Phase: Design a water filter [Beginner]"));
        assert!(s.contains("Skills: Research, Analysis"));
        assert!(s.contains("Reward: 100 credits"));
    }

    #[test]
    fn question_number_comes_from_the_server_count() {
        plain();
        let mut v = presenting_view();
        v.phase = Phase::Interviewing;
        v.tasks.clear();
        v.current_question = Some(Question { id: QuestionId("q5".into()), text: "Budget?".into() });
        v.total_questions_so_far = 5;
        assert!(screen(&v).contains("Question 5\nBudget?"));

        // A count that lags the local history never numbers backwards.
        v.total_questions_so_far = 0;
        assert!(screen(&v).contains("Question 2\nBudget?"));
    }

    #[test]
    fn idle_screen_carries_error_banner() {
        plain();
        let mut v = InterviewState::default().view();
        v.error = Some("Failed to start the analysis. Please try again.".into());
        let s = screen(&v);
        assert!(s.contains("Describe your engineering problem:"));
        assert!(s.contains("error: Failed to start the analysis. Please try again."));
    }
}
