//! Canned content for the stub backend: the question bank and the fallback
//! task batch. Deterministic so tests and demos see the same interview.

use uuid::Uuid;

use crate::domain::Difficulty;
use crate::protocol::TaskOut;
use crate::util::first_words;

pub const OPENING_QUESTION: &str =
  "What is the primary goal you're trying to achieve with this engineering solution?";

/// Follow-ups, indexed by how many answers are already in. Past the end the
/// last entry repeats.
pub const FOLLOW_UP_QUESTIONS: [&str; 5] = [
  "What specific constraints or limitations do you need to work within?",
  "Who are the end users of this solution and what are their needs?",
  "What resources (budget, time, materials, skills) are available?",
  "What would success look like for this project?",
  "Are there existing solutions that don't meet your needs? Why not?",
];

pub fn follow_up_question(answered: usize) -> &'static str {
  let last = FOLLOW_UP_QUESTIONS.len() - 1;
  FOLLOW_UP_QUESTIONS[answered.saturating_sub(1).min(last)]
}

/// The fallback batch, titled after the first three words of the problem.
pub fn fallback_tasks(description: &str) -> Vec<TaskOut> {
  vec![
    task(
      format!("Research Phase: {}", first_words(description, 3)),
      "Conduct comprehensive research on existing solutions, technologies, and methodologies.",
      Difficulty::Beginner,
      "8-12 hours",
      &["Research", "Analysis", "Documentation"],
      150,
    ),
    task(
      "Design & Planning: System Architecture".into(),
      "Create detailed system design, specifications, and implementation roadmap.",
      Difficulty::Intermediate,
      "15-20 hours",
      &["System Design", "Planning", "Technical Writing"],
      250,
    ),
    task(
      "Prototype Development".into(),
      "Build initial prototype or proof-of-concept based on research and design.",
      Difficulty::Advanced,
      "20-30 hours",
      &["Programming", "Engineering", "Problem Solving"],
      400,
    ),
  ]
}

fn task(
  title: String,
  description: &str,
  difficulty: Difficulty,
  estimated_hours: &str,
  skills: &[&str],
  reward_credits: u32,
) -> TaskOut {
  TaskOut {
    id: Uuid::new_v4().to_string(),
    title,
    description: description.into(),
    difficulty,
    estimated_hours: estimated_hours.into(),
    skills: skills.iter().map(|s| s.to_string()).collect(),
    reward_credits,
  }
}
