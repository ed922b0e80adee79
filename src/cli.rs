use clap::{Args, Parser, Subcommand};

use crate::config::NovaConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "nova-tasks", version, about = "Turn an engineering problem into marketplace tasks through a guided interview")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the decomposition interview in this terminal
    Interview(InterviewArgs),
    /// Serve the scripted stub backend
    StubServer(StubArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct InterviewArgs {
    /// Base URL of the decomposition service
    #[arg(long, env = "NOVA_API_URL")]
    pub api_url: Option<String>,

    /// Per-request deadline in seconds
    #[arg(long, env = "NOVA_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Stop the interview after this many answers (0 = let the server decide)
    #[arg(long, env = "NOVA_MAX_QUESTIONS")]
    pub max_questions: Option<u32>,

    /// Problem statement; prompted for when omitted
    #[arg(long)]
    pub problem: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct StubArgs {
    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Answers to collect before reporting the interview complete
    #[arg(long)]
    pub questions: Option<u32>,
}

impl InterviewArgs {
    /// Flags (and their env bindings) win over the file.
    pub fn apply(&self, cfg: &mut NovaConfig) {
        if let Some(url) = &self.api_url {
            cfg.api.base_url = url.clone();
        }
        if let Some(t) = self.timeout_secs {
            cfg.api.timeout_secs = t;
        }
        if let Some(m) = self.max_questions {
            cfg.api.max_questions = m;
        }
    }
}

impl StubArgs {
    pub fn apply(&self, cfg: &mut NovaConfig) {
        if let Some(p) = self.port {
            cfg.stub.port = p;
        }
        if let Some(q) = self.questions {
            cfg.stub.questions_per_interview = q;
        }
    }
}
