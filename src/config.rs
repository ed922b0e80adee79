//! Loading client + stub configuration from TOML.
//!
//! See `NovaConfig` for the expected schema. Command-line flags (and their env
//! bindings) are applied on top in `main`.

use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_QUESTIONS: u32 = 12;

#[derive(Clone, Debug, Deserialize, Default, PartialEq)]
pub struct NovaConfig {
  #[serde(default)]
  pub api: ApiConfig,
  #[serde(default)]
  pub stub: StubConfig,
}

/// Where the decomposition service lives and how patient we are with it.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
  pub base_url: String,
  pub timeout_secs: u64,
  /// Client-side safety cap on interview length. `0` disables the cap.
  pub max_questions: u32,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.into(),
      timeout_secs: DEFAULT_TIMEOUT_SECS,
      max_questions: DEFAULT_MAX_QUESTIONS,
    }
  }
}

impl ApiConfig {
  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs.max(1))
  }

  pub fn question_cap(&self) -> Option<u32> {
    (self.max_questions > 0).then_some(self.max_questions)
  }
}

/// Scripted stub backend settings.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct StubConfig {
  pub port: u16,
  /// Answers collected before the stub reports `all_answered`.
  pub questions_per_interview: u32,
}

impl Default for StubConfig {
  fn default() -> Self {
    Self { port: 5000, questions_per_interview: 3 }
  }
}

/// Parse a config document. Missing sections and keys take their defaults.
pub fn parse_config(s: &str) -> Result<NovaConfig, toml::de::Error> {
  toml::from_str::<NovaConfig>(s)
}

/// Load from `path`. On any IO/parse error, logs and returns None.
pub fn load_config(path: &str) -> Option<NovaConfig> {
  match std::fs::read_to_string(path) {
    Ok(s) => match parse_config(&s) {
      Ok(cfg) => {
        info!(target: "nova_tasks", %path, "Loaded config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "nova_tasks", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "nova_tasks", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

/// Attempt to load `NovaConfig` from NOVA_CONFIG_PATH; defaults otherwise.
pub fn load_config_from_env() -> NovaConfig {
  std::env::var("NOVA_CONFIG_PATH")
    .ok()
    .and_then(|p| load_config(&p))
    .unwrap_or_default()
}
