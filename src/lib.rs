//! nova-tasks · Task Decomposition Interview
//!
//! - Typed client for the decomposition service (`api`, `protocol`)
//! - Interview state machine with request tickets (`interview`)
//! - Async session driver with deadlines and cancellation (`session`)
//! - Terminal front end (`console`, `render`)
//! - Scripted stub backend for local runs and tests (`stub`)

pub mod api;
pub mod cli;
pub mod config;
pub mod console;
pub mod domain;
pub mod error;
pub mod interview;
pub mod protocol;
pub mod render;
pub mod session;
pub mod stub;
pub mod telemetry;
pub mod util;
