//! Telemetry initialization (tracing/tracing-subscriber).
//!
//! Behavior:
//! - LOG_LEVEL controls the filter (e.g. "debug" or detailed directives like
//!   "warn,interview=debug,nova_tasks=info").
//! - LOG_FORMAT selects "pretty" (default) or "json" structured logs.
//!
//! Notes:
//! - Output goes to stderr; the interview owns stdout.
//! - The stub's TraceLayer adds per-request spans on top of this.

use tracing_subscriber::EnvFilter;

/// Default directives. The interactive client shares the terminal with its
/// screens, so only warnings show unless LOG_LEVEL asks for more; the stub
/// server logs requests.
pub fn default_filter(serving: bool) -> &'static str {
    if serving {
        "info,stub=debug,nova_tasks=debug,tower_http=info,axum=info"
    } else {
        "warn"
    }
}

pub fn init_tracing(serving: bool) {
    let filter = EnvFilter::try_from_env("LOG_LEVEL")
        .unwrap_or_else(|_| EnvFilter::new(default_filter(serving)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    // Choose JSON vs pretty; don't try to store different layer types.
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => {
            builder.json().init();
        }
        _ => {
            builder.init();
        }
    }
}
