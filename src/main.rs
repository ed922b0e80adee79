//! nova-tasks · Task Decomposition Interview
//!
//! - `interview`: walk through the guided interview against a decomposition service
//! - `stub-server`: serve a scripted stand-in for that service
//!
//! Important env variables:
//!   NOVA_CONFIG_PATH   : path to TOML config ([api] + [stub] sections)
//!   NOVA_API_URL       : service base URL (default "http://127.0.0.1:5000")
//!   NOVA_TIMEOUT_SECS  : per-request deadline (default 30)
//!   NOVA_MAX_QUESTIONS : client-side interview cap (default 12, 0 = none)
//!   PORT               : stub-server port (default 5000)
//!   LOG_LEVEL          : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT         : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};

use clap::Parser;
use tokio::io::BufReader;
use tokio::net::TcpListener;
use tracing::info;

use nova_tasks::api::ApiClient;
use nova_tasks::cli::{Cli, Command};
use nova_tasks::config::load_config_from_env;
use nova_tasks::session::Session;
use nova_tasks::stub::{build_router, StubState};
use nova_tasks::{console, telemetry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  let cli = Cli::parse();
  telemetry::init_tracing(matches!(cli.command, Command::StubServer(_)));

  let mut cfg = load_config_from_env();

  match cli.command {
    Command::Interview(args) => {
      args.apply(&mut cfg);
      info!(target: "nova_tasks", base_url = %cfg.api.base_url, timeout_secs = cfg.api.timeout_secs, max_questions = cfg.api.max_questions, "Starting interview");

      let api = ApiClient::new(&cfg.api)?;
      let mut session = Session::new(api, cfg.api.request_timeout(), cfg.api.question_cap());
      let stdin = BufReader::new(tokio::io::stdin());
      let mut stdout = std::io::stdout();
      console::run(&mut session, stdin, &mut stdout, args.problem).await?;
    }
    Command::StubServer(args) => {
      args.apply(&mut cfg);
      let state = Arc::new(StubState::new(&cfg.stub));
      let app = build_router(state);

      let addr = SocketAddr::from(([0, 0, 0, 0], cfg.stub.port));
      let listener = TcpListener::bind(addr).await?;
      info!(target: "stub", %addr, "Stub backend listening");
      axum::serve(listener, app).await?;
    }
  }
  Ok(())
}
