//! Interactive terminal front end for the interview.
//!
//! Reads one line per step from `input`, renders screens to `out`. Ctrl-C
//! while a request is in flight cancels that request; Ctrl-C or end of input
//! while waiting for the user ends the session.

use std::future::Future;
use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::{debug, instrument};

use crate::api::DecompositionApi;
use crate::interview::Phase;
use crate::render;
use crate::session::{CancelHandle, Session};

/// Await `fut`; a Ctrl-C in the meantime fires `cancel` and keeps waiting for
/// the (now cancelled) request to settle.
async fn with_interrupt<T>(cancel: &CancelHandle, fut: impl Future<Output = T>) -> T {
    tokio::pin!(fut);
    loop {
        tokio::select! {
            r = &mut fut => return r,
            Ok(()) = tokio::signal::ctrl_c() => {
                debug!(target: "interview", "Interrupt received; cancelling request");
                cancel.cancel();
            }
        }
    }
}

/// Next input line, or None on end of input / Ctrl-C.
async fn read_line<R: AsyncBufRead + Unpin>(lines: &mut Lines<R>) -> std::io::Result<Option<String>> {
    tokio::select! {
        line = lines.next_line() => line,
        Ok(()) = tokio::signal::ctrl_c() => Ok(None),
    }
}

#[instrument(level = "debug", skip_all)]
pub async fn run<A, R, W>(
    session: &mut Session<A>,
    input: R,
    out: &mut W,
    mut problem: Option<String>,
) -> std::io::Result<()>
where
    A: DecompositionApi,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let cancel = session.cancel_handle();
    writeln!(out, "{}", render::title())?;

    loop {
        // Intake: repeat until a project is open.
        while session.view().phase == Phase::Idle {
            let text = match problem.take() {
                Some(p) => p,
                None => {
                    write!(out, "{}", render::screen(&session.view()))?;
                    if session.view().error.is_some() {
                        writeln!(out, "(press Enter to retry with the same description)")?;
                    }
                    write!(out, "> ")?;
                    out.flush()?;
                    let Some(line) = read_line(&mut lines).await? else {
                        return Ok(());
                    };
                    if line.trim().is_empty() && session.view().error.is_some() {
                        session.view().draft
                    } else {
                        line
                    }
                }
            };
            session.set_draft(&text);
            if !session.state().can_submit_problem() {
                writeln!(out, "Please describe the problem first.")?;
                continue;
            }
            writeln!(out, "{}", render::processing())?;
            // Failures are already on the view as a banner.
            let _ = with_interrupt(&cancel, session.submit_problem(&text)).await;
        }

        // Q&A loop.
        while let Some(question) = session.view().current_question {
            write!(out, "\n{}", render::screen(&session.view()))?;
            write!(out, "> ")?;
            out.flush()?;
            let Some(answer) = read_line(&mut lines).await? else {
                return Ok(());
            };
            if answer.trim().is_empty() {
                writeln!(out, "An answer is required.")?;
                continue;
            }
            writeln!(out, "{}", render::processing())?;
            let _ = with_interrupt(&cancel, session.submit_answer(&question.id, &answer)).await;
        }

        // Presenting, or a failed materialization.
        write!(out, "\n{}", render::screen(&session.view()))?;
        write!(out, "Start a new problem? [y/N] ")?;
        out.flush()?;
        match read_line(&mut lines).await? {
            Some(l) if l.trim().eq_ignore_ascii_case("y") => {
                session.reset();
                writeln!(out)?;
            }
            _ => return Ok(()),
        }
    }
}
