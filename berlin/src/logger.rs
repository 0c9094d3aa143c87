//! Per-request log sink.
//!
//! A [`Logger`] is picked once per request (or once per CLI invocation) and
//! handed down explicitly to everything that logs, the engine included.

use std::fmt;
use std::io::{self, Write};

/// Where the shell is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionEnvironment {
    /// Our own listener or a one-shot file run.
    Standalone,
    /// Behind a hosting platform that collects logs per request.
    Hosted,
}

/// The request being served, as far as logging cares.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestContext<'a> {
    pub request_id: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Logger {
    /// Lines go straight to the process's standard output.
    Stdout,
    /// Every write becomes one info event on the platform's log stream.
    Hosted { request_id: Option<String> },
}

impl Logger {
    /// Picks the sink for one request.
    ///
    /// The hosted sink is only reachable while serving a request on the
    /// hosting platform; startup and CLI runs always log to stdout.
    pub fn select(env: ExecutionEnvironment, request: Option<RequestContext<'_>>) -> Self {
        match (env, request) {
            (ExecutionEnvironment::Hosted, Some(request)) => Logger::Hosted {
                request_id: request.request_id.map(str::to_owned),
            },
            _ => Logger::Stdout,
        }
    }

    /// Writes one line. Failures of the sink are ignored.
    pub fn log(&self, message: impl fmt::Display) {
        let line = format!("{}\n", message);
        let _ = self.clone().write_all(line.as_bytes());
    }
}

impl Write for Logger {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Logger::Stdout => io::stdout().lock().write(buf),
            Logger::Hosted { request_id } => {
                let line = String::from_utf8_lossy(buf);
                let line = line.trim_end_matches('\n');
                match request_id {
                    Some(id) => tracing::info!(target: "berlin::hosted", request_id = %id, "{}", line),
                    None => tracing::info!(target: "berlin::hosted", "{}", line),
                }
                Ok(buf.len())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Logger::Stdout => io::stdout().flush(),
            Logger::Hosted { .. } => Ok(()),
        }
    }
}
