//! One request in, one reply out, independent of the transport.

use std::fmt;

use crate::engine::Engine;
use crate::logger::Logger;
use crate::request::{adapt, CONTENT_TYPE_JSON};
use crate::turn::run_turn;

pub const CONTENT_TYPE: &str = CONTENT_TYPE_JSON;
pub const INVALID_REQUEST_BODY: &[u8] = br#"{"error": "Invalid request"}"#;
pub const INTERNAL_ERROR_BODY: &[u8] = br#"{"error": "Internal server error"}"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    BadRequest,
    InternalServerError,
}

impl Status {
    pub fn as_u16(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::InternalServerError => 500,
        }
    }
}

/// What the transport saw of the incoming request.
#[derive(Debug, Clone, Copy)]
pub struct RequestInfo<'a> {
    pub remote_addr: Option<&'a str>,
    pub method: &'a str,
    pub uri: &'a str,
    pub content_type: Option<&'a str>,
    pub body: &'a [u8],
}

impl RequestInfo<'_> {
    fn query(&self) -> Option<&str> {
        self.uri.split_once('?').map(|(_, query)| query)
    }
}

/// Always served as [`CONTENT_TYPE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: Status,
    pub body: Vec<u8>,
}

impl Reply {
    fn invalid_request() -> Self {
        Self {
            status: Status::BadRequest,
            body: INVALID_REQUEST_BODY.to_vec(),
        }
    }

    fn internal_error() -> Self {
        Self {
            status: Status::InternalServerError,
            body: INTERNAL_ERROR_BODY.to_vec(),
        }
    }
}

struct RemoteAddr<'a>(Option<&'a str>);

impl fmt::Display for RemoteAddr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.unwrap_or("unknown"))
    }
}

fn log_processing(logger: &Logger, request: &RequestInfo<'_>) {
    logger.log(format_args!(
        "HTTP: [{}] Processing {} {}",
        RemoteAddr(request.remote_addr),
        request.method,
        request.uri
    ));
}

/// For a request that passed [`check`](crate::request::check) but whose
/// body could not be read. `request.body` is ignored.
pub fn unreadable(logger: &Logger, request: RequestInfo<'_>, error: impl fmt::Display) -> Reply {
    log_processing(logger, &request);
    logger.log(format_args!("HTTP: Responding with error: {}", error));
    Reply::internal_error()
}

/// Handles one turn request end to end. Engine and serialization errors are
/// logged here and never reach the client.
pub fn reply<E: Engine>(engine: &E, logger: &Logger, request: RequestInfo<'_>) -> Reply {
    log_processing(logger, &request);

    let input = match adapt(
        request.method,
        request.content_type,
        request.query(),
        request.body,
    ) {
        Ok(input) => input,
        Err(e) => {
            tracing::debug!(error = %e, "rejecting request");
            logger.log("HTTP: Replying with error: Invalid request");
            return Reply::invalid_request();
        }
    };

    match run_turn(engine, &mut &*input, logger.clone()) {
        Ok(body) => {
            logger.log("HTTP: Responding with moves");
            Reply {
                status: Status::Ok,
                body,
            }
        }
        Err(e) => {
            logger.log(format_args!("HTTP: Responding with error: {}", e));
            Reply::internal_error()
        }
    }
}
