//! Turn handler for the hosting platform. Each invocation is one request and
//! logs through the platform's log stream.

use berlin::{reply, Engine, ExecutionEnvironment, Logger, Reply, RequestContext, RequestInfo};
use vercel_runtime::{Body, Error, Request, Response, StatusCode};

const REQUEST_ID_HEADER: &str = "x-vercel-id";
const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

fn header<'a>(req: &'a Request, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|value| value.to_str().ok())
}

/// The client is the first hop the platform's proxy saw.
fn client_addr(forwarded_for: Option<&str>) -> Option<&str> {
    forwarded_for
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|addr| !addr.is_empty())
}

pub fn into_response(reply: Reply) -> Result<Response<Body>, Error> {
    let status = StatusCode::from_u16(reply.status.as_u16())?;
    Ok(Response::builder()
        .header("Content-Type", berlin::reply::CONTENT_TYPE)
        .status(status)
        .body(reply.body.into())?)
}

pub async fn handle<E: Engine>(engine: &E, req: Request) -> Result<Response<Body>, Error> {
    let logger = Logger::select(
        ExecutionEnvironment::Hosted,
        Some(RequestContext {
            request_id: header(&req, REQUEST_ID_HEADER),
        }),
    );
    let uri = req.uri().to_string();
    let body: &[u8] = req.body();

    let reply = reply(
        engine,
        &logger,
        RequestInfo {
            remote_addr: client_addr(header(&req, FORWARDED_FOR_HEADER)),
            method: req.method().as_str(),
            uri: &uri,
            content_type: header(&req, "content-type"),
            body,
        },
    );
    into_response(reply)
}
