use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body, Bytes};
use axum::extract::{ConnectInfo, State};
use axum::http::{header, HeaderMap, Method, Request, Response, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use berlin::reply::{CONTENT_TYPE, INTERNAL_ERROR_BODY};
use berlin::{
    check, reply, unreadable, Engine, ExecutionEnvironment, Logger, Reply, RequestContext,
    RequestInfo,
};
use tokio::net::TcpListener;
use tracing::Span;

use crate::config;

/// Every method and path goes to the turn handler.
pub fn router<E: Engine>(engine: Arc<E>) -> Router {
    Router::new()
        .fallback(turn::<E>)
        .with_state(engine)
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    tracing::info_span!("http-request",
                        status = tracing::field::Empty,
                        method = %request.method(),
                        uri = %request.uri(),
                        version = ?request.version(),)
                })
                .on_response(
                    |response: &Response<Body>, _latency: Duration, span: &Span| {
                        span.record(
                            "status",
                            &tracing::field::display(response.status().as_u16()),
                        );
                    },
                ),
        )
}

fn json(status: StatusCode, body: Vec<u8>) -> axum::response::Response {
    (status, [(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response()
}

fn into_response(reply: Reply) -> axum::response::Response {
    let status =
        StatusCode::from_u16(reply.status.as_u16()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    json(status, reply.body)
}

async fn turn<E: Engine>(
    State(engine): State<Arc<E>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Body,
) -> axum::response::Response {
    let remote_addr = connect_info.map(|ConnectInfo(addr)| addr.to_string());
    let logger = Logger::select(
        ExecutionEnvironment::Standalone,
        Some(RequestContext::default()),
    );
    let uri = uri.to_string();
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    // Refused requests are answered without reading the body, whatever its size.
    let body = if check(method.as_str(), content_type.as_deref()).is_ok() {
        match to_bytes(body, *config::MAX_BODY).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read request body");
                return into_response(unreadable(
                    &logger,
                    RequestInfo {
                        remote_addr: remote_addr.as_deref(),
                        method: method.as_str(),
                        uri: &uri,
                        content_type: content_type.as_deref(),
                        body: &[],
                    },
                    e,
                ));
            }
        }
    } else {
        Bytes::new()
    };

    // Engines are synchronous and may think for a while.
    let result = tokio::task::spawn_blocking(move || {
        reply(
            &*engine,
            &logger,
            RequestInfo {
                remote_addr: remote_addr.as_deref(),
                method: method.as_str(),
                uri: &uri,
                content_type: content_type.as_deref(),
                body: &body,
            },
        )
    })
    .await;

    match result {
        Ok(reply) => into_response(reply),
        Err(e) => {
            tracing::error!(error = %e, "turn task failed");
            json(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY.to_vec())
        }
    }
}

/// Serves turns on an already bound listener until the process exits.
pub async fn serve_listener<E: Engine>(engine: E, listener: TcpListener) -> io::Result<()> {
    let app = router(Arc::new(engine));
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
}

/// Binds `port` on the configured host and serves turns on it. Bind and
/// serve errors are logged and end the call.
pub async fn serve_http<E: Engine>(engine: E, port: &str) {
    let logger = Logger::select(ExecutionEnvironment::Standalone, None);
    logger.log(format_args!("Starting HTTP server on port {}", port));

    let addr = format!("{}:{}", *config::HOST, port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            logger.log(format_args!("HTTP Serving Error: {}", e));
            return;
        }
    };
    if let Err(e) = serve_listener(engine, listener).await {
        logger.log(format_args!("HTTP Serving Error: {}", e));
    }
}

#[cfg(test)]
mod tests {
    use berlin::engine::Echo;
    use tower::ServiceExt;

    use super::*;

    async fn send(request: Request<Body>) -> (StatusCode, Option<String>, Vec<u8>) {
        let response = router(Arc::new(Echo)).oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_owned());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, body.to_vec())
    }

    fn post(content_type: &str, body: &'static [u8]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/any/path")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn json_turn_is_answered() {
        let body = br#"{"action":"move","infos":{},"map":{},"state":{}}"#;
        let (status, content_type, out) = send(post("application/json", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(out, body.to_vec());
    }

    #[tokio::test]
    async fn form_turn_is_answered() {
        let (status, _, out) = send(post(
            "application/x-www-form-urlencoded",
            b"action=foo&infos={}&map={}&state={}",
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            out,
            br#"{"action": "foo", "infos": {}, "map": {}, "state": {}}"#.to_vec()
        );
    }

    #[tokio::test]
    async fn get_is_a_bad_request() {
        let request = Request::builder()
            .method("GET")
            .uri("/")
            .body(Body::empty())
            .unwrap();
        let (status, content_type, out) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(out, br#"{"error": "Invalid request"}"#.to_vec());
    }

    #[tokio::test]
    async fn unsupported_content_type_is_a_bad_request() {
        let (status, _, out) = send(post("text/plain", b"{}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(out, br#"{"error": "Invalid request"}"#.to_vec());
    }

    #[tokio::test]
    async fn oversized_refused_requests_are_bad_requests() {
        let request = Request::builder()
            .method("GET")
            .uri("/")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from(vec![b'x'; 3 * 1024 * 1024]))
            .unwrap();
        let (status, content_type, out) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(out, br#"{"error": "Invalid request"}"#.to_vec());
    }

    #[tokio::test]
    async fn oversized_turns_are_internal_errors() {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(vec![b' '; *config::MAX_BODY + 1]))
            .unwrap();
        let (status, content_type, out) = send(request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(out, br#"{"error": "Internal server error"}"#.to_vec());
    }

    #[tokio::test]
    async fn engine_failure_is_an_internal_error() {
        let (status, content_type, out) = send(post("application/json", b"42")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(out, br#"{"error": "Internal server error"}"#.to_vec());
    }
}
