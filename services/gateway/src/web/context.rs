//! services/gateway/src/web/context.rs
//!
//! Request context middleware. Runs first on every request.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use gateway_core::RequestContext;
use tracing::Instrument;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Attaches a fresh `RequestContext` to the request, runs the rest of the stack
/// inside its span, and echoes the request id in the `X-Request-Id` header.
pub async fn request_context(mut req: Request, next: Next) -> Response {
    let ctx = RequestContext::new();
    let span = ctx.span().clone();
    let request_id = ctx.request_id().to_string();
    req.extensions_mut().insert(ctx);

    let mut response = next.run(req).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
