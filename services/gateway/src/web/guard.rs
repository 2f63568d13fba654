//! services/gateway/src/web/guard.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use gateway_core::{parse_authorization, AuthService, PortError, RequestContext, Role};
use std::sync::Arc;
use tracing::debug;

use crate::web::response::ApiFailure;

/// Middleware state: the auth backend and the role the route requires.
#[derive(Clone)]
pub struct Guard {
    auth: Arc<dyn AuthService>,
    role: Role,
}

impl Guard {
    pub fn new(auth: Arc<dyn AuthService>, role: Role) -> Self {
        Self { auth, role }
    }
}

/// Middleware that resolves the caller from the `Authorization` header.
///
/// A malformed header is rejected before any backend call. On success the
/// request's context is replaced by one carrying the identity and the raw token.
pub async fn authorize(
    State(guard): State<Guard>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiFailure> {
    let ctx = req
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .ok_or_else(|| PortError::Internal("request context is missing".to_string()))?;

    // 1. Extract the token
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let token = parse_authorization(header)
        .inspect_err(|_| debug!(parent: ctx.span(), "malformed authorization header"))?
        .to_string();

    // 2. Ask the auth backend
    let identity = guard
        .auth
        .authenticate(&token, guard.role)
        .await
        .inspect_err(|e| {
            debug!(parent: ctx.span(), role = guard.role.as_str(), error = %e, "authentication failed")
        })?;
    debug!(
        parent: ctx.span(),
        user_id = %identity.id,
        role = identity.role.as_str(),
        "caller authenticated"
    );

    // 3. Bind the caller and continue to the handler
    req.extensions_mut().insert(ctx.with_identity(identity, token));
    Ok(next.run(req).await)
}
