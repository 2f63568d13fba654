//! crates/gateway_core/src/context.rs
//!
//! The per-request scope threaded explicitly through every call chain:
//! request id, the tracing span that plays the role of the request logger,
//! and the caller's identity once the auth guard has resolved it.

use tracing::Span;
use uuid::Uuid;

use crate::ports::{PortError, PortResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

/// The authenticated caller, as resolved by the auth backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub role: Role,
}

/// Per-request scope. Created once by the request context middleware and
/// discarded with the response.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    span: Span,
    caller: Option<Caller>,
}

#[derive(Debug, Clone)]
struct Caller {
    identity: Identity,
    access_token: String,
}

impl RequestContext {
    /// Generates a fresh request id and a `request` span annotated with it.
    pub fn new() -> Self {
        let request_id = Uuid::new_v4().to_string();
        let span = tracing::info_span!("request", request_id = %request_id);
        Self::with_span(request_id, span)
    }

    /// Wraps an existing id and span. The span must already carry `request_id`.
    pub fn with_span(request_id: String, span: Span) -> Self {
        Self {
            request_id,
            span,
            caller: None,
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// The request logger. Events emitted with `parent: ctx.span()` carry the request id.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Binds the caller. A context that already carries an identity is returned unchanged.
    pub fn with_identity(mut self, identity: Identity, access_token: impl Into<String>) -> Self {
        if self.caller.is_none() {
            self.caller = Some(Caller {
                identity,
                access_token: access_token.into(),
            });
        }
        self
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.caller.as_ref().map(|c| &c.identity)
    }

    pub fn access_token(&self) -> Option<&str> {
        self.caller.as_ref().map(|c| c.access_token.as_str())
    }

    /// The caller's identity, or an internal error when the route was mounted
    /// without the auth guard.
    pub fn require_identity(&self) -> PortResult<&Identity> {
        self.identity()
            .ok_or_else(|| PortError::Internal("route requires an authenticated caller".to_string()))
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts the token from an `Authorization` header of the form `<scheme> <token>`.
///
/// The scheme itself is not checked; the auth backend decides whether the token is valid.
pub fn parse_authorization(header: &str) -> PortResult<&str> {
    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(_scheme), Some(token)) => Ok(token),
        _ => Err(PortError::InvalidRequest(
            "malformed authorization header".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn request_ids_are_unique() {
        let ids: HashSet<String> = (0..1000)
            .map(|_| RequestContext::new().request_id().to_string())
            .collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn identity_is_bound_once() {
        let first = Identity {
            id: "u-1".to_string(),
            role: Role::User,
        };
        let second = Identity {
            id: "u-2".to_string(),
            role: Role::Admin,
        };

        let ctx = RequestContext::new();
        let id = ctx.request_id().to_string();
        assert!(ctx.identity().is_none());
        assert!(matches!(ctx.require_identity(), Err(PortError::Internal(_))));

        let ctx = ctx.with_identity(first.clone(), "tok-1").with_identity(second, "tok-2");
        assert_eq!(ctx.identity(), Some(&first));
        assert_eq!(ctx.access_token(), Some("tok-1"));
        assert_eq!(ctx.request_id(), id);
    }

    #[test]
    fn authorization_header_needs_scheme_and_token() {
        assert_eq!(parse_authorization("Bearer abc"), Ok("abc"));
        assert_eq!(parse_authorization("  Bearer   abc  "), Ok("abc"));
        assert_eq!(parse_authorization("Token abc extra"), Ok("abc"));

        for header in ["", "Bearer", "abc", "   "] {
            assert_eq!(
                parse_authorization(header),
                Err(PortError::InvalidRequest(
                    "malformed authorization header".to_string()
                )),
                "header {header:?}"
            );
        }
    }
}
