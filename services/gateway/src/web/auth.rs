//! services/gateway/src/web/auth.rs
//!
//! Authentication endpoints. Tokens are issued and revoked by the auth
//! backend; the gateway only forwards them.

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use gateway_core::{Credentials, PortError, Registration, RequestContext};
use std::sync::Arc;
use tracing::debug;

use crate::web::{
    dto::{require, validate_phone, RefreshRequest, SignInRequest, SignUpRequest, TokensDto, UserDto},
    response::{ok, ApiFailure, ApiResult, Envelope},
    state::AppState,
};

/// Unwraps a JSON body, reporting a malformed one in the error envelope.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiFailure::bad_request(rejection.body_text()))
}

/// POST /auth/sign-in - Exchange phone and password for tokens
#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-in",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = TokensDto),
        (status = 400, description = "Invalid request", body = crate::web::response::ErrorBody),
        (status = 401, description = "Invalid credentials", body = crate::web::response::ErrorBody)
    )
)]
pub async fn sign_in_handler(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> ApiResult<Json<Envelope<TokensDto>>> {
    let req = json_body(payload)?;
    validate_phone(&req.phone)?;
    require("password", &req.password)?;

    debug!(parent: ctx.span(), phone = %req.phone, "sign in");
    let tokens = state
        .auth
        .sign_in(&Credentials {
            phone: req.phone,
            password: req.password,
        })
        .await?;
    Ok(ok(TokensDto::from(tokens)))
}

/// POST /auth/sign-up - Register a new account
#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-up",
    request_body = SignUpRequest,
    responses(
        (status = 200, description = "Account created", body = TokensDto),
        (status = 400, description = "Invalid request or account already exists", body = crate::web::response::ErrorBody)
    )
)]
pub async fn sign_up_handler(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> ApiResult<Json<Envelope<TokensDto>>> {
    let req = json_body(payload)?;
    validate_phone(&req.phone)?;
    require("password", &req.password)?;
    require("lastName", &req.last_name)?;
    require("firstName", &req.first_name)?;
    require("middleName", &req.middle_name)?;

    debug!(parent: ctx.span(), phone = %req.phone, "sign up");
    let tokens = state
        .auth
        .sign_up(&Registration {
            phone: req.phone,
            password: req.password,
            last_name: req.last_name,
            first_name: req.first_name,
            middle_name: req.middle_name,
        })
        .await?;
    Ok(ok(TokensDto::from(tokens)))
}

/// POST /auth/sign-out - Revoke the caller's access token
#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-out",
    responses(
        (status = 200, description = "Signed out"),
        (status = 401, description = "Not authenticated", body = crate::web::response::ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn sign_out_handler(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Envelope<()>>> {
    let token = ctx
        .access_token()
        .ok_or_else(|| PortError::Internal("missing access token".to_string()))?;
    state.auth.sign_out(token).await?;
    debug!(parent: ctx.span(), "signed out");
    Ok(ok(()))
}

/// POST /auth/refresh - Exchange a refresh token for a new pair
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Tokens refreshed", body = TokensDto),
        (status = 401, description = "Refresh token rejected", body = crate::web::response::ErrorBody)
    )
)]
pub async fn refresh_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> ApiResult<Json<Envelope<TokensDto>>> {
    let req = json_body(payload)?;
    require("refreshToken", &req.refresh_token)?;

    let tokens = state.auth.refresh(&req.refresh_token).await?;
    Ok(ok(TokensDto::from(tokens)))
}

/// GET /profile - The caller's own account
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "Caller profile", body = UserDto),
        (status = 401, description = "Not authenticated", body = crate::web::response::ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Envelope<UserDto>>> {
    let identity = ctx.require_identity()?;
    let user = state.users.find_user_by_id(&identity.id).await?;
    Ok(ok(UserDto::from(&user)))
}
