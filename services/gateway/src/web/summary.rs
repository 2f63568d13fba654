//! services/gateway/src/web/summary.rs
//!
//! Admin statistics. Each endpoint drains one server stream from the ticket
//! backend into `{records: [{key, count}]}`.

use axum::{extract::State, Extension, Json};
use gateway_core::{
    summary::{drain, label_users},
    RequestContext,
};
use std::sync::Arc;

use crate::web::{
    dto::SummaryDto,
    response::{ok, ApiResult, Envelope},
    state::AppState,
};

/// GET /summary/shops - Ticket counts per shop
#[utoipa::path(
    get,
    path = "/api/v1/summary/shops",
    responses(
        (status = 200, description = "Counts keyed by shop", body = SummaryDto),
        (status = 403, description = "Admin role required", body = crate::web::response::ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn shop_summary_handler(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Envelope<SummaryDto>>> {
    let records = state.summaries.shop_summary().await?;
    let summary = drain(&ctx, records).await?;
    Ok(ok(SummaryDto::from(summary)))
}

/// GET /summary/users - Ticket counts per user, keyed by display name
#[utoipa::path(
    get,
    path = "/api/v1/summary/users",
    responses(
        (status = 200, description = "Counts keyed by user display name", body = SummaryDto),
        (status = 403, description = "Admin role required", body = crate::web::response::ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn user_summary_handler(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Envelope<SummaryDto>>> {
    let records = state.summaries.user_summary().await?;
    let by_user_id = drain(&ctx, records).await?;
    let summary = label_users(&ctx, state.users.as_ref(), by_user_id).await?;
    Ok(ok(SummaryDto::from(summary)))
}

/// GET /summary/statuses - Ticket counts per status
#[utoipa::path(
    get,
    path = "/api/v1/summary/statuses",
    responses(
        (status = 200, description = "Counts keyed by status", body = SummaryDto),
        (status = 403, description = "Admin role required", body = crate::web::response::ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn status_summary_handler(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Envelope<SummaryDto>>> {
    let records = state.summaries.status_summary().await?;
    let summary = drain(&ctx, records).await?;
    Ok(ok(SummaryDto::from(summary)))
}
