//! services/gateway/src/web/suggestions.rs

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use gateway_core::RequestContext;
use std::sync::Arc;
use tracing::debug;

use crate::web::{
    dto::{SuggestionDto, SuggestionsQuery},
    response::{ok, ApiFailure, ApiResult, Envelope},
    state::AppState,
    tickets::query,
};

/// GET /suggestions - Shops near a point
#[utoipa::path(
    get,
    path = "/api/v1/suggestions",
    params(SuggestionsQuery),
    responses(
        (status = 200, description = "Nearby shops", body = [SuggestionDto]),
        (status = 400, description = "Missing or invalid coordinates", body = crate::web::response::ErrorBody)
    )
)]
pub async fn suggestions_handler(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    params: Result<Query<SuggestionsQuery>, QueryRejection>,
) -> ApiResult<Json<Envelope<Vec<SuggestionDto>>>> {
    let q = query(params)?;
    let lon = q.lon.ok_or_else(|| ApiFailure::bad_request("lon is required"))?;
    let lat = q.lat.ok_or_else(|| ApiFailure::bad_request("lat is required"))?;
    let count = q
        .count
        .filter(|c| *c > 0)
        .ok_or_else(|| ApiFailure::bad_request("count must be a positive number"))?;

    debug!(parent: ctx.span(), lon, lat, count, "suggestions");
    let suggestions = state.suggestions.suggestions(lon, lat, count).await?;
    Ok(ok(suggestions.into_iter().map(SuggestionDto::from).collect()))
}
