//! services/gateway/src/web/analyzer.rs

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Extension, Json,
};
use gateway_core::{transfer, RequestContext};
use std::sync::Arc;
use tracing::debug;

use crate::web::{
    dto::ImageInfoDto,
    form::Form,
    response::{ok, ApiResult, Envelope},
    state::AppState,
};

/// POST /analyze - Extract product and price from a price tag photo
#[utoipa::path(
    post,
    path = "/api/v1/analyze",
    request_body(content_type = "multipart/form-data", description = "The pricetag photo"),
    responses(
        (status = 200, description = "Extracted price tag data", body = ImageInfoDto),
        (status = 400, description = "Missing photo", body = crate::web::response::ErrorBody),
        (status = 422, description = "The photo could not be analyzed", body = crate::web::response::ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<Envelope<ImageInfoDto>>> {
    let mut form = Form::read(multipart).await?;
    let pricetag = form.take_file("pricetag")?;
    debug!(parent: ctx.span(), size = pricetag.size(), "analyze price tag");

    let sink = state.analyzer.open_analysis().await?;
    let info = transfer(&ctx, pricetag, sink).await?;
    Ok(ok(ImageInfoDto::from(info)))
}
