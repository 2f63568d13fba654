//! services/gateway/src/web/tickets.rs
//!
//! Ticket endpoints: listing with owner enrichment, lookup, creation with a
//! streamed price tag photo, and closing.

use axum::{
    extract::{multipart::MultipartRejection, rejection::QueryRejection, Multipart, Path, Query, State},
    Extension, Json,
};
use gateway_core::{
    enrich::{enrich_one, enrich_owned_page, enrich_page},
    transfer, Bounds, NewTicket, RequestContext, TicketFilter,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::web::{
    dto::{PageQuery, TicketDto, TicketListDto, TicketListQuery},
    form::Form,
    response::{ok, ApiFailure, ApiResult, Envelope},
    state::AppState,
};

pub(crate) fn query<T>(query: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    query
        .map(|Query(q)| q)
        .map_err(|rejection| ApiFailure::bad_request(rejection.body_text()))
}

//=========================================================================================
// Listing and Lookup
//=========================================================================================

/// GET /tickets - Page through all tickets
#[utoipa::path(
    get,
    path = "/api/v1/tickets",
    params(TicketListQuery),
    responses(
        (status = 200, description = "One page of tickets with their owners", body = TicketListDto),
        (status = 404, description = "A ticket owner could not be resolved", body = crate::web::response::ErrorBody)
    )
)]
pub async fn list_tickets_handler(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    params: Result<Query<TicketListQuery>, QueryRejection>,
) -> ApiResult<Json<Envelope<TicketListDto>>> {
    let q = query(params)?;
    let filter = TicketFilter {
        user_id: q.user_id.filter(|id| !id.is_empty()),
        bounds: Bounds {
            limit: q.limit,
            offset: q.offset,
        },
    };
    debug!(parent: ctx.span(), limit = q.limit, offset = q.offset, user_id = ?filter.user_id, "list tickets");

    let page = state.tickets.list(&filter).await?;
    let tickets = enrich_page(&ctx, state.users.as_ref(), page.tickets).await?;
    Ok(ok(TicketListDto::new(tickets, page.total)))
}

/// GET /tickets/{id} - A single ticket with its owner
#[utoipa::path(
    get,
    path = "/api/v1/tickets/{id}",
    params(("id" = String, Path, description = "Ticket id")),
    responses(
        (status = 200, description = "The ticket", body = TicketDto),
        (status = 404, description = "Unknown ticket", body = crate::web::response::ErrorBody)
    )
)]
pub async fn find_ticket_handler(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<TicketDto>>> {
    debug!(parent: ctx.span(), ticket_id = %id, "find ticket");
    let ticket = state.tickets.find_by_id(&id).await?;
    let enriched = enrich_one(state.users.as_ref(), ticket).await?;
    Ok(ok(TicketDto::from(enriched)))
}

/// GET /user/tickets - The caller's own tickets
#[utoipa::path(
    get,
    path = "/api/v1/user/tickets",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of the caller's tickets", body = TicketListDto),
        (status = 401, description = "Not authenticated", body = crate::web::response::ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn my_tickets_handler(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    params: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Json<Envelope<TicketListDto>>> {
    let q = query(params)?;
    let owner_id = ctx.require_identity()?.id.clone();
    debug!(parent: ctx.span(), limit = q.limit, offset = q.offset, "list own tickets");

    let filter = TicketFilter {
        user_id: Some(owner_id.clone()),
        bounds: Bounds {
            limit: q.limit,
            offset: q.offset,
        },
    };
    let page = state.tickets.list(&filter).await?;
    let tickets = enrich_owned_page(&ctx, state.users.as_ref(), &owner_id, page.tickets).await?;
    Ok(ok(TicketListDto::new(tickets, page.total)))
}

//=========================================================================================
// Mutations
//=========================================================================================

/// POST /tickets - Open a ticket for a price tag photo
///
/// Accepts `multipart/form-data` with the text fields `address` and `shopName`
/// and the file part `pricetag`.
#[utoipa::path(
    post,
    path = "/api/v1/tickets",
    request_body(content_type = "multipart/form-data", description = "address, shopName and the pricetag photo"),
    responses(
        (status = 200, description = "Id of the new ticket", body = String),
        (status = 400, description = "Missing form field", body = crate::web::response::ErrorBody),
        (status = 422, description = "The photo was rejected", body = crate::web::response::ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn create_ticket_handler(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<Envelope<String>>> {
    let user_id = ctx.require_identity()?.id.clone();

    // 1. Read and validate the form
    let mut form = Form::read(multipart).await?;
    let shop_addr = form.text("address")?.to_string();
    let shop_name = form.text("shopName")?.to_string();
    let pricetag = form.take_file("pricetag")?;
    debug!(
        parent: ctx.span(),
        size = pricetag.size(),
        content_type = pricetag.content_type(),
        "upload price tag"
    );

    // 2. Stream the photo to object storage
    let sink = state.storage.open_upload(pricetag.content_type()).await?;
    let object_name = transfer(&ctx, pricetag, sink).await?;

    // 3. Create the ticket pointing at the stored object
    let ticket = NewTicket {
        user_id,
        shop_name,
        shop_addr,
        image_url: object_name,
    };
    let ticket_id = state.tickets.create(&ticket).await.inspect_err(|e| {
        warn!(
            parent: ctx.span(),
            object = %ticket.image_url,
            error = %e,
            "ticket creation failed, uploaded object is orphaned"
        )
    })?;

    info!(parent: ctx.span(), ticket_id = %ticket_id, "ticket created");
    Ok(ok(ticket_id))
}

/// PATCH /tickets/{id} - Close a ticket
#[utoipa::path(
    patch,
    path = "/api/v1/tickets/{id}",
    params(("id" = String, Path, description = "Ticket id")),
    responses(
        (status = 200, description = "Ticket closed"),
        (status = 403, description = "Admin role required", body = crate::web::response::ErrorBody),
        (status = 404, description = "Unknown ticket", body = crate::web::response::ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn close_ticket_handler(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<()>>> {
    if id.trim().is_empty() {
        return Err(ApiFailure::bad_request("id is required"));
    }
    debug!(parent: ctx.span(), ticket_id = %id, "close ticket");
    state.tickets.close(&id).await?;
    info!(parent: ctx.span(), ticket_id = %id, "ticket closed");
    Ok(ok(()))
}
