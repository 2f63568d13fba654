//! services/gateway/src/web/rest.rs
//!
//! Assembles the REST router and holds the master definition for the OpenAPI
//! specification.

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use gateway_core::Role;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::warn;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::web::{
    analyzer::*,
    auth::*,
    context::{request_context, REQUEST_ID_HEADER},
    dto::*,
    guard::{authorize, Guard},
    response::ErrorBody,
    state::AppState,
    suggestions::*,
    summary::*,
    tickets::*,
};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        sign_in_handler,
        sign_up_handler,
        sign_out_handler,
        refresh_handler,
        profile_handler,
        suggestions_handler,
        list_tickets_handler,
        find_ticket_handler,
        create_ticket_handler,
        close_ticket_handler,
        my_tickets_handler,
        analyze_handler,
        shop_summary_handler,
        user_summary_handler,
        status_summary_handler,
    ),
    components(schemas(
        SignInRequest,
        SignUpRequest,
        RefreshRequest,
        TokensDto,
        UserDto,
        ItemDto,
        TicketDto,
        TicketListDto,
        MeasureDto,
        ImageInfoDto,
        SuggestionDto,
        SummaryRecordDto,
        SummaryDto,
        ErrorBody,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "Gateway API", description = "REST front for the ticket, storage, analyzer and suggestion backends. Successful responses are wrapped in {\"data\": ...}.")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

//=========================================================================================
// Router
//=========================================================================================

/// Builds the complete application: `/api/v1` routes behind the shared
/// middleware stack, plus Swagger UI.
pub fn build_router(state: Arc<AppState>) -> Router {
    let config = state.config.clone();
    let user =
        axum_middleware::from_fn_with_state(Guard::new(state.auth.clone(), Role::User), authorize);
    let admin =
        axum_middleware::from_fn_with_state(Guard::new(state.auth.clone(), Role::Admin), authorize);

    let api = Router::new()
        // Auth
        .route("/auth/sign-in", post(sign_in_handler))
        .route("/auth/sign-up", post(sign_up_handler))
        .route("/auth/sign-out", post(sign_out_handler).route_layer(user.clone()))
        .route("/auth/refresh", post(refresh_handler))
        .route("/profile", get(profile_handler).route_layer(user.clone()))
        // Suggestions
        .route("/suggestions", get(suggestions_handler))
        // Tickets
        .route(
            "/tickets",
            get(list_tickets_handler).merge(post(create_ticket_handler).route_layer(user.clone())),
        )
        .route(
            "/tickets/{id}",
            get(find_ticket_handler).merge(patch(close_ticket_handler).route_layer(admin.clone())),
        )
        .route("/user/tickets", get(my_tickets_handler).route_layer(user.clone()))
        // Analyzer
        .route("/analyze", post(analyze_handler).route_layer(user))
        // Summaries
        .route("/summary/shops", get(shop_summary_handler).route_layer(admin.clone()))
        .route("/summary/users", get(user_summary_handler).route_layer(admin.clone()))
        .route("/summary/statuses", get(status_summary_handler).route_layer(admin))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api)
        .layer(DefaultBodyLimit::max(config.body_limit))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors(&config.cors_origins))
        .layer(axum_middleware::from_fn(request_context))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

fn cors(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin
                .parse::<HeaderValue>()
                .inspect_err(|_| warn!(origin = %origin, "ignoring invalid CORS origin"))
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
        .expose_headers([REQUEST_ID_HEADER])
}
