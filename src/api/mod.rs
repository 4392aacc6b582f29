pub mod handlers;
pub mod middleware;
pub mod state;

use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{config::Settings, service::ServiceContext};
use state::AppState;

pub fn create_app(service_context: Arc<ServiceContext>, settings: Arc<Settings>) -> Router {
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))
        // Recipient-facing notification feed
        .nest("/api/notifications", notification_routes(app_state.clone()))
        // Admin dashboard routes
        .nest("/admin", admin_routes(app_state.clone()))
        // Add state to the router
        .with_state(app_state)
        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive()) // Configure properly for production
        .layer(TraceLayer::new_for_http())
}

fn notification_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::notifications::list))
        .route("/unread-count", get(handlers::notifications::unread_count))
        .route("/status", get(handlers::notifications::status))
        .route("/stream", get(handlers::notifications::stream))
        .route("/read-all", post(handlers::notifications::mark_all_read))
        .route("/read", delete(handlers::notifications::clear_read))
        .route("/:id/read", post(handlers::notifications::mark_read))
        .route("/:id", delete(handlers::notifications::delete))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::identity::require_user,
        ))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/announcements", announcement_routes())
        .route("/activity", get(handlers::activity::list))
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::identity::require_admin,
        ))
}

fn announcement_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::announcements::list))
        .route("/", post(handlers::announcements::create))
        .route("/:id", get(handlers::announcements::get))
        .route("/:id", put(handlers::announcements::update))
        .route("/:id", delete(handlers::announcements::delete))
        .route("/:id/schedule", patch(handlers::announcements::schedule))
        .route("/:id/publish", patch(handlers::announcements::publish))
        .route("/:id/archive", patch(handlers::announcements::archive))
}

