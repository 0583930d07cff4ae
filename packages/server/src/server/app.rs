//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{
    acknowledge_page_handler, check_all_pages_handler, check_page_handler, create_page_handler,
    create_task_handler, delete_page_handler, delete_task_handler, health_handler,
    list_pages_handler, list_tasks_by_category_handler, list_tasks_handler,
    set_task_completed_handler, toggle_task_handler, update_task_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub deps: Arc<ServerDeps>,
    /// Present when backed by Postgres; used by the health check.
    pub db_pool: Option<PgPool>,
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps, db_pool: Option<PgPool>) -> Router {
    let app_state = AxumAppState {
        deps: Arc::new(deps),
        db_pool,
    };

    // The browser front-end is served from a different origin.
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/health", get(health_handler))
        // Tracked pages
        .route("/api/pages", post(create_page_handler).get(list_pages_handler))
        .route("/api/pages/check", post(check_all_pages_handler))
        .route("/api/pages/:id", delete(delete_page_handler))
        .route("/api/pages/:id/acknowledge", put(acknowledge_page_handler))
        .route("/api/pages/:id/check", post(check_page_handler))
        // Tasks
        .route("/api/tasks", post(create_task_handler).get(list_tasks_handler))
        .route(
            "/api/tasks/category/:category",
            get(list_tasks_by_category_handler),
        )
        .route(
            "/api/tasks/:id",
            put(set_task_completed_handler).delete(delete_task_handler),
        )
        .route("/api/tasks/:id/toggle", put(toggle_task_handler))
        .route("/api/tasks/:id/update", put(update_task_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
