pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;

use std::sync::Arc;

use axum::{Router, middleware as axum_middleware, routing::get};

use crate::application::posts::PostService;
use crate::application::store::BlobStore;

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub store: Arc<dyn BlobStore>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/blog-posts",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route("/healthz", get(handlers::health))
        .with_state(state)
        .layer(axum_middleware::from_fn(middleware::log_responses))
        .layer(axum_middleware::from_fn(middleware::set_request_context))
}
