//! Publishing endpoint handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::error::ErrorReport;
use crate::application::posts::CreatePostCommand;

use super::AppState;
use super::error::ApiError;
use super::models::{CreatePostRequest, CreatePostResponse, ListPostsResponse};

pub async fn create_post(
    State(state): State<AppState>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let command = CreatePostCommand {
        title: payload.title,
        body: payload.body,
        author: payload.author,
        admin_token: payload.admin_token,
    };

    let post = state.posts.create(command).await?;
    Ok(Json(CreatePostResponse { post }))
}

pub async fn list_posts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let posts = state.posts.list().await?;
    Ok(Json(ListPostsResponse { posts }))
}

/// Liveness probe: succeeds when the blob store namespace is enumerable.
pub async fn health(State(state): State<AppState>) -> Response {
    match state.store.list_keys().await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}
