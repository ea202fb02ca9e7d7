//! Wire models for the publishing API.

use serde::{Deserialize, Serialize};

use crate::application::posts::ListedPost;
use crate::domain::posts::Post;

/// Body of `POST /api/blog-posts`.
///
/// Every field is optional at the wire level; the ordering of the
/// configuration, authorization, and validation checks decides which error
/// the caller sees, so absence must reach the service rather than be
/// rejected during extraction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub author: Option<String>,
    pub admin_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatePostResponse {
    pub post: Post,
}

#[derive(Debug, Serialize)]
pub struct ListPostsResponse {
    pub posts: Vec<ListedPost>,
}
