//! Publishing operations: create a post, list stored posts.

use std::sync::Arc;

use futures::future;
use serde::Serialize;
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::warn;

use crate::application::store::{BlobStore, StoreError};
use crate::domain::error::DomainError;
use crate::domain::posts::{self, Post};

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("blog posting is not configured")]
    NotConfigured,
    #[error("admin token missing or mismatched")]
    Unauthorized,
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct CreatePostCommand {
    pub title: String,
    pub body: String,
    pub author: Option<String>,
    pub admin_token: Option<String>,
}

/// A listed post annotated with its storage key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListedPost {
    #[serde(flatten)]
    pub post: Post,
    pub key: String,
}

/// Create and list posts against the blob store.
///
/// The admin token is injected once at construction; the service holds no
/// other state between requests.
pub struct PostService {
    store: Arc<dyn BlobStore>,
    admin_token: Option<String>,
}

impl PostService {
    pub fn new(store: Arc<dyn BlobStore>, admin_token: Option<String>) -> Self {
        Self { store, admin_token }
    }

    /// Publish a new post.
    ///
    /// Preconditions are checked in order: configured secret, caller token,
    /// then field validation.
    pub async fn create(&self, command: CreatePostCommand) -> Result<Post, PublishError> {
        let secret = self
            .admin_token
            .as_deref()
            .ok_or(PublishError::NotConfigured)?;

        let provided = command.admin_token.as_deref().unwrap_or_default();
        if provided.is_empty() || !token_matches(secret, provided) {
            return Err(PublishError::Unauthorized);
        }

        posts::validate_draft(&command.title, &command.body)?;

        let created_at = posts::now_millis();
        let key = posts::post_key(created_at, &command.title);
        let post = Post {
            title: command.title,
            body: command.body,
            author: command.author.unwrap_or_default(),
            created_at,
        };

        let value = serde_json::to_value(&post).map_err(StoreError::encoding)?;
        self.store.put_json(&key, &value).await?;

        Ok(post)
    }

    /// Return every well-formed stored post, newest first, annotated with
    /// its storage key.
    ///
    /// Values are fetched with a concurrent fan-out; a single failed read
    /// fails the whole listing. Values that do not decode into a post, or
    /// whose title is empty, are skipped.
    pub async fn list(&self) -> Result<Vec<ListedPost>, PublishError> {
        let keys = self.store.list_keys().await?;
        let values =
            future::try_join_all(keys.iter().map(|key| self.store.get_json(key))).await?;

        let mut listed: Vec<ListedPost> = keys
            .into_iter()
            .zip(values)
            .filter_map(|(key, value)| value.and_then(|value| decode_entry(key, value)))
            .collect();

        listed.sort_by(|a, b| b.post.created_at.cmp(&a.post.created_at));
        Ok(listed)
    }
}

fn decode_entry(key: String, value: serde_json::Value) -> Option<ListedPost> {
    let post: Post = match serde_json::from_value(value) {
        Ok(post) => post,
        Err(err) => {
            warn!(
                target = "foglio::posts",
                key = %key,
                error = %err,
                "skipping stored entry that does not decode into a post",
            );
            return None;
        }
    };

    if post.title.is_empty() {
        warn!(
            target = "foglio::posts",
            key = %key,
            "skipping stored entry without a title",
        );
        return None;
    }

    Some(ListedPost { post, key })
}

fn token_matches(secret: &str, provided: &str) -> bool {
    secret
        .as_bytes()
        .ct_eq(provided.as_bytes())
        .unwrap_u8()
        == 1
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use serde_json::{Value, json};
    use time::OffsetDateTime;
    use time::format_description::well_known::Rfc3339;
    use tokio::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct MemoryStore {
        entries: Mutex<HashMap<String, Value>>,
        fail_reads: bool,
    }

    impl MemoryStore {
        async fn seed(&self, key: &str, value: Value) {
            self.entries.lock().await.insert(key.to_string(), value);
        }
    }

    #[async_trait]
    impl BlobStore for MemoryStore {
        async fn list_keys(&self) -> Result<Vec<String>, StoreError> {
            Ok(self.entries.lock().await.keys().cloned().collect())
        }

        async fn get_json(&self, key: &str) -> Result<Option<Value>, StoreError> {
            if self.fail_reads {
                return Err(StoreError::backend("simulated read failure"));
            }
            Ok(self.entries.lock().await.get(key).cloned())
        }

        async fn put_json(&self, key: &str, value: &Value) -> Result<(), StoreError> {
            self.entries
                .lock()
                .await
                .insert(key.to_string(), value.clone());
            Ok(())
        }
    }

    fn service(store: Arc<MemoryStore>, token: Option<&str>) -> PostService {
        PostService::new(store, token.map(str::to_string))
    }

    fn command(token: Option<&str>) -> CreatePostCommand {
        CreatePostCommand {
            title: "Hello, World!".to_string(),
            body: "text".to_string(),
            author: None,
            admin_token: token.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn create_without_configured_secret_is_rejected() {
        let store = Arc::new(MemoryStore::default());
        let service = service(store, None);

        let result = service.create(command(Some("whatever"))).await;
        assert!(matches!(result, Err(PublishError::NotConfigured)));
    }

    #[tokio::test]
    async fn create_with_missing_or_wrong_token_is_rejected() {
        let store = Arc::new(MemoryStore::default());
        let service = service(store.clone(), Some("secret"));

        let missing = service.create(command(None)).await;
        assert!(matches!(missing, Err(PublishError::Unauthorized)));

        let wrong = service.create(command(Some("secret-but-longer"))).await;
        assert!(matches!(wrong, Err(PublishError::Unauthorized)));

        assert!(store.entries.lock().await.is_empty());
    }

    #[tokio::test]
    async fn create_with_empty_fields_is_rejected() {
        let store = Arc::new(MemoryStore::default());
        let service = service(store, Some("secret"));

        let mut cmd = command(Some("secret"));
        cmd.title = String::new();
        assert!(matches!(
            service.create(cmd).await,
            Err(PublishError::Domain(_))
        ));

        let mut cmd = command(Some("secret"));
        cmd.body = String::new();
        assert!(matches!(
            service.create(cmd).await,
            Err(PublishError::Domain(_))
        ));
    }

    #[tokio::test]
    async fn create_persists_under_a_time_ordered_key() {
        let store = Arc::new(MemoryStore::default());
        let service = service(store.clone(), Some("secret"));

        let post = service.create(command(Some("secret"))).await.expect("create");
        assert_eq!(post.author, "");

        let entries = store.entries.lock().await;
        assert_eq!(entries.len(), 1);
        let key = entries.keys().next().expect("stored key");
        let rendered = posts::format_timestamp(post.created_at);
        assert_eq!(key, &format!("{rendered}-hello-world"));

        let stored = entries.get(key).expect("stored value");
        assert_eq!(stored["title"], "Hello, World!");
        assert_eq!(stored["author"], "");
        assert_eq!(stored["createdAt"], rendered.as_str());
    }

    #[tokio::test]
    async fn created_posts_round_trip_through_listing() {
        let store = Arc::new(MemoryStore::default());
        let service = service(store, Some("secret"));

        let mut cmd = command(Some("secret"));
        cmd.author = Some("ada".to_string());
        let created = service.create(cmd).await.expect("create");

        let listed = service.list().await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].post, created);
    }

    #[tokio::test]
    async fn list_returns_posts_newest_first() {
        let store = Arc::new(MemoryStore::default());
        for (stamp, title) in [
            ("2026-01-01T00:00:00.000Z", "first"),
            ("2026-03-01T00:00:00.000Z", "third"),
            ("2026-02-01T00:00:00.000Z", "second"),
        ] {
            store
                .seed(
                    &format!("{stamp}-{title}"),
                    json!({
                        "title": title,
                        "body": "text",
                        "author": "",
                        "createdAt": stamp,
                    }),
                )
                .await;
        }

        let service = service(store, None);
        let listed = service.list().await.expect("list");

        let titles: Vec<&str> = listed.iter().map(|entry| entry.post.title.as_str()).collect();
        assert_eq!(titles, ["third", "second", "first"]);

        let parsed: Vec<OffsetDateTime> = listed
            .iter()
            .map(|entry| entry.post.created_at)
            .collect();
        assert!(parsed.windows(2).all(|pair| pair[0] >= pair[1]));
        assert!(listed.iter().all(|entry| {
            OffsetDateTime::parse(&posts::format_timestamp(entry.post.created_at), &Rfc3339)
                .is_ok()
        }));
    }

    #[tokio::test]
    async fn list_skips_malformed_entries() {
        let store = Arc::new(MemoryStore::default());
        store
            .seed(
                "2026-01-01T00:00:00.000Z-ok",
                json!({
                    "title": "ok",
                    "body": "text",
                    "author": "",
                    "createdAt": "2026-01-01T00:00:00.000Z",
                }),
            )
            .await;
        // No title field at all.
        store
            .seed(
                "2026-01-02T00:00:00.000Z-untitled",
                json!({ "body": "text", "createdAt": "2026-01-02T00:00:00.000Z" }),
            )
            .await;
        // Empty title.
        store
            .seed(
                "2026-01-03T00:00:00.000Z-blank",
                json!({
                    "title": "",
                    "body": "text",
                    "author": "",
                    "createdAt": "2026-01-03T00:00:00.000Z",
                }),
            )
            .await;
        // Unparsable timestamp.
        store
            .seed(
                "not-a-timestamp-post",
                json!({
                    "title": "bad clock",
                    "body": "text",
                    "author": "",
                    "createdAt": "yesterday",
                }),
            )
            .await;

        let service = service(store, None);
        let listed = service.list().await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].post.title, "ok");
        assert_eq!(listed[0].key, "2026-01-01T00:00:00.000Z-ok");
    }

    #[tokio::test]
    async fn list_propagates_read_failures() {
        let store = Arc::new(MemoryStore {
            entries: Mutex::new(HashMap::from([(
                "2026-01-01T00:00:00.000Z-post".to_string(),
                json!({}),
            )])),
            fail_reads: true,
        });

        let service = service(store, None);
        assert!(matches!(
            service.list().await,
            Err(PublishError::Store(_))
        ));
    }
}
