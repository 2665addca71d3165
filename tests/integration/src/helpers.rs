//! Test helpers for integration tests
//!
//! Provides a test server wrapper, authenticated request helpers, and response
//! assertions.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use readalong_api::{create_app, AppState};
use readalong_common::{AppConfig, JwtService};
use readalong_core::entities::GroupMember;
use readalong_core::{Snowflake, SnowflakeGenerator};
use readalong_db::MemoryStore;
use readalong_service::ServiceContext;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::test_config;

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: Arc<MemoryStore>,
    jwt: JwtService,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server with the default test config
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let store = MemoryStore::new_shared();
        let jwt = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry);

        let service_context = ServiceContext::builder()
            .store(store.clone())
            .jwt_service(Arc::new(jwt.clone()))
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id)))
            .discussion(config.discussion.clone())
            .build()
            .map_err(|e| anyhow::anyhow!("Service context error: {e}"))?;

        let app = create_app(AppState::new(service_context, config));

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            store,
            jwt,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Add a group member directly to the store
    pub fn add_member(&self, group_id: Snowflake, user_id: Snowflake, name: &str) {
        self.store
            .add_member(GroupMember::new(group_id, user_id, name.to_string()));
    }

    /// Issue a bearer token for a user
    pub fn token_for(&self, user_id: Snowflake) -> String {
        self.jwt
            .issue_access_token(user_id)
            .expect("Failed to issue test token")
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// Make a GET request with auth token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }

    /// Make a POST request with JSON body and no auth
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    /// Make a POST request with auth token
    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// Make a POST request with auth token and no body
    pub async fn post_empty_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }

    /// Make a POST request with a raw body
    pub async fn post_raw_auth(&self, path: &str, token: &str, body: &str) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await?)
    }

    /// Make a PUT request with auth token and no body
    pub async fn put_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }

    /// Make a DELETE request with auth token
    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }

    // ========================================================================
    // Domain shortcuts
    // ========================================================================

    /// Set a reader's position and return the stored progress
    pub async fn set_progress(
        &self,
        token: &str,
        group_id: Snowflake,
        book_id: Snowflake,
        page: i32,
        total: i32,
    ) -> Result<Value> {
        let body = serde_json::json!({
            "group_id": group_id.to_string(),
            "book_id": book_id.to_string(),
            "current_page": page,
            "total_pages": total,
        });
        let response = self.post_auth("/api/v1/progress", token, &body).await?;
        assert_json(response, StatusCode::CREATED).await
    }

    /// Post a comment and return its ID
    pub async fn post_comment(
        &self,
        token: &str,
        group_id: Snowflake,
        book_id: Snowflake,
        content: &str,
        parent: Option<&str>,
    ) -> Result<String> {
        let body = serde_json::json!({
            "content": content,
            "parent_comment_id": parent,
        });
        let response = self
            .post_auth(&comments_path(group_id, book_id), token, &body)
            .await?;
        let created: Value = assert_json(response, StatusCode::CREATED).await?;
        created["id"]
            .as_str()
            .map(ToString::to_string)
            .ok_or_else(|| anyhow::anyhow!("comment response without id: {created}"))
    }
}

/// Path of a book's comment collection
pub fn comments_path(group_id: Snowflake, book_id: Snowflake) -> String {
    format!("/api/v1/groups/{group_id}/books/{book_id}/comments")
}

/// Path under a book, e.g. `discussion` or `comments/ahead`
pub fn book_path(group_id: Snowflake, book_id: Snowflake, rest: &str) -> String {
    format!("/api/v1/groups/{group_id}/books/{book_id}/{rest}")
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// Assert an error response and return its `error.code`
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: Value = assert_json(response, expected_status).await?;
    body["error"]["code"]
        .as_str()
        .map(ToString::to_string)
        .ok_or_else(|| anyhow::anyhow!("error body without code: {body}"))
}

/// Collect every comment ID in a thread forest, depth first
pub fn thread_ids(threads: &Value) -> Vec<String> {
    let mut ids = Vec::new();
    let mut stack: Vec<&Value> = threads
        .as_array()
        .map(|a| a.iter().rev().collect())
        .unwrap_or_default();
    while let Some(node) = stack.pop() {
        if let Some(id) = node["id"].as_str() {
            ids.push(id.to_string());
        }
        if let Some(replies) = node["replies"].as_array() {
            stack.extend(replies.iter().rev());
        }
    }
    ids
}
