use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use media_sync_models::{AccountPage, CollectionType, FindResults, MediaCategory};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::error::SourceError;

/// Base URL plus API key; every request carries the key as a query parameter
#[derive(Debug, Clone)]
pub struct TmdbApi {
    base_url: String,
    api_key: String,
}

impl TmdbApi {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

pub fn create_tmdb_client() -> Client {
    Client::builder()
        .user_agent(concat!("imdb2tmdb/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountDetails {
    pub id: u64,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestToken {
    pub request_token: String,
    /// e.g. "2016-08-26 17:04:39 UTC"
    #[serde(default)]
    pub expires_at: Option<String>,
}

impl RequestToken {
    /// Expiry as a timestamp; `None` when absent or not in the remote's format
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.expires_at.as_deref()?;
        NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M:%S UTC")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    session_id: String,
}

/// Body of write responses and of most error responses
#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    status_code: Option<i64>,
    #[serde(default)]
    status_message: Option<String>,
}

/// Turn a non-2xx response into an error carrying the remote status message
async fn ensure_success(response: Response, what: &str) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let error_text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<StatusResponse>(&error_text)
        .ok()
        .and_then(|body| body.status_message)
        .unwrap_or(error_text);
    Err(SourceError::with_status(format!("Failed to {}: {} - {}", what, status, message), status.as_u16()).into())
}

/// Check a write response: 2xx and no explicit `"success": false`
async fn ensure_write_succeeded(response: Response, what: &str) -> Result<()> {
    let response = ensure_success(response, what).await?;
    let body: StatusResponse = response
        .json()
        .await
        .with_context(|| format!("Failed to decode response to {}", what))?;

    if body.success == Some(false) {
        return Err(anyhow!(
            "Failed to {}: status {} - {}",
            what,
            body.status_code.unwrap_or_default(),
            body.status_message.unwrap_or_default()
        ));
    }
    debug!(status_code = ?body.status_code, "{} succeeded", what);
    Ok(())
}

/// Look up remote items by IMDb id
pub async fn find_by_imdb_id(client: &Client, api: &TmdbApi, imdb_id: &str) -> Result<FindResults> {
    let response = client
        .get(api.url(&format!("find/{}", imdb_id)))
        .query(&[("api_key", api.api_key.as_str()), ("external_source", "imdb_id")])
        .header("Accept", "application/json")
        .send()
        .await?;

    let response = ensure_success(response, &format!("look up {}", imdb_id)).await?;
    Ok(response.json().await?)
}

/// Account owning the session
pub async fn get_account(client: &Client, api: &TmdbApi, session_id: &str) -> Result<AccountDetails> {
    let response = client
        .get(api.url("account"))
        .query(&[("api_key", api.api_key.as_str()), ("session_id", session_id)])
        .header("Accept", "application/json")
        .send()
        .await?;

    let response = ensure_success(response, "get account details").await?;
    Ok(response.json().await?)
}

/// Fetch one page of an account collection
pub async fn get_account_page(
    client: &Client,
    api: &TmdbApi,
    session_id: &str,
    account_id: u64,
    category: MediaCategory,
    collection: CollectionType,
    page: u32,
) -> Result<AccountPage> {
    let path = format!(
        "account/{}/{}/{}",
        account_id,
        collection.as_str(),
        category.listing_name()
    );
    let page_str = page.to_string();

    let response = client
        .get(api.url(&path))
        .query(&[
            ("api_key", api.api_key.as_str()),
            ("session_id", session_id),
            ("page", page_str.as_str()),
        ])
        .header("Accept", "application/json")
        .send()
        .await?;

    let what = format!("fetch {} {} page {}", collection, category.listing_name(), page);
    let response = ensure_success(response, &what).await?;
    Ok(response.json().await?)
}

/// Set the favorite flag on an item
pub async fn mark_favorite(
    client: &Client,
    api: &TmdbApi,
    session_id: &str,
    account_id: u64,
    category: MediaCategory,
    media_id: u64,
) -> Result<()> {
    let payload = serde_json::json!({
        "media_type": category.api_name(),
        "media_id": media_id,
        "favorite": true,
    });

    let response = client
        .post(api.url(&format!("account/{}/favorite", account_id)))
        .query(&[("api_key", api.api_key.as_str()), ("session_id", session_id)])
        .json(&payload)
        .send()
        .await?;

    ensure_write_succeeded(response, &format!("add {} {} to favorites", category, media_id)).await
}

/// Set the watchlist flag on an item
pub async fn add_to_watchlist(
    client: &Client,
    api: &TmdbApi,
    session_id: &str,
    account_id: u64,
    category: MediaCategory,
    media_id: u64,
) -> Result<()> {
    let payload = serde_json::json!({
        "media_type": category.api_name(),
        "media_id": media_id,
        "watchlist": true,
    });

    let response = client
        .post(api.url(&format!("account/{}/watchlist", account_id)))
        .query(&[("api_key", api.api_key.as_str()), ("session_id", session_id)])
        .json(&payload)
        .send()
        .await?;

    ensure_write_succeeded(response, &format!("add {} {} to watchlist", category, media_id)).await
}

/// Rate an item (0.5 - 10.0)
pub async fn rate(
    client: &Client,
    api: &TmdbApi,
    session_id: &str,
    category: MediaCategory,
    media_id: u64,
    value: f32,
) -> Result<()> {
    let payload = serde_json::json!({ "value": value });

    let response = client
        .post(api.url(&format!("{}/{}/rating", category.api_name(), media_id)))
        .query(&[("api_key", api.api_key.as_str()), ("session_id", session_id)])
        .json(&payload)
        .send()
        .await?;

    ensure_write_succeeded(response, &format!("rate {} {} with {}", category, media_id, value)).await
}

/// First step of the authorization flow
pub async fn new_request_token(client: &Client, api: &TmdbApi) -> Result<RequestToken> {
    let response = client
        .get(api.url("authentication/token/new"))
        .query(&[("api_key", api.api_key.as_str())])
        .header("Accept", "application/json")
        .send()
        .await?;

    let response = ensure_success(response, "create request token").await?;
    Ok(response.json().await?)
}

/// Exchange a user-approved request token for a session id
pub async fn new_session(client: &Client, api: &TmdbApi, request_token: &str) -> Result<String> {
    let payload = serde_json::json!({ "request_token": request_token });

    let response = client
        .post(api.url("authentication/session/new"))
        .query(&[("api_key", api.api_key.as_str())])
        .json(&payload)
        .send()
        .await?;

    let response = ensure_success(response, "create session").await?;
    let session: SessionResponse = response.json().await?;
    Ok(session.session_id)
}
