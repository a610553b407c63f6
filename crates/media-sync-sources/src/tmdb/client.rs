use crate::error::SourceError;
use crate::tmdb::api::{self, AccountDetails, TmdbApi};
use crate::traits::{AccountListing, AccountWriter, IdLookup};
use anyhow::Result;
use async_trait::async_trait;
use media_sync_models::{AccountPage, CollectionType, FindResults, MediaCategory};
use reqwest::Client;
use std::sync::Arc;
use tracing::info;

/// TMDB v3 client bound to one API key and, once authenticated, one account
#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    api: TmdbApi,
    session_id: Option<String>,
    account: Option<AccountDetails>,
}

impl TmdbClient {
    pub fn new(api_url: &str, api_key: &str) -> Self {
        Self {
            client: Arc::new(api::create_tmdb_client()),
            api: TmdbApi::new(api_url, api_key),
            session_id: None,
            account: None,
        }
    }

    pub fn http(&self) -> &Client {
        &self.client
    }

    pub fn api(&self) -> &TmdbApi {
        &self.api
    }

    /// Attach a session and resolve the account it belongs to
    pub async fn authenticate(&mut self, session_id: &str) -> Result<&AccountDetails> {
        let account = api::get_account(&self.client, &self.api, session_id).await?;
        info!(
            account_id = account.id,
            username = account.username.as_deref().unwrap_or(""),
            "Using TMDB account"
        );
        self.session_id = Some(session_id.to_string());
        Ok(self.account.insert(account))
    }

    pub fn is_authenticated(&self) -> bool {
        self.session_id.is_some() && self.account.is_some()
    }

    fn session(&self) -> Result<(&str, u64), SourceError> {
        match (self.session_id.as_deref(), self.account.as_ref()) {
            (Some(session_id), Some(account)) => Ok((session_id, account.id)),
            _ => Err(SourceError::new("Not authenticated".to_string())),
        }
    }
}

#[async_trait]
impl IdLookup for TmdbClient {
    async fn find_by_external_id(&self, external_id: &str) -> Result<FindResults, SourceError> {
        api::find_by_imdb_id(&self.client, &self.api, external_id)
            .await
            .map_err(SourceError::from)
    }
}

#[async_trait]
impl AccountListing for TmdbClient {
    async fn list_page(
        &self,
        category: MediaCategory,
        collection: CollectionType,
        page: u32,
    ) -> Result<AccountPage, SourceError> {
        let (session_id, account_id) = self.session()?;
        api::get_account_page(&self.client, &self.api, session_id, account_id, category, collection, page)
            .await
            .map_err(SourceError::from)
    }
}

#[async_trait]
impl AccountWriter for TmdbClient {
    async fn mark_favorite(&self, category: MediaCategory, remote_id: u64) -> Result<(), SourceError> {
        let (session_id, account_id) = self.session()?;
        api::mark_favorite(&self.client, &self.api, session_id, account_id, category, remote_id)
            .await
            .map_err(SourceError::from)
    }

    async fn add_to_watchlist(&self, category: MediaCategory, remote_id: u64) -> Result<(), SourceError> {
        let (session_id, account_id) = self.session()?;
        api::add_to_watchlist(&self.client, &self.api, session_id, account_id, category, remote_id)
            .await
            .map_err(SourceError::from)
    }

    async fn rate(&self, category: MediaCategory, remote_id: u64, value: f32) -> Result<(), SourceError> {
        let (session_id, _) = self.session()?;
        api::rate(&self.client, &self.api, session_id, category, remote_id, value)
            .await
            .map_err(SourceError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_account_calls_require_authentication() {
        let client = TmdbClient::new("http://127.0.0.1:9", "key");
        assert!(!client.is_authenticated());

        let err = client
            .list_page(MediaCategory::Movie, CollectionType::Favorite, 1)
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Not authenticated");

        let err = client.mark_favorite(MediaCategory::Movie, 550).await.unwrap_err();
        assert_eq!(err.message(), "Not authenticated");
    }
}
