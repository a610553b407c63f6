use crate::tmdb::api::{self, TmdbApi};
use reqwest::Client;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    #[error("Authorization request failed: {0:#}")]
    Request(#[from] anyhow::Error),
}

/// Session authorization, one explicit state per step of the flow.
///
/// `Unauthenticated -> AwaitingUserConfirmation -> Authenticated`. The caller
/// shows `authorize_url` to the user and calls [`AuthState::confirm`] once the
/// user has approved the request token in a browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    AwaitingUserConfirmation {
        request_token: String,
        authorize_url: String,
    },
    Authenticated {
        session_id: String,
    },
}

impl AuthState {
    /// Start from a persisted session id, if there is one
    pub fn from_session(session_id: Option<&str>) -> Self {
        match session_id {
            Some(session_id) if !session_id.trim().is_empty() => AuthState::Authenticated {
                session_id: session_id.trim().to_string(),
            },
            _ => AuthState::Unauthenticated,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            AuthState::Unauthenticated => "unauthenticated",
            AuthState::AwaitingUserConfirmation { .. } => "awaiting user confirmation",
            AuthState::Authenticated { .. } => "authenticated",
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated { .. })
    }

    pub fn session_id(&self) -> Option<&str> {
        match self {
            AuthState::Authenticated { session_id } => Some(session_id),
            _ => None,
        }
    }

    pub fn authorize_url(&self) -> Option<&str> {
        match self {
            AuthState::AwaitingUserConfirmation { authorize_url, .. } => Some(authorize_url),
            _ => None,
        }
    }

    /// Unauthenticated -> AwaitingUserConfirmation
    pub async fn request_authorization(
        self,
        client: &Client,
        api: &TmdbApi,
        authenticate_url: &str,
    ) -> Result<Self, AuthError> {
        if !matches!(self, AuthState::Unauthenticated) {
            return Err(AuthError::InvalidTransition {
                state: self.name(),
                action: "request authorization",
            });
        }

        let token = api::new_request_token(client, api).await?;
        info!(expires_at = ?token.expires_at_utc(), "Created TMDB request token");
        Ok(Self::awaiting(token.request_token, authenticate_url))
    }

    /// AwaitingUserConfirmation -> Authenticated
    pub async fn confirm(self, client: &Client, api: &TmdbApi) -> Result<Self, AuthError> {
        let request_token = match self {
            AuthState::AwaitingUserConfirmation { request_token, .. } => request_token,
            other => {
                return Err(AuthError::InvalidTransition {
                    state: other.name(),
                    action: "confirm authorization",
                })
            }
        };

        let session_id = api::new_session(client, api, &request_token).await?;
        info!("Authenticated to TMDB");
        Ok(AuthState::Authenticated { session_id })
    }

    fn awaiting(request_token: String, authenticate_url: &str) -> Self {
        let authorize_url = format!("{}/{}", authenticate_url.trim_end_matches('/'), request_token);
        AuthState::AwaitingUserConfirmation {
            request_token,
            authorize_url,
        }
    }
}
