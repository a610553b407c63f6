pub mod api;
pub mod auth;
pub mod client;

pub use api::{create_tmdb_client, AccountDetails, TmdbApi};
pub use auth::{AuthError, AuthState};
pub use client::TmdbClient;
