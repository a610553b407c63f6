pub mod traits;
pub mod imdb;
pub mod tmdb;
pub mod error;

pub use traits::{AccountListing, AccountWriter, IdLookup};
pub use error::SourceError;
pub use tmdb::{AuthError, AuthState, TmdbClient};
