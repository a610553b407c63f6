pub mod config;
pub mod paths;

pub use config::{Config, ConfigError, ImportConfig, KeysConfig, TmdbConfig, TokensConfig, MAX_RATING};
pub use paths::{env_base_path, PathManager, RESOLUTION_CACHE_FILE};
