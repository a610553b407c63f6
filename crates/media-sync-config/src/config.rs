use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Highest rating the export and the remote catalog both accept
pub const MAX_RATING: u8 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Please add an 'api' key to the [keys] section of the configuration ({})", path.display())]
    MissingApiKey { path: PathBuf },

    #[error("Failed to read configuration from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write configuration to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("favorite_threshold must be between 0 and 10, got {0}")]
    InvalidThreshold(u8),
}

/// On-disk configuration.
///
/// ```toml
/// [keys]
/// api = "..."
///
/// [tokens]
/// session = "..."
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub keys: KeysConfig,
    #[serde(default)]
    pub tokens: TokensConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct KeysConfig {
    /// TMDB v3 API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TokensConfig {
    /// Session id obtained through the authorization flow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_authenticate_url")]
    pub authenticate_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImportConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite_threshold: Option<u8>,
}

fn default_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_authenticate_url() -> String {
    "https://www.themoviedb.org/authenticate".to_string()
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            authenticate_url: default_authenticate_url(),
        }
    }
}

impl Config {
    /// Load configuration; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, content).map_err(write_err)?;
        Ok(())
    }

    /// The API key, or [`ConfigError::MissingApiKey`] naming `path`
    pub fn api_key(&self, path: &Path) -> Result<&str, ConfigError> {
        self.keys
            .api
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey {
                path: path.to_path_buf(),
            })
    }

    pub fn session_id(&self) -> Option<&str> {
        self.tokens
            .session
            .as_deref()
            .map(str::trim)
            .filter(|session| !session.is_empty())
    }

    pub fn set_session_id(&mut self, session_id: String) {
        self.tokens.session = Some(session_id);
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(threshold) = self.import.favorite_threshold {
            if threshold > MAX_RATING {
                return Err(ConfigError::InvalidThreshold(threshold));
            }
        }
        Ok(())
    }
}
