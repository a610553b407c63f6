use anyhow::Result;
use std::path::{Path, PathBuf};

/// Resolution cache file name, shared with earlier releases of the importer
pub const RESOLUTION_CACHE_FILE: &str = "imdb_to_tmdb_media.json";

/// Base directory override from the environment
pub fn env_base_path() -> Option<PathBuf> {
    std::env::var_os("IMDB2TMDB_HOME").map(PathBuf::from)
}

pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("imdb2tmdb");

        Ok(Self::from_base(base_dir))
    }

    pub fn from_base(base: PathBuf) -> Self {
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.data_dir.join("cache")
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn resolution_cache_file(&self) -> PathBuf {
        self.cache_dir().join(RESOLUTION_CACHE_FILE)
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("imdb2tmdb.log")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        std::fs::create_dir_all(self.cache_dir())?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        if let Some(base) = env_base_path() {
            return Self::from_base(base);
        }

        // Platform config dir (e.g. ~/.config/imdb2tmdb on Linux), or the
        // working directory when none can be determined
        Self::new().unwrap_or_else(|_| Self::from_base(PathBuf::from(".")))
    }
}
