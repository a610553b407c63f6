use anyhow::{Context, Result};
use media_sync_models::RemoteMedia;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use crate::id_cache::ResolutionCache;

/// JSON file backing for [`ResolutionCache`].
///
/// The file is a single object mapping external id to the remote item (or
/// `null` for "not found"). It is read whole and written whole; there is no
/// locking, so concurrent runs sharing a file may lose entries.
pub struct ResolutionCacheStorage {
    cache_path: PathBuf,
}

impl ResolutionCacheStorage {
    pub fn new(cache_path: impl Into<PathBuf>) -> Self {
        Self {
            cache_path: cache_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.cache_path
    }

    /// Load cache from disk
    pub fn load(&self) -> Result<ResolutionCache> {
        if !self.cache_path.exists() {
            debug!("Resolution cache {:?} does not exist, starting empty", self.cache_path);
            return Ok(ResolutionCache::new());
        }

        let data = std::fs::read(&self.cache_path)
            .with_context(|| format!("Failed to read resolution cache {}", self.cache_path.display()))?;

        let entries: BTreeMap<String, Option<RemoteMedia>> = match serde_json::from_slice(&data) {
            Ok(entries) => entries,
            Err(e) => {
                // Unreadable cache: keep a copy for inspection and start fresh
                let backup_path = self.cache_path.with_extension("json.bak");
                if let Err(backup_err) = std::fs::copy(&self.cache_path, &backup_path) {
                    warn!(
                        "Failed to backup unreadable resolution cache: {}. Starting with empty cache.",
                        backup_err
                    );
                } else {
                    warn!(
                        "Resolution cache is not valid JSON ({}). Backed up to {:?} and starting with empty cache.",
                        e, backup_path
                    );
                }
                return Ok(ResolutionCache::new());
            }
        };

        let cache = ResolutionCache::from_entries(entries);
        info!(
            "Loaded resolution cache: {} entries ({} not found) from {:?}",
            cache.len(),
            cache.not_found_count(),
            self.cache_path
        );
        Ok(cache)
    }

    /// Write the whole cache to disk
    pub fn save(&self, cache: &ResolutionCache) -> Result<()> {
        if let Some(parent) = self.cache_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let serialized = serde_json::to_vec_pretty(cache.entries())?;

        // Write to a temp file, then rename over the old cache
        let temp_path = self.cache_path.with_extension("json.tmp");
        std::fs::write(&temp_path, serialized)?;
        std::fs::rename(&temp_path, &self.cache_path)?;

        debug!("Saved resolution cache: {} entries", cache.len());
        Ok(())
    }

    pub fn cache_exists(&self) -> bool {
        self.cache_path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let storage = ResolutionCacheStorage::new(dir.path().join("cache.json"));

        assert!(!storage.cache_exists());
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let storage = ResolutionCacheStorage::new(dir.path().join("nested").join("cache.json"));

        let mut cache = ResolutionCache::new();
        let mut media = RemoteMedia::new(550);
        media.title = Some("Fight Club".to_string());
        cache.insert_found("tt0137523", media);
        cache.insert_not_found("tt9999999");
        storage.save(&cache).unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.entries(), cache.entries());
        assert!(!loaded.is_dirty());
    }

    #[test]
    fn test_file_format_is_plain_json_object() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let storage = ResolutionCacheStorage::new(&path);

        let mut cache = ResolutionCache::new();
        cache.insert_found("tt001", RemoteMedia::new(7));
        cache.insert_not_found("tt002");
        storage.save(&cache).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(json["tt001"]["id"], 7);
        assert!(json["tt002"].is_null());
    }

    #[test]
    fn test_reads_cache_written_with_full_remote_objects() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(
            &path,
            r#"{"tt0944947": {"id": 1399, "name": "Game of Thrones", "original_language": "en", "popularity": 369.59}}"#,
        )
        .unwrap();

        let cache = ResolutionCacheStorage::new(&path).load().unwrap();
        let media = cache.get("tt0944947").flatten().unwrap();
        assert_eq!(media.id, 1399);
        assert_eq!(media.display_title(), Some("Game of Thrones"));
        assert_eq!(media.extra["original_language"], "en");
    }

    #[test]
    fn test_corrupt_cache_is_backed_up() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{not json").unwrap();

        let cache = ResolutionCacheStorage::new(&path).load().unwrap();
        assert!(cache.is_empty());
        assert!(dir.path().join("cache.json.bak").exists());
    }
}
