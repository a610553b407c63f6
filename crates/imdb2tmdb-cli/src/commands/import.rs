use super::auth;
use crate::output::Output;
use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use media_sync_config::{Config, ConfigError};
use media_sync_core::{
    classify_rows, fetch_snapshot, IdResolver, ReconcileSummary, Reconciler, ResolutionCacheStorage,
    DEFAULT_FAVORITE_THRESHOLD,
};
use media_sync_sources::imdb::parse_export_csv;
use media_sync_sources::{IdLookup, TmdbClient};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};

pub struct ImportOptions {
    pub csv: PathBuf,
    /// `--favorite`, wins over the configuration
    pub favorite_threshold: Option<u8>,
    pub config_path: PathBuf,
    pub cache_path: PathBuf,
}

/// `--favorite`, then `[import] favorite_threshold`, then the default
pub fn favorite_threshold(flag: Option<u8>, config: &Config) -> u8 {
    flag.or(config.import.favorite_threshold)
        .unwrap_or(DEFAULT_FAVORITE_THRESHOLD)
}

pub async fn run_import(options: ImportOptions, output: &Output) -> Result<ExitCode> {
    debug!("Import command started");

    let config_path = options.config_path;
    let mut config = Config::load(&config_path)
        .wrap_err_with(|| format!("Failed to load config from {}", config_path.display()))?;
    config.validate()?;

    let api_key = match config.api_key(&config_path) {
        Ok(api_key) => api_key.to_string(),
        Err(e @ ConfigError::MissingApiKey { .. }) => {
            output.error(e.to_string());
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };
    let threshold = favorite_threshold(options.favorite_threshold, &config);

    let rows = parse_export_csv(&options.csv).map_err(|e| eyre!("{:#}", e))?;
    let classification = classify_rows(&rows, threshold);
    for dropped in &classification.dropped {
        output.warn(dropped.to_string());
    }
    info!(
        rows = rows.len(),
        entries = classification.buckets.len(),
        favorite_threshold = threshold,
        "Classified export"
    );

    let mut client = TmdbClient::new(&config.tmdb.api_url, &api_key);
    auth::authenticate(&mut client, &mut config, &config_path, output).await?;

    let snapshot = fetch_snapshot(&client)
        .await
        .wrap_err("Failed to read the TMDB account lists")?;
    info!("Remote account holds {} list entries", snapshot.total());

    let lookup: Arc<dyn IdLookup> = Arc::new(client.clone());
    let mut resolver = IdResolver::with_storage(lookup, ResolutionCacheStorage::new(&options.cache_path))
        .map_err(|e| eyre!("Failed to open resolution cache {}: {:#}", options.cache_path.display(), e))?;

    let outcomes = Reconciler::new(&mut resolver, &snapshot, &client)
        .reconcile_with(&classification.buckets, |outcome| output.outcome(outcome))
        .await;

    let summary = ReconcileSummary::from_outcomes(&outcomes);
    output.summary(&summary, resolver.remote_lookups(), classification.dropped.len());

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use tempfile::tempdir;

    #[test]
    fn test_favorite_threshold_precedence() {
        let mut config = Config::default();
        assert_eq!(favorite_threshold(None, &config), 8);

        config.import.favorite_threshold = Some(6);
        assert_eq!(favorite_threshold(None, &config), 6);
        assert_eq!(favorite_threshold(Some(10), &config), 10);
        assert_eq!(favorite_threshold(Some(0), &config), 0);
    }

    #[tokio::test]
    async fn test_missing_api_key_exits_with_failure() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "[tokens]\nsession = \"abc\"\n").unwrap();

        let options = ImportOptions {
            csv: dir.path().join("ratings.csv"),
            favorite_threshold: None,
            config_path,
            cache_path: dir.path().join("cache.json"),
        };
        let code = run_import(options, &Output::new(OutputFormat::Json, true)).await.unwrap();

        assert_eq!(format!("{:?}", code), format!("{:?}", ExitCode::FAILURE));
        // Nothing was resolved, so no cache file appears
        assert!(!dir.path().join("cache.json").exists());
    }

    #[tokio::test]
    async fn test_invalid_configured_threshold_is_an_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "[keys]\napi = \"k\"\n[import]\nfavorite_threshold = 11\n").unwrap();

        let options = ImportOptions {
            csv: dir.path().join("ratings.csv"),
            favorite_threshold: None,
            config_path,
            cache_path: dir.path().join("cache.json"),
        };

        assert!(run_import(options, &Output::new(OutputFormat::Json, true)).await.is_err());
    }

    #[tokio::test]
    async fn test_unreadable_csv_is_an_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "[keys]\napi = \"k\"\n[tokens]\nsession = \"s\"\n").unwrap();

        let options = ImportOptions {
            csv: dir.path().join("missing.csv"),
            favorite_threshold: None,
            config_path,
            cache_path: dir.path().join("cache.json"),
        };

        let err = run_import(options, &Output::new(OutputFormat::Json, true)).await.unwrap_err();
        assert!(err.to_string().contains("missing.csv"));
    }
}
