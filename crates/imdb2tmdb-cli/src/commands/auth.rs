use crate::output::Output;
use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use dialoguer::Confirm;
use media_sync_config::Config;
use media_sync_sources::{AuthState, SourceError, TmdbClient};
use std::io::IsTerminal;
use std::path::Path;

/// HTTP status TMDB answers with for a revoked or unknown session
const UNAUTHORIZED: u16 = 401;

/// Attach a session to `client`, authorizing interactively when the config
/// has none or the stored one is rejected.
pub async fn authenticate(
    client: &mut TmdbClient,
    config: &mut Config,
    config_path: &Path,
    output: &Output,
) -> Result<()> {
    let state = AuthState::from_session(config.session_id());

    if let Some(session_id) = state.session_id() {
        match client.authenticate(session_id).await {
            Ok(_) => return Ok(()),
            Err(e) => {
                let err = SourceError::from(e);
                if err.status() != Some(UNAUTHORIZED) {
                    return Err(eyre!("Failed to read TMDB account details: {}", err));
                }
                output.warn("The stored TMDB session was rejected; authorizing again");
            }
        }
    }

    let session_id = authorize(client, config, output).await?;
    config.set_session_id(session_id.clone());
    config
        .save(config_path)
        .wrap_err_with(|| format!("Failed to save session to {}", config_path.display()))?;
    output.success(format!("Updated config for future use ({})", config_path.display()));

    client
        .authenticate(&session_id)
        .await
        .map_err(|e| eyre!("Failed to read TMDB account details: {:#}", e))?;
    Ok(())
}

/// Walk the request-token flow and return the new session id
async fn authorize(client: &TmdbClient, config: &Config, output: &Output) -> Result<String> {
    if !std::io::stdin().is_terminal() {
        return Err(eyre!(
            "No usable TMDB session in the configuration and no terminal to authorize on. Run once interactively."
        ));
    }

    let state = AuthState::Unauthenticated
        .request_authorization(client.http(), client.api(), &config.tmdb.authenticate_url)
        .await?;
    let authorize_url = state
        .authorize_url()
        .ok_or_else(|| eyre!("Authorization did not produce a URL"))?;

    output.info(format!("Please authorize this app using the url {}", authorize_url));

    let approved = Confirm::new()
        .with_prompt("Have you approved the request in your browser?")
        .default(true)
        .interact()
        .map_err(|e| eyre!("Failed to read confirmation: {}", e))?;
    if !approved {
        return Err(eyre!("Authorization cancelled"));
    }

    let state = state.confirm(client.http(), client.api()).await?;
    state
        .session_id()
        .map(str::to_string)
        .ok_or_else(|| eyre!("Authorization did not produce a session"))
}
