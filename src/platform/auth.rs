use crate::error::{PlaytimeError, Result};
use std::process::Command;

pub const TOKEN_VAR: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// OAuth access token for Google Cloud APIs.
///
/// `GOOGLE_OAUTH_ACCESS_TOKEN` wins when set; otherwise the token is
/// obtained from `gcloud auth print-access-token`.
pub fn access_token() -> Result<String> {
    if let Some(token) = token_from_env(|key| std::env::var(key).ok()) {
        tracing::debug!("using access token from {}", TOKEN_VAR);
        return Ok(token);
    }
    gcloud_token()
}

/// Check if the Google Cloud CLI is installed
pub fn is_gcloud_installed() -> bool {
    which::which("gcloud").is_ok()
}

fn token_from_env<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(TOKEN_VAR)
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

fn gcloud_token() -> Result<String> {
    if !is_gcloud_installed() {
        return Err(PlaytimeError::Auth(format!(
            "gcloud not found. Install the Google Cloud SDK or set {}",
            TOKEN_VAR
        )));
    }

    let output = Command::new("gcloud")
        .args(["auth", "print-access-token"])
        .output()
        .map_err(|e| PlaytimeError::Auth(format!("Failed to run gcloud: {}", e)))?;

    if !output.status.success() {
        return Err(PlaytimeError::Auth(format!(
            "gcloud auth print-access-token failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(PlaytimeError::Auth(
            "gcloud returned an empty access token. Run: gcloud auth login".to_string(),
        ));
    }
    Ok(token)
}
