//! Access token resolution.
//!
//! A token is taken from `KUSTO_ACCESS_TOKEN` when set, otherwise it is
//! requested from the Azure CLI for the cluster resource. Tokens live in
//! [`Zeroizing`] containers and are never logged.

use crate::error::{ExportError, MalformedResponse};
use crate::Result;
use serde::Deserialize;
use zeroize::Zeroizing;

/// Environment variable holding a pre-acquired bearer token.
pub const ACCESS_TOKEN_ENV: &str = "KUSTO_ACCESS_TOKEN";

#[cfg(windows)]
const AZ_PROGRAM: &str = "az.cmd";
#[cfg(not(windows))]
const AZ_PROGRAM: &str = "az";

/// Bearer token that is zeroed on drop.
#[derive(Clone)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Wraps a token obtained elsewhere.
    pub fn new(token: impl Into<String>) -> Self {
        Self(Zeroizing::new(token.into()))
    }

    /// Raw token text, for the `Authorization` header only.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Where the access token for a cluster comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Token supplied through [`ACCESS_TOKEN_ENV`]
    Environment,
    /// `az account get-access-token --resource <cluster>`
    AzureCli { resource: String },
}

#[derive(Deserialize)]
struct AzTokenResponse {
    #[serde(rename = "accessToken")]
    access_token: String,
}

impl CredentialSource {
    /// Picks the source for `cluster_url` based on the environment.
    pub fn detect(cluster_url: &str) -> Self {
        if token_from_env().is_some() {
            Self::Environment
        } else {
            Self::AzureCli {
                resource: cluster_url.to_string(),
            }
        }
    }

    /// Human-readable description for log lines.
    pub fn describe(&self) -> String {
        match self {
            Self::Environment => format!("{} environment variable", ACCESS_TOKEN_ENV),
            Self::AzureCli { .. } => "Azure CLI".to_string(),
        }
    }

    /// Acquires a token from this source.
    ///
    /// # Errors
    /// Returns [`ExportError::Authentication`] if the variable disappeared,
    /// the CLI could not be run, exited unsuccessfully or printed output
    /// without an `accessToken`.
    pub async fn resolve(&self) -> Result<AccessToken> {
        match self {
            Self::Environment => token_from_env().ok_or_else(|| {
                ExportError::authentication_failed(
                    "reading access token from environment",
                    MalformedResponse(format!("{} is not set", ACCESS_TOKEN_ENV)),
                )
            }),
            Self::AzureCli { resource } => token_from_azure_cli(resource).await,
        }
    }
}

/// Reads a non-empty token from [`ACCESS_TOKEN_ENV`].
pub fn token_from_env() -> Option<AccessToken> {
    std::env::var(ACCESS_TOKEN_ENV)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(AccessToken::new)
}

async fn token_from_azure_cli(resource: &str) -> Result<AccessToken> {
    let output = tokio::process::Command::new(AZ_PROGRAM)
        .args([
            "account",
            "get-access-token",
            "--resource",
            resource,
            "--output",
            "json",
        ])
        .output()
        .await
        .map_err(|e| ExportError::authentication_failed("running the Azure CLI", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ExportError::authentication_failed(
            "Azure CLI could not provide a token (run `az login`)",
            MalformedResponse(stderr.trim().to_string()),
        ));
    }

    parse_az_token(&output.stdout)
}

/// Extracts the token from `az account get-access-token` JSON output.
///
/// # Errors
/// Returns [`ExportError::Authentication`] if the output is not the
/// expected JSON document or the token is empty.
pub fn parse_az_token(stdout: &[u8]) -> Result<AccessToken> {
    let response: AzTokenResponse = serde_json::from_slice(stdout)
        .map_err(|e| ExportError::authentication_failed("parsing Azure CLI token output", e))?;
    let token = AccessToken::new(response.access_token);

    if token.secret().trim().is_empty() {
        return Err(ExportError::authentication_failed(
            "parsing Azure CLI token output",
            MalformedResponse("accessToken is empty".to_string()),
        ));
    }

    Ok(token)
}
