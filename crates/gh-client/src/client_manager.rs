//! GitHub client construction
//!
//! Resolves a token for the target host and builds an `OctocrabClient`
//! pointed at either github.com or a GitHub Enterprise instance.

use crate::{OctocrabClient, DEFAULT_HOST};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use octocrab::Octocrab;
use std::sync::Arc;

/// Resolves GitHub tokens for different hosts
///
/// Tries multiple sources in order:
/// 1. A token passed explicitly (the `githubToken` action input)
/// 2. Host-specific env var (e.g., `GITHUB_TOKEN_GHE_EXAMPLE_COM`)
/// 3. Generic `GITHUB_TOKEN` or `GH_TOKEN` (github.com only)
/// 4. `gh auth token --hostname {host}` command
#[derive(Debug, Clone, Default)]
pub struct TokenResolver {
    explicit_token: Option<String>,
}

impl TokenResolver {
    /// Create a resolver, preferring `explicit_token` when it is non-empty
    pub fn new(explicit_token: Option<String>) -> Self {
        Self {
            explicit_token: explicit_token.filter(|t| !t.trim().is_empty()),
        }
    }

    /// Get a token for the given host, or None if nothing is configured
    pub async fn get_token(&self, host: Option<&str>) -> Option<String> {
        let host = host.unwrap_or(DEFAULT_HOST);

        if let Some(ref token) = self.explicit_token {
            debug!("Using explicitly configured token for host {}", host);
            return Some(token.clone());
        }

        let env_key = host_env_key(host);
        if let Ok(token) = std::env::var(&env_key) {
            debug!("Using token from env var {} for host {}", env_key, host);
            return Some(token);
        }

        if host == DEFAULT_HOST {
            if let Ok(token) = std::env::var("GITHUB_TOKEN").or_else(|_| std::env::var("GH_TOKEN"))
            {
                debug!("Using default token (GITHUB_TOKEN/GH_TOKEN) for github.com");
                return Some(token);
            }
        }

        debug!("Trying gh auth token for host {}", host);
        let output = tokio::process::Command::new("gh")
            .args(["auth", "token", "--hostname", host])
            .output()
            .await
            .ok()?;

        if !output.status.success() {
            return None;
        }

        let token = String::from_utf8(output.stdout).ok()?.trim().to_string();
        if token.is_empty() {
            None
        } else {
            debug!("Using token from gh CLI for host {}", host);
            Some(token)
        }
    }
}

/// Env var consulted for a host-specific token
fn host_env_key(host: &str) -> String {
    format!(
        "GITHUB_TOKEN_{}",
        host.replace(['.', '-'], "_").to_uppercase()
    )
}

/// Build a client for the given host (None = github.com)
///
/// Without any token the client is unauthenticated, which still works for
/// reading public repositories but will fail on writes.
pub async fn build_client(tokens: &TokenResolver, host: Option<&str>) -> Result<OctocrabClient> {
    let effective_host = host.unwrap_or(DEFAULT_HOST);
    info!("Creating GitHub client for host: {}", effective_host);

    let mut builder = Octocrab::builder();

    match tokens.get_token(host).await {
        Some(token) => builder = builder.personal_token(token),
        None => warn!(
            "No GitHub token found for {}, continuing unauthenticated",
            effective_host
        ),
    }

    if effective_host != DEFAULT_HOST {
        let uri = format!("https://{}/api/v3", effective_host);
        builder = builder.base_uri(uri).context("Failed to set base URI")?;
    }

    let octocrab = builder.build().context("Failed to build Octocrab client")?;
    Ok(OctocrabClient::new(Arc::new(octocrab)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_resolver_env_key_generation() {
        let hosts = [
            ("github.com", "GITHUB_TOKEN_GITHUB_COM"),
            ("ghe.example.com", "GITHUB_TOKEN_GHE_EXAMPLE_COM"),
            (
                "github-enterprise.corp.com",
                "GITHUB_TOKEN_GITHUB_ENTERPRISE_CORP_COM",
            ),
        ];

        for (host, expected_key) in hosts {
            assert_eq!(
                host_env_key(host),
                expected_key,
                "Host '{}' should produce key '{}'",
                host,
                expected_key
            );
        }
    }

    #[tokio::test]
    async fn test_explicit_token_wins() {
        let resolver = TokenResolver::new(Some("ghp_explicit".to_string()));
        assert_eq!(
            resolver.get_token(Some("ghe.example.com")).await.as_deref(),
            Some("ghp_explicit")
        );
    }

    #[test]
    fn test_blank_explicit_token_is_ignored() {
        let resolver = TokenResolver::new(Some("   ".to_string()));
        assert!(resolver.explicit_token.is_none());
    }
}
