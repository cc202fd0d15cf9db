use anyhow::Result;
use log::debug;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use std::path::PathBuf;

use crate::github::{FetchReleases, GitHub};
use crate::runtime::Runtime;

pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

pub fn user_agent() -> String {
    format!("release-stats/{}", env!("RELEASE_STATS_VERSION"))
}

/// Dependencies of the batch run.
pub struct FetchConfig<G: FetchReleases> {
    pub github: G,
}

impl FetchConfig<GitHub> {
    /// Build the GitHub client. `GITHUB_TOKEN`, when set, is sent as a bearer
    /// token on every request.
    pub fn new<R: Runtime>(runtime: &R, api_url: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Ok(token) = runtime.env_var(TOKEN_ENV) {
            let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))?;
            auth_value.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth_value);
            debug!(
                "Using {} for authentication: {}",
                TOKEN_ENV,
                mask_token(&token)
            );
        }

        let client = Client::builder()
            .user_agent(user_agent())
            .default_headers(headers)
            .build()?;

        let github = GitHub::new(client, api_url);

        Ok(Self { github })
    }
}

/// First 8 and last 4 characters of a token; fully masked when shorter
/// than 16.
fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() < 16 {
        return "*********".to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}

/// Settings of the `serve` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub cors_origin: String,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
