use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;

use super::repo::GitHubRepo;
use super::types::RawRelease;

/// Number of releases requested per page.
pub const PAGE_SIZE: usize = 100;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FetchReleases: Send + Sync {
    /// Fetch every release of `repo`. Never fails: on error the releases
    /// collected so far are returned.
    async fn fetch_releases(&self, repo: &GitHubRepo) -> Vec<RawRelease>;
}

pub struct GitHub {
    pub client: Client,
    pub api_url: String,
}

impl GitHub {
    #[tracing::instrument(skip(client, api_url))]
    pub fn new(client: Client, api_url: Option<String>) -> Self {
        let api_url = api_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self { client, api_url }
    }
}

#[async_trait]
impl FetchReleases for GitHub {
    #[tracing::instrument(skip(self, repo))]
    async fn fetch_releases(&self, repo: &GitHubRepo) -> Vec<RawRelease> {
        GitHub::fetch_all_releases(repo, &self.client, &self.api_url).await
    }
}

impl GitHub {
    /// Fetch a single page of releases.
    #[tracing::instrument(skip(client, api_url))]
    pub async fn fetch_page(
        repo: &GitHubRepo,
        client: &Client,
        api_url: &str,
        page: usize,
    ) -> Result<Vec<RawRelease>> {
        let url = format!("{}{}", api_url, repo.releases_path());

        debug!("Fetching releases page {} from {}...", page, url);

        let response = client
            .get(&url)
            .query(&[
                ("per_page", PAGE_SIZE.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await
            .context("Failed to send request to GitHub API")?;

        let parsed: Vec<RawRelease> = response
            .error_for_status()?
            .json()
            .await
            .context("Failed to parse JSON response from GitHub API")?;

        Ok(parsed)
    }

    /// Walk the pages until one comes back empty.
    ///
    /// The first failing page ends the walk; whatever was accumulated before
    /// it is returned.
    #[tracing::instrument(skip(client, api_url))]
    pub async fn fetch_all_releases(
        repo: &GitHubRepo,
        client: &Client,
        api_url: &str,
    ) -> Vec<RawRelease> {
        info!("Fetching releases for {}...", repo);

        let mut releases = Vec::new();
        let mut page = 1;

        loop {
            match GitHub::fetch_page(repo, client, api_url, page).await {
                Ok(parsed) if parsed.is_empty() => break,
                Ok(parsed) => {
                    releases.extend(parsed);
                    page += 1;
                }
                Err(e) => {
                    warn!(
                        "Error fetching releases for {} (page {}): {:#}. Keeping {} release(s) fetched so far.",
                        repo,
                        page,
                        e,
                        releases.len()
                    );
                    break;
                }
            }
        }

        releases
    }
}
