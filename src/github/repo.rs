use anyhow::{Result, anyhow};
use std::str::FromStr;

/// A GitHub repository in `owner/repo` form.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct GitHubRepo {
    pub owner: String,
    pub repo: String,
}

impl GitHubRepo {
    /// The repositories analyzed when none are given on the command line.
    pub fn defaults() -> Vec<GitHubRepo> {
        vec![
            GitHubRepo {
                owner: "daangn".to_string(),
                repo: "stackflow".to_string(),
            },
            GitHubRepo {
                owner: "daangn".to_string(),
                repo: "seed-design".to_string(),
            },
        ]
    }

    /// Path segment used by the releases endpoint.
    pub fn releases_path(&self) -> String {
        format!("/repos/{}/{}/releases", self.owner, self.repo)
    }
}

impl std::fmt::Display for GitHubRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for GitHubRepo {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('/').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            Err(anyhow!(
                "Invalid repository format '{}'. Expected 'owner/repo'.",
                s
            ))
        } else {
            Ok(GitHubRepo {
                owner: parts[0].to_string(),
                repo: parts[1].to_string(),
            })
        }
    }
}
