use serde::{Deserialize, Serialize};

/// The account that published a release
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct Author {
    pub login: String,
}

/// Represents a GitHub release as returned by the releases listing endpoint.
///
/// Only the fields needed for feature derivation are kept; everything else in
/// the payload is ignored.
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone, Default)]
pub struct RawRelease {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub draft: bool,
}

impl RawRelease {
    /// Login of the publishing account, empty when GitHub reports no author
    /// (e.g. the account was deleted).
    pub fn author_login(&self) -> &str {
        self.author.as_ref().map(|a| a.login.as_str()).unwrap_or("")
    }
}
