//! GitHub release listing: repository names, wire types and the paginated fetcher.

mod client;
mod repo;
mod types;

#[cfg(test)]
pub use client::MockFetchReleases;
pub use client::{DEFAULT_API_URL, FetchReleases, GitHub, PAGE_SIZE};
pub use repo::GitHubRepo;
pub use types::{Author, RawRelease};
