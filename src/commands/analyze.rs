use anyhow::Result;
use log::info;
use std::path::{Path, PathBuf};

use crate::{
    analysis::{CalendarZone, DerivedRelease, derive_releases, generate_stats},
    config::FetchConfig,
    github::{FetchReleases, GitHubRepo},
    output::{
        DETAILS_FILE, LEGACY_DETAILS_FILE, LegacyReleaseRow, STATISTICS_FILE,
        WEEKDAY_DETAILS_FILE, WeekdayReleaseRow, write_records,
    },
    runtime::Runtime,
};

/// Outcome of one batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSummary {
    pub total: usize,
    pub weekday: usize,
    pub files: Vec<PathBuf>,
}

impl AnalysisSummary {
    /// Weekday share in percent, 0.0 for an empty run.
    pub fn weekday_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.weekday as f64 / self.total as f64 * 100.0
    }
}

/// Fetch, derive and write the release CSVs for `repos`.
#[tracing::instrument(skip(runtime, api_url))]
pub async fn analyze<R: Runtime>(
    runtime: R,
    repos: &[GitHubRepo],
    output_dir: &Path,
    api_url: Option<String>,
    zone: CalendarZone,
) -> Result<AnalysisSummary> {
    let config = FetchConfig::new(&runtime, api_url)?;
    let summary = run(&runtime, &config.github, repos, output_dir, zone).await?;

    info!("Analysis complete, output written to {}", output_dir.display());
    info!("Analyzed {} release(s)", summary.total);
    info!("Weekday release ratio: {:.1}%", summary.weekday_ratio());

    Ok(summary)
}

#[tracing::instrument(skip(runtime, fetcher))]
pub async fn run<R: Runtime, F: FetchReleases>(
    runtime: &R,
    fetcher: &F,
    repos: &[GitHubRepo],
    output_dir: &Path,
    zone: CalendarZone,
) -> Result<AnalysisSummary> {
    info!("Starting release analysis for {} repositories...", repos.len());

    let mut releases: Vec<DerivedRelease> = Vec::new();
    for repo in repos {
        let raw = fetcher.fetch_releases(repo).await;
        info!("{}: {} release(s) found", repo, raw.len());
        releases.extend(derive_releases(&raw, &repo.to_string(), zone));
    }

    let weekday: Vec<&DerivedRelease> = releases.iter().filter(|r| !r.is_weekend).collect();
    info!(
        "Total releases: {}, weekday releases: {}",
        releases.len(),
        weekday.len()
    );

    let legacy: Vec<LegacyReleaseRow> = releases.iter().map(LegacyReleaseRow::from).collect();
    let weekday_rows: Vec<WeekdayReleaseRow> =
        weekday.iter().map(|r| WeekdayReleaseRow::from(*r)).collect();
    let stats = generate_stats(&releases);

    let files = vec![
        write_records(runtime, output_dir, DETAILS_FILE, &releases)?,
        write_records(runtime, output_dir, LEGACY_DETAILS_FILE, &legacy)?,
        write_records(runtime, output_dir, WEEKDAY_DETAILS_FILE, &weekday_rows)?,
        write_records(runtime, output_dir, STATISTICS_FILE, &stats)?,
    ];

    Ok(AnalysisSummary {
        total: releases.len(),
        weekday: weekday.len(),
        files,
    })
}
