use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::analysis::DerivedRelease;

/// Summary served to the dashboard, computed once per load.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_releases: usize,
    pub weekday_releases: usize,
    pub prereleases: usize,
    pub hotfixes: usize,
    pub by_repository: BTreeMap<String, usize>,
    pub by_time_slot: BTreeMap<String, usize>,
    /// Keyed by month name
    pub by_month: BTreeMap<String, usize>,
    pub by_release_type: BTreeMap<String, usize>,
}

impl DashboardStats {
    pub fn from_releases(releases: &[DerivedRelease]) -> Self {
        let mut stats = DashboardStats {
            total_releases: releases.len(),
            ..Default::default()
        };

        for r in releases {
            if !r.is_weekend {
                stats.weekday_releases += 1;
            }
            if r.is_prerelease {
                stats.prereleases += 1;
            }
            if r.is_hotfix {
                stats.hotfixes += 1;
            }
            *stats.by_repository.entry(r.repository.clone()).or_default() += 1;
            *stats
                .by_time_slot
                .entry(r.time_slot.as_str().to_string())
                .or_default() += 1;
            *stats.by_month.entry(r.month_name.clone()).or_default() += 1;
            *stats
                .by_release_type
                .entry(r.release_type.as_str().to_string())
                .or_default() += 1;
        }

        stats
    }
}
