use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use super::{Column, CsvRecord};
use crate::analysis::{DerivedRelease, MetricRow};

impl CsvRecord for DerivedRelease {
    const COLUMNS: &'static [Column] = &[
        Column::new("repository", "Repository"),
        Column::new("tag_name", "Tag Name"),
        Column::new("release_name", "Release Name"),
        Column::new("published_at", "Published At (ISO)"),
        Column::new("published_date", "Published Date"),
        Column::new("published_time", "Published Time"),
        Column::new("author", "Author"),
        Column::new("is_prerelease", "Is Prerelease"),
        Column::new("year", "Year"),
        Column::new("month", "Month"),
        Column::new("quarter", "Quarter"),
        Column::new("month_name", "Month Name"),
        Column::new("week_number", "Week Number"),
        Column::new("day_of_week", "Day of Week (0=Sun)"),
        Column::new("day_name", "Day Name"),
        Column::new("hour", "Hour (0-23)"),
        Column::new("time_slot", "Time Slot"),
        Column::new("is_weekend", "Is Weekend"),
        Column::new("season_quarter", "Season Quarter"),
        Column::new("version_type", "Version Type"),
        Column::new("release_type", "Release Type"),
        Column::new("is_major_version", "Is Major Version"),
        Column::new("is_patch_version", "Is Patch Version"),
        Column::new("is_hotfix", "Is Hotfix"),
        Column::new("days_since_epoch", "Days Since Epoch"),
    ];
}

impl CsvRecord for MetricRow {
    const COLUMNS: &'static [Column] = &[
        Column::new("metric", "Metric"),
        Column::new("value", "Value"),
        Column::new("group", "Repository/Author"),
        Column::new("period", "Period"),
    ];
}

fn iso_millis(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Row of `release_details.csv`, the reduced column set kept for older
/// consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyReleaseRow {
    pub repository: String,
    pub tag_name: String,
    pub release_name: String,
    pub published_at: String,
    pub author: String,
    pub is_prerelease: bool,
    pub year: i32,
    pub month: u32,
    pub week_number: u32,
    pub day_of_week: u32,
    pub is_weekend: bool,
}

impl From<&DerivedRelease> for LegacyReleaseRow {
    fn from(r: &DerivedRelease) -> Self {
        Self {
            repository: r.repository.clone(),
            tag_name: r.tag_name.clone(),
            release_name: r.release_name.clone(),
            published_at: iso_millis(&r.published_at),
            author: r.author.clone(),
            is_prerelease: r.is_prerelease,
            year: r.year,
            month: r.month,
            week_number: r.week_number,
            day_of_week: r.day_of_week,
            is_weekend: r.is_weekend,
        }
    }
}

impl CsvRecord for LegacyReleaseRow {
    const COLUMNS: &'static [Column] = &[
        Column::new("repository", "Repository"),
        Column::new("tag_name", "Tag Name"),
        Column::new("release_name", "Release Name"),
        Column::new("published_at", "Published At"),
        Column::new("author", "Author"),
        Column::new("is_prerelease", "Is Prerelease"),
        Column::new("year", "Year"),
        Column::new("month", "Month"),
        Column::new("week_number", "Week Number"),
        Column::new("day_of_week", "Day of Week"),
        Column::new("is_weekend", "Is Weekend"),
    ];
}

/// Row of `weekday_release_details.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayReleaseRow {
    pub repository: String,
    pub tag_name: String,
    pub release_name: String,
    pub published_at: String,
    pub author: String,
    pub is_prerelease: bool,
    pub year: i32,
    pub month: u32,
    pub week_number: u32,
    pub day_of_week: u32,
}

impl From<&DerivedRelease> for WeekdayReleaseRow {
    fn from(r: &DerivedRelease) -> Self {
        Self {
            repository: r.repository.clone(),
            tag_name: r.tag_name.clone(),
            release_name: r.release_name.clone(),
            published_at: iso_millis(&r.published_at),
            author: r.author.clone(),
            is_prerelease: r.is_prerelease,
            year: r.year,
            month: r.month,
            week_number: r.week_number,
            day_of_week: r.day_of_week,
        }
    }
}

impl CsvRecord for WeekdayReleaseRow {
    const COLUMNS: &'static [Column] = &[
        Column::new("repository", "Repository"),
        Column::new("tag_name", "Tag Name"),
        Column::new("release_name", "Release Name"),
        Column::new("published_at", "Published At"),
        Column::new("author", "Author"),
        Column::new("is_prerelease", "Is Prerelease"),
        Column::new("year", "Year"),
        Column::new("month", "Month"),
        Column::new("week_number", "Week Number"),
        Column::new("day_of_week", "Day of Week"),
    ];
}
