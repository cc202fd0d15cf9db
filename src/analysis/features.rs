//! Feature derivation: one raw GitHub release in, one [`DerivedRelease`] out.
//!
//! Everything here is pure. Calendar fields are read in a [`CalendarZone`]
//! (the host's local zone unless told otherwise); the published date/time
//! columns and the epoch day count always come from the UTC instant.

use chrono::{DateTime, Datelike, Month, TimeZone, Timelike, Utc};
use log::warn;
use regex::Regex;
use std::sync::LazyLock;

use super::release::{
    DAY_NAMES, DerivedRelease, ReleaseType, SeasonQuarter, TimeSlot, VersionType,
};
use crate::github::RawRelease;

// ASCII digits only.
static SEMANTIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"v?([0-9]+)\.([0-9]+)\.([0-9]+)").expect("valid regex"));
static MAJOR_MINOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"v?[0-9]+\.[0-9]+").expect("valid regex"));
static MAJOR_ONLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"v?[0-9]+").expect("valid regex"));
static HOTFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)hotfix|fix|patch").expect("valid regex"));

const MILLIS_PER_DAY: i64 = 1000 * 60 * 60 * 24;

/// Time zone whose calendar the derived fields are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CalendarZone {
    /// The zone configured on the host running the analysis
    #[default]
    Local,
    Utc,
}

pub fn time_slot(hour: u32) -> TimeSlot {
    match hour {
        h if h < 6 => TimeSlot::EarlyMorning,
        h if h < 9 => TimeSlot::Morning,
        h if h < 12 => TimeSlot::WorkMorning,
        h if h < 14 => TimeSlot::LunchTime,
        h if h < 18 => TimeSlot::WorkAfternoon,
        h if h < 21 => TimeSlot::Evening,
        _ => TimeSlot::Night,
    }
}

/// Sunday = 0, Saturday = 6.
pub fn is_weekend(day_of_week: u32) -> bool {
    day_of_week == 0 || day_of_week == 6
}

pub fn version_type(tag: &str) -> VersionType {
    if SEMANTIC_RE.is_match(tag) {
        VersionType::Semantic
    } else if MAJOR_MINOR_RE.is_match(tag) {
        VersionType::MajorMinor
    } else if MAJOR_ONLY_RE.is_match(tag) {
        VersionType::MajorOnly
    } else {
        VersionType::Custom
    }
}

pub fn release_type(tag: &str, prerelease: bool) -> ReleaseType {
    if !prerelease {
        return ReleaseType::Stable;
    }
    if tag.contains("alpha") {
        ReleaseType::Alpha
    } else if tag.contains("beta") {
        ReleaseType::Beta
    } else if tag.contains("rc") {
        ReleaseType::ReleaseCandidate
    } else {
        ReleaseType::Prerelease
    }
}

/// Minor and patch components of the first `major.minor.patch` in the tag.
fn minor_and_patch(tag: &str) -> Option<(&str, &str)> {
    let caps = SEMANTIC_RE.captures(tag)?;
    Some((caps.get(2)?.as_str(), caps.get(3)?.as_str()))
}

/// `X.0.0`. Compared as text, so `1.00.0` is not major.
pub fn is_major_version(tag: &str) -> bool {
    matches!(minor_and_patch(tag), Some(("0", "0")))
}

pub fn is_patch_version(tag: &str) -> bool {
    minor_and_patch(tag).is_some_and(|(_, patch)| patch != "0")
}

/// Heuristic only: a fix-like word in the tag, or more than three
/// dot-separated segments.
pub fn is_hotfix(tag: &str) -> bool {
    HOTFIX_RE.is_match(tag) || tag.split('.').count() > 3
}

pub fn season_quarter(month: u32) -> SeasonQuarter {
    match month {
        1 | 2 => SeasonQuarter::Q1Winter,
        3 => SeasonQuarter::Q1Spring,
        4 | 5 => SeasonQuarter::Q2Spring,
        6 => SeasonQuarter::Q2Summer,
        7 | 8 => SeasonQuarter::Q3Summer,
        9 => SeasonQuarter::Q3Fall,
        10 | 11 => SeasonQuarter::Q4Fall,
        12 => SeasonQuarter::Q4Winter,
        _ => SeasonQuarter::Q1Winter,
    }
}

pub fn quarter(month: u32) -> u32 {
    month.div_ceil(3)
}

/// Parse a GitHub `published_at` value into a UTC instant.
pub fn parse_published_at(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Derive one release. Returns `None` for drafts and for releases without a
/// usable publish timestamp.
pub fn derive_release(
    raw: &RawRelease,
    repository: &str,
    zone: CalendarZone,
) -> Option<DerivedRelease> {
    if raw.draft {
        return None;
    }

    let published_at = raw.published_at.as_deref().and_then(parse_published_at)?;

    Some(match zone {
        CalendarZone::Local => derive_in_zone(raw, repository, published_at, &chrono::Local),
        CalendarZone::Utc => derive_in_zone(raw, repository, published_at, &Utc),
    })
}

fn derive_in_zone<Tz: TimeZone>(
    raw: &RawRelease,
    repository: &str,
    published_at: DateTime<Utc>,
    zone: &Tz,
) -> DerivedRelease {
    let local = published_at.with_timezone(zone);
    let month = local.month();
    let day_of_week = local.weekday().num_days_from_sunday();
    let hour = local.hour();
    let tag = raw.tag_name.as_str();

    let release_name = raw
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or(tag);

    let month_name = u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_default();

    DerivedRelease {
        repository: repository.to_string(),
        tag_name: tag.to_string(),
        release_name: release_name.to_string(),
        published_at,
        published_date: published_at.format("%Y-%m-%d").to_string(),
        published_time: published_at.format("%H:%M:%S").to_string(),
        author: raw.author_login().to_string(),
        is_prerelease: raw.prerelease,
        year: local.year(),
        month,
        quarter: quarter(month),
        month_name,
        week_number: local.date_naive().iso_week().week(),
        day_of_week,
        day_name: DAY_NAMES[day_of_week as usize].to_string(),
        hour,
        time_slot: time_slot(hour),
        is_weekend: is_weekend(day_of_week),
        season_quarter: season_quarter(month),
        version_type: version_type(tag),
        release_type: release_type(tag, raw.prerelease),
        is_major_version: is_major_version(tag),
        is_patch_version: is_patch_version(tag),
        is_hotfix: is_hotfix(tag),
        days_since_epoch: published_at.timestamp_millis().div_euclid(MILLIS_PER_DAY),
    }
}

/// Derive every non-draft release of one repository, oldest first.
pub fn derive_releases(
    raw: &[RawRelease],
    repository: &str,
    zone: CalendarZone,
) -> Vec<DerivedRelease> {
    let mut derived: Vec<DerivedRelease> = raw
        .iter()
        .filter(|r| !r.draft)
        .filter_map(|r| {
            let release = derive_release(r, repository, zone);
            if release.is_none() {
                warn!(
                    "Skipping {} {}: missing or invalid publish date {:?}",
                    repository, r.tag_name, r.published_at
                );
            }
            release
        })
        .collect();

    derived.sort_by_key(|r| r.published_at);
    derived
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::Author;

    fn raw(tag: &str, published_at: &str, prerelease: bool, draft: bool) -> RawRelease {
        RawRelease {
            tag_name: tag.to_string(),
            name: None,
            published_at: Some(published_at.to_string()),
            author: Some(Author {
                login: "octocat".to_string(),
            }),
            prerelease,
            draft,
        }
    }

    #[test]
    fn test_time_slot_boundaries() {
        assert_eq!(time_slot(0), TimeSlot::EarlyMorning);
        assert_eq!(time_slot(5), TimeSlot::EarlyMorning);
        assert_eq!(time_slot(6), TimeSlot::Morning);
        assert_eq!(time_slot(8), TimeSlot::Morning);
        assert_eq!(time_slot(9), TimeSlot::WorkMorning);
        assert_eq!(time_slot(11), TimeSlot::WorkMorning);
        assert_eq!(time_slot(12), TimeSlot::LunchTime);
        assert_eq!(time_slot(14), TimeSlot::WorkAfternoon);
        assert_eq!(time_slot(18), TimeSlot::Evening);
        assert_eq!(time_slot(21), TimeSlot::Night);
        assert_eq!(time_slot(23), TimeSlot::Night);
    }

    #[test]
    fn test_is_weekend() {
        assert!(is_weekend(0));
        assert!(is_weekend(6));
        for day in 1..=5 {
            assert!(!is_weekend(day));
        }
    }

    #[test]
    fn test_version_type() {
        assert_eq!(version_type("v1.2.3"), VersionType::Semantic);
        assert_eq!(version_type("@seed-design/react@1.2.3"), VersionType::Semantic);
        assert_eq!(version_type("v1.2"), VersionType::MajorMinor);
        assert_eq!(version_type("v1"), VersionType::MajorOnly);
        assert_eq!(version_type("release-x"), VersionType::Custom);
    }

    #[test]
    fn test_non_ascii_digits_are_not_versions() {
        // Arabic-Indic digits
        let tag = "v\u{661}.\u{662}.\u{663}";
        assert_eq!(version_type(tag), VersionType::Custom);
        assert!(!is_major_version(tag));
        assert!(!is_patch_version(tag));
        assert_eq!(version_type("v\u{661}.2"), VersionType::MajorOnly);
    }

    #[test]
    fn test_release_type() {
        assert_eq!(release_type("v1.0.0-alpha.1", true), ReleaseType::Alpha);
        assert_eq!(release_type("v1.0.0-beta.2", true), ReleaseType::Beta);
        assert_eq!(release_type("v1.0.0-rc.1", true), ReleaseType::ReleaseCandidate);
        assert_eq!(release_type("v1.0.0-next", true), ReleaseType::Prerelease);
        assert_eq!(release_type("v1.0.0-alpha.1", false), ReleaseType::Stable);
        // Case-sensitive substring match.
        assert_eq!(release_type("v1.0.0-ALPHA", true), ReleaseType::Prerelease);
    }

    #[test]
    fn test_major_and_patch_versions() {
        assert!(is_major_version("v2.0.0"));
        assert!(!is_major_version("v2.1.0"));
        assert!(!is_major_version("v2.0"));
        assert!(!is_major_version("v1.00.0"));
        assert!(is_patch_version("v2.1.3"));
        assert!(!is_patch_version("v2.1.0"));
        assert!(!is_patch_version("release-x"));
    }

    #[test]
    fn test_is_hotfix() {
        assert!(is_hotfix("v1.2.3-hotfix"));
        assert!(is_hotfix("Hotfix-1"));
        assert!(is_hotfix("v1.0.0-FIX"));
        assert!(is_hotfix("patch-2024"));
        assert!(is_hotfix("v1.2.3.4"));
        assert!(!is_hotfix("v1.2.3"));
        assert!(!is_hotfix("v1.2.3-beta"));
        assert!(is_hotfix("v1.2.3-beta.1"));
    }

    #[test]
    fn test_season_quarter_table() {
        let expected = [
            SeasonQuarter::Q1Winter,
            SeasonQuarter::Q1Winter,
            SeasonQuarter::Q1Spring,
            SeasonQuarter::Q2Spring,
            SeasonQuarter::Q2Spring,
            SeasonQuarter::Q2Summer,
            SeasonQuarter::Q3Summer,
            SeasonQuarter::Q3Summer,
            SeasonQuarter::Q3Fall,
            SeasonQuarter::Q4Fall,
            SeasonQuarter::Q4Fall,
            SeasonQuarter::Q4Winter,
        ];
        for (i, season) in expected.iter().enumerate() {
            assert_eq!(season_quarter(i as u32 + 1), *season);
        }
        assert_eq!(season_quarter(0), SeasonQuarter::Q1Winter);
        assert_eq!(season_quarter(13), SeasonQuarter::Q1Winter);
    }

    #[test]
    fn test_quarter() {
        assert_eq!(quarter(1), 1);
        assert_eq!(quarter(3), 1);
        assert_eq!(quarter(4), 2);
        assert_eq!(quarter(12), 4);
    }

    #[test]
    fn test_derive_release_utc() {
        // Saturday, 2 March 2024, 07:30:15 UTC
        let release = derive_release(
            &raw("v2.0.0", "2024-03-02T07:30:15Z", false, false),
            "daangn/stackflow",
            CalendarZone::Utc,
        )
        .unwrap();

        assert_eq!(release.repository, "daangn/stackflow");
        assert_eq!(release.release_name, "v2.0.0");
        assert_eq!(release.author, "octocat");
        assert_eq!(release.published_date, "2024-03-02");
        assert_eq!(release.published_time, "07:30:15");
        assert_eq!(release.year, 2024);
        assert_eq!(release.month, 3);
        assert_eq!(release.quarter, 1);
        assert_eq!(release.month_name, "March");
        assert_eq!(release.week_number, 9);
        assert_eq!(release.day_of_week, 6);
        assert_eq!(release.day_name, "Saturday");
        assert_eq!(release.hour, 7);
        assert_eq!(release.time_slot, TimeSlot::Morning);
        assert!(release.is_weekend);
        assert_eq!(release.season_quarter, SeasonQuarter::Q1Spring);
        assert_eq!(release.version_type, VersionType::Semantic);
        assert_eq!(release.release_type, ReleaseType::Stable);
        assert!(release.is_major_version);
        assert!(!release.is_patch_version);
        assert!(!release.is_hotfix);
        assert_eq!(release.days_since_epoch, 19784);
    }

    #[test]
    fn test_iso_week_at_year_boundary() {
        // 1 January 2021 is a Friday, which ISO-8601 places in week 53 of 2020.
        let release = derive_release(
            &raw("v1.0.1", "2021-01-01T12:00:00Z", false, false),
            "r",
            CalendarZone::Utc,
        )
        .unwrap();
        assert_eq!(release.week_number, 53);
        assert_eq!(release.year, 2021);

        // 31 December 2024 is a Tuesday in week 1 of 2025.
        let release = derive_release(
            &raw("v1.0.2", "2024-12-31T12:00:00Z", false, false),
            "r",
            CalendarZone::Utc,
        )
        .unwrap();
        assert_eq!(release.week_number, 1);
        assert_eq!(release.season_quarter, SeasonQuarter::Q4Winter);
    }

    #[test]
    fn test_derive_release_name_fallback() {
        let mut release = raw("v1.0.0", "2024-01-01T00:00:00Z", false, false);
        release.name = Some(String::new());
        let derived = derive_release(&release, "r", CalendarZone::Utc).unwrap();
        assert_eq!(derived.release_name, "v1.0.0");

        release.name = Some("First".to_string());
        let derived = derive_release(&release, "r", CalendarZone::Utc).unwrap();
        assert_eq!(derived.release_name, "First");
    }

    #[test]
    fn test_derive_release_skips_drafts_and_undated() {
        assert!(derive_release(&raw("v1", "2024-01-01T00:00:00Z", false, true), "r", CalendarZone::Utc).is_none());

        let mut undated = raw("v1", "", false, false);
        undated.published_at = None;
        assert!(derive_release(&undated, "r", CalendarZone::Utc).is_none());

        assert!(derive_release(&raw("v1", "not a date", false, false), "r", CalendarZone::Utc).is_none());
    }

    #[test]
    fn test_days_since_epoch_before_1970() {
        let release = derive_release(
            &raw("v0.0.1", "1969-12-31T23:00:00Z", false, false),
            "r",
            CalendarZone::Utc,
        )
        .unwrap();
        assert_eq!(release.days_since_epoch, -1);
    }

    #[test]
    fn test_derive_releases_excludes_drafts_and_sorts() {
        let releases = vec![
            raw("v1.1.0", "2024-02-01T10:00:00Z", false, false),
            raw("v2.0.0-draft", "2024-03-01T10:00:00Z", false, true),
            raw("v1.0.0", "2024-01-01T10:00:00Z", false, false),
            raw("v1.2.0-beta.1", "2024-02-15T10:00:00Z", true, false),
        ];

        let derived = derive_releases(&releases, "r", CalendarZone::Utc);

        let tags: Vec<&str> = derived.iter().map(|r| r.tag_name.as_str()).collect();
        assert_eq!(tags, vec!["v1.0.0", "v1.1.0", "v1.2.0-beta.1"]);
        assert!(derived.iter().all(|r| r.tag_name != "v2.0.0-draft"));
    }
}
