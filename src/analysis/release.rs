//! The derived release record and its classification enums.
//!
//! Serde names on [`DerivedRelease`] are the CSV column titles, so the same
//! record reads and writes `enhanced_release_details.csv` and is what the HTTP
//! layer returns as JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// English day names indexed by day of week (Sunday = 0).
pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Hour-of-day bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    EarlyMorning,
    Morning,
    WorkMorning,
    LunchTime,
    WorkAfternoon,
    Evening,
    Night,
}

impl TimeSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::EarlyMorning => "early_morning",
            TimeSlot::Morning => "morning",
            TimeSlot::WorkMorning => "work_morning",
            TimeSlot::LunchTime => "lunch_time",
            TimeSlot::WorkAfternoon => "work_afternoon",
            TimeSlot::Evening => "evening",
            TimeSlot::Night => "night",
        }
    }
}

/// Shape of the version number in a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionType {
    Semantic,
    MajorMinor,
    MajorOnly,
    Custom,
}

impl VersionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionType::Semantic => "semantic",
            VersionType::MajorMinor => "major_minor",
            VersionType::MajorOnly => "major_only",
            VersionType::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseType {
    Stable,
    Alpha,
    Beta,
    ReleaseCandidate,
    Prerelease,
}

impl ReleaseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseType::Stable => "stable",
            ReleaseType::Alpha => "alpha",
            ReleaseType::Beta => "beta",
            ReleaseType::ReleaseCandidate => "release_candidate",
            ReleaseType::Prerelease => "prerelease",
        }
    }
}

/// Calendar quarter combined with a season name. Display grouping only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeasonQuarter {
    #[serde(rename = "Q1_Winter")]
    Q1Winter,
    #[serde(rename = "Q1_Spring")]
    Q1Spring,
    #[serde(rename = "Q2_Spring")]
    Q2Spring,
    #[serde(rename = "Q2_Summer")]
    Q2Summer,
    #[serde(rename = "Q3_Summer")]
    Q3Summer,
    #[serde(rename = "Q3_Fall")]
    Q3Fall,
    #[serde(rename = "Q4_Fall")]
    Q4Fall,
    #[serde(rename = "Q4_Winter")]
    Q4Winter,
}

/// A non-draft release with its calendar and version features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRelease {
    #[serde(rename = "Repository")]
    pub repository: String,
    #[serde(rename = "Tag Name")]
    pub tag_name: String,
    #[serde(rename = "Release Name")]
    pub release_name: String,
    #[serde(rename = "Published At (ISO)", with = "iso_millis")]
    pub published_at: DateTime<Utc>,
    #[serde(rename = "Published Date")]
    pub published_date: String,
    #[serde(rename = "Published Time")]
    pub published_time: String,
    #[serde(rename = "Author")]
    pub author: String,
    #[serde(rename = "Is Prerelease", deserialize_with = "flag::deserialize")]
    pub is_prerelease: bool,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Month")]
    pub month: u32,
    #[serde(rename = "Quarter")]
    pub quarter: u32,
    #[serde(rename = "Month Name")]
    pub month_name: String,
    #[serde(rename = "Week Number")]
    pub week_number: u32,
    #[serde(rename = "Day of Week (0=Sun)")]
    pub day_of_week: u32,
    #[serde(rename = "Day Name")]
    pub day_name: String,
    #[serde(rename = "Hour (0-23)")]
    pub hour: u32,
    #[serde(rename = "Time Slot")]
    pub time_slot: TimeSlot,
    #[serde(rename = "Is Weekend", deserialize_with = "flag::deserialize")]
    pub is_weekend: bool,
    #[serde(rename = "Season Quarter")]
    pub season_quarter: SeasonQuarter,
    #[serde(rename = "Version Type")]
    pub version_type: VersionType,
    #[serde(rename = "Release Type")]
    pub release_type: ReleaseType,
    #[serde(rename = "Is Major Version", deserialize_with = "flag::deserialize")]
    pub is_major_version: bool,
    #[serde(rename = "Is Patch Version", deserialize_with = "flag::deserialize")]
    pub is_patch_version: bool,
    #[serde(rename = "Is Hotfix", deserialize_with = "flag::deserialize")]
    pub is_hotfix: bool,
    #[serde(rename = "Days Since Epoch")]
    pub days_since_epoch: i64,
}

impl DerivedRelease {
    /// English name of the day of week.
    pub fn weekday_name(&self) -> &'static str {
        DAY_NAMES[self.day_of_week as usize % 7]
    }
}

/// RFC 3339 in UTC with millisecond precision, e.g. `2024-01-02T03:04:05.000Z`.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(raw.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| D::Error::custom(format!("invalid timestamp '{}': {}", raw, e)))
    }
}

/// Booleans stored as `true`/`false` text, matched case-insensitively.
/// Native booleans (JSON) pass through.
mod flag {
    use serde::{Deserialize, Deserializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Bool(value) => Ok(value),
            Raw::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                other => Err(D::Error::custom(format!("invalid boolean '{}'", other))),
            },
        }
    }
}
