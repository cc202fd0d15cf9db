use serde::Deserialize;

use crate::analysis::{DerivedRelease, TimeSlot};

/// Optional predicates over the loaded releases, combined with AND.
///
/// Empty values count as absent. Dates are compared lexically against the
/// `YYYY-MM-DD` published date, inclusive on both ends.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseFilter {
    pub repository: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    #[serde(default, deserialize_with = "blank::flag")]
    pub is_prerelease: Option<bool>,
    #[serde(default, deserialize_with = "blank::time_slot")]
    pub time_slot: Option<TimeSlot>,
}

/// Query values where an empty string means "not given".
mod blank {
    use serde::Deserialize;
    use serde::de::{Deserializer, Error, IntoDeserializer, value::StrDeserializer};

    use crate::analysis::TimeSlot;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Text(String),
    }

    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Bool(value)) => Ok(Some(value)),
            Some(Raw::Text(text)) => match text.trim().to_ascii_lowercase().as_str() {
                "" => Ok(None),
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                other => Err(D::Error::custom(format!("invalid boolean '{}'", other))),
            },
        }
    }

    pub fn time_slot<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<TimeSlot>, D::Error> {
        let Some(text) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let slot: StrDeserializer<'_, D::Error> = text.into_deserializer();
        TimeSlot::deserialize(slot).map(Some)
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl ReleaseFilter {
    pub fn is_empty(&self) -> bool {
        present(&self.repository).is_none()
            && present(&self.date_from).is_none()
            && present(&self.date_to).is_none()
            && self.is_prerelease.is_none()
            && self.time_slot.is_none()
    }

    pub fn matches(&self, release: &DerivedRelease) -> bool {
        present(&self.repository).is_none_or(|repo| release.repository == repo)
            && present(&self.date_from).is_none_or(|from| release.published_date.as_str() >= from)
            && present(&self.date_to).is_none_or(|to| release.published_date.as_str() <= to)
            && self
                .is_prerelease
                .is_none_or(|prerelease| release.is_prerelease == prerelease)
            && self.time_slot.is_none_or(|slot| release.time_slot == slot)
    }
}
