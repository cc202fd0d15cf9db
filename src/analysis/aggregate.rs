//! Grouped release counts written to `release_statistics.csv`.

use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

use super::release::DerivedRelease;

/// Names of the emitted metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TotalReleases,
    TotalWeekdayReleases,
    TotalWeekendReleases,
    ReleasesByRepo,
    WeekdayReleasesByRepo,
    WeekdayReleasesByYear,
    WeekdayReleasesByMonth,
    ReleasesByDayOfWeek,
    WeekdayOnlyReleasesByDay,
    WeekdayReleasesByAuthor,
    WeekdayPrereleaseCount,
    WeekdayStableReleaseCount,
    PrereleaseCount,
    StableReleaseCount,
}

/// One `(metric, value, group, period)` row.
///
/// `group` holds a repository or author name, `period` a year, month or day
/// label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    #[serde(rename = "Metric")]
    pub metric: Metric,
    #[serde(rename = "Value")]
    pub value: usize,
    #[serde(rename = "Repository/Author")]
    pub group: Option<String>,
    #[serde(rename = "Period")]
    pub period: Option<String>,
}

impl MetricRow {
    pub fn total(metric: Metric, value: usize) -> Self {
        Self {
            metric,
            value,
            group: None,
            period: None,
        }
    }

    pub fn for_group(metric: Metric, value: usize, group: impl Into<String>) -> Self {
        Self {
            metric,
            value,
            group: Some(group.into()),
            period: None,
        }
    }

    pub fn for_period(metric: Metric, value: usize, period: impl Into<String>) -> Self {
        Self {
            metric,
            value,
            group: None,
            period: Some(period.into()),
        }
    }
}

/// Stable partition by key. Groups come out in the order their key is first
/// seen; members keep their input order.
pub fn group_by<'a, T, K, F>(items: &[&'a T], key: F) -> Vec<(K, Vec<&'a T>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'a T>)> = Vec::new();

    for &item in items {
        let k = key(item);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(item),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![item]));
            }
        }
    }

    groups
}

/// Fold the full release set into metric rows.
pub fn generate_stats(releases: &[DerivedRelease]) -> Vec<MetricRow> {
    let all: Vec<&DerivedRelease> = releases.iter().collect();
    let weekday: Vec<&DerivedRelease> = releases.iter().filter(|r| !r.is_weekend).collect();

    let mut rows = vec![
        MetricRow::total(Metric::TotalReleases, all.len()),
        MetricRow::total(Metric::TotalWeekdayReleases, weekday.len()),
        MetricRow::total(Metric::TotalWeekendReleases, all.len() - weekday.len()),
    ];

    for (repo, members) in group_by(&all, |r| r.repository.clone()) {
        let weekday_count = members.iter().filter(|r| !r.is_weekend).count();
        rows.push(MetricRow::for_group(Metric::ReleasesByRepo, members.len(), repo.clone()));
        rows.push(MetricRow::for_group(Metric::WeekdayReleasesByRepo, weekday_count, repo));
    }

    for (year, members) in group_by(&weekday, |r| r.year) {
        rows.push(MetricRow::for_period(
            Metric::WeekdayReleasesByYear,
            members.len(),
            year.to_string(),
        ));
    }

    for (month, members) in group_by(&weekday, |r| r.month) {
        rows.push(MetricRow::for_period(
            Metric::WeekdayReleasesByMonth,
            members.len(),
            format!("month_{}", month),
        ));
    }

    rows.extend(day_of_week_rows(&all, Metric::ReleasesByDayOfWeek));
    rows.extend(day_of_week_rows(&weekday, Metric::WeekdayOnlyReleasesByDay));

    for (author, members) in group_by(&weekday, |r| r.author.clone()) {
        rows.push(MetricRow::for_group(
            Metric::WeekdayReleasesByAuthor,
            members.len(),
            author,
        ));
    }

    let weekday_prereleases = weekday.iter().filter(|r| r.is_prerelease).count();
    rows.push(MetricRow::total(Metric::WeekdayPrereleaseCount, weekday_prereleases));
    rows.push(MetricRow::total(
        Metric::WeekdayStableReleaseCount,
        weekday.len() - weekday_prereleases,
    ));

    let prereleases = all.iter().filter(|r| r.is_prerelease).count();
    rows.push(MetricRow::total(Metric::PrereleaseCount, prereleases));
    rows.push(MetricRow::total(
        Metric::StableReleaseCount,
        all.len() - prereleases,
    ));

    rows
}

fn day_of_week_rows(releases: &[&DerivedRelease], metric: Metric) -> Vec<MetricRow> {
    group_by(releases, |r| r.day_of_week)
        .into_iter()
        .map(|(_, members)| MetricRow::for_period(metric, members.len(), members[0].weekday_name()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::features::{CalendarZone, derive_release};
    use crate::github::{Author, RawRelease};

    fn release(repo: &str, tag: &str, published_at: &str, author: &str, prerelease: bool) -> DerivedRelease {
        let raw = RawRelease {
            tag_name: tag.to_string(),
            name: None,
            published_at: Some(published_at.to_string()),
            author: Some(Author {
                login: author.to_string(),
            }),
            prerelease,
            draft: false,
        };
        derive_release(&raw, repo, CalendarZone::Utc).unwrap()
    }

    fn sample() -> Vec<DerivedRelease> {
        vec![
            // Monday
            release("a/one", "v1.0.0", "2024-01-01T10:00:00Z", "alice", false),
            // Saturday
            release("a/one", "v1.1.0-beta.1", "2024-01-06T10:00:00Z", "bob", true),
            // Wednesday, next year
            release("b/two", "v0.1.0", "2025-02-05T10:00:00Z", "bob", false),
            // Monday
            release("a/one", "v1.1.0", "2024-01-08T10:00:00Z", "alice", false),
            // Sunday
            release("b/two", "v0.2.0-rc.1", "2025-02-09T10:00:00Z", "carol", true),
        ]
    }

    fn find<'a>(rows: &'a [MetricRow], metric: Metric) -> Vec<&'a MetricRow> {
        rows.iter().filter(|r| r.metric == metric).collect()
    }

    fn value(rows: &[MetricRow], metric: Metric) -> usize {
        find(rows, metric)[0].value
    }

    #[test]
    fn test_group_by_first_seen_order() {
        let values = [3, 1, 3, 2, 1];
        let refs: Vec<&i32> = values.iter().collect();
        let groups = group_by(&refs, |v| *v);

        let keys: Vec<i32> = groups.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![3, 1, 2]);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].1.len(), 2);
        assert_eq!(groups[2].1.len(), 1);
    }

    #[test]
    fn test_totals_add_up() {
        let rows = generate_stats(&sample());

        let total = value(&rows, Metric::TotalReleases);
        assert_eq!(total, 5);
        assert_eq!(
            value(&rows, Metric::TotalWeekdayReleases) + value(&rows, Metric::TotalWeekendReleases),
            total
        );
        let by_repo: usize = find(&rows, Metric::ReleasesByRepo).iter().map(|r| r.value).sum();
        assert_eq!(by_repo, total);
        assert_eq!(
            value(&rows, Metric::PrereleaseCount) + value(&rows, Metric::StableReleaseCount),
            total
        );
    }

    #[test]
    fn test_repository_rows() {
        let rows = generate_stats(&sample());

        let by_repo: Vec<(Option<&str>, usize)> = find(&rows, Metric::ReleasesByRepo)
            .iter()
            .map(|r| (r.group.as_deref(), r.value))
            .collect();
        assert_eq!(by_repo, vec![(Some("a/one"), 3), (Some("b/two"), 2)]);

        let weekday_by_repo: Vec<usize> = find(&rows, Metric::WeekdayReleasesByRepo)
            .iter()
            .map(|r| r.value)
            .collect();
        assert_eq!(weekday_by_repo, vec![2, 1]);
    }

    #[test]
    fn test_weekday_period_rows() {
        let rows = generate_stats(&sample());

        let years: Vec<(Option<&str>, usize)> = find(&rows, Metric::WeekdayReleasesByYear)
            .iter()
            .map(|r| (r.period.as_deref(), r.value))
            .collect();
        assert_eq!(years, vec![(Some("2024"), 2), (Some("2025"), 1)]);

        let months: Vec<(Option<&str>, usize)> = find(&rows, Metric::WeekdayReleasesByMonth)
            .iter()
            .map(|r| (r.period.as_deref(), r.value))
            .collect();
        assert_eq!(months, vec![(Some("month_1"), 2), (Some("month_2"), 1)]);
    }

    #[test]
    fn test_day_of_week_rows() {
        let rows = generate_stats(&sample());

        let all_days: Vec<(Option<&str>, usize)> = find(&rows, Metric::ReleasesByDayOfWeek)
            .iter()
            .map(|r| (r.period.as_deref(), r.value))
            .collect();
        assert_eq!(
            all_days,
            vec![
                (Some("Monday"), 2),
                (Some("Saturday"), 1),
                (Some("Wednesday"), 1),
                (Some("Sunday"), 1)
            ]
        );

        let weekdays: Vec<Option<&str>> = find(&rows, Metric::WeekdayOnlyReleasesByDay)
            .iter()
            .map(|r| r.period.as_deref())
            .collect();
        assert_eq!(weekdays, vec![Some("Monday"), Some("Wednesday")]);
    }

    #[test]
    fn test_author_and_prerelease_rows() {
        let rows = generate_stats(&sample());

        let authors: Vec<(Option<&str>, usize)> = find(&rows, Metric::WeekdayReleasesByAuthor)
            .iter()
            .map(|r| (r.group.as_deref(), r.value))
            .collect();
        assert_eq!(authors, vec![(Some("alice"), 2), (Some("bob"), 1)]);

        assert_eq!(value(&rows, Metric::WeekdayPrereleaseCount), 0);
        assert_eq!(value(&rows, Metric::WeekdayStableReleaseCount), 3);
        assert_eq!(value(&rows, Metric::PrereleaseCount), 2);
        assert_eq!(value(&rows, Metric::StableReleaseCount), 3);
    }

    #[test]
    fn test_row_order() {
        let rows = generate_stats(&sample());
        let mut metrics: Vec<Metric> = rows.iter().map(|r| r.metric).collect();
        metrics.dedup();

        assert_eq!(
            metrics,
            vec![
                Metric::TotalReleases,
                Metric::TotalWeekdayReleases,
                Metric::TotalWeekendReleases,
                Metric::ReleasesByRepo,
                Metric::WeekdayReleasesByRepo,
                Metric::ReleasesByRepo,
                Metric::WeekdayReleasesByRepo,
                Metric::WeekdayReleasesByYear,
                Metric::WeekdayReleasesByMonth,
                Metric::ReleasesByDayOfWeek,
                Metric::WeekdayOnlyReleasesByDay,
                Metric::WeekdayReleasesByAuthor,
                Metric::WeekdayPrereleaseCount,
                Metric::WeekdayStableReleaseCount,
                Metric::PrereleaseCount,
                Metric::StableReleaseCount,
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        let rows = generate_stats(&[]);
        assert_eq!(value(&rows, Metric::TotalReleases), 0);
        assert!(find(&rows, Metric::ReleasesByRepo).is_empty());
        assert_eq!(rows.len(), 7);
    }
}
