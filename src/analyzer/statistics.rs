use crate::model::Restaurant;
use crate::utils::parse_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Contents of `summary.json`, written by the daily scrape.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Summary {
    pub last_updated: String,
    #[serde(default)]
    pub daily_counts: Vec<DailyCount>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DailyCount {
    pub date: String,
    pub total_restaurants: u64,
}

/// Restaurants that appeared or disappeared between two scrapes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DailyChanges {
    #[serde(default)]
    pub new_restaurants: Vec<String>,
    #[serde(default)]
    pub removed_restaurants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryReport {
    pub last_updated: String,
    pub last_updated_date: Option<NaiveDate>,
    /// Count from the latest daily entry.
    pub total_restaurants: u64,
    pub chart: ChartSeries,
}

pub fn summarize(summary: &Summary) -> SummaryReport {
    SummaryReport {
        last_updated: summary.last_updated.clone(),
        last_updated_date: parse_date(&summary.last_updated),
        total_restaurants: summary
            .daily_counts
            .last()
            .map_or(0, |c| c.total_restaurants),
        chart: ChartSeries {
            labels: summary.daily_counts.iter().map(|c| c.date.clone()).collect(),
            values: summary
                .daily_counts
                .iter()
                .map(|c| c.total_restaurants)
                .collect(),
        },
    }
}

/// Names present in only one of two snapshots, in snapshot order.
pub fn diff_snapshots(previous: &[Restaurant], current: &[Restaurant]) -> DailyChanges {
    let before: HashSet<&str> = previous.iter().map(|r| r.name()).collect();
    let after: HashSet<&str> = current.iter().map(|r| r.name()).collect();

    let mut seen = HashSet::new();
    let new_restaurants = current
        .iter()
        .map(|r| r.name())
        .filter(|n| !before.contains(n) && seen.insert(*n))
        .map(str::to_string)
        .collect();

    let mut seen = HashSet::new();
    let removed_restaurants = previous
        .iter()
        .map(|r| r.name())
        .filter(|n| !after.contains(n) && seen.insert(*n))
        .map(str::to_string)
        .collect();

    DailyChanges { new_restaurants, removed_restaurants }
}

/// Sorted distinct tag names, for a tag selector.
pub fn tag_facets(restaurants: &[Restaurant]) -> Vec<String> {
    restaurants
        .iter()
        .flat_map(|r| r.tags().iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted distinct non-empty postal codes, for a postal code selector.
pub fn postal_code_facets(restaurants: &[Restaurant]) -> Vec<String> {
    restaurants
        .iter()
        .map(|r| r.postal_code())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
