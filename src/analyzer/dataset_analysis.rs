use crate::analyzer::deal_value::{max_deal_value, sort_by_deal_value};
use crate::model::Restaurant;
use chrono::{DateTime, Utc};

/// Aggregate figures over one merged dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStats {
    pub total: usize,
    pub primary_only: usize,
    pub secondary_only: usize,
    pub merged: usize,
    pub with_deals: usize,
    /// Mean best-deal value over restaurants that have a deal.
    pub avg_deal_value: f64,
    pub deal_value_std_dev: f64,
    pub calculated_at: DateTime<Utc>,
}

/// Trait defining the interface for a restaurant analyzer.
pub trait Analyzer {
    fn calculate_stats(&self, restaurants: &[Restaurant]) -> DatasetStats;
    /// Stable descending order on best deal value.
    fn rank(&self, restaurants: &mut [Restaurant]);
    /// Restaurants whose best deal is worth at least `min_value`, ranked.
    fn find_deals(&self, restaurants: &[Restaurant], min_value: f64) -> Vec<Restaurant>;
}

pub struct AnalyzerImpl;

impl AnalyzerImpl {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AnalyzerImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for AnalyzerImpl {
    fn calculate_stats(&self, restaurants: &[Restaurant]) -> DatasetStats {
        let mut primary_only = 0;
        let mut secondary_only = 0;
        let mut merged = 0;
        for restaurant in restaurants {
            match restaurant {
                Restaurant::Primary(_) => primary_only += 1,
                Restaurant::Secondary(_) => secondary_only += 1,
                Restaurant::Merged { .. } => merged += 1,
            }
        }

        let values: Vec<f64> = restaurants
            .iter()
            .map(max_deal_value)
            .filter(|&v| v > 0.0)
            .collect();
        let (avg, std_dev) = if values.is_empty() {
            (0.0, 0.0)
        } else {
            let count = values.len() as f64;
            let avg = values.iter().sum::<f64>() / count;
            let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / count;
            (avg, variance.sqrt())
        };

        DatasetStats {
            total: restaurants.len(),
            primary_only,
            secondary_only,
            merged,
            with_deals: values.len(),
            avg_deal_value: avg,
            deal_value_std_dev: std_dev,
            calculated_at: Utc::now(),
        }
    }

    fn rank(&self, restaurants: &mut [Restaurant]) {
        sort_by_deal_value(restaurants);
    }

    fn find_deals(&self, restaurants: &[Restaurant], min_value: f64) -> Vec<Restaurant> {
        let mut result: Vec<Restaurant> = restaurants
            .iter()
            .filter(|r| max_deal_value(r) >= min_value)
            .cloned()
            .collect();
        self.rank(&mut result);
        result
    }
}
