// Immutable application state with a fetch generation counter
use crate::analyzer::deal_value::sort_by_deal_value;
use crate::config::FeedSelection;
use crate::filter::{FilterCriteria, filter};
use crate::merger::merge;
use crate::model::{Dataset, Restaurant};
use std::sync::Arc;
use tracing::{debug, warn};

/// Every change returns a new value. A fetch result is only installed while
/// the generation it started under is still current.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    city: String,
    feeds: FeedSelection,
    criteria: FilterCriteria,
    generation: u64,
    dataset: Arc<Dataset>,
}

/// Handed out by [`AppState::begin_fetch`]; redeemed by [`AppState::apply_fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    pub city: String,
    pub feeds: FeedSelection,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl AppState {
    pub fn new(city: impl Into<String>, feeds: FeedSelection) -> Self {
        Self {
            city: city.into(),
            feeds,
            criteria: FilterCriteria::default(),
            generation: 0,
            dataset: Arc::new(Dataset::default()),
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn feeds(&self) -> FeedSelection {
        self.feeds
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Switching city invalidates any fetch in flight.
    pub fn with_city(&self, city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            generation: self.generation + 1,
            ..self.clone()
        }
    }

    /// Switching feeds invalidates any fetch in flight.
    pub fn with_feeds(&self, feeds: FeedSelection) -> Self {
        Self {
            feeds,
            generation: self.generation + 1,
            ..self.clone()
        }
    }

    /// Criteria only affect the view; fetches in flight stay valid.
    pub fn with_criteria(&self, criteria: FilterCriteria) -> Self {
        Self {
            criteria,
            ..self.clone()
        }
    }

    pub fn begin_fetch(&self) -> (Self, FetchTicket) {
        let next = Self {
            generation: self.generation + 1,
            ..self.clone()
        };
        let ticket = FetchTicket {
            generation: next.generation,
            city: next.city.clone(),
            feeds: next.feeds,
        };
        debug!("Starting fetch #{} for {}", ticket.generation, ticket.city);
        (next, ticket)
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Installs a fetched dataset, unless a newer fetch or a city/feed
    /// change has happened since the ticket was issued.
    pub fn apply_fetch(&self, ticket: &FetchTicket, dataset: Dataset) -> Self {
        if !self.is_current(ticket) {
            warn!(
                "Discarding stale fetch #{} for {} (current is #{})",
                ticket.generation, ticket.city, self.generation
            );
            return self.clone();
        }
        Self {
            dataset: Arc::new(dataset),
            ..self.clone()
        }
    }

    /// The full merged list, unfiltered, in feed order.
    pub fn merged(&self) -> Vec<Restaurant> {
        merge(&self.dataset.primary, &self.dataset.secondary)
    }

    /// Merged, filtered by the current criteria and ranked by deal value.
    pub fn visible(&self) -> Vec<Restaurant> {
        let mut restaurants = filter(&self.merged(), &self.criteria);
        sort_by_deal_value(&mut restaurants);
        restaurants
    }
}
