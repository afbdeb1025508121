// Merge, filter and rank restaurant deal feeds

pub mod analyzer;
pub mod config;
pub mod filter;
pub mod merger;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod scraper;
pub mod state;
pub mod utils;
pub mod view;

pub use analyzer::deal_value::{max_deal_value, sort_by_deal_value};
pub use filter::{DealCriteria, FilterCriteria, filter};
pub use merger::merge;
pub use model::{Dataset, Restaurant, Source};
pub use state::{AppState, FetchTicket};
