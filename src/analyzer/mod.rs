// Analyzer module: deal valuation, dataset statistics and summaries.

pub mod dataset_analysis;
pub mod deal_value;
pub mod statistics;

// Re-export the main Analyzer implementation for ease of use.
pub use dataset_analysis::{Analyzer, AnalyzerImpl, DatasetStats};
