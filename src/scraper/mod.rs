// Feed loading: raw bodies from disk or HTTP, then parsed and normalized
pub mod fetcher;
pub mod loader;
pub mod traits;

pub use fetcher::{DirectoryFetcher, HttpFetcher, fetcher_for};
pub use loader::{load_daily_changes, load_dataset, load_summary};
pub use traits::Fetcher;
