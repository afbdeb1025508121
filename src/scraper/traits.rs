use crate::model::{FeedRequest, FetchError};

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// Returns the raw body of the requested feed file.
    async fn fetch(&self, req: &FeedRequest) -> Result<String, FetchError>;
}
