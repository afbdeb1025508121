use crate::analyzer::statistics::{DailyChanges, Summary};
use crate::config::{CityConfig, FeedSelection};
use crate::model::{
    Dataset, FeedRequest, FetchError, ParserError, PrimaryRestaurant, SecondaryRestaurant,
};
use crate::normalizer::{normalize_primary_all, normalize_secondary_all};
use crate::parser::{NeotasteParser, Parser, TheForkParser};
use crate::scraper::traits::Fetcher;

use serde::de::DeserializeOwned;
use tracing::info;

/// Loads and normalizes both feeds of a city. The two feeds are fetched
/// concurrently; a disabled feed yields an empty list.
pub async fn load_dataset(
    fetcher: &dyn Fetcher,
    city: &CityConfig,
    feeds: FeedSelection,
) -> Result<Dataset, FetchError> {
    let (primary, secondary) = futures::try_join!(
        async {
            if feeds.primary {
                load_primary(fetcher, city).await
            } else {
                Ok(Vec::new())
            }
        },
        async {
            if feeds.secondary {
                load_secondary(fetcher, city).await
            } else {
                Ok(Vec::new())
            }
        },
    )?;

    info!(
        "Loaded {} primary and {} secondary restaurants for {}",
        primary.len(),
        secondary.len(),
        city.slug
    );
    Ok(Dataset { primary, secondary })
}

pub async fn load_primary(
    fetcher: &dyn Fetcher,
    city: &CityConfig,
) -> Result<Vec<PrimaryRestaurant>, FetchError> {
    let body = fetcher
        .fetch(&FeedRequest::Primary { city: city.slug.clone() })
        .await?;
    let raw = NeotasteParser::new().parse(&body)?;
    Ok(normalize_primary_all(raw))
}

pub async fn load_secondary(
    fetcher: &dyn Fetcher,
    city: &CityConfig,
) -> Result<Vec<SecondaryRestaurant>, FetchError> {
    let body = fetcher
        .fetch(&FeedRequest::Secondary {
            city: city.slug.clone(),
            file: city.secondary_file.clone(),
        })
        .await?;
    let raw = TheForkParser::new().parse(&body)?;
    Ok(normalize_secondary_all(raw))
}

pub async fn load_summary(fetcher: &dyn Fetcher) -> Result<Summary, FetchError> {
    let body = fetcher.fetch(&FeedRequest::Summary).await?;
    decode(&body, "summary")
}

pub async fn load_daily_changes(fetcher: &dyn Fetcher, date: &str) -> Result<DailyChanges, FetchError> {
    let body = fetcher
        .fetch(&FeedRequest::DailyChanges { date: date.to_string() })
        .await?;
    decode(&body, "daily changes")
}

fn decode<T: DeserializeOwned>(body: &str, context: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|source| {
        FetchError::Parse(ParserError::Json {
            context: context.to_string(),
            source,
        })
    })
}
