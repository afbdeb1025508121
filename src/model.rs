// Core structs: restaurants from both feeds, deals, offers, fetch requests, errors
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which feed a record originally came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Primary,
    Secondary,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Primary => write!(f, "primary"),
            Source::Secondary => write!(f, "secondary"),
        }
    }
}

/// Identity of a record, scoped by the feed that issued the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId {
    pub source: Source,
    pub key: String,
}

impl RecordId {
    pub fn primary(key: impl Into<String>) -> Self {
        Self { source: Source::Primary, key: key.into() }
    }

    pub fn secondary(key: impl Into<String>) -> Self {
        Self { source: Source::Secondary, key: key.into() }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Score plus number of ratings. The primary feed calls these
/// `avgRating`/`ratingsCount`, the secondary one `rating`/`reviewCount`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rating {
    pub score: Option<f64>,
    pub count: u32,
}

/// Fixed-value deal from the primary feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Deal {
    pub name: String,
    pub value: f64,
    pub conditions: String,
    pub location_condition: String,
    pub days_to_reset: Option<u32>,
    pub status: String,
}

/// Percentage discount from the secondary feed.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketingOffer {
    pub label: String,
    pub title: String,
    pub offer_type: Option<String>,
    pub discount_percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StreetAddress {
    pub street: String,
    pub zip_code: String,
    pub locality: String,
    pub country: String,
}

impl StreetAddress {
    /// `street, zip locality`, skipping empty parts.
    pub fn display_line(&self) -> String {
        let town = [self.zip_code.as_str(), self.locality.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        [self.street.as_str(), town.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryRestaurant {
    pub id: RecordId,
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub coordinates: Option<Coordinates>,
    /// Discrete 1-4 price range.
    pub price_range: Option<u8>,
    pub rating: Rating,
    pub tags: Vec<String>,
    pub deals: Vec<Deal>,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SecondaryRestaurant {
    pub id: RecordId,
    pub name: String,
    pub address: StreetAddress,
    pub coordinates: Option<Coordinates>,
    /// Average bill in the feed's currency.
    pub average_price: Option<f64>,
    pub rating: Rating,
    pub cuisine: Option<String>,
    pub slug: Option<String>,
    pub offer: Option<MarketingOffer>,
    pub photos: Vec<String>,
}

/// One logical restaurant after merging the two feeds.
#[derive(Debug, Clone, PartialEq)]
pub enum Restaurant {
    Primary(PrimaryRestaurant),
    Secondary(SecondaryRestaurant),
    Merged {
        primary: PrimaryRestaurant,
        secondary: SecondaryRestaurant,
    },
}

impl Restaurant {
    pub fn id(&self) -> &RecordId {
        match self {
            Restaurant::Primary(p) | Restaurant::Merged { primary: p, .. } => &p.id,
            Restaurant::Secondary(s) => &s.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Restaurant::Primary(p) | Restaurant::Merged { primary: p, .. } => &p.name,
            Restaurant::Secondary(s) => &s.name,
        }
    }

    pub fn source(&self) -> Source {
        self.id().source
    }

    pub fn in_both_datasets(&self) -> bool {
        matches!(self, Restaurant::Merged { .. })
    }

    pub fn primary(&self) -> Option<&PrimaryRestaurant> {
        match self {
            Restaurant::Primary(p) | Restaurant::Merged { primary: p, .. } => Some(p),
            Restaurant::Secondary(_) => None,
        }
    }

    /// The secondary record, whether standalone or attached to a primary one.
    pub fn secondary(&self) -> Option<&SecondaryRestaurant> {
        match self {
            Restaurant::Secondary(s) | Restaurant::Merged { secondary: s, .. } => Some(s),
            Restaurant::Primary(_) => None,
        }
    }

    /// Secondary data attached through a merge; `None` for standalone records.
    pub fn secondary_data(&self) -> Option<&SecondaryRestaurant> {
        match self {
            Restaurant::Merged { secondary, .. } => Some(secondary),
            _ => None,
        }
    }

    /// Postal code, falling back to the attached secondary address when the
    /// primary record has none.
    pub fn postal_code(&self) -> &str {
        match self {
            Restaurant::Primary(p) => &p.postal_code,
            Restaurant::Secondary(s) => &s.address.zip_code,
            Restaurant::Merged { primary, secondary } => {
                if primary.postal_code.is_empty() {
                    &secondary.address.zip_code
                } else {
                    &primary.postal_code
                }
            }
        }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            Restaurant::Primary(p) => p.coordinates,
            Restaurant::Secondary(s) => s.coordinates,
            Restaurant::Merged { primary, secondary } => {
                primary.coordinates.or(secondary.coordinates)
            }
        }
    }

    pub fn tags(&self) -> &[String] {
        match self.primary() {
            Some(p) => &p.tags,
            None => &[],
        }
    }

    pub fn deals(&self) -> &[Deal] {
        match self.primary() {
            Some(p) => &p.deals,
            None => &[],
        }
    }

    pub fn rating(&self) -> Rating {
        match self {
            Restaurant::Primary(p) => p.rating,
            Restaurant::Secondary(s) => s.rating,
            Restaurant::Merged { primary, secondary } => {
                if primary.rating.score.is_some() {
                    primary.rating
                } else {
                    secondary.rating
                }
            }
        }
    }

    /// Primary images when there are any, otherwise secondary photos.
    pub fn images(&self) -> &[String] {
        match self {
            Restaurant::Primary(p) => &p.images,
            Restaurant::Secondary(s) => &s.photos,
            Restaurant::Merged { primary, secondary } => {
                if primary.images.is_empty() {
                    &secondary.photos
                } else {
                    &primary.images
                }
            }
        }
    }
}

/// Normalized contents of one fetch: both feeds for a single city.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub primary: Vec<PrimaryRestaurant>,
    pub secondary: Vec<SecondaryRestaurant>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.primary.len() + self.secondary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single file the fetcher can load, relative to the data root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedRequest {
    Primary { city: String },
    Secondary { city: String, file: String },
    Summary,
    DailyChanges { date: String },
}

impl FeedRequest {
    pub fn path(&self) -> String {
        match self {
            FeedRequest::Primary { city } => format!("{}/latest_full_data.json", city),
            FeedRequest::Secondary { city, file } => format!("{}/{}", city, file),
            FeedRequest::Summary => "summary.json".to_string(),
            FeedRequest::DailyChanges { date } => format!("daily_changes/{}.json", date),
        }
    }
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("invalid JSON in {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("expected a list of records in {context}")]
    NotAList { context: String },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParserError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown city \"{0}\"")]
    UnknownCity(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}
