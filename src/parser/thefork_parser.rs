// TheFork (secondary feed) record shape
use super::{
    Parser, lenient_number, lenient_object, lenient_optional_object, lenient_string, lenient_vec,
};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSecondaryRestaurant {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_object")]
    pub address: RawStreetAddress,
    #[serde(deserialize_with = "lenient_object")]
    pub geolocation: RawGeolocation,
    #[serde(deserialize_with = "lenient_number")]
    pub rating: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub review_count: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub average_price: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub cuisine: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub main_photo_url: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub slug: Option<String>,
    #[serde(deserialize_with = "lenient_optional_object")]
    pub marketing_offer: Option<RawMarketingOffer>,
    #[serde(deserialize_with = "lenient_vec")]
    pub photos: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawStreetAddress {
    #[serde(deserialize_with = "lenient_string")]
    pub street: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub zip_code: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub locality: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawGeolocation {
    #[serde(deserialize_with = "lenient_number")]
    pub latitude: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub longitude: Option<f64>,
}

/// The scraper writes this object with every field `null` when a
/// restaurant has no promotion.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawMarketingOffer {
    #[serde(deserialize_with = "lenient_string")]
    pub label: Option<String>,
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    pub offer_type: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub discount_percentage: Option<f64>,
}

pub struct TheForkParser;

impl TheForkParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TheForkParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for TheForkParser {
    type Record = RawSecondaryRestaurant;

    fn feed_name(&self) -> &'static str {
        "thefork"
    }
}
