// Neotaste (primary feed) record shape
use super::{Parser, lenient_number, lenient_string, lenient_vec};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPrimaryRestaurant {
    #[serde(deserialize_with = "lenient_string")]
    pub uuid: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub address: Option<String>,
    #[serde(alias = "postalCode", deserialize_with = "lenient_string")]
    pub zip_code: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub latitude: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub longitude: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub price_range: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub avg_rating: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub ratings_count: Option<f64>,
    #[serde(deserialize_with = "lenient_vec")]
    pub tags: Vec<RawTag>,
    #[serde(deserialize_with = "lenient_vec")]
    pub deals: Vec<RawDeal>,
    #[serde(deserialize_with = "lenient_vec")]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTag {
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDeal {
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub value: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub conditions: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub location_condition: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub days_to_reset: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub status: Option<String>,
}

pub struct NeotasteParser;

impl NeotasteParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NeotasteParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for NeotasteParser {
    type Record = RawPrimaryRestaurant;

    fn feed_name(&self) -> &'static str {
        "neotaste"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_primary_record() {
        let body = r#"[{
            "uuid": "a1",
            "name": "Cafe X",
            "address": "12 Main St",
            "zipCode": "1010",
            "latitude": 48.2,
            "longitude": 16.37,
            "priceRange": 2,
            "avgRating": 4.6,
            "ratingsCount": 120,
            "tags": [{"name": "Brunch"}, {"name": "Vegan"}],
            "deals": [{
                "name": "2for1 Main",
                "value": 14.5,
                "conditions": "Valid for dine-in. Not on holidays",
                "locationCondition": "dine-in",
                "daysToReset": 30,
                "status": "active"
            }],
            "images": ["https://img/a.jpg"]
        }]"#;

        let records = NeotasteParser::new().parse(body).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.uuid.as_deref(), Some("a1"));
        assert_eq!(r.zip_code.as_deref(), Some("1010"));
        assert_eq!(r.price_range, Some(2.0));
        assert_eq!(r.tags.len(), 2);
        assert_eq!(r.deals[0].location_condition.as_deref(), Some("dine-in"));
        assert_eq!(r.deals[0].days_to_reset, Some(30.0));
    }

    #[test]
    fn accepts_postal_code_alias_and_missing_collections() {
        let body = r#"[{"name": "Bistro", "postalCode": 1070, "tags": null}]"#;
        let records = NeotasteParser::new().parse(body).unwrap();
        let r = &records[0];
        assert_eq!(r.zip_code.as_deref(), Some("1070"));
        assert!(r.tags.is_empty());
        assert!(r.deals.is_empty());
        assert!(r.images.is_empty());
        assert!(r.latitude.is_none());
    }

    #[test]
    fn bad_collection_entries_are_dropped_not_the_record() {
        let body = r#"[{
            "uuid": "a2",
            "name": "Cafe Y",
            "images": ["https://img/a.jpg", null],
            "tags": [{"name": "Brunch"}, null, "Vegan"],
            "deals": [null, {"name": "Free coffee", "value": "3,5"}]
        }]"#;
        let records = NeotasteParser::new().parse(body).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.images, vec!["https://img/a.jpg"]);
        assert_eq!(r.tags.len(), 1);
        assert_eq!(r.tags[0].name.as_deref(), Some("Brunch"));
        assert_eq!(r.deals.len(), 1);
        assert_eq!(r.deals[0].value, Some(3.5));
    }

    #[test]
    fn non_list_collections_become_empty() {
        let body = r#"[{"name": "Cafe Z", "tags": "Brunch", "deals": {"name": "x"}, "images": 3}]"#;
        let records = NeotasteParser::new().parse(body).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].tags.is_empty());
        assert!(records[0].deals.is_empty());
        assert!(records[0].images.is_empty());
    }
}
