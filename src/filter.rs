// Filters over the merged list and the deals view
use crate::analyzer::deal_value::{estimated_savings, max_deal_value};
use crate::model::{Deal, MarketingOffer, Restaurant};
use crate::utils::contains_ignore_case;

/// Width of one price bucket when only an average price is known.
pub const PRICE_BUCKET_WIDTH: f64 = 25.0;

/// Conjunction of user-selected predicates. `None` and empty strings
/// match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub price_bucket: Option<u8>,
    pub postal_prefix: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.price_bucket.is_none()
            && active(&self.postal_prefix).is_none()
            && active(&self.tag).is_none()
            && active(&self.search).is_none()
    }

    pub fn matches(&self, restaurant: &Restaurant) -> bool {
        if let Some(bucket) = self.price_bucket {
            if price_bucket(restaurant) != Some(u32::from(bucket)) {
                return false;
            }
        }
        if let Some(prefix) = active(&self.postal_prefix) {
            if !restaurant.postal_code().starts_with(prefix) {
                return false;
            }
        }
        if let Some(tag) = active(&self.tag) {
            if !restaurant.tags().iter().any(|t| t == tag) {
                return false;
            }
        }
        if let Some(search) = active(&self.search) {
            if !contains_ignore_case(restaurant.name(), search) {
                return false;
            }
        }
        true
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Price bucket of an average price: `ceil(price / 25)`.
pub fn bucket_for_average_price(average_price: f64) -> Option<u32> {
    if average_price.is_finite() && average_price >= 0.0 {
        Some((average_price / PRICE_BUCKET_WIDTH).ceil() as u32)
    } else {
        None
    }
}

/// The discrete 1-4 range when the primary feed supplies one, otherwise the
/// bucket derived from the secondary average price.
pub fn price_bucket(restaurant: &Restaurant) -> Option<u32> {
    restaurant
        .primary()
        .and_then(|p| p.price_range)
        .map(u32::from)
        .or_else(|| {
            restaurant
                .secondary()
                .and_then(|s| s.average_price)
                .and_then(bucket_for_average_price)
        })
}

pub fn filter(restaurants: &[Restaurant], criteria: &FilterCriteria) -> Vec<Restaurant> {
    restaurants
        .iter()
        .filter(|r| criteria.matches(r))
        .cloned()
        .collect()
}

/// Restaurant-list search: name or any tag name, ignoring case.
pub fn search_restaurants(restaurants: &[Restaurant], term: &str) -> Vec<Restaurant> {
    restaurants
        .iter()
        .filter(|r| {
            contains_ignore_case(r.name(), term)
                || r.tags().iter().any(|t| contains_ignore_case(t, term))
        })
        .cloned()
        .collect()
}

/// Where a listed deal came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DealKind<'a> {
    Fixed(&'a Deal),
    Discount {
        offer: &'a MarketingOffer,
        average_price: Option<f64>,
        /// Offer attached through a merge rather than a standalone record.
        additional: bool,
    },
}

/// One row of the deals view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DealListing<'a> {
    pub restaurant: &'a Restaurant,
    pub kind: DealKind<'a>,
    pub value: f64,
}

impl<'a> DealListing<'a> {
    pub fn description(&self) -> &'a str {
        match self.kind {
            DealKind::Fixed(deal) => &deal.name,
            DealKind::Discount { offer, .. } if !offer.title.is_empty() => &offer.title,
            DealKind::Discount { offer, .. } => &offer.label,
        }
    }
}

/// Every deal of every restaurant, highest value first. Equal values keep
/// restaurant order, then deal order.
pub fn deal_listings(restaurants: &[Restaurant]) -> Vec<DealListing<'_>> {
    let mut listings: Vec<DealListing<'_>> = restaurants
        .iter()
        .flat_map(|restaurant| {
            let fixed = restaurant.deals().iter().map(move |deal| DealListing {
                restaurant,
                kind: DealKind::Fixed(deal),
                value: if deal.value.is_finite() { deal.value } else { 0.0 },
            });
            let discount = restaurant.secondary().and_then(|s| {
                s.offer.as_ref().map(|offer| DealListing {
                    restaurant,
                    kind: DealKind::Discount {
                        offer,
                        average_price: s.average_price,
                        additional: restaurant.in_both_datasets(),
                    },
                    value: estimated_savings(s.average_price, offer.discount_percentage),
                })
            });
            fixed.chain(discount)
        })
        .collect();
    listings.sort_by(|a, b| b.value.total_cmp(&a.value));
    listings
}

/// Filters for the deals view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DealCriteria {
    /// Matches the restaurant name or the deal description.
    pub search: Option<String>,
    /// Exact postal code.
    pub postal_code: Option<String>,
    /// Every listed tag must be present on the restaurant.
    pub tags: Vec<String>,
    /// Same bucket rule as [`FilterCriteria::price_bucket`].
    pub price_bucket: Option<u8>,
}

impl DealCriteria {
    pub fn matches(&self, listing: &DealListing<'_>) -> bool {
        if let Some(search) = active(&self.search) {
            if !contains_ignore_case(listing.description(), search)
                && !contains_ignore_case(listing.restaurant.name(), search)
            {
                return false;
            }
        }
        if let Some(postal_code) = active(&self.postal_code) {
            if listing.restaurant.postal_code() != postal_code {
                return false;
            }
        }
        if let Some(bucket) = self.price_bucket {
            if price_bucket(listing.restaurant) != Some(u32::from(bucket)) {
                return false;
            }
        }
        let tags = listing.restaurant.tags();
        self.tags.iter().all(|wanted| tags.iter().any(|t| t == wanted))
    }
}

pub fn filter_deals<'a>(listings: &[DealListing<'a>], criteria: &DealCriteria) -> Vec<DealListing<'a>> {
    listings
        .iter()
        .filter(|l| criteria.matches(l))
        .copied()
        .collect()
}

/// Restaurants that have at least one deal worth something.
pub fn with_deals(restaurants: &[Restaurant]) -> Vec<Restaurant> {
    restaurants
        .iter()
        .filter(|r| max_deal_value(r) > 0.0)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PrimaryRestaurant, Rating, RecordId, SecondaryRestaurant, StreetAddress};

    fn primary(name: &str, price_range: Option<u8>, postal: &str, tags: &[&str]) -> PrimaryRestaurant {
        PrimaryRestaurant {
            id: RecordId::primary(name),
            name: name.to_owned(),
            address: "1 Main St".to_owned(),
            postal_code: postal.to_owned(),
            coordinates: None,
            price_range,
            rating: Rating::default(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            deals: vec![Deal {
                name: format!("{} lunch deal", name),
                value: 12.0,
                conditions: String::new(),
                location_condition: String::new(),
                days_to_reset: None,
                status: String::new(),
            }],
            images: Vec::new(),
        }
    }

    fn secondary(name: &str, average_price: Option<f64>, zip: &str) -> SecondaryRestaurant {
        SecondaryRestaurant {
            id: RecordId::secondary(name),
            name: name.to_owned(),
            address: StreetAddress {
                street: "Oak Ave".to_owned(),
                zip_code: zip.to_owned(),
                ..StreetAddress::default()
            },
            coordinates: None,
            average_price,
            rating: Rating::default(),
            cuisine: None,
            slug: None,
            offer: Some(MarketingOffer {
                label: "-20%".to_owned(),
                title: "20% off food".to_owned(),
                offer_type: None,
                discount_percentage: Some(20.0),
            }),
            photos: Vec::new(),
        }
    }

    fn sample() -> Vec<Restaurant> {
        vec![
            Restaurant::Primary(primary("Pho Saigon", Some(1), "1070", &["Asian", "Soup"])),
            Restaurant::Primary(primary("Steakhaus", Some(3), "1010", &["Grill"])),
            Restaurant::Secondary(secondary("Trattoria", Some(37.0), "1040")),
            Restaurant::Merged {
                primary: primary("Cafe X", None, "", &["Brunch"]),
                secondary: secondary("cafe x", Some(20.0), "1090"),
            },
        ]
    }

    fn names(list: &[Restaurant]) -> Vec<&str> {
        list.iter().map(|r| r.name()).collect()
    }

    #[test]
    fn empty_criteria_is_identity() {
        let list = sample();
        let criteria = FilterCriteria {
            postal_prefix: Some(String::new()),
            ..FilterCriteria::default()
        };
        assert!(criteria.is_empty());
        assert_eq!(filter(&list, &criteria), list);
        assert_eq!(filter(&list, &FilterCriteria::default()), list);
    }

    #[test]
    fn average_price_37_is_bucket_2_only() {
        let trattoria = Restaurant::Secondary(secondary("Trattoria", Some(37.0), "1040"));
        for bucket in 1..=4u8 {
            let criteria = FilterCriteria { price_bucket: Some(bucket), ..FilterCriteria::default() };
            assert_eq!(criteria.matches(&trattoria), bucket == 2, "bucket {}", bucket);
        }
    }

    #[test]
    fn price_bucket_prefers_primary_range_then_falls_back() {
        let list = sample();
        assert_eq!(price_bucket(&list[0]), Some(1));
        assert_eq!(price_bucket(&list[2]), Some(2));
        assert_eq!(price_bucket(&list[3]), Some(1));
        let criteria = FilterCriteria { price_bucket: Some(1), ..FilterCriteria::default() };
        assert_eq!(names(&filter(&list, &criteria)), vec!["Pho Saigon", "Cafe X"]);
    }

    #[test]
    fn missing_average_price_never_matches_a_bucket() {
        let r = Restaurant::Secondary(secondary("Nothing", None, "1010"));
        let criteria = FilterCriteria { price_bucket: Some(1), ..FilterCriteria::default() };
        assert!(!criteria.matches(&r));
    }

    #[test]
    fn postal_prefix_is_case_sensitive_prefix() {
        let list = sample();
        let criteria = FilterCriteria { postal_prefix: Some("10".into()), ..FilterCriteria::default() };
        assert_eq!(filter(&list, &criteria).len(), 4);
        let criteria = FilterCriteria { postal_prefix: Some("107".into()), ..FilterCriteria::default() };
        assert_eq!(names(&filter(&list, &criteria)), vec!["Pho Saigon"]);
        // merged record falls back to the secondary zip code
        let criteria = FilterCriteria { postal_prefix: Some("109".into()), ..FilterCriteria::default() };
        assert_eq!(names(&filter(&list, &criteria)), vec!["Cafe X"]);

        let upper = Restaurant::Primary(primary("Uk", None, "SW1A", &[]));
        let criteria = FilterCriteria { postal_prefix: Some("sw".into()), ..FilterCriteria::default() };
        assert!(!criteria.matches(&upper));
    }

    #[test]
    fn tag_filter_never_matches_secondary_only() {
        let list = sample();
        for tag in ["Asian", "Grill", "Brunch", "Italian"] {
            let criteria = FilterCriteria { tag: Some(tag.into()), ..FilterCriteria::default() };
            let found = filter(&list, &criteria);
            assert!(found.iter().all(|r| !r.tags().is_empty()));
        }
        let criteria = FilterCriteria { tag: Some("Brunch".into()), ..FilterCriteria::default() };
        assert_eq!(names(&filter(&list, &criteria)), vec!["Cafe X"]);
    }

    #[test]
    fn search_is_case_insensitive_on_name() {
        let list = sample();
        let criteria = FilterCriteria { search: Some("TRATT".into()), ..FilterCriteria::default() };
        assert_eq!(names(&filter(&list, &criteria)), vec!["Trattoria"]);
    }

    #[test]
    fn criteria_combine_with_and_and_filter_is_idempotent() {
        let list = sample();
        let criteria = FilterCriteria {
            price_bucket: Some(1),
            postal_prefix: Some("10".into()),
            tag: Some("Soup".into()),
            search: Some("pho".into()),
        };
        let once = filter(&list, &criteria);
        assert_eq!(names(&once), vec!["Pho Saigon"]);
        assert_eq!(filter(&once, &criteria), once);
        assert_eq!(list, sample());
    }

    #[test]
    fn list_search_also_matches_tags() {
        let list = sample();
        assert_eq!(names(&search_restaurants(&list, "soup")), vec!["Pho Saigon"]);
        assert_eq!(names(&search_restaurants(&list, "steak")), vec!["Steakhaus"]);
    }

    #[test]
    fn deal_listings_flatten_and_sort_by_value() {
        let list = sample();
        let listings = deal_listings(&list);
        // three fixed deals at 12.0, trattoria 7.4, merged offer 4.0
        assert_eq!(listings.len(), 5);
        let values: Vec<f64> = listings.iter().map(|l| l.value).collect();
        assert_eq!(values, vec![12.0, 12.0, 12.0, 37.0 * 20.0 / 100.0, 4.0]);
        assert_eq!(listings[0].restaurant.name(), "Pho Saigon");
        assert!(matches!(
            listings[4].kind,
            DealKind::Discount { additional: true, .. }
        ));
        assert_eq!(listings[3].description(), "20% off food");
    }

    #[test]
    fn deal_filter_uses_description_exact_zip_and_all_tags() {
        let list = sample();
        let listings = deal_listings(&list);

        let by_description = DealCriteria { search: Some("LUNCH".into()), ..DealCriteria::default() };
        assert_eq!(filter_deals(&listings, &by_description).len(), 3);

        let by_zip = DealCriteria { postal_code: Some("107".into()), ..DealCriteria::default() };
        assert!(filter_deals(&listings, &by_zip).is_empty());
        let by_zip = DealCriteria { postal_code: Some("1070".into()), ..DealCriteria::default() };
        assert_eq!(filter_deals(&listings, &by_zip).len(), 1);

        let by_tags = DealCriteria {
            tags: vec!["Asian".into(), "Soup".into()],
            ..DealCriteria::default()
        };
        assert_eq!(filter_deals(&listings, &by_tags).len(), 1);
        let by_tags = DealCriteria {
            tags: vec!["Asian".into(), "Grill".into()],
            ..DealCriteria::default()
        };
        assert!(filter_deals(&listings, &by_tags).is_empty());
    }

    #[test]
    fn deal_filter_uses_the_restaurant_price_bucket() {
        let list = sample();
        let listings = deal_listings(&list);

        let cheap = DealCriteria { price_bucket: Some(1), ..DealCriteria::default() };
        let cheap = filter_deals(&listings, &cheap);
        assert_eq!(cheap.len(), 3);
        assert!(cheap.iter().all(|l| price_bucket(l.restaurant) == Some(1)));

        let mid = DealCriteria { price_bucket: Some(2), ..DealCriteria::default() };
        let mid = filter_deals(&listings, &mid);
        assert_eq!(mid.len(), 1);
        assert_eq!(mid[0].restaurant.name(), "Trattoria");
    }

    #[test]
    fn with_deals_drops_worthless_records() {
        let mut bare = primary("Bare", Some(1), "1010", &[]);
        bare.deals.clear();
        let list = vec![Restaurant::Primary(bare), sample().remove(0)];
        assert_eq!(names(&with_deals(&list)), vec!["Pho Saigon"]);
    }
}
