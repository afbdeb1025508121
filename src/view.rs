// View models for the map, card list and image gallery
use crate::analyzer::deal_value::estimated_savings;
use crate::model::{Coordinates, Deal, MarketingOffer, RecordId, Restaurant};
use std::fmt;

pub const PLACEHOLDER_IMAGE: &str = "/api/placeholder/400/200";

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub id: RecordId,
    pub name: String,
    pub coordinates: Coordinates,
    pub popup: Vec<String>,
}

/// Markers for every restaurant that has coordinates. Records without
/// them are skipped.
pub fn map_markers(restaurants: &[Restaurant]) -> Vec<MapMarker> {
    restaurants
        .iter()
        .filter_map(|r| {
            let coordinates = r.coordinates()?;
            let deals = r.deals().iter().map(|d| d.name.as_str()).collect::<Vec<_>>();
            Some(MapMarker {
                id: r.id().clone(),
                name: r.name().to_string(),
                coordinates,
                popup: vec![
                    format!("Rating: {}", rating_text(r)),
                    format!("Price: {}", PriceLabel::of(r)),
                    format!("Tags: {}", r.tags().join(", ")),
                    format!(
                        "Deals: {}",
                        if deals.is_empty() { "None".to_string() } else { deals.join(", ") }
                    ),
                ],
            })
        })
        .collect()
}

/// Price as shown on a card. Range and average price are separate signals
/// and stay separate here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceLabel {
    Range(u8),
    Average(f64),
    Unknown,
}

impl PriceLabel {
    pub fn of(restaurant: &Restaurant) -> Self {
        if let Some(range) = restaurant.primary().and_then(|p| p.price_range) {
            return PriceLabel::Range(range);
        }
        match restaurant.secondary().and_then(|s| s.average_price) {
            Some(price) => PriceLabel::Average(price),
            None => PriceLabel::Unknown,
        }
    }
}

impl fmt::Display for PriceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceLabel::Range(range) => write!(f, "{}", "€".repeat(usize::from(*range))),
            PriceLabel::Average(price) => write!(f, "€{}", price),
            PriceLabel::Unknown => write!(f, "n/a"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DealCard {
    pub title: String,
    /// `Value: €12.00` or `Discount: 30%`.
    pub headline: String,
    pub details: Vec<String>,
    pub footer: Vec<String>,
    pub source: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantCard {
    pub id: RecordId,
    pub name: String,
    pub price: PriceLabel,
    pub rating: String,
    pub address: String,
    pub image: String,
    pub in_both_datasets: bool,
    pub deals: Vec<DealCard>,
}

impl RestaurantCard {
    pub fn of(restaurant: &Restaurant) -> Self {
        Self {
            id: restaurant.id().clone(),
            name: restaurant.name().to_string(),
            price: PriceLabel::of(restaurant),
            rating: rating_text(restaurant),
            address: address_line(restaurant),
            image: restaurant
                .images()
                .first()
                .cloned()
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            in_both_datasets: restaurant.in_both_datasets(),
            deals: deal_cards(restaurant),
        }
    }
}

fn rating_text(restaurant: &Restaurant) -> String {
    let rating = restaurant.rating();
    match rating.score {
        Some(score) => format!("{:.1} ({} ratings)", score, rating.count),
        None => "N/A".to_string(),
    }
}

fn address_line(restaurant: &Restaurant) -> String {
    match restaurant {
        Restaurant::Primary(p) | Restaurant::Merged { primary: p, .. } if !p.address.is_empty() => {
            if p.postal_code.is_empty() {
                p.address.clone()
            } else {
                format!("{}, {}", p.address, p.postal_code)
            }
        }
        _ => restaurant
            .secondary()
            .map(|s| s.address.display_line())
            .unwrap_or_default(),
    }
}

/// Fixed deals by value, then the secondary offer, labelled by where it
/// came from.
pub fn deal_cards(restaurant: &Restaurant) -> Vec<DealCard> {
    let mut deals: Vec<&Deal> = restaurant.deals().iter().collect();
    deals.sort_by(|a, b| b.value.total_cmp(&a.value));

    let mut cards: Vec<DealCard> = deals.into_iter().map(fixed_deal_card).collect();

    match restaurant {
        Restaurant::Secondary(s) => {
            if let Some(offer) = &s.offer {
                cards.push(offer_card(offer, s.average_price, "TheFork"));
            }
        }
        Restaurant::Merged { secondary, .. } => {
            if let Some(offer) = &secondary.offer {
                cards.push(offer_card(offer, secondary.average_price, "TheFork (Additional)"));
            }
        }
        Restaurant::Primary(_) => {}
    }
    cards
}

fn fixed_deal_card(deal: &Deal) -> DealCard {
    let mut footer = vec![format!("Location: {}", deal.location_condition)];
    if let Some(days) = deal.days_to_reset {
        footer.push(format!("Reset: {} days", days));
    }
    footer.push(deal.status.clone());
    footer.push("Source: Neotaste".to_string());

    DealCard {
        title: deal.name.clone(),
        headline: format!("Value: €{:.2}", deal.value),
        details: format_conditions(&deal.conditions),
        footer,
        source: "Neotaste",
    }
}

fn offer_card(offer: &MarketingOffer, average_price: Option<f64>, source: &'static str) -> DealCard {
    let discount = offer
        .discount_percentage
        .map_or_else(|| "n/a".to_string(), |d| format!("{}%", d));
    let savings = estimated_savings(average_price, offer.discount_percentage);

    DealCard {
        title: offer.label.clone(),
        headline: format!("Discount: {}", discount),
        details: if offer.title.is_empty() { Vec::new() } else { vec![offer.title.clone()] },
        footer: vec![
            format!("Estimated Savings: €{:.2}", savings),
            format!("Source: {}", source),
        ],
        source,
    }
}

/// Splits free-text conditions into sentences, each ending with a period.
pub fn format_conditions(conditions: &str) -> Vec<String> {
    conditions
        .split(". ")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.ends_with('.') {
                s.to_string()
            } else {
                format!("{}.", s)
            }
        })
        .collect()
}

/// Previous/next paging over a restaurant's images.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageGallery {
    images: Vec<String>,
    index: usize,
}

impl ImageGallery {
    pub fn of(restaurant: &Restaurant) -> Self {
        Self::new(restaurant.images().to_vec())
    }

    pub fn new(images: Vec<String>) -> Self {
        Self { images, index: 0 }
    }

    pub fn current(&self) -> &str {
        self.images
            .get(self.index)
            .map_or(PLACEHOLDER_IMAGE, String::as_str)
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.images.len()
    }

    /// Returns `false` and stays put at the last image.
    pub fn next(&mut self) -> bool {
        if self.has_next() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Returns `false` and stays put at the first image.
    pub fn previous(&mut self) -> bool {
        if self.has_previous() {
            self.index -= 1;
            true
        } else {
            false
        }
    }
}
