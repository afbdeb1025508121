use crate::model::{
    Coordinates, Deal, MarketingOffer, PrimaryRestaurant, Rating, RecordId, SecondaryRestaurant,
    StreetAddress,
};
use crate::parser::thefork_parser::RawMarketingOffer;
use crate::parser::{RawPrimaryRestaurant, RawSecondaryRestaurant};
use tracing::{debug, warn};

pub fn normalize_primary_all(raw: Vec<RawPrimaryRestaurant>) -> Vec<PrimaryRestaurant> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, record)| normalize_primary(record, index))
        .collect()
}

pub fn normalize_secondary_all(raw: Vec<RawSecondaryRestaurant>) -> Vec<SecondaryRestaurant> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, record)| normalize_secondary(record, index))
        .collect()
}

/// Maps a Neotaste record. `index` keys records that arrive without a uuid.
/// Returns `None` only when the record has no usable name.
pub fn normalize_primary(raw: RawPrimaryRestaurant, index: usize) -> Option<PrimaryRestaurant> {
    let Some(name) = non_blank(raw.name) else {
        warn!("Dropping primary record #{} without a name", index);
        return None;
    };

    let key = non_blank(raw.uuid).unwrap_or_else(|| format!("#{}", index));

    Some(PrimaryRestaurant {
        id: RecordId::primary(key),
        name,
        address: raw.address.unwrap_or_default().trim().to_string(),
        postal_code: raw.zip_code.unwrap_or_default().trim().to_string(),
        coordinates: coordinates(raw.latitude, raw.longitude),
        price_range: price_range(raw.price_range),
        rating: rating(raw.avg_rating, raw.ratings_count),
        tags: raw
            .tags
            .into_iter()
            .filter_map(|t| non_blank(t.name))
            .collect(),
        deals: raw
            .deals
            .into_iter()
            .map(|d| Deal {
                name: d.name.unwrap_or_default(),
                value: d.value.filter(|v| *v >= 0.0).unwrap_or(0.0),
                conditions: d.conditions.unwrap_or_default(),
                location_condition: d.location_condition.unwrap_or_default(),
                days_to_reset: d.days_to_reset.filter(|d| *d >= 0.0).map(|d| d.round() as u32),
                status: d.status.unwrap_or_default(),
            })
            .collect(),
        images: raw.images.into_iter().filter(|i| !i.trim().is_empty()).collect(),
    })
}

/// Maps a TheFork record. Same contract as [`normalize_primary`].
pub fn normalize_secondary(raw: RawSecondaryRestaurant, index: usize) -> Option<SecondaryRestaurant> {
    let Some(name) = non_blank(raw.name) else {
        warn!("Dropping secondary record #{} without a name", index);
        return None;
    };

    let key = non_blank(raw.id).unwrap_or_else(|| format!("#{}", index));

    let mut photos: Vec<String> = raw.photos.into_iter().filter(|p| !p.trim().is_empty()).collect();
    if photos.is_empty() {
        if let Some(main) = non_blank(raw.main_photo_url) {
            photos.push(main);
        }
    }

    Some(SecondaryRestaurant {
        id: RecordId::secondary(key),
        name,
        address: StreetAddress {
            street: raw.address.street.unwrap_or_default().trim().to_string(),
            zip_code: raw.address.zip_code.unwrap_or_default().trim().to_string(),
            locality: raw.address.locality.unwrap_or_default().trim().to_string(),
            country: raw.address.country.unwrap_or_default().trim().to_string(),
        },
        coordinates: coordinates(raw.geolocation.latitude, raw.geolocation.longitude),
        average_price: raw.average_price.filter(|p| *p >= 0.0),
        rating: rating(raw.rating, raw.review_count),
        cuisine: non_blank(raw.cuisine),
        slug: non_blank(raw.slug),
        offer: raw.marketing_offer.and_then(marketing_offer),
        photos,
    })
}

fn marketing_offer(raw: RawMarketingOffer) -> Option<MarketingOffer> {
    if raw.label.is_none() && raw.title.is_none() && raw.discount_percentage.is_none() {
        return None;
    }
    Some(MarketingOffer {
        label: raw.label.unwrap_or_default(),
        title: raw.title.unwrap_or_default(),
        offer_type: raw.offer_type,
        discount_percentage: raw.discount_percentage,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Option<Coordinates> {
    match (latitude, longitude) {
        (Some(latitude), Some(longitude))
            if (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude) =>
        {
            Some(Coordinates { latitude, longitude })
        }
        _ => None,
    }
}

/// Only the integers 1-4 are price ranges; `2.4` is not.
fn price_range(raw: Option<f64>) -> Option<u8> {
    let range = raw?;
    if range.fract() == 0.0 && (1.0..=4.0).contains(&range) {
        Some(range as u8)
    } else {
        debug!("Ignoring invalid price range {}", range);
        None
    }
}

fn rating(score: Option<f64>, count: Option<f64>) -> Rating {
    Rating {
        score,
        count: count.filter(|c| *c >= 0.0).map_or(0, |c| c.round() as u32),
    }
}
