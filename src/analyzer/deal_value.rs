use crate::model::{Restaurant, SecondaryRestaurant};

/// Currency amount saved by a percentage offer on an average bill.
/// A missing or non-finite input contributes nothing.
pub fn estimated_savings(average_price: Option<f64>, discount_percentage: Option<f64>) -> f64 {
    match (average_price, discount_percentage) {
        (Some(price), Some(discount)) => {
            let savings = price * discount / 100.0;
            if savings.is_finite() && savings > 0.0 {
                savings
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

/// Savings of a secondary record's offer, 0 without one.
pub fn offer_value(secondary: &SecondaryRestaurant) -> f64 {
    secondary.offer.as_ref().map_or(0.0, |offer| {
        estimated_savings(secondary.average_price, offer.discount_percentage)
    })
}

/// Best deal a restaurant offers across both feeds, as a currency amount.
pub fn max_deal_value(restaurant: &Restaurant) -> f64 {
    let fixed = restaurant
        .deals()
        .iter()
        .map(|d| d.value)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);

    match restaurant.secondary() {
        Some(secondary) => fixed.max(offer_value(secondary)),
        None => fixed,
    }
}

/// Orders restaurants by [`max_deal_value`], highest first. Ties keep their
/// input order.
pub fn sort_by_deal_value(restaurants: &mut [Restaurant]) {
    restaurants.sort_by(|a, b| max_deal_value(b).total_cmp(&max_deal_value(a)));
}
