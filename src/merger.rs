// Merging the two feeds: same name and street means same restaurant
use crate::model::{PrimaryRestaurant, Restaurant, SecondaryRestaurant};
use tracing::debug;

/// Two records are the same restaurant when their names are equal ignoring
/// case and the primary address contains the secondary street, also ignoring
/// case. The first such primary in list order is the match.
///
/// Returns every primary record in its original order, with matched
/// secondary records attached, followed by the unmatched secondary records.
///
/// A primary record takes at most one attachment. When a later secondary
/// record resolves to a primary that is already merged, it is kept as a
/// standalone entity instead of replacing the first attachment.
pub fn merge(primary: &[PrimaryRestaurant], secondary: &[SecondaryRestaurant]) -> Vec<Restaurant> {
    let keys: Vec<(String, String)> = primary
        .iter()
        .map(|p| (p.name.to_lowercase(), p.address.to_lowercase()))
        .collect();

    let mut attached: Vec<Option<&SecondaryRestaurant>> = vec![None; primary.len()];
    let mut standalone: Vec<&SecondaryRestaurant> = Vec::new();

    for candidate in secondary {
        let name = candidate.name.to_lowercase();
        let street = candidate.address.street.to_lowercase();
        let found = keys
            .iter()
            .position(|(n, address)| keys_match(n, address, &name, &street));

        match found {
            Some(index) if attached[index].is_none() => attached[index] = Some(candidate),
            Some(index) => {
                debug!(
                    "{} already carries {}; keeping {} standalone",
                    primary[index].id,
                    attached[index].map_or_else(String::new, |s| s.id.to_string()),
                    candidate.id
                );
                standalone.push(candidate);
            }
            None => standalone.push(candidate),
        }
    }

    primary
        .iter()
        .zip(attached)
        .map(|(p, s)| match s {
            Some(s) => Restaurant::Merged {
                primary: p.clone(),
                secondary: s.clone(),
            },
            None => Restaurant::Primary(p.clone()),
        })
        .chain(standalone.into_iter().cloned().map(Restaurant::Secondary))
        .collect()
}

/// Same matching rule as [`merge`], for a single pair.
pub fn is_same_restaurant(primary: &PrimaryRestaurant, secondary: &SecondaryRestaurant) -> bool {
    keys_match(
        &primary.name.to_lowercase(),
        &primary.address.to_lowercase(),
        &secondary.name.to_lowercase(),
        &secondary.address.street.to_lowercase(),
    )
}

// All arguments already lowercased.
fn keys_match(name: &str, address: &str, other_name: &str, street: &str) -> bool {
    name == other_name && address.contains(street)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Rating, RecordId, Source, StreetAddress};

    fn primary(id: &str, name: &str, address: &str) -> PrimaryRestaurant {
        PrimaryRestaurant {
            id: RecordId::primary(id),
            name: name.to_owned(),
            address: address.to_owned(),
            postal_code: "1010".to_owned(),
            coordinates: None,
            price_range: Some(2),
            rating: Rating::default(),
            tags: vec!["Brunch".to_owned()],
            deals: Vec::new(),
            images: Vec::new(),
        }
    }

    fn secondary(id: &str, name: &str, street: &str) -> SecondaryRestaurant {
        SecondaryRestaurant {
            id: RecordId::secondary(id),
            name: name.to_owned(),
            address: StreetAddress {
                street: street.to_owned(),
                ..StreetAddress::default()
            },
            coordinates: None,
            average_price: Some(30.0),
            rating: Rating::default(),
            cuisine: None,
            slug: None,
            offer: None,
            photos: Vec::new(),
        }
    }

    #[test]
    fn empty_secondary_keeps_primary_list_in_order() {
        let p = vec![primary("1", "A", "x"), primary("2", "B", "y")];
        let merged = merge(&p, &[]);
        assert_eq!(
            merged,
            vec![Restaurant::Primary(p[0].clone()), Restaurant::Primary(p[1].clone())]
        );
    }

    #[test]
    fn empty_primary_makes_every_secondary_standalone() {
        let s = vec![secondary("1", "A", "x"), secondary("2", "B", "y")];
        let merged = merge(&[], &s);
        assert_eq!(merged.len(), 2);
        assert!(merged.iter().all(|r| r.source() == Source::Secondary));
    }

    #[test]
    fn matching_name_and_street_merges() {
        let p = vec![primary("p", "Cafe X", "12 Main St")];
        let s = vec![secondary("s", "cafe x", "Main St")];
        let merged = merge(&p, &s);
        assert_eq!(merged.len(), 1);
        assert!(merged[0].in_both_datasets());
        assert_eq!(merged[0].id(), &RecordId::primary("p"));
        assert_eq!(merged[0].secondary_data().unwrap().id, RecordId::secondary("s"));
    }

    #[test]
    fn different_street_keeps_records_apart() {
        let p = vec![primary("p", "Cafe X", "12 Main St")];
        let s = vec![secondary("s", "cafe x", "Oak Ave")];
        let merged = merge(&p, &s);
        assert_eq!(merged.len(), 2);
        assert!(!merged[0].in_both_datasets());
        assert_eq!(merged[1].source(), Source::Secondary);
    }

    #[test]
    fn name_must_match_exactly_after_lowercasing() {
        let p = vec![primary("p", "Cafe X Bar", "12 Main St")];
        let s = vec![secondary("s", "Cafe X", "Main St")];
        assert_eq!(merge(&p, &s).len(), 2);
    }

    #[test]
    fn first_primary_in_order_wins() {
        let p = vec![
            primary("p1", "Twin", "1 Main St"),
            primary("p2", "Twin", "2 Main St"),
        ];
        let s = vec![secondary("s", "twin", "main st")];
        let merged = merge(&p, &s);
        assert!(merged[0].in_both_datasets());
        assert!(!merged[1].in_both_datasets());
    }

    #[test]
    fn second_match_on_same_primary_stays_standalone() {
        let p = vec![primary("p", "Cafe X", "12 Main St")];
        let s = vec![
            secondary("s1", "Cafe X", "Main St"),
            secondary("s2", "CAFE X", "12 Main"),
        ];
        let merged = merge(&p, &s);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].secondary_data().unwrap().id, RecordId::secondary("s1"));
        assert_eq!(merged[1].id(), &RecordId::secondary("s2"));
    }

    #[test]
    fn inputs_are_not_modified() {
        let p = vec![primary("p", "Cafe X", "12 Main St")];
        let s = vec![secondary("s", "cafe x", "Main St")];
        let before = p.clone();
        let _ = merge(&p, &s);
        assert_eq!(p, before);
        assert_eq!(merge(&p, &s), merge(&p, &s));
    }

    #[test]
    fn pair_predicate_matches_merge_rule() {
        let p = primary("p", "Cafe X", "12 Main St");
        assert!(is_same_restaurant(&p, &secondary("s", "CAFE x", "MAIN st")));
        assert!(!is_same_restaurant(&p, &secondary("s", "Cafe X", "Oak Ave")));
    }

    #[test]
    fn merge_attaches_exactly_when_pair_predicate_holds() {
        let p = primary("p", "Café Ö", "12 Main St");
        let candidates = [
            secondary("a", "CAFÉ ö", "main st"),
            secondary("b", "Café Ö", ""),
            secondary("c", "Café Ö", "Main St 12"),
            secondary("d", "Cafe O", "Main St"),
        ];
        for s in &candidates {
            let merged = merge(std::slice::from_ref(&p), std::slice::from_ref(s));
            assert_eq!(
                merged[0].in_both_datasets(),
                is_same_restaurant(&p, s),
                "{}",
                s.id
            );
        }
    }
}
