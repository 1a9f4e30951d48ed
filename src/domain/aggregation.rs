//! Turns the flat listing stream into ranked pet flip records.

use std::collections::HashMap;

use super::entities::{Listing, PetTier, ProfitRecord};

/// Category tag the auction API uses for pet listings.
const PET_CATEGORY: &str = "pets";

/// The report only ever shows the ten best flips.
const TOP_RESULTS: usize = 10;

/// Split an item name into its pet base name and tier.
///
/// The check order matters: "lvl 1" is a prefix of "lvl 100", so the longer
/// marker is matched first to keep Lvl 100 listings out of the Lvl 1 bucket.
/// The base name is everything before the marker, lower-cased and trimmed.
pub fn split_tier(item_name: &str) -> Option<(String, PetTier)> {
    let lowered = item_name.to_lowercase();
    if let Some(idx) = lowered.find("lvl 100") {
        return Some((lowered[..idx].trim().to_string(), PetTier::Lvl100));
    }
    if let Some(idx) = lowered.find("lvl 1") {
        return Some((lowered[..idx].trim().to_string(), PetTier::Lvl1));
    }
    None
}

#[derive(Default)]
struct TierPrices {
    lvl1: Vec<u64>,
    lvl100: Vec<u64>,
}

/// Group pet listings by base name, pair the cheapest price of each tier,
/// and rank by net profit. At most [`TOP_RESULTS`] records come back,
/// descending; ties keep first-encounter order. Pets seen in only one tier
/// contribute nothing.
pub fn rank_pet_profits(listings: &[Listing]) -> Vec<ProfitRecord> {
    let mut prices: HashMap<String, TierPrices> = HashMap::new();
    let mut seen_order: Vec<String> = Vec::new();

    for listing in listings {
        if listing.category != PET_CATEGORY {
            continue;
        }
        let Some((pet_name, tier)) = split_tier(&listing.item_name) else {
            continue;
        };
        let entry = prices.entry(pet_name.clone()).or_insert_with(|| {
            seen_order.push(pet_name);
            TierPrices::default()
        });
        match tier {
            PetTier::Lvl1 => entry.lvl1.push(listing.starting_bid),
            PetTier::Lvl100 => entry.lvl100.push(listing.starting_bid),
        }
    }

    let mut records: Vec<ProfitRecord> = seen_order
        .iter()
        .filter_map(|name| {
            let tiers = &prices[name];
            let min_lvl1 = tiers.lvl1.iter().copied().min()?;
            let min_lvl100 = tiers.lvl100.iter().copied().min()?;
            Some(ProfitRecord {
                pet_name: display_case(name),
                min_lvl1_price: min_lvl1,
                min_lvl100_price: min_lvl100,
                net_profit: min_lvl100 as i64 - min_lvl1 as i64,
            })
        })
        .collect();

    // Stable sort, so equal profits stay in encounter order.
    records.sort_by(|a, b| b.net_profit.cmp(&a.net_profit));
    records.truncate(TOP_RESULTS);
    records
}

/// Uppercase the first letter; the grouping key is already lower-cased.
fn display_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
