use serde::{Deserialize, Serialize};

/// One auction entry from the SkyBlock auction house.
///
/// Field names mirror the wire format, so the same type serves the page
/// payload and the on-disk snapshot document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub category: String,
    pub item_name: String,
    /// Opening bid in coins.
    pub starting_bid: u64,
}

/// Maturity level of a pet listing. Only the two flip-relevant levels are
/// tracked; everything in between is ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PetTier {
    Lvl1,
    Lvl100,
}

/// One row of the flip report: cheapest Lvl 1 against cheapest Lvl 100.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfitRecord {
    /// Display-cased pet name (first letter uppercased).
    pub pet_name: String,
    pub min_lvl1_price: u64,
    pub min_lvl100_price: u64,
    /// Negative when levelled pets sell below the starter price.
    pub net_profit: i64,
}
