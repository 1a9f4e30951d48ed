//! Domain logic for pet flip valuation lives here.

pub mod aggregation;
pub mod entities;

pub use aggregation::rank_pet_profits;
pub use entities::{Listing, ProfitRecord};
