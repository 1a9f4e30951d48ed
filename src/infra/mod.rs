//! Outward-facing plumbing: the auction API client and the disk cache.

pub mod cache;
pub mod hypixel;
