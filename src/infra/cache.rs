//! Persistent on-disk caching of the auction snapshot with TTL expiry.

use std::{fs, io, path::PathBuf, time::Duration};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::Listing;

const SNAPSHOT_FILENAME: &str = "auction_cache.json";

/// Cache TTL: 1 hour. The auction house churns fast; older captures are
/// useless for flip hunting.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// One full auction-house capture. Replaced whole on every refresh, never
/// merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionSnapshot {
    /// Instant the paginated fetch completed.
    #[serde(rename = "timestamp", with = "time::serde::rfc3339")]
    pub fetched_at: OffsetDateTime,
    /// All listings, in source page order.
    #[serde(rename = "data")]
    pub listings: Vec<Listing>,
}

impl AuctionSnapshot {
    /// Wrap freshly fetched listings, stamping the completion instant.
    pub fn new(listings: Vec<Listing>) -> Self {
        Self {
            fetched_at: OffsetDateTime::now_utc(),
            listings,
        }
    }

    /// Snapshot age relative to `now`; zero if the clock went backwards.
    pub fn age(&self, now: OffsetDateTime) -> Duration {
        (now - self.fetched_at).try_into().unwrap_or(Duration::ZERO)
    }

    /// Human-readable age string.
    pub fn age_string(&self, now: OffsetDateTime) -> String {
        let secs = self.age(now).as_secs();
        if secs < 60 {
            format!("{secs}s")
        } else if secs < 3600 {
            format!("{}m", secs / 60)
        } else if secs < 86400 {
            format!("{}h", secs / 3600)
        } else {
            format!("{}d", secs / 86400)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CacheWriteError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

/// Owns the snapshot file; every read and write goes through here.
pub struct CacheStore {
    path: PathBuf,
    ttl: Duration,
}

impl CacheStore {
    pub fn new(path: PathBuf, ttl: Duration) -> Self {
        Self { path, ttl }
    }

    /// Load the persisted snapshot, if any. Every read failure counts as a
    /// cache miss: missing file, unreadable file, malformed JSON, bad
    /// timestamp.
    pub fn load(&self) -> Option<AuctionSnapshot> {
        if !self.path.exists() {
            println!("[cache] no snapshot at {}", self.path.display());
            return None;
        }

        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str::<AuctionSnapshot>(&content) {
                Ok(snapshot) => {
                    println!(
                        "[cache] loaded {} listings from {}",
                        snapshot.listings.len(),
                        self.path.display()
                    );
                    Some(snapshot)
                }
                Err(e) => {
                    println!("[cache] failed to parse snapshot: {e}");
                    None
                }
            },
            Err(e) => {
                println!("[cache] failed to read snapshot: {e}");
                None
            }
        }
    }

    /// True iff the snapshot is younger than the TTL. Age exactly equal to
    /// the TTL counts as stale.
    pub fn is_valid(&self, snapshot: &AuctionSnapshot, now: OffsetDateTime) -> bool {
        snapshot.age(now) < self.ttl
    }

    /// Replace the snapshot file in one step: write a sibling temp file,
    /// then rename over the target so a reader never sees a partial
    /// document.
    pub fn save(&self, snapshot: &AuctionSnapshot) -> Result<(), CacheWriteError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string(snapshot)?; // compact, a full capture can be large
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        println!(
            "[cache] saved {} listings to {}",
            snapshot.listings.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Platform cache file path, falling back to the working directory when no
/// home is available.
pub fn default_cache_path() -> PathBuf {
    ProjectDirs::from("com", "PetFlipScanner", "PetFlipScanner")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SNAPSHOT_FILENAME)
}
