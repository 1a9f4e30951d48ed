//! Report orchestration: cache first, network on miss, aggregate always.

use time::OffsetDateTime;

use crate::domain::{rank_pet_profits, ProfitRecord};
use crate::infra::cache::{AuctionSnapshot, CacheStore};
use crate::infra::hypixel::{fetch_all, AuctionPageSource};

/// Where the report's listings came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataSource {
    Fresh,
    Cached,
}

/// Ranked flip records plus provenance for the renderer.
pub struct ProfitReport {
    pub records: Vec<ProfitRecord>,
    pub fetched_at: OffsetDateTime,
    pub source: DataSource,
    pub listing_count: usize,
}

pub struct ReportProducer<S> {
    cache: CacheStore,
    source: S,
}

impl<S: AuctionPageSource> ReportProducer<S> {
    pub fn new(cache: CacheStore, source: S) -> Self {
        Self { cache, source }
    }

    /// Produce the ranked flip report, refreshing the snapshot when the
    /// cached one is missing or stale. An empty record list is a valid
    /// outcome, not an error.
    pub async fn generate(&self) -> ProfitReport {
        let (snapshot, source) = self.load_snapshot().await;
        let records = rank_pet_profits(&snapshot.listings);
        ProfitReport {
            records,
            fetched_at: snapshot.fetched_at,
            source,
            listing_count: snapshot.listings.len(),
        }
    }

    async fn load_snapshot(&self) -> (AuctionSnapshot, DataSource) {
        let now = OffsetDateTime::now_utc();
        if let Some(snapshot) = self.cache.load() {
            if self.cache.is_valid(&snapshot, now) {
                println!(
                    "[cache] using cached data (age: {})",
                    snapshot.age_string(now)
                );
                return (snapshot, DataSource::Cached);
            }
            println!(
                "[cache] snapshot stale (age: {}), refreshing",
                snapshot.age_string(now)
            );
        }

        let listings = fetch_all(&self.source).await;
        let snapshot = AuctionSnapshot::new(listings);
        // A failed write is only a warning; the fetched data is still good.
        if let Err(e) = self.cache.save(&snapshot) {
            eprintln!("[cache] warning: failed to save snapshot: {e}");
        }
        (snapshot, DataSource::Fresh)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tempfile::{tempdir, TempDir};

    use super::*;
    use crate::infra::hypixel::testing::{listing, CannedPage, FakeSource};

    fn store(dir: &TempDir) -> CacheStore {
        CacheStore::new(
            dir.path().join("auction_cache.json"),
            Duration::from_secs(3600),
        )
    }

    #[tokio::test]
    async fn partial_fetch_still_persists_a_snapshot() {
        let dir = tempdir().unwrap();
        let producer = ReportProducer::new(
            store(&dir),
            FakeSource::new(vec![
                CannedPage::Listings(
                    vec![
                        listing("pets", "Wolf lvl 1", 100),
                        listing("pets", "Wolf lvl 100", 900),
                    ],
                    Some(5),
                ),
                CannedPage::Failure,
            ]),
        );

        let report = producer.generate().await;
        assert_eq!(report.source, DataSource::Fresh);
        assert_eq!(report.listing_count, 2);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].net_profit, 800);

        let saved = store(&dir).load().expect("snapshot persisted");
        assert_eq!(saved.listings.len(), 2);
    }

    #[tokio::test]
    async fn valid_snapshot_short_circuits_the_fetch() {
        let dir = tempdir().unwrap();
        store(&dir)
            .save(&AuctionSnapshot::new(vec![
                listing("pets", "Ghost lvl 1", 50),
                listing("pets", "Ghost lvl 100", 60),
            ]))
            .unwrap();

        let producer = ReportProducer::new(store(&dir), FakeSource::new(vec![CannedPage::Failure]));
        let report = producer.generate().await;
        assert_eq!(report.source, DataSource::Cached);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].pet_name, "Ghost");
        assert_eq!(producer.source.calls(), 0);
    }

    #[tokio::test]
    async fn stale_snapshot_forces_a_refresh() {
        let dir = tempdir().unwrap();
        let stale = AuctionSnapshot {
            fetched_at: OffsetDateTime::now_utc() - time::Duration::hours(2),
            listings: vec![listing("pets", "Old lvl 1", 1)],
        };
        store(&dir).save(&stale).unwrap();

        let producer = ReportProducer::new(
            store(&dir),
            FakeSource::new(vec![CannedPage::Listings(
                vec![
                    listing("pets", "Bat lvl 1", 10),
                    listing("pets", "Bat lvl 100", 110),
                ],
                Some(1),
            )]),
        );

        let report = producer.generate().await;
        assert_eq!(report.source, DataSource::Fresh);
        assert_eq!(report.records[0].pet_name, "Bat");
        assert_eq!(store(&dir).load().unwrap().listings.len(), 2);
    }

    #[tokio::test]
    async fn empty_fetch_yields_an_empty_report() {
        let dir = tempdir().unwrap();
        let producer = ReportProducer::new(store(&dir), FakeSource::new(vec![CannedPage::Failure]));
        let report = producer.generate().await;
        assert_eq!(report.source, DataSource::Fresh);
        assert!(report.records.is_empty());
        assert_eq!(report.listing_count, 0);
    }
}
