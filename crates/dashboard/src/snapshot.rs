//! Crop snapshot loader
//!
//! The snapshot is a full, ordered copy of every crop on the contract. It is
//! replaced wholesale on each successful load and never merged. Loads race
//! freely; each takes a generation number and only the newest one started
//! may commit.

use agri_gateway_trait::{Crop, CropGateway, GatewayError};
use chrono::{DateTime, Utc};
use futures::{StreamExt, TryStreamExt, stream};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

pub const DEFAULT_LOAD_CONCURRENCY: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    /// Crops in ascending id order
    pub crops: Vec<Crop>,
    /// Generation of the load that produced this snapshot; 0 if never loaded
    pub generation: u64,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }
}

/// Result of one reload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The snapshot now holds `crops` crops from this load
    Loaded { generation: u64, crops: usize },
    /// A newer load or a reset started first; this result was dropped
    Superseded { generation: u64 },
    /// A read failed; the previous snapshot is kept
    Failed { generation: u64, error: String },
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    pub fn generation(&self) -> u64 {
        match self {
            Self::Loaded { generation, .. } | Self::Superseded { generation } | Self::Failed { generation, .. } => {
                *generation
            }
        }
    }
}

/// Shared loader handle; clones see the same snapshot
pub struct SnapshotLoader<G> {
    gateway: Arc<G>,
    snapshot: Arc<RwLock<Snapshot>>,
    generation: Arc<AtomicU64>,
    concurrency: usize,
}

impl<G> Clone for SnapshotLoader<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            snapshot: self.snapshot.clone(),
            generation: self.generation.clone(),
            concurrency: self.concurrency,
        }
    }
}

impl<G: CropGateway> SnapshotLoader<G> {
    pub fn new(gateway: Arc<G>, concurrency: usize) -> Self {
        Self {
            gateway,
            snapshot: Arc::new(RwLock::new(Snapshot::default())),
            generation: Arc::new(AtomicU64::new(0)),
            concurrency: concurrency.max(1),
        }
    }

    /// Fetch every crop and replace the snapshot if no newer load started meanwhile
    pub async fn reload(&self) -> LoadOutcome {
        let generation = self.begin_load();
        self.complete_load(generation).await
    }

    /// Claim the next generation without fetching anything yet
    ///
    /// Lets a caller order the claim against its own state changes; any
    /// `reset` or load begun after this supersedes it.
    pub fn begin_load(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Starting crop load (generation {})", generation);
        generation
    }

    /// Fetch for a generation from `begin_load` and commit if it is still the newest
    pub async fn complete_load(&self, generation: u64) -> LoadOutcome {
        let crops = match self.fetch_all().await {
            Ok(crops) => crops,
            Err(e) => {
                warn!("Crop load (generation {}) failed, keeping previous snapshot: {}", generation, e);
                return LoadOutcome::Failed {
                    generation,
                    error: e.to_string(),
                };
            }
        };

        let mut snapshot = self.snapshot.write();
        // Checked under the write lock so a newer load can't commit in between
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Discarding superseded crop load (generation {})", generation);
            return LoadOutcome::Superseded { generation };
        }

        let count = crops.len();
        *snapshot = Snapshot {
            crops,
            generation,
            loaded_at: Some(Utc::now()),
        };
        info!("Loaded {} crops (generation {})", count, generation);
        LoadOutcome::Loaded {
            generation,
            crops: count,
        }
    }

    /// Empty the snapshot and invalidate loads in flight
    pub fn reset(&self) {
        let mut snapshot = self.snapshot.write();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *snapshot = Snapshot::default();
        debug!("Snapshot reset (generation {})", generation);
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.read().clone()
    }

    /// Borrow the crops without copying the snapshot
    pub fn with_crops<R>(&self, f: impl FnOnce(&[Crop]) -> R) -> R {
        f(&self.snapshot.read().crops)
    }

    async fn fetch_all(&self) -> Result<Vec<Crop>, GatewayError> {
        let count = self.gateway.crop_count().await.map_err(Into::<GatewayError>::into)?;
        let gateway = &self.gateway;

        // buffered keeps results in id order while running reads in parallel
        stream::iter(0..count)
            .map(|id| async move { gateway.crop(id).await.map_err(Into::<GatewayError>::into) })
            .buffered(self.concurrency)
            .try_collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryGateway;
    use agri_gateway_trait::{Account, CropDetails, CropStatus};
    use std::time::Duration;

    const OWNER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
    const FARMER: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

    fn account(address: &str) -> Account {
        Account::parse(address).unwrap()
    }

    fn details(name: &str) -> CropDetails {
        CropDetails {
            name: name.to_string(),
            crop_type: "Pulse".to_string(),
            quantity: 5,
            unit_price: 40,
            harvest_date: "2025-02-14".to_string(),
            fertilizer_used: String::new(),
            pesticide_used: String::new(),
            quality_grade: "A".to_string(),
            image_hash: String::new(),
            geo_location: String::new(),
        }
    }

    fn seeded(count: usize) -> Arc<MemoryGateway> {
        let gateway = MemoryGateway::new(account(OWNER));
        for i in 0..count {
            gateway.seed_crop(account(FARMER), details(&format!("Lentil {}", i)), CropStatus::Uploaded, None);
        }
        Arc::new(gateway)
    }

    #[tokio::test]
    async fn test_reload_keeps_id_order() {
        let loader = SnapshotLoader::new(seeded(20), 3);
        let outcome = loader.reload().await;
        assert_eq!(
            outcome,
            LoadOutcome::Loaded {
                generation: 1,
                crops: 20
            }
        );

        let snapshot = loader.snapshot();
        assert!(snapshot.is_loaded());
        let ids: Vec<u64> = snapshot.crops.iter().map(|c| c.id).collect();
        assert_eq!(ids, (0..20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_snapshot() {
        let gateway = seeded(2);
        let loader = SnapshotLoader::new(gateway.clone(), DEFAULT_LOAD_CONCURRENCY);
        assert!(loader.reload().await.is_loaded());

        gateway.fail_reads(true);
        let outcome = loader.reload().await;
        assert!(matches!(outcome, LoadOutcome::Failed { generation: 2, .. }));
        assert_eq!(loader.snapshot().crops.len(), 2);
        assert_eq!(loader.snapshot().generation, 1);
    }

    #[tokio::test]
    async fn test_reset_discards_in_flight_load() {
        let gateway = seeded(1);
        let loader = SnapshotLoader::new(gateway.clone(), DEFAULT_LOAD_CONCURRENCY);
        gateway.set_read_delay(Duration::from_millis(100));

        let in_flight = tokio::spawn({
            let loader = loader.clone();
            async move { loader.reload().await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        loader.reset();

        assert!(matches!(in_flight.await.unwrap(), LoadOutcome::Superseded { .. }));
        assert_eq!(loader.snapshot(), Snapshot::default());
    }
}
