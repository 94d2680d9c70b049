//! In-flight mutation registry
//!
//! At most one mutation per (view, target) may be outstanding. A lock lives
//! exactly as long as its guard, so it is held until the gateway call resolves
//! however long confirmation takes.

use agri_gateway_trait::CropDetails;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, trace};

use crate::error::{DashboardError, Result};
use crate::views::ViewKind;

/// What a mutation acts on, so the same crop or inspector is never submitted twice
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MutationTarget {
    Crop(u64),
    Inspector(String),
    /// New upload; only an identical form counts as a duplicate
    Draft(CropDetails),
}

impl fmt::Display for MutationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Crop(id) => write!(f, "crop #{}", id),
            Self::Inspector(address) => write!(f, "inspector {}", address),
            Self::Draft(details) => write!(f, "upload '{}'", details.name),
        }
    }
}

type MutationKey = (ViewKind, MutationTarget);

/// Guard that releases a mutation lock when dropped
pub struct MutationGuard {
    locks: MutationLocks,
    key: MutationKey,
}

impl MutationGuard {
    pub fn view(&self) -> ViewKind {
        self.key.0
    }

    pub fn target(&self) -> &MutationTarget {
        &self.key.1
    }
}

impl Drop for MutationGuard {
    fn drop(&mut self) {
        self.locks.release(&self.key);
    }
}

/// Registry of in-flight mutations keyed by (view, target)
#[derive(Clone, Default)]
pub struct MutationLocks {
    locks: Arc<Mutex<HashMap<MutationKey, Instant>>>,
}

impl MutationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock (view, target) for one submission
    ///
    /// Fails with `MutationInFlight` while another guard for the same key is alive.
    pub fn try_lock(&self, view: ViewKind, target: MutationTarget) -> Result<MutationGuard> {
        let mut locks = self.locks.lock();
        let key = (view, target);
        match locks.entry(key.clone()) {
            Entry::Occupied(since) => {
                debug!(
                    "Mutation on {} from {} view already in flight for {:?}",
                    key.1,
                    key.0,
                    since.get().elapsed()
                );
                Err(DashboardError::MutationInFlight {
                    view: key.0,
                    target: key.1.to_string(),
                })
            }
            Entry::Vacant(slot) => {
                slot.insert(Instant::now());
                trace!("Locked {} for {} view", key.1, key.0);
                Ok(MutationGuard {
                    locks: self.clone(),
                    key,
                })
            }
        }
    }

    pub fn is_locked(&self, view: ViewKind, target: &MutationTarget) -> bool {
        self.locks.lock().contains_key(&(view, target.clone()))
    }

    pub fn in_flight(&self) -> usize {
        self.locks.lock().len()
    }

    fn release(&self, key: &MutationKey) {
        if let Some(since) = self.locks.lock().remove(key) {
            trace!("Released {} for {} view after {:?}", key.1, key.0, since.elapsed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, quantity: u128) -> MutationTarget {
        MutationTarget::Draft(CropDetails {
            name: name.to_string(),
            crop_type: "Grain".to_string(),
            quantity,
            unit_price: 10,
            harvest_date: "2025-03-01".to_string(),
            fertilizer_used: String::new(),
            pesticide_used: String::new(),
            quality_grade: "A".to_string(),
            image_hash: String::new(),
            geo_location: String::new(),
        })
    }

    #[test]
    fn test_second_lock_rejected_until_drop() {
        let locks = MutationLocks::new();

        let first = locks.try_lock(ViewKind::Inspector, MutationTarget::Crop(1)).unwrap();
        let err = locks
            .try_lock(ViewKind::Inspector, MutationTarget::Crop(1))
            .err()
            .unwrap();
        assert!(matches!(err, DashboardError::MutationInFlight { view: ViewKind::Inspector, .. }));

        // Other targets and other views are independent
        let _other_crop = locks.try_lock(ViewKind::Inspector, MutationTarget::Crop(2)).unwrap();
        let _other_view = locks.try_lock(ViewKind::Consumer, MutationTarget::Crop(1)).unwrap();
        assert_eq!(locks.in_flight(), 3);

        drop(first);
        assert!(!locks.is_locked(ViewKind::Inspector, &MutationTarget::Crop(1)));
        assert!(locks.try_lock(ViewKind::Inspector, MutationTarget::Crop(1)).is_ok());
    }

    #[test]
    fn test_long_running_lock_is_never_released_early() {
        let locks = MutationLocks::new();
        let held = locks
            .try_lock(ViewKind::Owner, MutationTarget::Inspector("0xabc".to_string()))
            .unwrap();

        std::thread::sleep(std::time::Duration::from_millis(20));
        assert!(locks.is_locked(ViewKind::Owner, held.target()));
        assert!(
            locks
                .try_lock(ViewKind::Owner, MutationTarget::Inspector("0xabc".to_string()))
                .is_err()
        );
    }

    #[test]
    fn test_uploads_sharing_a_name_are_distinct() {
        let locks = MutationLocks::new();
        let _first = locks.try_lock(ViewKind::Farmer, draft("Wheat", 100)).unwrap();

        assert!(locks.try_lock(ViewKind::Farmer, draft("Wheat", 250)).is_ok());
        assert!(locks.try_lock(ViewKind::Farmer, draft("Wheat", 100)).is_err());
    }
}
