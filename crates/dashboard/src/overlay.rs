//! Client-local disapproval overlay
//!
//! Hides crops from the inspector's pending list without touching the
//! contract. The overlay is not authoritative: a disapproved crop stays
//! `Uploaded` on-chain, stays visible to every other client, and reappears
//! here after a restart or a wallet disconnect.

use agri_gateway_trait::CropId;
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct DisapprovalOverlay {
    hidden: HashSet<CropId>,
}

impl DisapprovalOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hide a crop; returns false if it was already hidden
    pub fn disapprove(&mut self, id: CropId) -> bool {
        self.hidden.insert(id)
    }

    /// Stop hiding a crop, e.g. once it has been approved
    pub fn release(&mut self, id: CropId) -> bool {
        self.hidden.remove(&id)
    }

    pub fn contains(&self, id: CropId) -> bool {
        self.hidden.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.hidden.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hidden.is_empty()
    }

    pub fn clear(&mut self) {
        self.hidden.clear();
    }

    /// Hidden ids in ascending order
    pub fn ids(&self) -> Vec<CropId> {
        let mut ids: Vec<CropId> = self.hidden.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}
