//! Crop-related types

use super::account::Account;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Contract-assigned crop identifier
pub type CropId = u64;

/// Crop lifecycle status
///
/// Transitions only move forward: Uploaded -> Approved -> Sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CropStatus {
    /// Uploaded by a farmer, waiting for inspection
    Uploaded,
    /// Approved by an inspector and listed on the marketplace
    Approved,
    /// Bought by a consumer
    Sold,
}

impl fmt::Display for CropStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uploaded => write!(f, "Uploaded"),
            Self::Approved => write!(f, "Approved"),
            Self::Sold => write!(f, "Sold"),
        }
    }
}

impl CropStatus {
    /// The status the contract moves to next, if any
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Uploaded => Some(Self::Approved),
            Self::Approved => Some(Self::Sold),
            Self::Sold => None,
        }
    }

    /// Check whether `next` is the single legal forward step from `self`
    pub fn can_transition_to(self, next: Self) -> bool {
        self.next() == Some(next)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CropDetails {
    /// Crop name
    pub name: String,

    /// Crop type, free text (e.g. "Grain", "Vegetable")
    pub crop_type: String,

    /// Quantity in kg
    pub quantity: u128,

    /// Price per kg in wei
    pub unit_price: u128,

    /// Harvest date as entered by the farmer
    pub harvest_date: String,

    /// Fertilizer used, may be empty
    pub fertilizer_used: String,

    /// Pesticide used, may be empty
    pub pesticide_used: String,

    /// Quality grade ("A", "B", "C")
    pub quality_grade: String,

    /// IPFS hash of the crop image, may be empty
    pub image_hash: String,

    /// Free-text geolocation, may be empty
    pub geo_location: String,
}

impl CropDetails {
    /// Total price in wei, unit price times quantity
    ///
    /// Always recomputed, never stored. `None` if the product does not fit in
    /// 128 bits; the contract would revert on such a purchase anyway.
    pub fn total_price(&self) -> Option<u128> {
        self.unit_price.checked_mul(self.quantity)
    }
}

/// A crop as mirrored from the contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crop {
    /// Unique identifier
    pub id: CropId,

    /// Account that uploaded the crop
    pub farmer: Account,

    /// Immutable crop details
    pub details: CropDetails,

    /// Lifecycle status
    pub status: CropStatus,

    /// Purchasing account, set once the crop is sold
    pub buyer: Option<Account>,
}

impl Crop {
    /// Check whether `account` uploaded this crop
    pub fn is_farmed_by(&self, account: &Account) -> bool {
        self.farmer == *account
    }

    pub fn is_pending(&self) -> bool {
        self.status == CropStatus::Uploaded
    }

    pub fn is_listed(&self) -> bool {
        self.status == CropStatus::Approved
    }

    pub fn total_price(&self) -> Option<u128> {
        self.details.total_price()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(quantity: u128, unit_price: u128) -> CropDetails {
        CropDetails {
            name: "Wheat".to_string(),
            crop_type: "Grain".to_string(),
            quantity,
            unit_price,
            harvest_date: "2025-06-01".to_string(),
            fertilizer_used: String::new(),
            pesticide_used: String::new(),
            quality_grade: "A".to_string(),
            image_hash: String::new(),
            geo_location: String::new(),
        }
    }

    #[test]
    fn test_total_price() {
        assert_eq!(details(100, 2_000_000_000_000_000).total_price(), Some(200_000_000_000_000_000));
        assert_eq!(details(0, 5).total_price(), Some(0));
        assert_eq!(details(u128::MAX, 2).total_price(), None);
    }

    #[test]
    fn test_status_transitions() {
        assert!(CropStatus::Uploaded.can_transition_to(CropStatus::Approved));
        assert!(CropStatus::Approved.can_transition_to(CropStatus::Sold));
        assert!(!CropStatus::Uploaded.can_transition_to(CropStatus::Sold));
        assert!(!CropStatus::Approved.can_transition_to(CropStatus::Uploaded));
        assert!(!CropStatus::Sold.can_transition_to(CropStatus::Approved));
        assert_eq!(CropStatus::Sold.next(), None);
    }

    #[test]
    fn test_is_farmed_by_ignores_case() {
        let farmer = Account::parse("0x70997970C51812dc3A010C7d01b50e0d17dc79C8").unwrap();
        let crop = Crop {
            id: 0,
            farmer: farmer.clone(),
            details: details(1, 1),
            status: CropStatus::Uploaded,
            buyer: None,
        };
        let lower = Account::parse(&farmer.to_lowercase()).unwrap();
        assert!(crop.is_farmed_by(&lower));
        assert!(crop.is_pending());
    }
}
