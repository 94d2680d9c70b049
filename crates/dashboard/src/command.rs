//! Commands issued from the role views and their outcomes

use agri_gateway_trait::{Account, CropDetails, CropId, TxReceipt};
use std::fmt;

use crate::error::{DashboardError, Result};
use crate::mutation::MutationTarget;
use crate::snapshot::LoadOutcome;
use crate::views::ViewKind;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Farmer: list a new crop
    UploadCrop(CropDetails),
    /// Inspector: approve an uploaded crop
    ApproveCrop(CropId),
    /// Inspector: hide a crop locally, never sent to the contract
    Disapprove(CropId),
    /// Consumer: buy an approved crop at its total price
    BuyCrop(CropId),
    /// Owner: register an inspector
    AddInspector(Account),
}

impl Command {
    /// View the command is issued from; role gating follows from it
    pub fn view(&self) -> ViewKind {
        match self {
            Self::UploadCrop(_) => ViewKind::Farmer,
            Self::ApproveCrop(_) | Self::Disapprove(_) => ViewKind::Inspector,
            Self::BuyCrop(_) => ViewKind::Consumer,
            Self::AddInspector(_) => ViewKind::Owner,
        }
    }

    pub fn target(&self) -> MutationTarget {
        match self {
            Self::UploadCrop(details) => MutationTarget::Draft(details.clone()),
            Self::ApproveCrop(id) | Self::Disapprove(id) | Self::BuyCrop(id) => MutationTarget::Crop(*id),
            Self::AddInspector(account) => MutationTarget::Inspector(account.to_lowercase()),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UploadCrop(details) => write!(f, "upload '{}'", details.name),
            Self::ApproveCrop(id) => write!(f, "approve crop #{}", id),
            Self::Disapprove(id) => write!(f, "disapprove crop #{}", id),
            Self::BuyCrop(id) => write!(f, "buy crop #{}", id),
            Self::AddInspector(account) => write!(f, "add inspector {}", account),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// The transaction was confirmed. `reload` is `None` when the session
    /// changed before confirmation and the snapshot was left alone.
    Confirmed {
        receipt: TxReceipt,
        reload: Option<LoadOutcome>,
    },
    /// The transaction was sent but never seen confirmed; state was re-read
    Unconfirmed {
        tx_hash: String,
        reload: Option<LoadOutcome>,
    },
    /// The crop is now hidden from the pending list
    Disapproved { id: CropId, newly_hidden: bool },
}

/// Reject upload forms the contract would accept but no one could use
pub fn validate_upload(details: &CropDetails) -> Result<()> {
    let required = [
        ("name", &details.name),
        ("crop type", &details.crop_type),
        ("harvest date", &details.harvest_date),
        ("quality grade", &details.quality_grade),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(DashboardError::InvalidInput(format!("{} is required", field)));
        }
    }
    if details.quantity == 0 {
        return Err(DashboardError::InvalidInput("quantity must be positive".to_string()));
    }
    if details.unit_price == 0 {
        return Err(DashboardError::InvalidInput("price must be positive".to_string()));
    }
    if details.total_price().is_none() {
        return Err(DashboardError::InvalidInput(
            "quantity times price does not fit in a payment".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> CropDetails {
        CropDetails {
            name: "Sorghum".to_string(),
            crop_type: "Grain".to_string(),
            quantity: 12,
            unit_price: 7,
            harvest_date: "2025-01-30".to_string(),
            fertilizer_used: String::new(),
            pesticide_used: String::new(),
            quality_grade: "A".to_string(),
            image_hash: String::new(),
            geo_location: String::new(),
        }
    }

    #[test]
    fn test_command_view_and_target() {
        assert_eq!(Command::ApproveCrop(4).view(), ViewKind::Inspector);
        assert_eq!(Command::BuyCrop(4).target(), MutationTarget::Crop(4));
        assert_eq!(Command::UploadCrop(details()).target(), MutationTarget::Draft(details()));
    }

    #[test]
    fn test_validate_upload() {
        assert!(validate_upload(&details()).is_ok());

        let mut missing_name = details();
        missing_name.name = "  ".to_string();
        assert!(matches!(validate_upload(&missing_name), Err(DashboardError::InvalidInput(_))));

        let mut zero = details();
        zero.quantity = 0;
        assert!(validate_upload(&zero).is_err());

        let mut overflow = details();
        overflow.quantity = u128::MAX;
        overflow.unit_price = 2;
        assert!(validate_upload(&overflow).is_err());
    }
}
