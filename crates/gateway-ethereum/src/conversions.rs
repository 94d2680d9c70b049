//! Type conversions between contract ABI types and gateway trait types

use crate::abi::AgriSupplyChain;
use crate::error::{EthereumGatewayError, Result};
use agri_gateway_trait::{Account, Crop, CropDetails, CropStatus};
use alloy::primitives::{Address, U256};
use std::str::FromStr;

/// Convert the contract's status byte
pub fn convert_crop_status(status: u8) -> Result<CropStatus> {
    match status {
        0 => Ok(CropStatus::Uploaded),
        1 => Ok(CropStatus::Approved),
        2 => Ok(CropStatus::Sold),
        other => Err(EthereumGatewayError::Conversion(format!(
            "Unknown crop status {}",
            other
        ))),
    }
}

/// Convert a crop status to the contract's status byte
pub fn crop_status_to_u8(status: CropStatus) -> u8 {
    match status {
        CropStatus::Uploaded => 0,
        CropStatus::Approved => 1,
        CropStatus::Sold => 2,
    }
}

/// Narrow a uint256 to u64, failing instead of truncating
pub fn u256_to_u64(value: U256, field: &str) -> Result<u64> {
    u64::try_from(value)
        .map_err(|_| EthereumGatewayError::Conversion(format!("{} {} does not fit in u64", field, value)))
}

/// Narrow a uint256 to u128, failing instead of truncating
pub fn u256_to_u128(value: U256, field: &str) -> Result<u128> {
    u128::try_from(value)
        .map_err(|_| EthereumGatewayError::Conversion(format!("{} {} does not fit in u128", field, value)))
}

/// Convert an Alloy address to an account (checksummed spelling)
pub fn address_to_account(address: Address) -> Result<Account> {
    Account::parse(&address.to_checksum(None))
        .map_err(|e| EthereumGatewayError::Conversion(e.to_string()))
}

/// Convert an address where zero means "unset"
pub fn optional_account(address: Address) -> Result<Option<Account>> {
    if address.is_zero() {
        Ok(None)
    } else {
        address_to_account(address).map(Some)
    }
}

/// Convert an account to an Alloy address
pub fn account_to_address(account: &Account) -> Result<Address> {
    Address::from_str(account.as_str())
        .map_err(|e| EthereumGatewayError::InvalidAddress(format!("{}: {}", account, e)))
}

/// Convert ABI crop details to trait crop details
pub fn convert_crop_details(details: AgriSupplyChain::CropDetails) -> Result<CropDetails> {
    Ok(CropDetails {
        quantity: u256_to_u128(details.quantity, "quantity")?,
        unit_price: u256_to_u128(details.price, "price")?,
        name: details.name,
        crop_type: details.cropType,
        harvest_date: details.harvestDate,
        fertilizer_used: details.fertilizerUsed,
        pesticide_used: details.pesticideUsed,
        quality_grade: details.qualityGrade,
        image_hash: details.imageHash,
        geo_location: details.geoLocation,
    })
}

/// Assemble a crop from the fields returned by `crops(uint256)`
pub fn convert_crop(
    id: U256,
    farmer: Address,
    details: AgriSupplyChain::CropDetails,
    status: u8,
    buyer: Address,
) -> Result<Crop> {
    let status = convert_crop_status(status)?;
    let buyer = optional_account(buyer)?;
    if status == CropStatus::Sold && buyer.is_none() {
        return Err(EthereumGatewayError::Conversion(
            "Sold crop has no buyer".to_string(),
        ));
    }

    Ok(Crop {
        id: u256_to_u64(id, "crop id")?,
        farmer: address_to_account(farmer)?,
        details: convert_crop_details(details)?,
        status,
        // The contract never clears the buyer slot, but only a sale gives it meaning
        buyer: if status == CropStatus::Sold { buyer } else { None },
    })
}
