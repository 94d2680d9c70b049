//! Wei/ETH conversion for prices entered and shown in the terminal

use alloy::primitives::U256;
use alloy::primitives::utils::{format_ether, parse_ether};

use crate::error::{DashboardError, Result};

/// Parse a decimal ETH amount such as "0.05" into wei
pub fn parse_eth(input: &str) -> Result<u128> {
    let wei = parse_ether(input.trim())
        .map_err(|e| DashboardError::InvalidInput(format!("invalid ETH amount '{}': {}", input.trim(), e)))?;
    if wei > U256::from(u128::MAX) {
        return Err(DashboardError::InvalidInput(format!("ETH amount '{}' is too large", input.trim())));
    }
    Ok(wei.to::<u128>())
}

/// Format wei as ETH without trailing zeros, e.g. "0.05"
pub fn format_eth(wei: u128) -> String {
    let formatted = format_ether(U256::from(wei));
    match formatted.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                whole.to_string()
            } else {
                format!("{}.{}", whole, fraction)
            }
        }
        None => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_ETH: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn test_parse_eth() {
        assert_eq!(parse_eth("1").unwrap(), ONE_ETH);
        assert_eq!(parse_eth(" 0.05 ").unwrap(), ONE_ETH / 20);
        assert!(parse_eth("abc").is_err());
    }

    #[test]
    fn test_format_eth() {
        assert_eq!(format_eth(ONE_ETH), "1");
        assert_eq!(format_eth(ONE_ETH / 20), "0.05");
        assert_eq!(format_eth(0), "0");
        assert_eq!(format_eth(1), "0.000000000000000001");
    }
}
