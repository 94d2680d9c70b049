//! Account addresses

use crate::error::GatewayError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Length of a `0x`-prefixed 20-byte hex address
pub const ADDRESS_LEN: usize = 42;

/// An account address as reported by the wallet or the contract
///
/// The original spelling (including EIP-55 checksum casing) is kept for
/// display, but equality and hashing ignore ASCII case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Account(String);

impl Account {
    /// Parse and validate a `0x`-prefixed 40 hex digit address
    pub fn parse(address: &str) -> Result<Self, GatewayError> {
        let address = address.trim();
        if !address.starts_with("0x") && !address.starts_with("0X") {
            return Err(GatewayError::invalid_parameter(
                "address",
                format!("'{}' must start with 0x", address),
            ));
        }
        if address.len() != ADDRESS_LEN {
            return Err(GatewayError::invalid_parameter(
                "address",
                format!(
                    "'{}' must be {} characters (0x + 40 hex), got {}",
                    address,
                    ADDRESS_LEN,
                    address.len()
                ),
            ));
        }
        if !address[2..].chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(GatewayError::invalid_parameter(
                "address",
                format!("'{}' must contain only hex characters after 0x", address),
            ));
        }
        Ok(Self(format!("0x{}", &address[2..])))
    }

    /// The all-zero address, used by the contract for "unset"
    pub fn zero() -> Self {
        Self(format!("0x{}", "0".repeat(40)))
    }

    pub fn is_zero(&self) -> bool {
        self.0[2..].bytes().all(|b| b == b'0')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase form, the canonical key for comparisons
    pub fn to_lowercase(&self) -> String {
        self.0.to_ascii_lowercase()
    }

    /// Shortened `0x1234...abcd` form for compact display
    pub fn short(&self) -> String {
        format!("{}...{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Account {}

impl Hash for Account {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.0.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Account {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Account {
    type Error = GatewayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Account> for String {
    fn from(account: Account) -> Self {
        account.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const CHECKSUMMED: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn test_case_insensitive_equality() {
        let a = Account::parse(CHECKSUMMED).unwrap();
        let b = Account::parse(&CHECKSUMMED.to_lowercase()).unwrap();
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_display_keeps_original_casing() {
        let a = Account::parse(CHECKSUMMED).unwrap();
        assert_eq!(a.to_string(), CHECKSUMMED);
        assert_eq!(a.short(), "0xf39F...2266");
    }

    #[test]
    fn test_invalid_addresses() {
        assert!(Account::parse("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266").is_err());
        assert!(Account::parse("0x1234").is_err());
        assert!(Account::parse("0xZZ9Fd6e51aad88F6F4ce6aB8827279cffFb92266").is_err());
    }

    #[test]
    fn test_zero() {
        assert!(Account::zero().is_zero());
        assert!(!Account::parse(CHECKSUMMED).unwrap().is_zero());
    }

    #[test]
    fn test_serde_roundtrip_validates() {
        let json = format!("\"{}\"", CHECKSUMMED);
        let account: Account = serde_json::from_str(&json).unwrap();
        assert_eq!(account.as_str(), CHECKSUMMED);
        assert!(serde_json::from_str::<Account>("\"0x12\"").is_err());
    }
}
