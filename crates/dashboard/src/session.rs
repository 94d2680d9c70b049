//! Session identity: which privileged roles the active account holds

use agri_gateway_trait::{Account, CropGateway, GatewayError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Role flags for the active account
///
/// `Default` is the fail-closed state: no privileges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roles {
    pub is_owner: bool,
    pub is_inspector: bool,
}

impl Roles {
    pub fn none() -> Self {
        Self::default()
    }

    /// Badges shown next to the account
    pub fn badges(&self) -> Vec<&'static str> {
        let mut badges = Vec::new();
        if self.is_owner {
            badges.push("Owner");
        }
        if self.is_inspector {
            badges.push("Inspector");
        }
        badges
    }
}

/// Role flags together with whether they came from the contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleCheck {
    pub roles: Roles,
    /// False when a read failed and the flags fell back to none
    pub verified: bool,
}

/// Resolve role flags for `account`
///
/// Any failed read resets both flags; an error path never grants a role.
pub async fn resolve_roles<G: CropGateway>(gateway: &G, account: Option<&Account>) -> RoleCheck {
    let Some(account) = account else {
        return RoleCheck {
            roles: Roles::none(),
            verified: true,
        };
    };

    match try_resolve_roles(gateway, account).await {
        Ok(roles) => {
            debug!(
                "Resolved roles for {}: owner={}, inspector={}",
                account, roles.is_owner, roles.is_inspector
            );
            RoleCheck { roles, verified: true }
        }
        Err(e) => {
            warn!("Role check for {} failed, falling back to no roles: {}", account, e);
            RoleCheck {
                roles: Roles::none(),
                verified: false,
            }
        }
    }
}

async fn try_resolve_roles<G: CropGateway>(gateway: &G, account: &Account) -> Result<Roles, GatewayError> {
    let owner = gateway.owner().await.map_err(Into::<GatewayError>::into)?;
    let is_inspector = gateway.is_inspector(account).await.map_err(Into::<GatewayError>::into)?;

    Ok(Roles {
        is_owner: owner == *account,
        is_inspector,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryGateway;

    fn account(address: &str) -> Account {
        Account::parse(address).unwrap()
    }

    const OWNER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
    const INSPECTOR: &str = "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC";
    const NOBODY: &str = "0x90F79bf6EB2c4f870365E785982E1f101E93b906";

    #[tokio::test]
    async fn test_owner_compared_case_insensitively() {
        let gateway = MemoryGateway::new(account(OWNER));
        let lower = account(&OWNER.to_lowercase());
        let roles = resolve_roles(&gateway, Some(&lower)).await.roles;
        assert!(roles.is_owner);
        assert!(!roles.is_inspector);
        assert_eq!(roles.badges(), vec!["Owner"]);
    }

    #[tokio::test]
    async fn test_inspector_role() {
        let gateway = MemoryGateway::new(account(OWNER));
        gateway.seed_inspector(account(INSPECTOR));
        let roles = resolve_roles(&gateway, Some(&account(INSPECTOR))).await.roles;
        assert_eq!(
            roles,
            Roles {
                is_owner: false,
                is_inspector: true
            }
        );
    }

    #[tokio::test]
    async fn test_no_account_means_no_roles() {
        let gateway = MemoryGateway::new(account(OWNER));
        let check = resolve_roles(&gateway, None).await;
        assert_eq!(check.roles, Roles::none());
        assert!(check.verified);
    }

    #[tokio::test]
    async fn test_read_failure_fails_closed() {
        let gateway = MemoryGateway::new(account(OWNER));
        gateway.seed_inspector(account(OWNER));
        gateway.fail_reads(true);

        let check = resolve_roles(&gateway, Some(&account(OWNER))).await;
        assert_eq!(check.roles, Roles::none());
        assert!(!check.verified);
        assert!(check.roles.badges().is_empty());

        gateway.fail_reads(false);
        let check = resolve_roles(&gateway, Some(&account(NOBODY))).await;
        assert_eq!(check.roles, Roles::none());
        assert!(check.verified);
    }
}
