//! Integration tests for the Ethereum gateway
//!
//! These tests require:
//! 1. Anvil running on localhost:8545 (or `AGRI_RPC_URL`)
//! 2. The AgriSupplyChain contract deployed by Anvil account #0, its address
//!    in `AGRI_CONTRACT_ADDRESS`
//!
//! Run with `cargo test -p agri-gateway-ethereum -- --ignored`.

use agri_gateway_ethereum::{EthereumGateway, EthereumGatewayConfig, RpcWallet, SignerWallet};
use agri_gateway_trait::*;
use std::time::Duration;

// Anvil's deterministic dev accounts
const OWNER_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const OWNER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
const FARMER: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
const INSPECTOR: &str = "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC";
const CONSUMER: &str = "0x90F79bf6EB2c4f870365E785982E1f101E93b906";

fn load_test_config(private_key: Option<&str>) -> EthereumGatewayConfig {
    EthereumGatewayConfig {
        rpc_url: std::env::var("AGRI_RPC_URL").unwrap_or_else(|_| "http://localhost:8545".to_string()),
        chain_id: 31337,
        contract_address: std::env::var("AGRI_CONTRACT_ADDRESS")
            .unwrap_or_else(|_| "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string()),
        private_key: private_key.map(str::to_string),
        confirmation_blocks: 1,
        tx_timeout_secs: Some(60),
    }
}

fn account(address: &str) -> Account {
    Account::parse(address).unwrap()
}

fn sample_details(name: &str) -> CropDetails {
    CropDetails {
        name: name.to_string(),
        crop_type: "Grain".to_string(),
        quantity: 10,
        unit_price: 1_000_000_000_000_000,
        harvest_date: "2025-05-20".to_string(),
        fertilizer_used: "Compost".to_string(),
        pesticide_used: String::new(),
        quality_grade: "A".to_string(),
        image_hash: String::new(),
        geo_location: "Lat:28.61, Long:77.20".to_string(),
    }
}

#[tokio::test]
#[ignore = "requires anvil with a deployed AgriSupplyChain contract"]
async fn test_owner_is_deployer() {
    let gateway = EthereumGateway::new(load_test_config(None)).unwrap();
    let owner = gateway.owner().await.unwrap();
    assert_eq!(owner, account(OWNER));
}

#[tokio::test]
#[ignore = "requires anvil with a deployed AgriSupplyChain contract"]
async fn test_full_crop_lifecycle() {
    let gateway = EthereumGateway::new(load_test_config(None)).unwrap();
    let owner = account(OWNER);
    let farmer = account(FARMER);
    let inspector = account(INSPECTOR);
    let consumer = account(CONSUMER);

    if !gateway.is_inspector(&inspector).await.unwrap() {
        gateway.add_inspector(&owner, &inspector).await.unwrap();
    }
    assert!(gateway.is_inspector(&inspector).await.unwrap());

    let before = gateway.crop_count().await.unwrap();
    gateway.upload_crop(&farmer, &sample_details("Lifecycle Wheat")).await.unwrap();
    assert_eq!(gateway.crop_count().await.unwrap(), before + 1);

    let id = before;
    let crop = gateway.crop(id).await.unwrap();
    assert_eq!(crop.farmer, farmer);
    assert_eq!(crop.status, CropStatus::Uploaded);

    gateway.approve_crop(&inspector, id).await.unwrap();
    assert_eq!(gateway.crop(id).await.unwrap().status, CropStatus::Approved);

    let payment = crop.total_price().unwrap();
    gateway.buy_crop(&consumer, id, payment).await.unwrap();
    let sold = gateway.crop(id).await.unwrap();
    assert_eq!(sold.status, CropStatus::Sold);
    assert_eq!(sold.buyer, Some(consumer));
}

#[tokio::test]
#[ignore = "requires anvil with a deployed AgriSupplyChain contract"]
async fn test_non_inspector_approval_fails_without_state_change() {
    let gateway = EthereumGateway::new(load_test_config(None)).unwrap();
    let farmer = account(FARMER);

    gateway.upload_crop(&farmer, &sample_details("Unapproved Rice")).await.unwrap();
    let id = gateway.crop_count().await.unwrap() - 1;

    let err: GatewayError = gateway.approve_crop(&farmer, id).await.unwrap_err().into();
    assert!(err.is_mutation_failure(), "{err}");
    assert_eq!(gateway.crop(id).await.unwrap().status, CropStatus::Uploaded);
}

#[tokio::test]
#[ignore = "requires anvil with a deployed AgriSupplyChain contract"]
async fn test_signer_must_match_sender() {
    let gateway = EthereumGateway::new(load_test_config(Some(OWNER_KEY))).unwrap();
    let err: GatewayError = gateway
        .upload_crop(&account(FARMER), &sample_details("Wrong Sender"))
        .await
        .unwrap_err()
        .into();
    assert!(err.is_connectivity(), "{err}");

    let wallet = SignerWallet::from_private_key(OWNER_KEY).unwrap();
    assert_eq!(wallet.accounts().await.unwrap(), vec![account(OWNER)]);
}

#[tokio::test]
#[ignore = "requires anvil with a deployed AgriSupplyChain contract"]
async fn test_rpc_wallet_lists_node_accounts() {
    let gateway = EthereumGateway::new(load_test_config(None)).unwrap();
    let wallet = RpcWallet::new(gateway.contract_client(), Duration::from_millis(200));

    let accounts = wallet.request_accounts().await.unwrap();
    assert!(accounts.contains(&account(OWNER)));
    assert_eq!(wallet.accounts().await.unwrap(), accounts);
}
