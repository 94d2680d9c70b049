use agri_dashboard::{ControllerOptions, DashboardController, MemoryGateway, MemoryWallet, ViewKind};
use agri_gateway_trait::{Account, CropDetails, CropStatus};
use anyhow::{Result, anyhow};
use std::sync::Arc;
use tracing::info;

use crate::cli::shell::run_shell;

// Anvil's first four dev accounts, so the demo reads like a local chain
const OWNER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
const FARMER: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
const INSPECTOR: &str = "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC";
const CONSUMER: &str = "0x90F79bf6EB2c4f870365E785982E1f101E93b906";

const MILLI_ETH: u128 = 1_000_000_000_000_000;

/// Lets the demo shell drive the wallet the way a browser extension would
pub struct DemoHooks {
    wallet: MemoryWallet,
    accounts: Vec<(&'static str, Account)>,
}

impl DemoHooks {
    pub fn switch(&self, name: &str) -> Result<()> {
        let (_, account) = self
            .accounts
            .iter()
            .find(|(label, _)| label.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                let names: Vec<&str> = self.accounts.iter().map(|(label, _)| *label).collect();
                anyhow!("unknown account '{}', expected one of {}", name, names.join(", "))
            })?;
        self.wallet.set_accounts(vec![account.clone()]);
        Ok(())
    }

    pub fn disconnect(&self) {
        self.wallet.set_accounts(Vec::new());
    }
}

fn details(
    name: &str,
    crop_type: &str,
    quantity: u128,
    price_milli_eth: u128,
    grade: &str,
    geo_location: &str,
) -> CropDetails {
    CropDetails {
        name: name.to_string(),
        crop_type: crop_type.to_string(),
        quantity,
        unit_price: price_milli_eth * MILLI_ETH,
        harvest_date: "2025-04-18".to_string(),
        fertilizer_used: "Vermicompost".to_string(),
        pesticide_used: "Neem oil".to_string(),
        quality_grade: grade.to_string(),
        image_hash: String::new(),
        geo_location: geo_location.to_string(),
    }
}

fn seed(gateway: &MemoryGateway, farmer: &Account, consumer: &Account) {
    let punjab = "Lat:30.90, Long:75.85";
    let nashik = "Lat:19.99, Long:73.78";
    gateway.seed_crop(farmer.clone(), details("Durum Wheat", "Grain", 500, 2, "A", punjab), CropStatus::Uploaded, None);
    gateway.seed_crop(farmer.clone(), details("Basmati Rice", "Grain", 250, 5, "A", punjab), CropStatus::Approved, None);
    gateway.seed_crop(farmer.clone(), details("Red Onion", "Vegetable", 800, 1, "B", nashik), CropStatus::Approved, None);
    gateway.seed_crop(farmer.clone(), details("Grapes", "Fruit", 120, 8, "A", nashik), CropStatus::Sold, Some(consumer.clone()));
    gateway.seed_crop(farmer.clone(), details("Chickpea", "Pulse", 300, 3, "B", punjab), CropStatus::Uploaded, None);
}

pub async fn handle_demo(initial_tab: ViewKind) -> Result<()> {
    let owner = Account::parse(OWNER)?;
    let farmer = Account::parse(FARMER)?;
    let inspector = Account::parse(INSPECTOR)?;
    let consumer = Account::parse(CONSUMER)?;

    let gateway = MemoryGateway::new(owner.clone());
    gateway.seed_inspector(inspector.clone());
    seed(&gateway, &farmer, &consumer);

    let wallet = MemoryWallet::new(vec![farmer.clone()]);
    let hooks = DemoHooks {
        wallet: wallet.clone(),
        accounts: vec![
            ("owner", owner),
            ("farmer", farmer),
            ("inspector", inspector),
            ("consumer", consumer),
        ],
    };
    info!("Starting demo against an in-memory contract");

    let controller = DashboardController::new(
        Arc::new(gateway),
        Arc::new(wallet),
        ControllerOptions::default().with_initial_tab(initial_tab),
    );
    run_shell(controller, Some(hooks)).await
}
