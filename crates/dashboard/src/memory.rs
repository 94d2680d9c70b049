//! In-process gateway and wallet
//!
//! `MemoryGateway` simulates the contract's rules (owner-only inspector
//! registration, inspector-only approval, forward-only status, exact payment)
//! so the dashboard can run without a chain. Tests use the fault hooks to
//! inject failures, latency, and in-flight mutations.

use agri_gateway_trait::{
    Account, AccountStream, Crop, CropDetails, CropGateway, CropId, CropStatus, GatewayError, GatewayKind,
    TxReceipt, Wallet,
};
use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio_stream::wrappers::BroadcastStream;
use tracing::debug;

/// Chain ID reported by the in-memory gateway
pub const MEMORY_CHAIN_ID: u64 = 1337;

#[derive(Debug)]
struct Ledger {
    owner: Account,
    inspectors: HashSet<Account>,
    crops: Vec<Crop>,
    block_number: u64,
}

#[derive(Debug, Default)]
struct Faults {
    fail_reads: AtomicBool,
    fail_next_mutation: Mutex<Option<String>>,
    lose_next_receipt: AtomicBool,
    read_delay: Mutex<Duration>,
}

/// Contract simulation held in memory
#[derive(Clone)]
pub struct MemoryGateway {
    ledger: Arc<Mutex<Ledger>>,
    faults: Arc<Faults>,
    mutations_paused: Arc<watch::Sender<bool>>,
    mutation_calls: Arc<AtomicU64>,
    read_calls: Arc<AtomicU64>,
}

impl MemoryGateway {
    /// Create an empty contract deployed by `owner`
    pub fn new(owner: Account) -> Self {
        let (paused, _) = watch::channel(false);
        Self {
            ledger: Arc::new(Mutex::new(Ledger {
                owner,
                inspectors: HashSet::new(),
                crops: Vec::new(),
                block_number: 0,
            })),
            faults: Arc::new(Faults::default()),
            mutations_paused: Arc::new(paused),
            mutation_calls: Arc::new(AtomicU64::new(0)),
            read_calls: Arc::new(AtomicU64::new(0)),
        }
    }

    // ===== Seeding =====

    /// Register an inspector without a transaction
    pub fn seed_inspector(&self, inspector: Account) {
        self.ledger.lock().inspectors.insert(inspector);
    }

    /// Insert a crop directly in the given state, returning its id
    pub fn seed_crop(&self, farmer: Account, details: CropDetails, status: CropStatus, buyer: Option<Account>) -> CropId {
        let mut ledger = self.ledger.lock();
        let id = ledger.crops.len() as CropId;
        ledger.crops.push(Crop {
            id,
            farmer,
            details,
            status,
            buyer,
        });
        id
    }

    // ===== Fault hooks =====

    /// Make every read fail with a connection error
    pub fn fail_reads(&self, fail: bool) {
        self.faults.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Reject the next mutation with `reason`, leaving state untouched
    pub fn fail_next_mutation(&self, reason: impl Into<String>) {
        *self.faults.fail_next_mutation.lock() = Some(reason.into());
    }

    /// Apply the next mutation but report its confirmation as never observed
    pub fn lose_next_receipt(&self) {
        self.faults.lose_next_receipt.store(true, Ordering::SeqCst);
    }

    /// Delay applied to each read started from now on
    pub fn set_read_delay(&self, delay: Duration) {
        *self.faults.read_delay.lock() = delay;
    }

    /// Hold mutations before they take effect, as if waiting for confirmation
    pub fn pause_mutations(&self, paused: bool) {
        self.mutations_paused.send_replace(paused);
    }

    /// Number of mutations that reached the gateway
    pub fn mutation_calls(&self) -> u64 {
        self.mutation_calls.load(Ordering::SeqCst)
    }

    /// Number of reads that reached the gateway
    pub fn read_calls(&self) -> u64 {
        self.read_calls.load(Ordering::SeqCst)
    }

    async fn before_read(&self) -> Result<(), GatewayError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.faults.read_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.faults.fail_reads.load(Ordering::SeqCst) {
            return Err(GatewayError::connection("memory gateway: reads disabled"));
        }
        Ok(())
    }

    async fn before_mutation(&self) -> Result<(), GatewayError> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        let mut paused = self.mutations_paused.subscribe();
        // The sender lives as long as self, so this only errors on teardown
        let _ = paused.wait_for(|p| !*p).await;
        if let Some(reason) = self.faults.fail_next_mutation.lock().take() {
            return Err(GatewayError::mutation_failed(reason, None));
        }
        Ok(())
    }

    fn receipt(ledger: &mut Ledger) -> TxReceipt {
        ledger.block_number += 1;
        TxReceipt {
            tx_hash: format!("0x{:064x}", ledger.block_number),
            block_number: Some(ledger.block_number),
            gas_used: 21_000,
        }
    }

    fn settle(&self, receipt: TxReceipt) -> Result<TxReceipt, GatewayError> {
        if self.faults.lose_next_receipt.swap(false, Ordering::SeqCst) {
            return Err(GatewayError::unconfirmed(receipt.tx_hash, "confirmation not observed"));
        }
        Ok(receipt)
    }

    fn revert(reason: &str) -> GatewayError {
        GatewayError::mutation_failed(format!("execution reverted: {}", reason), None)
    }
}

#[async_trait]
impl CropGateway for MemoryGateway {
    type Error = GatewayError;

    fn gateway_kind(&self) -> GatewayKind {
        GatewayKind::Memory
    }

    fn chain_id(&self) -> u64 {
        MEMORY_CHAIN_ID
    }

    async fn owner(&self) -> Result<Account, GatewayError> {
        self.before_read().await?;
        Ok(self.ledger.lock().owner.clone())
    }

    async fn crop_count(&self) -> Result<u64, GatewayError> {
        self.before_read().await?;
        Ok(self.ledger.lock().crops.len() as u64)
    }

    async fn crop(&self, id: CropId) -> Result<Crop, GatewayError> {
        self.before_read().await?;
        self.ledger
            .lock()
            .crops
            .get(id as usize)
            .cloned()
            .ok_or_else(|| GatewayError::not_found("crop", id))
    }

    async fn is_inspector(&self, account: &Account) -> Result<bool, GatewayError> {
        self.before_read().await?;
        Ok(self.ledger.lock().inspectors.contains(account))
    }

    async fn add_inspector(&self, from: &Account, inspector: &Account) -> Result<TxReceipt, GatewayError> {
        self.before_mutation().await?;
        let mut ledger = self.ledger.lock();
        if ledger.owner != *from {
            return Err(GatewayError::unauthorized("Only owner can add inspectors"));
        }
        ledger.inspectors.insert(inspector.clone());
        debug!("memory: inspector {} added", inspector);
        self.settle(Self::receipt(&mut ledger))
    }

    async fn upload_crop(&self, from: &Account, details: &CropDetails) -> Result<TxReceipt, GatewayError> {
        self.before_mutation().await?;
        let mut ledger = self.ledger.lock();
        let id = ledger.crops.len() as CropId;
        ledger.crops.push(Crop {
            id,
            farmer: from.clone(),
            details: details.clone(),
            status: CropStatus::Uploaded,
            buyer: None,
        });
        debug!("memory: crop {} uploaded by {}", id, from);
        self.settle(Self::receipt(&mut ledger))
    }

    async fn approve_crop(&self, from: &Account, id: CropId) -> Result<TxReceipt, GatewayError> {
        self.before_mutation().await?;
        let mut ledger = self.ledger.lock();
        if !ledger.inspectors.contains(from) {
            return Err(GatewayError::unauthorized("Only inspectors can approve crops"));
        }
        let crop = ledger
            .crops
            .get_mut(id as usize)
            .ok_or_else(|| Self::revert("Invalid crop id"))?;
        if !crop.status.can_transition_to(CropStatus::Approved) {
            return Err(Self::revert("Crop is not awaiting approval"));
        }
        crop.status = CropStatus::Approved;
        debug!("memory: crop {} approved by {}", id, from);
        self.settle(Self::receipt(&mut ledger))
    }

    async fn buy_crop(&self, from: &Account, id: CropId, payment: u128) -> Result<TxReceipt, GatewayError> {
        self.before_mutation().await?;
        let mut ledger = self.ledger.lock();
        let crop = ledger
            .crops
            .get_mut(id as usize)
            .ok_or_else(|| Self::revert("Invalid crop id"))?;
        if !crop.status.can_transition_to(CropStatus::Sold) {
            return Err(Self::revert("Crop is not for sale"));
        }
        let total = crop.total_price().ok_or_else(|| Self::revert("Price overflow"))?;
        if payment < total {
            return Err(Self::revert("Insufficient payment"));
        }
        crop.status = CropStatus::Sold;
        crop.buyer = Some(from.clone());
        debug!("memory: crop {} sold to {}", id, from);
        self.settle(Self::receipt(&mut ledger))
    }
}

/// Wallet whose account list is driven by the caller
#[derive(Clone)]
pub struct MemoryWallet {
    accounts: Arc<Mutex<Vec<Account>>>,
    changes: broadcast::Sender<Vec<Account>>,
    available: bool,
}

impl MemoryWallet {
    pub fn new(accounts: Vec<Account>) -> Self {
        let (changes, _) = broadcast::channel(16);
        Self {
            accounts: Arc::new(Mutex::new(accounts)),
            changes,
            available: true,
        }
    }

    /// A wallet that is not installed: every request fails
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(Vec::new())
        }
    }

    /// Replace the account list and notify subscribers
    pub fn set_accounts(&self, accounts: Vec<Account>) {
        *self.accounts.lock() = accounts.clone();
        // No subscribers is fine
        let _ = self.changes.send(accounts);
    }

    fn check_available(&self) -> Result<(), GatewayError> {
        if self.available {
            Ok(())
        } else {
            Err(GatewayError::connection("No wallet present"))
        }
    }
}

#[async_trait]
impl Wallet for MemoryWallet {
    type Error = GatewayError;

    async fn request_accounts(&self) -> Result<Vec<Account>, GatewayError> {
        self.check_available()?;
        Ok(self.accounts.lock().clone())
    }

    async fn accounts(&self) -> Result<Vec<Account>, GatewayError> {
        self.check_available()?;
        Ok(self.accounts.lock().clone())
    }

    async fn account_changes(&self) -> Result<AccountStream, GatewayError> {
        self.check_available()?;
        let stream = BroadcastStream::new(self.changes.subscribe()).filter_map(|change| async move { change.ok() });
        Ok(Box::pin(stream))
    }
}
