//! Dashboard controller
//!
//! Owns the application state and is the only place that decides when the
//! snapshot is reloaded. The controller is a cheap cloneable handle so a
//! mutation can run as its own task while the user keeps navigating.

use agri_gateway_trait::{
    Account, AccountStream, Crop, CropDetails, CropGateway, CropId, CropStatus, GatewayError, Wallet,
};
use futures::StreamExt;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::command::{Command, CommandOutcome, validate_upload};
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::mutation::MutationLocks;
use crate::overlay::DisapprovalOverlay;
use crate::session::{Roles, resolve_roles};
use crate::snapshot::{DEFAULT_LOAD_CONCURRENCY, LoadOutcome, Snapshot, SnapshotLoader};
use crate::views::{ConsumerQuery, View, ViewKind};

// Command with client-side checks done and payment resolved
enum Mutation {
    Upload(CropDetails),
    Approve(CropId),
    Buy { id: CropId, payment: u128 },
    AddInspector(Account),
}

/// Sign-in state reported by the identity provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuthState {
    SignedIn,
    SignedOut,
}

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub load_concurrency: usize,
    pub initial_tab: ViewKind,
    pub auth: AuthState,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            load_concurrency: DEFAULT_LOAD_CONCURRENCY,
            initial_tab: ViewKind::Consumer,
            auth: AuthState::SignedIn,
        }
    }
}

impl ControllerOptions {
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            load_concurrency: config.load_concurrency,
            ..Self::default()
        }
    }

    pub fn with_initial_tab(mut self, tab: ViewKind) -> Self {
        self.initial_tab = tab;
        self
    }
}

/// Client state apart from the crop snapshot
#[derive(Debug, Clone)]
pub struct AppState {
    pub auth: AuthState,
    pub account: Option<Account>,
    pub roles: Roles,
    pub active_tab: ViewKind,
    pub overlay: DisapprovalOverlay,
    pub consumer_query: ConsumerQuery,
    // Bumped on every account change; role results and post-mutation
    // reloads from an older epoch are dropped
    epoch: u64,
    // Set when a gateway read failed; the next successful load re-checks roles
    roles_unverified: bool,
}

pub struct DashboardController<G, W> {
    gateway: Arc<G>,
    wallet: Arc<W>,
    loader: SnapshotLoader<G>,
    locks: MutationLocks,
    state: Arc<RwLock<AppState>>,
}

impl<G, W> Clone for DashboardController<G, W> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            wallet: self.wallet.clone(),
            loader: self.loader.clone(),
            locks: self.locks.clone(),
            state: self.state.clone(),
        }
    }
}

impl<G, W> DashboardController<G, W>
where
    G: CropGateway + 'static,
    W: Wallet + 'static,
{
    pub fn new(gateway: Arc<G>, wallet: Arc<W>, options: ControllerOptions) -> Self {
        Self {
            loader: SnapshotLoader::new(gateway.clone(), options.load_concurrency),
            locks: MutationLocks::new(),
            state: Arc::new(RwLock::new(AppState {
                auth: options.auth,
                account: None,
                roles: Roles::none(),
                active_tab: options.initial_tab,
                overlay: DisapprovalOverlay::new(),
                consumer_query: ConsumerQuery::default(),
                epoch: 0,
                roles_unverified: false,
            })),
            gateway,
            wallet,
        }
    }

    // ===== Session =====

    /// Ask the wallet for accounts and load the dashboard for the first one
    pub async fn connect(&self) -> Result<Option<Account>> {
        let accounts = self.wallet.request_accounts().await.map_err(|e| {
            let e: GatewayError = e.into();
            warn!("Wallet connection failed: {}", e);
            DashboardError::from(e)
        })?;
        Ok(self.handle_accounts_changed(accounts).await)
    }

    /// React to the wallet's account list changing
    ///
    /// Role flags are cleared before anything else so badges never carry
    /// over to a different account. An empty list resets the session.
    pub async fn handle_accounts_changed(&self, accounts: Vec<Account>) -> Option<Account> {
        let next = accounts.into_iter().next();

        let epoch = {
            let mut state = self.state.write();
            state.epoch += 1;
            state.roles = Roles::none();
            state.roles_unverified = false;
            if state.account != next {
                state.overlay.clear();
            }
            state.account = next.clone();
            state.epoch
        };

        let Some(account) = next else {
            self.loader.reset();
            info!("Wallet disconnected, session reset");
            return None;
        };

        info!("Active account: {}", account);
        self.apply_roles(&account, epoch).await;
        self.reload().await;
        Some(account)
    }

    /// Re-check role flags for the current account, e.g. after reconnecting to the node
    pub async fn refresh_roles(&self) -> Roles {
        let (account, epoch) = {
            let state = self.state.read();
            (state.account.clone(), state.epoch)
        };
        match account {
            Some(account) => self.apply_roles(&account, epoch).await,
            None => Roles::none(),
        }
    }

    async fn apply_roles(&self, account: &Account, epoch: u64) -> Roles {
        let check = resolve_roles(self.gateway.as_ref(), Some(account)).await;
        let mut state = self.state.write();
        if state.epoch != epoch {
            debug!("Account changed while resolving roles for {}, dropping result", account);
            return state.roles;
        }
        state.roles = check.roles;
        state.roles_unverified = !check.verified;
        check.roles
    }

    /// Stream of wallet account lists, to be fed back into `handle_accounts_changed`
    pub async fn account_changes(&self) -> Result<AccountStream> {
        self.wallet
            .account_changes()
            .await
            .map_err(|e| DashboardError::from(Into::<GatewayError>::into(e)))
    }

    /// Like `account_changes`, but a wallet that cannot report changes
    /// yields a stream that never emits instead of an error
    pub async fn follow_account_changes(&self) -> AccountStream {
        match self.account_changes().await {
            Ok(changes) => changes,
            Err(e) => {
                warn!("Not following wallet account changes, reconnect to retry: {}", e);
                futures::stream::pending().boxed()
            }
        }
    }

    pub fn set_auth_state(&self, auth: AuthState) {
        self.state.write().auth = auth;
        info!("Auth state: {:?}", auth);
    }

    // ===== Snapshot =====

    /// Re-fetch every crop
    ///
    /// The first successful load after a failed read counts as the gateway
    /// coming back, so role flags are resolved again.
    pub async fn reload(&self) -> LoadOutcome {
        let generation = self.loader.begin_load();
        self.complete_reload(generation).await
    }

    async fn complete_reload(&self, generation: u64) -> LoadOutcome {
        let outcome = self.loader.complete_load(generation).await;
        match &outcome {
            LoadOutcome::Failed { .. } => self.state.write().roles_unverified = true,
            LoadOutcome::Loaded { .. } => {
                let unverified = self.state.read().roles_unverified;
                if unverified {
                    info!("Gateway reachable again, re-checking roles");
                    self.refresh_roles().await;
                }
            }
            LoadOutcome::Superseded { .. } => {}
        }
        outcome
    }

    /// Reload after a mutation unless the session moved on while it was pending
    ///
    /// The epoch check and the generation claim happen under one lock, so a
    /// disconnect either wins and skips the reload, or lands afterwards and
    /// supersedes it.
    async fn reload_for_epoch(&self, epoch: u64, approved: Option<CropId>) -> Option<LoadOutcome> {
        let generation = {
            let mut state = self.state.write();
            if state.epoch != epoch {
                return None;
            }
            if let Some(id) = approved {
                state.overlay.release(id);
            }
            self.loader.begin_load()
        };
        Some(self.complete_reload(generation).await)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.loader.snapshot()
    }

    // ===== Views =====

    pub fn state(&self) -> AppState {
        self.state.read().clone()
    }

    pub fn account(&self) -> Option<Account> {
        self.state.read().account.clone()
    }

    pub fn roles(&self) -> Roles {
        self.state.read().roles
    }

    pub fn available_tabs(&self) -> Vec<ViewKind> {
        ViewKind::available_tabs(self.roles())
    }

    /// Switch tabs and return the new view
    pub fn select_tab(&self, tab: ViewKind) -> View {
        self.state.write().active_tab = tab;
        debug!("Selected {} tab", tab);
        self.view(tab)
    }

    pub fn set_consumer_query(&self, query: ConsumerQuery) {
        self.state.write().consumer_query = query;
    }

    pub fn current_view(&self) -> View {
        let tab = self.state.read().active_tab;
        self.view(tab)
    }

    /// Build the view for `kind` without switching tabs
    pub fn view(&self, kind: ViewKind) -> View {
        let state = self.state.read();
        if state.auth == AuthState::SignedOut {
            return View::SignedOut;
        }
        let Some(account) = state.account.as_ref() else {
            return View::Disconnected;
        };
        self.loader.with_crops(|crops| {
            View::select(
                kind,
                account,
                state.roles,
                crops,
                &state.overlay,
                &state.consumer_query,
            )
        })
    }

    // ===== Commands =====

    /// Run a command from one of the role views
    ///
    /// Gating happens before any gateway call. A confirmed mutation is
    /// followed by a reload; a failed one leaves the snapshot untouched.
    pub async fn execute(&self, command: Command) -> Result<CommandOutcome> {
        let (account, roles, epoch) = {
            let state = self.state.read();
            if state.auth == AuthState::SignedOut {
                return Err(DashboardError::NotSignedIn);
            }
            let account = state.account.clone().ok_or(DashboardError::NoWallet)?;
            (account, state.roles, state.epoch)
        };

        let view = command.view();
        if !view.is_permitted(roles) {
            warn!("{} rejected: {} lacks the {} role", command, account, view);
            return Err(DashboardError::AccessDenied { view });
        }

        let label = command.to_string();
        let target = command.target();
        let mutation = match command {
            Command::Disapprove(id) => return self.disapprove(id),
            Command::UploadCrop(details) => {
                validate_upload(&details)?;
                Mutation::Upload(details)
            }
            Command::ApproveCrop(id) => {
                self.expect_status(id, CropStatus::Uploaded)?;
                Mutation::Approve(id)
            }
            Command::BuyCrop(id) => {
                let crop = self.expect_status(id, CropStatus::Approved)?;
                let payment = crop.total_price().ok_or_else(|| {
                    DashboardError::InvalidInput(format!("total price of crop #{} overflows", id))
                })?;
                Mutation::Buy { id, payment }
            }
            Command::AddInspector(inspector) => {
                if inspector.is_zero() {
                    return Err(DashboardError::InvalidInput("inspector address is the zero address".to_string()));
                }
                Mutation::AddInspector(inspector)
            }
        };

        let _guard = self.locks.try_lock(view, target)?;
        info!("Submitting {} from {}", label, account);

        let result = match &mutation {
            Mutation::Upload(details) => self.gateway.upload_crop(&account, details).await,
            Mutation::Approve(id) => self.gateway.approve_crop(&account, *id).await,
            Mutation::Buy { id, payment } => self.gateway.buy_crop(&account, *id, *payment).await,
            Mutation::AddInspector(inspector) => self.gateway.add_inspector(&account, inspector).await,
        };

        let receipt = match result.map_err(Into::<GatewayError>::into) {
            Ok(receipt) => receipt,
            Err(GatewayError::Unconfirmed { tx_hash, reason }) => {
                warn!("{} sent as {} but not confirmed: {}", label, tx_hash, reason);
                let reload = self.reload_for_epoch(epoch, None).await;
                return Ok(CommandOutcome::Unconfirmed { tx_hash, reload });
            }
            Err(e) => {
                warn!("{} failed: {}", label, e);
                return Err(e.into());
            }
        };
        info!("{} confirmed in {}", label, receipt.tx_hash);

        let approved = match mutation {
            Mutation::Approve(id) => Some(id),
            _ => None,
        };
        let reload = self.reload_for_epoch(epoch, approved).await;
        if reload.is_none() {
            info!("{} confirmed after the session changed, snapshot left alone", label);
        }
        Ok(CommandOutcome::Confirmed { receipt, reload })
    }

    fn disapprove(&self, id: CropId) -> Result<CommandOutcome> {
        self.expect_status(id, CropStatus::Uploaded)?;
        let newly_hidden = self.state.write().overlay.disapprove(id);
        info!("Crop #{} hidden from the pending list", id);
        Ok(CommandOutcome::Disapproved { id, newly_hidden })
    }

    fn expect_status(&self, id: CropId, status: CropStatus) -> Result<Crop> {
        let crop = self
            .loader
            .with_crops(|crops| crops.iter().find(|c| c.id == id).cloned())
            .ok_or_else(|| DashboardError::InvalidInput(format!("crop #{} is not in the snapshot", id)))?;
        if crop.status != status {
            return Err(DashboardError::InvalidInput(format!(
                "crop #{} is {}, expected {}",
                id, crop.status, status
            )));
        }
        Ok(crop)
    }
}
