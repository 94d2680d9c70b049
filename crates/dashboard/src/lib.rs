//! Role-gated dashboard for the agri supply-chain contract
//!
//! Mirrors the contract's crops into a local snapshot, filters it per role,
//! and keeps it consistent after each confirmed transaction. The contract is
//! reached only through a [`CropGateway`](agri_gateway_trait::CropGateway);
//! the active account comes from a [`Wallet`](agri_gateway_trait::Wallet).

pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod memory;
pub mod mutation;
pub mod overlay;
pub mod render;
pub mod role_hint;
pub mod session;
pub mod snapshot;
pub mod units;
pub mod views;

pub use command::{Command, CommandOutcome};
pub use config::DashboardConfig;
pub use controller::{AppState, AuthState, ControllerOptions, DashboardController};
pub use error::{DashboardError, Result};
pub use memory::{MemoryGateway, MemoryWallet};
pub use overlay::DisapprovalOverlay;
pub use role_hint::RoleHintStore;
pub use session::{RoleCheck, Roles, resolve_roles};
pub use snapshot::{LoadOutcome, Snapshot, SnapshotLoader};
pub use views::{ConsumerQuery, ConsumerSort, View, ViewKind};
