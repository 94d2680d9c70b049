//! Core types used by the gateway trait

pub mod account;
pub mod crop;
pub mod receipt;

pub use account::*;
pub use crop::*;
pub use receipt::*;
