//! # Application Layer
//!
//! Orchestrates the core logic: classifying messages, applying them to the ledger,
//! formatting replies and keeping per-room dialogue state.

pub mod classifier;
pub mod formatter;
pub mod ledger;
pub mod logging;
pub mod router;
pub mod state;
