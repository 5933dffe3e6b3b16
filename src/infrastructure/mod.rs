//! # Infrastructure Layer
//!
//! Handles interactions with external systems and services.
//! Implements the traits defined in the Domain layer (ChatProvider, RecordStore, Clock).

pub mod clock;
pub mod console;
pub mod matrix;
pub mod sqlite;
