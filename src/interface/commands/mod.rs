//! # Command Handlers
//!
//! Contains specific handler functions for each classified command.
//! These handlers are invoked by the Router and send their own replies.

pub mod dialogue;
pub mod memorization;
pub mod menu;
pub mod query;
pub mod rollup;

use anyhow::Result;

use crate::domain::errors::LedgerError;
use crate::domain::traits::ChatProvider;
use crate::strings::messages;

pub(crate) async fn reply(chat: &impl ChatProvider, text: &str) -> Result<()> {
    chat.send_message(text)
        .await
        .map(|_| ())
        .map_err(|e| anyhow::anyhow!(e))
}

/// Sends the reply for a failed ledger operation. `not_found` renders the
/// informational message for an empty result.
pub(crate) async fn reply_ledger_error(
    chat: &impl ChatProvider,
    err: LedgerError,
    student_name: &str,
    not_found: impl FnOnce() -> String,
) -> Result<()> {
    match err {
        LedgerError::NotFound(what) => {
            tracing::info!("No records for {}", what);
            reply(chat, &not_found()).await
        }
        LedgerError::WeekMismatch { expected, requested } => {
            reply(chat, &messages::week_mismatch(student_name, expected, requested)).await
        }
        LedgerError::Storage(e) => {
            tracing::error!("Storage failure in room {}: {}", chat.room_id(), e);
            reply(chat, messages::STORAGE_FAILURE).await
        }
    }
}
