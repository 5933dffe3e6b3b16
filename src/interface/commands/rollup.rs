//! # Rollup Command
//!
//! Handles `Rekap`: the monthly aggregate for one student or every student.

use anyhow::Result;

use super::{reply, reply_ledger_error};
use crate::application::formatter;
use crate::application::ledger::Ledger;
use crate::domain::traits::ChatProvider;
use crate::strings::messages;

pub async fn handle_rollup(
    ledger: &Ledger,
    chat: &impl ChatProvider,
    period_label: &str,
    student_name: Option<&str>,
) -> Result<()> {
    match ledger.monthly_rollup(period_label, student_name) {
        Ok(rows) => reply(chat, &formatter::rollup(period_label, &rows)).await,
        Err(e) => {
            reply_ledger_error(chat, e, student_name.unwrap_or_default(), || {
                messages::no_rollup_data(period_label)
            })
            .await
        }
    }
}
