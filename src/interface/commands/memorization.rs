//! # Memorization Commands
//!
//! Handles `TambahHafalan`, `TambahHafalanPekan` and `EditHafalan`.
//! A week-4 entry is followed by the month's rollup.

use anyhow::Result;

use super::{reply, reply_ledger_error};
use crate::application::formatter;
use crate::application::ledger::{AddOutcome, Ledger};
use crate::domain::traits::ChatProvider;
use crate::strings::messages;

pub async fn handle_add(
    ledger: &Ledger,
    chat: &impl ChatProvider,
    student_name: &str,
    pages_this_week: u32,
    cumulative_total: f64,
    period_label: Option<&str>,
) -> Result<()> {
    match ledger.add(student_name, pages_this_week, cumulative_total, period_label) {
        Ok(outcome) => send_outcome(chat, &outcome).await,
        Err(e) => reply_ledger_error(chat, e, student_name, String::new).await,
    }
}

pub async fn handle_add_explicit(
    ledger: &Ledger,
    chat: &impl ChatProvider,
    student_name: &str,
    pages_this_week: u32,
    week_number: u32,
    cumulative_total: u32,
) -> Result<()> {
    match ledger.add_explicit(student_name, pages_this_week, week_number, cumulative_total) {
        Ok(outcome) => send_outcome(chat, &outcome).await,
        Err(e) => reply_ledger_error(chat, e, student_name, String::new).await,
    }
}

async fn send_outcome(chat: &impl ChatProvider, outcome: &AddOutcome) -> Result<()> {
    reply(chat, &formatter::added(&outcome.record)).await?;
    if let Some(row) = &outcome.rollup {
        reply(chat, &formatter::rollup(&row.period_label, std::slice::from_ref(row))).await?;
    }
    Ok(())
}

pub async fn handle_edit(
    ledger: &Ledger,
    chat: &impl ChatProvider,
    student_name: &str,
    week_number: u32,
    pages_this_week: u32,
    cumulative_total: f64,
) -> Result<()> {
    match ledger.edit(student_name, week_number, pages_this_week, cumulative_total) {
        Ok(record) => reply(chat, &formatter::edited(&record)).await,
        Err(e) => {
            reply_ledger_error(chat, e, student_name, || {
                messages::no_week_to_edit(student_name, week_number, &ledger.current_period())
            })
            .await
        }
    }
}
