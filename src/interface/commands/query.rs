//! # Query Commands
//!
//! Handles lookups by student, by student and month, and the student list.

use anyhow::Result;

use super::{reply, reply_ledger_error};
use crate::application::formatter;
use crate::application::ledger::Ledger;
use crate::domain::traits::ChatProvider;
use crate::strings::messages;

pub async fn handle_student(
    ledger: &Ledger,
    chat: &impl ChatProvider,
    student_name: &str,
) -> Result<()> {
    match ledger.query_student(student_name) {
        Ok(records) => reply(chat, &formatter::student_records(student_name, &records)).await,
        Err(e) => {
            reply_ledger_error(chat, e, student_name, || messages::no_student_data(student_name))
                .await
        }
    }
}

pub async fn handle_student_period(
    ledger: &Ledger,
    chat: &impl ChatProvider,
    student_name: &str,
    period_label: &str,
) -> Result<()> {
    match ledger.query_student_period(student_name, period_label) {
        Ok(records) => {
            reply(chat, &formatter::period_records(student_name, period_label, &records)).await
        }
        Err(e) => {
            reply_ledger_error(chat, e, student_name, || {
                messages::no_period_data(student_name, period_label)
            })
            .await
        }
    }
}

pub async fn handle_list_students(ledger: &Ledger, chat: &impl ChatProvider) -> Result<()> {
    match ledger.list_students() {
        Ok(names) => reply(chat, &formatter::student_list(&names)).await,
        Err(e) => reply_ledger_error(chat, e, "", || messages::NO_STUDENTS.to_string()).await,
    }
}
