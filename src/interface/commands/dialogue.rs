//! # Dialogue Handler
//!
//! Drives the two-turn "pick a month" dialogue:
//! `AwaitingPeriod` -> `AwaitingStudentName` -> result, back to `Idle`.
//! Managed by `RoomState`'s `DialogueState`.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{query, reply};
use crate::application::ledger::Ledger;
use crate::application::state::{BotState, DialogueState};
use crate::domain::traits::ChatProvider;
use crate::strings::messages;

/// Consumes `message` as the answer to the room's pending question.
pub async fn handle_step(
    state: &Arc<Mutex<BotState>>,
    ledger: &Ledger,
    chat: &impl ChatProvider,
    message: &str,
) -> Result<()> {
    let input = message.trim();
    let query = {
        let mut guard = state.lock().await;
        let room_state = guard.get_room_state(&chat.room_id());

        match room_state.dialogue.clone() {
            DialogueState::AwaitingPeriod => {
                room_state.dialogue = DialogueState::AwaitingStudentName {
                    period_label: input.to_string(),
                };
                None
            }
            DialogueState::AwaitingStudentName { period_label } => {
                room_state.dialogue = DialogueState::Idle;
                Some(period_label)
            }
            DialogueState::Idle => return Ok(()),
        }
    }; // guard drops

    match query {
        None => reply(chat, messages::ASK_STUDENT_NAME).await,
        Some(period_label) => {
            query::handle_student_period(ledger, chat, input, &period_label).await
        }
    }
}

pub async fn handle_cancel(was_active: bool, chat: &impl ChatProvider) -> Result<()> {
    if was_active {
        reply(chat, messages::DIALOGUE_CANCELLED).await
    } else {
        reply(chat, messages::NOTHING_TO_CANCEL).await
    }
}
