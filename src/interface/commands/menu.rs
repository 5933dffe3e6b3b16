//! # Menu Commands
//!
//! Handles `/start`, `/bantuan` and the quick-reply menu buttons.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{query, reply};
use crate::application::classifier::{Classifier, Shape};
use crate::application::ledger::Ledger;
use crate::application::state::{BotState, DialogueState};
use crate::domain::config::UnknownTextPolicy;
use crate::domain::traits::ChatProvider;
use crate::domain::types::MenuItem;
use crate::strings::{help, messages};

pub async fn handle_start(chat: &impl ChatProvider) -> Result<()> {
    reply(chat, help::GREETING).await?;
    reply(chat, &help::menu()).await
}

pub async fn handle_help(classifier: &Classifier, chat: &impl ChatProvider) -> Result<()> {
    reply(chat, &help::main(&classifier.usages())).await
}

pub async fn handle_menu(
    item: MenuItem,
    classifier: &Classifier,
    state: &Arc<Mutex<BotState>>,
    ledger: &Ledger,
    chat: &impl ChatProvider,
) -> Result<()> {
    match item {
        MenuItem::AddMemorization => {
            reply(chat, &messages::send_in_format(&classifier.usage(Shape::Add))).await
        }
        MenuItem::EditMemorization => {
            reply(chat, &messages::send_in_format(&classifier.usage(Shape::Edit))).await
        }
        MenuItem::ViewStudent => match classifier.unknown_text() {
            UnknownTextPolicy::QueryStudent => reply(chat, messages::VIEW_STUDENT_PROMPT).await,
            UnknownTextPolicy::Reject => {
                reply(chat, &messages::view_student_usage(&classifier.usage(Shape::View))).await
            }
        },
        MenuItem::PickPeriod => {
            {
                let mut guard = state.lock().await;
                guard.get_room_state(&chat.room_id()).dialogue = DialogueState::AwaitingPeriod;
            }
            reply(chat, &messages::ask_period(&ledger.current_period())).await
        }
        MenuItem::ListStudents => query::handle_list_students(ledger, chat).await,
        MenuItem::AutoRollupInfo => reply(chat, messages::AUTO_ROLLUP_INFO).await,
    }
}
