//! # Command Router
//!
//! Routes incoming messages to the appropriate command handler (in `interface/commands`).
//! An active dialogue intercepts free text; any recognized command cancels it first.
//! Every per-message failure ends up as a chat reply, never as a crash.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::classifier::Classifier;
use crate::application::ledger::Ledger;
use crate::application::state::{BotState, DialogueState};
use crate::domain::config::ClassifierConfig;
use crate::domain::errors::ClassifyError;
use crate::domain::traits::ChatProvider;
use crate::domain::types::Command;
use crate::interface::commands;
use crate::strings::messages;

pub struct CommandRouter {
    classifier: Classifier,
    ledger: Arc<Ledger>,
    state: Arc<Mutex<BotState>>,
}

impl CommandRouter {
    pub fn new(config: &ClassifierConfig, ledger: Arc<Ledger>, state: Arc<Mutex<BotState>>) -> Self {
        Self {
            classifier: Classifier::new(config),
            ledger,
            state,
        }
    }

    pub async fn route<C>(&self, chat: &C, message: &str, sender: &str) -> Result<()>
    where
        C: ChatProvider,
    {
        let msg = message.trim();
        if msg.is_empty() {
            return Ok(());
        }

        let room_id = chat.room_id();
        let recognized = self.classifier.recognize(msg);

        // 1. Active dialogue: free text answers it, a recognized command cancels it.
        let was_active = {
            let mut guard = self.state.lock().await;
            let dialogue = guard.dialogue(&room_id);
            if dialogue != DialogueState::Idle && recognized.is_none() {
                drop(guard);
                tracing::info!("Router dialogue step room='{}' sender='{}'", room_id, sender);
                return commands::dialogue::handle_step(&self.state, &self.ledger, chat, msg).await;
            }
            guard.reset_dialogue(&room_id)
        };
        if was_active {
            tracing::info!("Dialogue in room '{}' reset by a new command", room_id);
        }

        // 2. Classify (fallback applies to free text)
        let command = match recognized {
            Some(result) => result,
            None => self.classifier.fallback(msg),
        };

        match command {
            Ok(command) => {
                tracing::info!(
                    "Router dispatching cmd='{}' room='{}' sender='{}'",
                    command.kind(),
                    room_id,
                    sender
                );
                self.dispatch(chat, command, was_active).await
            }
            Err(ClassifyError::Format { keyword, expected }) => {
                tracing::info!("Malformed '{}' command in room '{}'", keyword, room_id);
                commands::reply(chat, &messages::format_error(&expected)).await
            }
            Err(ClassifyError::Unrecognized) => {
                commands::reply(chat, messages::UNKNOWN_MESSAGE).await
            }
        }
    }

    async fn dispatch<C>(&self, chat: &C, command: Command, was_active: bool) -> Result<()>
    where
        C: ChatProvider,
    {
        let ledger = self.ledger.as_ref();
        match command {
            Command::Start => commands::menu::handle_start(chat).await,
            Command::Help => commands::menu::handle_help(&self.classifier, chat).await,
            Command::Cancel => commands::dialogue::handle_cancel(was_active, chat).await,
            Command::Menu(item) => {
                commands::menu::handle_menu(item, &self.classifier, &self.state, ledger, chat).await
            }
            Command::AddMemorization {
                student_name,
                pages_this_week,
                cumulative_total,
                period_label,
            } => {
                commands::memorization::handle_add(
                    ledger,
                    chat,
                    &student_name,
                    pages_this_week,
                    cumulative_total,
                    period_label.as_deref(),
                )
                .await
            }
            Command::AddMemorizationExplicit {
                student_name,
                pages_this_week,
                week_number,
                cumulative_total,
            } => {
                commands::memorization::handle_add_explicit(
                    ledger,
                    chat,
                    &student_name,
                    pages_this_week,
                    week_number,
                    cumulative_total,
                )
                .await
            }
            Command::EditMemorization {
                student_name,
                week_number,
                pages_this_week,
                cumulative_total,
            } => {
                commands::memorization::handle_edit(
                    ledger,
                    chat,
                    &student_name,
                    week_number,
                    pages_this_week,
                    cumulative_total,
                )
                .await
            }
            Command::QueryByStudent { student_name } => {
                commands::query::handle_student(ledger, chat, &student_name).await
            }
            Command::QueryByStudentAndPeriod {
                student_name,
                period_label,
            } => {
                commands::query::handle_student_period(ledger, chat, &student_name, &period_label)
                    .await
            }
            Command::ListStudents => commands::query::handle_list_students(ledger, chat).await,
            Command::MonthlyRollup {
                period_label,
                student_name,
            } => {
                commands::rollup::handle_rollup(ledger, chat, &period_label, student_name.as_deref())
                    .await
            }
        }
    }
}
