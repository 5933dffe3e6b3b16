//! # Bot State
//!
//! Per-conversation state (`RoomState`) keyed by room id. The only multi-step
//! interaction is the "pick a month" dialogue, so a room holds just its dialogue step.
//! Nothing here is shared between rooms.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DialogueState {
    #[default]
    Idle,
    AwaitingPeriod,
    AwaitingStudentName {
        period_label: String,
    },
}

/// State for a single chat room.
#[derive(Debug, Default, Clone)]
pub struct RoomState {
    pub dialogue: DialogueState,
}

#[derive(Debug, Default)]
pub struct BotState {
    pub rooms: HashMap<String, RoomState>,
}

impl BotState {
    /// Gets or creates the state for a specific room.
    pub fn get_room_state(&mut self, room_id: &str) -> &mut RoomState {
        self.rooms.entry(room_id.to_string()).or_default()
    }

    pub fn dialogue(&self, room_id: &str) -> DialogueState {
        self.rooms
            .get(room_id)
            .map(|r| r.dialogue.clone())
            .unwrap_or_default()
    }

    /// Returns the room to `Idle`, reporting whether a dialogue was active.
    pub fn reset_dialogue(&mut self, room_id: &str) -> bool {
        match self.rooms.get_mut(room_id) {
            Some(room) if room.dialogue != DialogueState::Idle => {
                room.dialogue = DialogueState::Idle;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rooms_are_isolated() {
        let mut state = BotState::default();
        state.get_room_state("!a:example.org").dialogue = DialogueState::AwaitingPeriod;
        assert_eq!(state.dialogue("!a:example.org"), DialogueState::AwaitingPeriod);
        assert_eq!(state.dialogue("!b:example.org"), DialogueState::Idle);
    }

    #[test]
    fn test_reset_dialogue() {
        let mut state = BotState::default();
        assert!(!state.reset_dialogue("!a:example.org"));
        state.get_room_state("!a:example.org").dialogue = DialogueState::AwaitingStudentName {
            period_label: "March 2025".to_string(),
        };
        assert!(state.reset_dialogue("!a:example.org"));
        assert_eq!(state.dialogue("!a:example.org"), DialogueState::Idle);
    }
}
