//! # Console Chat Adapter
//!
//! A `ChatProvider` over stdout, used by `hafalan console` to drive the router
//! from a terminal without a Matrix account.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::AsyncWriteExt;

use crate::domain::traits::ChatProvider;

pub const CONSOLE_ROOM_ID: &str = "console";

#[derive(Default)]
pub struct ConsoleService {
    sent: AtomicU64,
}

impl ConsoleService {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatProvider for ConsoleService {
    fn room_id(&self) -> String {
        CONSOLE_ROOM_ID.to_string()
    }

    async fn send_message(&self, content: &str) -> Result<String, String> {
        let seq = self.sent.fetch_add(1, Ordering::Relaxed) + 1;
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(format!("{content}\n\n").as_bytes())
            .await
            .map_err(|e| e.to_string())?;
        stdout.flush().await.map_err(|e| e.to_string())?;
        Ok(format!("console-{seq}"))
    }
}
