// File: ./src/typing.rs
// "Loading..." placeholder that animates while a schedule is being fetched.
use crate::telegram::{Bot, BotError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Frames shown in turn, appended to the loading text.
pub const DOTS: [&str; 4] = ["", ".", "..", "..."];

pub struct TypingIndicator {
    bot: Bot,
    chat_id: i64,
    message_id: i64,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl TypingIndicator {
    /// Sends the placeholder and starts editing it every `interval`.
    pub async fn start(
        bot: Bot,
        chat_id: i64,
        label: &str,
        interval: Duration,
    ) -> Result<Self, BotError> {
        let placeholder = bot.send_message(chat_id, label, None).await?;
        let message_id = placeholder.message_id;
        let cancel = CancellationToken::new();

        let task_bot = bot.clone();
        let task_cancel = cancel.clone();
        let label = label.to_string();
        let handle = tokio::spawn(async move {
            let mut frame = 1;
            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
                let text = format!("{}{}", label, DOTS[frame % DOTS.len()]);
                if let Err(e) = task_bot.edit_message_text(chat_id, message_id, &text).await {
                    debug!("Typing indicator edit failed: {}", e);
                }
                frame += 1;
            }
        });

        Ok(Self {
            bot,
            chat_id,
            message_id,
            cancel,
            handle,
        })
    }

    pub fn message_id(&self) -> i64 {
        self.message_id
    }

    /// Stops the animation and removes the placeholder.
    pub async fn stop(self) {
        self.cancel.cancel();
        let _ = self.handle.await;
        if let Err(e) = self.bot.delete_message(self.chat_id, self.message_id).await {
            warn!("Could not delete loading message: {}", e);
        }
    }
}
