// File: ./src/bot.rs
// Command loop: polls Telegram and answers /start and /schedule.
use crate::config::Config;
use crate::pipeline::Pipeline;
use crate::telegram::{Bot, BotError, Message, ParseMode};
use crate::typing::TypingIndicator;
use anyhow::{Result, bail};
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

const RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Schedule,
}

impl Command {
    /// Reads `/cmd` or `/cmd@botname` from the start of a message.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let name = word.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);
        match name {
            "start" => Some(Command::Start),
            "schedule" => Some(Command::Schedule),
            _ => None,
        }
    }
}

/// Sends the schedule for `date` to `chat_id`, with the loading placeholder
/// shown while sources are fetched.
pub async fn reply_schedule(
    bot: &Bot,
    pipeline: &Pipeline,
    chat_id: i64,
    date: NaiveDate,
) -> Result<(), BotError> {
    let config = pipeline.config();
    let interval = Duration::from_millis(config.typing_interval_ms);
    let indicator = TypingIndicator::start(bot.clone(), chat_id, config.locale.loading(), interval)
        .await
        .inspect_err(|e| warn!("Loading placeholder failed: {}", e))
        .ok();

    let outcome = pipeline.schedule_for(date).await;

    if let Some(indicator) = indicator {
        indicator.stop().await;
    }

    for chunk in pipeline.render_chunks(outcome.day()) {
        if chunk.trim().is_empty() {
            continue;
        }
        bot.send_message(chat_id, &chunk, Some(ParseMode::Html))
            .await?;
    }
    Ok(())
}

pub async fn handle_message(bot: Bot, pipeline: Arc<Pipeline>, message: Message) {
    let Some(command) = message.text.as_deref().and_then(Command::parse) else {
        return;
    };
    let chat_id = message.chat.id;
    let locale = pipeline.config().locale;
    info!("Chat {}: {:?}", chat_id, command);

    let result = match command {
        Command::Start => bot
            .send_message(chat_id, &locale.greeting(&pipeline.config().group), None)
            .await
            .map(|_| ()),
        Command::Schedule => {
            let today = Local::now().date_naive();
            reply_schedule(&bot, &pipeline, chat_id, today).await
        }
    };

    if let Err(e) = result {
        error!("Chat {}: {:?} failed: {}", chat_id, command, e);
        let reply = locale.error_reply(&e);
        if let Err(e) = bot.send_message(chat_id, &reply, None).await {
            warn!("Chat {}: could not send error reply: {}", chat_id, e);
        }
    }
}

/// Runs the bot until Ctrl-C.
pub async fn run(config: Config) -> Result<()> {
    if config.token.is_empty() {
        bail!("No bot token: set TOKEN or `token` in the config file");
    }
    let bot = Bot::new(&config.api_url, &config.token)?;
    let poll_timeout = config.poll_timeout_secs;
    let pipeline = Arc::new(Pipeline::new(Arc::new(config)));
    let mut offset = 0;

    info!("Bot started for group {}", pipeline.config().group);
    loop {
        let updates = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                return Ok(());
            }
            updates = bot.get_updates(offset, poll_timeout) => updates,
        };

        match updates {
            Ok(updates) => {
                for update in updates {
                    offset = offset.max(update.update_id + 1);
                    if let Some(message) = update.message {
                        tokio::spawn(handle_message(bot.clone(), pipeline.clone(), message));
                    }
                }
            }
            Err(e) => {
                warn!("Polling failed: {}", e);
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }
    }
}
