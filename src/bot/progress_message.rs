//! Telegram side of the progress reporter

use anyhow::Result;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, MessageId};

use crate::localization::t_lang;
use crate::progress::ProgressChat;

use super::ui_builder::format_result;

/// A posted progress message together with the chat it lives in
pub struct TelegramProgress {
    bot: Bot,
    chat_id: ChatId,
    message_id: MessageId,
    keyboard: InlineKeyboardMarkup,
    language_code: Option<String>,
}

impl TelegramProgress {
    pub fn new(
        bot: Bot,
        chat_id: ChatId,
        message_id: MessageId,
        keyboard: InlineKeyboardMarkup,
        language_code: Option<&str>,
    ) -> Self {
        Self {
            bot,
            chat_id,
            message_id,
            keyboard,
            language_code: language_code.map(|s| s.to_string()),
        }
    }
}

#[async_trait]
impl ProgressChat for TelegramProgress {
    async fn edit_progress(&self, text: &str) -> Result<()> {
        self.bot
            .edit_message_text(self.chat_id, self.message_id, text)
            .reply_markup(self.keyboard.clone())
            .await?;
        Ok(())
    }

    async fn delete_progress(&self) -> Result<()> {
        self.bot.delete_message(self.chat_id, self.message_id).await?;
        Ok(())
    }

    async fn send_result(&self, answer: &str) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                format_result(answer, self.language_code.as_deref()),
            )
            .await?;
        Ok(())
    }

    async fn show_cancelled(&self) -> Result<()> {
        self.bot
            .edit_message_text(
                self.chat_id,
                self.message_id,
                t_lang("cancel-done", self.language_code.as_deref()),
            )
            .await?;
        Ok(())
    }
}
