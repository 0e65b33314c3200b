//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, warn};

use crate::config::BotConfig;
use crate::requests::ActiveRequests;

// Import localization
use crate::localization::{resolve_language, t_lang};

/// Handle the cancel button under a progress message
pub async fn cancel_handler(
    bot: Bot,
    q: CallbackQuery,
    requests: ActiveRequests,
    config: Arc<BotConfig>,
) -> Result<()> {
    let language = resolve_language(q.from.language_code.as_deref(), &config.language);
    let language_code = Some(language.as_str());
    debug!(user_id = %q.from.id, "Received cancel callback from user");

    let target = q.message.as_ref().map(|msg| (msg.chat().id, msg.id()));
    let cancelled = match target {
        Some((chat_id, message_id)) => requests.cancel(chat_id, message_id),
        None => false,
    };
    debug!(user_id = %q.from.id, cancelled, "Cancel request processed");

    bot.answer_callback_query(q.id.clone())
        .text(t_lang("cancel-acknowledged", language_code))
        .await?;

    // A live request writes the cancelled notice from its own progress loop
    if cancelled {
        return Ok(());
    }

    if let Some((chat_id, message_id)) = target {
        if let Err(e) = bot
            .edit_message_text(chat_id, message_id, t_lang("cancel-done", language_code))
            .await
        {
            warn!(user_id = %q.from.id, error = %e, "Failed to mark stale request as cancelled");
        }
    }
    Ok(())
}
