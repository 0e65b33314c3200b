//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::FileId;
use tracing::{debug, error, info, warn};

use crate::config::BotConfig;
use crate::image_processing::prepare_photo;
use crate::progress::{report_progress, ProgressBar, ProgressOutcome};
use crate::registration::{UserProfile, UserRegistry};
use crate::requests::ActiveRequests;
use crate::vision::VisionModel;

// Import localization
use crate::localization::{resolve_language, t_lang};

use super::progress_message::TelegramProgress;
use super::ui_builder::{create_cancel_keyboard, fallback_messages, format_greeting};

/// Download a Telegram file into memory
pub async fn download_file(bot: &Bot, file_id: FileId) -> Result<Vec<u8>> {
    let file = bot.get_file(file_id).await?;
    let mut buffer = Vec::with_capacity(file.size as usize);
    bot.download_file(&file.path, &mut buffer).await?;
    Ok(buffer)
}

/// Reply language for the sender of a message
fn sender_language(msg: &Message, config: &BotConfig) -> String {
    let user_language = msg
        .from
        .as_ref()
        .and_then(|user| user.language_code.as_deref());
    resolve_language(user_language, &config.language)
}

/// Greet the sender of /start and register them
pub async fn start_handler(
    bot: Bot,
    msg: Message,
    registry: Arc<dyn UserRegistry>,
    config: Arc<BotConfig>,
) -> Result<()> {
    let Some(user) = msg.from.as_ref() else {
        debug!(user_id = %msg.chat.id, "Ignoring /start without a sender");
        return Ok(());
    };

    let profile = UserProfile::from(user);
    registry.register(&profile).await?;

    info!(user_id = profile.id, username = ?profile.username, "User started the bot");

    let language = sender_language(&msg, &config);
    bot.send_message(msg.chat.id, format_greeting(&profile, Some(language.as_str())))
        .await?;
    Ok(())
}

/// Download the largest photo size, post the progress message and hand the
/// request to a background task.
///
/// The handler returns as soon as the task is spawned so that the cancel
/// button, which the dispatcher queues per chat, is not stuck behind it.
pub async fn photo_handler(
    bot: Bot,
    msg: Message,
    vision: Arc<dyn VisionModel>,
    requests: ActiveRequests,
    config: Arc<BotConfig>,
) -> Result<()> {
    let Some(largest_photo) = msg.photo().and_then(|photos| photos.last()) else {
        return Ok(());
    };
    let chat_id = msg.chat.id;
    let language = sender_language(&msg, &config);
    let language_code = Some(language.as_str());

    debug!(
        user_id = %chat_id,
        width = largest_photo.width,
        height = largest_photo.height,
        "Received photo message from user"
    );

    let bytes = download_file(&bot, largest_photo.file.id.clone()).await?;
    let image_config = config.image.clone();
    let jpeg = tokio::task::spawn_blocking(move || prepare_photo(&bytes, &image_config)).await??;

    let mut bar = ProgressBar::new(t_lang("progress-label", language_code), config.progress.steps);
    let keyboard = create_cancel_keyboard(language_code);
    let progress = bot
        .send_message(chat_id, bar.initial_text())
        .reply_markup(keyboard.clone())
        .await?;
    let message_id = progress.id;

    let cancel = requests.register(chat_id, message_id);
    let chat = TelegramProgress::new(bot, chat_id, message_id, keyboard, language_code);
    let tick = config.progress.tick_interval();

    tokio::spawn(async move {
        let work = async move { vision.describe(jpeg).await };
        let outcome = report_progress(&chat, &mut bar, work, cancel, tick).await;
        requests.finish(chat_id, message_id);

        match outcome {
            Ok(ProgressOutcome::Completed) => info!(user_id = %chat_id, "Photo answered"),
            Ok(ProgressOutcome::Cancelled) => {
                warn!(user_id = %chat_id, "Photo request cancelled by user")
            }
            Err(e) => error!(user_id = %chat_id, error = %e, "Photo request failed"),
        }
    });

    Ok(())
}

/// Reply to text and attachments that are not photos
pub async fn fallback_handler(bot: Bot, msg: Message, config: Arc<BotConfig>) -> Result<()> {
    debug!(user_id = %msg.chat.id, "Received non-photo message from user");

    let language = sender_language(&msg, &config);
    for text in fallback_messages(Some(language.as_str())) {
        bot.send_message(msg.chat.id, text).await?;
    }
    Ok(())
}
