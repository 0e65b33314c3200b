//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules for better organization:
//! - `message_handler`: Handles /start, photos, other text and attachments
//! - `callback_handler`: Handles the cancel button
//! - `progress_message`: Edits and deletes the progress message
//! - `ui_builder`: Creates keyboards and formats messages

pub mod callback_handler;
pub mod message_handler;
pub mod progress_message;
pub mod ui_builder;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

// Re-export main handler functions for use in main.rs
pub use callback_handler::cancel_handler;
pub use message_handler::{fallback_handler, photo_handler, start_handler};

use ui_builder::CANCEL_CALLBACK;

#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "show your profile")]
    Start,
}

/// Whether a message carries a photo
pub fn has_photo(msg: &Message) -> bool {
    msg.photo().is_some_and(|photos| !photos.is_empty())
}

/// Whether a message is text or a user attachment; service messages such as
/// joins or pins are left unanswered
pub fn is_text_or_attachment(msg: &Message) -> bool {
    msg.text().is_some()
        || msg.document().is_some()
        || msg.audio().is_some()
        || msg.video().is_some()
        || msg.voice().is_some()
        || msg.video_note().is_some()
        || msg.animation().is_some()
        || msg.sticker().is_some()
        || msg.contact().is_some()
        || msg.location().is_some()
        || msg.venue().is_some()
        || msg.poll().is_some()
        || msg.dice().is_some()
}

/// Whether a callback query is a press of the cancel button
pub fn is_cancel(q: &CallbackQuery) -> bool {
    q.data.as_deref() == Some(CANCEL_CALLBACK)
}

/// Build the dispatch tree: /start, photos, other text and attachments, cancel button
pub fn schema() -> UpdateHandler<anyhow::Error> {
    let message_handler = Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(start_handler),
        )
        .branch(dptree::filter(|msg: Message| has_photo(&msg)).endpoint(photo_handler))
        .branch(
            dptree::filter(|msg: Message| is_text_or_attachment(&msg)).endpoint(fallback_handler),
        );

    let callback_handler = Update::filter_callback_query()
        .filter(|q: CallbackQuery| is_cancel(&q))
        .endpoint(cancel_handler);

    dptree::entry()
        .branch(message_handler)
        .branch(callback_handler)
}
