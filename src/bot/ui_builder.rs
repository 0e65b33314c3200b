//! UI Builder module for creating keyboards and formatting messages

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

// Import localization
use crate::localization::{t_args_lang, t_lang};

use crate::registration::UserProfile;

/// Callback data carried by the cancel button
pub const CANCEL_CALLBACK: &str = "cancel";

/// Create the single-button keyboard attached to the progress message
pub fn create_cancel_keyboard(language_code: Option<&str>) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        t_lang("cancel-button", language_code),
        CANCEL_CALLBACK.to_string(),
    )]])
}

/// Format the /start greeting for a user
pub fn format_greeting(profile: &UserProfile, language_code: Option<&str>) -> String {
    let not_set = t_lang("value-not-set", language_code);
    let user_id = profile.id.to_string();

    t_args_lang(
        "greeting",
        &[
            ("first_name", profile.first_name.as_str()),
            ("username", profile.username.as_deref().unwrap_or(&not_set)),
            ("full_name", profile.full_name.as_str()),
            ("user_id", user_id.as_str()),
            ("language", profile.language_code.as_deref().unwrap_or(&not_set)),
        ],
        language_code,
    )
}

/// Format the final answer message
pub fn format_result(answer: &str, language_code: Option<&str>) -> String {
    format!("{} {}", t_lang("result-prefix", language_code), answer)
}

/// Replies sent for anything that is not a photo, in order
pub fn fallback_messages(language_code: Option<&str>) -> Vec<String> {
    vec![
        t_lang("fallback-text", language_code),
        t_lang("fallback-emoji", language_code),
    ]
}
