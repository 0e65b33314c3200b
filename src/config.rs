//! # Configuration Module
//!
//! This module defines configuration structures for the bot: credentials and
//! reply language read from the environment, image preprocessing parameters,
//! vision API settings and progress reporter timing.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::localization::DEFAULT_LANGUAGE;

// Environment variables
pub const BOT_TOKEN_VAR: &str = "GDZ_TELEGRAM_BOT_TOKEN";
pub const API_KEY_VAR: &str = "GDZ_OPENAI_API_KEY";
pub const MODEL_VAR: &str = "GDZ_OPENAI_MODEL";
pub const ENDPOINT_VAR: &str = "GDZ_OPENAI_ENDPOINT";
pub const LANGUAGE_VAR: &str = "GDZ_BOT_LANGUAGE";

// Constants for the vision request
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_TOKENS: u32 = 300;
pub const DEFAULT_PROMPT: &str = "Изучи изображение. Если в нем содержится задача, определи для кого она возраста, реши её как школьник соответствующего возраста и дай ответ по шагам, но в пределах нескольких предложений. Если на изображении не задача, просто дай его короткое описание.";

// Constants for image preprocessing
pub const TARGET_SIDE: u32 = 512;
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

// Constants for the progress bar
pub const PROGRESS_STEPS: usize = 10;
pub const PROGRESS_TICK_MS: u64 = 500;

/// Image preprocessing configuration
#[derive(Debug, Clone)]
pub struct ImageConfig {
    /// Output width in pixels
    pub target_width: u32,
    /// Output height in pixels (aspect ratio is not preserved)
    pub target_height: u32,
    /// JPEG quality, 1-100
    pub jpeg_quality: u8,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            target_width: TARGET_SIDE,
            target_height: TARGET_SIDE,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Vision API configuration
#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// Chat completions endpoint
    pub endpoint: String,
    /// Model identifier sent with every request
    pub model: String,
    /// Completion token limit
    pub max_tokens: u32,
    /// Instruction sent alongside the image
    pub prompt: String,
    /// Whole-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            prompt: DEFAULT_PROMPT.to_string(),
            request_timeout_secs: 60,
        }
    }
}

/// Progress reporter timing
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Delay between two bar updates
    pub tick_interval_ms: u64,
    /// Number of glyphs in the bar
    pub steps: usize,
}

impl ProgressConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: PROGRESS_TICK_MS,
            steps: PROGRESS_STEPS,
        }
    }
}

/// Complete bot configuration, read once at startup
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub telegram_token: String,
    pub api_key: String,
    /// Reply language when the sender's own is not bundled
    pub language: String,
    pub image: ImageConfig,
    pub vision: VisionConfig,
    pub progress: ProgressConfig,
}

impl BotConfig {
    /// Build the configuration from process environment variables.
    ///
    /// Both tokens are required; model and endpoint fall back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .with_context(|| format!("{key} must be set"))
        };

        let telegram_token = required(BOT_TOKEN_VAR)?;
        let api_key = required(API_KEY_VAR)?;

        let mut vision = VisionConfig::default();
        if let Some(model) = lookup(MODEL_VAR).filter(|v| !v.trim().is_empty()) {
            vision.model = model;
        }
        if let Some(endpoint) = lookup(ENDPOINT_VAR).filter(|v| !v.trim().is_empty()) {
            vision.endpoint = endpoint;
        }

        let language = lookup(LANGUAGE_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        Ok(Self {
            telegram_token,
            api_key,
            language,
            image: ImageConfig::default(),
            vision,
            progress: ProgressConfig::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_requires_both_tokens() {
        let err = BotConfig::from_lookup(lookup_from(&[(API_KEY_VAR, "sk-test")])).unwrap_err();
        assert!(err.to_string().contains(BOT_TOKEN_VAR));

        let err = BotConfig::from_lookup(lookup_from(&[(BOT_TOKEN_VAR, "123:abc")])).unwrap_err();
        assert!(err.to_string().contains(API_KEY_VAR));
    }

    #[test]
    fn test_config_blank_token_is_missing() {
        let result = BotConfig::from_lookup(lookup_from(&[
            (BOT_TOKEN_VAR, "   "),
            (API_KEY_VAR, "sk-test"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_defaults_and_overrides() {
        let config = BotConfig::from_lookup(lookup_from(&[
            (BOT_TOKEN_VAR, "123:abc"),
            (API_KEY_VAR, "sk-test"),
        ]))
        .unwrap();
        assert_eq!(config.language, "ru");
        assert_eq!(config.vision.model, DEFAULT_MODEL);
        assert_eq!(config.vision.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.vision.max_tokens, 300);
        assert_eq!(config.image.target_width, 512);
        assert_eq!(config.image.target_height, 512);
        assert_eq!(config.progress.tick_interval(), Duration::from_millis(500));

        let config = BotConfig::from_lookup(lookup_from(&[
            (BOT_TOKEN_VAR, "123:abc"),
            (API_KEY_VAR, "sk-test"),
            (MODEL_VAR, "gpt-4o"),
            (LANGUAGE_VAR, "en"),
            (ENDPOINT_VAR, "http://localhost:9999/v1/chat/completions"),
        ]))
        .unwrap();
        assert_eq!(config.vision.model, "gpt-4o");
        assert_eq!(config.language, "en");
        assert_eq!(config.vision.endpoint, "http://localhost:9999/v1/chat/completions");
    }
}
