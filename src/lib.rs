//! # Homework Telegram Bot
//!
//! A Telegram bot that forwards homework photos to a vision-capable language
//! model and relays the answer back to the chat, with a progress bar while the
//! request is in flight.

pub mod bot;
pub mod config;
pub mod errors;
pub mod image_processing;
pub mod localization;
pub mod progress;
pub mod registration;
pub mod requests;
pub mod vision;
