//! # Progress Reporter
//!
//! Runs the vision request as a background task and keeps a single chat
//! message updated with a textual progress bar until it finishes.
//!
//! # State Machine
//!
//! - **Idle**: initial message posted, nothing edited yet
//! - **Polling**: one step per tick, wrapping back to the first step when the
//!   request outlives a full pass
//! - **Done**: request finished or was cancelled

use anyhow::Result;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::errors::VisionError;

const FILLED: char = '█';
const EMPTY: char = '░';

/// Chat operations the reporter needs once the progress message exists
#[async_trait]
pub trait ProgressChat: Send + Sync {
    async fn edit_progress(&self, text: &str) -> Result<()>;
    async fn delete_progress(&self) -> Result<()>;
    async fn send_result(&self, answer: &str) -> Result<()>;
    /// Replace the bar with the cancelled notice, dropping the keyboard
    async fn show_cancelled(&self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressState {
    Idle,
    Polling { step: usize },
    Done,
}

impl ProgressState {
    /// Move one tick forward
    pub fn advance(self, steps: usize) -> Self {
        match self {
            ProgressState::Idle => ProgressState::Polling { step: 0 },
            ProgressState::Polling { step } => ProgressState::Polling {
                step: (step + 1) % steps,
            },
            ProgressState::Done => ProgressState::Done,
        }
    }

    /// Number of filled glyphs to show in this state
    pub fn filled(self, steps: usize) -> usize {
        match self {
            ProgressState::Idle => 0,
            ProgressState::Polling { step } => step + 1,
            ProgressState::Done => steps,
        }
    }
}

/// How a reported request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressOutcome {
    Completed,
    Cancelled,
}

/// Render `filled` full glyphs followed by empty ones up to `steps`
pub fn render_bar(filled: usize, steps: usize) -> String {
    let filled = filled.min(steps);
    let mut bar = String::with_capacity(steps * 3);
    bar.extend(std::iter::repeat(FILLED).take(filled));
    bar.extend(std::iter::repeat(EMPTY).take(steps - filled));
    bar
}

pub struct ProgressBar {
    label: String,
    steps: usize,
    state: ProgressState,
    last_rendered: Option<String>,
}

impl ProgressBar {
    pub fn new(label: impl Into<String>, steps: usize) -> Self {
        Self {
            label: label.into(),
            steps: steps.max(1),
            state: ProgressState::Idle,
            last_rendered: None,
        }
    }

    pub fn state(&self) -> ProgressState {
        self.state
    }

    /// Text of the message posted before the first tick
    pub fn initial_text(&self) -> String {
        self.render(ProgressState::Idle)
    }

    /// Advance one step; returns the new text only if it differs from the last edit
    pub fn tick(&mut self) -> Option<String> {
        self.state = self.state.advance(self.steps);
        let text = self.render(self.state);
        if self.last_rendered.as_deref() == Some(text.as_str()) {
            return None;
        }
        Some(text)
    }

    /// Record text that actually reached the chat
    pub fn confirm(&mut self, text: String) {
        self.last_rendered = Some(text);
    }

    pub fn finish(&mut self) {
        self.state = ProgressState::Done;
    }

    fn render(&self, state: ProgressState) -> String {
        format!("{} {}", self.label, render_bar(state.filled(self.steps), self.steps))
    }
}

/// Spawn `work` and animate `bar` through `chat` until it finishes.
///
/// On completion the progress message is deleted before the answer is sent.
/// When `cancel` fires first the task is aborted and the bar is replaced by the
/// cancelled notice. Edits run one at a time on this loop, so the notice is
/// always the last write to the message.
/// A failed task deletes the progress message and returns the error.
pub async fn report_progress<C, F>(
    chat: &C,
    bar: &mut ProgressBar,
    work: F,
    cancel: CancellationToken,
    tick: Duration,
) -> Result<ProgressOutcome>
where
    C: ProgressChat + ?Sized,
    F: Future<Output = Result<String, VisionError>> + Send + 'static,
{
    let mut task = tokio::spawn(work);
    let abort = task.abort_handle();

    let mut ticker = tokio::time::interval_at(Instant::now() + tick, tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let joined = loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                abort.abort();
                bar.finish();
                info!("Request cancelled, background task aborted");
                if let Err(e) = chat.show_cancelled().await {
                    warn!(error = %e, "Failed to show cancelled notice");
                }
                return Ok(ProgressOutcome::Cancelled);
            }
            joined = &mut task => break joined,
            _ = ticker.tick() => {
                if let Some(text) = bar.tick() {
                    match chat.edit_progress(&text).await {
                        Ok(()) => bar.confirm(text),
                        Err(e) => error!(error = %e, "Error updating progress bar"),
                    }
                } else {
                    debug!("Progress text unchanged, skipping edit");
                }
            }
        }
    };

    bar.finish();

    if let Err(e) = chat.delete_progress().await {
        warn!(error = %e, "Failed to delete progress message");
    }

    let answer = joined.map_err(VisionError::from)??;
    chat.send_result(&answer).await?;

    Ok(ProgressOutcome::Completed)
}
