//! What the playback screen shows the user besides the video itself.

use std::fmt;
use tvreel_common::time::format_clock;

/// Offer to continue from a saved position, shown at most once per visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResumePrompt {
    position_ms: u64,
}

impl ResumePrompt {
    pub fn new(position_ms: u64) -> Self {
        Self { position_ms }
    }

    pub fn position_ms(&self) -> u64 {
        self.position_ms
    }

    pub fn title(&self) -> &'static str {
        "Resume playback"
    }

    pub fn message(&self) -> String {
        format!("Continue from {}?", format_clock(self.position_ms))
    }

    pub fn resume_label(&self) -> &'static str {
        "Yes"
    }

    pub fn restart_label(&self) -> &'static str {
        "From the beginning"
    }
}

/// How the user left the resume prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptChoice {
    Resume,
    Restart,
    /// Closed without choosing; behaves like [`PromptChoice::Resume`].
    Dismiss,
}

impl PromptChoice {
    /// Whether this choice continues from the saved position.
    pub fn keeps_progress(self) -> bool {
        !matches!(self, PromptChoice::Restart)
    }
}

/// One-shot message surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The screen was opened without a playable URI.
    EmptyUri,
    /// The media component reported a failure.
    PlaybackError(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::EmptyUri => write!(f, "Video URI is empty."),
            Notice::PlaybackError(message) => write!(f, "Playback error: {}", message),
        }
    }
}
