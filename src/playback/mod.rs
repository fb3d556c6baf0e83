//! The playback screen: owns one media component per visit, asks about saved
//! progress, seeks on left/right and writes progress back on lifecycle exits.
//!
//! ```text
//! Idle -> Preparing -> (ResumePrompt | Playing) <-> Paused / Stopped -> Released
//! ```
//!
//! All lifecycle methods are safe to call repeatedly and in any state; calls
//! that make no sense for the current state do nothing.

mod feedback;

pub use feedback::{Notice, PromptChoice, ResumePrompt};

use crate::browse::PlayRequest;
use crate::config::PlaybackConfig;
use crate::input::{Handled, Key, KeyEvent};
use crate::media::{self, MediaComponent, PlayerListener};
use crate::resume::{Commit, ResumePolicy, ResumeStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No media loaded (missing URI).
    Idle,
    /// Media loaded, screen not started yet.
    Preparing,
    /// Waiting for the user to answer the resume prompt.
    ResumePrompt,
    Playing,
    /// Lost foreground visibility.
    Paused,
    /// No longer visible.
    Stopped,
    /// Media component released; terminal.
    Released,
}

#[derive(Debug)]
pub struct PlaybackController<P: MediaComponent> {
    player: Option<P>,
    store: ResumeStore,
    policy: ResumePolicy,
    seek_step_ms: u64,
    checkpoint_interval_ms: u64,
    since_checkpoint_ms: u64,
    title: Option<String>,
    resume_key: String,
    saved_position_ms: u64,
    state: PlaybackState,
    asked_resume: bool,
    started: bool,
    prompt: Option<ResumePrompt>,
    loading: bool,
    failed: bool,
    notices: Vec<Notice>,
}

impl<P: MediaComponent> PlaybackController<P> {
    /// Open the screen for `request`, taking ownership of `player`.
    ///
    /// A missing or empty URI aborts: a notice is queued, no media is loaded
    /// and the controller stays [`PlaybackState::Idle`] until destroyed.
    pub fn new(
        request: PlayRequest,
        mut player: P,
        store: ResumeStore,
        config: &PlaybackConfig,
    ) -> Self {
        let PlayRequest { uri, title } = request;
        let uri = uri.filter(|u| !u.trim().is_empty());

        let resume_key = store.key_for(uri.as_deref().unwrap_or_default());
        let mut notices = Vec::new();

        let (state, saved_position_ms) = match uri.as_deref() {
            Some(uri) => {
                let saved = store.load(&resume_key);
                player.load_source(uri);
                tracing::info!("Loaded {} (saved position {}ms)", uri, saved);
                (PlaybackState::Preparing, saved)
            }
            None => {
                tracing::error!("Empty video URI in play request");
                notices.push(Notice::EmptyUri);
                (PlaybackState::Idle, 0)
            }
        };

        Self {
            player: Some(player),
            store,
            policy: ResumePolicy::from(config),
            seek_step_ms: config.seek_step_ms,
            checkpoint_interval_ms: config.checkpoint_interval_ms,
            since_checkpoint_ms: 0,
            title,
            resume_key,
            saved_position_ms,
            state,
            asked_resume: false,
            started: false,
            prompt: None,
            loading: false,
            failed: false,
            notices,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn resume_key(&self) -> &str {
        &self.resume_key
    }

    /// Position read from the store when the screen opened.
    pub fn saved_position_ms(&self) -> u64 {
        self.saved_position_ms
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_failed(&self) -> bool {
        self.failed
    }

    pub fn pending_prompt(&self) -> Option<&ResumePrompt> {
        self.prompt.as_ref()
    }

    /// Drain queued one-shot notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn player(&self) -> Option<&P> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut P> {
        self.player.as_mut()
    }

    /// Current playback position, if a player is held.
    pub fn position_ms(&self) -> Option<u64> {
        self.player.as_ref().map(|p| p.current_position())
    }

    fn has_media(&self) -> bool {
        !matches!(self.state, PlaybackState::Idle | PlaybackState::Released)
    }

    /// Screen became visible: prepare, then prompt or play.
    pub fn on_start(&mut self) {
        if !matches!(
            self.state,
            PlaybackState::Preparing | PlaybackState::Paused | PlaybackState::Stopped
        ) {
            return;
        }
        let Some(player) = self.player.as_mut() else {
            return;
        };

        player.prepare();

        if !self.asked_resume && self.policy.should_prompt(self.saved_position_ms) {
            self.asked_resume = true;
            let prompt = ResumePrompt::new(self.saved_position_ms);
            tracing::info!("Asking to resume: {}", prompt.message());
            self.prompt = Some(prompt);
            self.state = PlaybackState::ResumePrompt;
        } else {
            player.play();
            self.started = true;
            self.state = PlaybackState::Playing;
            tracing::debug!("Playback started at {}ms", player.current_position());
        }
    }

    /// Answer the resume prompt. Returns `false` when no prompt is showing.
    pub fn resolve_prompt(&mut self, choice: PromptChoice) -> bool {
        if self.state != PlaybackState::ResumePrompt {
            return false;
        }
        let Some(prompt) = self.prompt.take() else {
            return false;
        };
        let Some(player) = self.player.as_mut() else {
            return false;
        };

        let target = if choice.keeps_progress() {
            prompt.position_ms()
        } else {
            0
        };
        tracing::info!("Resume prompt answered {:?}; starting at {}ms", choice, target);

        player.seek_to(target);
        player.play();
        self.started = true;
        self.state = PlaybackState::Playing;
        true
    }

    /// Capture position and duration and apply the commit policy.
    ///
    /// Does nothing before playback has begun, while the prompt is open or once
    /// the player is gone, so repeated calls leave the store unchanged.
    pub fn capture_position(&mut self) -> Option<Commit> {
        if !self.started || !self.has_media() || self.state == PlaybackState::ResumePrompt {
            return None;
        }
        let player = self.player.as_ref()?;

        let position = player.current_position();
        let duration = player.duration();
        let commit = self
            .policy
            .apply(&self.store, &self.resume_key, position, duration);
        tracing::debug!(
            "Captured {}ms of {:?}ms for {}: {:?}",
            position,
            duration,
            self.resume_key,
            commit
        );
        Some(commit)
    }

    /// Screen lost foreground visibility.
    pub fn on_pause(&mut self) {
        self.capture_position();
        if !self.has_media() {
            return;
        }
        if let Some(player) = self.player.as_mut() {
            player.pause();
        }
        if matches!(self.state, PlaybackState::Playing | PlaybackState::Preparing) {
            self.state = PlaybackState::Paused;
        }
    }

    /// Screen is no longer visible.
    pub fn on_stop(&mut self) {
        self.capture_position();
        if matches!(
            self.state,
            PlaybackState::Playing | PlaybackState::Paused | PlaybackState::Preparing
        ) {
            self.state = PlaybackState::Stopped;
        }
    }

    /// Final teardown. Releases the media component exactly once.
    pub fn on_destroy(&mut self) {
        if let Some(mut player) = self.player.take() {
            player.release();
            tracing::info!("Released player for {}", self.resume_key);
        }
        self.state = PlaybackState::Released;
        self.prompt = None;
        self.loading = false;
    }

    /// Periodic checkpoint while playing; `elapsed_ms` is time since the last tick.
    pub fn on_tick(&mut self, elapsed_ms: u64) -> Option<Commit> {
        if self.checkpoint_interval_ms == 0 || self.state != PlaybackState::Playing {
            return None;
        }
        self.since_checkpoint_ms += elapsed_ms;
        if self.since_checkpoint_ms < self.checkpoint_interval_ms {
            return None;
        }
        self.since_checkpoint_ms %= self.checkpoint_interval_ms;
        self.capture_position()
    }

    /// Deliver pending media component events to this screen.
    pub fn pump_events(&mut self) {
        loop {
            let event = match self.player.as_mut() {
                Some(player) => player.poll_event(),
                None => None,
            };
            match event {
                Some(event) => media::dispatch(self, event),
                None => break,
            }
        }
    }

    /// Left/right seek by a fixed step; everything else passes through.
    pub fn handle_key(&mut self, event: KeyEvent) -> Handled {
        if !event.is_down()
            || !matches!(self.state, PlaybackState::Playing | PlaybackState::Paused)
        {
            return Handled::PassThrough;
        }
        let Some(player) = self.player.as_mut() else {
            return Handled::PassThrough;
        };

        let position = player.current_position();
        let target = match event.key {
            Key::DpadRight => {
                let forward = position.saturating_add(self.seek_step_ms);
                match player.duration() {
                    Some(duration) => forward.min(duration),
                    None => forward,
                }
            }
            Key::DpadLeft => position.saturating_sub(self.seek_step_ms),
            _ => return Handled::PassThrough,
        };

        tracing::debug!("Seek {} from {}ms to {}ms", event.key, position, target);
        player.seek_to(target);
        Handled::Consumed
    }
}

impl<P: MediaComponent> PlayerListener for PlaybackController<P> {
    fn on_loading_changed(&mut self, loading: bool) {
        if self.state != PlaybackState::Released {
            self.loading = loading;
        }
    }

    fn on_error(&mut self, message: &str) {
        if self.state == PlaybackState::Released {
            return;
        }
        tracing::error!("Playback error for {}: {}", self.resume_key, message);
        self.loading = false;
        self.failed = true;
        self.notices.push(Notice::PlaybackError(message.to_string()));
    }
}

impl<P: MediaComponent> Drop for PlaybackController<P> {
    fn drop(&mut self) {
        if let Some(mut player) = self.player.take() {
            tracing::warn!("Playback screen dropped without teardown; releasing player");
            player.release();
        }
    }
}
