//! Host side of the app: screen stack, lifecycle calls and remote routing.
//!
//! A [`Session`] owns the list screen and at most one playback screen, and
//! plays the role of the platform: it delivers keys serially, invokes the
//! playback lifecycle on navigation, and advances the simulated media clock.

use crate::browse::{ListOutcome, ListSurface, PlayRequest};
use crate::catalog::Catalog;
use crate::config::{Config, PlaybackConfig, PlayerConfig};
use crate::input::{Handled, Key, KeyEvent};
use crate::media::{MediaComponent, SimulatedPlayer};
use crate::playback::{PlaybackController, PlaybackState, PromptChoice};
use crate::resume::ResumeStore;
use std::str::FromStr;
use std::sync::Arc;
use tvreel_common::time::format_clock;
use tvreel_common::{Error, Result};

/// One line of a remote script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Key(Key),
    /// Pointer activation of a 1-based row.
    Click(usize),
    /// Advance virtual time.
    Wait(u64),
    Prompt(PromptChoice),
    /// App loses foreground (pause + stop).
    Background,
    /// App returns to foreground (start).
    Foreground,
    /// Print the current screen.
    Show,
    Quit,
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();
        let word = parts
            .next()
            .ok_or_else(|| Error::invalid_input("empty command"))?
            .to_ascii_lowercase();
        let arg = parts.next();
        if parts.next().is_some() {
            return Err(Error::invalid_input(format!("too many arguments in '{}'", s.trim())));
        }

        let number = |name: &str| -> Result<u64> {
            arg.ok_or_else(|| Error::invalid_input(format!("'{}' needs a number", name)))?
                .parse()
                .map_err(|_| Error::invalid_input(format!("'{}' needs a number", name)))
        };

        let command = match word.as_str() {
            "click" => {
                let row = number("click")?;
                if row == 0 {
                    return Err(Error::invalid_input("rows are numbered from 1"));
                }
                Command::Click(row as usize)
            }
            "wait" => Command::Wait(number("wait")?),
            "resume" => Command::Prompt(PromptChoice::Resume),
            "restart" => Command::Prompt(PromptChoice::Restart),
            "dismiss" => Command::Prompt(PromptChoice::Dismiss),
            "background" => Command::Background,
            "foreground" => Command::Foreground,
            "show" => Command::Show,
            "quit" | "exit" => Command::Quit,
            key => {
                if arg.is_some() {
                    return Err(Error::invalid_input(format!("'{}' takes no argument", key)));
                }
                Command::Key(key.parse()?)
            }
        };
        Ok(command)
    }
}

/// Parse a remote script: one command per line, `#` starts a comment.
pub fn parse_script(text: &str) -> Result<Vec<Command>> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let line = line.split('#').next().unwrap_or_default().trim();
            (!line.is_empty()).then_some((i + 1, line))
        })
        .map(|(n, line)| {
            line.parse().map_err(|e| match e {
                Error::InvalidInput(msg) => Error::invalid_input(format!("line {}: {}", n, msg)),
                other => other,
            })
        })
        .collect()
}

/// Which screen has input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Browse,
    Player,
}

pub struct Session {
    catalog: Arc<Catalog>,
    list: ListSurface,
    playback: Option<PlaybackController<SimulatedPlayer>>,
    store: ResumeStore,
    playback_config: PlaybackConfig,
    player_config: PlayerConfig,
    finished: bool,
}

impl Session {
    pub fn new(config: &Config, store: ResumeStore) -> Self {
        Self::with_catalog(Catalog::bundled(&config.library), config, store)
    }

    pub fn with_catalog(catalog: Catalog, config: &Config, store: ResumeStore) -> Self {
        let catalog = Arc::new(catalog);
        let mut list = ListSurface::new(catalog.clone());
        list.on_layout_complete();

        Self {
            catalog,
            list,
            playback: None,
            store,
            playback_config: config.playback,
            player_config: config.player.clone(),
            finished: false,
        }
    }

    pub fn screen(&self) -> Screen {
        if self.playback.is_some() {
            Screen::Player
        } else {
            Screen::Browse
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn list(&self) -> &ListSurface {
        &self.list
    }

    pub fn playback(&self) -> Option<&PlaybackController<SimulatedPlayer>> {
        self.playback.as_ref()
    }

    pub fn store(&self) -> &ResumeStore {
        &self.store
    }

    /// Run `commands` until the script ends or quits; returns the transcript.
    pub fn run(&mut self, commands: &[Command]) -> Vec<String> {
        let mut transcript = Vec::new();
        for command in commands {
            if self.finished {
                break;
            }
            transcript.extend(self.apply(*command));
        }
        transcript
    }

    /// Apply one command, returning what the user would notice.
    pub fn apply(&mut self, command: Command) -> Vec<String> {
        let mut out = Vec::new();
        if self.finished {
            return out;
        }

        match command {
            Command::Key(key) => self.key(key, &mut out),
            Command::Click(row) => {
                if self.screen() == Screen::Browse {
                    let outcome = match row.checked_sub(1) {
                        Some(index) => self.list.click(index),
                        None => ListOutcome::PassThrough,
                    };
                    self.list_outcome(outcome, &mut out);
                } else {
                    out.push("click ignored: player is open".to_string());
                }
            }
            Command::Wait(ms) => self.wait(ms, &mut out),
            Command::Prompt(choice) => {
                let resolved = self.playback.as_mut().filter(|ctl| ctl.pending_prompt().is_some());
                match resolved {
                    Some(ctl) => {
                        ctl.resolve_prompt(choice);
                        out.push(format!("playing from {}", clock(ctl.position_ms())));
                    }
                    None => out.push("no prompt is showing".to_string()),
                }
            }
            Command::Background => {
                if let Some(ctl) = self.playback.as_mut() {
                    ctl.on_pause();
                    ctl.on_stop();
                    out.push(format!("backgrounded at {}", clock(ctl.position_ms())));
                }
            }
            Command::Foreground => {
                if let Some(ctl) = self.playback.as_mut() {
                    ctl.on_start();
                    Self::report_start(ctl, &mut out);
                }
            }
            Command::Show => out.extend(self.render()),
            Command::Quit => {
                self.close_player(&mut out);
                self.finished = true;
                out.push("bye".to_string());
            }
        }

        self.drain_feedback(&mut out);
        out
    }

    fn key(&mut self, key: Key, out: &mut Vec<String>) {
        let event = KeyEvent::down(key);

        let Some(ctl) = self.playback.as_mut() else {
            let outcome = self.list.handle_key(event);
            if outcome.handled() == Handled::PassThrough && key == Key::Back {
                self.finished = true;
                out.push("bye".to_string());
                return;
            }
            self.list_outcome(outcome, out);
            return;
        };

        if ctl.pending_prompt().is_some() {
            let choice = match key {
                Key::DpadCenter | Key::Enter => Some(PromptChoice::Resume),
                Key::Back => Some(PromptChoice::Dismiss),
                _ => None,
            };
            if let Some(choice) = choice {
                ctl.resolve_prompt(choice);
                out.push(format!("playing from {}", clock(ctl.position_ms())));
            }
            return;
        }

        match ctl.handle_key(event) {
            Handled::Consumed => out.push(format!("seek -> {}", clock(ctl.position_ms()))),
            Handled::PassThrough if key == Key::Back => self.close_player(out),
            Handled::PassThrough => {}
        }
    }

    fn list_outcome(&mut self, outcome: ListOutcome, out: &mut Vec<String>) {
        match outcome {
            ListOutcome::Activate(request) => self.open_player(request, out),
            ListOutcome::FocusMoved(index) => out.push(format!("focus -> {}", index + 1)),
            ListOutcome::PassThrough => {}
        }
    }

    fn open_player(&mut self, request: PlayRequest, out: &mut Vec<String>) {
        out.push(format!(
            "open {}",
            request.title.as_deref().unwrap_or("(untitled)")
        ));

        let player = SimulatedPlayer::new(self.player_config.clone());
        let mut ctl =
            PlaybackController::new(request, player, self.store.clone(), &self.playback_config);
        ctl.on_start();
        Self::report_start(&ctl, out);
        self.playback = Some(ctl);
    }

    fn report_start(ctl: &PlaybackController<SimulatedPlayer>, out: &mut Vec<String>) {
        match (ctl.state(), ctl.pending_prompt()) {
            (_, Some(prompt)) => out.push(format!(
                "prompt: {} [{}] [{}]",
                prompt.message(),
                prompt.resume_label(),
                prompt.restart_label()
            )),
            (PlaybackState::Playing, None) => {
                out.push(format!("playing from {}", clock(ctl.position_ms())))
            }
            _ => {}
        }
    }

    fn close_player(&mut self, out: &mut Vec<String>) {
        let Some(mut ctl) = self.playback.take() else {
            return;
        };
        ctl.on_pause();
        ctl.on_stop();
        ctl.on_destroy();

        let saved = self.store.load(ctl.resume_key());
        let record = if saved == 0 {
            "none".to_string()
        } else {
            format_clock(saved)
        };
        out.push(format!(
            "closed {} (resume record: {})",
            ctl.title().unwrap_or("(untitled)"),
            record
        ));
    }

    fn wait(&mut self, ms: u64, out: &mut Vec<String>) {
        let Some(ctl) = self.playback.as_mut() else {
            return;
        };
        let was_loading = ctl.is_loading();
        if let Some(player) = ctl.player_mut() {
            player.advance(ms);
        }
        ctl.pump_events();
        if let Some(commit) = ctl.on_tick(ms) {
            tracing::debug!("Checkpoint {:?}", commit);
        }
        if was_loading && !ctl.is_loading() && !ctl.has_failed() {
            out.push("buffered".to_string());
        }
    }

    fn drain_feedback(&mut self, out: &mut Vec<String>) {
        if let Some(ctl) = self.playback.as_mut() {
            ctl.pump_events();
            for notice in ctl.take_notices() {
                out.push(format!("notice: {}", notice));
            }
        }
    }

    /// Text rendering of the current screen.
    pub fn render(&self) -> Vec<String> {
        let Some(ctl) = self.playback.as_ref() else {
            let mut lines = vec![format!("Videos ({})", self.catalog.len())];
            lines.extend(self.list.render());
            return lines;
        };

        let duration = ctl
            .player()
            .and_then(|p| p.duration())
            .map(format_clock)
            .unwrap_or_else(|| "--:--".to_string());
        let mut lines = vec![
            ctl.title().unwrap_or("(untitled)").to_string(),
            format!("{} / {}  [{:?}]", clock(ctl.position_ms()), duration, ctl.state()),
        ];
        if ctl.is_loading() {
            lines.push("loading...".to_string());
        }
        if let Some(prompt) = ctl.pending_prompt() {
            lines.push(format!("{}: {}", prompt.title(), prompt.message()));
        }
        lines
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let mut out = Vec::new();
        self.close_player(&mut out);
    }
}

fn clock(position: Option<u64>) -> String {
    format_clock(position.unwrap_or(0))
}
