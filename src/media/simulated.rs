//! Deterministic media component running on a virtual clock.
//!
//! Nothing is decoded: the host advances time explicitly with
//! [`SimulatedPlayer::advance`], which drives buffering, playback progress and
//! configured failures.

use super::{MediaComponent, MediaEvent};
use crate::config::PlayerConfig;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Readiness {
    Idle,
    Buffering { remaining_ms: u64 },
    Ready,
    Failed,
}

#[derive(Debug)]
pub struct SimulatedPlayer {
    config: PlayerConfig,
    source: Option<String>,
    fails: bool,
    readiness: Readiness,
    playing: bool,
    position_ms: u64,
    released: bool,
    events: VecDeque<MediaEvent>,
}

impl SimulatedPlayer {
    pub fn new(config: PlayerConfig) -> Self {
        Self {
            config,
            source: None,
            fails: false,
            readiness: Readiness::Idle,
            playing: false,
            position_ms: 0,
            released: false,
            events: VecDeque::new(),
        }
    }

    /// Player reporting `duration_ms` with no buffering delay.
    pub fn with_duration(duration_ms: Option<u64>) -> Self {
        Self::new(PlayerConfig {
            duration_ms,
            buffering_ms: 0,
            fail_uris: Vec::new(),
        })
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_buffering(&self) -> bool {
        matches!(self.readiness, Readiness::Buffering { .. })
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Move the virtual clock forward by `ms`.
    pub fn advance(&mut self, ms: u64) {
        if self.released {
            return;
        }

        let mut remaining = ms;
        if let Readiness::Buffering { remaining_ms } = self.readiness {
            if remaining < remaining_ms {
                self.readiness = Readiness::Buffering {
                    remaining_ms: remaining_ms - remaining,
                };
                return;
            }
            remaining -= remaining_ms;
            self.finish_buffering();
        }

        if self.readiness == Readiness::Ready && self.playing {
            let mut position = self.position_ms.saturating_add(remaining);
            if let Some(duration) = self.config.duration_ms {
                if position >= duration {
                    position = duration;
                    self.playing = false;
                    tracing::debug!("Reached end of {:?}", self.source);
                }
            }
            self.position_ms = position;
        }
    }

    fn finish_buffering(&mut self) {
        self.events.push_back(MediaEvent::LoadingChanged(false));
        if self.fails {
            self.readiness = Readiness::Failed;
            self.playing = false;
            let uri = self.source.as_deref().unwrap_or_default();
            self.events
                .push_back(MediaEvent::Error(format!("Source error: cannot decode {}", uri)));
        } else {
            self.readiness = Readiness::Ready;
        }
    }
}

impl MediaComponent for SimulatedPlayer {
    fn load_source(&mut self, uri: &str) {
        self.fails = self.config.fail_uris.iter().any(|u| u == uri);
        self.source = Some(uri.to_string());
        self.readiness = Readiness::Idle;
        self.playing = false;
        self.position_ms = 0;
    }

    fn prepare(&mut self) {
        if self.released || self.source.is_none() || self.readiness != Readiness::Idle {
            return;
        }
        self.events.push_back(MediaEvent::LoadingChanged(true));
        if self.config.buffering_ms == 0 {
            self.finish_buffering();
        } else {
            self.readiness = Readiness::Buffering {
                remaining_ms: self.config.buffering_ms,
            };
        }
    }

    fn play(&mut self) {
        if !self.released && self.readiness != Readiness::Failed {
            self.playing = true;
        }
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek_to(&mut self, position_ms: u64) {
        self.position_ms = match self.config.duration_ms {
            Some(duration) => position_ms.min(duration),
            None => position_ms,
        };
    }

    fn current_position(&self) -> u64 {
        self.position_ms
    }

    fn duration(&self) -> Option<u64> {
        match self.readiness {
            Readiness::Ready => self.config.duration_ms.filter(|d| *d > 0),
            _ => None,
        }
    }

    fn release(&mut self) {
        self.released = true;
        self.playing = false;
        self.events.clear();
    }

    fn poll_event(&mut self) -> Option<MediaEvent> {
        self.events.pop_front()
    }
}
