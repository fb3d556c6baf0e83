//! Remote-control input: keys, press phases and the consumed/pass-through contract.

use std::fmt;
use std::str::FromStr;
use tvreel_common::Error;

/// A key on the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    DpadCenter,
    Enter,
    Back,
    /// Any other key code, left to host defaults.
    Other(u16),
}

impl Key {
    /// Center and Enter both confirm the focused element.
    pub fn is_confirm(self) -> bool {
        matches!(self, Key::DpadCenter | Key::Enter)
    }
}

impl FromStr for Key {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Key::DpadUp),
            "down" => Ok(Key::DpadDown),
            "left" => Ok(Key::DpadLeft),
            "right" => Ok(Key::DpadRight),
            "center" | "ok" => Ok(Key::DpadCenter),
            "enter" => Ok(Key::Enter),
            "back" => Ok(Key::Back),
            other => other
                .strip_prefix("key")
                .and_then(|code| code.parse().ok())
                .map(Key::Other)
                .ok_or_else(|| Error::invalid_input(format!("unknown key '{}'", s.trim()))),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::DpadUp => write!(f, "up"),
            Key::DpadDown => write!(f, "down"),
            Key::DpadLeft => write!(f, "left"),
            Key::DpadRight => write!(f, "right"),
            Key::DpadCenter => write!(f, "center"),
            Key::Enter => write!(f, "enter"),
            Key::Back => write!(f, "back"),
            Key::Other(code) => write!(f, "key{}", code),
        }
    }
}

/// Phase of a key event. Handlers only act on [`KeyAction::Down`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Down,
    Up,
}

/// A single key event delivered by the host dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub action: KeyAction,
}

impl KeyEvent {
    pub fn down(key: Key) -> Self {
        Self {
            key,
            action: KeyAction::Down,
        }
    }

    pub fn up(key: Key) -> Self {
        Self {
            key,
            action: KeyAction::Up,
        }
    }

    pub fn is_down(&self) -> bool {
        self.action == KeyAction::Down
    }
}

/// Whether a handler took an event or left it for the next one up the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Consumed,
    PassThrough,
}

impl Handled {
    pub fn is_consumed(self) -> bool {
        self == Handled::Consumed
    }
}
