//! Tvreel - remote-driven video browser and player
//!
//! A focus-navigable list of bundled videos opening a playback screen that
//! remembers where each video was left and seeks in fixed steps. This library
//! crate exposes the screens and the resume store for the binary and for
//! integration testing.

pub mod browse;
pub mod catalog;
pub mod config;
pub mod input;
pub mod media;
pub mod playback;
pub mod resume;
pub mod session;
