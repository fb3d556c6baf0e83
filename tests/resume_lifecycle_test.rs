//! End-to-end resume behaviour across visits and process restarts.

mod common;

use assert_matches::assert_matches;
use common::{TestHarness, VIDEO1};
use tvreel::playback::PlaybackState;
use tvreel::resume::key_for;
use tvreel::session::{Command, Screen};

// ---------------------------------------------------------------------------
// First visit
// ---------------------------------------------------------------------------

#[test]
fn fresh_install_plays_immediately_without_prompt() {
    let h = TestHarness::new(Some(100_000));
    let transcript = h.run_script("enter\n");

    assert_eq!(transcript[0], "open تطبيق ثمانية");
    assert_eq!(transcript[1], "playing from 0:00");
    assert!(!transcript.iter().any(|l| l.starts_with("prompt:")));
}

#[test]
fn leaving_saves_position_to_disk() {
    let h = TestHarness::new(Some(100_000));
    h.run_script("enter\nwait 42000\nback\n");

    assert!(h.namespace_path().exists());
    assert_eq!(h.store().load(&key_for(VIDEO1)), 42_000);
}

// ---------------------------------------------------------------------------
// Revisit
// ---------------------------------------------------------------------------

#[test]
fn revisit_prompts_and_restart_starts_at_zero() {
    let h = TestHarness::new(None);
    h.store().save(&key_for(VIDEO1), 42_000);

    let mut session = h.session();
    let out = session.apply(Command::Key(tvreel::input::Key::Enter));
    assert_eq!(out[1], "prompt: Continue from 0:42? [Yes] [From the beginning]");

    let out = session.apply(Command::Prompt(tvreel::playback::PromptChoice::Restart));
    assert_eq!(out, ["playing from 0:00"]);
    assert_eq!(
        session.playback().map(|p| p.state()),
        Some(PlaybackState::Playing)
    );
}

#[test]
fn revisit_resume_continues_where_left() {
    let h = TestHarness::new(None);
    h.run_script("enter\nwait 42000\nback\n");

    let transcript = h.run_script("enter\nresume\nwait 3000\nback\n");
    assert!(transcript.contains(&"playing from 0:42".to_string()));
    assert_matches!(transcript.last(), Some(line) if line.ends_with("(resume record: 0:45)"));
}

#[test]
fn dismissing_prompt_keeps_progress() {
    let h = TestHarness::new(None);
    h.store().save(&key_for(VIDEO1), 90_000);

    let transcript = h.run_script("enter\ndismiss\n");
    assert_eq!(transcript.last().map(String::as_str), Some("playing from 1:30"));
}

#[test]
fn short_saved_position_never_prompts() {
    let h = TestHarness::new(Some(100_000));
    h.store().save(&key_for(VIDEO1), 999);

    let transcript = h.run_script("enter\n");
    assert_eq!(transcript[1], "playing from 0:00");
}

// ---------------------------------------------------------------------------
// Commit policy
// ---------------------------------------------------------------------------

#[test]
fn watching_to_the_end_clears_record() {
    let h = TestHarness::new(Some(100_000));
    h.store().save(&key_for(VIDEO1), 500);

    let transcript = h.run_script("enter\nwait 96000\nback\n");
    assert_matches!(transcript.last(), Some(line) if line.ends_with("(resume record: none)"));
    assert_eq!(h.store().load(&key_for(VIDEO1)), 0);

    let transcript = h.run_script("enter\n");
    assert_eq!(transcript[1], "playing from 0:00");
}

#[test]
fn stopping_outside_end_window_saves() {
    let h = TestHarness::new(Some(100_000));
    h.run_script("enter\nwait 94000\nback\n");
    assert_eq!(h.store().load(&key_for(VIDEO1)), 94_000);
}

#[test]
fn background_then_foreground_keeps_one_record() {
    let h = TestHarness::new(None);
    let mut session = h.session();
    session.run(&[
        Command::Key(tvreel::input::Key::Enter),
        Command::Wait(10_000),
        Command::Background,
    ]);
    assert_eq!(h.store().load(&key_for(VIDEO1)), 10_000);

    session.run(&[Command::Background]);
    assert_eq!(h.store().load(&key_for(VIDEO1)), 10_000);

    let out = session.apply(Command::Foreground);
    assert_eq!(out, ["playing from 0:10"]);
    assert_eq!(session.screen(), Screen::Player);
}

// ---------------------------------------------------------------------------
// Seeking and navigation
// ---------------------------------------------------------------------------

#[test]
fn seek_is_clamped_to_duration() {
    let h = TestHarness::new(Some(100_000));
    let transcript = h.run_script("enter\nwait 95000\nright\nleft\nleft\n");
    assert_eq!(
        &transcript[transcript.len() - 3..],
        ["seek -> 1:40", "seek -> 1:30", "seek -> 1:20"]
    );
}

#[test]
fn each_video_has_its_own_record() {
    let h = TestHarness::new(None);
    h.run_script("enter\nwait 5000\nback\ndown\nenter\nwait 7000\nback\n");

    let store = h.store();
    assert_eq!(store.load(&key_for(VIDEO1)), 5_000);
    assert_eq!(store.load(&key_for("resource://tvreel/raw/video2")), 7_000);
    assert_eq!(store.load(&key_for("resource://tvreel/raw/video3")), 0);
}

#[test]
fn playback_error_keeps_screen_open() {
    let mut h = TestHarness::new(Some(60_000));
    h.config.player.buffering_ms = 250;
    h.config.player.fail_uris = vec![VIDEO1.to_string()];

    let transcript = h.run_script("enter\nwait 1000\nright\n");
    assert!(transcript
        .iter()
        .any(|l| l.starts_with("notice: Playback error:")));
    assert!(!transcript.iter().any(|l| l == "buffered"));
}
