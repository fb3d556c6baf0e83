//! Millisecond helpers for playback offsets.

/// Milliseconds in one second.
pub const MILLIS_PER_SECOND: u64 = 1_000;

/// Format a playback offset as `m:ss`, truncating sub-second precision.
///
/// Minutes are not wrapped into hours, so long offsets read `75:03`.
///
/// # Examples
///
/// ```
/// use tvreel_common::time::format_clock;
///
/// assert_eq!(format_clock(42_000), "0:42");
/// assert_eq!(format_clock(61_999), "1:01");
/// ```
pub fn format_clock(ms: u64) -> String {
    let secs = ms / MILLIS_PER_SECOND;
    format!("{}:{:02}", secs / 60, secs % 60)
}
