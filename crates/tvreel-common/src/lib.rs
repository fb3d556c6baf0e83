//! Tvreel-Common: Shared error type and time helpers.
//!
//! - **Error Handling**: Common error types and result aliases
//! - **Time**: Formatting of millisecond playback offsets
//!
//! # Examples
//!
//! ```
//! use tvreel_common::{Error, Result};
//! use tvreel_common::time::format_clock;
//!
//! assert_eq!(format_clock(42_000), "0:42");
//!
//! fn example() -> Result<()> {
//!     Err(Error::invalid_input("row"))
//! }
//! assert!(example().is_err());
//! ```

pub mod error;
pub mod time;

pub use error::{Error, Result};
