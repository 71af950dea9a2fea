//! Channel layer for prompt matching and PTY operations.
//!
//! Handles the interactive session: ANSI stripping, tail-search prompt
//! detection and line-oriented writes.

mod buffer;
pub mod patterns;
mod pty;

pub use buffer::PatternBuffer;
pub use patterns::combine_patterns;
pub use pty::PtyChannel;
