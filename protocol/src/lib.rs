//! Line protocol for the station's sensor board.
//!
//! The board writes one measurement block every second as four content lines
//! followed by a dashed separator:
//!
//! ```text
//! SOL V:18.50 I:1200
//! WND V:12.30 I:0.500
//! LUX:45000 FAN:75%
//! --------------------------
//! ```
//!
//! [`parse_line`] recognizes single lines, [`BlockAccumulator`] merges them
//! into complete blocks of [`telemetry::RawReadings`]. Unknown or garbled
//! lines are ignored, never errors: the link is noisy and the stream
//! self-heals at the next separator.

mod block;
mod line;

pub use block::{BlockAccumulator, Blocks, MAX_BLOCK_LINES};
pub use line::{Line, parse_line};
