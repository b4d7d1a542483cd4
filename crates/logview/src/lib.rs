#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Bounded log storage and virtualized windowing
//!
//! The installation log is an unbounded append-only stream; this crate keeps
//! it renderable: [`store::LogStore`] retains only the most recent entries
//! under a fixed cap, and [`window::VirtualWindow`] maps a scroll position
//! onto the small slice that actually needs to exist on screen. Both sit on
//! the rendering hot path and therefore never allocate proportionally to the
//! total log volume and never panic on out-of-range input.

pub mod store;
pub mod window;

pub use store::{LogEntry, LogStore, MAX_ENTRIES};
pub use window::{VirtualWindow, WindowSlice, DEFAULT_BUFFER_COUNT, DEFAULT_ITEM_HEIGHT};
