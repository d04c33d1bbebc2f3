//! Terminal User Interface module.
//!
//! Hosts the filter controller in a terminal: key presses replace clicks
//! and scrolling, the loop's deadline timer drives deferred filter steps,
//! and a periodic interval reloads the news payload.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background load spawning and completion events
//! - `render` - Screen layout
//! - `articles` - Article card list widget
//! - `filters` - Topic and region bars
//! - `status` - Status bar widget
//! - `help` - Help overlay

mod articles;
mod events;
mod filters;
mod help;
mod input;
mod loop_runner;
mod render;
mod status;

pub use loop_runner::{run, Action};
