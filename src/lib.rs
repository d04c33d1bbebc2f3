//! Terminal news board for a precomputed JSON news feed.
//!
//! The [`filter`] module holds the topic/region filter and incremental
//! reveal controller. [`feed`] loads the payload and turns records into
//! article cards, and [`ui`] hosts both in a terminal.

pub mod app;
pub mod config;
pub mod feed;
pub mod filter;
pub mod ui;
pub mod util;
