//! Text and link helpers shared by the card renderer and the terminal host.
//!
//! - **Text**: width-aware truncation and wrapping, whitespace collapsing,
//!   stripping of terminal control sequences from feed text
//! - **Links**: validation of article links before they are opened

mod text;
mod url_validator;

pub use text::{
    collapse_whitespace, display_width, strip_control_chars, truncate_to_width, wrap_to_width,
};
pub use url_validator::{validate_url_for_open, LinkError};
