//! tedit UI
//!
//! Terminal frontend: key decoding, painting and the two loops that share
//! the editor state.

pub mod app;
pub mod keys;
pub mod painter;
pub mod theme;

pub use app::{terminal_size, App};
pub use theme::Theme;
