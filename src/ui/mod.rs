//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer takes the *core* data structures and turns them into cells on
//! the terminal.  No network I/O happens here.

pub mod detail;
pub mod footer;
pub mod grid_widget;
pub mod layout;
pub mod spinner;
pub mod theme;
