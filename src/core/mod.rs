//! Core incremental-loading logic – request building, card rendering, the
//! paging state machine, and the scroll trigger.
//!
//! Nothing in this module depends on any TUI or rendering crate.

pub mod grid;
pub mod loader;
pub mod paging;
pub mod query;
pub mod reflect;
pub mod render;
pub mod source;
pub mod trigger;
