//! Application layer: state, the input pump, background fetches and key
//! handling.

pub mod event;
pub mod fetch_runtime;
pub mod handler;
pub mod headless;
pub mod state;
