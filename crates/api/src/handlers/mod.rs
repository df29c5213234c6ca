//! Request handlers.
//!
//! Each submodule provides async handler functions for one API area.
//! Handlers delegate to the engine in `reportdash_core` and map errors
//! via [`crate::error::AppError`].

pub mod cache;
pub mod execute;
pub mod history;
pub mod scripts;
