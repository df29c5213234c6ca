//! Report execution engine.
//!
//! Takes an operator-authored SQL report script (session-configuration
//! `SET` statements followed by one reporting query), substitutes named
//! `@parameters`, and executes it phase-by-phase against a database
//! connection obtained from a [`ConnectionSource`]. Results are cached
//! by script + parameters and every attempt is recorded in a bounded
//! in-memory history log.
//!
//! This crate is database-agnostic: the connection pool and the script
//! storage are trait seams ([`ConnectionSource`], [`store::ScriptStore`])
//! so the engine can be exercised without a live server.

pub mod connection;
pub mod engine;
pub mod error;
pub mod script;
pub mod store;

pub use connection::{ConnectionSource, SqlConnection, StatementOutput};
pub use engine::executor::{EngineSettings, ReportEngine};
pub use engine::outcome::{ExecutionResult, StatementKind, StatementOutcome};
pub use error::EngineError;
pub use store::{FsScriptStore, ScriptInfo, ScriptStore};

use std::collections::BTreeMap;

/// Named parameters supplied by the caller, substituted into the script
/// as quoted literals.
///
/// A `BTreeMap` keeps serialization key-sorted, so logically identical
/// parameter sets produce identical cache keys regardless of insertion
/// order.
pub type ParameterSet = BTreeMap<String, String>;
