//! Execution engine: phase-by-phase script runner plus its process-wide
//! bookkeeping (result cache, history log).

pub mod cache;
pub mod executor;
pub mod history;
pub mod outcome;
