//! Shared response envelope types for API handlers.
//!
//! Administrative endpoints use a `{ "data": ... }` envelope; the
//! execute endpoint has its own top-level shape (see
//! [`crate::handlers::execute`]).

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
