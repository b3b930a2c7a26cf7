//! Shared response envelope types.
//!
//! Responses use a `{ "data": ... }` envelope. The calendar endpoint is the
//! one exception; see [`crate::handlers::calendar`].

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
