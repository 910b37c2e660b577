//! Middleware applied to every request:
//! - `RequestIdLayer`: generates or propagates `x-request-id`
//! - `log_requests`: one span and one completion event per request

mod logging;
mod request_id;

pub use logging::log_requests;
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdLayer, RequestIdMiddleware};
