//! HTTP handlers.

pub mod cache;
pub mod health;
pub mod info;
pub mod metrics;
pub mod query;
pub mod response;
