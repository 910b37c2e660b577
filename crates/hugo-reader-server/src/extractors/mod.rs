//! Request extractors.

pub mod accept;
pub mod query;
