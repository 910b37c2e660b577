//! Test helpers para hugo-reader-server.

#![allow(dead_code, unused_imports)]

pub mod assertions;
pub mod client;
pub mod fixtures;

pub use assertions::*;
pub use client::{TestClient, TestResponse, client, site_client};
pub use fixtures::*;
