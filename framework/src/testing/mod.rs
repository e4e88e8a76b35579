//! Test helpers
//!
//! - `expect!` fluent assertions
//! - [`TestDatabase`]: migrated in-memory SQLite, visible to `DB::connection()`
//! - [`TestContainer`]: per-thread service overrides
//! - [`TestClient`]: requests through the router without a socket

mod client;
mod expect;

pub use crate::container::testing::{TestContainer, TestContainerGuard};
pub use crate::database::testing::TestDatabase;
pub use client::{TestClient, TestRequest, TestResponse};
pub use expect::Expect;
