//! Database configuration
//!
//! `DATABASE_URL` picks the backend: `postgres://...` in production,
//! `sqlite://...` locally. Pool sizing comes from `DB_MAX_CONNECTIONS` and
//! `DB_MIN_CONNECTIONS`.

pub use kit::DatabaseConfig;
