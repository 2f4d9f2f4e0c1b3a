//! Test utilities for NoMasAccidentes services.
//!
//! Provides a migrated in-memory database and bearer-token helpers.
//! Import from test targets only.

pub mod auth;
pub mod db;
