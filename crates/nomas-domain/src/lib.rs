//! Domain types shared across NoMasAccidentes crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; the `infra/` layer converts
//! database columns into these types at the repository boundary.

pub mod clase;
pub mod user;
