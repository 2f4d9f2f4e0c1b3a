//! Auth types for the NoMasAccidentes API.
//!
//! Provides JWT issuing/validation and the `BearerToken` extractor.

pub mod bearer;
pub mod token;
