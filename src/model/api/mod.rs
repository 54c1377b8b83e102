//! API-compatible types.
//!
//! The types in this module are serialised in an API-friendly way, e.g.:
//!
//! - Aadhaar numbers and names are plain strings.
//! - Every response carries a `success` flag; every failure a `message`.

pub mod admin;
pub mod auth;
pub mod ballot;
pub mod results;
pub mod voter;
