//! Types shared between the API and DB layers.

pub mod party;
