//! v1 API Data Transfer Objects.
//!
//! Wire format for the v1 REST API. Field names are camelCase on the wire.

pub mod goals;

pub use goals::*;
