//! Crate-internal prelude.
//!
//! Field tags and error enums render through `derive_more`'s `Display`.

pub use derive_more::Display;
