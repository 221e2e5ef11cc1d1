//! # API Routes
//!
//! One module per resource. Each module exposes a `router()` that the
//! application assembly in `lib.rs` merges.

pub mod photos;
pub mod sessions;
pub mod stats;
