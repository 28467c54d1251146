#![forbid(unsafe_code)]

//! Core: grid geometry and stable hashing shared by the Tessel crates.
//!
//! # Role in Tessel
//! `tessel-core` is the leaf crate. It owns the cell-based geometry types
//! that the layout engine places widgets with, and the FNV-1a hashes used
//! wherever an ordering or digest must be reproducible across runs.

pub mod geometry;
pub mod stable_hash;

pub use geometry::{GridPos, GridRect, GridSize};
pub use stable_hash::{StableHasher, fnv1a32, fnv1a32_str};
