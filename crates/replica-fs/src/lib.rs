//! Local filesystem primitives for Replica Manager
//!
//! Streaming whole-file checksums with bounded memory, plus read-only
//! inspection of the local replica against a declared digest.

pub mod checksum;
pub mod inspect;

pub use checksum::{ChecksumAlgorithm, hash_bytes, hash_file};
pub use inspect::{LocalState, Verification, inspect, verify};
