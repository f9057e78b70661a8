#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! Simplicity core: canonical protocol types, algorithm tags, and the
//! consensus wire serialization.
//!
//! Everything in this crate is consensus-visible. The block header is the
//! classic 80-byte little-endian record; the upper three bits of `version`
//! name the proof algorithm (or proof-of-stake) for hybrid blocks.

pub mod algo;
pub mod constants;
pub mod error;
pub mod script;
pub mod serialization;
pub mod types;

pub use algo::*;
pub use constants::*;
pub use error::*;
pub use serialization::*;
pub use types::*;
