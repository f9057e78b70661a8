#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! Simplicity chain parameters.
//!
//! One [`ChainParams`] value per network (main, test, regtest), built once
//! at startup and passed by reference everywhere; there is no process
//! global. Construction builds the deterministic genesis block and checks
//! it against the pinned hashes, failing fast on any mismatch.

pub mod checkpoints;
pub mod error;
pub mod genesis;
pub mod networks;
pub mod options;

pub use checkpoints::*;
pub use error::*;
pub use genesis::*;
pub use networks::*;
pub use options::*;
