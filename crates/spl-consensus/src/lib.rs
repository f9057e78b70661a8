#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! Simplicity consensus rules for the hybrid PoW/PoS chain.
//!
//! This crate is responsible for:
//! - fixed-width 256/512-bit target arithmetic and the compact `bits`
//!   encoding (truncating and rounded forms)
//! - the per-algorithm difficulty retargeting state machine
//! - proof-of-work validation against the decoded target
//!
//! It intentionally does **not** include networking, block storage, the
//! stake kernel, or mempool policy. Every function here is pure: the result
//! depends only on the ancestor headers reachable from the passed index and
//! on the consensus parameters. Nothing is cached between calls; rounding
//! happens exactly once per formula, in consensus order.

pub mod arith;
pub mod chain;
pub mod error;
pub mod params;
pub mod pow;
pub mod retarget;
pub mod work;

pub use arith::*;
pub use chain::*;
pub use error::*;
pub use params::*;
pub use pow::*;
pub use retarget::*;
pub use work::*;
