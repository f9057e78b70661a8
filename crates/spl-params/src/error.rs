//! Parameter and startup-configuration errors.
//!
//! All of these are fail-fast conditions: the node refuses to start.

use spl_consensus::ConsensusError;
use spl_core::CoreError;
use thiserror::Error;

/// Errors raised while building chain parameters or applying startup
/// configuration overrides.
#[derive(Debug, Error)]
pub enum ParamsError {
    /// Chain name did not match any known network.
    #[error("unknown chain {0}")]
    UnknownChain(String),

    /// A pinned constant failed to parse.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A pinned 256-bit constant failed to parse.
    #[error("invalid consensus constant: {0}")]
    Consensus(#[from] ConsensusError),

    /// The constructed genesis block disagrees with a pinned hash.
    #[error("genesis {field} mismatch: expected {expected}, got {got}")]
    GenesisMismatch {
        /// Which value disagreed.
        field: &'static str,
        /// Pinned value.
        expected: String,
        /// Computed value.
        got: String,
    },

    /// The genesis mining hash satisfies neither the pinned hash nor its
    /// own target.
    #[error("genesis proof-of-work hash does not satisfy its target")]
    GenesisPow,

    /// `-segwitheight` outside the accepted range.
    #[error("activation height {0} for segwit is out of valid range; use -1 to disable segwit")]
    SegwitHeightOutOfRange(i64),

    /// `-vbparams` did not have the `deployment:start:end` shape.
    #[error("version bits parameters malformed, expecting deployment:start:end (got {0})")]
    MalformedVbParams(String),

    /// `-vbparams` named an unknown deployment.
    #[error("invalid deployment ({0})")]
    UnknownDeployment(String),

    /// `-vbparams` start time did not parse.
    #[error("invalid start time ({0})")]
    InvalidStartTime(String),

    /// `-vbparams` timeout did not parse.
    #[error("invalid timeout ({0})")]
    InvalidTimeout(String),

    /// `--experimental-retargeter` given for a network other than regtest.
    #[error("experimental retargeter is only available on regtest")]
    ExperimentalOutsideRegtest,

    /// `--experimental-retargeter` named an unknown formula.
    #[error("unknown experimental retargeter ({0}), expecting asert, stf, or wma")]
    UnknownRetargeter(String),
}
