//! Regtest startup overrides.
//!
//! Regtest accepts a handful of command-line overrides so functional tests
//! can reshape activation rules; every other network ignores them. Bad
//! values are startup failures, never silently corrected.

use crate::error::ParamsError;
use spl_consensus::{ConsensusParams, DeploymentPos, ExperimentalRetargeter, NEVER};

/// Parsed regtest overrides.
#[derive(Clone, Debug, Default)]
pub struct RegtestOptions {
    /// `-segwitheight=<height>`; -1 disables segwit.
    pub segwit_height: Option<i64>,
    /// `-vbparams=deployment:start:end`, repeatable.
    pub vbparams: Vec<String>,
    /// `--experimental-retargeter={asert|stf|wma}`.
    pub experimental_retargeter: Option<ExperimentalRetargeter>,
}

/// Apply the overrides to freshly built regtest consensus parameters.
pub fn apply_regtest_options(
    consensus: &mut ConsensusParams,
    options: &RegtestOptions,
) -> Result<(), ParamsError> {
    if let Some(height) = options.segwit_height {
        if height < -1 || height >= i64::from(i32::MAX) {
            return Err(ParamsError::SegwitHeightOutOfRange(height));
        }
        consensus.segwit_height = if height == -1 { NEVER } else { height as u32 };
    }

    for deployment in &options.vbparams {
        let parts: Vec<&str> = deployment.split(':').collect();
        if parts.len() != 3 {
            return Err(ParamsError::MalformedVbParams(deployment.clone()));
        }
        let pos: DeploymentPos = parts[0]
            .parse()
            .map_err(|()| ParamsError::UnknownDeployment(parts[0].to_string()))?;
        let start_time: i64 = parts[1]
            .parse()
            .map_err(|_| ParamsError::InvalidStartTime(parts[1].to_string()))?;
        let timeout: i64 = parts[2]
            .parse()
            .map_err(|_| ParamsError::InvalidTimeout(parts[2].to_string()))?;
        let slot = &mut consensus.deployments[pos as usize];
        slot.start_time = start_time;
        slot.timeout = timeout;
    }

    consensus.experimental_retargeter = options.experimental_retargeter;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::networks::ChainParams;

    #[test]
    fn segwit_height_bounds() {
        let mut options = RegtestOptions::default();
        options.segwit_height = Some(-2);
        assert!(matches!(
            ChainParams::regtest(&options),
            Err(ParamsError::SegwitHeightOutOfRange(-2))
        ));

        options.segwit_height = Some(-1);
        let params = ChainParams::regtest(&options).expect("disable ok");
        assert_eq!(params.consensus.segwit_height, NEVER);

        options.segwit_height = Some(500);
        let params = ChainParams::regtest(&options).expect("height ok");
        assert_eq!(params.consensus.segwit_height, 500);
    }

    #[test]
    fn vbparams_shapes() {
        let mut options = RegtestOptions::default();
        options.vbparams = vec!["testdummy:100:200".into()];
        let params = ChainParams::regtest(&options).expect("vbparams ok");
        assert_eq!(params.consensus.deployments[0].start_time, 100);
        assert_eq!(params.consensus.deployments[0].timeout, 200);

        options.vbparams = vec!["testdummy:100".into()];
        assert!(matches!(
            ChainParams::regtest(&options),
            Err(ParamsError::MalformedVbParams(_))
        ));

        options.vbparams = vec!["nosuch:1:2".into()];
        assert!(matches!(
            ChainParams::regtest(&options),
            Err(ParamsError::UnknownDeployment(_))
        ));

        options.vbparams = vec!["testdummy:abc:2".into()];
        assert!(matches!(
            ChainParams::regtest(&options),
            Err(ParamsError::InvalidStartTime(_))
        ));
    }
}
