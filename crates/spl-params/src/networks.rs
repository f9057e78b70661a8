//! Per-network chain parameters.

use crate::checkpoints::{main_checkpoints, regtest_checkpoints, test_checkpoints};
use crate::error::ParamsError;
use crate::genesis::standard_genesis_block;
use crate::options::{apply_regtest_options, RegtestOptions};
use core::fmt;
use core::str::FromStr;
use spl_consensus::{
    bits_to_target, target_to_bits, Bip9Deployment, ConsensusParams, DifficultyOverride, Uint256,
    NO_TIMEOUT,
};
use spl_core::{Algo, AlgoHashes, Block, BlockHash, COIN, VERSION_POW_QUARK};

/// The three chains.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Network {
    /// The production network.
    Main,
    /// The public test network.
    Test,
    /// Local regression testing.
    Regtest,
}

impl FromStr for Network {
    type Err = ParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" => Ok(Network::Main),
            "test" => Ok(Network::Test),
            "regtest" => Ok(Network::Regtest),
            other => Err(ParamsError::UnknownChain(other.to_string())),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Network::Main => "main",
            Network::Test => "test",
            Network::Regtest => "regtest",
        })
    }
}

/// Everything a node needs to know about one network.
#[derive(Clone, Debug)]
pub struct ChainParams {
    /// Which chain this is.
    pub network: Network,
    /// Consensus constants.
    pub consensus: ConsensusParams,
    /// P2P message start bytes.
    pub message_start: [u8; 4],
    /// Default P2P port.
    pub default_port: u16,
    /// Bech32 human-readable part.
    pub bech32_hrp: &'static str,
    /// Base58 version byte for pay-to-pubkey-hash addresses.
    pub base58_pubkey_prefix: u8,
    /// Base58 version byte for pay-to-script-hash addresses.
    pub base58_script_prefix: u8,
    /// Base58 version byte for WIF secrets.
    pub base58_secret_prefix: u8,
    /// BIP32 extended public key prefix.
    pub ext_public_key_prefix: [u8; 4],
    /// BIP32 extended secret key prefix.
    pub ext_secret_key_prefix: [u8; 4],
    /// BIP44 coin type.
    pub ext_coin_type: u32,
    /// The deterministic genesis block.
    pub genesis: Block,
    /// Pinned genesis block hash.
    pub genesis_hash: BlockHash,
    /// Hard checkpoints (height, hash), ascending.
    pub checkpoints: Vec<(u32, BlockHash)>,
}

fn limit(hex: &str) -> Result<Uint256, ParamsError> {
    Ok(Uint256::from_be_hex(hex)?)
}

fn main_difficulty_overrides() -> Result<Vec<DifficultyOverride>, ParamsError> {
    // The difficulty was reset to before the Scrypt² difficulty bug
    // started when the patch deployed; the first two blocks on the new
    // difficulty carry these exact targets.
    Ok(vec![
        DifficultyOverride {
            height: 1_035_619,
            time: 1_574_157_019,
            algo: Algo::PowScryptSquared,
            prev_hash: "676df2e0427b68622343a0f1fb4e683dfc587ed6d49e5566dcca2dcbb179f5d2"
                .parse()?,
            bits: 0x1f09_9ab7,
        },
        DifficultyOverride {
            height: 1_035_629,
            time: 1_574_158_315,
            algo: Algo::PowScryptSquared,
            prev_hash: "1787ac2c2d10543cdea74c15f1cbbdd95988eeea420cf55c5f50890c208f4f14"
                .parse()?,
            bits: 0x1f03_82e8,
        },
    ])
}

impl ChainParams {
    /// Build parameters for a network; `options` apply to regtest only.
    ///
    /// `--experimental-retargeter` must not reach a live chain.
    pub fn for_network(network: Network, options: &RegtestOptions) -> Result<Self, ParamsError> {
        if network != Network::Regtest && options.experimental_retargeter.is_some() {
            return Err(ParamsError::ExperimentalOutsideRegtest);
        }
        match network {
            Network::Main => Self::main(),
            Network::Test => Self::testnet(),
            Network::Regtest => Self::regtest(options),
        }
    }

    /// The production network.
    pub fn main() -> Result<Self, ParamsError> {
        let consensus = ConsensusParams {
            pow_limit: [
                // 0x1e0fffff
                limit("00000fffff000000000000000000000000000000000000000000000000000000")?,
                // 0x1f00ffff
                limit("0000ffff00000000000000000000000000000000000000000000000000000000")?,
                // 0x1f1fffff
                limit("001fffff00000000000000000000000000000000000000000000000000000000")?,
                limit("000000ffff000000000000000000000000000000000000000000000000000000")?,
                // 0x1f00ffff
                limit("0000ffff00000000000000000000000000000000000000000000000000000000")?,
            ],
            pow_target_spacing: 80,
            pow_target_timespan: 2 * 60 * 60,
            mandatory_upgrade_block: [1_030_000, 1_450_000],
            upgrade_block_version: [8, 9],
            pow_allow_min_difficulty_blocks: true,
            pow_no_retargeting: false,
            // One week of blocks.
            miner_confirmation_window: 7 * 24 * 60 * 60 / 80,
            // 95% of the blocks in the past week.
            rule_change_activation_threshold: 7_182,
            subsidy_halving_interval: 100_000,
            segwit_height: 0,
            deployments: [Bip9Deployment {
                bit: 28,
                start_time: 1_199_145_601, // January 1, 2008
                timeout: 1_230_767_999,    // December 31, 2008
            }],
            difficulty_overrides: main_difficulty_overrides()?,
            experimental_retargeter: None,
        };

        let genesis_bits = target_to_bits(&consensus.pow_limit[Algo::PowQuark.index()]);
        let genesis = standard_genesis_block(1_517_690_700, 561_379, genesis_bits, 1, 0)?;
        Self::assemble(
            Network::Main,
            consensus,
            genesis,
            "f4bbfc518aa3622dbeb8d2818a606b82c2b8b1ac2f28553ebdb6fc04d7abaccf",
            "40bdd3d5ae84b91a71190094a82948400eb3356e87c5376b64d79509cf552d84",
            ChainFront {
                message_start: [0xb3, 0x07, 0x9a, 0x1e],
                default_port: 11_957,
                bech32_hrp: "sp",
                base58_pubkey_prefix: 18,
                base58_script_prefix: 59,
                base58_secret_prefix: 93,
                ext_public_key_prefix: [0x04, 0x88, 0xb2, 0x1e],
                ext_secret_key_prefix: [0x04, 0x88, 0xad, 0xe4],
                ext_coin_type: 448,
                checkpoints: main_checkpoints()?,
            },
        )
    }

    /// The public test network.
    pub fn testnet() -> Result<Self, ParamsError> {
        let consensus = ConsensusParams {
            pow_limit: [
                limit("000000ffff000000000000000000000000000000000000000000000000000000")?,
                limit("000000ffff000000000000000000000000000000000000000000000000000000")?,
                limit("001fffff00000000000000000000000000000000000000000000000000000000")?,
                limit("000000ffff000000000000000000000000000000000000000000000000000000")?,
                limit("0000ffff00000000000000000000000000000000000000000000000000000000")?,
            ],
            pow_target_spacing: 64,
            pow_target_timespan: 2 * 60 * 60,
            mandatory_upgrade_block: [0, 0],
            upgrade_block_version: [0, 0],
            pow_allow_min_difficulty_blocks: true,
            pow_no_retargeting: false,
            miner_confirmation_window: 7 * 24 * 60 * 60 / 64,
            // 75% for testchains.
            rule_change_activation_threshold: 7_087,
            subsidy_halving_interval: 210_000,
            segwit_height: 0,
            deployments: [Bip9Deployment {
                bit: 28,
                start_time: 1_199_145_601,
                timeout: 1_230_767_999,
            }],
            difficulty_overrides: Vec::new(),
            experimental_retargeter: None,
        };

        let genesis_bits = target_to_bits(&consensus.pow_limit[Algo::PowQuark.index()]);
        let genesis =
            standard_genesis_block(1_574_924_400, 2_961, genesis_bits, VERSION_POW_QUARK, 10_000 * COIN)?;
        Self::assemble(
            Network::Test,
            consensus,
            genesis,
            "16e0228f2712c94c10ec590a98a416a664bdf42ebd10a6ffe563d817ee19b6b9",
            "56d78c2879e2a685669fd14576a9b267dcc2adad9ffa6049d079e5acf3137b40",
            ChainFront {
                message_start: [0xf1, 0xe3, 0xdc, 0xc6],
                default_port: 21_957,
                bech32_hrp: "ts",
                base58_pubkey_prefix: 139,
                base58_script_prefix: 19,
                base58_secret_prefix: 239,
                ext_public_key_prefix: [0x04, 0x35, 0x87, 0xcf],
                ext_secret_key_prefix: [0x04, 0x35, 0x83, 0x94],
                ext_coin_type: 1,
                checkpoints: test_checkpoints()?,
            },
        )
    }

    /// Local regression testing, with optional overrides.
    pub fn regtest(options: &RegtestOptions) -> Result<Self, ParamsError> {
        let mut consensus = ConsensusParams {
            pow_limit: [
                limit("7fffff0000000000000000000000000000000000000000000000000000000000")?,
                limit("7fffff0000000000000000000000000000000000000000000000000000000000")?,
                limit("7fffff0000000000000000000000000000000000000000000000000000000000")?,
                limit("7fffff0000000000000000000000000000000000000000000000000000000000")?,
                limit("7fffff0000000000000000000000000000000000000000000000000000000000")?,
            ],
            pow_target_spacing: 32,
            pow_target_timespan: 2 * 60 * 60,
            mandatory_upgrade_block: [0, 0],
            upgrade_block_version: [0, 0],
            pow_allow_min_difficulty_blocks: true,
            pow_no_retargeting: false,
            // One day of blocks, faster than the one-week mainnet window.
            miner_confirmation_window: 24 * 60 * 60 / 32,
            rule_change_activation_threshold: 2_025,
            subsidy_halving_interval: 150,
            segwit_height: 0,
            deployments: [Bip9Deployment {
                bit: 28,
                start_time: 0,
                timeout: NO_TIMEOUT,
            }],
            difficulty_overrides: Vec::new(),
            experimental_retargeter: None,
        };
        apply_regtest_options(&mut consensus, options)?;

        let genesis =
            standard_genesis_block(1_574_924_400, 47_047, 0x1f00_ffff, VERSION_POW_QUARK, 10_000 * COIN)?;
        Self::assemble(
            Network::Regtest,
            consensus,
            genesis,
            "bccd4c5f87de046e4cd9e222982371c0cf0ad8b5fcfa6753be472f04544fb41f",
            "56d78c2879e2a685669fd14576a9b267dcc2adad9ffa6049d079e5acf3137b40",
            ChainFront {
                message_start: [0xfa, 0xbf, 0xb5, 0xda],
                default_port: 18_444,
                bech32_hrp: "sprt",
                base58_pubkey_prefix: 139,
                base58_script_prefix: 19,
                base58_secret_prefix: 239,
                ext_public_key_prefix: [0x04, 0x35, 0x87, 0xcf],
                ext_secret_key_prefix: [0x04, 0x35, 0x83, 0x94],
                ext_coin_type: 1,
                checkpoints: regtest_checkpoints()?,
            },
        )
    }

    fn assemble(
        network: Network,
        consensus: ConsensusParams,
        genesis: Block,
        genesis_hash: &str,
        genesis_merkle: &str,
        front: ChainFront,
    ) -> Result<Self, ParamsError> {
        let genesis_hash: BlockHash = genesis_hash.parse()?;
        let genesis_merkle: BlockHash = genesis_merkle.parse()?;

        if genesis.header.merkle_root != genesis_merkle {
            return Err(ParamsError::GenesisMismatch {
                field: "merkle root",
                expected: genesis_merkle.to_string(),
                got: genesis.header.merkle_root.to_string(),
            });
        }
        // Tagged genesis versions hash with SHA-256d, so the block hash is
        // checkable right here; the legacy mainnet genesis hashes with
        // Quark and is deferred to `verify_genesis`.
        if genesis.header.version > 1 {
            let got = genesis.header.serialize_hash();
            if got != genesis_hash {
                return Err(ParamsError::GenesisMismatch {
                    field: "block hash",
                    expected: genesis_hash.to_string(),
                    got: got.to_string(),
                });
            }
        }

        Ok(ChainParams {
            network,
            consensus,
            message_start: front.message_start,
            default_port: front.default_port,
            bech32_hrp: front.bech32_hrp,
            base58_pubkey_prefix: front.base58_pubkey_prefix,
            base58_script_prefix: front.base58_script_prefix,
            base58_secret_prefix: front.base58_secret_prefix,
            ext_public_key_prefix: front.ext_public_key_prefix,
            ext_secret_key_prefix: front.ext_secret_key_prefix,
            ext_coin_type: front.ext_coin_type,
            genesis,
            genesis_hash,
            checkpoints: front.checkpoints,
        })
    }

    /// Recompute and check the genesis hashes with real hash primitives.
    ///
    /// The mining hash must either satisfy its own target or equal the
    /// mainnet canonical hash, and the block hash must equal the pinned
    /// value.
    pub fn verify_genesis(&self, hashes: &AlgoHashes) -> Result<(), ParamsError> {
        let header = &self.genesis.header;
        let target = bits_to_target(header.bits).target;
        let pow = header.pow_hash(hashes);
        let main_canonical: BlockHash =
            "f4bbfc518aa3622dbeb8d2818a606b82c2b8b1ac2f28553ebdb6fc04d7abaccf".parse()?;
        let meets_target = Uint256::from_le_bytes(pow.as_bytes()) <= target;
        if pow != main_canonical && !meets_target {
            return Err(ParamsError::GenesisPow);
        }

        let got = header.hash(hashes);
        if got != self.genesis_hash {
            return Err(ParamsError::GenesisMismatch {
                field: "block hash",
                expected: self.genesis_hash.to_string(),
                got: got.to_string(),
            });
        }
        Ok(())
    }

    /// Checkpoint hash pinned at a height, if any.
    pub fn checkpoint_at(&self, height: u32) -> Option<&BlockHash> {
        self.checkpoints
            .iter()
            .find(|&&(h, _)| h == height)
            .map(|(_, hash)| hash)
    }
}

struct ChainFront {
    message_start: [u8; 4],
    default_port: u16,
    bech32_hrp: &'static str,
    base58_pubkey_prefix: u8,
    base58_script_prefix: u8,
    base58_secret_prefix: u8,
    ext_public_key_prefix: [u8; 4],
    ext_secret_key_prefix: [u8; 4],
    ext_coin_type: u32,
    checkpoints: Vec<(u32, BlockHash)>,
}
