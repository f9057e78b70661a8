//! Hard checkpoints.
//!
//! Consulted by higher layers to refuse reorganizations below pinned
//! heights; the consensus core itself never reads them.

use crate::error::ParamsError;
use spl_core::BlockHash;

/// Mainnet checkpoints (height, block hash).
const MAIN_CHECKPOINTS: &[(u32, &str)] = &[
    (0, "f4bbfc518aa3622dbeb8d2818a606b82c2b8b1ac2f28553ebdb6fc04d7abaccf"),
    (50_000, "525c080ed904eeaaf00ac0c088c6cd0ceabe3918bebbd80ec2ed494939077965"),
    (100_000, "9c8f67b0d656a451250b1f4e1fca9980e23ae5eb2d70e0798b76ea4c30e63bad"),
    (150_000, "b9d5e51f05e23034c6da1347ca28a704ad75d2249ca5ac16e97ed9c25b261e3a"),
    (200_000, "505d2588728736dce8985830f0cce34cc3ae766482fba2e46ae522c98423a560"),
    (250_000, "a66859b5e88ef9db8194eddde917a40adfca707958d56f97d727373090152250"),
    (300_000, "25a1eaa7edd3e06afecb7de062d0a713d09766ffa0685997ae01ca5950b4ff61"),
    (350_000, "0457c2096e529aab2855d7338e77f3a3a3da9a45bb272a0d74ca35f0d234ef16"),
    (400_000, "02709ff59f09b08684bdab6000b7ad134f1d54ac4079202c94173378fabc44e7"),
    (450_000, "54fbd621e99ed213de13a273935cf29ec8b086f8498351f1bc103c43f6f356d1"),
    (500_000, "8c9974c78873ca6f3636c096007b90a3d23ed6f79b645a6d3e83d875c90b79f5"),
    (550_000, "c5f0a3c19ecfd9ccdb2818a71663e063486cd75874fe68a84755092417e4ae85"),
    (600_000, "5698cbf27f591da46ababc40c9ed7718086493e3542c00c35a6de86de6b6add6"),
    (650_000, "cf6076eda981af1097e52f505c0c3dfefc60af9b93ba674fda8e22235ff50df3"),
    (700_000, "2f852dfbc9b767905400c0e706ff63eca8d5e4090d4d49f873f9be1a754cc243"),
    (750_000, "c723e552d2287dc1309d33ded2b722beb2fe08ec5eaa0a95c63de2ea12aee150"),
    (800_000, "a27bf851d7055180d0f94593862a8a68a176d40bc3218427c26cc7d4ac050bb7"),
    (850_000, "94efaa5b8397bb0fa5c63cf211551e94f9cb21bb18c3fb0e15f798614cd9d6a6"),
    (900_000, "8dd45153002324052253321454138627161a91982185a578940307ed45193635"),
    (950_000, "0cbb4dfac570e6cbf7aa10b3f8a138b3dda3e908ab78e301f12354731bbce560"),
    (1_000_000, "da2636057aa54f047fddb79a6d71617ac075c59c26c84761585735b4e5978f3c"),
    (1_050_000, "9ab97fa25881e95b4c22fb7515d90738054a43231231acf8d5fc3be581591192"),
    (1_100_000, "8aecf2e9d02460c3a97d83a178bf6f9f81684e2df1f95d8cd9dea1ae780b814e"),
    (1_110_000, "442f3ff725f9128bb432cac6e4c312c31548a646bacb933ff80fc214aea09eff"),
];

fn parse(table: &[(u32, &str)]) -> Result<Vec<(u32, BlockHash)>, ParamsError> {
    table
        .iter()
        .map(|&(height, hash)| Ok((height, hash.parse::<BlockHash>()?)))
        .collect()
}

/// Mainnet checkpoint map.
pub fn main_checkpoints() -> Result<Vec<(u32, BlockHash)>, ParamsError> {
    parse(MAIN_CHECKPOINTS)
}

/// Testnet checkpoint map (genesis only).
pub fn test_checkpoints() -> Result<Vec<(u32, BlockHash)>, ParamsError> {
    parse(&[(
        0,
        "16e0228f2712c94c10ec590a98a416a664bdf42ebd10a6ffe563d817ee19b6b9",
    )])
}

/// Regtest checkpoint map (genesis only).
pub fn regtest_checkpoints() -> Result<Vec<(u32, BlockHash)>, ParamsError> {
    parse(&[(
        0,
        "bccd4c5f87de046e4cd9e222982371c0cf0ad8b5fcfa6753be472f04544fb41f",
    )])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_parse_and_ascend() {
        let map = main_checkpoints().expect("parse");
        assert_eq!(map.len(), 24);
        assert!(map.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(map[0].0, 0);
    }
}
