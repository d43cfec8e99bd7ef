use rand::{rngs::SmallRng, SeedableRng};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::{BLOCK_COUNT, BLOCK_LEN};

/// Seed for the block synthesis generator.
pub const SYNTH_SEED_VAR: &str = "EYELIGHT_SYNTH_SEED";
/// Seed for the mixer's block reselection generator.
pub const RESELECT_SEED_VAR: &str = "EYELIGHT_RESELECT_SEED";

/// Startup parameters for [`NoiseEngine`](crate::NoiseEngine).
///
/// Pool dimensions come from the compile-time constants. Seeds are optional;
/// an unset seed draws from OS entropy, so every run sounds different.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub block_count: usize,
    pub block_len: usize,
    pub synthesis_seed: Option<u64>,
    pub reselect_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            block_count: BLOCK_COUNT,
            block_len: BLOCK_LEN,
            synthesis_seed: None,
            reselect_seed: None,
        }
    }
}

impl EngineConfig {
    /// Defaults, with seeds taken from the environment when set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let seed = |key: &str| -> Result<Option<u64>> {
            lookup(key)
                .map(|value| {
                    value
                        .trim()
                        .parse::<u64>()
                        .map_err(|e| Error::Config(format!("{key}={value:?}: {e}")))
                })
                .transpose()
        };

        Ok(Self {
            synthesis_seed: seed(SYNTH_SEED_VAR)?,
            reselect_seed: seed(RESELECT_SEED_VAR)?,
            ..Self::default()
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.block_count == 0 {
            return Err(Error::Config("block_count must be non-zero".into()));
        }
        if self.block_len == 0 {
            return Err(Error::Config("block_len must be non-zero".into()));
        }
        Ok(())
    }

    pub fn synthesis_rng(&self) -> SmallRng {
        seeded_rng(self.synthesis_seed)
    }

    pub fn reselect_rng(&self) -> SmallRng {
        seeded_rng(self.reselect_seed)
    }
}

fn seeded_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_use_pool_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.block_count, 20);
        assert_eq!(config.block_len, 65_536);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn seeds_read_from_environment() {
        let config =
            EngineConfig::from_lookup(lookup(&[(SYNTH_SEED_VAR, "7"), (RESELECT_SEED_VAR, " 9 ")]))
                .unwrap();
        assert_eq!(config.synthesis_seed, Some(7));
        assert_eq!(config.reselect_seed, Some(9));
    }

    #[test]
    fn missing_seeds_stay_unset() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn bad_seed_is_an_error() {
        let err = EngineConfig::from_lookup(lookup(&[(SYNTH_SEED_VAR, "seven")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn zero_dimensions_rejected() {
        let config = EngineConfig {
            block_count: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn seeded_generators_are_independent() {
        let config = EngineConfig {
            synthesis_seed: Some(1),
            reselect_seed: Some(2),
            ..EngineConfig::default()
        };
        let a: u64 = config.synthesis_rng().random();
        let b: u64 = config.reselect_rng().random();
        let again: u64 = config.synthesis_rng().random();
        assert_ne!(a, b);
        assert_eq!(a, again);
    }
}
