//! Module `config` holds the tuning knobs for a [`crate::tree::BTree`],
//! built the way the teacher builds on-disk index configuration: a
//! plain struct with a `validate()` step, optionally loaded from TOML.

#[cfg(feature = "config-toml")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Smallest allowed value for [`Config::max_node_size`] (invariant 5).
pub const MIN_NODE_SIZE: usize = 6;
/// Largest allowed value for [`Config::max_node_size`] (invariant 5).
pub const MAX_NODE_SIZE: usize = 126;

/// Tuning parameters for a B-link tree.
///
/// `max_node_size` is `B` from the specification: the maximum number of
/// live entries a node may carry before it must split. It must be even
/// and fall within `[MIN_NODE_SIZE, MAX_NODE_SIZE]`.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "config-toml", derive(Serialize, Deserialize))]
pub struct Config {
    pub max_node_size: usize,
    /// Track `len()` in O(1) via a modification-listener-fed counter
    /// (the `OptionalCounter` of the specification) instead of a linear
    /// leaf-chain walk.
    pub track_size: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            max_node_size: 32,
            track_size: true,
        }
    }
}

impl Config {
    /// Construct a configuration with the given max node size, default
    /// everything else.
    pub fn new(max_node_size: usize) -> Config {
        Config {
            max_node_size,
            ..Config::default()
        }
    }

    /// Validate invariant 5: `6 <= B <= 126` and `B` even.
    pub fn validate(&self) -> Result<()> {
        if self.max_node_size < MIN_NODE_SIZE || self.max_node_size > MAX_NODE_SIZE {
            return Err(Error::InvalidArgument(format!(
                "max_node_size {} outside [{}, {}]",
                self.max_node_size, MIN_NODE_SIZE, MAX_NODE_SIZE
            )));
        }
        if self.max_node_size % 2 != 0 {
            return Err(Error::InvalidArgument(format!(
                "max_node_size {} must be even",
                self.max_node_size
            )));
        }
        Ok(())
    }

    /// Parse a configuration from a TOML document. Requires the
    /// `config-toml` feature, mirroring the teacher's optional
    /// `toml`/`serde` dependency pair.
    #[cfg(feature = "config-toml")]
    pub fn from_toml(text: &str) -> Result<Config> {
        let config: Config =
            toml::from_str(text).map_err(|e| Error::InvalidArgument(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod config_test;
