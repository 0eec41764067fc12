// SPDX-FileCopyrightText: 2025 Galen Cuthbertson <g@galen.me>
// SPDX-License-Identifier: MIT

//! Configuration layout.
//!
//! Specify the layout for the configuration file that ppid uses to simplify
//! the process of serialization and deserialization. File I/O is left to the
//! caller to figure out.
//!
//! Every knob the generator exposes lives in one explicit struct passed to
//! the assembler, rather than in loose optional parameters or global state.
//! Every field has a documented default, so an empty configuration file is
//! a valid one.

use crate::codec::{base32::Alphabet, geo, temporal};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Error as FmtError, Formatter, Result as FmtResult},
    str::FromStr,
};

/// Generator configuration.
///
/// Collects the reference epoch, the symbol alphabet, and the standalone
/// geocode length. The identifier layout itself always consumes six geocode
/// symbols; the configured length applies when geocodes are produced on
/// their own.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneratorConfig {
    /// Reference instant that elapsed hours are measured from.
    #[serde(default = "temporal::default_epoch")]
    pub epoch: NaiveDateTime,

    /// Symbol set used by every encoder.
    #[serde(default)]
    pub alphabet: Alphabet,

    /// Symbol length for standalone geocodes.
    #[serde(default = "default_geocode_length")]
    pub geocode_length: usize,
}

fn default_geocode_length() -> usize {
    geo::DEFAULT_LENGTH
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            epoch: temporal::default_epoch(),
            alphabet: Alphabet::default(),
            geocode_length: default_geocode_length(),
        }
    }
}

impl FromStr for GeneratorConfig {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let config: GeneratorConfig =
            toml::de::from_str(data).map_err(ConfigError::Deserialize)?;

        // INVARIANT: Standalone geocode length must fit the interleave word.
        if config.geocode_length == 0 || config.geocode_length > geo::MAX_LENGTH {
            return Err(ConfigError::GeocodeLength(config.geocode_length));
        }

        Ok(config)
    }
}

impl Display for GeneratorConfig {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(
            toml::ser::to_string_pretty(self)
                .map_err(ConfigError::Serialize)?
                .as_str(),
        )
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error(transparent)]
    Deserialize(#[from] toml::de::Error),

    /// Failed to serialize configuration.
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),

    /// Configured geocode length outside the supported range.
    #[error("geocode_length must be between 1 and {n}, got {0}", n = geo::MAX_LENGTH)]
    GeocodeLength(usize),
}

impl From<ConfigError> for FmtError {
    fn from(_: ConfigError) -> Self {
        FmtError
    }
}

/// Friendly result alias :3
type Result<T, E = ConfigError> = std::result::Result<T, E>;
