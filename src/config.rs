/*
config.rs

Copyright 2025 Hervé Quatremain

This file is part of Tracepanel.

Tracepanel is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Tracepanel is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Tracepanel. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Application settings.
//!
//! The settings come from an optional JSON file. Missing keys take their default values, and
//! the command-line options override what the file sets.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const PKGNAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const COPYRIGHT_NOTICE: &str = "Copyright 2025 Hervé Quatremain";

/// Name of the settings file in the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// How the generator places the start and end nodes.
#[derive(Serialize, Deserialize, ValueEnum, Debug, Copy, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EndpointPolicy {
    /// Start in the top-left corner and end in the bottom-right corner.
    #[default]
    Corners,

    /// Two distinct nodes drawn at random on the border.
    Border,
}

/// Settings for the random panel generator.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Smallest number of nodes along each axis.
    pub min_size: usize,

    /// Largest number of nodes along each axis.
    pub max_size: usize,

    /// Placement of the start and end nodes.
    pub endpoints: EndpointPolicy,

    /// Number of positions tried for a symbol before giving up on it.
    pub max_placement_attempts: usize,

    /// Also generate stars and triangles.
    pub extended_symbols: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_size: 3,
            max_size: 20,
            endpoints: EndpointPolicy::Corners,
            max_placement_attempts: 32,
            extended_symbols: false,
        }
    }
}

/// Errors raised when loading the settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("the size range {0}..={1} is not valid")]
    SizeRange(usize, usize),
}

/// Application settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub generator: GeneratorConfig,

    /// Directory for the saved panels and sessions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Default number of panels listed.
    pub list_limit: usize,
}

impl Config {
    /// Default number of panels listed.
    pub const LIST_LIMIT: usize = 20;

    /// Load the settings from a JSON file.
    ///
    /// # Errors
    ///
    /// The method returns an error if the file cannot be read or parsed, or if the sizes it
    /// defines are inconsistent.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file: File = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let reader: BufReader<File> = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.check()?;
        Ok(config)
    }

    /// Load the settings from the given file, or from the data directory if it has one.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(p) = path {
            return Self::load(p);
        }
        let default_path: PathBuf = Config::default().data_dir().join(CONFIG_FILE);
        if default_path.exists() {
            Self::load(&default_path)
        } else {
            Ok(Config::default())
        }
    }

    /// Verify the consistency of the settings.
    pub fn check(&self) -> Result<(), ConfigError> {
        let g: &GeneratorConfig = &self.generator;
        if g.min_size < 2 || g.min_size > g.max_size {
            return Err(ConfigError::SizeRange(g.min_size, g.max_size));
        }
        Ok(())
    }

    /// Return the data directory.
    ///
    /// Without an explicit setting, the directory is `$XDG_DATA_HOME/tracepanel`, or
    /// `$HOME/.local/share/tracepanel`.
    pub fn data_dir(&self) -> PathBuf {
        if let Some(d) = &self.data_dir {
            return d.clone();
        }
        let base: PathBuf = match env::var_os("XDG_DATA_HOME") {
            Some(d) if !d.is_empty() => PathBuf::from(d),
            _ => match env::var_os("HOME") {
                Some(h) => PathBuf::from(h).join(".local").join("share"),
                None => PathBuf::from("."),
            },
        };
        base.join(PKGNAME)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            data_dir: None,
            list_limit: Config::LIST_LIMIT,
        }
    }
}
