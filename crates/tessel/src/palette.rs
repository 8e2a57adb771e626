// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

//! Colour tables shared by the map overlay and the legends.
//!
//! The default palette is embedded from `config/palette.yml`; a deployment can
//! load its own file with [`Palette::from_yaml_file`].

use crate::error::ConfigError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::Path;

pub const DEFAULT_PALETTE_YAML: &str = include_str!("../config/palette.yml");

/// Twelve-colour qualitative scheme used when a categorical column has no fixed mapping.
pub const PAIRED_SCHEME: [&str; 12] = [
    "#a6cee3", "#1f78b4", "#b2df8a", "#33a02c", "#fb9a99", "#e31a1c", "#fdbf6f", "#ff7f00",
    "#cab2d6", "#6a3d9a", "#ffff99", "#b15928",
];

pub const CLICKED_FILL: &str = "#a815ff";
pub const DEFAULT_FILL: &str = "green";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}
impl Hsl {
    pub fn lerp(&self, high: &Hsl, delta: f64) -> Hsl {
        Hsl {
            h: (high.h - self.h) * delta + self.h,
            s: (high.s - self.s) * delta + self.s,
            l: (high.l - self.l) * delta + self.l,
        }
    }
}
impl From<[f64; 3]> for Hsl {
    fn from(v: [f64; 3]) -> Self {
        Self {
            h: v[0],
            s: v[1],
            l: v[2],
        }
    }
}

/// A CSS colour as handed to the map surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Colour {
    Css(String),
    Hsl(Hsl),
}
impl Colour {
    pub fn css(value: impl Into<String>) -> Self {
        Colour::Css(value.into())
    }
}
impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Colour::Css(s) => write!(f, "{s}"),
            Colour::Hsl(c) => write!(f, "hsl({},{}%,{}%)", c.h, c.s, c.l),
        }
    }
}
impl Serialize for Colour {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedColour {
    pub value: String,
    pub colour: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Palette {
    pub blank_fill: String,
    pub border: String,
    pub continuous_low: [f64; 3],
    pub continuous_high: [f64; 3],
    #[serde(default = "default_generated")]
    pub generated: Vec<String>,
    #[serde(default)]
    pub families: IndexMap<String, IndexMap<String, Vec<MappedColour>>>,
}
fn default_generated() -> Vec<String> {
    PAIRED_SCHEME.iter().map(|c| c.to_string()).collect()
}
impl Palette {
    /// The palette shipped with the crate.
    pub fn standard() -> Result<Self, ConfigError> {
        Self::from_yaml_str(DEFAULT_PALETTE_YAML)
    }
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let palette: Palette = serde_yaml::from_str(content)?;
        palette.validate()?;
        Ok(palette)
    }
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::ConfigFile {
                path: path.as_ref().display().to_string(),
                source,
            })?;
        Self::from_yaml_str(&content)
    }
    fn validate(&self) -> Result<(), ConfigError> {
        if self.generated.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "generated".to_string(),
                reason: "at least one generated colour is required".to_string(),
            });
        }
        Ok(())
    }
    pub fn blank(&self) -> Colour {
        Colour::css(self.blank_fill.clone())
    }
    pub fn border(&self) -> Colour {
        Colour::css(self.border.clone())
    }
    pub fn low(&self) -> Hsl {
        Hsl::from(self.continuous_low)
    }
    pub fn high(&self) -> Hsl {
        Hsl::from(self.continuous_high)
    }
    /// Colour cycled from the generated scheme for the `index`-th domain value.
    pub fn generated_at(&self, index: usize) -> Colour {
        Colour::css(self.generated[index % self.generated.len()].clone())
    }
    /// Fixed mapping for a `(family, granularity)` practical type, if one is defined.
    pub fn mapping(&self, family: &str, granularity: &str) -> Option<&[MappedColour]> {
        self.families
            .get(family)
            .and_then(|g| g.get(granularity))
            .map(Vec::as_slice)
            .filter(|m| !m.is_empty())
    }
}
