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

use crate::error::{RegistryError, RegistryResult};
use crate::palette::{Colour, Hsl, Palette};
use crate::registry::{Column, DatasetRegistry, PracticalType, RangeValue, BLANK_COLUMN, NONE_DATASET};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

/// Value → colour mapping for one column. Every registered column owns exactly one.
#[derive(Debug, Clone, PartialEq)]
pub enum Scale {
    /// Domain values keep their metadata type; the first one decides the domain kind.
    Ordinal {
        domain: Vec<RangeValue>,
        range: Vec<Colour>,
        labels: Option<Vec<String>>,
        unknown: Colour,
    },
    Linear {
        min: f64,
        max: f64,
        low: Hsl,
        high: Hsl,
        unknown: Colour,
    },
    /// Threshold scale over the single `"blank"` domain value.
    Blank { fill: Colour },
}
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DomainValue<'a> {
    Text(&'a str),
    Number(f64),
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainKind {
    Categorical,
    Numeric,
}
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub colour: Colour,
}
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Legend {
    Empty,
    Categorical { entries: Vec<LegendEntry> },
    Continuous { min: String, max: String },
}
impl Scale {
    pub fn domain(&self) -> Vec<DomainValue<'_>> {
        match self {
            Scale::Ordinal { domain, .. } => domain
                .iter()
                .map(|d| match d {
                    RangeValue::Number(n) => DomainValue::Number(*n),
                    RangeValue::Text(t) => DomainValue::Text(t),
                })
                .collect(),
            Scale::Linear { min, max, .. } => vec![DomainValue::Number(*min), DomainValue::Number(*max)],
            Scale::Blank { .. } => vec![DomainValue::Text(BLANK_COLUMN)],
        }
    }
    /// Decided by the type of the first domain element only.
    pub fn domain_kind(&self) -> DomainKind {
        match self.domain().first() {
            Some(DomainValue::Number(_)) => DomainKind::Numeric,
            _ => DomainKind::Categorical,
        }
    }
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match self {
            Scale::Linear { min, max, .. } => Some((*min, *max)),
            _ => None,
        }
    }
    /// Position of `value` between the bounds, 0.0 at min and 1.0 at max.
    pub fn delta(&self, value: f64) -> Option<f64> {
        let (min, max) = self.bounds()?;
        if !value.is_finite() {
            return None;
        }
        if max == min {
            return Some(0.0);
        }
        Some((value - min) / (max - min))
    }
    pub fn colour_for(&self, raw: Option<&str>) -> Colour {
        match self {
            Scale::Ordinal {
                domain,
                range,
                unknown,
                ..
            } => raw
                .and_then(|v| domain.iter().position(|d| d.matches(v)))
                .and_then(|i| range.get(i).cloned())
                .unwrap_or_else(|| unknown.clone()),
            Scale::Linear {
                low, high, unknown, ..
            } => raw
                .and_then(|v| v.trim().parse::<f64>().ok())
                .and_then(|v| self.delta(v))
                .map(|d| Colour::Hsl(low.lerp(high, d)))
                .unwrap_or_else(|| unknown.clone()),
            Scale::Blank { fill } => fill.clone(),
        }
    }
    pub fn legend(&self) -> Legend {
        match self {
            Scale::Ordinal {
                domain,
                range,
                ..
            } => Legend::Categorical {
                entries: domain
                    .iter()
                    .zip(range.iter())
                    .map(|(d, c)| LegendEntry {
                        label: d.to_string(),
                        colour: c.clone(),
                    })
                    .collect(),
            },
            Scale::Linear { min, max, .. } => Legend::Continuous {
                min: format!("{min:.3}"),
                max: format!("{max:.3}"),
            },
            Scale::Blank { .. } => Legend::Empty,
        }
    }
    /// Legend caret offset, in percent, for a hovered value on a continuous scale.
    pub fn caret_percent(&self, raw: Option<&str>) -> Option<f64> {
        let v = raw?.trim().parse::<f64>().ok()?;
        self.delta(v).map(|d| d * 100.0)
    }
    pub fn labels(&self) -> Option<&[String]> {
        match self {
            Scale::Ordinal { labels, .. } => labels.as_deref(),
            _ => None,
        }
    }
    pub fn blank(palette: &Palette) -> Self {
        Scale::Blank {
            fill: palette.blank(),
        }
    }
    pub fn for_column(dataset: &str, column: &Column, palette: &Palette) -> RegistryResult<Self> {
        let empty_domain = || RegistryError::EmptyDomain {
            dataset: dataset.to_string(),
            column: column.name.clone(),
        };
        match &column.type_practical {
            PracticalType::Integer | PracticalType::Float => {
                let (min, max) = column.bounds().ok_or_else(|| RegistryError::MissingBounds {
                    dataset: dataset.to_string(),
                    column: column.name.clone(),
                })?;
                Ok(Scale::Linear {
                    min,
                    max,
                    low: palette.low(),
                    high: palette.high(),
                    unknown: palette.blank(),
                })
            }
            PracticalType::String => {
                let domain = ordinal_domain(column).ok_or_else(empty_domain)?;
                let range = (0..domain.len()).map(|i| palette.generated_at(i)).collect();
                Ok(Scale::Ordinal {
                    domain,
                    range,
                    labels: None,
                    unknown: palette.blank(),
                })
            }
            PracticalType::Mapped {
                family,
                granularity,
            } => {
                let domain = ordinal_domain(column).ok_or_else(empty_domain)?;
                let Some(mapping) = palette.mapping(family, granularity) else {
                    let range = (0..domain.len()).map(|i| palette.generated_at(i)).collect();
                    return Ok(Scale::Ordinal {
                        domain,
                        range,
                        labels: None,
                        unknown: palette.blank(),
                    });
                };
                let mut range = Vec::with_capacity(domain.len());
                let mut labels = Vec::with_capacity(domain.len());
                for value in &domain {
                    match mapping.iter().find(|m| value.matches(&m.value)) {
                        Some(m) => {
                            range.push(Colour::css(m.colour.clone()));
                            labels.push(m.name.clone());
                        }
                        None => {
                            warn!(
                                dataset,
                                column = %column.name,
                                value = %value,
                                "no fixed colour for value in {family}/{granularity}"
                            );
                            range.push(palette.blank());
                            labels.push(value.to_string());
                        }
                    }
                }
                Ok(Scale::Ordinal {
                    domain,
                    range,
                    labels: Some(labels),
                    unknown: palette.blank(),
                })
            }
        }
    }
}
fn ordinal_domain(column: &Column) -> Option<Vec<RangeValue>> {
    column.range.clone().filter(|d| !d.is_empty())
}

/// Scales for every registered column, plus `blank` in each dataset and the `none` dataset.
#[derive(Debug, Clone, Default)]
pub struct ScaleRegistry {
    scales: IndexMap<String, IndexMap<String, Scale>>,
}
impl ScaleRegistry {
    pub fn build(registry: &DatasetRegistry, palette: &Palette) -> RegistryResult<Self> {
        let mut scales = IndexMap::with_capacity(registry.len() + 1);
        for dataset in registry.datasets() {
            let mut columns = IndexMap::with_capacity(dataset.len() + 1);
            for column in dataset.columns() {
                columns.insert(
                    column.name.clone(),
                    Scale::for_column(&dataset.name, column, palette)?,
                );
            }
            columns.insert(BLANK_COLUMN.to_string(), Scale::blank(palette));
            scales.insert(dataset.name.clone(), columns);
        }
        let mut none = IndexMap::with_capacity(1);
        none.insert(BLANK_COLUMN.to_string(), Scale::blank(palette));
        scales.insert(NONE_DATASET.to_string(), none);
        Ok(Self { scales })
    }
    pub fn get(&self, dataset: &str, column: &str) -> Option<&Scale> {
        self.scales.get(dataset).and_then(|c| c.get(column))
    }
    pub fn insert(&mut self, dataset: &str, column: &str, scale: Scale) {
        self.scales
            .entry(dataset.to_string())
            .or_default()
            .insert(column.to_string(), scale);
    }
    pub fn remove(&mut self, dataset: &str, column: &str) -> Option<Scale> {
        self.scales
            .get_mut(dataset)
            .and_then(|c| c.shift_remove(column))
    }
}
