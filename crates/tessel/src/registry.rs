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
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Dataset sentinel meaning "nothing chosen".
pub const NONE_DATASET: &str = "none";
/// Column sentinel meaning "nothing chosen".
pub const BLANK_COLUMN: &str = "blank";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPracticalType", into = "RawPracticalType")]
pub enum PracticalType {
    String,
    Integer,
    Float,
    /// Categorical column whose colours come from a fixed `(family, granularity)` mapping.
    Mapped { family: String, granularity: String },
}
impl PracticalType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, PracticalType::Integer | PracticalType::Float)
    }
    pub fn is_categorical(&self) -> bool {
        !self.is_numeric()
    }
}
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawPracticalType {
    Named(String),
    Pair(Vec<String>),
}
impl TryFrom<RawPracticalType> for PracticalType {
    type Error = String;
    fn try_from(raw: RawPracticalType) -> Result<Self, Self::Error> {
        match raw {
            RawPracticalType::Named(name) => match name.as_str() {
                "string" => Ok(PracticalType::String),
                "number_int" => Ok(PracticalType::Integer),
                "number_float" => Ok(PracticalType::Float),
                other => Err(format!("unknown practical type '{other}'")),
            },
            RawPracticalType::Pair(parts) => match parts.as_slice() {
                [family, granularity] => Ok(PracticalType::Mapped {
                    family: family.clone(),
                    granularity: granularity.clone(),
                }),
                _ => Err(format!(
                    "mapped practical type needs [family, granularity], got {} parts",
                    parts.len()
                )),
            },
        }
    }
}
impl From<PracticalType> for RawPracticalType {
    fn from(t: PracticalType) -> Self {
        match t {
            PracticalType::String => RawPracticalType::Named("string".to_string()),
            PracticalType::Integer => RawPracticalType::Named("number_int".to_string()),
            PracticalType::Float => RawPracticalType::Named("number_float".to_string()),
            PracticalType::Mapped {
                family,
                granularity,
            } => RawPracticalType::Pair(vec![family, granularity]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeValue {
    Number(f64),
    Text(String),
}
impl RangeValue {
    /// Whether a raw CSV cell names this value; numbers compare numerically.
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            RangeValue::Number(n) => raw.trim().parse::<f64>().is_ok_and(|v| v == *n),
            RangeValue::Text(s) => s == raw,
        }
    }
}
impl fmt::Display for RangeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeValue::Number(n) => write!(f, "{n}"),
            RangeValue::Text(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_registered: Option<String>,
    pub type_practical: PracticalType,
    #[serde(default)]
    pub range: Option<Vec<RangeValue>>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}
impl Column {
    pub fn bounds(&self) -> Option<(f64, f64)> {
        Some((self.min?, self.max?))
    }
    pub fn is_shared_scale(&self) -> bool {
        self.name.contains("shared_scale")
    }
}

/// One entry of the metadata file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetMeta {
    pub column_data: Vec<Column>,
}

#[derive(Debug, Clone)]
pub struct Dataset {
    pub name: String,
    columns: IndexMap<String, Column>,
}
impl Dataset {
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }
    pub fn len(&self) -> usize {
        self.columns.len()
    }
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Per-dataset, per-column metadata, in metadata file order. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct DatasetRegistry {
    datasets: IndexMap<String, Dataset>,
}
impl DatasetRegistry {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> RegistryResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RegistryError::MetadataParse {
                source: serde_json::Error::io(e),
            }
        })?;
        Self::from_json_str(&content)
    }
    pub fn from_json_str(content: &str) -> RegistryResult<Self> {
        let meta: IndexMap<String, DatasetMeta> = serde_json::from_str(content)?;
        Self::from_metadata(meta)
    }
    pub fn from_metadata(meta: IndexMap<String, DatasetMeta>) -> RegistryResult<Self> {
        let mut datasets = IndexMap::with_capacity(meta.len());
        for (name, entry) in meta {
            let mut columns = IndexMap::with_capacity(entry.column_data.len());
            for column in entry.column_data {
                if column.name == BLANK_COLUMN {
                    return Err(RegistryError::InvalidPracticalType {
                        column: column.name,
                        details: "'blank' is reserved for the empty selection".to_string(),
                    });
                }
                if columns.contains_key(&column.name) {
                    return Err(RegistryError::DuplicateColumn {
                        dataset: name.clone(),
                        column: column.name,
                    });
                }
                columns.insert(column.name.clone(), column);
            }
            datasets.insert(
                name.clone(),
                Dataset {
                    name,
                    columns,
                },
            );
        }
        Ok(Self { datasets })
    }
    pub fn dataset(&self, name: &str) -> Option<&Dataset> {
        self.datasets.get(name)
    }
    pub fn datasets(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.values()
    }
    pub fn column(&self, dataset: &str, column: &str) -> RegistryResult<&Column> {
        self.dataset(dataset)
            .ok_or_else(|| RegistryError::UnknownDataset {
                name: dataset.to_string(),
            })?
            .column(column)
            .ok_or_else(|| RegistryError::UnknownColumn {
                dataset: dataset.to_string(),
                column: column.to_string(),
            })
    }
    pub fn contains(&self, dataset: &str) -> bool {
        dataset == NONE_DATASET || self.datasets.contains_key(dataset)
    }
    /// Dataset dropdown entries: the `none` sentinel first, then registry order.
    pub fn dataset_options(&self) -> Vec<String> {
        std::iter::once(NONE_DATASET.to_string())
            .chain(self.datasets.keys().cloned())
            .collect()
    }
    /// Column dropdown entries for a dataset: its columns followed by `blank`.
    pub fn column_options(&self, dataset: &str) -> RegistryResult<Vec<String>> {
        if dataset == NONE_DATASET {
            return Ok(vec![BLANK_COLUMN.to_string()]);
        }
        let ds = self
            .dataset(dataset)
            .ok_or_else(|| RegistryError::UnknownDataset {
                name: dataset.to_string(),
            })?;
        Ok(ds
            .columns
            .keys()
            .cloned()
            .chain(std::iter::once(BLANK_COLUMN.to_string()))
            .collect())
    }
    pub fn len(&self) -> usize {
        self.datasets.len()
    }
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const META: &str = r#"{
        "[OA]_PTAL_directory.csv": {"column_data": [
            {"name": "Public_Transport_Accessibility_Level", "type_registered": "object",
             "type_practical": ["PTAL", "default"], "range": ["1a", "2", "6b"], "min": null, "max": null}
        ]},
        "[OA]_Normalizing_properties.csv": {"column_data": [
            {"name": "OA_area_meters", "type_practical": "number_float", "range": null, "min": 10.5, "max": 99.0},
            {"name": "households", "type_practical": "number_int", "range": [1, 2, 3], "min": 1, "max": 3}
        ]}
    }"#;
    #[test]
    fn parses_metadata_in_file_order() {
        let r = DatasetRegistry::from_json_str(META).unwrap();
        assert_eq!(
            r.dataset_options(),
            vec![
                "none",
                "[OA]_PTAL_directory.csv",
                "[OA]_Normalizing_properties.csv"
            ]
        );
        let c = r
            .column("[OA]_PTAL_directory.csv", "Public_Transport_Accessibility_Level")
            .unwrap();
        assert_eq!(
            c.type_practical,
            PracticalType::Mapped {
                family: "PTAL".into(),
                granularity: "default".into()
            }
        );
        let area = r
            .column("[OA]_Normalizing_properties.csv", "OA_area_meters")
            .unwrap();
        assert_eq!(area.bounds(), Some((10.5, 99.0)));
    }
    #[test]
    fn column_options_end_with_blank() {
        let r = DatasetRegistry::from_json_str(META).unwrap();
        assert_eq!(
            r.column_options("[OA]_Normalizing_properties.csv").unwrap(),
            vec!["OA_area_meters", "households", "blank"]
        );
        assert_eq!(r.column_options(NONE_DATASET).unwrap(), vec!["blank"]);
        assert!(r.column_options("missing.csv").is_err());
    }
    #[test]
    fn rejects_unknown_practical_type() {
        let bad = r#"{"x.csv": {"column_data": [{"name": "a", "type_practical": "number_complex"}]}}"#;
        assert!(DatasetRegistry::from_json_str(bad).is_err());
    }
    #[test]
    fn rejects_duplicate_columns() {
        let dup = r#"{"x.csv": {"column_data": [
            {"name": "a", "type_practical": "string", "range": ["p"]},
            {"name": "a", "type_practical": "string", "range": ["q"]}
        ]}}"#;
        assert!(matches!(
            DatasetRegistry::from_json_str(dup),
            Err(RegistryError::DuplicateColumn { .. })
        ));
    }
    #[test]
    fn practical_type_round_trips_through_json() {
        let t = PracticalType::Mapped {
            family: "household".into(),
            granularity: "group".into(),
        };
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#"["household","group"]"#);
    }
}
