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

//! Area index: one optional row per registered dataset for every boundary key.

use crate::error::{DataError, DataResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::io::Read;
use tracing::warn;

/// Raw CSV row, column name to cell text, in file column order.
pub type AreaRow = IndexMap<String, String>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericPolicy {
    /// Missing or non-numeric cells become NaN and flow through sums untouched.
    #[default]
    Lenient,
    Strict,
}
impl NumericPolicy {
    pub fn coerce(&self, column: &str, raw: Option<&str>) -> DataResult<f64> {
        let parsed = raw.and_then(|v| v.trim().parse::<f64>().ok());
        match (self, parsed) {
            (_, Some(v)) => Ok(v),
            (NumericPolicy::Lenient, None) => Ok(f64::NAN),
            (NumericPolicy::Strict, None) => Err(DataError::NonNumeric {
                column: column.to_string(),
                value: raw.unwrap_or("undefined").to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatasetTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<AreaRow>,
}
impl DatasetTable {
    pub fn from_reader<R: Read>(name: &str, reader: R) -> DataResult<Self> {
        let csv_err = |source| DataError::Csv {
            dataset: name.to_string(),
            source,
        };
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers: Vec<String> = rdr
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(str::to_string)
            .collect();
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(csv_err)?;
            let row: AreaRow = headers
                .iter()
                .cloned()
                .zip(record.iter().map(str::to_string))
                .collect();
            rows.push(row);
        }
        Ok(Self {
            name: name.to_string(),
            headers,
            rows,
        })
    }
    pub fn from_csv_str(name: &str, content: &str) -> DataResult<Self> {
        Self::from_reader(name, content.as_bytes())
    }
}

/// Pull every feature's `properties[boundary_key]` out of a GeoJSON or TopoJSON document.
pub fn boundary_keys_from_json(content: &str, boundary_key: &str) -> DataResult<Vec<String>> {
    let doc: Value = serde_json::from_str(content)?;
    let features: Vec<&Value> = if let Some(features) = doc.get("features").and_then(Value::as_array) {
        features.iter().collect()
    } else if let Some(objects) = doc.get("objects").and_then(Value::as_object) {
        objects
            .values()
            .filter_map(|o| o.get("geometries").and_then(Value::as_array))
            .flatten()
            .collect()
    } else {
        return Err(DataError::EmptyBoundary);
    };
    if features.is_empty() {
        return Err(DataError::EmptyBoundary);
    }
    let mut keys = Vec::with_capacity(features.len());
    let mut skipped = 0usize;
    for feature in features {
        match feature.get("properties").and_then(|p| p.get(boundary_key)) {
            Some(Value::String(s)) => keys.push(s.clone()),
            Some(Value::Number(n)) => keys.push(n.to_string()),
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(skipped, boundary_key, "boundary features without a join key were dropped");
    }
    Ok(keys)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    pub key: String,
    rows: IndexMap<String, Option<AreaRow>>,
}
impl Area {
    pub fn row(&self, dataset: &str) -> Option<&AreaRow> {
        self.rows.get(dataset).and_then(Option::as_ref)
    }
    pub fn value(&self, dataset: &str, column: &str) -> Option<&str> {
        self.row(dataset)
            .and_then(|r| r.get(column))
            .map(String::as_str)
    }
    pub fn datasets(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AreaIndex {
    areas: IndexMap<String, Area>,
}
impl AreaIndex {
    /// Join `tables` onto `boundary_keys` by each row's `csv_key` cell. A later duplicate row wins.
    pub fn build(boundary_keys: &[String], tables: &[DatasetTable], csv_key: &str) -> DataResult<Self> {
        let mut lookups: Vec<(&str, HashMap<&str, &AreaRow>)> = Vec::with_capacity(tables.len());
        for table in tables {
            if !table.headers.iter().any(|h| h == csv_key) {
                return Err(DataError::MissingJoinKey {
                    dataset: table.name.clone(),
                    key: csv_key.to_string(),
                });
            }
            let mut by_key = HashMap::with_capacity(table.rows.len());
            let mut keyless = 0usize;
            for row in &table.rows {
                match row.get(csv_key).filter(|k| !k.is_empty()) {
                    Some(k) => {
                        by_key.insert(k.as_str(), row);
                    }
                    None => keyless += 1,
                }
            }
            if keyless > 0 {
                warn!(dataset = %table.name, keyless, "rows without a join key were skipped");
            }
            lookups.push((table.name.as_str(), by_key));
        }
        let mut areas = IndexMap::with_capacity(boundary_keys.len());
        for key in boundary_keys {
            let rows = lookups
                .iter()
                .map(|(name, by_key)| (name.to_string(), by_key.get(key.as_str()).map(|r| (*r).clone())))
                .collect();
            areas.insert(
                key.clone(),
                Area {
                    key: key.clone(),
                    rows,
                },
            );
        }
        Ok(Self { areas })
    }
    pub fn get(&self, key: &str) -> Option<&Area> {
        self.areas.get(key)
    }
    pub fn areas(&self) -> impl Iterator<Item = &Area> {
        self.areas.values()
    }
    pub fn contains(&self, key: &str) -> bool {
        self.areas.contains_key(key)
    }
    /// Every area's raw cell for one column, in boundary order.
    pub fn column_values<'a>(
        &'a self,
        dataset: &'a str,
        column: &'a str,
    ) -> impl Iterator<Item = (&'a Area, Option<&'a str>)> + 'a {
        self.areas.values().map(move |a| (a, a.value(dataset, column)))
    }
    pub fn len(&self) -> usize {
        self.areas.len()
    }
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const PTAL: &str = "Unnamed: 0,OA,Public_Transport_Accessibility_Level\n0,E001,6b\n1,E002,1a\n2,,3\n";
    #[test]
    fn every_area_has_an_entry_per_dataset() {
        let ptal = DatasetTable::from_csv_str("ptal.csv", PTAL).unwrap();
        let other = DatasetTable::from_csv_str("other.csv", "OA,x\nE002,4\n").unwrap();
        let keys = vec!["E001".to_string(), "E002".to_string(), "E003".to_string()];
        let index = AreaIndex::build(&keys, &[ptal, other], "OA").unwrap();
        assert_eq!(index.len(), 3);
        let e1 = index.get("E001").unwrap();
        assert_eq!(e1.value("ptal.csv", "Public_Transport_Accessibility_Level"), Some("6b"));
        assert!(e1.row("other.csv").is_none());
        assert_eq!(e1.datasets().count(), 2);
        assert_eq!(index.get("E002").unwrap().value("other.csv", "x"), Some("4"));
        assert!(index.get("E003").unwrap().row("ptal.csv").is_none());
    }
    #[test]
    fn missing_join_column_is_an_error() {
        let t = DatasetTable::from_csv_str("x.csv", "geo,x\nE001,1\n").unwrap();
        assert!(matches!(
            AreaIndex::build(&["E001".into()], &[t], "OA"),
            Err(DataError::MissingJoinKey { .. })
        ));
    }
    #[test]
    fn reads_geojson_and_topojson_keys() {
        let geo = r#"{"type":"FeatureCollection","features":[
            {"properties":{"geo_code":"E001"}},{"properties":{"other":1}},{"properties":{"geo_code":"E002"}}]}"#;
        assert_eq!(boundary_keys_from_json(geo, "geo_code").unwrap(), vec!["E001", "E002"]);
        let topo = r#"{"type":"Topology","objects":{"OAs":{"geometries":[{"properties":{"geo_code":"E009"}}]}}}"#;
        assert_eq!(boundary_keys_from_json(topo, "geo_code").unwrap(), vec!["E009"]);
        assert!(matches!(boundary_keys_from_json("{}", "geo_code"), Err(DataError::EmptyBoundary)));
    }
    #[test]
    fn numeric_policy_isolates_coercion() {
        assert_eq!(NumericPolicy::Lenient.coerce("c", Some(" 2.5 ")).unwrap(), 2.5);
        assert!(NumericPolicy::Lenient.coerce("c", None).unwrap().is_nan());
        assert!(NumericPolicy::Lenient.coerce("c", Some("abc")).unwrap().is_nan());
        assert!(matches!(
            NumericPolicy::Strict.coerce("c", Some("abc")),
            Err(DataError::NonNumeric { .. })
        ));
    }
}
