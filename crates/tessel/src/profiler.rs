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

use crate::area::DatasetTable;
use crate::error::{DataError, DataResult};
use crate::registry::{Column, DatasetMeta, PracticalType, RangeValue};
use itertools::Itertools;
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct ProfilingConfig {
    pub max_range_values: usize,
    /// Columns dropped from every dataset (index and join columns).
    pub skip_columns: Vec<String>,
    /// Columns dropped from this dataset only.
    pub dataset_skip_columns: Vec<String>,
    /// Practical type given to text columns instead of plain `string`.
    pub text_type: Option<PracticalType>,
    /// Columns whose bounds are widened to the group's common `[min, max]`.
    pub shared_scale_columns: Vec<String>,
}
impl Default for ProfilingConfig {
    fn default() -> Self {
        Self {
            max_range_values: 70,
            skip_columns: vec![
                "Unnamed: 0".to_string(),
                "OA".to_string(),
                "Unnamed: 0.1".to_string(),
            ],
            dataset_skip_columns: Vec::new(),
            text_type: None,
            shared_scale_columns: Vec::new(),
        }
    }
}
impl ProfilingConfig {
    /// Shared-scale group is every column carrying the `[shared_scale]` marker.
    pub fn with_shared_scale_from(mut self, headers: &[String]) -> Self {
        self.shared_scale_columns = headers
            .iter()
            .filter(|h| h.contains("[shared_scale]"))
            .cloned()
            .collect();
        self
    }
}

/// Derives registry metadata (`column_data`) from a dataset CSV.
pub struct MetadataProfiler {
    config: ProfilingConfig,
}
impl Default for MetadataProfiler {
    fn default() -> Self {
        Self::new()
    }
}
impl MetadataProfiler {
    pub fn new() -> Self {
        Self {
            config: ProfilingConfig::default(),
        }
    }
    pub fn with_config(config: ProfilingConfig) -> Self {
        Self { config }
    }
    pub fn profile_csv<P: AsRef<Path>>(&self, name: &str, path: P) -> DataResult<DatasetMeta> {
        let file = File::open(path.as_ref()).map_err(|source| DataError::FileRead {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        let table = DatasetTable::from_reader(name, file)?;
        self.profile_table(&table)
    }
    pub fn profile_table(&self, table: &DatasetTable) -> DataResult<DatasetMeta> {
        if table.rows.is_empty() {
            return Err(DataError::EmptyDataset {
                dataset: table.name.clone(),
            });
        }
        let mut column_data: Vec<Column> = table
            .headers
            .iter()
            .filter(|h| !self.is_skipped(h))
            .map(|h| self.profile_column(table, h))
            .collect();
        self.share_bounds(&mut column_data);
        debug!(dataset = %table.name, columns = column_data.len(), "profiled dataset");
        Ok(DatasetMeta { column_data })
    }
    fn is_skipped(&self, header: &str) -> bool {
        self.config
            .skip_columns
            .iter()
            .chain(self.config.dataset_skip_columns.iter())
            .any(|s| s == header)
    }
    fn profile_column(&self, table: &DatasetTable, name: &str) -> Column {
        let cells: Vec<&str> = table
            .rows
            .iter()
            .filter_map(|r| r.get(name))
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect();
        let has_missing = cells.len() < table.rows.len();
        let numbers: Option<Vec<f64>> = if cells.is_empty() {
            None
        } else {
            cells.iter().map(|c| c.parse::<f64>().ok()).collect()
        };
        let lower = name.to_lowercase();
        let mut column = if lower.contains("acorn") {
            Column {
                name: name.to_string(),
                type_registered: Some(if numbers.is_some() { "int64" } else { "object" }.to_string()),
                type_practical: PracticalType::Mapped {
                    family: if lower.contains("wellbeing") { "wellbeing" } else { "household" }.to_string(),
                    granularity: acorn_granularity(&lower).to_string(),
                },
                range: Some(text_range(&cells)),
                min: None,
                max: None,
            }
        } else if let Some(numbers) = numbers {
            let integral = numbers.iter().all(|v| v.fract() == 0.0);
            let (min, max) = numbers
                .iter()
                .copied()
                .minmax_by(|a, b| a.total_cmp(b))
                .into_option()
                .map_or((None, None), |(lo, hi)| (Some(lo), Some(hi)));
            let registered = if integral && !has_missing { "int64" } else { "float64" };
            Column {
                name: name.to_string(),
                type_registered: Some(registered.to_string()),
                type_practical: if integral { PracticalType::Integer } else { PracticalType::Float },
                range: integral.then(|| {
                    numbers
                        .iter()
                        .copied()
                        .sorted_by(|a, b| a.total_cmp(b))
                        .dedup()
                        .map(RangeValue::Number)
                        .collect()
                }),
                min,
                max,
            }
        } else {
            if cells.is_empty() {
                warn!(dataset = %table.name, column = name, "column has no values");
            }
            Column {
                name: name.to_string(),
                type_registered: Some("object".to_string()),
                type_practical: self.config.text_type.clone().unwrap_or(PracticalType::String),
                range: Some(text_range(&cells)),
                min: None,
                max: None,
            }
        };
        if column
            .range
            .as_ref()
            .is_some_and(|r| r.len() > self.config.max_range_values)
        {
            column.range = None;
        }
        column
    }
    fn share_bounds(&self, columns: &mut [Column]) {
        let shared = &self.config.shared_scale_columns;
        if shared.is_empty() {
            return;
        }
        let in_group = |c: &Column| shared.iter().any(|s| s == &c.name);
        let lo = columns.iter().filter(|c| in_group(c)).filter_map(|c| c.min).reduce(f64::min);
        let hi = columns.iter().filter(|c| in_group(c)).filter_map(|c| c.max).reduce(f64::max);
        for c in columns.iter_mut().filter(|c| in_group(c)) {
            c.min = lo;
            c.max = hi;
        }
    }
}
fn acorn_granularity(lower_name: &str) -> &'static str {
    if lower_name.contains("type") {
        "type"
    } else if lower_name.contains("group") {
        "group"
    } else {
        "category"
    }
}
fn text_range(cells: &[&str]) -> Vec<RangeValue> {
    cells
        .iter()
        .map(|c| c.to_string())
        .sorted()
        .dedup()
        .map(RangeValue::Text)
        .collect()
}
