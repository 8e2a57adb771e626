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

use serde::Serialize;

pub const LOG_SUFFIX: &str = " (logarithmic axis)";
pub const PLACEHOLDER_MESSAGE: &str = "Select a dataset / column / OA";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Placeholder,
    Table,
    Column,
    /// Horizontal bars.
    Bar,
    Pie,
    Donut,
    Histogram,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}
impl Cell {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub label: String,
    pub values: Vec<Cell>,
}
impl ChartRow {
    pub fn number(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            values: vec![Cell::Number(value)],
        }
    }
    pub fn text(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            values: vec![Cell::Text(value.into())],
        }
    }
    pub fn numbers(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values: values.into_iter().map(Cell::Number).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisScale {
    Linear,
    MirrorLog,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueAxis {
    pub base_title: String,
    pub title: String,
    pub scale: AxisScale,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// False for axes the log toggle leaves alone.
    pub log_capable: bool,
}
impl ValueAxis {
    pub fn new(title: &str) -> Self {
        Self {
            base_title: title.to_string(),
            title: title.to_string(),
            scale: AxisScale::Linear,
            min: None,
            log_capable: true,
        }
    }
    pub fn fixed(title: &str) -> Self {
        Self {
            log_capable: false,
            ..Self::new(title)
        }
    }
    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }
    pub fn set_log(&mut self, on: bool) {
        if !self.log_capable {
            return;
        }
        if on {
            self.title = format!("{}{LOG_SUFFIX}", self.base_title);
            self.scale = AxisScale::MirrorLog;
        } else {
            self.title = self.base_title.clone();
            self.scale = AxisScale::Linear;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendPosition {
    #[default]
    None,
    Top,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pie_hole: Option<f64>,
}

/// Row data plus display options handed to a chart surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub kind: ChartKind,
    pub title: String,
    pub label_header: String,
    pub series: Vec<String>,
    pub rows: Vec<ChartRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_axis: Option<ValueAxis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_axis: Option<String>,
    pub legend: LegendPosition,
    pub options: ChartOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
impl Chart {
    pub fn new(kind: ChartKind, title: impl Into<String>, label_header: &str, series: &[&str]) -> Self {
        Self {
            kind,
            title: title.into(),
            label_header: label_header.to_string(),
            series: series.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
            total: None,
            value_axis: None,
            category_axis: None,
            legend: LegendPosition::None,
            options: ChartOptions::default(),
            message: None,
        }
    }
    pub fn placeholder() -> Self {
        Self {
            message: Some(PLACEHOLDER_MESSAGE.to_string()),
            ..Self::new(ChartKind::Placeholder, "", "", &[])
        }
    }
    pub fn with_rows(mut self, rows: Vec<ChartRow>) -> Self {
        self.rows = rows;
        self
    }
    pub fn with_value_axis(mut self, axis: ValueAxis) -> Self {
        self.value_axis = Some(axis);
        self
    }
    pub fn with_category_axis(mut self, title: &str) -> Self {
        self.category_axis = Some(title.to_string());
        self
    }
    pub fn with_legend(mut self, legend: LegendPosition) -> Self {
        self.legend = legend;
        self
    }
    pub fn sort_by_label(&mut self) {
        self.rows.sort_by(|a, b| a.label.cmp(&b.label));
    }
    /// Relabels and rescales the value axis only; rows stay as they are.
    pub fn set_log(&mut self, on: bool) {
        if let Some(axis) = self.value_axis.as_mut() {
            axis.set_log(on);
        }
    }
    /// Sum over the first value column, NaN included.
    pub fn column_total(&self) -> f64 {
        self.rows
            .iter()
            .filter_map(|r| r.values.first().and_then(Cell::as_number))
            .sum()
    }
}

pub fn format_total(total: f64) -> String {
    format!("{total:.3}")
}
