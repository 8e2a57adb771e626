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

use crate::registry::{BLANK_COLUMN, NONE_DATASET};
use serde::{Deserialize, Serialize};

/// The user's current dataset / column / area choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub dataset: String,
    pub column: String,
    pub area: Option<String>,
}
impl Default for SelectionState {
    fn default() -> Self {
        Self {
            dataset: NONE_DATASET.to_string(),
            column: BLANK_COLUMN.to_string(),
            area: None,
        }
    }
}
impl SelectionState {
    /// Switching dataset always clears the column back to `blank`.
    pub fn select_dataset(&mut self, dataset: &str) {
        self.dataset = dataset.to_string();
        self.column = BLANK_COLUMN.to_string();
    }
    pub fn select_column(&mut self, column: &str) {
        self.column = column.to_string();
    }
    /// Clicking the selected area clears it; clicking another one switches to it.
    /// Returns the selection after the toggle.
    pub fn toggle_area(&mut self, key: &str) -> Option<&str> {
        if self.area.as_deref() == Some(key) {
            self.area = None;
        } else {
            self.area = Some(key.to_string());
        }
        self.area.as_deref()
    }
    pub fn has_dataset(&self) -> bool {
        self.dataset != NONE_DATASET
    }
    pub fn has_column(&self) -> bool {
        self.column != BLANK_COLUMN
    }
    pub fn area_selected(&self) -> bool {
        self.area.is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpacityLevel {
    #[default]
    High,
    Low,
}
impl OpacityLevel {
    pub fn toggled(self) -> Self {
        match self {
            OpacityLevel::High => OpacityLevel::Low,
            OpacityLevel::Low => OpacityLevel::High,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    pub log_scale: bool,
    pub opacity: OpacityLevel,
    pub map_labels: bool,
}
impl DisplayOptions {
    pub fn toggle_log_scale(&mut self) -> bool {
        self.log_scale = !self.log_scale;
        self.log_scale
    }
    pub fn toggle_opacity(&mut self) -> OpacityLevel {
        self.opacity = self.opacity.toggled();
        self.opacity
    }
    pub fn toggle_map_labels(&mut self) -> bool {
        self.map_labels = !self.map_labels;
        self.map_labels
    }
}
