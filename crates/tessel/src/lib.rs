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

//! Census output-area dashboard core: dataset registry, colour scales, the
//! area index, and the rule-ordered dispatcher that picks one chart per selection.

pub mod area;
pub mod config;
pub mod context;
pub mod dashboard;
pub mod dispatch;
pub mod error;
pub mod loader;
pub mod map_style;
pub mod palette;
pub mod poc;
pub mod profiler;
pub mod registry;
pub mod render;
pub mod scale;
pub mod selection;
pub mod surface;

pub use area::{Area, AreaIndex, DatasetTable, NumericPolicy};
pub use config::DashboardConfig;
pub use context::DashboardContext;
pub use dashboard::Dashboard;
pub use dispatch::{Dispatcher, RenderInvocation, Strategy};
pub use error::{DashboardError, Result};
pub use loader::{build_context, load_dashboard, load_dashboard_blocking};
pub use palette::Palette;
pub use profiler::{MetadataProfiler, ProfilingConfig};
pub use registry::{DatasetRegistry, PracticalType, BLANK_COLUMN, NONE_DATASET};
pub use render::{render, Chart, ChartKind};
pub use scale::{DomainKind, Scale, ScaleRegistry};
pub use selection::{DisplayOptions, SelectionState};
pub use surface::{ChartSurface, MapSurface};
