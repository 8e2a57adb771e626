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

//! Strategy catalog: turns a [`RenderInvocation`] into a [`Chart`].
//!
//! Strategies only read the context; they never touch the selection or the area index.

mod area;
mod borough;
pub mod chart;
mod demographic;

pub use chart::{AxisScale, Cell, Chart, ChartKind, ChartOptions, ChartRow, LegendPosition, ValueAxis};

use crate::area::{Area, AreaRow, NumericPolicy};
use crate::context::DashboardContext;
use crate::dispatch::{RenderInvocation, Strategy};
use crate::error::{DataResult, DispatchError, Result};

/// One area's row for one dataset, with numeric coercion kept in one place.
#[derive(Debug, Clone, Copy)]
pub struct AreaView<'a> {
    row: Option<&'a AreaRow>,
    policy: NumericPolicy,
}
impl<'a> AreaView<'a> {
    pub fn new(area: &'a Area, dataset: &str, policy: NumericPolicy) -> Self {
        Self {
            row: area.row(dataset),
            policy,
        }
    }
    pub fn from_row(row: Option<&'a AreaRow>, policy: NumericPolicy) -> Self {
        Self { row, policy }
    }
    pub fn text(&self, column: &str) -> Option<&'a str> {
        self.row.and_then(|r| r.get(column)).map(String::as_str)
    }
    pub fn number(&self, column: &str) -> DataResult<f64> {
        self.policy.coerce(column, self.text(column))
    }
    pub fn entries(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.row
            .into_iter()
            .flat_map(|r| r.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

pub fn render(ctx: &DashboardContext, invocation: &RenderInvocation) -> Result<Chart> {
    let strategy = &invocation.strategy;
    let mut chart = match strategy {
        Strategy::Placeholder => Chart::placeholder(),
        Strategy::CategoricalFrequency { column } => {
            borough::categorical_frequency(ctx, &invocation.dataset, column)
        }
        Strategy::NumericHistogram { column } => {
            borough::numeric_histogram(ctx, &invocation.dataset, column)?
        }
        _ => {
            let area = ctx
                .selected_area()
                .ok_or_else(|| DispatchError::NoAreaSelected {
                    strategy: strategy.name().to_string(),
                })?;
            let view = AreaView::new(area, &invocation.dataset, ctx.config.numeric_policy);
            render_area(strategy, view, &invocation.column)?
        }
    };
    chart.set_log(ctx.display.log_scale);
    Ok(chart)
}

fn render_area(strategy: &Strategy, view: AreaView<'_>, column: &str) -> Result<Chart> {
    let chart = match strategy {
        Strategy::DataTable => area::data_table(view),
        Strategy::PlacesBar => area::places_bar(view)?,
        Strategy::FrequencyColumn { source_column } => area::frequency_column(view, source_column, column)?,
        Strategy::AgeGenderGroups => area::age_gender_groups(view, column)?,
        Strategy::GenderTotals => area::gender_totals(view)?,
        Strategy::CategoryComparison { prefix, family } => area::category_comparison(view, prefix, *family)?,
        Strategy::IncomeBrackets { prefix } => area::income_brackets(view, prefix)?,
        Strategy::DemographicPie { prefix, suffix } => demographic::demographic_pie(view, prefix, suffix)?,
        Strategy::DemographicColumn { prefix, suffix } => demographic::demographic_column(view, prefix, suffix)?,
        Strategy::PopulationPie { prefix, suffix } => demographic::population_pie(view, prefix, suffix, column)?,
        Strategy::PopulationColumn { prefix, suffix } => demographic::population_column(view, prefix, suffix)?,
        Strategy::SupplyMinusDemand => demographic::supply_minus_demand(view, column)?,
        Strategy::SupplyDemandIndex => demographic::supply_demand_index(view, column)?,
        Strategy::Placeholder | Strategy::CategoricalFrequency { .. } | Strategy::NumericHistogram { .. } => {
            Chart::placeholder()
        }
    };
    Ok(chart)
}
