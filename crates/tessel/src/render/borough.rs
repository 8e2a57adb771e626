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

use super::area::with_total;
use super::chart::{Chart, ChartKind, ChartRow, ValueAxis};
use super::AreaView;
use crate::context::DashboardContext;
use crate::error::Result;
use indexmap::IndexMap;

const MISSING: &str = "undefined";

/// One bar per distinct value across every area; missing cells tally as `undefined`.
pub(super) fn categorical_frequency(ctx: &DashboardContext, dataset: &str, column: &str) -> Chart {
    let mut tally: IndexMap<&str, f64> = IndexMap::new();
    for (_, value) in ctx.areas.column_values(dataset, column) {
        *tally.entry(value.unwrap_or(MISSING)).or_insert(0.0) += 1.0;
    }
    let mut rows: Vec<ChartRow> = tally.into_iter().map(|(v, n)| ChartRow::number(v, n)).collect();
    if rows.is_empty() {
        rows.push(ChartRow::number(MISSING, 1.0));
    }
    let mut chart = Chart::new(
        ChartKind::Column,
        format!("Column chart: {column} category count in borough"),
        "OA count",
        &[column],
    )
    .with_rows(rows)
    .with_value_axis(ValueAxis::new("OA count"))
    .with_category_axis(column);
    chart.sort_by_label();
    chart
}

pub(super) fn numeric_histogram(ctx: &DashboardContext, dataset: &str, column: &str) -> Result<Chart> {
    let policy = ctx.config.numeric_policy;
    let csv_key = ctx.config.join.csv_key.as_str();
    let rows = ctx
        .areas
        .areas()
        .map(|area| {
            let view = AreaView::new(area, dataset, policy);
            let label = view.text(csv_key).unwrap_or(area.key.as_str());
            Ok(ChartRow::number(label, view.number(column)?))
        })
        .collect::<Result<Vec<_>>>()?;
    let mut chart = with_total(
        Chart::new(ChartKind::Histogram, "", "Value", &[column])
            .with_rows(rows)
            .with_value_axis(ValueAxis::new("Value"))
            .with_category_axis(column),
    );
    chart.title = format!(
        "COLUMN TOTAL: {}\n\nHistogram: {column} distribution in borough.",
        chart.total.as_deref().unwrap_or_default()
    );
    chart.sort_by_label();
    if column.contains("[shared_scale]") {
        chart.options.histogram_max = ctx.scale(dataset, column)?.bounds().map(|(_, max)| max);
    }
    Ok(chart)
}
