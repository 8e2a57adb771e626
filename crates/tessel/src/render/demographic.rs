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
use super::chart::{Chart, ChartKind, ChartRow, LegendPosition, ValueAxis};
use super::AreaView;
use crate::error::Result;
use crate::poc::DEMOGRAPHIC_TYPES;

const RESIDENT: &str = "resident";
const GENERAL_COLUMNS: [&str; 2] = ["resident_count", "visitors_total_count"];
const PLACES: [&str; 3] = ["bar", "cafe", "restaurant"];
const TOTAL_SERIES: [&str; 3] = ["resident", "visitors_total", "total"];
const SUPPLY_MINUS_DEMAND_PREFIX: &str = "[supply - demand] - [normalized_[0-1]_proportions] - ";
const SUPPLY_DEMAND_INDEX_PREFIX: &str = "[supply_demand_index] - ";

fn types_with_resident() -> Vec<&'static str> {
    DEMOGRAPHIC_TYPES.iter().copied().chain([RESIDENT]).collect()
}

fn typed_rows(view: AreaView<'_>, prefix: &str, suffix: &str, types: &[&str]) -> Result<Vec<ChartRow>> {
    types
        .iter()
        .map(|t| Ok(ChartRow::number(*t, view.number(&format!("{prefix}{t}{suffix}"))?)))
        .collect()
}

fn pie(prefix: &str, suffix: &str, rows: Vec<ChartRow>) -> Chart {
    let chart = with_total(Chart::new(ChartKind::Pie, "", "Demographic type", &["Value"]).with_rows(rows));
    let total = chart.total.clone().unwrap_or_default();
    Chart {
        title: format!("TOTAL: {total}\n\nDonut chart: Demographic types {prefix}{suffix} totals."),
        ..chart.with_legend(LegendPosition::Top)
    }
}

fn column(prefix: &str, suffix: &str, rows: Vec<ChartRow>) -> Chart {
    let chart = with_total(Chart::new(ChartKind::Column, "", "Demographic type", &["Value"]).with_rows(rows));
    let total = chart.total.clone().unwrap_or_default();
    Chart {
        title: format!("TOTAL: {total}\n\nColumn chart: Demographic types {prefix}{suffix} totals."),
        ..chart
            .with_value_axis(ValueAxis::new("Value").with_min(0.0))
            .with_category_axis("Category")
    }
}

pub(super) fn demographic_pie(view: AreaView<'_>, prefix: &str, suffix: &str) -> Result<Chart> {
    Ok(pie(prefix, suffix, typed_rows(view, prefix, suffix, &DEMOGRAPHIC_TYPES)?))
}

pub(super) fn demographic_column(view: AreaView<'_>, prefix: &str, suffix: &str) -> Result<Chart> {
    Ok(column(prefix, suffix, typed_rows(view, prefix, suffix, &DEMOGRAPHIC_TYPES)?))
}

/// `total_count` adds residents; the resident/visitor columns compare just those two.
pub(super) fn population_pie(view: AreaView<'_>, prefix: &str, suffix: &str, selected: &str) -> Result<Chart> {
    let rows = if selected == format!("{prefix}total_count") {
        typed_rows(view, prefix, suffix, &types_with_resident())?
    } else if selected
        .split(" - ")
        .nth(1)
        .is_some_and(|s| GENERAL_COLUMNS.contains(&s))
    {
        typed_rows(view, prefix, "", &GENERAL_COLUMNS)?
    } else {
        typed_rows(view, prefix, suffix, &DEMOGRAPHIC_TYPES)?
    };
    Ok(pie(prefix, suffix, rows))
}

pub(super) fn population_column(view: AreaView<'_>, prefix: &str, suffix: &str) -> Result<Chart> {
    Ok(column(prefix, suffix, typed_rows(view, prefix, suffix, &types_with_resident())?))
}

/// Series are either resident/visitors/total or every demographic type plus residents.
fn supply_series(selected: &str, segment: usize) -> Vec<&'static str> {
    let totals = selected
        .split("] - ")
        .nth(segment)
        .is_some_and(|s| s.contains("total"));
    if totals {
        TOTAL_SERIES.to_vec()
    } else {
        types_with_resident()
    }
}

fn place_rows(view: AreaView<'_>, prefix: &str, series: &[&str]) -> Result<Vec<ChartRow>> {
    PLACES
        .iter()
        .map(|place| {
            let values = series
                .iter()
                .map(|demo| view.number(&format!("{prefix}{place}_{demo}")))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(ChartRow::numbers(*place, values))
        })
        .collect()
}

pub(super) fn supply_minus_demand(view: AreaView<'_>, selected: &str) -> Result<Chart> {
    let series = supply_series(selected, 2);
    Ok(Chart::new(
        ChartKind::Bar,
        "Column chart: Supply - Demand distribution breakdown.",
        "Place",
        &series,
    )
    .with_rows(place_rows(view, SUPPLY_MINUS_DEMAND_PREFIX, &series)?)
    .with_value_axis(ValueAxis::new("Supply dist. - Demand dist."))
    .with_category_axis("Place type")
    .with_legend(LegendPosition::Top))
}

pub(super) fn supply_demand_index(view: AreaView<'_>, selected: &str) -> Result<Chart> {
    let series = supply_series(selected, 1);
    Ok(Chart::new(
        ChartKind::Column,
        "Column chart: Supply & Demand index breakdown.",
        "Place",
        &series,
    )
    .with_rows(place_rows(view, SUPPLY_DEMAND_INDEX_PREFIX, &series)?)
    .with_value_axis(ValueAxis::new("Supply & demand index"))
    .with_category_axis("Place type")
    .with_legend(LegendPosition::Top))
}
