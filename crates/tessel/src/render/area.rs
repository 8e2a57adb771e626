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

use super::chart::{format_total, Chart, ChartKind, ChartRow, LegendPosition, ValueAxis};
use super::AreaView;
use crate::dispatch::ComparisonFamily;
use crate::error::{RenderError, Result};
use serde_json::Value;

const TABLE_DENYLIST: [&str; 2] = ["", "Unnamed: 0"];
const PLACES_DENYLIST: [&str; 10] = [
    "",
    "OA",
    "Unnamed: 0",
    "point_of_interest",
    "establishment",
    "premise",
    "health",
    "doctor",
    "store",
    "food",
];
const SHARED_SCALE: &str = "shared_scale";
const SEGMENT: &str = " - ";

fn segment(name: &str, index: usize) -> Option<&str> {
    name.split(SEGMENT).nth(index)
}

pub(super) fn data_table(view: AreaView<'_>) -> Chart {
    let rows: Vec<ChartRow> = view
        .entries()
        .filter(|(k, _)| !TABLE_DENYLIST.contains(k) && !k.contains(SHARED_SCALE))
        .map(|(k, v)| ChartRow::text(k, v))
        .collect();
    let mut chart = Chart::new(ChartKind::Table, "", "Property", &["Value"]);
    chart.options.height = Some(rows.len() * 35 + 20);
    chart.with_rows(rows)
}

pub(super) fn places_bar(view: AreaView<'_>) -> Result<Chart> {
    let mut columns: Vec<&str> = view
        .entries()
        .map(|(k, _)| k)
        .filter(|k| !PLACES_DENYLIST.contains(k) && !k.contains(SHARED_SCALE))
        .collect();
    columns.sort_unstable();
    let rows = columns
        .into_iter()
        .map(|c| Ok(ChartRow::number(c, view.number(c)?)))
        .collect::<Result<Vec<_>>>()?;
    let mut chart = Chart::new(ChartKind::Bar, "", "Place type", &["Number of places in OA"])
        .with_rows(rows)
        .with_value_axis(ValueAxis::fixed("Value"));
    chart.options.height = Some(1400);
    Ok(chart)
}

/// The cell holds a Python-style dict literal such as `{'1a': 3, '2': 1}`.
pub(super) fn frequency_column(view: AreaView<'_>, source_column: &str, selected: &str) -> Result<Chart> {
    let mut rows = match view.text(source_column) {
        Some(cell) => parse_frequency_cell(source_column, cell)?,
        None => Vec::new(),
    };
    if rows.is_empty() {
        rows.push(ChartRow::number("undefined", 1.0));
    }
    let mut chart = Chart::new(
        ChartKind::Column,
        format!("Column chart: {selected} category count in OA"),
        "Class",
        &["Frequency"],
    )
    .with_rows(rows)
    .with_value_axis(ValueAxis::new("OA count"))
    .with_category_axis(selected);
    chart.sort_by_label();
    Ok(chart)
}

fn parse_frequency_cell(column: &str, cell: &str) -> Result<Vec<ChartRow>> {
    let malformed = |reason: String| RenderError::MalformedFrequencyCell {
        column: column.to_string(),
        reason,
    };
    let parsed: Value = serde_json::from_str(&cell.replace('\'', "\"")).map_err(|e| malformed(e.to_string()))?;
    let Value::Object(entries) = parsed else {
        return Err(malformed("expected a mapping of class to count".to_string()).into());
    };
    entries
        .into_iter()
        .map(|(label, count)| match count.as_f64() {
            Some(n) => Ok(ChartRow::number(label, n)),
            None => Err(malformed(format!("count for '{label}' is not a number")).into()),
        })
        .collect()
}

pub(super) fn age_gender_groups(view: AreaView<'_>, selected: &str) -> Result<Chart> {
    let type_prefix = segment(selected, 0).unwrap_or_default();
    let gender = segment(selected, 1);
    let prefixed: Vec<&str> = view
        .entries()
        .map(|(k, _)| k)
        .filter(|k| segment(k, 0) == Some(type_prefix))
        .collect();
    let axis = ValueAxis::new("Value");
    if gender == Some("Total") {
        let rows = prefixed
            .into_iter()
            .filter(|k| segment(k, 1) == Some("Total"))
            .filter_map(|k| segment(k, 2).map(|age| (k, age)))
            .map(|(k, age)| Ok(ChartRow::number(age, view.number(k)?)))
            .collect::<Result<Vec<_>>>()?;
        return Ok(Chart::new(
            ChartKind::Column,
            format!("Column chart: Total {type_prefix} - by age range and gender in OA"),
            "Age range",
            &["Total"],
        )
        .with_rows(rows)
        .with_value_axis(axis)
        .with_category_axis("Gender by age range"));
    }
    let mut seen: Vec<&str> = Vec::new();
    let mut rows = Vec::new();
    for key in prefixed.into_iter().filter(|k| segment(k, 1) != Some("Total")) {
        let Some(age) = segment(key, 2) else { continue };
        if seen.contains(&age) {
            continue;
        }
        seen.push(age);
        let female = view.number(&format!("{type_prefix}{SEGMENT}Females{SEGMENT}{age}"))?;
        let male = view.number(&format!("{type_prefix}{SEGMENT}Males{SEGMENT}{age}"))?;
        rows.push(ChartRow::numbers(age, vec![female, male]));
    }
    Ok(Chart::new(
        ChartKind::Column,
        format!("Column chart: {type_prefix} - by age range and gender in OA"),
        "Age range",
        &["Female", "Male"],
    )
    .with_rows(rows)
    .with_value_axis(axis)
    .with_category_axis("Gender by age range")
    .with_legend(LegendPosition::Top))
}

pub(super) fn gender_totals(view: AreaView<'_>) -> Result<Chart> {
    let female = view.number("Females total")?;
    let male = view.number("Males total")?;
    let total = female + male;
    let mut chart = Chart::new(
        ChartKind::Donut,
        format!("TOTAL: {total}\n\nDonut chart: Gender totals."),
        "Gender",
        &["Value"],
    )
    .with_rows(vec![ChartRow::number("Female", female), ChartRow::number("Male", male)])
    .with_legend(LegendPosition::Top);
    chart.total = Some(total.to_string());
    chart.options.pie_hole = Some(0.4);
    Ok(chart)
}

fn prefixed_rows(view: AreaView<'_>, prefix: &str) -> Result<Vec<ChartRow>> {
    view.entries()
        .filter(|(k, _)| segment(k, 0) == Some(prefix))
        .map(|(k, _)| {
            let label = segment(k, 1).unwrap_or_default();
            Ok(ChartRow::number(label, view.number(k)?))
        })
        .collect()
}

pub(super) fn category_comparison(view: AreaView<'_>, prefix: &str, family: ComparisonFamily) -> Result<Chart> {
    let title = match family {
        ComparisonFamily::Spending => "Column chart: Spending categories breakdown",
        ComparisonFamily::DisposableIncome => "Column chart: Disposable income spending categories breakdown",
    };
    let mut chart = Chart::new(ChartKind::Column, title, "Category", &["Amount spent"])
        .with_rows(prefixed_rows(view, prefix)?)
        .with_value_axis(ValueAxis::new("Value"))
        .with_category_axis("Category");
    chart.sort_by_label();
    Ok(chart)
}

/// Income brackets keep file column order, which is already ascending.
pub(super) fn income_brackets(view: AreaView<'_>, prefix: &str) -> Result<Chart> {
    Ok(Chart::new(
        ChartKind::Column,
        "Column chart: Income ranges breakdown in OA",
        "Income range",
        &["Value"],
    )
    .with_rows(prefixed_rows(view, prefix)?)
    .with_value_axis(ValueAxis::new("Value"))
    .with_category_axis("Category"))
}

pub(super) fn with_total(mut chart: Chart) -> Chart {
    chart.total = Some(format_total(chart.column_total()));
    chart
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::{AreaRow, NumericPolicy};
    use crate::render::Cell;
    fn row(pairs: &[(&str, &str)]) -> AreaRow {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }
    fn labels(chart: &Chart) -> Vec<&str> {
        chart.rows.iter().map(|r| r.label.as_str()).collect()
    }
    #[test]
    fn data_table_drops_synthetic_columns() {
        let r = row(&[("", "0"), ("Unnamed: 0", "1"), ("OA", "E1"), ("[shared_scale] - x", "2"), ("households", "40")]);
        let chart = data_table(AreaView::from_row(Some(&r), NumericPolicy::Lenient));
        assert_eq!(labels(&chart), vec!["OA", "households"]);
        assert_eq!(chart.options.height, Some(2 * 35 + 20));
        assert_eq!(chart.rows[1].values, vec![Cell::Text("40".into())]);
    }
    #[test]
    fn data_table_without_row_is_empty() {
        let chart = data_table(AreaView::from_row(None, NumericPolicy::Lenient));
        assert!(chart.rows.is_empty());
        assert_eq!(chart.options.height, Some(20));
    }
    #[test]
    fn places_bar_excludes_generic_types_and_sorts() {
        let r = row(&[("OA", "E1"), ("restaurant", "3"), ("bar", "2"), ("store", "9"), ("[shared_scale] - bar", "1")]);
        let chart = places_bar(AreaView::from_row(Some(&r), NumericPolicy::Lenient)).unwrap();
        assert_eq!(labels(&chart), vec!["bar", "restaurant"]);
        assert_eq!(chart.kind, ChartKind::Bar);
    }
    #[test]
    fn frequency_cell_is_parsed_and_sorted() {
        let r = row(&[("Acorn Group_frequency_count", "{'K': 2, 'B': 5}")]);
        let chart = frequency_column(
            AreaView::from_row(Some(&r), NumericPolicy::Lenient),
            "Acorn Group_frequency_count",
            "Acorn_group",
        )
        .unwrap();
        assert_eq!(labels(&chart), vec!["B", "K"]);
        assert_eq!(chart.title, "Column chart: Acorn_group category count in OA");
    }
    #[test]
    fn empty_frequency_gets_placeholder_row() {
        let r = row(&[("f", "{}")]);
        let chart = frequency_column(AreaView::from_row(Some(&r), NumericPolicy::Lenient), "f", "c").unwrap();
        assert_eq!(chart.rows, vec![ChartRow::number("undefined", 1.0)]);
        let broken = row(&[("f", "{'a': ")]);
        assert!(frequency_column(AreaView::from_row(Some(&broken), NumericPolicy::Lenient), "f", "c").is_err());
    }
    #[test]
    fn age_gender_pairs_female_and_male() {
        let r = row(&[
            ("[count] - Total - Infant [0-4]", "10"),
            ("[count] - Females - Infant [0-4]", "4"),
            ("[count] - Males - Infant [0-4]", "6"),
            ("[count] - Females - Senior [65+]", "7"),
            ("[count] - Males - Senior [65+]", "3"),
            ("[%_in_OA] - Females - Infant [0-4]", "0.1"),
        ]);
        let view = AreaView::from_row(Some(&r), NumericPolicy::Lenient);
        let chart = age_gender_groups(view, "[count] - Females - Infant [0-4]").unwrap();
        assert_eq!(chart.series, vec!["Female", "Male"]);
        assert_eq!(chart.rows[0], ChartRow::numbers("Infant [0-4]", vec![4.0, 6.0]));
        assert_eq!(chart.rows[1], ChartRow::numbers("Senior [65+]", vec![7.0, 3.0]));
        let total = age_gender_groups(view, "[count] - Total - Infant [0-4]").unwrap();
        assert_eq!(total.rows, vec![ChartRow::number("Infant [0-4]", 10.0)]);
    }
    #[test]
    fn gender_totals_is_a_donut_with_total() {
        let r = row(&[("Females total", "12"), ("Males total", "8")]);
        let chart = gender_totals(AreaView::from_row(Some(&r), NumericPolicy::Lenient)).unwrap();
        assert_eq!(chart.kind, ChartKind::Donut);
        assert_eq!(chart.total.as_deref(), Some("20"));
        assert_eq!(chart.options.pie_hole, Some(0.4));
    }
    #[test]
    fn comparisons_sort_but_income_keeps_order() {
        let r = row(&[("[sum_in_OA] - Tobacco", "5"), ("[sum_in_OA] - Food", "9"), ("[average_per_person_in_OA] - Food", "1")]);
        let view = AreaView::from_row(Some(&r), NumericPolicy::Lenient);
        let chart = category_comparison(view, "[sum_in_OA]", ComparisonFamily::Spending).unwrap();
        assert_eq!(labels(&chart), vec!["Food", "Tobacco"]);
        let r = row(&[("[count_in_OA] - 5-10K", "2"), ("[count_in_OA] - 0-5K", "1")]);
        let chart = income_brackets(AreaView::from_row(Some(&r), NumericPolicy::Lenient), "[count_in_OA]").unwrap();
        assert_eq!(labels(&chart), vec!["5-10K", "0-5K"]);
    }
    #[test]
    fn strict_policy_rejects_missing_values() {
        let r = row(&[("Females total", "12")]);
        assert!(gender_totals(AreaView::from_row(Some(&r), NumericPolicy::Strict)).is_err());
        let lenient = gender_totals(AreaView::from_row(Some(&r), NumericPolicy::Lenient)).unwrap();
        assert_eq!(lenient.total.as_deref(), Some("NaN"));
    }
}
