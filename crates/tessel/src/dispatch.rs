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

//! Visualization dispatcher: ordered (predicate, strategy, parameter-extractor)
//! rules over the `dataset#column#yes_oa|no_oa` key, first match wins.

use crate::error::DispatchError;
use crate::poc;
use crate::registry::{BLANK_COLUMN, NONE_DATASET};
use crate::scale::{DomainKind, ScaleRegistry};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DispatchKey<'a> {
    pub dataset: &'a str,
    pub column: &'a str,
    pub area_selected: bool,
}
impl fmt::Display for DispatchKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let oa = if self.area_selected { "yes_oa" } else { "no_oa" };
        write!(f, "{}#{}#{}", self.dataset, self.column, oa)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonFamily {
    Spending,
    DisposableIncome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Strategy {
    Placeholder,
    DataTable,
    PlacesBar,
    /// Per-area frequency dict stored in `source_column`.
    FrequencyColumn { source_column: String },
    AgeGenderGroups,
    GenderTotals,
    CategoryComparison { prefix: String, family: ComparisonFamily },
    IncomeBrackets { prefix: String },
    DemographicPie { prefix: String, suffix: String },
    DemographicColumn { prefix: String, suffix: String },
    PopulationPie { prefix: String, suffix: String },
    PopulationColumn { prefix: String, suffix: String },
    SupplyMinusDemand,
    SupplyDemandIndex,
    CategoricalFrequency { column: String },
    NumericHistogram { column: String },
}
impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Placeholder => "placeholder",
            Strategy::DataTable => "data_table",
            Strategy::PlacesBar => "places_bar",
            Strategy::FrequencyColumn { .. } => "frequency_column",
            Strategy::AgeGenderGroups => "age_gender_groups",
            Strategy::GenderTotals => "gender_totals",
            Strategy::CategoryComparison { .. } => "category_comparison",
            Strategy::IncomeBrackets { .. } => "income_brackets",
            Strategy::DemographicPie { .. } => "demographic_pie",
            Strategy::DemographicColumn { .. } => "demographic_column",
            Strategy::PopulationPie { .. } => "population_pie",
            Strategy::PopulationColumn { .. } => "population_column",
            Strategy::SupplyMinusDemand => "supply_minus_demand",
            Strategy::SupplyDemandIndex => "supply_demand_index",
            Strategy::CategoricalFrequency { .. } => "categorical_frequency",
            Strategy::NumericHistogram { .. } => "numeric_histogram",
        }
    }
    /// Strategies that read a single area's row.
    pub fn needs_area(&self) -> bool {
        !matches!(
            self,
            Strategy::Placeholder | Strategy::CategoricalFrequency { .. } | Strategy::NumericHistogram { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderInvocation {
    pub strategy: Strategy,
    /// Rule or fallback that produced the strategy.
    pub rule: &'static str,
    pub dataset: String,
    pub column: String,
}

type Extractor = fn(&DispatchKey<'_>) -> Strategy;

#[derive(Clone)]
pub struct DispatchRule {
    pub name: &'static str,
    dataset: Regex,
    column: Regex,
    pub requires_area: bool,
    extract: Extractor,
}
impl DispatchRule {
    /// `dataset` must match a suffix of the dataset name, `column` the whole column name.
    pub fn new(name: &'static str, dataset: &str, column: &str, extract: Extractor) -> Result<Self, DispatchError> {
        let compile = |pattern: String| {
            Regex::new(&pattern).map_err(|source| DispatchError::InvalidRulePattern {
                rule: name.to_string(),
                source,
            })
        };
        Ok(Self {
            name,
            dataset: compile(format!("(?:{dataset})$"))?,
            column: compile(format!("^(?:{column})$"))?,
            requires_area: true,
            extract,
        })
    }
    pub fn matches(&self, key: &DispatchKey<'_>) -> bool {
        (!self.requires_area || key.area_selected)
            && self.dataset.is_match(key.dataset)
            && self.column.is_match(key.column)
    }
    pub fn dataset_pattern(&self) -> &str {
        self.dataset.as_str()
    }
    pub fn column_pattern(&self) -> &str {
        self.column.as_str()
    }
}
impl fmt::Debug for DispatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchRule")
            .field("name", &self.name)
            .field("dataset", &self.dataset.as_str())
            .field("column", &self.column.as_str())
            .field("requires_area", &self.requires_area)
            .finish()
    }
}

fn frequency(source: &str) -> Strategy {
    Strategy::FrequencyColumn {
        source_column: source.to_string(),
    }
}
fn comparison(prefix: &str, family: ComparisonFamily) -> Strategy {
    Strategy::CategoryComparison {
        prefix: prefix.to_string(),
        family,
    }
}
fn income(prefix: &str) -> Strategy {
    Strategy::IncomeBrackets {
        prefix: prefix.to_string(),
    }
}
fn pair(prefix: &str, suffix: &str) -> (String, String) {
    (prefix.to_string(), suffix.to_string())
}

const PLACES: &str = r"\[Places\].*";
const PTAL: &str = r"\[OA\]_PTAL_directory.csv";
const ACORN: &str = r"\[Residents\]_Acorn_directory.csv";
const WELLBEING: &str = r"\[Residents\]_wellbeing_directory.csv";
const AGE_GENDER: &str = r"\[Residents\]_age_and_gender_distribution.csv";
const SPENDING: &str = r"\[Residents\]_spending_categories.csv";
const DISPOSABLE: &str = r"\[Residents\]_disposable_income_spending_categories.csv";
const INCOME: &str = r"\[Residents\]_income.csv";
const POC: &str = r"\[POC_Demographic_distribution\]_granular.*.csv";
const DEMO_OA: &str = r"\[Demographic_distribution\]_.*_OA_scope.csv";
const DEMO_BOROUGH: &str = r"\[Demographic_distribution\]_.*_borough_scope.csv";
const POPULATION: &str = r"\[Population\]_total_over_24_hour.csv";
const SUPPLY: &str = r"\[Supply_demand\]_example.csv";

static STANDARD_RULES: Lazy<Result<Vec<DispatchRule>, DispatchError>> = Lazy::new(standard_rules);

/// Ordered rule catalog. Order is the tie-break and must not be rearranged.
fn standard_rules() -> Result<Vec<DispatchRule>, DispatchError> {
    Ok(vec![
        DispatchRule::new("places_shared_scale", PLACES, r"\[shared_scale\].*", |_| Strategy::DataTable)?,
        DispatchRule::new("places_counts", PLACES, ".*", |_| Strategy::PlacesBar)?,
        DispatchRule::new("ptal_level", PTAL, "Public_Transport_Accessibility_Level", |_| {
            frequency("Public Transport Accessibility Level_frequency_count")
        })?,
        DispatchRule::new("acorn_category", ACORN, "Acorn_category", |_| {
            frequency("Acorn Category_frequency_count")
        })?,
        DispatchRule::new("acorn_group", ACORN, "Acorn_group", |_| frequency("Acorn Group_frequency_count"))?,
        DispatchRule::new("wellbeing_group", WELLBEING, "Wellbeing_Acorn_group", |_| {
            frequency("Wellbeing Acorn Group_frequency_count")
        })?,
        DispatchRule::new("wellbeing_type", WELLBEING, "Wellbeing_Acorn_type", |_| {
            frequency("Wellbeing Acorn Type_frequency_count")
        })?,
        DispatchRule::new("age_gender_count", AGE_GENDER, r"\[count\].*", |_| Strategy::AgeGenderGroups)?,
        DispatchRule::new("age_gender_share", AGE_GENDER, r"\[%_in_OA\].*", |_| Strategy::AgeGenderGroups)?,
        DispatchRule::new("females_total", AGE_GENDER, "Females total", |_| Strategy::GenderTotals)?,
        DispatchRule::new("males_total", AGE_GENDER, "Males total", |_| Strategy::GenderTotals)?,
        DispatchRule::new("spending_sum", SPENDING, r"\[sum_in_OA\].*", |_| {
            comparison("[sum_in_OA]", ComparisonFamily::Spending)
        })?,
        DispatchRule::new("spending_average", SPENDING, r"\[average_per_person_in_OA\].*", |_| {
            comparison("[average_per_person_in_OA]", ComparisonFamily::Spending)
        })?,
        DispatchRule::new("disposable_income_tax", DISPOSABLE, "Mean over all households in an OA: Income tax.*", |_| {
            comparison("Mean over all households in an OA: Income tax", ComparisonFamily::DisposableIncome)
        })?,
        DispatchRule::new("disposable_relevant", DISPOSABLE, "Mean over relevant households in an OA.*", |_| {
            comparison("Mean over relevant households in an OA", ComparisonFamily::DisposableIncome)
        })?,
        DispatchRule::new("disposable_paying", DISPOSABLE, "Proportion of households paying %.*", |_| {
            comparison("Proportion of households paying %", ComparisonFamily::DisposableIncome)
        })?,
        DispatchRule::new("disposable_outgoings", DISPOSABLE, "CACI_Essential_Outgoings.*", |_| {
            comparison("CACI_Essential_Outgoings", ComparisonFamily::DisposableIncome)
        })?,
        DispatchRule::new("income_count", INCOME, r"\[count_in_OA\].*", |_| income("[count_in_OA]"))?,
        DispatchRule::new("income_share", INCOME, r"\[%_in_OA\].*", |_| income("[%_in_OA]"))?,
        DispatchRule::new("poc_drill_down", POC, ".*", |key| poc::strategy_for(key.column))?,
        DispatchRule::new("demographic_oa_share", DEMO_OA, r"\[%_of_OA_total\].*", |_| {
            let (prefix, suffix) = pair("[%_of_OA_total] - [per_effective_area_square_meter] - ", "");
            Strategy::DemographicPie { prefix, suffix }
        })?,
        DispatchRule::new("demographic_borough_total", DEMO_BOROUGH, r"\[total\].*", |_| {
            let (prefix, suffix) = pair("[total] - ", "_count");
            Strategy::DemographicPie { prefix, suffix }
        })?,
        DispatchRule::new("demographic_borough_density", DEMO_BOROUGH, r"\[per_effective_area_square_meter\].*", |_| {
            let (prefix, suffix) = pair("[per_effective_area_square_meter] - ", "_count");
            Strategy::DemographicColumn { prefix, suffix }
        })?,
        DispatchRule::new("demographic_borough_share", DEMO_BOROUGH, r"\[%_of_borough_total\].*", |_| {
            let (prefix, suffix) = pair("[%_of_borough_total] - [per_effective_area_square_meter] - ", "");
            Strategy::DemographicColumn { prefix, suffix }
        })?,
        DispatchRule::new("population_density", POPULATION, r"\[per_effective_area_square_meter\].*", |_| {
            let (prefix, suffix) = pair("[per_effective_area_square_meter] - ", "_count");
            Strategy::PopulationPie { prefix, suffix }
        })?,
        DispatchRule::new("population_shared_scale", POPULATION, r"\[shared_scale\].*", |_| {
            let (prefix, suffix) = pair("[shared_scale] - [per_effective_area_square_meter] - ", "_count");
            Strategy::PopulationColumn { prefix, suffix }
        })?,
        DispatchRule::new("supply_minus_demand", SUPPLY, r"\[supply - demand\].*", |_| Strategy::SupplyMinusDemand)?,
        DispatchRule::new("supply_demand_index", SUPPLY, r"\[supply_demand_index\].*", |_| {
            Strategy::SupplyDemandIndex
        })?,
    ])
}

#[derive(Debug)]
pub struct Dispatcher {
    rules: Vec<DispatchRule>,
}
impl Dispatcher {
    /// The standard catalog; its patterns are compiled once per process.
    pub fn standard() -> Result<Self, DispatchError> {
        Ok(Self {
            rules: Self::standard_catalog()?.to_vec(),
        })
    }
    pub fn standard_catalog() -> Result<&'static [DispatchRule], DispatchError> {
        STANDARD_RULES.as_deref().map_err(Clone::clone)
    }
    pub fn with_rules(rules: Vec<DispatchRule>) -> Self {
        Self { rules }
    }
    pub fn rules(&self) -> &[DispatchRule] {
        &self.rules
    }
    /// Picks exactly one strategy. Reads `scales` only for the no-area fallback.
    pub fn select_visualization(
        &self,
        scales: &ScaleRegistry,
        dataset: &str,
        column: &str,
        area_selected: bool,
    ) -> Result<RenderInvocation, DispatchError> {
        let key = DispatchKey {
            dataset,
            column,
            area_selected,
        };
        let (rule, strategy) = self.resolve(scales, &key)?;
        debug!(key = %key, rule, strategy = strategy.name(), "dispatched visualization");
        Ok(RenderInvocation {
            strategy,
            rule,
            dataset: dataset.to_string(),
            column: column.to_string(),
        })
    }
    fn resolve(&self, scales: &ScaleRegistry, key: &DispatchKey<'_>) -> Result<(&'static str, Strategy), DispatchError> {
        if key.dataset == NONE_DATASET {
            return Ok(("no_dataset", Strategy::Placeholder));
        }
        if let Some(rule) = self.rules.iter().find(|r| r.matches(key)) {
            return Ok((rule.name, (rule.extract)(key)));
        }
        if key.area_selected {
            return Ok(("area_table", Strategy::DataTable));
        }
        if key.column == BLANK_COLUMN {
            return Ok(("blank_column", Strategy::Placeholder));
        }
        let scale = scales
            .get(key.dataset, key.column)
            .ok_or_else(|| DispatchError::MissingScale {
                dataset: key.dataset.to_string(),
                column: key.column.to_string(),
            })?;
        let column = key.column.to_string();
        Ok(match scale.domain_kind() {
            DomainKind::Categorical => ("categorical_frequency", Strategy::CategoricalFrequency { column }),
            DomainKind::Numeric => ("numeric_histogram", Strategy::NumericHistogram { column }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn key_renders_like_the_composite_string() {
        let key = DispatchKey {
            dataset: "[OA]_PTAL_directory.csv",
            column: "blank",
            area_selected: false,
        };
        assert_eq!(key.to_string(), "[OA]_PTAL_directory.csv#blank#no_oa");
    }
    #[test]
    fn catalog_compiles_in_order() {
        let d = Dispatcher::standard().unwrap();
        assert_eq!(d.rules().len(), 28);
        assert_eq!(d.rules()[0].name, "places_shared_scale");
        assert_eq!(d.rules()[27].name, "supply_demand_index");
    }
    #[test]
    fn catalog_is_compiled_once() {
        let first = Dispatcher::standard_catalog().unwrap();
        let second = Dispatcher::standard_catalog().unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(Dispatcher::standard().unwrap().rules().len(), first.len());
    }
    #[test]
    fn shared_scale_places_column_wins_over_bar_chart() {
        let d = Dispatcher::standard().unwrap();
        let inv = d
            .select_visualization(&ScaleRegistry::default(), "[Places]_counts.csv", "[shared_scale] - bar", true)
            .unwrap();
        assert_eq!(inv.strategy, Strategy::DataTable);
        assert_eq!(inv.rule, "places_shared_scale");
        let inv = d
            .select_visualization(&ScaleRegistry::default(), "[Places]_counts.csv", "bar", true)
            .unwrap();
        assert_eq!(inv.strategy, Strategy::PlacesBar);
    }
    #[test]
    fn no_scale_is_a_loud_error() {
        let d = Dispatcher::standard().unwrap();
        let err = d.select_visualization(&ScaleRegistry::default(), "x.csv", "c", false);
        assert!(matches!(err, Err(DispatchError::MissingScale { .. })));
    }
    #[test]
    fn bad_pattern_is_reported() {
        assert!(matches!(
            DispatchRule::new("broken", "(", ".*", |_| Strategy::Placeholder),
            Err(DispatchError::InvalidRulePattern { .. })
        ));
    }
}
