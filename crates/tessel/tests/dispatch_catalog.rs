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

mod common;

use proptest::prelude::*;
use tessel::dispatch::{ComparisonFamily, Dispatcher, Strategy};
use tessel::error::DispatchError;
use tessel::palette::Palette;
use tessel::registry::DatasetRegistry;
use tessel::scale::{DomainKind, ScaleRegistry};

fn pick(dataset: &str, column: &str, area: bool) -> Strategy {
    let dispatcher = Dispatcher::standard().unwrap();
    dispatcher
        .select_visualization(&ScaleRegistry::default(), dataset, column, area)
        .unwrap()
        .strategy
}

fn freq(source: &str) -> Strategy {
    Strategy::FrequencyColumn {
        source_column: source.to_string(),
    }
}

#[test]
fn test_named_rules_with_area_selected() {
    let cases: Vec<(&str, &str, Strategy)> = vec![
        ("[Places]_counts.csv", "[shared_scale] - cafe", Strategy::DataTable),
        ("[Places]_counts_normalized_by_OA_effective_area.csv", "cafe", Strategy::PlacesBar),
        ("[Places]_counts.csv", "blank", Strategy::PlacesBar),
        (
            "[OA]_PTAL_directory.csv",
            "Public_Transport_Accessibility_Level",
            freq("Public Transport Accessibility Level_frequency_count"),
        ),
        ("[Residents]_Acorn_directory.csv", "Acorn_category", freq("Acorn Category_frequency_count")),
        ("[Residents]_Acorn_directory.csv", "Acorn_group", freq("Acorn Group_frequency_count")),
        (
            "[Residents]_wellbeing_directory.csv",
            "Wellbeing_Acorn_group",
            freq("Wellbeing Acorn Group_frequency_count"),
        ),
        (
            "[Residents]_wellbeing_directory.csv",
            "Wellbeing_Acorn_type",
            freq("Wellbeing Acorn Type_frequency_count"),
        ),
        (
            "[Residents]_age_and_gender_distribution.csv",
            "[count] - Females - Infant [0-4]",
            Strategy::AgeGenderGroups,
        ),
        (
            "[Residents]_age_and_gender_distribution.csv",
            "[%_in_OA] - Total - Senior [65+]",
            Strategy::AgeGenderGroups,
        ),
        ("[Residents]_age_and_gender_distribution.csv", "Females total", Strategy::GenderTotals),
        ("[Residents]_age_and_gender_distribution.csv", "Males total", Strategy::GenderTotals),
        (
            "[Residents]_spending_categories.csv",
            "[sum_in_OA] - Food",
            Strategy::CategoryComparison {
                prefix: "[sum_in_OA]".into(),
                family: ComparisonFamily::Spending,
            },
        ),
        (
            "[Residents]_spending_categories.csv",
            "[average_per_person_in_OA] - Tobacco",
            Strategy::CategoryComparison {
                prefix: "[average_per_person_in_OA]".into(),
                family: ComparisonFamily::Spending,
            },
        ),
        (
            "[Residents]_disposable_income_spending_categories.csv",
            "Mean over all households in an OA: Income tax - Amount",
            Strategy::CategoryComparison {
                prefix: "Mean over all households in an OA: Income tax".into(),
                family: ComparisonFamily::DisposableIncome,
            },
        ),
        (
            "[Residents]_disposable_income_spending_categories.csv",
            "Mean over relevant households in an OA - Water",
            Strategy::CategoryComparison {
                prefix: "Mean over relevant households in an OA".into(),
                family: ComparisonFamily::DisposableIncome,
            },
        ),
        (
            "[Residents]_disposable_income_spending_categories.csv",
            "Proportion of households paying % - Council tax",
            Strategy::CategoryComparison {
                prefix: "Proportion of households paying %".into(),
                family: ComparisonFamily::DisposableIncome,
            },
        ),
        (
            "[Residents]_disposable_income_spending_categories.csv",
            "CACI_Essential_Outgoings - Rent",
            Strategy::CategoryComparison {
                prefix: "CACI_Essential_Outgoings".into(),
                family: ComparisonFamily::DisposableIncome,
            },
        ),
        (
            "[Residents]_income.csv",
            "[count_in_OA] - 0-5K",
            Strategy::IncomeBrackets {
                prefix: "[count_in_OA]".into(),
            },
        ),
        (
            "[Residents]_income.csv",
            "[%_in_OA] - 200K+",
            Strategy::IncomeBrackets {
                prefix: "[%_in_OA]".into(),
            },
        ),
        (
            "[Demographic_distribution]_supertypes_OA_scope.csv",
            "[%_of_OA_total] - [per_effective_area_square_meter] - worker",
            Strategy::DemographicPie {
                prefix: "[%_of_OA_total] - [per_effective_area_square_meter] - ".into(),
                suffix: String::new(),
            },
        ),
        (
            "[Demographic_distribution]_granular_borough_scope.csv",
            "[total] - worker_count",
            Strategy::DemographicPie {
                prefix: "[total] - ".into(),
                suffix: "_count".into(),
            },
        ),
        (
            "[Demographic_distribution]_granular_borough_scope.csv",
            "[per_effective_area_square_meter] - worker_count",
            Strategy::DemographicColumn {
                prefix: "[per_effective_area_square_meter] - ".into(),
                suffix: "_count".into(),
            },
        ),
        (
            "[Demographic_distribution]_supertypes_attractors_borough_scope.csv",
            "[%_of_borough_total] - [per_effective_area_square_meter] - shopper",
            Strategy::DemographicColumn {
                prefix: "[%_of_borough_total] - [per_effective_area_square_meter] - ".into(),
                suffix: String::new(),
            },
        ),
        (
            "[Population]_total_over_24_hour.csv",
            "[per_effective_area_square_meter] - total_count",
            Strategy::PopulationPie {
                prefix: "[per_effective_area_square_meter] - ".into(),
                suffix: "_count".into(),
            },
        ),
        (
            "[Population]_total_over_24_hour.csv",
            "[shared_scale] - [per_effective_area_square_meter] - worker_count",
            Strategy::PopulationColumn {
                prefix: "[shared_scale] - [per_effective_area_square_meter] - ".into(),
                suffix: "_count".into(),
            },
        ),
        (
            "[Supply_demand]_example.csv",
            "[supply - demand] - [normalized_[0-1]_proportions] - bar_worker",
            Strategy::SupplyMinusDemand,
        ),
        ("[Supply_demand]_example.csv", "[supply_demand_index] - cafe_total", Strategy::SupplyDemandIndex),
    ];
    for (dataset, column, expected) in cases {
        assert_eq!(pick(dataset, column, true), expected, "{dataset} / {column}");
    }
}

#[test]
fn test_poc_drill_down_branches() {
    let ds = "[POC_Demographic_distribution]_granular_normalized.csv";
    assert_eq!(
        pick(ds, "[%_of_OA_total] - [per_effective_area_square_meter] - worker_units", true),
        Strategy::DemographicPie {
            prefix: "[%_of_OA_total] - [per_effective_area_square_meter] - ".into(),
            suffix: "_units".into(),
        }
    );
    assert_eq!(
        pick(ds, "[per_effective_area_square_meter] - worker_value", true),
        Strategy::DemographicPie {
            prefix: "[per_effective_area_square_meter] - ".into(),
            suffix: "_value".into(),
        }
    );
    assert_eq!(pick(ds, "blank", true), Strategy::DataTable);
}

#[test]
fn test_unmatched_key_with_area_is_data_table() {
    assert_eq!(pick("[OA]_Normalizing_properties.csv", "OA_area_meters", true), Strategy::DataTable);
    assert_eq!(pick("[OA]_PTAL_directory.csv", "blank", true), Strategy::DataTable);
    assert_eq!(pick("[Residents]_age_and_gender_distribution.csv", "Total population", true), Strategy::DataTable);
}

#[test]
fn test_named_rules_need_an_area() {
    let ctx = common::context();
    let dispatcher = Dispatcher::standard().unwrap();
    let inv = dispatcher
        .select_visualization(&ctx.scales, common::PLACES, "bar", false)
        .unwrap();
    assert_eq!(inv.strategy, Strategy::NumericHistogram { column: "bar".into() });
}

#[test]
fn test_blank_column_without_area_is_placeholder() {
    for dataset in ["none", common::PTAL, common::PLACES, "anything.csv"] {
        assert_eq!(pick(dataset, "blank", false), Strategy::Placeholder);
    }
    assert_eq!(pick("none", "blank", true), Strategy::Placeholder);
}

#[test]
fn test_domain_type_decides_fallback() {
    let ctx = common::context();
    let dispatcher = Dispatcher::standard().unwrap();
    let select = |ds: &str, col: &str| {
        dispatcher
            .select_visualization(&ctx.scales, ds, col, false)
            .unwrap()
            .strategy
    };
    assert_eq!(
        select(common::PTAL, "Public_Transport_Accessibility_Level"),
        Strategy::CategoricalFrequency {
            column: "Public_Transport_Accessibility_Level".into()
        }
    );
    assert_eq!(
        select(common::ACORN, "Acorn_category"),
        Strategy::CategoricalFrequency {
            column: "Acorn_category".into()
        }
    );
    assert_eq!(
        select(common::NORMALIZING, "households"),
        Strategy::NumericHistogram {
            column: "households".into()
        }
    );
}

#[test]
fn test_numeric_range_on_text_column_goes_to_histogram() {
    let metadata = r#"{"bands.csv": {"column_data": [
        {"name": "band", "type_practical": "string", "range": [1, 2, 3]},
        {"name": "label", "type_practical": "string", "range": ["x", "y"]}
    ]}}"#;
    let registry = DatasetRegistry::from_json_str(metadata).unwrap();
    let scales = ScaleRegistry::build(&registry, &Palette::standard().unwrap()).unwrap();
    assert_eq!(scales.get("bands.csv", "band").unwrap().domain_kind(), DomainKind::Numeric);
    let dispatcher = Dispatcher::standard().unwrap();
    let band = dispatcher
        .select_visualization(&scales, "bands.csv", "band", false)
        .unwrap();
    assert_eq!(band.strategy, Strategy::NumericHistogram { column: "band".into() });
    let label = dispatcher
        .select_visualization(&scales, "bands.csv", "label", false)
        .unwrap();
    assert_eq!(label.strategy, Strategy::CategoricalFrequency { column: "label".into() });
}

#[test]
fn test_missing_scale_fails_loudly() {
    let ctx = common::context();
    let dispatcher = Dispatcher::standard().unwrap();
    let err = dispatcher.select_visualization(&ctx.scales, common::PTAL, "not_registered", false);
    assert!(matches!(err, Err(DispatchError::MissingScale { .. })));
}

proptest! {
    #[test]
    fn test_dispatch_is_idempotent(
        dataset in prop::sample::select(vec![
            "none",
            "[Places]_counts.csv",
            "[OA]_PTAL_directory.csv",
            "[POC_Demographic_distribution]_granular.csv",
            "[Supply_demand]_example.csv",
            "[Residents]_income.csv",
        ]),
        column in "(blank|\\[shared_scale\\] - [a-z]{1,6}|\\[%_in_OA\\] - [a-z]{1,6}|[a-z ]{0,12})",
        area in any::<bool>(),
    ) {
        let dispatcher = Dispatcher::standard().unwrap();
        let scales = ScaleRegistry::default();
        let first = dispatcher.select_visualization(&scales, dataset, &column, area);
        let second = dispatcher.select_visualization(&scales, dataset, &column, area);
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(_), Err(_)) => {}
            _ => prop_assert!(false, "dispatch changed outcome between calls"),
        }
    }
}
