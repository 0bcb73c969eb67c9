//! End-to-end runs of the decision pipeline.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use chrono::{Duration, NaiveDate};
use rfp_engine::application::services::estimator::DiscountTier;
use rfp_engine::domain::value_objects::ExclusionReason;
use rfp_engine::infrastructure::loader;
use rfp_engine::prelude::*;
use rust_decimal::Decimal;

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn config() -> PipelineConfig {
    PipelineConfig::default().with_evaluation_date(as_of())
}

fn cable_solicitation(id: &str, days_out: i64, value: u64) -> Solicitation {
    let r1 = Requirement::builder("R1", "11kV XLPE power cable", 6_000)
        .unit("m")
        .attribute("voltage", AttributeRequirement::exact("11 kV"))
        .attribute("insulation", AttributeRequirement::exact("XLPE"))
        .attribute("cross_section", AttributeRequirement::minimum("185 mm2"))
        .build()
        .unwrap();
    let r2 = Requirement::builder("R2", "Armoured feeder cable", 6_000)
        .unit("m")
        .attribute("voltage", AttributeRequirement::minimum("6.6kV"))
        .attribute("conductor", AttributeRequirement::exact("copper"))
        .build()
        .unwrap();
    Solicitation::builder(
        id,
        "Cable supply",
        "Metro Utility",
        OrganizationClass::Public,
        as_of() + Duration::days(days_out),
        Money::from_units(value),
    )
    .requirements([r1, r2])
    .build()
}

fn catalog() -> Catalog {
    Catalog::new(vec![
        CatalogProduct::new("C-240", "11kV Cu XLPE 240mm2", "cables", Money::from_units(100))
            .with_attribute("voltage", "11000V")
            .with_attribute("insulation", "xlpe")
            .with_attribute("cross_section", "240 sq.mm")
            .with_attribute("conductor", "Copper"),
        CatalogProduct::new("LV-16", "LV PVC 16mm2", "cables", Money::from_units(5))
            .with_attribute("voltage", "1.1kV")
            .with_attribute("insulation", "PVC"),
    ])
    .unwrap()
}

mod end_to_end {
    use super::*;

    #[test]
    fn single_product_satisfies_both_requirements() {
        let record = run_pipeline(
            &[cable_solicitation("TND-1", 60, 25_000_000)],
            &catalog(),
            &[],
            &config(),
        )
        .unwrap();

        let chosen = record.solicitation().unwrap();
        assert_eq!(chosen.id().as_str(), "TND-1");
        assert!((record.selection()[0].score - 90.0).abs() < 1e-9);

        assert_eq!(record.matches().len(), 2);
        for result in record.matches() {
            let best = result.best().unwrap();
            assert_eq!(best.sku().as_str(), "C-240");
            assert!((best.match_percentage - 100.0).abs() < 1e-9);
        }

        let pricing = record.pricing();
        assert_eq!(pricing.lines.len(), 2);
        let line = &pricing.lines[0];
        assert_eq!(line.discount_rate, Decimal::new(8, 2));
        assert_eq!(line.base_cost, Money::from_units(600_000));
        assert_eq!(line.discounted_subtotal, Money::from_units(552_000));
        assert_eq!(line.logistics_cost, Money::from_units(11_040));
        assert_eq!(line.margin_amount, Money::from_units(56_304));
        assert_eq!(line.final_total, Money::from_units(619_344));
        assert_eq!(pricing.total, Money::from_units(1_238_688));

        assert!((record.overall_compliance() - 100.0).abs() < 1e-9);
        assert!(record.gaps().is_empty());
        assert_eq!(record.recommendation(), RecommendationLabel::Recommended);
    }

    #[test]
    fn testing_costs_flow_into_the_total() {
        let costs = vec![TestingCost::flat(
            "Type test",
            Money::from_units(10_000),
            Applicability::Category {
                category: "cables".into(),
            },
        )];
        let record = run_pipeline(
            &[cable_solicitation("TND-1", 60, 25_000_000)],
            &catalog(),
            &costs,
            &config(),
        )
        .unwrap();
        let line = &record.pricing().lines[0];
        assert_eq!(line.testing_cost, Money::from_units(10_000));
        assert_eq!(line.applied_tests, vec!["Type test".to_string()]);
        // (552000 + 10000 + 11040) × 1.1
        assert_eq!(line.final_total, Money::from_units(630_344));
    }

    #[test]
    fn best_candidate_wins_among_several() {
        let candidates = vec![
            cable_solicitation("SMALL", 60, 1_000_000),
            cable_solicitation("LARGE", 60, 25_000_000),
            cable_solicitation("LATE", 200, 90_000_000),
        ];
        let record = run_pipeline(&candidates, &catalog(), &[], &config()).unwrap();
        assert_eq!(record.solicitation().unwrap().id().as_str(), "LARGE");
        assert_eq!(record.selection().len(), 2);
        assert_eq!(record.exclusions().len(), 1);
        assert_eq!(record.exclusions()[0].reason, ExclusionReason::DeadlineExpired);
    }

    #[test]
    fn custom_tiers_apply() {
        let estimation = EstimatorConfig::default()
            .with_discount_tiers(vec![DiscountTier::new("bulk", 5_000, Decimal::new(20, 2))])
            .with_margin_rate(Decimal::ZERO);
        let record = run_pipeline(
            &[cable_solicitation("TND-1", 60, 25_000_000)],
            &catalog(),
            &[],
            &config().with_estimation(estimation),
        )
        .unwrap();
        let line = &record.pricing().lines[0];
        assert_eq!(line.discount_tier, "bulk");
        assert_eq!(line.discounted_subtotal, Money::from_units(480_000));
        // zero margin never earns an outright recommendation
        assert_eq!(
            record.recommendation(),
            RecommendationLabel::RecommendedWithGaps
        );
    }
}

mod no_opportunity {
    use super::*;

    #[test]
    fn every_candidate_filtered_out() {
        let candidates = vec![
            cable_solicitation("PAST", -1, 25_000_000),
            cable_solicitation("FAR", 91, 25_000_000),
        ];
        let record = run_pipeline(&candidates, &catalog(), &[], &config()).unwrap();
        assert!(record.solicitation().is_none());
        assert!(record.selection().is_empty());
        assert!(record.matches().is_empty());
        assert!(record.pricing().is_empty());
        assert!(record.overall_compliance().abs() < 1e-9);
        assert_eq!(record.recommendation(), RecommendationLabel::NotRecommended);
        assert_eq!(record.exclusions().len(), 2);
    }

    #[test]
    fn value_floor_excludes() {
        let selection = SelectionConfig::default().with_min_project_value(Money::from_units(50_000_000));
        let record = run_pipeline(
            &[cable_solicitation("TND-1", 60, 25_000_000)],
            &catalog(),
            &[],
            &config().with_selection(selection),
        )
        .unwrap();
        assert!(record.solicitation().is_none());
        assert_eq!(record.exclusions()[0].reason, ExclusionReason::ValueTooLow);
    }

    #[test]
    fn deadline_window_is_inclusive() {
        let record = run_pipeline(
            &[cable_solicitation("EDGE", 90, 25_000_000)],
            &catalog(),
            &[],
            &config(),
        )
        .unwrap();
        assert_eq!(record.solicitation().unwrap().id().as_str(), "EDGE");

        let today = run_pipeline(
            &[cable_solicitation("TODAY", 0, 25_000_000)],
            &catalog(),
            &[],
            &config(),
        )
        .unwrap();
        assert!(today.solicitation().is_some());
    }

    #[test]
    fn empty_catalog_yields_gaps() {
        let record = run_pipeline(
            &[cable_solicitation("TND-1", 60, 25_000_000)],
            &Catalog::default(),
            &[],
            &config(),
        )
        .unwrap();
        assert_eq!(record.gaps().len(), 2);
        assert_eq!(record.items_matched(), 0);
        assert_eq!(record.recommendation(), RecommendationLabel::NotRecommended);
    }
}

mod errors {
    use super::*;

    #[test]
    fn empty_candidate_set() {
        let err = run_pipeline(&[], &catalog(), &[], &config()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn invalid_configuration_is_reported_before_running() {
        let bad = config().with_matching(MatchConfig::default().with_max_recommendations(0));
        let err = run_pipeline(
            &[cable_solicitation("TND-1", 60, 25_000_000)],
            &catalog(),
            &[],
            &bad,
        )
        .unwrap_err();
        assert!(err.is_config());
    }
}

mod determinism {
    use super::*;

    #[test]
    fn identical_inputs_serialize_identically() {
        let candidates = vec![
            cable_solicitation("A", 30, 5_000_000),
            cable_solicitation("B", 45, 5_000_000),
            cable_solicitation("C", 120, 5_000_000),
        ];
        let first = run_pipeline(&candidates, &catalog(), &[], &config()).unwrap();
        let second = run_pipeline(&candidates, &catalog(), &[], &config()).unwrap();

        let a = serde_json::to_vec(&first).unwrap();
        let b = serde_json::to_vec(&second).unwrap();
        assert_eq!(a, b);
        assert_eq!(first.response_id(), second.response_id());
    }
}

mod from_json {
    use super::*;

    const SOLICITATIONS: &str = r#"[
        {
            "id": "TND-042",
            "title": "Substation cabling",
            "organization": "State Power Board",
            "organization_class": "public",
            "submission_deadline": "2025-07-01",
            "project_value": "12000000",
            "requirements": [
                {
                    "id": "R1",
                    "description": "11kV cable",
                    "quantity": 1500,
                    "attributes": {
                        "voltage": "11kV",
                        "cross_section": { "value": "185 mm2", "rule": "minimum" }
                    }
                }
            ]
        }
    ]"#;

    const CATALOG: &str = r#"[
        { "sku": "C-240", "name": "Cable", "category": "cables", "unit_price": "20.00",
          "attributes": { "voltage": "11 kV", "cross_section": "240mm2" } }
    ]"#;

    const TESTING: &str = r#"[
        { "name": "Routine test", "amount": "1.50", "per_unit": true }
    ]"#;

    #[test]
    fn loaded_inputs_run_through_the_pipeline() {
        let solicitations = loader::parse_solicitations(SOLICITATIONS).unwrap();
        let catalog = loader::parse_catalog(CATALOG).unwrap();
        let costs = loader::parse_testing_costs(TESTING).unwrap();

        let record = run_pipeline(&solicitations, &catalog, &costs, &config()).unwrap();
        let line = &record.pricing().lines[0];
        // 1500 × 20 = 30000, 5% → 28500, testing 2250, logistics 570
        assert_eq!(line.discount_tier, "1000-4999");
        assert_eq!(line.discounted_subtotal, Money::from_units(28_500));
        assert_eq!(line.testing_cost, Money::from_units(2_250));
        assert_eq!(line.logistics_cost, Money::from_units(570));
        assert_eq!(line.final_total, Money::from_units(34_452));
        assert_eq!(record.recommendation(), RecommendationLabel::Recommended);
    }
}
