use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use takeoff_core::{
    DeterministicEstimator, EstimationRuntime, Facing, FittingKind, InsulationMaterial,
    InsulationSpec, Location, MeasuredSystem, MeasurementItem, PriceBook, ProjectQuote,
    QuoteRequest, SystemType,
};

/// Every quantity, price, and total in a quote is non-negative.
fn assert_all_figures_non_negative(quote: &ProjectQuote) {
    for line in &quote.materials {
        assert!(line.quantity >= Decimal::ZERO, "quantity for {}", line.description);
        assert!(line.unit_price >= Decimal::ZERO, "unit price for {}", line.description);
        assert!(line.total_price >= Decimal::ZERO, "total price for {}", line.description);
    }
    for (name, figure) in [
        ("materials_total", quote.materials_total),
        ("labor_hours", quote.labor_hours),
        ("labor_cost", quote.labor_cost),
        ("subtotal", quote.subtotal),
        ("contingency_amount", quote.contingency_amount),
        ("total", quote.total),
    ] {
        assert!(figure >= Decimal::ZERO, "{name} must be >= 0");
    }
}

fn request() -> QuoteRequest {
    QuoteRequest {
        project_name: "Example Commercial Building".to_owned(),
        quote_number: "Q20260101-0900".to_owned(),
        quote_date: NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date"),
        labor_rate: Decimal::from(65),
        contingency_percent: Decimal::from(10),
    }
}

fn outdoor_duct_spec() -> InsulationSpec {
    InsulationSpec {
        system_type: SystemType::Duct,
        size_range: "12-24 inch".to_owned(),
        thickness: Decimal::new(15, 1),
        material: InsulationMaterial::Fiberglass,
        facing: Some(Facing::Fsk),
        special_requirements: BTreeSet::from([
            "aluminum_jacket".to_owned(),
            "mastic_coating".to_owned(),
            "stainless_bands".to_owned(),
        ]),
        location: Location::Outdoor,
        notes: String::new(),
    }
}

fn roof_duct_run() -> MeasurementItem {
    MeasurementItem {
        item_id: "D-1".to_owned(),
        system_type: MeasuredSystem::Duct,
        size: "18x12".to_owned(),
        length: Decimal::from(100),
        location: "Roof".to_owned(),
        fittings: BTreeMap::from([(FittingKind::Elbow, 2)]),
        notes: String::new(),
    }
}

fn worked_example_book() -> PriceBook {
    PriceBook::from_json_str(
        r#"{
            "fiberglass_1.5": 4.10,
            "fsk_facing": 1.10,
            "aluminum_jacket": 8.00,
            "mastic": 0.65,
            "stainless_bands": 2.20
        }"#,
    )
    .expect("book")
}

#[test]
fn outdoor_duct_scenario_reproduces_published_figures() {
    let estimator = DeterministicEstimator::default();
    let outcome = estimator
        .estimate(
            vec![outdoor_duct_spec()],
            vec![roof_duct_run()],
            &worked_example_book(),
            &request(),
        )
        .expect("estimate");
    let quote = &outcome.quote;

    // 101 LF insulation, 550 SF each of facing/jacket/mastic, 101 bands
    assert_eq!(quote.materials.len(), 5);
    assert_eq!(quote.materials[0].quantity, Decimal::from(101));
    assert_eq!(quote.materials[1].quantity, Decimal::from(550));
    assert_eq!(quote.materials[4].quantity, Decimal::from(101));

    assert_eq!(quote.materials_total, Decimal::new(599880, 2));
    assert_eq!(quote.labor_hours, Decimal::new(31854, 2));
    assert_eq!(quote.labor_cost, Decimal::new(2070510, 2));
    assert_eq!(quote.subtotal, Decimal::new(2670390, 2));
    assert_eq!(quote.contingency_amount, Decimal::new(267039, 2));
    assert_eq!(quote.total, Decimal::new(2937429, 2));

    // the quote arithmetic invariants hold as stated
    assert_eq!(quote.subtotal, quote.materials_total + quote.labor_cost);
    assert_eq!(quote.total, quote.subtotal + quote.contingency_amount);
    assert_all_figures_non_negative(quote);
}

#[test]
fn empty_inputs_yield_an_all_zero_quote() {
    let estimator = DeterministicEstimator::default();
    let outcome = estimator
        .estimate(Vec::new(), Vec::new(), &PriceBook::default_book(), &request())
        .expect("estimate");
    let quote = &outcome.quote;

    assert!(quote.materials.is_empty());
    assert_eq!(quote.materials_total, Decimal::ZERO);
    assert_eq!(quote.labor_hours, Decimal::ZERO);
    assert_eq!(quote.labor_cost, Decimal::ZERO);
    assert_eq!(quote.subtotal, Decimal::ZERO);
    assert_eq!(quote.total, Decimal::ZERO);
    assert_all_figures_non_negative(quote);
}

#[test]
fn waste_note_keeps_a_pipe_run_out_of_the_quote() {
    let pipe_spec = InsulationSpec {
        system_type: SystemType::Pipe,
        size_range: "1-2 inch".to_owned(),
        thickness: Decimal::ONE,
        material: InsulationMaterial::Elastomeric,
        facing: None,
        special_requirements: BTreeSet::new(),
        location: Location::Indoor,
        notes: "chilled water".to_owned(),
    };
    let waste_run = MeasurementItem {
        item_id: "P-9".to_owned(),
        system_type: MeasuredSystem::Pipe,
        size: "2\"".to_owned(),
        length: Decimal::from(40),
        location: "Level 2".to_owned(),
        fittings: BTreeMap::new(),
        notes: "waste line from kitchen".to_owned(),
    };

    let estimator = DeterministicEstimator::default();
    let outcome = estimator
        .estimate(
            vec![pipe_spec],
            vec![waste_run],
            &PriceBook::default_book(),
            &request(),
        )
        .expect("estimate");

    assert!(outcome.measurement_scope.admitted.is_empty());
    assert_eq!(outcome.measurement_scope.excluded[0].reason, "waste");
    assert!(outcome.quote.materials.is_empty());
    assert_eq!(outcome.quote.total, Decimal::ZERO);
    assert_all_figures_non_negative(&outcome.quote);
}

#[test]
fn repeated_runs_are_byte_identical() {
    let estimator = DeterministicEstimator::default();
    let run = || {
        estimator
            .estimate(
                vec![outdoor_duct_spec()],
                vec![roof_duct_run()],
                &worked_example_book(),
                &request(),
            )
            .expect("estimate")
    };

    let first = run();
    let second = run();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first.quote).expect("serialize"),
        serde_json::to_string(&second.quote).expect("serialize")
    );
}

#[test]
fn missing_key_fails_the_whole_run() {
    let short_book = PriceBook::from_json_str(r#"{"fiberglass_1.5": 4.10}"#).expect("book");
    let estimator = DeterministicEstimator::default();
    let error = estimator
        .estimate(
            vec![outdoor_duct_spec()],
            vec![roof_duct_run()],
            &short_book,
            &request(),
        )
        .expect_err("missing facing key");

    assert_eq!(error.to_string(), "price book has no entry for key `fsk_facing`");
}
