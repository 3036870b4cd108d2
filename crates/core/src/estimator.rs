use serde::{Deserialize, Serialize};

use crate::assemble::{assemble_quote, QuoteRequest};
use crate::domain::measurement::MeasurementItem;
use crate::domain::quote::ProjectQuote;
use crate::domain::spec::InsulationSpec;
use crate::errors::EstimateError;
use crate::pricebook::PriceBook;
use crate::scope::{ScopeConfig, ScopeFilter, ScopeReport};
use crate::takeoff::{DeterministicTakeoffEngine, TakeoffEngine, TakeoffInput};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EstimateOutcome {
    pub quote: ProjectQuote,
    pub spec_scope: ScopeReport<InsulationSpec>,
    pub measurement_scope: ScopeReport<MeasurementItem>,
}

/// Full estimation run: scope filter, takeoff, quote assembly. One call, one
/// quote; any engine error aborts the run whole.
pub trait EstimationRuntime: Send + Sync {
    fn estimate(
        &self,
        specs: Vec<InsulationSpec>,
        measurements: Vec<MeasurementItem>,
        book: &PriceBook,
        request: &QuoteRequest,
    ) -> Result<EstimateOutcome, EstimateError>;
}

pub struct DeterministicEstimator<T> {
    filter: ScopeFilter,
    engine: T,
}

impl<T> DeterministicEstimator<T> {
    pub fn new(scope: ScopeConfig, engine: T) -> Self {
        Self { filter: ScopeFilter::new(scope), engine }
    }

    pub fn engine(&self) -> &T {
        &self.engine
    }
}

impl Default for DeterministicEstimator<DeterministicTakeoffEngine> {
    fn default() -> Self {
        Self::new(ScopeConfig::default(), DeterministicTakeoffEngine::default())
    }
}

impl<T: TakeoffEngine> EstimationRuntime for DeterministicEstimator<T> {
    fn estimate(
        &self,
        specs: Vec<InsulationSpec>,
        measurements: Vec<MeasurementItem>,
        book: &PriceBook,
        request: &QuoteRequest,
    ) -> Result<EstimateOutcome, EstimateError> {
        let spec_scope = self.filter.split(specs);
        let measurement_scope = self.filter.split(measurements);

        let takeoff = self.engine.take_off(TakeoffInput {
            measurements: &measurement_scope.admitted,
            specs: &spec_scope.admitted,
            book,
            labor_rate: request.labor_rate,
        })?;

        let quote = assemble_quote(request, &takeoff, &spec_scope.admitted)?;

        Ok(EstimateOutcome { quote, spec_scope, measurement_scope })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::{DeterministicEstimator, EstimationRuntime};
    use crate::assemble::QuoteRequest;
    use crate::domain::measurement::{MeasuredSystem, MeasurementItem};
    use crate::domain::spec::{InsulationMaterial, InsulationSpec, Location, SystemType};
    use crate::pricebook::PriceBook;

    fn request() -> QuoteRequest {
        QuoteRequest {
            project_name: "Test Project".to_owned(),
            quote_number: "Q20260101-0900".to_owned(),
            quote_date: NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date"),
            labor_rate: Decimal::from(65),
            contingency_percent: Decimal::from(10),
        }
    }

    fn pipe_spec() -> InsulationSpec {
        InsulationSpec {
            system_type: SystemType::Pipe,
            size_range: "1-2 inch".to_owned(),
            thickness: Decimal::ONE,
            material: InsulationMaterial::Elastomeric,
            facing: None,
            special_requirements: BTreeSet::new(),
            location: Location::Indoor,
            notes: "chilled water".to_owned(),
        }
    }

    fn pipe_run(id: &str, notes: &str) -> MeasurementItem {
        MeasurementItem {
            item_id: id.to_owned(),
            system_type: MeasuredSystem::Pipe,
            size: "2\"".to_owned(),
            length: Decimal::from(50),
            location: "Level 1".to_owned(),
            fittings: BTreeMap::new(),
            notes: notes.to_owned(),
        }
    }

    #[test]
    fn excluded_measurements_never_reach_the_engine() {
        let estimator = DeterministicEstimator::default();
        let outcome = estimator
            .estimate(
                vec![pipe_spec()],
                vec![pipe_run("P-1", "chilled water"), pipe_run("P-2", "waste riser")],
                &PriceBook::default_book(),
                &request(),
            )
            .expect("estimate");

        assert_eq!(outcome.measurement_scope.admitted.len(), 1);
        assert_eq!(outcome.measurement_scope.excluded[0].reason, "waste");
        // only the admitted run is priced
        assert_eq!(outcome.quote.materials.len(), 1);
    }

    #[test]
    fn two_identical_runs_produce_identical_outcomes() {
        let estimator = DeterministicEstimator::default();
        let run = || {
            estimator
                .estimate(
                    vec![pipe_spec()],
                    vec![pipe_run("P-1", "chilled water")],
                    &PriceBook::default_book(),
                    &request(),
                )
                .expect("estimate")
        };
        assert_eq!(run(), run());
    }
}
