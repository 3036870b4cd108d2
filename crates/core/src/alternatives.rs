use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::measurement::{MeasuredSystem, MeasurementItem};
use crate::domain::spec::{InsulationMaterial, InsulationSpec, SystemType};
use crate::errors::EstimateError;
use crate::pricebook::PriceBook;
use crate::takeoff::{TakeoffEngine, TakeoffInput};

/// Upgrade comparison offered alongside the base quote.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlternativeOption {
    pub name: String,
    pub base_cost: Decimal,
    pub upgrade_cost: Decimal,
    pub difference: Decimal,
}

/// Material-cost comparisons for the two stock upgrades: PVC jacketing on
/// piping and mineral-wool insulation on ductwork. Each option re-runs the
/// takeoff over substituted specs; labor is out of the comparison.
pub fn alternative_options<T: TakeoffEngine>(
    engine: &T,
    measurements: &[MeasurementItem],
    specs: &[InsulationSpec],
    book: &PriceBook,
    labor_rate: Decimal,
) -> Result<Vec<AlternativeOption>, EstimateError> {
    let mut options = Vec::new();

    let pipe_runs: Vec<MeasurementItem> = measurements
        .iter()
        .filter(|m| m.system_type == MeasuredSystem::Pipe)
        .cloned()
        .collect();
    if !pipe_runs.is_empty() {
        let pvc_specs: Vec<InsulationSpec> = specs
            .iter()
            .map(|spec| {
                if spec.system_type == SystemType::Pipe {
                    let mut upgraded = spec.clone();
                    upgraded.facing = None;
                    upgraded.special_requirements =
                        std::iter::once("pvc_jacket_20mil".to_owned()).collect();
                    upgraded
                } else {
                    spec.clone()
                }
            })
            .collect();

        options.push(compare(
            "pvc_jacket_upgrade",
            engine,
            &pipe_runs,
            specs,
            &pvc_specs,
            book,
            labor_rate,
        )?);
    }

    let duct_runs: Vec<MeasurementItem> = measurements
        .iter()
        .filter(|m| m.system_type == MeasuredSystem::Duct)
        .cloned()
        .collect();
    if !duct_runs.is_empty() {
        let premium_specs: Vec<InsulationSpec> = specs
            .iter()
            .map(|spec| {
                if spec.system_type == SystemType::Duct {
                    let mut upgraded = spec.clone();
                    upgraded.material = InsulationMaterial::MineralWool;
                    upgraded
                } else {
                    spec.clone()
                }
            })
            .collect();

        options.push(compare(
            "premium_insulation",
            engine,
            &duct_runs,
            specs,
            &premium_specs,
            book,
            labor_rate,
        )?);
    }

    Ok(options)
}

fn compare<T: TakeoffEngine>(
    name: &str,
    engine: &T,
    runs: &[MeasurementItem],
    base_specs: &[InsulationSpec],
    upgraded_specs: &[InsulationSpec],
    book: &PriceBook,
    labor_rate: Decimal,
) -> Result<AlternativeOption, EstimateError> {
    let base = engine
        .take_off(TakeoffInput { measurements: runs, specs: base_specs, book, labor_rate })?
        .materials_total();
    let upgrade = engine
        .take_off(TakeoffInput { measurements: runs, specs: upgraded_specs, book, labor_rate })?
        .materials_total();

    Ok(AlternativeOption {
        name: name.to_owned(),
        base_cost: base,
        upgrade_cost: upgrade,
        difference: upgrade - base,
    })
}
