use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::LaborSettings;
use crate::domain::material::MaterialCategory;
use crate::domain::measurement::MeasuredSystem;

/// Aggregate labor figure for one takeoff.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaborSummary {
    pub hours: Decimal,
    pub rate: Decimal,
    pub cost: Decimal,
}

/// Hours a single material line accrues before overhead. Facing installs
/// with the insulation and accessories are hardware, so neither adds hours.
pub(crate) fn line_hours(
    category: MaterialCategory,
    system: MeasuredSystem,
    quantity: Decimal,
    labor: &LaborSettings,
) -> Decimal {
    let rate = match category {
        MaterialCategory::Insulation => match system {
            MeasuredSystem::Duct => labor.duct_lf,
            MeasuredSystem::Pipe => labor.pipe_lf,
        },
        MaterialCategory::Jacket => labor.jacketing_sf,
        MaterialCategory::Mastic => labor.mastic_sf,
        MaterialCategory::Facing | MaterialCategory::Accessory => Decimal::ZERO,
    };
    quantity * rate
}

/// Applies the outdoor factor (once, to the aggregate, before overhead) and
/// the setup/cleanup overhead, then prices the hours.
pub(crate) fn finalize(
    raw_hours: Decimal,
    outdoor_factor: Option<Decimal>,
    labor_rate: Decimal,
    labor: &LaborSettings,
) -> LaborSummary {
    let weighted = match outdoor_factor {
        Some(factor) => raw_hours * factor,
        None => raw_hours,
    };
    let hours = (weighted * labor.overhead_factor).round_dp(2);
    LaborSummary { hours, rate: labor_rate, cost: (hours * labor_rate).round_dp(2) }
}
