use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::spec::SystemType;
use crate::errors::EstimateError;

/// Systems a takeoff measurement can cover. Equipment is specified but never
/// measured as a run, so it is absent here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasuredSystem {
    Duct,
    Pipe,
}

impl From<MeasuredSystem> for SystemType {
    fn from(value: MeasuredSystem) -> Self {
        match value {
            MeasuredSystem::Duct => SystemType::Duct,
            MeasuredSystem::Pipe => SystemType::Pipe,
        }
    }
}

impl fmt::Display for MeasuredSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Duct => "duct",
            Self::Pipe => "pipe",
        })
    }
}

/// Fitting vocabulary accepted on a measurement. Counts are `u32`; negative
/// counts are unrepresentable by construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FittingKind {
    Elbow,
    Tee,
    Reducer,
    Valve,
    Flange,
    Transition,
}

/// One measured run taken off the drawings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeasurementItem {
    pub item_id: String,
    pub system_type: MeasuredSystem,
    /// Rectangular duct `"WxH"` in inches, or a pipe nominal diameter such as
    /// `"2\""` / `"2 inch CHW"`.
    pub size: String,
    /// Linear feet.
    pub length: Decimal,
    pub location: String,
    #[serde(default)]
    pub fittings: BTreeMap<FittingKind, u32>,
    #[serde(default)]
    pub notes: String,
}

impl MeasurementItem {
    pub fn validate(&self) -> Result<(), EstimateError> {
        if self.length <= Decimal::ZERO {
            return Err(EstimateError::invalid(format!(
                "measurement `{}` has non-positive length {}",
                self.item_id, self.length
            )));
        }
        Ok(())
    }

    pub fn fitting_count(&self, kind: FittingKind) -> u32 {
        self.fittings.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_fittings(&self) -> u32 {
        self.fittings.values().sum()
    }
}
