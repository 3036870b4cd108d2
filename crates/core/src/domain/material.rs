use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Pricing units carried on a material line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "LF")]
    Lf,
    #[serde(rename = "SF")]
    Sf,
    #[serde(rename = "EA")]
    Ea,
    #[serde(rename = "GAL")]
    Gal,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lf => "LF",
            Self::Sf => "SF",
            Self::Ea => "EA",
            Self::Gal => "GAL",
        })
    }
}

/// Line category; drives labor accrual and material-list grouping. Facing
/// installs with the insulation and accrues no hours of its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialCategory {
    Insulation,
    Facing,
    Jacket,
    Mastic,
    Accessory,
}

/// One priced output line. Built only by the takeoff engine; never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialItem {
    pub description: String,
    pub category: MaterialCategory,
    pub unit: Unit,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

impl MaterialItem {
    pub fn new(
        description: impl Into<String>,
        category: MaterialCategory,
        unit: Unit,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Self {
        Self {
            description: description.into(),
            category,
            unit,
            quantity,
            unit_price,
            total_price: (quantity * unit_price).round_dp(2),
        }
    }
}
