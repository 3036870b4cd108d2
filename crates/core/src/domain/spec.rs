use std::collections::BTreeSet;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::EstimateError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemType {
    Duct,
    Pipe,
    Equipment,
}

impl fmt::Display for SystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Duct => "duct",
            Self::Pipe => "pipe",
            Self::Equipment => "equipment",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsulationMaterial {
    Fiberglass,
    Elastomeric,
    MineralWool,
    CellularGlass,
}

impl InsulationMaterial {
    /// Fragment used to build insulation price keys, e.g. `fiberglass_1.5`.
    pub fn key_fragment(&self) -> &'static str {
        match self {
            Self::Fiberglass => "fiberglass",
            Self::Elastomeric => "elastomeric",
            Self::MineralWool => "mineral_wool",
            Self::CellularGlass => "cellular_glass",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Fiberglass => "Fiberglass",
            Self::Elastomeric => "Elastomeric",
            Self::MineralWool => "Mineral Wool",
            Self::CellularGlass => "Cellular Glass",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Fsk,
    Asj,
}

impl Facing {
    pub fn price_key_name(&self) -> &'static str {
        match self {
            Self::Fsk => "fsk_facing",
            Self::Asj => "asj_facing",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Fsk => "FSK",
            Self::Asj => "ASJ",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Indoor,
    Outdoor,
    Exposed,
}

/// One insulation requirement extracted from the project specification.
/// Produced by an external extraction service; the engine reads it as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InsulationSpec {
    pub system_type: SystemType,
    /// Advisory free-text size descriptor, e.g. "4-12 inch".
    pub size_range: String,
    /// Insulation thickness in inches.
    pub thickness: Decimal,
    pub material: InsulationMaterial,
    #[serde(default)]
    pub facing: Option<Facing>,
    /// Free-text requirement tags, e.g. `aluminum_jacket`, `mastic_coating`.
    #[serde(default)]
    pub special_requirements: BTreeSet<String>,
    pub location: Location,
    #[serde(default)]
    pub notes: String,
}

impl InsulationSpec {
    pub fn validate(&self) -> Result<(), EstimateError> {
        if self.thickness <= Decimal::ZERO {
            return Err(EstimateError::invalid(format!(
                "{} spec has non-positive thickness {}",
                self.system_type, self.thickness
            )));
        }
        Ok(())
    }

    pub fn has_requirement(&self, tag: &str) -> bool {
        self.special_requirements.iter().any(|req| req == tag)
    }

    /// First special-requirement tag that names a jacket system, if any.
    pub fn jacket_tag(&self) -> Option<&str> {
        self.special_requirements
            .iter()
            .map(String::as_str)
            .find(|tag| tag.contains("jacket"))
    }

    pub fn wants_mastic(&self) -> bool {
        self.special_requirements
            .iter()
            .any(|tag| tag == "mastic" || tag == "mastic_coating" || tag == "vapor_seal")
    }
}
