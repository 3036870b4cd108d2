use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::EstimateError;

const INCHES_PER_FOOT: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Cross-section parsed from a measurement's `size` string.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ProfileSize {
    /// Rectangular duct, `"WxH"` in inches.
    Rectangular { width: Decimal, height: Decimal },
    /// Round duct or pipe nominal diameter in inches.
    Round { diameter: Decimal },
}

impl ProfileSize {
    /// Parses sizes as the drawings write them: `18x12`, `2"`, `2 inch`,
    /// `6 in CHW` (trailing system tags ignored). Anything without a leading
    /// dimension is a hard parse failure, never a default.
    pub fn parse(item_id: &str, size: &str) -> Result<Self, EstimateError> {
        let parse_err = || EstimateError::MeasurementParse {
            item_id: item_id.to_owned(),
            size: size.to_owned(),
        };

        let trimmed = size.trim().to_ascii_lowercase();
        if let Some((left, right)) = trimmed.split_once('x') {
            let width = first_number(left).ok_or_else(parse_err)?;
            let height = first_number(right).ok_or_else(parse_err)?;
            if width <= Decimal::ZERO || height <= Decimal::ZERO {
                return Err(parse_err());
            }
            return Ok(Self::Rectangular { width, height });
        }

        let diameter = first_number(&trimmed).ok_or_else(parse_err)?;
        if diameter <= Decimal::ZERO {
            return Err(parse_err());
        }
        Ok(Self::Round { diameter })
    }

    /// Outside girth of the insulated run in feet. Round sections wrap the
    /// circumference at the insulated diameter; rectangular ducts wrap the
    /// insulated perimeter.
    pub fn jacket_girth_ft(&self, thickness: Decimal) -> Decimal {
        let two = Decimal::TWO;
        let girth_inches = match self {
            Self::Round { diameter } => Decimal::PI * (*diameter + two * thickness),
            Self::Rectangular { width, height } => {
                two * (*width + *height) + Decimal::from(8) * thickness
            }
        };
        girth_inches / INCHES_PER_FOOT
    }
}

/// First decimal number embedded in the text, e.g. `18`, `2.5`.
fn first_number(text: &str) -> Option<Decimal> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let number: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    number.parse().ok()
}
