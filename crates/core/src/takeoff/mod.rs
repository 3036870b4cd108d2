pub mod geometry;
pub mod labor;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::EstimatorConfig;
use crate::domain::material::{MaterialCategory, MaterialItem, Unit};
use crate::domain::measurement::MeasurementItem;
use crate::domain::spec::{InsulationSpec, Location, SystemType};
use crate::errors::EstimateError;
use crate::pricebook::{PriceBook, PriceKey};

use self::geometry::ProfileSize;
use self::labor::LaborSummary;

/// Name of the price-book labor modifier consulted for outdoor work.
const OUTDOOR_LABOR_MODIFIER: &str = "outdoor_labor";

#[derive(Clone, Debug)]
pub struct TakeoffInput<'a> {
    pub measurements: &'a [MeasurementItem],
    pub specs: &'a [InsulationSpec],
    pub book: &'a PriceBook,
    pub labor_rate: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TakeoffResult {
    pub materials: Vec<MaterialItem>,
    pub labor: LaborSummary,
}

impl TakeoffResult {
    pub fn materials_total(&self) -> Decimal {
        self.materials.iter().map(|line| line.total_price).sum()
    }
}

/// Turns admitted measurements and their governing specs into priced lines
/// plus labor. Deterministic and side-effect free; two identical calls yield
/// identical output.
pub trait TakeoffEngine: Send + Sync {
    fn take_off(&self, input: TakeoffInput<'_>) -> Result<TakeoffResult, EstimateError>;
}

#[derive(Clone, Debug, Default)]
pub struct DeterministicTakeoffEngine {
    config: EstimatorConfig,
}

impl DeterministicTakeoffEngine {
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    fn priced_line(
        &self,
        book: &PriceBook,
        description: String,
        category: MaterialCategory,
        unit: Unit,
        quantity: Decimal,
        key: &PriceKey,
    ) -> Result<MaterialItem, EstimateError> {
        let unit_price = book.unit_price(key)? * self.config.markup;
        Ok(MaterialItem::new(description, category, unit, quantity, unit_price))
    }
}

impl TakeoffEngine for DeterministicTakeoffEngine {
    fn take_off(&self, input: TakeoffInput<'_>) -> Result<TakeoffResult, EstimateError> {
        for spec in input.specs {
            spec.validate()?;
        }
        for measurement in input.measurements {
            measurement.validate()?;
        }

        let mut materials = Vec::new();
        let mut raw_hours = Decimal::ZERO;
        let mut outdoor = false;

        for measurement in input.measurements {
            let Some(spec) = governing_spec(measurement, input.specs) else {
                // No spec covers this system; the run carries no priced work.
                continue;
            };
            outdoor |= spec.location == Location::Outdoor;

            let mut push = |line: MaterialItem| {
                raw_hours += labor::line_hours(
                    line.category,
                    measurement.system_type,
                    line.quantity,
                    &self.config.labor,
                );
                materials.push(line);
            };

            // 1. Insulation by the linear foot, with fitting allowance.
            let allowance: Decimal = measurement
                .fittings
                .iter()
                .map(|(kind, count)| Decimal::from(*count) * self.config.fitting_allowance(*kind))
                .sum();
            let total_lf = measurement.length + allowance;
            if total_lf > Decimal::ZERO {
                let key = PriceKey::insulation(spec.material, spec.thickness);
                push(self.priced_line(
                    input.book,
                    format!(
                        "{} Insulation {:.1}\" - {}",
                        spec.material.display_name(),
                        spec.thickness,
                        measurement.size
                    ),
                    MaterialCategory::Insulation,
                    Unit::Lf,
                    total_lf,
                    &key,
                )?);
            }

            // Surface area is only parsed when a square-foot line needs it.
            let jacket_tag = spec.jacket_tag();
            let needs_surface = spec.facing.is_some() || jacket_tag.is_some() || spec.wants_mastic();
            let surface_sf = if needs_surface {
                let profile = ProfileSize::parse(&measurement.item_id, &measurement.size)?;
                (profile.jacket_girth_ft(spec.thickness) * measurement.length).round_dp(2)
            } else {
                Decimal::ZERO
            };

            // 2. Facing by the square foot.
            if let Some(facing) = spec.facing {
                if surface_sf > Decimal::ZERO {
                    let key = tag_key(facing.price_key_name())?;
                    push(self.priced_line(
                        input.book,
                        format!("{} Facing - {}", facing.display_name(), measurement.size),
                        MaterialCategory::Facing,
                        Unit::Sf,
                        surface_sf,
                        &key,
                    )?);
                }
            }

            // 3. Jacketing by the square foot, keyed by the requirement tag.
            if let Some(tag) = jacket_tag {
                if surface_sf > Decimal::ZERO {
                    let key = tag_key(tag)?;
                    push(self.priced_line(
                        input.book,
                        format!("{} - {}", humanize_tag(tag), measurement.size),
                        MaterialCategory::Jacket,
                        Unit::Sf,
                        surface_sf,
                        &key,
                    )?);
                }
            }

            // 4. Mastic vapor seal over the same surface.
            if spec.wants_mastic() && surface_sf > Decimal::ZERO {
                let key = tag_key("mastic")?;
                push(self.priced_line(
                    input.book,
                    "Mastic Vapor Seal Coating".to_owned(),
                    MaterialCategory::Mastic,
                    Unit::Sf,
                    surface_sf,
                    &key,
                )?);
            }

            // 5. Accessories by the each.
            if spec.has_requirement("stainless_bands") {
                let bands = measurement.length.ceil() + Decimal::ONE;
                let key = tag_key("stainless_bands")?;
                push(self.priced_line(
                    input.book,
                    "Stainless Steel Bands".to_owned(),
                    MaterialCategory::Accessory,
                    Unit::Ea,
                    bands,
                    &key,
                )?);
            }
            if spec.has_requirement("pvc_fitting_covers") || spec.has_requirement("fitting_covers")
            {
                let covers = Decimal::from(measurement.total_fittings());
                if covers > Decimal::ZERO {
                    let key = tag_key("pvc_fitting_covers")?;
                    push(self.priced_line(
                        input.book,
                        "PVC Fitting Covers".to_owned(),
                        MaterialCategory::Accessory,
                        Unit::Ea,
                        covers,
                        &key,
                    )?);
                }
            }
        }

        let outdoor_factor = if outdoor {
            input.book.labor_modifier(OUTDOOR_LABOR_MODIFIER)
        } else {
            None
        };
        let labor =
            labor::finalize(raw_hours, outdoor_factor, input.labor_rate, &self.config.labor);

        Ok(TakeoffResult { materials, labor })
    }
}

/// First admitted spec covering the measurement's system type.
fn governing_spec<'a>(
    measurement: &MeasurementItem,
    specs: &'a [InsulationSpec],
) -> Option<&'a InsulationSpec> {
    let system: SystemType = measurement.system_type.into();
    specs.iter().find(|spec| spec.system_type == system)
}

fn tag_key(tag: &str) -> Result<PriceKey, EstimateError> {
    PriceKey::new(tag)
        .map_err(|_| EstimateError::invalid(format!("requirement tag `{tag}` is not a valid price key")))
}

fn humanize_tag(tag: &str) -> String {
    tag.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
