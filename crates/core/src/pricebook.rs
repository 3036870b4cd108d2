use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::spec::InsulationMaterial;
use crate::errors::{EstimateError, PriceBookError};

/// Validated price book key. Keys follow `{material}_{thickness:.1}` for
/// insulation and descriptive names for everything else (`aluminum_jacket`,
/// `mastic`, ...). Construction rejects anything outside `a-z0-9_.` so typos
/// like `Fiberglass_1.5` surface before pricing starts.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PriceKey(String);

impl PriceKey {
    pub fn new(raw: impl Into<String>) -> Result<Self, PriceBookError> {
        let raw = raw.into();
        let valid = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '.');
        if !valid {
            return Err(PriceBookError::InvalidKey(raw));
        }
        Ok(Self(raw))
    }

    /// Key for an insulation run, thickness formatted to one decimal place:
    /// `fiberglass_1.5`, `mineral_wool_2.0`.
    pub fn insulation(material: InsulationMaterial, thickness: Decimal) -> Self {
        Self(format!("{}_{:.1}", material.key_fragment(), thickness))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PriceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PriceKey {
    type Error = PriceBookError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PriceKey> for String {
    fn from(value: PriceKey) -> Self {
        value.0
    }
}

/// Unit prices keyed by [`PriceKey`]. Loaded once per estimation run and
/// read-only for its duration; independent runs take independent snapshots.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceBook {
    prices: BTreeMap<PriceKey, Decimal>,
}

#[derive(Deserialize)]
struct RawSupplierPrice {
    key: String,
    supplier_price: Option<Decimal>,
    price: Option<Decimal>,
    unit_price: Option<Decimal>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPriceBook {
    Supplier { supplier_prices: Vec<RawSupplierPrice> },
    Flat(BTreeMap<String, Decimal>),
}

impl PriceBook {
    pub fn from_entries<I, K>(entries: I) -> Result<Self, PriceBookError>
    where
        I: IntoIterator<Item = (K, Decimal)>,
        K: Into<String>,
    {
        let mut prices = BTreeMap::new();
        for (key, price) in entries {
            let key = PriceKey::new(key)?;
            if price < Decimal::ZERO {
                return Err(PriceBookError::NegativePrice {
                    key: key.to_string(),
                    price: price.to_string(),
                });
            }
            prices.insert(key, price);
        }
        Ok(Self { prices })
    }

    /// Accepts both external representations and normalizes to the flat map:
    /// a plain `{key: price}` object, or `{"supplier_prices": [{key, ...}]}`
    /// where the price is the first present of `supplier_price`, `price`,
    /// `unit_price`.
    pub fn from_json_str(raw: &str) -> Result<Self, PriceBookError> {
        let parsed: RawPriceBook = serde_json::from_str(raw)?;
        match parsed {
            RawPriceBook::Flat(map) => Self::from_entries(map),
            RawPriceBook::Supplier { supplier_prices } => {
                let mut entries = Vec::with_capacity(supplier_prices.len());
                for row in supplier_prices {
                    let price = row
                        .supplier_price
                        .or(row.price)
                        .or(row.unit_price)
                        .ok_or_else(|| PriceBookError::MissingPrice(row.key.clone()))?;
                    entries.push((row.key, price));
                }
                Self::from_entries(entries)
            }
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PriceBookError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| PriceBookError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Built-in market prices, used when no supplier book is provided. Keys
    /// are pre-validated literals, so construction cannot fail.
    pub fn default_book() -> Self {
        let entries = [
            // insulation, per linear foot
            ("fiberglass_1.5", Decimal::new(450, 2)),
            ("fiberglass_2.0", Decimal::new(575, 2)),
            ("elastomeric_0.5", Decimal::new(325, 2)),
            ("elastomeric_1.0", Decimal::new(450, 2)),
            ("cellular_glass_1.0", Decimal::new(675, 2)),
            ("mineral_wool_1.5", Decimal::new(525, 2)),
            // facings and jacketing, per square foot
            ("fsk_facing", Decimal::new(125, 2)),
            ("asj_facing", Decimal::new(175, 2)),
            ("aluminum_jacket", Decimal::new(850, 2)),
            ("pvc_jacket_20mil", Decimal::new(375, 2)),
            ("pvc_jacket_30mil", Decimal::new(450, 2)),
            ("stainless_jacket", Decimal::new(1250, 2)),
            // accessories and sealants
            ("mastic", Decimal::new(75, 2)),
            ("stainless_bands", Decimal::new(250, 2)),
            ("pvc_fitting_covers", Decimal::new(850, 2)),
            ("adhesive", Decimal::new(1250, 2)),
            ("vapor_seal", Decimal::new(1500, 2)),
            ("metal_corner_beads", Decimal::new(125, 2)),
            ("self_adhering_tape", Decimal::new(45, 2)),
            // labor rate modifiers (multipliers, not line prices)
            ("standard_labor", Decimal::ONE),
            ("premium_labor", Decimal::new(125, 2)),
            ("outdoor_labor", Decimal::new(115, 2)),
            ("height_labor", Decimal::new(120, 2)),
        ];
        let prices = entries
            .into_iter()
            .map(|(key, price)| (PriceKey(key.to_owned()), price))
            .collect();
        Self { prices }
    }

    /// Unit price lookup. A missing key is fatal for the line being priced,
    /// never a silent zero.
    pub fn unit_price(&self, key: &PriceKey) -> Result<Decimal, EstimateError> {
        self.prices
            .get(key)
            .copied()
            .ok_or_else(|| EstimateError::PricingKeyNotFound { key: key.to_string() })
    }

    /// Labor rate modifier (e.g. `outdoor_labor`). Absent modifiers are
    /// simply not applied, unlike priced line keys.
    pub fn labor_modifier(&self, name: &str) -> Option<Decimal> {
        let key = PriceKey::new(name).ok()?;
        self.prices.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}
