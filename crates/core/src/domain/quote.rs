use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::material::{MaterialCategory, MaterialItem, Unit};

/// Final priced output of an estimation run. Assembled once, never patched;
/// a corrected run regenerates the whole quote.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectQuote {
    pub project_name: String,
    pub quote_number: String,
    pub quote_date: NaiveDate,
    pub materials: Vec<MaterialItem>,
    pub materials_total: Decimal,
    pub labor_hours: Decimal,
    pub labor_rate: Decimal,
    pub labor_cost: Decimal,
    pub subtotal: Decimal,
    pub contingency_percent: Decimal,
    pub contingency_amount: Decimal,
    pub total: Decimal,
    pub notes: Vec<String>,
}

/// Consolidated row in the distributor order list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderListEntry {
    pub description: String,
    pub category: MaterialCategory,
    pub unit: Unit,
    pub quantity: Decimal,
    pub total_price: Decimal,
}

impl ProjectQuote {
    /// Material order list for the distributor: identical lines merged by
    /// description and unit, sorted by category then description.
    pub fn material_order_list(&self) -> Vec<OrderListEntry> {
        let mut merged: BTreeMap<(MaterialCategory, String, Unit), OrderListEntry> =
            BTreeMap::new();

        for line in &self.materials {
            let key = (line.category, line.description.clone(), line.unit);
            merged
                .entry(key)
                .and_modify(|entry| {
                    entry.quantity += line.quantity;
                    entry.total_price += line.total_price;
                })
                .or_insert_with(|| OrderListEntry {
                    description: line.description.clone(),
                    category: line.category,
                    unit: line.unit,
                    quantity: line.quantity,
                    total_price: line.total_price,
                });
        }

        merged.into_values().collect()
    }
}
