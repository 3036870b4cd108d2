use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::EstimatorConfig;
use crate::domain::quote::ProjectQuote;
use crate::domain::spec::{InsulationSpec, Location};
use crate::errors::EstimateError;
use crate::takeoff::TakeoffResult;

/// Quote metadata and overridable commercial terms for one estimation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub project_name: String,
    pub quote_number: String,
    pub quote_date: NaiveDate,
    pub labor_rate: Decimal,
    pub contingency_percent: Decimal,
}

impl QuoteRequest {
    /// Request stamped with the current date and a `QYYYYMMDD-HHMM` number,
    /// carrying the built-in commercial defaults. Callers needing
    /// reproducible output construct the fields directly.
    pub fn new(project_name: impl Into<String>) -> Self {
        Self::from_config(project_name, &EstimatorConfig::default())
    }

    /// Like [`QuoteRequest::new`], but the labor rate and contingency come
    /// from the deployment's configuration instead of the built-in defaults.
    pub fn from_config(project_name: impl Into<String>, config: &EstimatorConfig) -> Self {
        let now = Utc::now();
        Self {
            project_name: project_name.into(),
            quote_number: now.format("Q%Y%m%d-%H%M").to_string(),
            quote_date: now.date_naive(),
            labor_rate: config.labor.default_labor_rate,
            contingency_percent: config.default_contingency_percent,
        }
    }

    pub fn with_labor_rate(mut self, labor_rate: Decimal) -> Self {
        self.labor_rate = labor_rate;
        self
    }

    pub fn with_contingency_percent(mut self, percent: Decimal) -> Self {
        self.contingency_percent = percent;
        self
    }
}

/// Folds priced lines and labor into the final quote. Either the whole quote
/// is produced or the run fails; there is no partial output.
pub fn assemble_quote(
    request: &QuoteRequest,
    takeoff: &TakeoffResult,
    specs: &[InsulationSpec],
) -> Result<ProjectQuote, EstimateError> {
    if request.contingency_percent < Decimal::ZERO {
        return Err(EstimateError::invalid(format!(
            "contingency percent must be >= 0, got {}",
            request.contingency_percent
        )));
    }

    let materials_total = takeoff.materials_total();
    let subtotal = materials_total + takeoff.labor.cost;
    let contingency_amount =
        (subtotal * request.contingency_percent / Decimal::from(100)).round_dp(2);
    let total = subtotal + contingency_amount;

    Ok(ProjectQuote {
        project_name: request.project_name.clone(),
        quote_number: request.quote_number.clone(),
        quote_date: request.quote_date,
        materials: takeoff.materials.clone(),
        materials_total,
        labor_hours: takeoff.labor.hours,
        labor_rate: takeoff.labor.rate,
        labor_cost: takeoff.labor.cost,
        subtotal,
        contingency_percent: request.contingency_percent,
        contingency_amount,
        total,
        notes: quote_notes(specs),
    })
}

/// Commercial notes derived from the admitted specs, plus the standard
/// boilerplate every quote carries.
fn quote_notes(specs: &[InsulationSpec]) -> Vec<String> {
    let mut notes = Vec::new();

    if specs.iter().any(|spec| spec.location == Location::Outdoor) {
        notes.push("Weather protection jacketing included for outdoor applications".to_owned());
    }
    if specs.iter().any(InsulationSpec::wants_mastic) {
        notes.push("Vapor seal mastic coating per specifications".to_owned());
    }

    notes.extend(
        [
            "Pricing valid for 30 days",
            "Subject to final site verification",
            "Assumes clear access to work areas",
            "All work per project specifications and applicable codes",
        ]
        .map(str::to_owned),
    );

    notes
}
