pub mod alternatives;
pub mod assemble;
pub mod config;
pub mod domain;
pub mod errors;
pub mod estimator;
pub mod measure;
pub mod pricebook;
pub mod scope;
pub mod takeoff;

pub use alternatives::{alternative_options, AlternativeOption};
pub use assemble::{assemble_quote, QuoteRequest};
pub use config::{ConfigError, EstimatorConfig, LaborSettings, LoadOptions};
pub use domain::material::{MaterialCategory, MaterialItem, Unit};
pub use domain::measurement::{FittingKind, MeasuredSystem, MeasurementItem};
pub use domain::quote::{OrderListEntry, ProjectQuote};
pub use domain::spec::{Facing, InsulationMaterial, InsulationSpec, Location, SystemType};
pub use errors::{EstimateError, PriceBookError};
pub use estimator::{DeterministicEstimator, EstimateOutcome, EstimationRuntime};
pub use measure::{DrawingMeasurer, ManualMeasurements};
pub use pricebook::{PriceBook, PriceKey};
pub use scope::{ExcludedRecord, ScopeConfig, ScopeFilter, ScopeReport, ScopeWarning, Scopeable};
pub use takeoff::{
    geometry::ProfileSize, labor::LaborSummary, DeterministicTakeoffEngine, TakeoffEngine,
    TakeoffInput, TakeoffResult,
};
