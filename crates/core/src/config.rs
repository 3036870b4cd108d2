use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::measurement::FittingKind;

/// Tunable knobs of the takeoff engine. Every default reproduces the
/// published estimating rules; a deployment can override any of them from a
/// TOML file.
#[derive(Clone, Debug, PartialEq)]
pub struct EstimatorConfig {
    /// Multiplier applied to every unit price (1.0 = supplier cost).
    pub markup: Decimal,
    pub labor: LaborSettings,
    /// Extra linear feet credited per fitting, by kind. Kinds not listed
    /// consume no allowance.
    pub fitting_allowances: BTreeMap<FittingKind, Decimal>,
    pub default_contingency_percent: Decimal,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LaborSettings {
    /// Hours per linear foot of duct insulation.
    pub duct_lf: Decimal,
    /// Hours per linear foot of pipe insulation.
    pub pipe_lf: Decimal,
    /// Hours per square foot of jacketing.
    pub jacketing_sf: Decimal,
    /// Hours per square foot of mastic.
    pub mastic_sf: Decimal,
    /// Setup, cleanup, and supervision overhead applied to accrued hours.
    pub overhead_factor: Decimal,
    pub default_labor_rate: Decimal,
}

impl Default for LaborSettings {
    fn default() -> Self {
        Self {
            duct_lf: Decimal::new(45, 2),
            pipe_lf: Decimal::new(35, 2),
            jacketing_sf: Decimal::new(25, 2),
            mastic_sf: Decimal::new(15, 2),
            overhead_factor: Decimal::new(120, 2),
            default_labor_rate: Decimal::from(65),
        }
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            markup: Decimal::ONE,
            labor: LaborSettings::default(),
            fitting_allowances: BTreeMap::from([
                (FittingKind::Elbow, Decimal::new(5, 1)),
                (FittingKind::Tee, Decimal::ONE),
            ]),
            default_contingency_percent: Decimal::from(10),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigPatch {
    markup: Option<Decimal>,
    labor: Option<LaborPatch>,
    fitting_allowances: Option<BTreeMap<FittingKind, Decimal>>,
    default_contingency_percent: Option<Decimal>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LaborPatch {
    duct_lf: Option<Decimal>,
    pipe_lf: Option<Decimal>,
    jacketing_sf: Option<Decimal>,
    mastic_sf: Option<Decimal>,
    overhead_factor: Option<Decimal>,
    default_labor_rate: Option<Decimal>,
}

impl EstimatorConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        match options.config_path {
            Some(path) if path.exists() => {
                let patch = read_patch(&path)?;
                config.apply_patch(patch);
            }
            Some(path) if options.require_file => {
                return Err(ConfigError::MissingConfigFile(path));
            }
            _ => {}
        }

        config.validate()?;
        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(markup) = patch.markup {
            self.markup = markup;
        }
        if let Some(labor) = patch.labor {
            if let Some(duct_lf) = labor.duct_lf {
                self.labor.duct_lf = duct_lf;
            }
            if let Some(pipe_lf) = labor.pipe_lf {
                self.labor.pipe_lf = pipe_lf;
            }
            if let Some(jacketing_sf) = labor.jacketing_sf {
                self.labor.jacketing_sf = jacketing_sf;
            }
            if let Some(mastic_sf) = labor.mastic_sf {
                self.labor.mastic_sf = mastic_sf;
            }
            if let Some(overhead_factor) = labor.overhead_factor {
                self.labor.overhead_factor = overhead_factor;
            }
            if let Some(default_labor_rate) = labor.default_labor_rate {
                self.labor.default_labor_rate = default_labor_rate;
            }
        }
        if let Some(fitting_allowances) = patch.fitting_allowances {
            self.fitting_allowances = fitting_allowances;
        }
        if let Some(pct) = patch.default_contingency_percent {
            self.default_contingency_percent = pct;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.markup <= Decimal::ZERO {
            return Err(ConfigError::Validation("markup must be > 0".to_owned()));
        }
        let rates = [
            ("labor.duct_lf", self.labor.duct_lf),
            ("labor.pipe_lf", self.labor.pipe_lf),
            ("labor.jacketing_sf", self.labor.jacketing_sf),
            ("labor.mastic_sf", self.labor.mastic_sf),
            ("labor.default_labor_rate", self.labor.default_labor_rate),
        ];
        for (name, rate) in rates {
            if rate < Decimal::ZERO {
                return Err(ConfigError::Validation(format!("{name} must be >= 0")));
            }
        }
        if self.labor.overhead_factor < Decimal::ONE {
            return Err(ConfigError::Validation("labor.overhead_factor must be >= 1".to_owned()));
        }
        if self.fitting_allowances.values().any(|allowance| *allowance < Decimal::ZERO) {
            return Err(ConfigError::Validation("fitting allowances must be >= 0".to_owned()));
        }
        if self.default_contingency_percent < Decimal::ZERO {
            return Err(ConfigError::Validation(
                "default_contingency_percent must be >= 0".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn fitting_allowance(&self, kind: FittingKind) -> Decimal {
        self.fitting_allowances.get(&kind).copied().unwrap_or(Decimal::ZERO)
    }
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
    toml::from_str(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}
