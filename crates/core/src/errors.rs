use std::path::PathBuf;

use thiserror::Error;

/// Fatal estimation failures. Any of these aborts the run for the whole
/// estimate; the engine never emits a partially priced quote.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EstimateError {
    #[error("invalid specification: {detail}")]
    InvalidSpecification { detail: String },
    #[error("could not parse size `{size}` for measurement `{item_id}`")]
    MeasurementParse { item_id: String, size: String },
    #[error("price book has no entry for key `{key}`")]
    PricingKeyNotFound { key: String },
}

impl EstimateError {
    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::InvalidSpecification { detail: detail.into() }
    }
}

#[derive(Debug, Error)]
pub enum PriceBookError {
    #[error("could not read price book `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse price book: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid price key `{0}` (expected lowercase a-z0-9 with `_` and `.`)")]
    InvalidKey(String),
    #[error("no price given for key `{0}`")]
    MissingPrice(String),
    #[error("negative price {price} for key `{key}`")]
    NegativePrice { key: String, price: String },
}

#[cfg(test)]
mod tests {
    use super::EstimateError;

    #[test]
    fn missing_key_error_names_the_exact_key() {
        let error = EstimateError::PricingKeyNotFound { key: "fiberglass_1.5".to_owned() };
        assert_eq!(error.to_string(), "price book has no entry for key `fiberglass_1.5`");
    }

    #[test]
    fn parse_error_carries_item_id_and_size_verbatim() {
        let error = EstimateError::MeasurementParse {
            item_id: "DUCT-007".to_owned(),
            size: "??".to_owned(),
        };
        assert!(error.to_string().contains("DUCT-007"));
        assert!(error.to_string().contains("`??`"));
    }
}
