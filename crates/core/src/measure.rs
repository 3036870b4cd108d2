use rust_decimal::Decimal;

use crate::domain::measurement::MeasurementItem;
use crate::errors::EstimateError;

/// Capability seam for drawing-based measurement extraction. Implementations
/// (computer-vision scanners, PDF scale readers) live outside the core; the
/// pricing path only ever consumes the resulting records, so an absent or
/// degraded measurer cannot affect pricing correctness.
pub trait DrawingMeasurer: Send + Sync {
    fn measure(
        &self,
        drawing: &[u8],
        scale: Option<Decimal>,
    ) -> Result<Vec<MeasurementItem>, EstimateError>;
}

/// Measurer backed by records entered by hand, the fallback when no drawing
/// pipeline is available.
#[derive(Clone, Debug, Default)]
pub struct ManualMeasurements {
    items: Vec<MeasurementItem>,
}

impl ManualMeasurements {
    pub fn new(items: Vec<MeasurementItem>) -> Result<Self, EstimateError> {
        for item in &items {
            item.validate()?;
        }
        Ok(Self { items })
    }
}

impl DrawingMeasurer for ManualMeasurements {
    fn measure(
        &self,
        _drawing: &[u8],
        _scale: Option<Decimal>,
    ) -> Result<Vec<MeasurementItem>, EstimateError> {
        Ok(self.items.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rust_decimal::Decimal;

    use super::{DrawingMeasurer, ManualMeasurements};
    use crate::domain::measurement::{MeasuredSystem, MeasurementItem};

    fn run(length: Decimal) -> MeasurementItem {
        MeasurementItem {
            item_id: "MANUAL-0".to_owned(),
            system_type: MeasuredSystem::Pipe,
            size: "2\"".to_owned(),
            length,
            location: "Level 1".to_owned(),
            fittings: BTreeMap::new(),
            notes: String::new(),
        }
    }

    #[test]
    fn manual_measurer_returns_validated_records() {
        let measurer = ManualMeasurements::new(vec![run(Decimal::from(85))]).expect("valid");
        let items = measurer.measure(&[], None).expect("measure");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item_id, "MANUAL-0");
    }

    #[test]
    fn invalid_manual_entries_are_rejected_up_front() {
        assert!(ManualMeasurements::new(vec![run(Decimal::ZERO)]).is_err());
    }
}
