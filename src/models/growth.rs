use serde::{Deserialize, Serialize};

use super::ValidationError;
use crate::utils::time::Nanos;

/// A child growth measurement. Append-only; records are keyed by a
/// client-generated identifier and charted in timestamp order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthMeasurement {
    #[serde(rename = "measurementId")]
    pub measurement_id: String,
    pub timestamp: Nanos,
    /// Weight in kilograms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Height in centimeters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Head circumference in centimeters.
    #[serde(
        rename = "headCircumference",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub head_circumference: Option<f64>,
}

impl GrowthMeasurement {
    /// Whether at least one of the three readings is present.
    pub fn has_reading(&self) -> bool {
        self.weight.is_some() || self.height.is_some() || self.head_circumference.is_some()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.measurement_id.trim().is_empty() {
            return Err(ValidationError::MissingField("measurementId"));
        }
        if !self.has_reading() {
            return Err(ValidationError::MissingField("reading"));
        }
        Ok(())
    }
}

/// Sort measurements into charting order (oldest first).
pub fn chart_order(measurements: &mut [GrowthMeasurement]) {
    measurements.sort_by_key(|m| m.timestamp);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurement(id: &str, ts: i128, weight: Option<f64>) -> GrowthMeasurement {
        GrowthMeasurement {
            measurement_id: id.to_string(),
            timestamp: Nanos(ts),
            weight,
            height: None,
            head_circumference: None,
        }
    }

    #[test]
    fn test_validate_requires_a_reading() {
        assert!(measurement("m_1", 0, Some(3.4)).validate().is_ok());
        assert!(measurement("m_2", 0, None).validate().is_err());
        assert!(measurement("", 0, Some(3.4)).validate().is_err());
    }

    #[test]
    fn test_chart_order() {
        let mut all = vec![
            measurement("m_b", 20, Some(4.1)),
            measurement("m_a", 10, Some(3.4)),
            measurement("m_c", 30, Some(4.9)),
        ];
        chart_order(&mut all);
        let ids: Vec<&str> = all.iter().map(|m| m.measurement_id.as_str()).collect();
        assert_eq!(ids, ["m_a", "m_b", "m_c"]);
    }
}
