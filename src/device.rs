//! Settings of the recording devices attached to every population.

use serde::{Deserialize, Serialize};

use crate::error::ParamError;

/// Multimeter sampling an analog state variable of the neurons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MultimeterParams {
    pub to_memory: bool,
    pub to_file: bool,
    pub withtime: bool,
    /// Sampling interval (ms).
    pub interval: f64,
    /// State variables to record.
    pub record_from: Vec<String>,
    pub withgid: bool,
}

impl Default for MultimeterParams {
    fn default() -> Self {
        MultimeterParams {
            to_memory: true,
            to_file: false,
            withtime: true,
            interval: 0.1,
            record_from: vec!["V_m".to_string()],
            withgid: true,
        }
    }
}

impl MultimeterParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        if !(self.interval.is_finite() && self.interval > 0.0) {
            return Err(ParamError::InvalidParameter(format!(
                "multimeter interval must be positive, got {}",
                self.interval
            )));
        }
        if self.record_from.is_empty() {
            return Err(ParamError::InvalidParameter(
                "multimeter records no variable".to_string(),
            ));
        }
        Ok(())
    }
}

/// Spike detector collecting the spike events of a population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpikeDetectorParams {
    pub label: String,
    pub withtime: bool,
    pub withgid: bool,
    pub to_file: bool,
    pub to_memory: bool,
    /// Write times in scientific notation.
    pub scientific: bool,
}

impl Default for SpikeDetectorParams {
    fn default() -> Self {
        SpikeDetectorParams {
            label: "spikes".to_string(),
            withtime: true,
            withgid: true,
            to_file: false,
            to_memory: true,
            scientific: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(value: serde_json::Value) -> Vec<String> {
        let mut keys: Vec<String> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    #[test]
    fn test_multimeter_fields() {
        let multimeter = MultimeterParams::default();
        assert_eq!(
            serde_json::to_value(&multimeter).unwrap(),
            serde_json::json!({
                "to_memory": true,
                "to_file": false,
                "withtime": true,
                "interval": 0.1,
                "record_from": ["V_m"],
                "withgid": true
            })
        );
        assert!(multimeter.validate().is_ok());
    }

    #[test]
    fn test_spike_detector_fields() {
        let detector = SpikeDetectorParams::default();
        assert_eq!(
            keys(serde_json::to_value(&detector).unwrap()),
            vec!["label", "scientific", "to_file", "to_memory", "withgid", "withtime"]
        );
        assert_eq!(detector.label, "spikes");
        assert!(detector.scientific);
        assert!(!detector.to_file);
    }

    #[test]
    fn test_multimeter_validate() {
        let multimeter = MultimeterParams {
            interval: 0.0,
            ..MultimeterParams::default()
        };
        assert!(multimeter.validate().is_err());

        let multimeter = MultimeterParams {
            record_from: vec![],
            ..MultimeterParams::default()
        };
        assert!(multimeter.validate().is_err());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result: Result<SpikeDetectorParams, _> = serde_json::from_str(
            r#"{"label": "spikes", "withtime": true, "withgid": true, "to_file": false,
                "to_memory": true, "scientific": true, "precise_times": true}"#,
        );
        assert!(result.is_err());
    }
}
