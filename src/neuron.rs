//! Parameters of the integrate-and-fire neurons shared by every population.

use serde::{Deserialize, Serialize};

use crate::error::ParamError;

/// Electrophysiological constants of an integrate-and-fire neuron.
/// Potentials are in mV, capacitance in pF and times in ms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NeuronParams {
    /// Resting membrane potential.
    #[serde(rename = "E_L")]
    pub e_l: f64,
    /// Spike threshold.
    #[serde(rename = "V_th")]
    pub v_th: f64,
    /// Reset potential after a spike.
    #[serde(rename = "V_reset")]
    pub v_reset: f64,
    /// Membrane capacitance.
    #[serde(rename = "C_m")]
    pub c_m: f64,
    /// Absolute refractory period.
    pub t_ref: f64,
    /// Initial membrane potential.
    #[serde(rename = "V_m")]
    pub v_m: f64,
    /// Rise time of the excitatory synaptic alpha function.
    pub tau_syn_ex: f64,
    /// Rise time of the inhibitory synaptic alpha function.
    pub tau_syn_in: f64,
}

impl Default for NeuronParams {
    fn default() -> Self {
        NeuronParams {
            e_l: -70.0,
            v_th: -50.0,
            v_reset: -67.0,
            c_m: 2.0,
            t_ref: 2.0,
            v_m: -60.0,
            tau_syn_ex: 1.0,
            tau_syn_in: 1.33,
        }
    }
}

impl NeuronParams {
    /// Check the physical consistency of the constants.
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.v_reset >= self.v_th {
            return Err(ParamError::InvalidParameter(format!(
                "reset potential {} must lie below the threshold {}",
                self.v_reset, self.v_th
            )));
        }
        if self.c_m <= 0.0 {
            return Err(ParamError::InvalidParameter(
                "membrane capacitance must be positive".to_string(),
            ));
        }
        if self.t_ref < 0.0 {
            return Err(ParamError::InvalidParameter(
                "refractory period must be non-negative".to_string(),
            ));
        }
        if self.tau_syn_ex <= 0.0 || self.tau_syn_in <= 0.0 {
            return Err(ParamError::InvalidParameter(
                "synaptic time constants must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let neuron = NeuronParams::default();
        assert_eq!(neuron.e_l, -70.0);
        assert_eq!(neuron.v_th, -50.0);
        assert_eq!(neuron.v_reset, -67.0);
        assert_eq!(neuron.c_m, 2.0);
        assert_eq!(neuron.t_ref, 2.0);
        assert_eq!(neuron.v_m, -60.0);
        assert_eq!(neuron.tau_syn_ex, 1.0);
        assert_eq!(neuron.tau_syn_in, 1.33);
        assert!(neuron.validate().is_ok());
    }

    #[test]
    fn test_simulator_field_names() {
        let json = serde_json::to_value(NeuronParams::default()).unwrap();
        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["C_m", "E_L", "V_m", "V_reset", "V_th", "t_ref", "tau_syn_ex", "tau_syn_in"]
        );
    }

    #[test]
    fn test_validate_reset_above_threshold() {
        let neuron = NeuronParams {
            v_reset: -40.0,
            ..NeuronParams::default()
        };
        assert!(matches!(
            neuron.validate(),
            Err(ParamError::InvalidParameter(_))
        ));
    }
}
