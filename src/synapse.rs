//! Synapse parameter records and their composition.
//!
//! A record only carries the fields it sets; absent fields are left to the simulator
//! defaults and are omitted on serialization. Class-specific records are obtained by
//! merging an override record on top of a shared base record, see [`SynapseParams::merge`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::distribution::{DistributionSpec, ParamValue};
use crate::error::ParamError;

/// Name of the spike-timing dependent plasticity model.
pub const STDP_MODEL: &str = "stdp_synapse";
/// Name of the non-plastic model used for generator links.
pub const STATIC_MODEL: &str = "static_synapse";

/// Parameters of a synapse model, as passed to the simulator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SynapseParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Transmission delay (ms).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<ParamValue>,
    /// Time constant of the STDP window (ms).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tau_m: Option<ParamValue>,
    /// Asymmetry between depression and potentiation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<ParamValue>,
    /// Learning rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lambda: Option<f64>,
    /// Upper weight bound.
    #[serde(default, rename = "Wmax", skip_serializing_if = "Option::is_none")]
    pub w_max: Option<f64>,
    /// Lower weight bound.
    #[serde(default, rename = "Wmin", skip_serializing_if = "Option::is_none")]
    pub w_min: Option<f64>,
}

impl SynapseParams {
    /// An empty record.
    pub fn new() -> Self {
        SynapseParams::default()
    }

    /// Plasticity constants shared by the glutamatergic and GABAergic synapses.
    pub fn stdp_base() -> Self {
        SynapseParams::new()
            .with_model(STDP_MODEL)
            .with_tau_m(DistributionSpec::uniform(15.0, 25.0))
            .with_alpha(DistributionSpec::normal_clipped_low(5.0, 1.0, 0.5))
            .with_delay(DistributionSpec::uniform(0.8, 2.5))
            .with_lambda(0.5)
    }

    /// Constants shared by the dopaminergic synapses.
    pub fn dopa_base() -> Self {
        SynapseParams::new().with_delay(1.0)
    }

    /// Non-plastic link used to drive populations from spike generators.
    pub fn static_link(weight: f64, delay: f64) -> Self {
        SynapseParams::new()
            .with_model(STATIC_MODEL)
            .with_weight(weight)
            .with_delay(delay)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_delay(mut self, delay: impl Into<ParamValue>) -> Self {
        self.delay = Some(delay.into());
        self
    }

    pub fn with_tau_m(mut self, tau_m: impl Into<ParamValue>) -> Self {
        self.tau_m = Some(tau_m.into());
        self
    }

    pub fn with_alpha(mut self, alpha: impl Into<ParamValue>) -> Self {
        self.alpha = Some(alpha.into());
        self
    }

    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = Some(lambda);
        self
    }

    pub fn with_w_max(mut self, w_max: f64) -> Self {
        self.w_max = Some(w_max);
        self
    }

    pub fn with_w_min(mut self, w_min: f64) -> Self {
        self.w_min = Some(w_min);
        self
    }

    /// Returns a new record holding every field of `self` and of `overrides`.
    /// Fields set in `overrides` take precedence; neither input is modified.
    pub fn merge(&self, overrides: &SynapseParams) -> SynapseParams {
        SynapseParams {
            model: overrides.model.clone().or_else(|| self.model.clone()),
            weight: overrides.weight.or(self.weight),
            delay: overrides.delay.clone().or_else(|| self.delay.clone()),
            tau_m: overrides.tau_m.clone().or_else(|| self.tau_m.clone()),
            alpha: overrides.alpha.clone().or_else(|| self.alpha.clone()),
            lambda: overrides.lambda.or(self.lambda),
            w_max: overrides.w_max.or(self.w_max),
            w_min: overrides.w_min.or(self.w_min),
        }
    }

    /// Names (as known by the simulator) of the fields set in the record.
    pub fn field_names(&self) -> Vec<&'static str> {
        [
            ("model", self.model.is_some()),
            ("weight", self.weight.is_some()),
            ("delay", self.delay.is_some()),
            ("tau_m", self.tau_m.is_some()),
            ("alpha", self.alpha.is_some()),
            ("lambda", self.lambda.is_some()),
            ("Wmax", self.w_max.is_some()),
            ("Wmin", self.w_min.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }

    /// Check the internal consistency of the record.
    pub fn validate(&self) -> Result<(), ParamError> {
        for (name, value) in [
            ("delay", &self.delay),
            ("tau_m", &self.tau_m),
            ("alpha", &self.alpha),
        ] {
            if let Some(value) = value {
                value.validate().map_err(|e| {
                    ParamError::InvalidParameter(format!("{}: {}", name, e))
                })?;
            }
        }

        if let Some(delay) = &self.delay {
            if delay.lower_bound() <= 0.0 {
                return Err(ParamError::InvalidParameter(format!(
                    "delay must be positive, got a lower bound of {}",
                    delay.lower_bound()
                )));
            }
        }

        if let Some(tau_m) = &self.tau_m {
            if tau_m.lower_bound() <= 0.0 {
                return Err(ParamError::InvalidParameter(
                    "tau_m must be positive".to_string(),
                ));
            }
        }

        if let (Some(w_min), Some(w_max)) = (self.w_min, self.w_max) {
            if w_min > w_max {
                return Err(ParamError::InvalidParameter(format!(
                    "Wmin ({}) exceeds Wmax ({})",
                    w_min, w_max
                )));
            }
        }

        // the initial weight may start outside of the bounds, but never on the other side of zero
        if let (Some(weight), Some(w_max)) = (self.weight, self.w_max) {
            if weight != 0.0 && weight.signum() != w_max.signum() {
                return Err(ParamError::InvalidParameter(format!(
                    "weight {} and Wmax {} have opposite signs",
                    weight, w_max
                )));
            }
        }

        Ok(())
    }

    /// Returns a copy of the record where every distributed value is replaced by a draw.
    pub fn realize<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<SynapseParams, ParamError> {
        let mut draw = |value: &Option<ParamValue>| -> Result<Option<ParamValue>, ParamError> {
            value
                .as_ref()
                .map(|v| v.realize(&mut *rng).map(ParamValue::Fixed))
                .transpose()
        };

        Ok(SynapseParams {
            delay: draw(&self.delay)?,
            tau_m: draw(&self.tau_m)?,
            alpha: draw(&self.alpha)?,
            ..self.clone()
        })
    }
}
