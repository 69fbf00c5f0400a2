//! Distribution specifications used to draw per-connection parameter values.
//!
//! The simulator receives these as nested records tagged with a `distribution` name,
//! e.g. `{"distribution": "uniform", "low": 15.0, "high": 25.0}`, and samples one value
//! per created synapse. The same sampling is available here so that a table can be
//! realized outside the simulator.

use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};
use serde::{Deserialize, Serialize};

use crate::error::ParamError;

/// Maximum number of redraws of a clipped normal before giving up.
pub const MAX_REDRAWS: usize = 10_000;

/// A probability distribution with its arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "distribution", rename_all = "snake_case")]
pub enum DistributionSpec {
    /// Uniform distribution on `[low, high)`.
    Uniform { low: f64, high: f64 },
    /// Normal distribution with mean `mu` and standard deviation `sigma`.
    Normal { mu: f64, sigma: f64 },
    /// Normal distribution redrawn until the value falls within the (optional) bounds.
    NormalClipped {
        mu: f64,
        sigma: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        low: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        high: Option<f64>,
    },
}

impl DistributionSpec {
    pub fn uniform(low: f64, high: f64) -> Self {
        DistributionSpec::Uniform { low, high }
    }

    pub fn normal(mu: f64, sigma: f64) -> Self {
        DistributionSpec::Normal { mu, sigma }
    }

    /// A normal distribution clipped from below only.
    pub fn normal_clipped_low(mu: f64, sigma: f64, low: f64) -> Self {
        DistributionSpec::NormalClipped {
            mu,
            sigma,
            low: Some(low),
            high: None,
        }
    }

    /// The name under which the simulator knows the distribution.
    pub fn name(&self) -> &'static str {
        match self {
            DistributionSpec::Uniform { .. } => "uniform",
            DistributionSpec::Normal { .. } => "normal",
            DistributionSpec::NormalClipped { .. } => "normal_clipped",
        }
    }

    /// Check that the arguments describe a proper distribution.
    pub fn validate(&self) -> Result<(), ParamError> {
        match *self {
            DistributionSpec::Uniform { low, high } => {
                if !(low.is_finite() && high.is_finite()) {
                    return Err(ParamError::InvalidDistribution(
                        "uniform bounds must be finite".to_string(),
                    ));
                }
                if low >= high {
                    return Err(ParamError::InvalidDistribution(format!(
                        "uniform requires low < high, got low={} and high={}",
                        low, high
                    )));
                }
                if !(high - low).is_finite() {
                    return Err(ParamError::InvalidDistribution(format!(
                        "uniform range [{}, {}) is too wide to sample",
                        low, high
                    )));
                }
                Ok(())
            }
            DistributionSpec::Normal { mu, sigma } => check_normal(mu, sigma),
            DistributionSpec::NormalClipped {
                mu,
                sigma,
                low,
                high,
            } => {
                check_normal(mu, sigma)?;
                if let (Some(low), Some(high)) = (low, high) {
                    if low >= high {
                        return Err(ParamError::InvalidDistribution(format!(
                            "normal_clipped requires low < high, got low={} and high={}",
                            low, high
                        )));
                    }
                }
                Ok(())
            }
        }
    }

    /// Draw a single value from the distribution.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, ParamError> {
        self.validate()?;
        match *self {
            DistributionSpec::Uniform { low, high } => Ok(Uniform::new(low, high).sample(rng)),
            DistributionSpec::Normal { mu, sigma } => Ok(normal(mu, sigma)?.sample(rng)),
            DistributionSpec::NormalClipped {
                mu,
                sigma,
                low,
                high,
            } => {
                let dist = normal(mu, sigma)?;
                let low = low.unwrap_or(f64::NEG_INFINITY);
                let high = high.unwrap_or(f64::INFINITY);
                for _ in 0..MAX_REDRAWS {
                    let x = dist.sample(rng);
                    if x >= low && x <= high {
                        return Ok(x);
                    }
                }
                Err(ParamError::InvalidDistribution(format!(
                    "normal_clipped(mu={}, sigma={}) produced no value in [{}, {}] after {} draws",
                    mu, sigma, low, high, MAX_REDRAWS
                )))
            }
        }
    }
}

fn check_normal(mu: f64, sigma: f64) -> Result<(), ParamError> {
    if !mu.is_finite() {
        return Err(ParamError::InvalidDistribution(
            "normal mean must be finite".to_string(),
        ));
    }
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(ParamError::InvalidDistribution(format!(
            "normal standard deviation must be positive, got {}",
            sigma
        )));
    }
    Ok(())
}

fn normal(mu: f64, sigma: f64) -> Result<Normal<f64>, ParamError> {
    Normal::new(mu, sigma).map_err(|e| ParamError::InvalidDistribution(e.to_string()))
}

/// A parameter which is either a fixed scalar or drawn from a distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Fixed(f64),
    Distributed(DistributionSpec),
}

impl ParamValue {
    /// Returns the fixed value, if any.
    pub fn as_fixed(&self) -> Option<f64> {
        match self {
            ParamValue::Fixed(x) => Some(*x),
            ParamValue::Distributed(_) => None,
        }
    }

    /// Returns the distribution, if any.
    pub fn as_distribution(&self) -> Option<&DistributionSpec> {
        match self {
            ParamValue::Fixed(_) => None,
            ParamValue::Distributed(dist) => Some(dist),
        }
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        match self {
            ParamValue::Fixed(x) if !x.is_finite() => Err(ParamError::InvalidParameter(format!(
                "fixed value must be finite, got {}",
                x
            ))),
            ParamValue::Fixed(_) => Ok(()),
            ParamValue::Distributed(dist) => dist.validate(),
        }
    }

    /// Returns a concrete value, sampling the distribution if needed.
    pub fn realize<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, ParamError> {
        match self {
            ParamValue::Fixed(x) => Ok(*x),
            ParamValue::Distributed(dist) => dist.sample(rng),
        }
    }

    /// Smallest value the parameter can take.
    pub fn lower_bound(&self) -> f64 {
        match *self {
            ParamValue::Fixed(x) => x,
            ParamValue::Distributed(DistributionSpec::Uniform { low, .. }) => low,
            ParamValue::Distributed(DistributionSpec::Normal { .. }) => f64::NEG_INFINITY,
            ParamValue::Distributed(DistributionSpec::NormalClipped { low, .. }) => {
                low.unwrap_or(f64::NEG_INFINITY)
            }
        }
    }
}

impl From<f64> for ParamValue {
    fn from(x: f64) -> Self {
        ParamValue::Fixed(x)
    }
}

impl From<DistributionSpec> for ParamValue {
    fn from(dist: DistributionSpec) -> Self {
        ParamValue::Distributed(dist)
    }
}
