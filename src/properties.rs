//! Model-wide constants the parameter table is built from.
//!
//! The defaults reproduce the reference model; a JSON file can override any subset of them.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ParamError;

/// Default weight of glutamatergic synapses.
pub const DEFAULT_W_GLU: f64 = 3.0;
/// Ratio between the GABAergic and the glutamatergic weight, used when the former is not given.
pub const GABA_TO_GLU_RATIO: f64 = -2.0;

/// Synaptic weights and delays shared across the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PartialProperties")]
pub struct Properties {
    /// Weight of glutamatergic synapses.
    #[serde(rename = "w_Glu")]
    pub w_glu: f64,
    /// Weight of GABAergic synapses.
    #[serde(rename = "w_GABA")]
    pub w_gaba: f64,
    /// Weight of excitatory dopaminergic synapses.
    #[serde(rename = "w_DA_ex")]
    pub w_da_ex: f64,
    /// Delay of the links from spike generators (ms).
    pub pg_delay: f64,
    /// Name of the custom excitatory dopamine synapse model.
    pub dopa_model_ex: String,
    /// Factor between the glutamatergic weight and the weight of generator links.
    pub generator_weight_factor: f64,
}

impl Default for Properties {
    fn default() -> Self {
        Properties::from(PartialProperties::default())
    }
}

/// Properties as read from a file, where every field may be left out.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialProperties {
    #[serde(rename = "w_Glu")]
    w_glu: Option<f64>,
    #[serde(rename = "w_GABA")]
    w_gaba: Option<f64>,
    #[serde(rename = "w_DA_ex")]
    w_da_ex: Option<f64>,
    pg_delay: Option<f64>,
    dopa_model_ex: Option<String>,
    generator_weight_factor: Option<f64>,
}

impl From<PartialProperties> for Properties {
    fn from(partial: PartialProperties) -> Self {
        let w_glu = partial.w_glu.unwrap_or(DEFAULT_W_GLU);
        Properties {
            w_glu,
            w_gaba: partial.w_gaba.unwrap_or(GABA_TO_GLU_RATIO * w_glu),
            w_da_ex: partial.w_da_ex.unwrap_or(13.0),
            pg_delay: partial.pg_delay.unwrap_or(10.0),
            dopa_model_ex: partial
                .dopa_model_ex
                .unwrap_or_else(|| "dopa_ex".to_string()),
            generator_weight_factor: partial.generator_weight_factor.unwrap_or(5.0),
        }
    }
}

impl Properties {
    /// Parse properties from a JSON string; missing fields keep their default.
    pub fn from_json_str(s: &str) -> Result<Self, ParamError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Parse properties from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ParamError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load properties from a file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ParamError> {
        let file = File::open(&path).map_err(|e| ParamError::IOError(e.to_string()))?;
        let properties = Self::from_reader(BufReader::new(file))?;
        log::debug!("Loaded properties from {}", path.as_ref().display());
        Ok(properties)
    }

    /// Save the properties to a file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ParamError> {
        let file = File::create(path).map_err(|e| ParamError::IOError(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush().map_err(|e| ParamError::IOError(e.to_string()))
    }

    /// Weight of the static links from spike generators.
    pub fn generator_weight(&self) -> f64 {
        self.w_glu * self.generator_weight_factor
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        for (name, w) in [
            ("w_glu", self.w_glu),
            ("w_gaba", self.w_gaba),
            ("w_da_ex", self.w_da_ex),
            ("generator_weight_factor", self.generator_weight_factor),
        ] {
            if !w.is_finite() {
                return Err(ParamError::InvalidParameter(format!(
                    "{} must be finite, got {}",
                    name, w
                )));
            }
        }
        if self.w_gaba > 0.0 {
            return Err(ParamError::InvalidParameter(format!(
                "GABAergic weight must be inhibitory, got {}",
                self.w_gaba
            )));
        }
        if !(self.pg_delay.is_finite() && self.pg_delay > 0.0) {
            return Err(ParamError::InvalidParameter(format!(
                "generator delay must be positive, got {}",
                self.pg_delay
            )));
        }
        if self.dopa_model_ex.is_empty() {
            return Err(ParamError::InvalidParameter(
                "dopamine model name is empty".to_string(),
            ));
        }
        Ok(())
    }
}
