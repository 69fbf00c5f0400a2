//! Poisson spike generators driving the receptor populations.
//!
//! Each driven population has an entry keyed by its name in a JSON map. Populations
//! without an entry get the default generator, which is then added to the map so that
//! it can be persisted and tuned by hand afterwards.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ParamError;

/// Default start time of a generator (ms).
pub const DEFAULT_START_TIME: f64 = 400.0;
/// Default stop time of a generator (ms).
pub const DEFAULT_STOP_TIME: f64 = 600.0;
/// Default firing rate of a generator (Hz).
pub const DEFAULT_RATE: f64 = 250.0;
/// Default fraction of the population connected to the generator.
pub const DEFAULT_COEF: f64 = 1.0;

/// Settings of the generator attached to one population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    pub name: String,
    pub start_time: f64,
    pub stop_time: f64,
    pub rate: f64,
    /// Fraction of the population receiving the generator spikes.
    pub coef: f64,
}

impl GeneratorConfig {
    /// The default generator for the named population.
    pub fn with_defaults(name: impl Into<String>) -> Self {
        GeneratorConfig {
            name: name.into(),
            start_time: DEFAULT_START_TIME,
            stop_time: DEFAULT_STOP_TIME,
            rate: DEFAULT_RATE,
            coef: DEFAULT_COEF,
        }
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        if !(self.start_time >= 0.0 && self.start_time < self.stop_time) {
            return Err(ParamError::InvalidParameter(format!(
                "generator {}: start time {} must be non-negative and precede stop time {}",
                self.name, self.start_time, self.stop_time
            )));
        }
        if !(self.rate.is_finite() && self.rate >= 0.0) {
            return Err(ParamError::InvalidParameter(format!(
                "generator {}: rate must be non-negative, got {}",
                self.name, self.rate
            )));
        }
        if !(self.coef > 0.0 && self.coef <= 1.0) {
            return Err(ParamError::InvalidParameter(format!(
                "generator {}: coef must lie in (0, 1], got {}",
                self.name, self.coef
            )));
        }
        Ok(())
    }
}

/// Generator settings keyed by population name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneratorConfigs {
    configs: BTreeMap<String, GeneratorConfig>,
}

impl GeneratorConfigs {
    pub fn new() -> Self {
        GeneratorConfigs::default()
    }

    pub fn from_json_str(s: &str) -> Result<Self, ParamError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ParamError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load the generator settings from a file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ParamError> {
        let file = File::open(&path).map_err(|e| ParamError::IOError(e.to_string()))?;
        let configs = Self::from_reader(BufReader::new(file))?;
        log::debug!(
            "Loaded {} generator configs from {}",
            configs.len(),
            path.as_ref().display()
        );
        Ok(configs)
    }

    /// Save the generator settings to a file, replacing its content.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ParamError> {
        let file = File::create(path).map_err(|e| ParamError::IOError(e.to_string()))?;
        self.write_json(file)
    }

    /// Save the generator settings only if the file does not exist yet.
    /// Returns whether the file was written.
    pub fn write_if_absent<P: AsRef<Path>>(&self, path: P) -> Result<bool, ParamError> {
        let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                log::debug!(
                    "{} already exists, keeping its generator configs",
                    path.as_ref().display()
                );
                return Ok(false);
            }
            Err(e) => return Err(ParamError::IOError(e.to_string())),
        };
        self.write_json(file)?;
        Ok(true)
    }

    fn write_json(&self, file: File) -> Result<(), ParamError> {
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush().map_err(|e| ParamError::IOError(e.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&GeneratorConfig> {
        self.configs.get(name)
    }

    pub fn insert(&mut self, config: GeneratorConfig) -> Option<GeneratorConfig> {
        self.configs.insert(config.name.clone(), config)
    }

    /// Returns the settings of the named population, adding the default generator if needed.
    pub fn get_or_insert_default(&mut self, name: &str) -> &GeneratorConfig {
        self.configs.entry(name.to_string()).or_insert_with(|| {
            log::debug!("Config for generator for {} not found; add default generator", name);
            GeneratorConfig::with_defaults(name)
        })
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// An iterator over the settings, sorted by population name.
    pub fn iter(&self) -> impl Iterator<Item = &GeneratorConfig> + '_ {
        self.configs.values()
    }

    /// Check every entry; the map key must match the entry name.
    pub fn validate(&self) -> Result<(), ParamError> {
        for (key, config) in self.configs.iter() {
            if key != &config.name {
                return Err(ParamError::InvalidParameter(format!(
                    "generator stored under {} is named {}",
                    key, config.name
                )));
            }
            config.validate().inspect_err(|e| log::warn!("{}", e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIGS: &str = r#"{
        "snc_da": {"name": "snc_da", "startTime": 100.0, "stopTime": 300.0, "rate": 200.0, "coef": 0.5}
    }"#;

    #[test]
    fn test_parse() {
        let configs = GeneratorConfigs::from_json_str(CONFIGS).unwrap();
        assert_eq!(configs.len(), 1);
        let config = configs.get("snc_da").unwrap();
        assert_eq!(config.start_time, 100.0);
        assert_eq!(config.stop_time, 300.0);
        assert_eq!(config.rate, 200.0);
        assert_eq!(config.coef, 0.5);
        assert!(configs.validate().is_ok());
    }

    #[test]
    fn test_get_or_insert_default() {
        let mut configs = GeneratorConfigs::from_json_str(CONFIGS).unwrap();
        assert_eq!(configs.get_or_insert_default("snc_da").rate, 200.0);
        assert_eq!(configs.len(), 1);

        let config = configs.get_or_insert_default("vta_da").clone();
        assert_eq!(config, GeneratorConfig::with_defaults("vta_da"));
        assert_eq!(configs.len(), 2);
        assert_eq!(configs.get("vta_da"), Some(&config));
    }

    #[test]
    fn test_write_if_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("generatorConfig.json");

        let mut configs = GeneratorConfigs::new();
        configs.get_or_insert_default("striatum_d1");
        assert!(configs.write_if_absent(&path).unwrap());
        assert_eq!(GeneratorConfigs::load_from(&path).unwrap(), configs);

        // an existing file is never overwritten
        configs.get_or_insert_default("striatum_d2");
        assert!(!configs.write_if_absent(&path).unwrap());
        assert_eq!(GeneratorConfigs::load_from(&path).unwrap().len(), 1);

        configs.save_to(&path).unwrap();
        assert_eq!(GeneratorConfigs::load_from(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_serialized_keys() {
        let json = serde_json::to_value(GeneratorConfig::with_defaults("gpe")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "gpe", "startTime": 400.0, "stopTime": 600.0, "rate": 250.0, "coef": 1.0})
        );
    }

    #[test]
    fn test_validate() {
        let mut config = GeneratorConfig::with_defaults("gpe");
        config.stop_time = config.start_time;
        assert!(config.validate().is_err());

        let mut config = GeneratorConfig::with_defaults("gpe");
        config.coef = 1.5;
        assert!(config.validate().is_err());

        let mut configs = GeneratorConfigs::new();
        configs.insert(GeneratorConfig::with_defaults("gpe"));
        assert!(configs.validate().is_ok());

        let configs = GeneratorConfigs::from_json_str(
            r#"{"gpe": {"name": "gpi", "startTime": 0.0, "stopTime": 1.0, "rate": 1.0, "coef": 1.0}}"#,
        )
        .unwrap();
        assert!(configs.validate().is_err());
    }
}
