//! The parameter table handed over to the simulation driver.
//!
//! # Examples
//!
//! ```
//! use neuromod_params::table::SynapseClass;
//!
//! let table = neuromod_params::table::defaults();
//!
//! let glu = table.synapse(SynapseClass::Glu);
//! assert_eq!(glu.label, "Glu");
//! assert_eq!(glu.params.w_max, Some(70.0));
//!
//! // textual identifiers are checked against the closed set of classes
//! assert!(table.lookup("GABA").is_ok());
//! assert!(table.lookup("ACh").is_err());
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::device::{MultimeterParams, SpikeDetectorParams};
use crate::distribution::DistributionSpec;
use crate::error::ParamError;
use crate::neuron::NeuronParams;
use crate::properties::Properties;
use crate::synapse::SynapseParams;

/// Upper weight bound of glutamatergic synapses.
pub const GLU_W_MAX: f64 = 70.0;
/// Upper weight bound of GABAergic synapses.
pub const GABA_W_MAX: f64 = -60.0;
/// Upper weight bound of excitatory dopaminergic synapses.
pub const DA_EX_W_MAX: f64 = 100.0;
/// Lower weight bound of excitatory dopaminergic synapses.
pub const DA_EX_W_MIN: f64 = 85.0;

/// The synapse classes of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SynapseClass {
    #[serde(rename = "Glu")]
    Glu,
    #[serde(rename = "GABA")]
    Gaba,
    #[serde(rename = "DA_ex")]
    DaEx,
}

impl SynapseClass {
    pub const ALL: [SynapseClass; 3] = [SynapseClass::Glu, SynapseClass::Gaba, SynapseClass::DaEx];

    /// The identifier of the class in the model description.
    pub fn label(&self) -> &'static str {
        match self {
            SynapseClass::Glu => "Glu",
            SynapseClass::Gaba => "GABA",
            SynapseClass::DaEx => "DA_ex",
        }
    }
}

impl fmt::Display for SynapseClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for SynapseClass {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SynapseClass::ALL
            .into_iter()
            .find(|class| class.label() == s)
            .ok_or_else(|| {
                ParamError::UnknownSynapseClass(format!(
                    "{} (expected one of {})",
                    s,
                    SynapseClass::ALL.iter().map(|class| class.label()).join(", ")
                ))
            })
    }
}

/// A row of the synapse table: the record to create the synapses with, the nominal
/// weight, the label and, for custom models, the name under which the simulator knows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynapseEntry {
    pub params: SynapseParams,
    pub weight: f64,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Every parameter record of the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterTable {
    properties: Properties,
    neuron: NeuronParams,
    stdp_base: SynapseParams,
    dopa_base: SynapseParams,
    glu: SynapseEntry,
    gaba: SynapseEntry,
    da_ex: SynapseEntry,
    static_link: SynapseParams,
    multimeter: MultimeterParams,
    spike_detector: SpikeDetectorParams,
}

impl ParameterTable {
    /// Build the table from the given model constants.
    pub fn new(properties: Properties) -> Self {
        let stdp_base = SynapseParams::stdp_base();
        let dopa_base = SynapseParams::dopa_base();

        let glu = stdp_base.merge(
            &SynapseParams::new()
                .with_delay(DistributionSpec::uniform(1.0, 1.3))
                .with_weight(properties.w_glu)
                .with_w_max(GLU_W_MAX),
        );
        let gaba = stdp_base.merge(
            &SynapseParams::new()
                .with_delay(DistributionSpec::uniform(1.0, 1.3))
                .with_weight(properties.w_gaba)
                .with_w_max(GABA_W_MAX),
        );
        let da_ex = dopa_base.merge(
            &SynapseParams::new()
                .with_weight(properties.w_da_ex)
                .with_w_max(DA_EX_W_MAX)
                .with_w_min(DA_EX_W_MIN),
        );

        let static_link =
            SynapseParams::static_link(properties.generator_weight(), properties.pg_delay);

        log::debug!(
            "Built parameter table (w_Glu={}, w_GABA={}, w_DA_ex={})",
            properties.w_glu,
            properties.w_gaba,
            properties.w_da_ex
        );

        ParameterTable {
            glu: SynapseEntry {
                params: glu,
                weight: properties.w_glu,
                label: SynapseClass::Glu.label().to_string(),
                model: None,
            },
            gaba: SynapseEntry {
                params: gaba,
                weight: properties.w_gaba,
                label: SynapseClass::Gaba.label().to_string(),
                model: None,
            },
            da_ex: SynapseEntry {
                params: da_ex,
                weight: properties.w_da_ex,
                label: SynapseClass::DaEx.label().to_string(),
                model: Some(properties.dopa_model_ex.clone()),
            },
            properties,
            neuron: NeuronParams::default(),
            stdp_base,
            dopa_base,
            static_link,
            multimeter: MultimeterParams::default(),
            spike_detector: SpikeDetectorParams::default(),
        }
    }

    /// Build the table and check its consistency.
    pub fn build(properties: Properties) -> Result<Self, ParamError> {
        let table = ParameterTable::new(properties);
        table.validate()?;
        Ok(table)
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn neuron(&self) -> &NeuronParams {
        &self.neuron
    }

    /// Plasticity constants shared by the glutamatergic and GABAergic synapses.
    pub fn stdp_base(&self) -> &SynapseParams {
        &self.stdp_base
    }

    /// Constants shared by the dopaminergic synapses.
    pub fn dopa_base(&self) -> &SynapseParams {
        &self.dopa_base
    }

    /// The table entry of a synapse class.
    pub fn synapse(&self, class: SynapseClass) -> &SynapseEntry {
        match class {
            SynapseClass::Glu => &self.glu,
            SynapseClass::Gaba => &self.gaba,
            SynapseClass::DaEx => &self.da_ex,
        }
    }

    /// The table entry of a synapse class given by its identifier.
    /// Returns an error if the identifier names no class of the model.
    pub fn lookup(&self, class: &str) -> Result<&SynapseEntry, ParamError> {
        let class = class.parse::<SynapseClass>()?;
        Ok(self.synapse(class))
    }

    /// An iterator over the synapse table, in class order.
    pub fn synapses(&self) -> impl Iterator<Item = (SynapseClass, &SynapseEntry)> + '_ {
        SynapseClass::ALL
            .into_iter()
            .map(move |class| (class, self.synapse(class)))
    }

    /// The record of the links from spike generators.
    pub fn static_link(&self) -> &SynapseParams {
        &self.static_link
    }

    pub fn multimeter(&self) -> &MultimeterParams {
        &self.multimeter
    }

    pub fn spike_detector(&self) -> &SpikeDetectorParams {
        &self.spike_detector
    }

    /// Check the consistency of every record of the table.
    pub fn validate(&self) -> Result<(), ParamError> {
        self.check().inspect_err(|e| log::warn!("Inconsistent parameter table: {}", e))
    }

    fn check(&self) -> Result<(), ParamError> {
        self.properties.validate()?;
        self.neuron.validate()?;
        for (class, entry) in self.synapses() {
            entry.params.validate().map_err(|e| {
                ParamError::InvalidParameter(format!("synapse {}: {}", class, e))
            })?;
            if entry.params.weight != Some(entry.weight) {
                return Err(ParamError::InvalidParameter(format!(
                    "synapse {}: record weight {:?} differs from the table weight {}",
                    class, entry.params.weight, entry.weight
                )));
            }
        }
        self.static_link
            .validate()
            .map_err(|e| ParamError::InvalidParameter(format!("generator link: {}", e)))?;
        self.multimeter.validate()?;
        Ok(())
    }

    /// Export the whole table with the simulator field names.
    pub fn to_json(&self) -> Result<serde_json::Value, ParamError> {
        let synapses = self
            .synapses()
            .map(|(class, entry)| Ok((class.label().to_string(), serde_json::to_value(entry)?)))
            .collect::<Result<serde_json::Map<String, serde_json::Value>, ParamError>>()?;

        Ok(serde_json::json!({
            "properties": serde_json::to_value(&self.properties)?,
            "neuron": serde_json::to_value(&self.neuron)?,
            "stdp_synapse": serde_json::to_value(&self.stdp_base)?,
            "dopa_synapse": serde_json::to_value(&self.dopa_base)?,
            "synapses": synapses,
            "static_synapse": serde_json::to_value(&self.static_link)?,
            "multimeter": serde_json::to_value(&self.multimeter)?,
            "spike_detector": serde_json::to_value(&self.spike_detector)?,
        }))
    }
}

impl Default for ParameterTable {
    fn default() -> Self {
        ParameterTable::new(Properties::default())
    }
}

/// The table of the reference model, built on first use and kept until exit.
pub fn defaults() -> &'static ParameterTable {
    static DEFAULTS: OnceLock<ParameterTable> = OnceLock::new();
    DEFAULTS.get_or_init(ParameterTable::default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::ParamValue;

    #[test]
    fn test_glu_entry() {
        let table = ParameterTable::default();
        let entry = table.synapse(SynapseClass::Glu);
        let base = table.stdp_base();

        assert_eq!(entry.label, "Glu");
        assert_eq!(entry.weight, 3.0);
        assert_eq!(entry.model, None);
        assert_eq!(entry.params.weight, Some(3.0));
        assert_eq!(entry.params.w_max, Some(70.0));
        assert_eq!(
            entry.params.delay,
            Some(ParamValue::from(DistributionSpec::uniform(1.0, 1.3)))
        );
        assert_eq!(entry.params.tau_m, base.tau_m);
        assert_eq!(entry.params.alpha, base.alpha);
        assert_eq!(entry.params.lambda, base.lambda);
        assert_eq!(entry.params.model.as_deref(), Some("stdp_synapse"));
    }

    #[test]
    fn test_gaba_entry() {
        let table = ParameterTable::default();
        let entry = table.synapse(SynapseClass::Gaba);

        assert_eq!(entry.label, "GABA");
        assert_eq!(entry.weight, -6.0);
        assert_eq!(entry.params.w_max, Some(-60.0));
        assert_eq!(
            entry.params.delay,
            Some(ParamValue::from(DistributionSpec::uniform(1.0, 1.3)))
        );
        assert_eq!(entry.params.tau_m, table.stdp_base().tau_m);
        assert_eq!(entry.params.alpha, table.stdp_base().alpha);
        assert_eq!(entry.params.lambda, Some(0.5));
    }

    #[test]
    fn test_da_ex_entry() {
        let table = ParameterTable::default();
        let entry = table.synapse(SynapseClass::DaEx);

        assert_eq!(entry.label, "DA_ex");
        assert_eq!(entry.weight, 13.0);
        assert_eq!(entry.model.as_deref(), Some("dopa_ex"));
        assert_eq!(entry.params.delay, Some(ParamValue::Fixed(1.0)));
        assert_eq!(entry.params.w_max, Some(100.0));
        assert_eq!(entry.params.w_min, Some(85.0));
        assert_eq!(entry.params.tau_m, None);
    }

    #[test]
    fn test_bases_are_untouched() {
        let table = ParameterTable::default();
        assert_eq!(table.stdp_base(), &SynapseParams::stdp_base());
        assert_eq!(table.dopa_base(), &SynapseParams::dopa_base());
        assert_eq!(table.stdp_base().weight, None);
        assert_eq!(table.stdp_base().w_max, None);
    }

    #[test]
    fn test_lookup() {
        let table = ParameterTable::default();
        for class in SynapseClass::ALL {
            assert_eq!(table.lookup(class.label()).unwrap(), table.synapse(class));
        }

        match table.lookup("ACh") {
            Err(ParamError::UnknownSynapseClass(msg)) => {
                assert_eq!(msg, "ACh (expected one of Glu, GABA, DA_ex)")
            }
            other => panic!("unexpected lookup result: {:?}", other),
        }
        // identifiers are case sensitive
        assert!(table.lookup("glu").is_err());
    }

    #[test]
    fn test_static_link() {
        let table = ParameterTable::default();
        let link = table.static_link();
        assert_eq!(link.model.as_deref(), Some("static_synapse"));
        assert_eq!(link.weight, Some(15.0));
        assert_eq!(link.delay, Some(ParamValue::Fixed(10.0)));
    }

    #[test]
    fn test_build_validates() {
        assert!(ParameterTable::build(Properties::default()).is_ok());

        let properties = Properties {
            w_glu: -3.0,
            ..Properties::default()
        };
        assert!(matches!(
            ParameterTable::build(properties),
            Err(ParamError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_custom_properties() {
        let properties = Properties {
            w_glu: 4.0,
            dopa_model_ex: "dopa_ex_custom".to_string(),
            ..Properties::default()
        };
        let table = ParameterTable::new(properties);
        assert_eq!(table.synapse(SynapseClass::Glu).weight, 4.0);
        assert_eq!(table.static_link().weight, Some(20.0));
        assert_eq!(
            table.synapse(SynapseClass::DaEx).model.as_deref(),
            Some("dopa_ex_custom")
        );
    }

    #[test]
    fn test_defaults_is_shared() {
        assert!(std::ptr::eq(defaults(), defaults()));
        assert_eq!(defaults(), &ParameterTable::default());
    }

    #[test]
    fn test_to_json() {
        let json = ParameterTable::default().to_json().unwrap();
        assert_eq!(json["neuron"]["V_th"], -50.0);
        assert_eq!(json["synapses"]["Glu"]["params"]["Wmax"], 70.0);
        assert_eq!(json["synapses"]["DA_ex"]["model"], "dopa_ex");
        assert_eq!(json["synapses"]["GABA"]["params"]["tau_m"]["distribution"], "uniform");
        assert_eq!(json["multimeter"]["record_from"][0], "V_m");
        assert_eq!(json["spike_detector"]["label"], "spikes");
    }

    #[test]
    fn test_synapse_class_serde() {
        assert_eq!(serde_json::to_string(&SynapseClass::DaEx).unwrap(), "\"DA_ex\"");
        let class: SynapseClass = serde_json::from_str("\"GABA\"").unwrap();
        assert_eq!(class, SynapseClass::Gaba);
    }
}
