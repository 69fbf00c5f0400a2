//! This crate provides the parameter tables of a neuromodulation network model, ready to be
//! handed over to a spiking network simulator such as NEST.
//!
//! # Reading the Table
//!
//! ```rust
//! use neuromod_params::table::{defaults, SynapseClass};
//!
//! let table = defaults();
//!
//! // The neuron constants shared by every population
//! assert_eq!(table.neuron().v_th, -50.0);
//!
//! // The synapse records, by class or by identifier
//! let gaba = table.synapse(SynapseClass::Gaba);
//! assert_eq!(gaba.params.w_max, Some(-60.0));
//! assert_eq!(table.lookup("DA_ex").unwrap().model.as_deref(), Some("dopa_ex"));
//! ```
//!
//! # Changing the Model Constants
//!
//! ```rust
//! use neuromod_params::properties::Properties;
//! use neuromod_params::table::{ParameterTable, SynapseClass};
//!
//! let properties = Properties::from_json_str(r#"{"w_Glu": 4.0}"#).unwrap();
//! let table = ParameterTable::build(properties).unwrap();
//!
//! assert_eq!(table.synapse(SynapseClass::Glu).weight, 4.0);
//! assert_eq!(table.static_link().weight, Some(20.0));
//! ```
//!
//! # Sampling Distributed Parameters
//!
//! ```rust
//! use neuromod_params::table::{defaults, SynapseClass};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let glu = defaults().synapse(SynapseClass::Glu).params.realize(&mut rng).unwrap();
//!
//! let delay = glu.delay.unwrap().as_fixed().unwrap();
//! assert!((1.0..1.3).contains(&delay));
//! ```

pub mod device;
pub mod distribution;
pub mod error;
pub mod generator;
pub mod neuron;
pub mod properties;
pub mod synapse;
pub mod table;
