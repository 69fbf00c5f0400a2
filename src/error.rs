//! Error module for the parameter tables.
use std::error::Error;
use std::fmt;

/// Error types for the library.
#[derive(Debug, PartialEq)]
pub enum ParamError {
    /// Error for a synapse class identifier which is not part of the table.
    UnknownSynapseClass(String),
    /// Error for invalid parameters, e.g., a negative delay or inconsistent weight bounds.
    InvalidParameter(String),
    /// Error for an ill-formed distribution specification, e.g., an empty uniform range.
    InvalidDistribution(String),
    /// Error for I/O operations.
    IOError(String),
    /// Error while decoding a configuration.
    ParseError(String),
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParamError::UnknownSynapseClass(e) => write!(f, "Unknown synapse class: {}", e),
            ParamError::InvalidParameter(e) => write!(f, "Invalid parameters: {}", e),
            ParamError::InvalidDistribution(e) => write!(f, "Invalid distribution: {}", e),
            ParamError::IOError(e) => write!(f, "I/O error: {}", e),
            ParamError::ParseError(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl Error for ParamError {}

impl From<serde_json::Error> for ParamError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            ParamError::IOError(e.to_string())
        } else {
            ParamError::ParseError(e.to_string())
        }
    }
}
