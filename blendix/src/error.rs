use thiserror::Error;

use crate::Variant;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("set {index} is outside the configured range 1..={count}")]
    InvalidSetIndex { index: usize, count: usize },

    #[error("cannot write {requested} coordinates while the {active} variant is active")]
    VariantMismatch { active: Variant, requested: Variant },

    #[error("{tx} transmit sets plus {rx} receive sets exceeds the maximum of {}", crate::MAX_SETS)]
    InvalidCount { tx: usize, rx: usize },

    #[error("unknown coordinate variant '{0}', expected 'int' or 'float'")]
    InvalidVariant(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("received data is empty or does not end with ';'")]
    MalformedTerminator,

    #[error("received {values} values, which is not a whole number of triples")]
    IncompleteTriple { values: usize },

    #[error("token {index} ('{token}') is not a number")]
    MalformedToken { index: usize, token: String },
}
