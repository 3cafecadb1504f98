use crate::sink::SinkOp;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("Unsupported type at {address}: {type_name}")]
    UnsupportedType { address: String, type_name: String },

    #[error("Invalid segment: {0:?}")]
    InvalidSegment(String),

    #[error("Sink error {code} during {operation} at {address}")]
    Sink {
        operation: SinkOp,
        address: String,
        code: i32,
    },

    #[error("Node at {address} is nested deeper than {limit} levels")]
    TooDeep { address: String, limit: usize },

    #[error("Duplicate address: {0}")]
    DuplicateAddress(String),

    #[error("Root must be a map, found {0}")]
    RootNotMap(&'static str),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Format error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
