use shared::protocol::{ParameterKey, ValueShape};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("no value has been reported for {key}")]
    MissingParameter { key: ParameterKey },
    #[error("{key} holds a value of the wrong shape, expected {expected:?}")]
    UnexpectedValue {
        key: ParameterKey,
        expected: ValueShape,
    },
    #[error("modulation '{0}' has no filter defaults")]
    UnknownModulation(String),
    #[error("failed to send command: {0}")]
    Send(#[source] anyhow::Error),
}

