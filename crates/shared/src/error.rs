use thiserror::Error;

use crate::protocol::ParamName;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("command '{0}' has no ':' separator")]
    MissingSeparator(String),
    #[error("{name}: expected argument #{position}")]
    MissingArgument { name: ParamName, position: usize },
    #[error("{name}: invalid argument '{raw}'")]
    InvalidArgument { name: ParamName, raw: String },
}
