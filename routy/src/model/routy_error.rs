use routy_network::NetworkError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoutyError {
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error("search window must span at least one hour, found {0}")]
    InvalidWindow(i64),
    #[error("unable to parse departure time '{0}'")]
    InvalidDeparture(String),
    #[error("time outside the representable calendar range: {0}")]
    TimeOutOfRange(String),
    #[error("invalid traffic pattern: {0}")]
    InvalidPattern(String),
    #[error("order id {0} was submitted more than once")]
    DuplicateOrder(u64),
    #[error("invalid order {0}: {1}")]
    InvalidOrder(u64, String),
    #[error("failure with policy model artifact {0}: {1}")]
    ModelArtifactError(String, String),
    #[error("invalid configuration: {0}")]
    ConfigurationError(String),
    #[error("failure reading orders from {0}: {1}")]
    OrderFileError(String, String),
    #[error("failure encoding JSON output: {source}")]
    SerdeJsonError {
        #[from]
        source: serde_json::Error,
    },
    #[error("{0}")]
    InternalError(String),
}
