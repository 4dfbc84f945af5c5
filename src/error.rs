use thiserror::Error;

/// Errors raised by the snake state machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnakeError {
    /// The driver kept acting after the snake died.
    #[error("cannot act on a dead snake")]
    Dead,
    #[error("invalid snake body: {0}")]
    InvalidBody(&'static str),
}

/// Errors raised while building, evaluating or persisting a binary network.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("network layers must all have non-zero width")]
    EmptyNetwork,
    #[error("network expects {expected} inputs, got {actual}")]
    InputWidth { expected: usize, actual: usize },
    #[error("restored weights have {actual} layers, network declares {expected}")]
    LayerCount { expected: usize, actual: usize },
    #[error("layer {layer} is shaped {actual:?} (outputs, inputs), expected {expected:?}")]
    LayerShape {
        layer: usize,
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("layer {layer} kernel entry {index} is {value}, expected +1 or -1")]
    NonBinaryWeight { layer: usize, index: usize, value: f32 },
    #[error("no weights stored under `{0}`")]
    MissingWeights(String),
    #[error("weight store io: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode weights: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("failed to decode weights: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}

/// Configuration problems detected before an episode starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors surfaced by the episode driver.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("policy produces {actual} actions, the snake accepts {expected}")]
    ActionSpace { expected: usize, actual: usize },
    #[error("policy chose action {0}, which is outside the action space")]
    InvalidAction(usize),
    #[error(transparent)]
    Snake(#[from] SnakeError),
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
