//! Error types for the tree core.

use thiserror::Error;

/// Errors raised while configuring the core or decoding detector payloads.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    /// A configuration value is outside its accepted range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An override key is not recognised
    #[error("unknown setting `{0}`")]
    UnknownOverride(String),

    /// An override value could not be parsed for its key
    #[error("could not parse `{value}` for setting `{key}`")]
    BadOverride { key: String, value: String },

    /// A detector payload did not carry a full hand
    #[error("expected {expected} hand landmarks, got {got}")]
    LandmarkCount { expected: usize, got: usize },

    /// A detector payload carried NaN or infinite coordinates
    #[error("landmark {index} has a non-finite coordinate")]
    NonFiniteLandmark { index: usize },
}

/// Fatal start-up failures. Reported once to the host, never retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InitError {
    #[error("could not build the tree scene: {0}")]
    Scene(String),

    #[error("could not start the renderer: {0}")]
    Renderer(String),

    #[error("camera unavailable: {0}")]
    Camera(String),

    #[error("hand tracker failed to load: {0}")]
    Detector(String),
}

impl From<TreeError> for InitError {
    fn from(e: TreeError) -> Self {
        InitError::Scene(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TreeError>;
