use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaytimeError {
    #[error("{field} environment variable is required. Copy env.example to .env and set it.")]
    MissingRequiredField { field: &'static str },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid agent definition: {0}")]
    InvalidAgent(String),

    #[error("Agent definition parse error: {0}")]
    AgentDefinition(#[from] toml::de::Error),

    #[error("Invalid tool call: {0}")]
    InvalidToolCall(String),

    #[error("Failed to get agent '{resource_name}': {reason}")]
    AgentLookup {
        resource_name: String,
        reason: String,
    },

    #[error("Agent Engine returned {status}: {message}")]
    Platform { status: u16, message: String },

    #[error("Deployment did not finish within {0} seconds")]
    DeployTimeout(u64),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlaytimeError {
    /// True for errors raised while resolving configuration, before any
    /// platform call was attempted.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            PlaytimeError::MissingRequiredField { .. } | PlaytimeError::InvalidConfig(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PlaytimeError>;
