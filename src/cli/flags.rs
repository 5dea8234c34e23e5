use clap::Parser;

/// Platform overrides shared by every command.
/// These take precedence over the environment and the env file.
#[derive(Parser, Debug, Clone, Default)]
pub struct PlatformFlags {
    /// Google Cloud project id (overrides GOOGLE_CLOUD_PROJECT)
    #[arg(long = "project", global = true)]
    pub project: Option<String>,

    /// Google Cloud region (overrides GOOGLE_CLOUD_LOCATION)
    #[arg(long = "location", global = true)]
    pub location: Option<String>,

    /// Model used by the agent (overrides MODEL_NAME)
    #[arg(long = "model", global = true)]
    pub model: Option<String>,

    /// Cloud Storage bucket used to stage deployments
    /// (overrides AGENT_ENGINE_STAGING_BUCKET)
    #[arg(long = "staging-bucket", global = true)]
    pub staging_bucket: Option<String>,
}
