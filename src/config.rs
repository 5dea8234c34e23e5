use crate::cli::PlatformFlags;
use crate::error::{PlaytimeError, Result};
use serde::Serialize;
use std::path::Path;

pub const PROJECT_VAR: &str = "GOOGLE_CLOUD_PROJECT";
pub const LOCATION_VAR: &str = "GOOGLE_CLOUD_LOCATION";
pub const STAGING_BUCKET_VAR: &str = "AGENT_ENGINE_STAGING_BUCKET";
pub const MODEL_VAR: &str = "MODEL_NAME";

pub const DEFAULT_LOCATION: &str = "us-central1";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Runtime configuration, resolved once per process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Google Cloud project id (required)
    pub project_id: String,

    /// Google Cloud region hosting Agent Engine
    pub location: String,

    /// Cloud Storage bucket used to stage deployments
    pub staging_bucket: Option<String>,

    /// Model identifier handed to the agent
    pub model_name: String,
}

impl Config {
    /// Load configuration with precedence:
    /// 1. CLI flags (applied later via with_overrides)
    /// 2. Environment variables
    /// 3. Env file (only fills variables not already set)
    /// 4. Built-in defaults
    pub fn load(env_file: &Path) -> Result<Self> {
        crate::utils::env::apply_env_file(env_file)?;
        Self::resolve()
    }

    /// Resolve configuration from the process environment
    pub fn resolve() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary variable lookup.
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let project_id = get(PROJECT_VAR).ok_or(PlaytimeError::MissingRequiredField {
            field: PROJECT_VAR,
        })?;

        Ok(Self {
            project_id,
            location: get(LOCATION_VAR).unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            staging_bucket: get(STAGING_BUCKET_VAR),
            model_name: get(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    /// Apply CLI overrides (highest precedence)
    pub fn with_overrides(mut self, flags: &PlatformFlags) -> Result<Self> {
        if let Some(project) = &flags.project {
            if project.is_empty() {
                return Err(PlaytimeError::InvalidConfig(
                    "--project cannot be empty".to_string(),
                ));
            }
            self.project_id = project.clone();
        }
        if let Some(location) = flags.location.as_ref().filter(|l| !l.is_empty()) {
            self.location = location.clone();
        }
        if let Some(model) = flags.model.as_ref().filter(|m| !m.is_empty()) {
            self.model_name = model.clone();
        }
        if let Some(bucket) = flags.staging_bucket.as_ref().filter(|b| !b.is_empty()) {
            self.staging_bucket = Some(bucket.clone());
        }
        Ok(self)
    }

    /// Bucket name without any `gs://` prefix, required for deployment
    pub fn require_staging_bucket(&self) -> Result<&str> {
        let bucket = self.staging_bucket.as_deref().ok_or_else(|| {
            PlaytimeError::InvalidConfig(format!(
                "{} is required for deployment. Create a GCS bucket and add it to your .env file.",
                STAGING_BUCKET_VAR
            ))
        })?;

        let bucket = bucket.strip_prefix("gs://").unwrap_or(bucket);
        let bucket = bucket.trim_end_matches('/');
        if bucket.is_empty() {
            return Err(PlaytimeError::InvalidConfig(format!(
                "{} does not name a bucket",
                STAGING_BUCKET_VAR
            )));
        }
        Ok(bucket)
    }

    /// Resource path of the project/location pair, as used by Vertex AI
    pub fn parent(&self) -> String {
        format!("projects/{}/locations/{}", self.project_id, self.location)
    }
}

/// Model name alone, for commands that never reach the platform and so do
/// not require a project: `--model`, then `MODEL_NAME`, then the default.
pub fn model_name<F>(flags: &PlatformFlags, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    flags
        .model
        .clone()
        .filter(|m| !m.is_empty())
        .or_else(|| lookup(MODEL_VAR).filter(|m| !m.is_empty()))
        .unwrap_or_else(|| DEFAULT_MODEL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_from_lookup() {
        let config = Config::from_lookup(lookup_from(&[
            (PROJECT_VAR, "test-project"),
            (LOCATION_VAR, "us-west1"),
            (MODEL_VAR, "gemini-pro"),
        ]))
        .unwrap();

        assert_eq!(config.project_id, "test-project");
        assert_eq!(config.location, "us-west1");
        assert_eq!(config.model_name, "gemini-pro");
        assert_eq!(config.staging_bucket, None);
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[(PROJECT_VAR, "test-project")])).unwrap();

        assert_eq!(config.project_id, "test-project");
        assert_eq!(config.location, "us-central1");
        assert_eq!(config.model_name, "gemini-2.0-flash");
    }

    #[test]
    fn test_config_missing_project() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(
            err,
            PlaytimeError::MissingRequiredField {
                field: "GOOGLE_CLOUD_PROJECT"
            }
        ));
    }

    #[test]
    fn test_config_empty_project() {
        let err = Config::from_lookup(lookup_from(&[(PROJECT_VAR, "")])).unwrap_err();
        assert!(err.to_string().contains("GOOGLE_CLOUD_PROJECT"));
    }

    #[test]
    fn test_empty_optional_values_use_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            (PROJECT_VAR, "p"),
            (LOCATION_VAR, ""),
            (MODEL_VAR, ""),
            (STAGING_BUCKET_VAR, ""),
        ]))
        .unwrap();

        assert_eq!(config.location, DEFAULT_LOCATION);
        assert_eq!(config.model_name, DEFAULT_MODEL);
        assert_eq!(config.staging_bucket, None);
    }

    #[test]
    fn test_project_echoed_unchanged() {
        for project in ["p", "my-project-123", " spaced ", "UPPER_case"] {
            let config = Config::from_lookup(lookup_from(&[(PROJECT_VAR, project)])).unwrap();
            assert_eq!(config.project_id, project);
        }
    }

    #[test]
    fn test_with_overrides() {
        let config = Config::from_lookup(lookup_from(&[(PROJECT_VAR, "env-project")])).unwrap();
        let flags = PlatformFlags {
            project: Some("cli-project".to_string()),
            location: Some("europe-west4".to_string()),
            model: None,
            staging_bucket: Some("gs://bucket".to_string()),
        };

        let config = config.with_overrides(&flags).unwrap();
        assert_eq!(config.project_id, "cli-project");
        assert_eq!(config.location, "europe-west4");
        assert_eq!(config.model_name, DEFAULT_MODEL);
        assert_eq!(config.staging_bucket.as_deref(), Some("gs://bucket"));
    }

    #[test]
    fn test_with_overrides_rejects_empty_project() {
        let config = Config::from_lookup(lookup_from(&[(PROJECT_VAR, "p")])).unwrap();
        let flags = PlatformFlags {
            project: Some(String::new()),
            ..Default::default()
        };
        assert!(config.with_overrides(&flags).is_err());
    }

    #[test]
    fn test_require_staging_bucket() {
        let config = Config::from_lookup(lookup_from(&[
            (PROJECT_VAR, "p"),
            (STAGING_BUCKET_VAR, "gs://my-bucket/"),
        ]))
        .unwrap();
        assert_eq!(config.require_staging_bucket().unwrap(), "my-bucket");

        let config = Config::from_lookup(lookup_from(&[(PROJECT_VAR, "p")])).unwrap();
        let err = config.require_staging_bucket().unwrap_err();
        assert!(err.to_string().contains(STAGING_BUCKET_VAR));

        let config = Config::from_lookup(lookup_from(&[
            (PROJECT_VAR, "p"),
            (STAGING_BUCKET_VAR, "gs://"),
        ]))
        .unwrap();
        assert!(config.require_staging_bucket().is_err());
    }

    #[test]
    fn test_model_name_without_project() {
        let flags = PlatformFlags::default();
        assert_eq!(model_name(&flags, lookup_from(&[])), DEFAULT_MODEL);
        assert_eq!(
            model_name(&flags, lookup_from(&[(MODEL_VAR, "gemini-pro")])),
            "gemini-pro"
        );

        let flags = PlatformFlags {
            model: Some("gemini-flash-cli".to_string()),
            ..Default::default()
        };
        assert_eq!(
            model_name(&flags, lookup_from(&[(MODEL_VAR, "gemini-pro")])),
            "gemini-flash-cli"
        );
    }

    #[test]
    fn test_parent() {
        let config = Config::from_lookup(lookup_from(&[(PROJECT_VAR, "p")])).unwrap();
        assert_eq!(config.parent(), "projects/p/locations/us-central1");
    }
}
