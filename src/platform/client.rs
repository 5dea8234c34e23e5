//! REST client for Vertex AI Agent Engine (reasoning engines).
//!
//! # Endpoints
//! - `GET    {api}/projects/{p}/locations/{l}/reasoningEngines` (paged)
//! - `POST   {api}/projects/{p}/locations/{l}/reasoningEngines` (long-running)
//! - `GET    {api}/{resource}` / `DELETE {api}/{resource}`
//! - `POST   {api}/{resource}:query` and `{resource}:streamQuery?alt=sse`
//!
//! Deployment artifacts are staged with the Cloud Storage JSON upload API
//! before the engine is created.

use super::stream::ChunkDecoder;
use super::{AgentEngine, ChunkStream, DeployRequest, DeployedAgent, Session};
use crate::config::Config;
use crate::error::{PlaytimeError, Result};
use async_trait::async_trait;
use futures_util::StreamExt;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{debug, info};

const STORAGE_BASE: &str = "https://storage.googleapis.com";
const AGENT_FRAMEWORK: &str = "google-adk";
const PYTHON_VERSION: &str = "3.12";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_DEPLOY_TIMEOUT: Duration = Duration::from_secs(30 * 60);

pub struct AgentEngineClient {
    http: reqwest::Client,
    token: String,
    parent: String,
    api_base: String,
    storage_base: String,
    poll_interval: Duration,
    deploy_timeout: Duration,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReasoningEngine {
    name: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    create_time: Option<String>,
}

impl From<ReasoningEngine> for DeployedAgent {
    fn from(engine: ReasoningEngine) -> Self {
        Self {
            display_name: engine.display_name.unwrap_or_default(),
            resource_name: engine.name,
            description: engine.description.filter(|d| !d.is_empty()),
            create_time: engine.create_time,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    reasoning_engines: Vec<ReasoningEngine>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Operation {
    name: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<OperationError>,
    #[serde(default)]
    response: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    output: Value,
}

impl AgentEngineClient {
    pub fn new(config: &Config, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: token.into(),
            parent: config.parent(),
            api_base: format!("https://{}-aiplatform.googleapis.com/v1", config.location),
            storage_base: STORAGE_BASE.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            deploy_timeout: DEFAULT_DEPLOY_TIMEOUT,
        }
    }

    /// Override the Vertex AI endpoint (including the API version)
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the Cloud Storage endpoint
    pub fn with_storage_base(mut self, base: impl Into<String>) -> Self {
        self.storage_base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_deploy_timeout(mut self, timeout: Duration) -> Self {
        self.deploy_timeout = timeout;
        self
    }

    /// Accept either a full resource name or a bare engine id
    pub fn resource_name(&self, name: &str) -> String {
        if name.starts_with("projects/") {
            name.to_string()
        } else {
            format!("{}/reasoningEngines/{}", self.parent, name)
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    async fn upload(&self, bucket: &str, object: &str, content_type: &str, body: Vec<u8>) -> Result<String> {
        let url = format!("{}/upload/storage/v1/b/{}/o", self.storage_base, bucket);
        debug!(bucket, object, "staging artifact");

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .query(&[("uploadType", "media"), ("name", object)])
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;
        check(response).await?;

        Ok(format!("gs://{}/{}", bucket, object))
    }

    async fn wait_for(&self, mut operation: Operation) -> Result<Value> {
        let started = Instant::now();
        loop {
            if operation.done {
                if let Some(error) = operation.error {
                    return Err(PlaytimeError::Platform {
                        status: error.code,
                        message: error.message,
                    });
                }
                return Ok(operation.response.unwrap_or(Value::Null));
            }

            if started.elapsed() >= self.deploy_timeout {
                return Err(PlaytimeError::DeployTimeout(self.deploy_timeout.as_secs()));
            }

            tokio::time::sleep(self.poll_interval).await;
            debug!(operation = %operation.name, "polling operation");
            let response = self
                .http
                .get(self.url(&operation.name))
                .bearer_auth(&self.token)
                .send()
                .await?;
            operation = check(response).await?.json().await?;
        }
    }

    async fn query(&self, resource_name: &str, class_method: &str, input: Value) -> Result<Value> {
        let response = self
            .http
            .post(self.url(&format!("{}:query", self.resource_name(resource_name))))
            .bearer_auth(&self.token)
            .json(&json!({ "classMethod": class_method, "input": input }))
            .send()
            .await?;
        let body: QueryResponse = check(response).await?.json().await?;
        Ok(body.output)
    }
}

#[async_trait]
impl AgentEngine for AgentEngineClient {
    async fn create(&self, request: &DeployRequest) -> Result<DeployedAgent> {
        let prefix = format!("agent_engine/{}", request.display_name);
        let agent_uri = self
            .upload(
                &request.staging_bucket,
                &format!("{}/agent.json", prefix),
                "application/json",
                serde_json::to_vec_pretty(&request.agent)?,
            )
            .await?;
        let requirements_uri = self
            .upload(
                &request.staging_bucket,
                &format!("{}/requirements.txt", prefix),
                "text/plain",
                request.requirements.join("\n").into_bytes(),
            )
            .await?;

        let body = json!({
            "displayName": request.display_name,
            "description": request.description,
            "spec": {
                "agentFramework": AGENT_FRAMEWORK,
                "packageSpec": {
                    "pythonVersion": PYTHON_VERSION,
                    "requirementsGcsUri": requirements_uri,
                    "dependencyFilesGcsUri": agent_uri,
                },
            },
        });

        info!(display_name = %request.display_name, "creating reasoning engine");
        let response = self
            .http
            .post(self.url(&format!("{}/reasoningEngines", self.parent)))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        let operation: Operation = check(response).await?.json().await?;

        let created = self.wait_for(operation).await?;
        let engine: ReasoningEngine = serde_json::from_value(created)?;
        Ok(engine.into())
    }

    async fn list(&self) -> Result<Vec<DeployedAgent>> {
        let mut agents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(self.url(&format!("{}/reasoningEngines", self.parent)))
                .bearer_auth(&self.token);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let page: ListResponse = check(request.send().await?).await?.json().await?;
            agents.extend(page.reasoning_engines.into_iter().map(DeployedAgent::from));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => return Ok(agents),
            }
        }
    }

    async fn get(&self, resource_name: &str) -> Result<DeployedAgent> {
        let response = self
            .http
            .get(self.url(&self.resource_name(resource_name)))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let engine: ReasoningEngine = check(response).await?.json().await?;
        Ok(engine.into())
    }

    async fn delete(&self, resource_name: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&self.resource_name(resource_name)))
            .bearer_auth(&self.token)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn create_session(&self, resource_name: &str, user_id: &str) -> Result<Session> {
        let output = self
            .query(resource_name, "create_session", json!({ "user_id": user_id }))
            .await?;

        let id = output
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| PlaytimeError::Platform {
                status: 200,
                message: format!("create_session returned no session id: {}", output),
            })?;

        Ok(Session {
            id: id.to_string(),
            user_id: user_id.to_string(),
        })
    }

    async fn stream_query(
        &self,
        resource_name: &str,
        user_id: &str,
        session_id: &str,
        message: &str,
    ) -> Result<ChunkStream> {
        let body = json!({
            "classMethod": "stream_query",
            "input": {
                "user_id": user_id,
                "session_id": session_id,
                "message": message,
            },
        });

        debug!(session_id, "sending stream query");
        let response = self
            .http
            .post(self.url(&format!("{}:streamQuery", self.resource_name(resource_name))))
            .query(&[("alt", "sse")])
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        let response = check(response).await?;

        let stream = async_stream::stream! {
            let mut frames = response.bytes_stream();
            let mut decoder = ChunkDecoder::new();

            while let Some(frame) = frames.next().await {
                match frame {
                    Ok(bytes) => {
                        for chunk in decoder.push(&bytes) {
                            yield chunk;
                        }
                    }
                    Err(e) => {
                        yield Err(PlaytimeError::Http(e));
                        return;
                    }
                }
            }

            if let Some(chunk) = decoder.finish() {
                yield chunk;
            }
        };

        Ok(Box::pin(stream))
    }
}

/// Turn a non-2xx response into a `Platform` error carrying the API message
async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(PlaytimeError::Platform {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// Google APIs wrap failures as `{"error": {"code", "message", "status"}}`
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
