//! Agent Engine platform access.
//!
//! [`AgentEngine`] is the seam between commands and the hosted platform.
//! [`AgentEngineClient`] implements it over the Vertex AI REST API; tests
//! substitute in-memory fakes.

pub mod auth;
pub mod client;
pub mod stream;

use crate::agents::AgentDescriptor;
use crate::error::Result;
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use serde::Serialize;

pub use client::AgentEngineClient;
pub use stream::{chunk_text, ChunkDecoder};

/// Python requirements installed next to the agent in the hosted runtime
pub const DEFAULT_REQUIREMENTS: &[&str] = &[
    "google-cloud-aiplatform[adk,agent_engines]>=1.87.0",
    "google-adk",
    "google-genai",
];

/// A reasoning engine as reported by the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployedAgent {
    pub resource_name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub create_time: Option<String>,
}

/// A conversation-scoped context on a deployed agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub user_id: String,
}

/// One element of a streamed query response
#[derive(Debug, Clone, PartialEq)]
pub struct QueryChunk {
    /// Text fragment carried by this chunk, if any
    pub text: Option<String>,
    pub raw: serde_json::Value,
}

pub type ChunkStream = BoxStream<'static, Result<QueryChunk>>;

#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub display_name: String,
    pub description: String,
    pub agent: AgentDescriptor,
    pub requirements: Vec<String>,
    /// Bucket name, without `gs://`
    pub staging_bucket: String,
}

#[async_trait]
pub trait AgentEngine: Send + Sync {
    /// Deploy an agent and wait until it is ready
    async fn create(&self, request: &DeployRequest) -> Result<DeployedAgent>;

    /// All agents deployed in the configured project and location
    async fn list(&self) -> Result<Vec<DeployedAgent>>;

    async fn get(&self, resource_name: &str) -> Result<DeployedAgent>;

    async fn delete(&self, resource_name: &str) -> Result<()>;

    async fn create_session(&self, resource_name: &str, user_id: &str) -> Result<Session>;

    /// Send `message` and stream back the response chunks
    async fn stream_query(
        &self,
        resource_name: &str,
        user_id: &str,
        session_id: &str,
        message: &str,
    ) -> Result<ChunkStream>;
}

/// Concatenate the text fragments of a response stream, in arrival order
pub async fn collect_text(mut stream: ChunkStream) -> Result<String> {
    let mut text = String::new();
    while let Some(chunk) = stream.next().await {
        if let Some(fragment) = chunk?.text {
            text.push_str(&fragment);
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlaytimeError;
    use serde_json::Value;

    fn chunk(text: Option<&str>) -> Result<QueryChunk> {
        Ok(QueryChunk {
            text: text.map(str::to_string),
            raw: Value::Null,
        })
    }

    #[tokio::test]
    async fn test_collect_text_concatenates_in_order() {
        let stream: ChunkStream = Box::pin(futures_util::stream::iter(vec![
            chunk(Some("Hel")),
            chunk(None),
            chunk(Some("lo")),
        ]));
        assert_eq!(collect_text(stream).await.unwrap(), "Hello");
    }

    #[tokio::test]
    async fn test_collect_text_propagates_errors() {
        let stream: ChunkStream = Box::pin(futures_util::stream::iter(vec![
            chunk(Some("partial")),
            Err(PlaytimeError::Platform {
                status: 500,
                message: "boom".to_string(),
            }),
        ]));
        assert!(collect_text(stream).await.is_err());
    }
}
