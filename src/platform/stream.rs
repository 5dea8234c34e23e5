//! Decoder for streamed query responses.
//!
//! The platform answers `:streamQuery` with one JSON document per line.
//! Network frames do not respect line boundaries, so bytes are buffered until
//! a full line is available. A `data: ` prefix (server-sent events framing)
//! is accepted and stripped.

use super::QueryChunk;
use crate::error::{PlaytimeError, Result};
use serde_json::Value;

#[derive(Debug, Default)]
pub struct ChunkDecoder {
    buffer: Vec<u8>,
}

impl ChunkDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one network frame; returns every chunk completed by it
    pub fn push(&mut self, frame: &[u8]) -> Vec<Result<QueryChunk>> {
        self.buffer.extend_from_slice(frame);

        let mut chunks = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            if let Some(chunk) = decode_line(&line) {
                chunks.push(chunk);
            }
        }
        chunks
    }

    /// Flush a trailing line that was not newline-terminated
    pub fn finish(mut self) -> Option<Result<QueryChunk>> {
        let rest = std::mem::take(&mut self.buffer);
        decode_line(&rest)
    }
}

fn decode_line(line: &[u8]) -> Option<Result<QueryChunk>> {
    let line = match std::str::from_utf8(line) {
        Ok(line) => line.trim(),
        Err(e) => {
            return Some(Err(PlaytimeError::Platform {
                status: 0,
                message: format!("stream line is not valid UTF-8: {}", e),
            }))
        }
    };

    let line = line
        .strip_prefix("data:")
        .map(str::trim_start)
        .unwrap_or(line);
    if line.is_empty() || line == "[DONE]" {
        return None;
    }

    let raw: Value = match serde_json::from_str(line) {
        Ok(raw) => raw,
        Err(e) => return Some(Err(PlaytimeError::Json(e))),
    };

    if let Some(error) = raw.get("error") {
        let status = error
            .get("code")
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok())
            .unwrap_or(0);
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Some(Err(PlaytimeError::Platform { status, message }));
    }

    Some(Ok(QueryChunk {
        text: chunk_text(&raw),
        raw,
    }))
}

/// Text carried by a chunk: `content` when it is a string, otherwise the
/// concatenated `content.parts[].text`, skipping model thoughts.
pub fn chunk_text(chunk: &Value) -> Option<String> {
    let content = chunk.get("content")?;
    if let Some(text) = content.as_str() {
        return (!text.is_empty()).then(|| text.to_string());
    }

    let text: String = content
        .get("parts")?
        .as_array()?
        .iter()
        .filter(|part| !part.get("thought").and_then(Value::as_bool).unwrap_or(false))
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();
    (!text.is_empty()).then_some(text)
}
