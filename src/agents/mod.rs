//! Agent definitions and assembly.
//!
//! Agents are declared in TOML files embedded at build time and turned into
//! an [`AgentDescriptor`] by resolving their tool names against a
//! [`ToolRegistry`](crate::tools::ToolRegistry).
//!
//! # Example
//!
//! ```toml
//! [agent]
//! id = "assistant"
//! name = "assistant"
//! description = "A helpful AI assistant."
//! instruction = "You are a helpful assistant."
//!
//! [tools]
//! enabled = ["get_current_time", "calculate"]
//! ```

pub mod assembler;
pub mod definition;
pub mod registry;

pub use assembler::assemble;
pub use definition::{AgentDefinition, AgentDescriptor, AgentMeta};
pub use registry::AgentRegistry;

/// Agent deployed and described when none is named
pub const DEFAULT_AGENT: &str = "assistant";
