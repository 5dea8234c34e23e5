//! Subcommand implementations.
//!
//! Platform commands are generic over [`AgentEngine`](crate::platform::AgentEngine)
//! and write through an injected [`Printer`](crate::console::Printer), so they
//! run unchanged against the REST client or an in-memory fake.

pub mod config;
pub mod delete;
pub mod deploy;
pub mod describe;
pub mod list;
pub mod query;
pub mod tools;
