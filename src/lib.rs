#![forbid(unsafe_code)]

pub mod agents;
pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod platform;
pub mod tools;
pub mod utils;
