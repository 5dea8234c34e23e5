use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod flags;
pub use flags::PlatformFlags;

pub const DEFAULT_DISPLAY_NAME: &str = "adk-playground-agent";
pub const DEFAULT_DESCRIPTION: &str = "Agent Engine playground agent";
pub const DEFAULT_USER_ID: &str = "user-1";

#[derive(Parser, Debug)]
#[command(name = "agent-playtime")]
#[command(
    about = "Build, deploy and query conversational agents on Vertex AI Agent Engine",
    long_about = None
)]
#[command(version = env!("AGENT_PLAYTIME_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Env file loaded before resolving configuration
    #[arg(long = "env-file", default_value = ".env", global = true)]
    pub env_file: PathBuf,

    #[command(flatten)]
    pub platform: PlatformFlags,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deploy the assistant agent to Agent Engine
    Deploy {
        /// Display name for the deployment
        #[arg(long, default_value = DEFAULT_DISPLAY_NAME)]
        name: String,

        /// Description for the agent
        #[arg(long, default_value = DEFAULT_DESCRIPTION)]
        description: String,
    },

    /// List deployed agents in the project
    List,

    /// Delete a deployed agent
    Delete {
        /// Resource name of the agent to delete
        #[arg(long)]
        name: Option<String>,
    },

    /// Query a deployed agent (interactive unless --query is given)
    Query {
        /// The resource name of the deployed agent
        #[arg(long = "resource-name")]
        resource_name: String,

        /// Single query to send
        #[arg(long)]
        query: Option<String>,

        /// User id the session is created for
        #[arg(long = "user-id", default_value = DEFAULT_USER_ID)]
        user_id: String,
    },

    /// Inspect and invoke the agent's tools locally
    Tools {
        #[command(subcommand)]
        command: ToolsCommands,
    },

    /// Print the assembled agent descriptor as JSON
    Describe {
        /// Agent definition to assemble
        #[arg(long, default_value = "assistant")]
        agent: String,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ToolsCommands {
    /// List available tools and their parameters
    List,

    /// Invoke a tool with KEY=VALUE arguments
    Call {
        /// Tool name (e.g. calculate)
        name: String,

        /// Arguments as KEY=VALUE pairs
        args: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Check that the configuration resolves
    Validate,

    /// Show effective configuration after merging all sources
    Show,
}
