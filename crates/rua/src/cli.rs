//! Clap derive structures for the `rua` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use rua_core::DocumentKind;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// rua -- drive the rua proxy manager backend from the command line
#[derive(Debug, Parser)]
#[command(
    name = "rua",
    version,
    about = "Inspect and control the rua proxy manager backend",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "RUA_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 'u', env = "RUA_URL", global = true)]
    pub url: Option<String>,

    /// Bearer token (overrides profile)
    #[arg(long, env = "RUA_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Document selector as typed on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DocumentArg {
    /// Proxy engine configuration
    Core,
    /// Runtime document (subscriptions, status, selection)
    Runtime,
}

impl From<DocumentArg> for DocumentKind {
    fn from(arg: DocumentArg) -> Self {
        match arg {
            DocumentArg::Core => DocumentKind::Core,
            DocumentArg::Runtime => DocumentKind::Runtime,
        }
    }
}

/// What `rua reload` fetches.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReloadTarget {
    Core,
    Runtime,
    /// Both documents; a failure on one does not skip the other
    All,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Asc,
    Desc,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Core status, active inbound, and selected node
    #[command(alias = "st")]
    Status,

    /// List nodes from every subscription
    #[command(alias = "ls")]
    Nodes(NodesArgs),

    /// Route traffic through a node
    Select {
        /// Node id (see `rua nodes`)
        node_id: String,
    },

    /// Probe connectivity and speed of a node
    Probe {
        /// Node id (see `rua nodes`)
        node_id: String,
    },

    /// Change the local socks inbound port and push the engine config
    SocksPort {
        port: u16,
    },

    /// Fetch a document from the backend and print it
    Reload {
        target: ReloadTarget,
    },

    /// Send a document to the backend
    Push(PushArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct NodesArgs {
    /// Sort by node name
    #[arg(long, short = 's')]
    pub sort: Option<SortArg>,
}

#[derive(Debug, Args)]
pub struct PushArgs {
    pub document: DocumentArg,

    /// JSON file to send instead of the backend's current copy
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,
    /// Print the effective configuration (tokens redacted)
    Show,
    /// Write a profile to the config file
    Init {
        /// Profile name
        #[arg(long, default_value = "default")]
        name: String,
        /// Backend URL
        #[arg(long, default_value = rua_config::DEFAULT_BACKEND_URL)]
        url: String,
        /// Make this the default profile
        #[arg(long)]
        make_default: bool,
    },
}
