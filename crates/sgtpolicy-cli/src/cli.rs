//! Clap derive structures for the `sgtpolicy` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// sgtpolicy -- manage DNA Center security groups, contracts, and policies
#[derive(Debug, Parser)]
#[command(
    name = "sgtpolicy",
    version,
    about = "Manage Cisco DNA Center group-based policy from the command line",
    long_about = "A CLI for administering TrustSec security groups (SGTs), access\n\
        contracts, and group-based access policies on Cisco DNA Center,\n\
        via the northbound customer-facing-service and ACA controller APIs.",
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
    /// Controller profile to use
    #[arg(long, short = 'p', env = "DNAC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller URL (overrides profile)
    #[arg(long, short = 'c', env = "DNAC_CONTROLLER", global = true)]
    pub controller: Option<String>,

    /// Username (overrides profile)
    #[arg(long, short = 'u', env = "DNAC_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password
    #[arg(long, env = "DNAC_PASSWORD", global = true, hide_env = true)]
    pub password: Option<String>,

    /// Auth scheme: "ticket" or "jwt" (overrides profile)
    #[arg(long, global = true)]
    pub auth_scheme: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "DNAC_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "DNAC_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (default 60)
    #[arg(long, env = "DNAC_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage security groups (SGTs)
    #[command(alias = "sg")]
    Sgt(SgtArgs),

    /// Manage access contracts
    #[command(alias = "ct")]
    Contract(ContractArgs),

    /// Manage group-based access policies
    #[command(alias = "pol")]
    Policy(PolicyArgs),

    /// Push and deploy policy to the network
    Deploy(DeployArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SGT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SgtArgs {
    #[command(subcommand)]
    pub command: SgtCommand,
}

#[derive(Debug, Subcommand)]
pub enum SgtCommand {
    /// List all security groups
    #[command(alias = "ls")]
    List,

    /// Show a single security group
    #[command(alias = "get")]
    Show {
        /// Group name
        name: String,
    },

    /// Create a security group
    Create {
        /// Group name
        name: String,

        /// Tag number (1-65519)
        #[arg(long, short = 't')]
        tag: u32,

        /// Description
        #[arg(long, short = 'd', default_value = "")]
        description: String,

        /// Virtual networks to attach (defaults to DEFAULT_VN)
        #[arg(long = "vn")]
        virtual_networks: Vec<String>,
    },

    /// Update an existing security group
    Update {
        /// Group name
        name: String,

        /// New tag number
        #[arg(long, short = 't')]
        tag: Option<u32>,

        /// New description
        #[arg(long, short = 'd')]
        description: Option<String>,

        /// Enable or disable ACI propagation
        #[arg(long)]
        propagate_to_aci: Option<bool>,

        /// Virtual networks to (re)attach
        #[arg(long = "vn")]
        virtual_networks: Vec<String>,
    },

    /// Delete a security group (by name, or by tag with --tag)
    #[command(alias = "rm")]
    Delete {
        /// Group name (omit when using --tag)
        name: Option<String>,

        /// Delete by tag number instead of name
        #[arg(long, short = 't', conflicts_with = "name")]
        tag: Option<u32>,
    },

    /// Attach a security group to virtual networks
    AttachVn {
        /// Group name
        name: String,

        /// Virtual network names
        #[arg(required = true)]
        virtual_networks: Vec<String>,
    },

    /// Show the total security group count
    Count,

    /// Check that the named groups exist (or don't, with --absent)
    Check {
        /// Group names
        #[arg(required = true)]
        names: Vec<String>,

        /// Expect the groups to be absent instead of present
        #[arg(long)]
        absent: bool,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONTRACT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ContractArgs {
    #[command(subcommand)]
    pub command: ContractCommand,
}

#[derive(Debug, Subcommand)]
pub enum ContractCommand {
    /// List all access contracts
    #[command(alias = "ls")]
    List,

    /// Show a single contract
    #[command(alias = "get")]
    Show {
        /// Contract name
        name: String,
    },

    /// Create an access contract
    Create {
        /// Contract name
        name: String,

        /// Description
        #[arg(long, short = 'd', default_value = "")]
        description: String,

        /// Default clause action when no file is given
        #[arg(long, value_enum, default_value = "permit", conflicts_with = "file")]
        action: ClauseAction,

        /// Read the full contract definition from a JSON file
        #[arg(long, short = 'f')]
        file: Option<PathBuf>,
    },

    /// Update a contract from a JSON definition file
    Update {
        /// Contract name
        name: String,

        /// JSON file with the new contract definition
        #[arg(long, short = 'f')]
        file: PathBuf,
    },

    /// Delete a contract
    #[command(alias = "rm")]
    Delete {
        /// Contract name
        name: String,
    },

    /// Delete all non-reserved contracts
    DeleteAll {
        /// Additional contract names to keep
        #[arg(long = "exclude")]
        exclusions: Vec<String>,
    },

    /// Show the total contract count
    Count,

    /// Check that the named contracts exist (or don't, with --absent)
    Check {
        /// Contract names
        #[arg(required = true)]
        names: Vec<String>,

        /// Expect the contracts to be absent instead of present
        #[arg(long)]
        absent: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ClauseAction {
    Permit,
    Deny,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  POLICY
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PolicyArgs {
    #[command(subcommand)]
    pub command: PolicyCommand,
}

#[derive(Debug, Subcommand)]
pub enum PolicyCommand {
    /// List all policies (producer-consumer pairs with contracts)
    #[command(alias = "ls")]
    List,

    /// Create a policy binding producer and consumer groups to a contract
    Create {
        /// Policy name
        name: String,

        /// Producer (source) security group name
        producer: String,

        /// Consumer (destination) security group name
        consumer: String,

        /// Contract name
        contract: String,
    },

    /// Update the policy between two groups
    Update {
        /// Producer (source) security group name
        producer: String,

        /// Consumer (destination) security group name
        consumer: String,

        /// New policy mode
        #[arg(long, value_enum)]
        mode: Option<PolicyModeArg>,

        /// Switch to a different contract
        #[arg(long)]
        contract: Option<String>,
    },

    /// Delete the policy between two groups
    #[command(alias = "rm")]
    Delete {
        /// Producer (source) security group name
        producer: String,

        /// Consumer (destination) security group name
        consumer: String,
    },

    /// Show the total policy count
    Count,

    /// Check that the named policies exist (or don't, with --absent)
    Check {
        /// Policy names as producer-consumer pairs
        #[arg(required = true)]
        names: Vec<String>,

        /// Expect the policies to be absent instead of present
        #[arg(long)]
        absent: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PolicyModeArg {
    Enabled,
    Disabled,
    Monitor,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DEPLOY
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DeployArgs {
    #[command(subcommand)]
    pub command: DeployCommand,
}

#[derive(Debug, Subcommand)]
pub enum DeployCommand {
    /// Push security groups to the network (ACA pushSGs)
    Push {
        /// Deploy status to accept
        #[arg(long, value_enum, default_value = "done")]
        verify: VerifyArg,
    },

    /// Run a full group-based-policy deploy (ACA deploy)
    Run {
        /// Deploy status to accept
        #[arg(long, value_enum, default_value = "any")]
        verify: VerifyArg,

        /// Number of attempts before giving up on transient failures
        #[arg(long, default_value = "2")]
        attempts: u32,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum VerifyArg {
    /// Require deployStatus=DONE
    Done,
    /// Require deployStatus=NO_REQUEST_AVAILABLE
    NoRequest,
    /// Accept either terminal status
    Any,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show the current configuration (secrets redacted)
    Show,

    /// Create a config file with an initial profile
    Init {
        /// Controller base URL
        #[arg(long)]
        controller: String,

        /// Profile name for the initial profile
        #[arg(long, default_value = "default")]
        profile: String,

        /// Username
        #[arg(long)]
        username: Option<String>,

        /// Auth scheme: "ticket" or "jwt"
        #[arg(long, default_value = "jwt")]
        auth_scheme: String,

        /// Accept self-signed certificates
        #[arg(long)]
        insecure: Option<bool>,
    },

    /// Create or update a profile
    Set {
        /// Profile name
        profile: String,

        /// Controller base URL
        #[arg(long)]
        controller: Option<String>,

        /// Username
        #[arg(long)]
        username: Option<String>,

        /// Auth scheme: "ticket" or "jwt"
        #[arg(long)]
        auth_scheme: Option<String>,

        /// Accept self-signed certificates
        #[arg(long)]
        insecure: Option<bool>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Store a profile's password in the system keyring
    SetPassword {
        /// Profile name
        profile: String,

        /// Password (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Set the default profile
    Use {
        /// Profile name
        profile: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
