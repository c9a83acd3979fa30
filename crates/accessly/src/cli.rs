//! Clap derive structures for the `accessly` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// accessly -- manage a UniFi Access controller from the command line
#[derive(Debug, Parser)]
#[command(
    name = "accessly",
    version,
    about = "Manage UniFi Access door controllers from the command line",
    long_about = "A CLI for UniFi Access controllers: users, visitors, doors,\n\
        devices, access policies, and a live event stream over the\n\
        developer API.",
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
    #[arg(long, short = 'p', env = "ACCESSLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller hostname or IP (overrides profile)
    #[arg(long, short = 'H', env = "ACCESSLY_HOST", global = true)]
    pub host: Option<String>,

    /// API token
    #[arg(long, env = "ACCESSLY_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// API port
    #[arg(long, env = "ACCESSLY_PORT", global = true)]
    pub port: Option<u16>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ACCESSLY_OUTPUT",
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

    /// Verify TLS certificates (off by default -- controllers are
    /// typically self-signed)
    #[arg(long, env = "ACCESSLY_VERIFY_TLS", global = true)]
    pub verify_tls: bool,

    /// Request timeout in seconds
    #[arg(long, env = "ACCESSLY_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
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
    /// YAML
    Yaml,
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
    /// Manage users
    #[command(alias = "u")]
    Users(UsersArgs),

    /// Manage visitors
    #[command(alias = "v")]
    Visitors(VisitorsArgs),

    /// View doors
    #[command(alias = "d")]
    Doors(DoorsArgs),

    /// View devices (hubs, readers, cameras)
    #[command(alias = "dev")]
    Devices(DevicesArgs),

    /// Manage door groups
    DoorGroups(DoorGroupsArgs),

    /// Manage access policies
    #[command(alias = "pol")]
    Policies(PoliciesArgs),

    /// Stream live events
    Events(EventsArgs),

    /// Probe which API endpoints this controller exposes
    Probe(ProbeArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Shared pagination arguments for all list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Max results to return
    #[arg(long, short = 'l', default_value = "100")]
    pub limit: u32,

    /// Pagination offset
    #[arg(long, default_value = "0")]
    pub offset: u32,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  USERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List users
    #[command(alias = "ls")]
    List(ListArgs),

    /// Get user details
    Get {
        /// User ID
        id: String,
    },

    /// Create a new user
    Create {
        /// First name
        #[arg(long, required = true)]
        first_name: String,

        /// Last name
        #[arg(long, required = true)]
        last_name: String,

        /// Email address
        #[arg(long)]
        email: Option<String>,

        /// Phone number
        #[arg(long)]
        phone: Option<String>,

        /// Role
        #[arg(long, default_value = "user", value_enum)]
        role: RoleArg,

        /// Access policy IDs to attach (comma-separated)
        #[arg(long, value_delimiter = ',')]
        policies: Option<Vec<String>>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Admin,
    User,
    Visitor,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  VISITORS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct VisitorsArgs {
    #[command(subcommand)]
    pub command: VisitorsCommand,
}

#[derive(Debug, Subcommand)]
pub enum VisitorsCommand {
    /// List visitors
    #[command(alias = "ls")]
    List(ListArgs),

    /// Get visitor details
    Get {
        /// Visitor ID
        id: String,
    },

    /// Create a visitor with a bounded access window
    Create {
        /// First name
        #[arg(long, required = true)]
        first_name: String,

        /// Last name
        #[arg(long, required = true)]
        last_name: String,

        /// Window start (RFC 3339; defaults to now)
        #[arg(long)]
        start: Option<String>,

        /// Window length in hours from start
        #[arg(long, default_value = "8")]
        hours: u32,

        /// Email address
        #[arg(long)]
        email: Option<String>,

        /// Phone number
        #[arg(long)]
        phone: Option<String>,

        /// Access policy IDs to attach (comma-separated)
        #[arg(long, value_delimiter = ',')]
        policies: Option<Vec<String>>,

        /// Sponsoring user ID
        #[arg(long)]
        sponsor: Option<String>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Update a visitor
    Update {
        /// Visitor ID
        id: String,

        /// New window end (RFC 3339)
        #[arg(long)]
        end: Option<String>,

        /// Activate or deactivate the visit
        #[arg(long, action = clap::ArgAction::Set)]
        active: Option<bool>,

        /// Replace the notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a visitor
    Delete {
        /// Visitor ID
        id: String,
    },

    /// Assign (or replace) a visitor's PIN code
    SetPin {
        /// Visitor ID
        id: String,

        /// PIN code (4-8 digits)
        pin: String,
    },

    /// Enrol an NFC card for a visitor
    AddCard {
        /// Visitor ID
        id: String,

        /// NFC card number
        card_number: String,

        /// Facility code
        #[arg(long)]
        facility_code: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DOORS / DEVICES / GROUPS / POLICIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DoorsArgs {
    #[command(subcommand)]
    pub command: DoorsCommand,
}

#[derive(Debug, Subcommand)]
pub enum DoorsCommand {
    /// List doors
    #[command(alias = "ls")]
    List(ListArgs),

    /// Get door details
    Get {
        /// Door ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List devices
    #[command(alias = "ls")]
    List(ListArgs),

    /// Get device details
    Get {
        /// Device ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct DoorGroupsArgs {
    #[command(subcommand)]
    pub command: DoorGroupsCommand,
}

#[derive(Debug, Subcommand)]
pub enum DoorGroupsCommand {
    /// List door groups
    #[command(alias = "ls")]
    List(ListArgs),

    /// Create a door group
    Create {
        /// Group name
        #[arg(long, required = true)]
        name: String,

        /// Description
        #[arg(long)]
        description: Option<String>,

        /// Door IDs to include (comma-separated)
        #[arg(long, value_delimiter = ',')]
        doors: Option<Vec<String>>,
    },
}

#[derive(Debug, Args)]
pub struct PoliciesArgs {
    #[command(subcommand)]
    pub command: PoliciesCommand,
}

#[derive(Debug, Subcommand)]
pub enum PoliciesCommand {
    /// List access policies
    #[command(alias = "ls")]
    List(ListArgs),

    /// Get access policy details
    Get {
        /// Policy ID
        id: String,
    },

    /// Create an access policy
    Create {
        /// Policy name
        #[arg(long, required = true)]
        name: String,

        /// Description
        #[arg(long)]
        description: Option<String>,

        /// Schedule ID to apply
        #[arg(long)]
        schedule: Option<String>,

        /// Door IDs (comma-separated)
        #[arg(long, value_delimiter = ',')]
        doors: Option<Vec<String>>,

        /// Door group IDs (comma-separated)
        #[arg(long, value_delimiter = ',')]
        door_groups: Option<Vec<String>>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  EVENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: EventsCommand,
}

#[derive(Debug, Subcommand)]
pub enum EventsCommand {
    /// Stream real-time events until interrupted
    Watch {
        /// Event types to subscribe to (comma-separated; default: all)
        #[arg(long, value_delimiter = ',')]
        types: Option<Vec<String>>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROBE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Additional endpoint paths to try (on top of the built-in sweep)
    #[arg(long, value_delimiter = ',')]
    pub paths: Option<Vec<String>>,

    /// Show failures for every probed endpoint, not just hits
    #[arg(long)]
    pub all: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG / COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store an API token in the system keyring
    SetToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
