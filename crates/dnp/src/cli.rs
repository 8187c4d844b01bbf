//! Clap derive structures for the `dnp` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! This file is also compiled by `build.rs` for man page generation, so it
//! may only depend on `clap` and `clap_complete`.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// dnp -- keep artists you don't want to hear off your streaming accounts
#[derive(Debug, Parser)]
#[command(
    name = "dnp",
    version,
    about = "Manage your do-not-play artist blocklist from the command line",
    long_about = "Search the artist catalog, maintain a personal do-not-play list,\n\
        subscribe to offense categories and enforce blocks on connected\n\
        streaming platforms.",
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
    #[arg(long, short = 'p', env = "DNP_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 'u', env = "DNP_URL", global = true)]
    pub url: Option<String>,

    /// API token (overrides keyring and profile)
    #[arg(long, env = "DNP_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "DNP_OUTPUT",
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
    #[arg(long, short = 'k', env = "DNP_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "DNP_TIMEOUT", default_value = "30", global = true)]
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

// ── Domain value enums ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SeverityArg {
    Minor,
    Moderate,
    Severe,
    Egregious,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EvidenceTierArg {
    A,
    B,
    C,
    D,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportTypeArg {
    BlocklistSummary,
    EnforcementHistory,
    CategoryBreakdown,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportFormatArg {
    Json,
    Csv,
    Pdf,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search the artist catalog and inspect artist profiles
    #[command(alias = "a")]
    Artists(ArtistsArgs),

    /// Manage your personal do-not-play list
    #[command(alias = "bl")]
    Blocklist(BlocklistArgs),

    /// Browse and subscribe to offense categories
    #[command(alias = "cat")]
    Categories(CategoriesArgs),

    /// Keep specific category-blocked artists playable
    #[command(alias = "exc")]
    Exceptions(ExceptionsArgs),

    /// Browse and report documented offenses
    Offenses(OffensesArgs),

    /// View and manage streaming platform connections
    #[command(alias = "conn")]
    Connections(ConnectionsArgs),

    /// Inspect and trigger blocklist syncs
    Sync(SyncArgs),

    /// Dashboard statistics, trends and reports
    #[command(alias = "stats")]
    Analytics(AnalyticsArgs),

    /// Log in, log out and show the signed-in account
    Auth(AuthArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ARTISTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ArtistsArgs {
    #[command(subcommand)]
    pub command: ArtistsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ArtistsCommand {
    /// Search artists by name
    #[command(alias = "s")]
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(long, short = 'l', default_value = "20")]
        limit: u32,
    },

    /// Show an artist profile with documented offenses
    Get {
        /// Artist ID
        artist: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BLOCKLIST
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BlocklistArgs {
    #[command(subcommand)]
    pub command: BlocklistCommand,
}

#[derive(Debug, Subcommand)]
pub enum BlocklistCommand {
    /// List artists on your do-not-play list
    #[command(alias = "ls")]
    List,

    /// Show everything currently blocked (direct and via categories)
    Effective,

    /// Add an artist to your do-not-play list
    Add {
        /// Artist ID
        artist: String,

        /// Tag to attach (repeatable)
        #[arg(long = "tag", short = 't')]
        tags: Vec<String>,

        /// Free-form note
        #[arg(long)]
        note: Option<String>,

        /// Wait until enforcement finishes on every platform
        #[arg(long, short = 'w')]
        wait: bool,
    },

    /// Remove an artist from your do-not-play list
    #[command(alias = "rm")]
    Remove {
        /// Artist ID
        artist: String,

        /// Wait until enforcement finishes on every platform
        #[arg(long, short = 'w')]
        wait: bool,
    },

    /// Change the tags or note of an entry
    Update {
        /// Artist ID
        artist: String,

        /// Replace tags (repeatable)
        #[arg(long = "tag", short = 't')]
        tags: Option<Vec<String>>,

        /// Replace the note
        #[arg(long)]
        note: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CATEGORIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    pub command: CategoriesCommand,
}

#[derive(Debug, Subcommand)]
pub enum CategoriesCommand {
    /// List offense categories and subscription state
    #[command(alias = "ls")]
    List,

    /// List the artists in a category
    Members {
        /// Category ID
        category: String,
    },

    /// Block every artist in a category
    Subscribe {
        /// Category ID
        category: String,

        /// Wait until enforcement finishes on every platform
        #[arg(long, short = 'w')]
        wait: bool,
    },

    /// Stop blocking a category's artists
    Unsubscribe {
        /// Category ID
        category: String,

        /// Wait until enforcement finishes on every platform
        #[arg(long, short = 'w')]
        wait: bool,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  EXCEPTIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ExceptionsArgs {
    #[command(subcommand)]
    pub command: ExceptionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ExceptionsCommand {
    /// List artists excepted from category blocks
    #[command(alias = "ls")]
    List,

    /// Keep a category-blocked artist playable
    Add {
        /// Artist ID
        artist: String,
    },

    /// Block an excepted artist again
    #[command(alias = "rm")]
    Remove {
        /// Artist ID
        artist: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  OFFENSES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct OffensesArgs {
    #[command(subcommand)]
    pub command: OffensesCommand,
}

#[derive(Debug, Subcommand)]
pub enum OffensesCommand {
    /// List documented offenses
    #[command(alias = "ls")]
    List {
        /// Only offenses of this artist
        #[arg(long)]
        artist: Option<String>,

        /// Only offenses in this category
        #[arg(long)]
        category: Option<String>,

        /// Only offenses of this severity
        #[arg(long, value_enum)]
        severity: Option<SeverityArg>,

        /// Maximum number of results
        #[arg(long, short = 'l')]
        limit: Option<u32>,
    },

    /// Show an offense with its evidence
    Get {
        /// Offense ID
        offense: String,
    },

    /// Submit a new offense report
    Report {
        /// Artist ID
        #[arg(long)]
        artist: String,

        /// Offense category
        #[arg(long)]
        category: String,

        /// Severity
        #[arg(long, value_enum)]
        severity: SeverityArg,

        /// Short title
        #[arg(long)]
        title: String,

        /// Longer description
        #[arg(long)]
        description: Option<String>,

        /// Incident date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Evidence URL (repeatable)
        #[arg(long = "evidence", short = 'e')]
        evidence: Vec<String>,
    },

    /// Attach evidence to an existing offense
    AddEvidence {
        /// Offense ID
        offense: String,

        /// Source URL
        #[arg(long)]
        url: String,

        /// Article or document title
        #[arg(long)]
        title: Option<String>,

        /// Publisher name
        #[arg(long)]
        source: Option<String>,

        /// Credibility tier of the source
        #[arg(long, value_enum)]
        tier: Option<EvidenceTierArg>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONNECTIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConnectionsArgs {
    #[command(subcommand)]
    pub command: ConnectionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConnectionsCommand {
    /// List platform connections and their health
    #[command(alias = "ls")]
    List,

    /// Disconnect a streaming platform
    Disconnect {
        /// Platform name (spotify, apple_music, tidal, ...)
        platform: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SYNC
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SyncArgs {
    #[command(subcommand)]
    pub command: SyncCommand,
}

#[derive(Debug, Subcommand)]
pub enum SyncCommand {
    /// Per-platform sync status
    Status,

    /// Recent sync runs
    Runs {
        /// Maximum number of runs
        #[arg(long, short = 'l', default_value = "20")]
        limit: u32,
    },

    /// Start a sync
    Trigger {
        /// Platform to sync (repeatable; default: all connected)
        #[arg(long = "platform")]
        platforms: Vec<String>,

        /// Re-sync everything instead of only changes
        #[arg(long)]
        full: bool,
    },

    /// Cancel a pending or running sync
    Cancel {
        /// Sync run ID
        run: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ANALYTICS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AnalyticsArgs {
    #[command(subcommand)]
    pub command: AnalyticsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AnalyticsCommand {
    /// Blocklist statistics
    Dashboard,

    /// Daily block/unblock counts
    Trends {
        /// Number of days to include
        #[arg(long, short = 'd', default_value = "30")]
        days: u32,
    },

    /// Request a report
    Report {
        /// Report type
        #[arg(long = "type", value_enum, default_value = "blocklist-summary")]
        report_type: ReportTypeArg,

        /// Output format of the report
        #[arg(long, value_enum, default_value = "json")]
        format: ReportFormatArg,

        /// Limit the report to the last N days
        #[arg(long, short = 'd')]
        days: Option<u32>,
    },

    /// Check the status of a requested report
    ReportStatus {
        /// Report ID
        report: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Log in with email and password and store the session token
    Login {
        /// Account email (prompted when omitted)
        #[arg(long)]
        email: Option<String>,
    },

    /// Forget the stored session token
    Logout,

    /// Show the signed-in account
    Whoami,
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
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a configuration value
    Set {
        /// Config key (dot-separated path, e.g., "profiles.home.url")
        key: String,

        /// Value to set
        value: String,
    },

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

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
