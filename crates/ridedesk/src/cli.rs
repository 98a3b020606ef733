//! Clap derive structures for the `ridedesk` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ridedesk -- admin console for a ground-transport booking service
#[derive(Debug, Parser)]
#[command(
    name = "ridedesk",
    version,
    about = "Administer bookings, users, vehicles and legal pages of a booking backend",
    long_about = "Admin console for a ground-transport booking service.\n\n\
        Review customer cancellation requests and decide refunds, manage\n\
        customer accounts, the vehicle fleet with its fixed routes, and the\n\
        legal pages published on the public site.",
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
    #[arg(long, short = 'p', env = "RIDEDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend base URL (overrides profile)
    #[arg(long, short = 'b', env = "RIDEDESK_BACKEND", global = true)]
    pub backend: Option<String>,

    /// Bearer token (overrides the stored session)
    #[arg(long, env = "RIDEDESK_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "RIDEDESK_OUTPUT",
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
    #[arg(long, short = 'k', env = "RIDEDESK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (defaults to the profile setting)
    #[arg(long, env = "RIDEDESK_TIMEOUT", global = true)]
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
    /// Sign in and store the session token
    Login(LoginArgs),

    /// Remove the stored session token
    Logout,

    /// Manage customer accounts
    #[command(alias = "u")]
    Users(UsersArgs),

    /// Review bookings and decide cancellation requests
    #[command(alias = "b")]
    Bookings(BookingsArgs),

    /// Manage vehicle types, fares and fixed routes
    #[command(alias = "v")]
    Vehicles(VehiclesArgs),

    /// Manage legal pages (privacy policy, terms, about, FAQ)
    Legal(LegalArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SESSION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Admin e-mail (defaults to the profile's `email`)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Print the issued token instead of storing it in the keyring
    #[arg(long)]
    pub print_token: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  USERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Case-insensitive substring filter
    #[arg(long, short = 's')]
    pub search: Option<String>,
}

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List customer accounts
    #[command(alias = "ls")]
    List(SearchArgs),

    /// Show one account
    Get {
        /// User ID
        user: String,
    },

    /// Suspend an account (toggles its active flag on the backend)
    Suspend {
        /// User ID
        user: String,
    },

    /// Delete an account
    #[command(alias = "rm")]
    Delete {
        /// User ID
        user: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BOOKINGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BookingsArgs {
    #[command(subcommand)]
    pub command: BookingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum BookingsCommand {
    /// List bookings, ordered by trip date
    #[command(alias = "ls")]
    List(BookingListArgs),

    /// Show one booking with its state and available actions
    Get {
        /// Booking ID
        booking: String,
    },

    /// Approve a pending cancellation request and issue a refund
    Approve {
        /// Booking ID
        booking: String,

        /// Amount to refund (0 up to the booking total)
        #[arg(long, required = true, allow_hyphen_values = true)]
        refund: String,

        /// Comment shown to the customer (max 500 characters)
        #[arg(long, short = 'm', required = true)]
        comment: String,
    },

    /// Reject a pending cancellation request
    Reject {
        /// Booking ID
        booking: String,

        /// Comment shown to the customer (max 500 characters)
        #[arg(long, short = 'm', required = true)]
        comment: String,
    },

    /// E-mail the booking's customer
    Email {
        /// Booking ID
        booking: String,

        /// Subject (defaults to "Trip Update - {from} to {to}")
        #[arg(long)]
        subject: Option<String>,

        /// Message body (defaults to a greeting naming the trip date)
        #[arg(long)]
        message: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct BookingListArgs {
    #[command(flatten)]
    pub search: SearchArgs,

    /// Only bookings in this lifecycle state
    #[arg(long)]
    pub state: Option<StateFilter>,

    /// Page requested from the backend
    #[arg(long)]
    pub page: Option<u32>,

    /// Page size requested from the backend
    #[arg(long)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StateFilter {
    /// Confirmed and not cancelled
    Active,
    /// Customer asked to cancel; awaiting a decision
    CancelRequested,
    /// Cancellation approved
    CancelApproved,
    /// Cancellation rejected
    CancelRejected,
    /// Trip completed
    Completed,
    /// Cancelled without a request
    Cancelled,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  VEHICLES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct VehiclesArgs {
    #[command(subcommand)]
    pub command: VehiclesCommand,
}

#[derive(Debug, Subcommand)]
pub enum VehiclesCommand {
    /// List vehicle types with fleet statistics
    #[command(alias = "ls")]
    List(SearchArgs),

    /// List the fixed routes of a vehicle type
    Routes {
        /// Vehicle ID
        vehicle: String,
    },

    /// Create a vehicle type
    Create {
        /// Vehicle type name (e.g. "Van")
        #[arg(long = "type", short = 't', required = true)]
        vehicle_type: String,

        /// Base fare
        #[arg(long, required = true, allow_negative_numbers = true)]
        price: f64,
    },

    /// Update a vehicle type's fares
    Update {
        /// Vehicle ID
        vehicle: String,

        /// Base fare
        #[arg(long, required = true, allow_negative_numbers = true)]
        price: f64,

        /// Fare per kilometre
        #[arg(long, required = true, allow_negative_numbers = true)]
        price_per_km: f64,
    },

    /// Set the flat price of a fixed route
    RoutePrice {
        /// Route ID
        route: String,

        /// Flat price
        #[arg(long, required = true, allow_negative_numbers = true)]
        price: f64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LEGAL
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LegalArgs {
    #[command(subcommand)]
    pub command: LegalCommand,
}

#[derive(Debug, Subcommand)]
pub enum LegalCommand {
    /// List legal pages
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        search: SearchArgs,

        /// Read the public listing without a session
        #[arg(long)]
        public: bool,
    },

    /// Show one page with its full content
    Get {
        /// Page ID
        page: String,
    },

    /// Create a legal page
    Create(LegalPageArgs),

    /// Replace a legal page
    Update {
        /// Page ID
        page: String,

        #[command(flatten)]
        fields: LegalPageArgs,
    },
}

#[derive(Debug, Args)]
pub struct LegalPageArgs {
    /// Display title
    #[arg(long, required = true)]
    pub title: String,

    /// Page kind: privacy, terms, about, faq (anything else is listed as a legal document)
    #[arg(long, required = true)]
    pub page_title: String,

    /// Content language code (e.g. "en")
    #[arg(long, required = true)]
    pub language: String,

    /// Page content
    #[arg(long, conflicts_with = "content_file", required_unless_present = "content_file")]
    pub content: Option<String>,

    /// Read the page content from a file
    #[arg(long)]
    pub content_file: Option<PathBuf>,
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

    /// Display current configuration (secrets masked)
    Show,

    /// Set a configuration value
    Set {
        /// Config key (dot-separated path, e.g., "profiles.prod.backend")
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
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
