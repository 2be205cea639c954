//! Command-line interface definition.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use courtside_core::{DEFAULT_NEXT_SLOT_COUNT, FetchAvailabilityParams, TracingOutputFormat};

/// courtside - when is this court bookable?
#[derive(Debug, Parser)]
#[command(name = "courtside")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "COURTSIDE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Log format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormat> for TracingOutputFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
            LogFormat::Json => Self::Json,
        }
    }
}

/// Dates and external site shared by the fetch commands.
#[derive(Debug, Clone, Args)]
pub struct DateArgs {
    /// Date to fetch, YYYY-MM-DD (can be repeated)
    #[arg(long = "date", required = true, action = clap::ArgAction::Append)]
    pub dates: Vec<NaiveDate>,

    /// Numeric site id in the external booking system
    #[arg(long)]
    pub site_id: Option<i64>,
}

impl DateArgs {
    pub fn to_params(&self) -> FetchAvailabilityParams {
        FetchAvailabilityParams::new(self.dates.clone()).with_site_id(self.site_id)
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch availability through an external provider
    Availability {
        /// Provider config id
        provider_id: String,

        #[command(flatten)]
        dates: DateArgs,
    },

    /// Fetch today's (and optionally tomorrow's) availability from a provider
    Today {
        /// Provider config id
        provider_id: String,

        /// Facility id in the external system
        #[arg(long)]
        facility_external_id: Option<String>,

        /// Fetch today only (tomorrow is included by default)
        #[arg(long = "no-tomorrow", action = clap::ArgAction::SetFalse)]
        include_tomorrow: bool,
    },

    /// Fetch availability from a facility's local templates
    Local {
        /// Facility id
        facility_id: String,

        /// Date to fetch, YYYY-MM-DD (can be repeated)
        #[arg(long = "date", required = true, action = clap::ArgAction::Append)]
        dates: Vec<NaiveDate>,
    },

    /// Report whether a facility has local templates
    HasTemplates {
        /// Facility id
        facility_id: String,
    },

    /// Resolve availability from local templates or the facility's provider
    Resolve {
        /// Facility id
        facility_id: String,

        /// Provider config id used when the facility has no templates
        #[arg(long)]
        provider: Option<String>,

        #[command(flatten)]
        dates: DateArgs,
    },

    /// Show the next upcoming slots for a facility
    Next {
        /// Facility id
        facility_id: String,

        /// Provider config id used when the facility has no templates
        #[arg(long)]
        provider: Option<String>,

        #[command(flatten)]
        dates: DateArgs,

        /// Number of slots to show
        #[arg(long, short = 'n', default_value_t = DEFAULT_NEXT_SLOT_COUNT)]
        count: usize,
    },

    /// List provider types compiled into this build
    Providers,

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
