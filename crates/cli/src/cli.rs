use std::path::PathBuf;

use chrono::NaiveDate;
use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use sprout_core::dates::parse_timestamp;
use sprout_core::models::notification::{DEFAULT_ICON, ICON_OPTIONS};
use sprout_core::models::NotificationView;
use sprout_core::types::{DbId, Timestamp};

#[derive(Parser, Debug)]
#[command(name = "sprout")]
#[command(about = "Track microgreen lots, growth journals and care reminders")]
pub struct Cli {
    /// API base URL (overrides SPROUT_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,
    /// Device storage directory (overrides SPROUT_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account and sign in
    Register(RegisterArgs),
    /// Sign in and store the token
    Login(LoginArgs),
    /// Forget the stored token
    Logout,
    /// Show whether a session is active
    Whoami,
    /// Browse the plant catalog
    Catalog {
        /// Case-insensitive name filter
        #[arg(long)]
        search: Option<String>,
    },
    #[command(subcommand)]
    Lots(LotsCommand),
    #[command(subcommand)]
    Journal(JournalCommand),
    #[command(subcommand)]
    Notifications(NotificationsCommand),
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(short, long)]
    pub email: String,
    #[arg(short, long)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(short, long)]
    pub email: String,
    #[arg(short, long)]
    pub password: String,
    /// Must repeat the password
    #[arg(long)]
    pub confirm: String,
}

/// Growing lots
#[derive(Subcommand, Debug)]
pub enum LotsCommand {
    List,
    Create(CreateLotArgs),
    Delete {
        #[arg(long)]
        id: DbId,
    },
}

#[derive(Args, Debug)]
pub struct CreateLotArgs {
    /// Catalog id of the plant
    #[arg(long = "plant")]
    pub microgreen_id: DbId,
    #[arg(long, value_parser = parse_when)]
    pub sowing_date: Timestamp,
    #[arg(long, value_parser = parse_when)]
    pub harvest_date: Timestamp,
    #[arg(long)]
    pub substrate: String,
}

/// Phenological journal of a lot
#[derive(Subcommand, Debug)]
pub enum JournalCommand {
    List {
        #[arg(long)]
        lot: DbId,
    },
    Add(EntryArgs),
    Delete {
        #[arg(long)]
        lot: DbId,
        #[arg(long)]
        id: String,
    },
    /// Move the journal kept by earlier app versions into a lot
    AdoptLegacy {
        #[arg(long)]
        lot: DbId,
    },
}

#[derive(Args, Debug)]
pub struct EntryArgs {
    #[arg(long)]
    pub lot: DbId,
    /// Plant height in cm
    #[arg(long, default_value = "")]
    pub height: String,
    /// What changed since the last entry
    #[arg(long, default_value = "")]
    pub changes: String,
    #[arg(long, default_value = "")]
    pub watering: String,
    #[arg(long, default_value = "")]
    pub lighting: String,
    /// Photo URI
    #[arg(long)]
    pub image: Option<String>,
    /// Entry date, defaults to today
    #[arg(long, value_parser = parse_day)]
    pub date: Option<NaiveDate>,
}

/// Care reminders
#[derive(Subcommand, Debug)]
pub enum NotificationsCommand {
    List {
        #[arg(long, value_enum)]
        view: Option<ViewArg>,
    },
    Add(ReminderArgs),
    Toggle {
        #[arg(long)]
        id: String,
    },
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Merge reminders from the server
    Sync,
}

#[derive(Args, Debug)]
pub struct ReminderArgs {
    #[arg(long, default_value = "")]
    pub title: String,
    #[arg(long, default_value = "")]
    pub message: String,
    #[arg(long, default_value = DEFAULT_ICON, value_parser = PossibleValuesParser::new(ICON_OPTIONS.iter().copied()))]
    pub icon: String,
    /// When to remind, defaults to a day from now
    #[arg(long, value_parser = parse_when)]
    pub at: Option<Timestamp>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewArg {
    Upcoming,
    Completed,
}

impl From<ViewArg> for NotificationView {
    fn from(view: ViewArg) -> Self {
        match view {
            ViewArg::Upcoming => NotificationView::Upcoming,
            ViewArg::Completed => NotificationView::Completed,
        }
    }
}

fn parse_when(raw: &str) -> Result<Timestamp, String> {
    parse_timestamp(raw).ok_or_else(|| format!("expected an ISO 8601 date or date-time, got `{raw}`"))
}

fn parse_day(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("expected YYYY-MM-DD, got `{raw}`"))
}
