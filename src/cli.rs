use crate::domain::models::{Status, TrackingType};
use crate::services::status::parse_date;
use crate::services::store::DEFAULT_PERIODICITY_MONTHS;
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "regutrack", version, about = "ReguTrack compliance tracker CLI")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        help = "Directory holding the state file (default: ~/.config/regutrack)"
    )]
    pub data_dir: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        value_parser = parse_iso_date,
        help = "Evaluate statuses as of this date (YYYY-MM-DD) instead of today"
    )]
    pub today: Option<NaiveDate>,
    #[arg(short, long, global = true, action = ArgAction::Count, help = "Increase log verbosity")]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compliance overview: status per requirement and totals
    Dashboard {
        #[arg(long, help = "Show chart values as percentages")]
        percent: bool,
        #[arg(long, value_enum, help = "Only list rows with this status")]
        status: Option<Status>,
    },
    /// Details of one requirement
    Show { requirement: String },
    Requirement {
        #[command(subcommand)]
        command: RequirementCommands,
    },
    Verifier {
        #[command(subcommand)]
        command: VerifierCommands,
    },
    /// Write every requirement to a spreadsheet backup
    Export {
        #[arg(long, help = "Output file (default: ReguTrack_Backup_<date>.xlsx)")]
        out: Option<PathBuf>,
    },
    /// Write an example import spreadsheet
    Template {
        #[arg(long, help = "Output file (default: ReguTrack_Modele_Import.xlsx)")]
        out: Option<PathBuf>,
    },
    /// Add requirements from a spreadsheet (.xlsx, .xls, .ods)
    Import { file: PathBuf },
    /// Replace all data with the demo dataset
    Reset {
        #[arg(long)]
        yes: bool,
    },
    /// Show the (read-only) alert mail settings
    Settings,
}

#[derive(Subcommand, Debug)]
pub enum RequirementCommands {
    List,
    Add {
        #[arg(long)]
        designation: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, value_enum, default_value_t = TrackingType::Periodic)]
        tracking: TrackingType,
        #[arg(long, value_parser = parse_iso_date)]
        last_date: NaiveDate,
        #[arg(
            long,
            default_value_t = DEFAULT_PERIODICITY_MONTHS,
            help = "Months between checks (periodic only)"
        )]
        periodicity: u32,
        #[arg(long, help = "Verifier id or name")]
        verifier: String,
    },
    Update {
        id: String,
        #[arg(long)]
        designation: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_enum)]
        tracking: Option<TrackingType>,
        #[arg(long, value_parser = parse_iso_date)]
        last_date: Option<NaiveDate>,
        #[arg(long)]
        periodicity: Option<u32>,
        #[arg(long, help = "Verifier id or name")]
        verifier: Option<String>,
    },
    Remove {
        id: String,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum VerifierCommands {
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, help = "Internal team rather than an external body")]
        internal: bool,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        internal: Option<bool>,
    },
    Remove {
        id: String,
        #[arg(long)]
        yes: bool,
    },
}

fn parse_iso_date(raw: &str) -> Result<NaiveDate, String> {
    parse_date(raw).ok_or_else(|| format!("invalid date {:?}, expected YYYY-MM-DD", raw))
}
