use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackingType {
    #[default]
    Periodic,
    Continuous,
}

impl TrackingType {
    /// Label used in spreadsheet files.
    pub fn label(self) -> &'static str {
        match self {
            TrackingType::Periodic => "Périodique",
            TrackingType::Continuous => "Continu",
        }
    }

    /// Anything other than `Continu` (case-insensitive) is periodic.
    pub fn from_label(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("continu") {
            TrackingType::Continuous
        } else {
            TrackingType::Periodic
        }
    }
}

impl fmt::Display for TrackingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackingType::Periodic => f.write_str("periodic"),
            TrackingType::Continuous => f.write_str("continuous"),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Verifier {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub is_internal: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    pub id: String,
    pub designation: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tracking_type: TrackingType,
    /// ISO calendar date (`YYYY-MM-DD`). Kept as text so a hand-edited bad
    /// value degrades one row instead of the whole state file.
    pub last_date: String,
    #[serde(default)]
    pub periodicity_months: u32,
    /// Not an enforced foreign key; may be empty after an import.
    #[serde(default)]
    pub verifier_id: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub verifiers: Vec<Verifier>,
    pub requirements: Vec<Requirement>,
}

impl AppState {
    pub fn verifier(&self, id: &str) -> Option<&Verifier> {
        self.verifiers.iter().find(|v| v.id == id)
    }

    pub fn requirement(&self, id: &str) -> Option<&Requirement> {
        self.requirements.iter().find(|r| r.id == id)
    }

    pub fn requirements_for(&self, verifier_id: &str) -> impl Iterator<Item = &Requirement> {
        let verifier_id = verifier_id.to_string();
        self.requirements
            .iter()
            .filter(move |r| r.verifier_id == verifier_id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Red,
    Orange,
    Green,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Red => f.pad("RED"),
            Status::Orange => f.pad("ORANGE"),
            Status::Green => f.pad("GREEN"),
        }
    }
}

/// Expanded next-due date of a requirement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NextDue {
    Date(NaiveDate),
    Continuous,
    /// The stored `lastDate` could not be parsed.
    Invalid,
}

impl fmt::Display for NextDue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextDue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            NextDue::Continuous => f.write_str("continuous"),
            NextDue::Invalid => f.write_str("invalid"),
        }
    }
}

impl Serialize for NextDue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct DashboardRow {
    pub id: String,
    pub designation: String,
    pub description: String,
    pub tracking_type: TrackingType,
    pub last_date: String,
    pub periodicity_months: u32,
    pub verifier_id: String,
    pub verifier_name: String,
    pub verifier_email: String,
    pub verifier_phone: String,
    pub verifier_internal: bool,
    pub next_due: NextDue,
    /// Signed days from today to the next due date; absent for continuous
    /// or invalid rows.
    pub days_remaining: Option<i64>,
    pub status: Status,
}

#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub red: usize,
    pub orange: usize,
    pub green: usize,
    pub total: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartMode {
    Absolute,
    Percent,
}

#[derive(Serialize, Clone, Debug)]
pub struct ChartSlice {
    pub status: Status,
    pub label: String,
    pub value: f64,
}

#[derive(Serialize)]
pub struct DashboardReport {
    pub today: String,
    pub due_soon_days: i64,
    pub counts: StatusCounts,
    pub chart_mode: ChartMode,
    pub chart: Vec<ChartSlice>,
    pub rows: Vec<DashboardRow>,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub requirements_added: usize,
    pub verifiers_created: usize,
    pub verifiers_updated: usize,
}

#[derive(Serialize)]
pub struct ExportReport {
    pub path: String,
    pub rows: usize,
}

#[derive(Serialize)]
pub struct SettingsReport {
    pub functional: bool,
    pub note: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub encryption: String,
    pub sender: String,
    pub recipient: Option<String>,
    pub state_file: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub alerts: AlertConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_due_soon_days")]
    pub due_soon_days: i64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            due_soon_days: default_due_soon_days(),
        }
    }
}

fn default_due_soon_days() -> i64 {
    90
}

/// Mail settings shown by `settings`. Nothing in the crate sends mail.
#[derive(Debug, Deserialize)]
pub struct AlertConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default = "default_encryption")]
    pub encryption: String,
    #[serde(default = "default_sender")]
    pub sender: String,
    #[serde(default)]
    pub recipient: Option<String>,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            encryption: default_encryption(),
            sender: default_sender(),
            recipient: None,
        }
    }
}

fn default_smtp_host() -> String {
    "smtp.office365.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_encryption() -> String {
    "TLS".to_string()
}

fn default_sender() -> String {
    "notifications@entreprise.com".to_string()
}
