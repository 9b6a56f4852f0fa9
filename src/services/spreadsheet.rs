//! Spreadsheet import/export.
//!
//! Export flattens each requirement with its verifier into one row of the
//! `Exigences` sheet. Import reads the first sheet of a workbook, validates
//! every row, then merges the result into the current state in one step:
//! existing requirements are never touched and verifiers are matched by
//! case-insensitive name.

use crate::domain::models::{AppState, ImportSummary, Requirement, TrackingType, Verifier};
use crate::services::dashboard::UNKNOWN_VERIFIER;
use crate::services::status::parse_date;
use crate::services::store::DEFAULT_PERIODICITY_MONTHS;
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

pub const EXPORT_SHEET: &str = "Exigences";
pub const TEMPLATE_SHEET: &str = "Modèle";
pub const TEMPLATE_FILE_NAME: &str = "ReguTrack_Modele_Import.xlsx";

pub const COL_ID: &str = "ID";
pub const COL_DESIGNATION: &str = "Désignation";
pub const COL_DESCRIPTION: &str = "Description";
pub const COL_TRACKING: &str = "Type de Suivi";
pub const COL_LAST_DATE: &str = "Dernière Date";
pub const COL_LAST_DATE_TEMPLATE: &str = "Dernière Date (AAAA-MM-JJ)";
pub const COL_PERIODICITY: &str = "Périodicité (Mois)";
pub const COL_VERIFIER_NAME: &str = "Nom Vérificateur";
pub const COL_VERIFIER_EMAIL: &str = "Email Vérificateur";
pub const COL_VERIFIER_PHONE: &str = "Téléphone Vérificateur";
pub const COL_VERIFIER_INTERNAL: &str = "Vérificateur Interne";

const EXPORT_COLUMNS: [&str; 10] = [
    COL_ID,
    COL_DESIGNATION,
    COL_DESCRIPTION,
    COL_TRACKING,
    COL_LAST_DATE,
    COL_PERIODICITY,
    COL_VERIFIER_NAME,
    COL_VERIFIER_EMAIL,
    COL_VERIFIER_PHONE,
    COL_VERIFIER_INTERNAL,
];

const TEMPLATE_COLUMNS: [&str; 9] = [
    COL_DESIGNATION,
    COL_DESCRIPTION,
    COL_TRACKING,
    COL_LAST_DATE_TEMPLATE,
    COL_PERIODICITY,
    COL_VERIFIER_NAME,
    COL_VERIFIER_EMAIL,
    COL_VERIFIER_PHONE,
    COL_VERIFIER_INTERNAL,
];

#[derive(thiserror::Error, Debug)]
pub enum ImportError {
    #[error("cannot open workbook: {0}")]
    Open(#[from] calamine::Error),
    #[error("workbook has no sheets")]
    NoSheet,
    #[error("first sheet has no data rows")]
    EmptySheet,
    #[error("row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },
}

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("spreadsheet write failed: {0}")]
    Xlsx(#[from] XlsxError),
}

pub fn backup_file_name(today: NaiveDate) -> String {
    format!("ReguTrack_Backup_{}.xlsx", today.format("%Y-%m-%d"))
}

/// One flattened export line.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub id: String,
    pub designation: String,
    pub description: String,
    pub tracking_label: &'static str,
    pub last_date: String,
    pub periodicity_months: u32,
    pub verifier_name: String,
    pub verifier_email: String,
    pub verifier_phone: String,
    pub verifier_internal: &'static str,
}

pub fn export_rows(state: &AppState) -> Vec<ExportRow> {
    state
        .requirements
        .iter()
        .map(|r| {
            let v = state.verifier(&r.verifier_id);
            ExportRow {
                id: r.id.clone(),
                designation: r.designation.clone(),
                description: r.description.clone(),
                tracking_label: r.tracking_type.label(),
                last_date: r.last_date.clone(),
                periodicity_months: r.periodicity_months,
                verifier_name: v
                    .map(|v| v.name.clone())
                    .unwrap_or_else(|| UNKNOWN_VERIFIER.to_string()),
                verifier_email: v.map(|v| v.email.clone()).unwrap_or_default(),
                verifier_phone: v.map(|v| v.phone.clone()).unwrap_or_default(),
                verifier_internal: if v.map(|v| v.is_internal).unwrap_or(false) {
                    "OUI"
                } else {
                    "NON"
                },
            }
        })
        .collect()
}

pub fn write_export(state: &AppState, path: &Path) -> Result<usize, ExportError> {
    let rows = export_rows(state);
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(EXPORT_SHEET)?;
    for (col, name) in EXPORT_COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &header)?;
    }
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_string(r, 0, row.id.as_str())?;
        sheet.write_string(r, 1, row.designation.as_str())?;
        sheet.write_string(r, 2, row.description.as_str())?;
        sheet.write_string(r, 3, row.tracking_label)?;
        sheet.write_string(r, 4, row.last_date.as_str())?;
        sheet.write_number(r, 5, row.periodicity_months)?;
        sheet.write_string(r, 6, row.verifier_name.as_str())?;
        sheet.write_string(r, 7, row.verifier_email.as_str())?;
        sheet.write_string(r, 8, row.verifier_phone.as_str())?;
        sheet.write_string(r, 9, row.verifier_internal)?;
    }
    workbook.save(path)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "export written");
    Ok(rows.len())
}

/// One-row example of the columns `import` understands.
pub fn write_template(path: &Path) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(TEMPLATE_SHEET)?;
    for (col, name) in TEMPLATE_COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &header)?;
    }
    sheet.write_string(1, 0, "Exemple de désignation")?;
    sheet.write_string(1, 1, "Description légale ici")?;
    sheet.write_string(1, 2, TrackingType::Periodic.label())?;
    sheet.write_string(1, 3, "2023-01-01")?;
    sheet.write_number(1, 4, 12)?;
    sheet.write_string(1, 5, "Bureau Veritas")?;
    sheet.write_string(1, 6, "contact@bv.com")?;
    sheet.write_string(1, 7, "0123456789")?;
    sheet.write_string(1, 8, "NON")?;
    workbook.save(path)?;
    tracing::info!(path = %path.display(), "template written");
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Bool(bool),
}

impl Cell {
    fn from_data(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) if s.trim().is_empty() => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => serial_to_date(dt.as_f64())
                .map(Cell::Date)
                .unwrap_or(Cell::Empty),
            Data::DateTimeIso(s) => Cell::Text(s.clone()),
            _ => Cell::Empty,
        }
    }

    /// Text rendering used for name/email/phone columns; integral numbers
    /// lose their `.0` so a phone typed as a number survives.
    fn text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) if n.fract() == 0.0 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
            Cell::Bool(b) => b.to_string(),
        }
    }
}

/// Spreadsheet serial day (1900 date system) to calendar date.
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::try_days(serial.floor() as i64)?)
}

/// A data row keyed by header name; `line` is the 1-based sheet row.
#[derive(Debug, Clone, Default)]
pub struct SheetRow {
    pub line: usize,
    pub cells: HashMap<String, Cell>,
}

impl SheetRow {
    fn get(&self, column: &str) -> &Cell {
        self.cells.get(column).unwrap_or(&Cell::Empty)
    }

    fn text(&self, column: &str) -> String {
        self.get(column).text()
    }
}

pub fn read_sheet(path: &Path) -> Result<Vec<SheetRow>, ImportError> {
    let mut workbook = open_workbook_auto(path)?;
    let first = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ImportError::NoSheet)?;
    let range = workbook.worksheet_range(&first)?;
    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(cells) => cells.iter().map(|c| Cell::from_data(c).text()).collect(),
        None => return Err(ImportError::EmptySheet),
    };
    let data: Vec<SheetRow> = rows
        .enumerate()
        .map(|(i, cells)| SheetRow {
            line: i + 2,
            cells: headers
                .iter()
                .zip(cells)
                .filter(|(h, _)| !h.is_empty())
                .map(|(h, c)| (h.clone(), Cell::from_data(c)))
                .collect(),
        })
        .filter(|row| row.cells.values().any(|c| *c != Cell::Empty))
        .collect();
    tracing::debug!(sheet = %first, rows = data.len(), "sheet read");
    if data.is_empty() {
        return Err(ImportError::EmptySheet);
    }
    Ok(data)
}

/// A validated import line, not yet merged.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    pub designation: String,
    pub description: String,
    pub tracking_type: TrackingType,
    pub last_date: NaiveDate,
    pub periodicity_months: u32,
    pub verifier_name: String,
    pub verifier_email: String,
    pub verifier_phone: String,
    pub verifier_internal: bool,
}

/// Validates every row up front; returns the rows to import and the number
/// of rows skipped for lacking a designation.
pub fn parse_rows(rows: &[SheetRow]) -> Result<(Vec<ImportRow>, usize), ImportError> {
    let mut parsed = Vec::with_capacity(rows.len());
    let mut skipped = 0;
    for row in rows {
        let designation = row.text(COL_DESIGNATION);
        if designation.is_empty() {
            skipped += 1;
            continue;
        }
        let invalid = |reason: String| ImportError::InvalidRow {
            row: row.line,
            reason,
        };

        let date_cell = match row.get(COL_LAST_DATE_TEMPLATE) {
            Cell::Empty => row.get(COL_LAST_DATE),
            cell => cell,
        };
        let last_date = match date_cell {
            Cell::Date(d) => *d,
            Cell::Number(n) => serial_to_date(*n)
                .ok_or_else(|| invalid(format!("invalid date serial {}", n)))?,
            Cell::Text(s) => {
                parse_date(s).ok_or_else(|| invalid(format!("invalid date {:?}", s)))?
            }
            Cell::Empty | Cell::Bool(_) => return Err(invalid("missing last date".to_string())),
        };

        let tracking_type = TrackingType::from_label(&row.text(COL_TRACKING));
        let periodicity_months = match row.get(COL_PERIODICITY) {
            Cell::Empty => 0,
            Cell::Number(n) if *n >= 0.0 && n.fract() == 0.0 && *n <= u32::MAX as f64 => {
                *n as u32
            }
            Cell::Text(s) => s
                .trim()
                .parse::<u32>()
                .map_err(|_| invalid(format!("invalid periodicity {:?}", s)))?,
            other => return Err(invalid(format!("invalid periodicity {}", other.text()))),
        };
        let periodicity_months = match tracking_type {
            TrackingType::Continuous => 0,
            TrackingType::Periodic if periodicity_months == 0 => DEFAULT_PERIODICITY_MONTHS,
            TrackingType::Periodic => periodicity_months,
        };

        parsed.push(ImportRow {
            designation,
            description: row.text(COL_DESCRIPTION),
            tracking_type,
            last_date,
            periodicity_months,
            verifier_name: row.text(COL_VERIFIER_NAME),
            verifier_email: row.text(COL_VERIFIER_EMAIL),
            verifier_phone: row.text(COL_VERIFIER_PHONE),
            verifier_internal: match row.get(COL_VERIFIER_INTERNAL) {
                Cell::Bool(b) => *b,
                cell => cell.text().eq_ignore_ascii_case("oui"),
            },
        });
    }
    Ok((parsed, skipped))
}

/// Builds the post-import state: existing data plus the new rows.
pub fn merge_import(
    state: &AppState,
    rows: Vec<ImportRow>,
    mut next_id: impl FnMut() -> String,
) -> (AppState, ImportSummary) {
    let mut merged = state.clone();
    let mut created = 0;
    let mut updated = BTreeSet::new();

    for row in &rows {
        let verifier_id = if row.verifier_name.is_empty() {
            String::new()
        } else {
            let wanted = row.verifier_name.to_lowercase();
            match merged
                .verifiers
                .iter_mut()
                .find(|v| v.name.to_lowercase() == wanted)
            {
                Some(existing) => {
                    let mut changed = false;
                    if existing.phone.is_empty() && !row.verifier_phone.is_empty() {
                        existing.phone = row.verifier_phone.clone();
                        changed = true;
                    }
                    if row.verifier_internal && !existing.is_internal {
                        existing.is_internal = true;
                        changed = true;
                    }
                    if changed {
                        updated.insert(existing.id.clone());
                    }
                    existing.id.clone()
                }
                None => {
                    let id = next_id();
                    merged.verifiers.push(Verifier {
                        id: id.clone(),
                        name: row.verifier_name.clone(),
                        email: row.verifier_email.clone(),
                        phone: row.verifier_phone.clone(),
                        is_internal: row.verifier_internal,
                    });
                    created += 1;
                    id
                }
            }
        };

        merged.requirements.push(Requirement {
            id: next_id(),
            designation: row.designation.clone(),
            description: row.description.clone(),
            tracking_type: row.tracking_type,
            last_date: row.last_date.format("%Y-%m-%d").to_string(),
            periodicity_months: row.periodicity_months,
            verifier_id,
        });
    }

    let summary = ImportSummary {
        rows_read: 0,
        rows_skipped: 0,
        requirements_added: rows.len(),
        verifiers_created: created,
        verifiers_updated: updated.len(),
    };
    (merged, summary)
}

/// Read, validate and merge a workbook against `state`. Nothing is applied
/// here; the caller dispatches the returned state as a single import.
pub fn prepare_import(
    state: &AppState,
    path: &Path,
    next_id: impl FnMut() -> String,
) -> Result<(AppState, ImportSummary), ImportError> {
    let sheet = read_sheet(path)?;
    let (rows, skipped) = parse_rows(&sheet)?;
    let (merged, mut summary) = merge_import(state, rows, next_id);
    summary.rows_read = sheet.len();
    summary.rows_skipped = skipped;
    Ok((merged, summary))
}
