use crate::domain::models::{
    AppState, ChartMode, ChartSlice, DashboardReport, DashboardRow, NextDue, Requirement, Status,
    StatusCounts,
};
use crate::services::status::{classify, days_until, next_due};
use chrono::NaiveDate;

pub const UNKNOWN_VERIFIER: &str = "Inconnu";

pub fn derive_row(
    state: &AppState,
    requirement: &Requirement,
    today: NaiveDate,
    due_soon_days: i64,
) -> DashboardRow {
    let verifier = state.verifier(&requirement.verifier_id);
    let due = next_due(
        requirement.tracking_type,
        &requirement.last_date,
        requirement.periodicity_months,
    );
    let days_remaining = match due {
        NextDue::Date(d) => Some(days_until(today, d)),
        NextDue::Continuous | NextDue::Invalid => None,
    };
    DashboardRow {
        id: requirement.id.clone(),
        designation: requirement.designation.clone(),
        description: requirement.description.clone(),
        tracking_type: requirement.tracking_type,
        last_date: requirement.last_date.clone(),
        periodicity_months: requirement.periodicity_months,
        verifier_id: requirement.verifier_id.clone(),
        verifier_name: verifier
            .map(|v| v.name.clone())
            .unwrap_or_else(|| UNKNOWN_VERIFIER.to_string()),
        verifier_email: verifier.map(|v| v.email.clone()).unwrap_or_default(),
        verifier_phone: verifier.map(|v| v.phone.clone()).unwrap_or_default(),
        verifier_internal: verifier.map(|v| v.is_internal).unwrap_or(false),
        next_due: due,
        days_remaining,
        status: classify(due, today, due_soon_days),
    }
}

pub fn derive_rows(state: &AppState, today: NaiveDate, due_soon_days: i64) -> Vec<DashboardRow> {
    state
        .requirements
        .iter()
        .map(|r| derive_row(state, r, today, due_soon_days))
        .collect()
}

pub fn count_statuses(rows: &[DashboardRow]) -> StatusCounts {
    let mut counts = StatusCounts {
        total: rows.len(),
        ..StatusCounts::default()
    };
    for row in rows {
        match row.status {
            Status::Red => counts.red += 1,
            Status::Orange => counts.orange += 1,
            Status::Green => counts.green += 1,
        }
    }
    counts
}

/// Pie-chart data, either raw counts or percentages rounded to one decimal.
pub fn chart(counts: &StatusCounts, mode: ChartMode, due_soon_days: i64) -> Vec<ChartSlice> {
    let value = |n: usize| match mode {
        ChartMode::Absolute => n as f64,
        ChartMode::Percent if counts.total == 0 => 0.0,
        ChartMode::Percent => (n as f64 * 1000.0 / counts.total as f64).round() / 10.0,
    };
    vec![
        ChartSlice {
            status: Status::Red,
            label: "overdue".to_string(),
            value: value(counts.red),
        },
        ChartSlice {
            status: Status::Orange,
            label: format!("due within {} days", due_soon_days),
            value: value(counts.orange),
        },
        ChartSlice {
            status: Status::Green,
            label: "compliant".to_string(),
            value: value(counts.green),
        },
    ]
}

/// Counts and chart always cover every requirement; `only` filters the
/// listed rows.
pub fn build_dashboard(
    state: &AppState,
    today: NaiveDate,
    due_soon_days: i64,
    mode: ChartMode,
    only: Option<Status>,
) -> DashboardReport {
    let mut rows = derive_rows(state, today, due_soon_days);
    let counts = count_statuses(&rows);
    if let Some(status) = only {
        rows.retain(|r| r.status == status);
    }
    DashboardReport {
        today: today.format("%Y-%m-%d").to_string(),
        due_soon_days,
        counts,
        chart_mode: mode,
        chart: chart(&counts, mode, due_soon_days),
        rows,
    }
}
