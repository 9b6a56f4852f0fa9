use crate::*;

pub fn handle_view_commands(
    cli: &Cli,
    store: &Store,
    ctx: &RunContext,
    config: &ConfigFile,
) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Dashboard { percent, status } => {
            let mode = if *percent {
                ChartMode::Percent
            } else {
                ChartMode::Absolute
            };
            let report = build_dashboard(
                store.state(),
                ctx.today,
                ctx.due_soon_days,
                mode,
                *status,
            );
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&JsonOut {
                        ok: true,
                        data: report
                    })?
                );
            } else {
                print_dashboard(&report);
            }
        }
        Commands::Show { requirement } => {
            let r = store
                .state()
                .requirement(requirement)
                .ok_or_else(|| StoreError::RequirementNotFound(requirement.clone()))?;
            let row = derive_row(store.state(), r, ctx.today, ctx.due_soon_days);
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&JsonOut { ok: true, data: row })?
                );
            } else {
                println!("id: {}", row.id);
                println!("designation: {}", row.designation);
                if !row.description.is_empty() {
                    println!("description: {}", row.description);
                }
                println!("tracking: {}", row.tracking_type);
                println!("last date: {}", row.last_date);
                if row.tracking_type == TrackingType::Periodic {
                    println!("periodicity: {} month(s)", row.periodicity_months);
                }
                println!("next due: {}", row.next_due);
                if let Some(days) = row.days_remaining {
                    println!("days remaining: {}", days);
                }
                println!("status: {}", row.status);
                println!(
                    "verifier: {} ({})",
                    row.verifier_name,
                    if row.verifier_internal {
                        "internal"
                    } else {
                        "external"
                    }
                );
                if !row.verifier_email.is_empty() {
                    println!("email: {}", row.verifier_email);
                }
                if !row.verifier_phone.is_empty() {
                    println!("phone: {}", row.verifier_phone);
                }
            }
        }
        Commands::Settings => {
            let alerts = &config.alerts;
            let report = SettingsReport {
                functional: false,
                note: "Display only: alert mails are sent by an external job, not by regutrack."
                    .to_string(),
                smtp_host: alerts.smtp_host.clone(),
                smtp_port: alerts.smtp_port,
                encryption: alerts.encryption.clone(),
                sender: alerts.sender.clone(),
                recipient: alerts.recipient.clone(),
                state_file: ctx.state_file.to_string_lossy().to_string(),
            };
            print_one(cli.json, report, |s| {
                format!(
                    "smtp_host={}\nsmtp_port={}\nencryption={}\nsender={}\nrecipient={}\nstate_file={}\n{}",
                    s.smtp_host,
                    s.smtp_port,
                    s.encryption,
                    s.sender,
                    s.recipient.as_deref().unwrap_or(&s.sender),
                    s.state_file,
                    s.note
                )
            })?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn print_dashboard(report: &DashboardReport) {
    let c = &report.counts;
    println!(
        "as of {}: total={} red={} orange={} green={}",
        report.today, c.total, c.red, c.orange, c.green
    );
    let unit = match report.chart_mode {
        ChartMode::Absolute => "",
        ChartMode::Percent => "%",
    };
    for slice in &report.chart {
        println!("  {:<7}{}{}\t{}", slice.status, slice.value, unit, slice.label);
    }
    if report.rows.is_empty() {
        println!("no requirements found; add some with `regutrack requirement add`");
        return;
    }
    for row in &report.rows {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            row.status, row.id, row.designation, row.verifier_name, row.last_date, row.next_due
        );
    }
}
