use crate::*;
use anyhow::Context;
use std::path::PathBuf;

pub fn handle_transfer_commands(
    cli: &Cli,
    store: &mut Store,
    ctx: &RunContext,
) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Export { out } => {
            let path = out
                .clone()
                .unwrap_or_else(|| PathBuf::from(backup_file_name(ctx.today)));
            let rows = write_export(store.state(), &path)
                .inspect_err(|err| tracing::error!(error = %err, "export failed"))
                .context("export failed")?;
            let report = ExportReport {
                path: path.to_string_lossy().to_string(),
                rows,
            };
            print_one(cli.json, report, |r| {
                format!("exported {} requirement(s) to {}", r.rows, r.path)
            })?;
        }
        Commands::Template { out } => {
            let path = out
                .clone()
                .unwrap_or_else(|| PathBuf::from(TEMPLATE_FILE_NAME));
            write_template(&path)
                .inspect_err(|err| tracing::error!(error = %err, "template failed"))
                .context("template export failed")?;
            print_one(cli.json, path.to_string_lossy().to_string(), |p| {
                format!("template written to {}", p)
            })?;
        }
        Commands::Import { file } => {
            let (merged, summary) = prepare_import(store.state(), file, new_id)
                .inspect_err(|err| {
                    tracing::error!(file = %file.display(), error = %err, "import rejected")
                })
                .context("import failed; check the file matches the template")?;
            store.import(merged)?;
            tracing::info!(
                added = summary.requirements_added,
                skipped = summary.rows_skipped,
                "import applied"
            );
            print_one(cli.json, summary, |s| {
                format!(
                    "imported {} requirement(s) from {} row(s) ({} skipped, {} verifier(s) created, {} updated)",
                    s.requirements_added,
                    s.rows_read,
                    s.rows_skipped,
                    s.verifiers_created,
                    s.verifiers_updated
                )
            })?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}
