use crate::*;

pub fn handle_manage_commands(cli: &Cli, store: &mut Store) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Requirement { command } => handle_requirement(cli, store, command)?,
        Commands::Verifier { command } => handle_verifier(cli, store, command)?,
        Commands::Reset { yes } => {
            if !confirm("Replace all data with the demo dataset?", *yes)? {
                print_one(cli.json, "aborted", |s| s.to_string())?;
                return Ok(true);
            }
            store.reset()?;
            let state = store.state();
            print_one(
                cli.json,
                serde_json::json!({
                    "verifiers": state.verifiers.len(),
                    "requirements": state.requirements.len()
                }),
                |_| "data reset to demo dataset".to_string(),
            )?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn handle_requirement(
    cli: &Cli,
    store: &mut Store,
    command: &RequirementCommands,
) -> anyhow::Result<()> {
    match command {
        RequirementCommands::List => {
            print_out(cli.json, &store.state().requirements, |r| {
                let cadence = match r.tracking_type {
                    TrackingType::Periodic => format!("every {} month(s)", r.periodicity_months),
                    TrackingType::Continuous => "continuous".to_string(),
                };
                format!(
                    "{}\t{}\t{}\t{}\t{}",
                    r.id, r.designation, cadence, r.last_date, r.verifier_id
                )
            })?;
        }
        RequirementCommands::Add {
            designation,
            description,
            tracking,
            last_date,
            periodicity,
            verifier,
        } => {
            let r = store.add_requirement(RequirementDraft {
                designation: designation.clone(),
                description: description.clone(),
                tracking_type: *tracking,
                last_date: last_date.format("%Y-%m-%d").to_string(),
                periodicity_months: *periodicity,
                verifier: verifier.clone(),
            })?;
            print_one(cli.json, r, |r| format!("added requirement {}", r.id))?;
        }
        RequirementCommands::Update {
            id,
            designation,
            description,
            tracking,
            last_date,
            periodicity,
            verifier,
        } => {
            let r = store.update_requirement(
                id,
                RequirementPatch {
                    designation: designation.clone(),
                    description: description.clone(),
                    tracking_type: *tracking,
                    last_date: last_date.map(|d| d.format("%Y-%m-%d").to_string()),
                    periodicity_months: *periodicity,
                    verifier: verifier.clone(),
                },
            )?;
            print_one(cli.json, r, |r| format!("updated requirement {}", r.id))?;
        }
        RequirementCommands::Remove { id, yes } => {
            let designation = store
                .state()
                .requirement(id)
                .map(|r| r.designation.clone())
                .ok_or_else(|| StoreError::RequirementNotFound(id.clone()))?;
            if !confirm(&format!("Delete requirement \"{}\"?", designation), *yes)? {
                print_one(cli.json, "aborted", |s| s.to_string())?;
                return Ok(());
            }
            let r = store.delete_requirement(id)?;
            print_one(cli.json, r, |r| format!("removed requirement {}", r.id))?;
        }
    }
    Ok(())
}

fn handle_verifier(
    cli: &Cli,
    store: &mut Store,
    command: &VerifierCommands,
) -> anyhow::Result<()> {
    match command {
        VerifierCommands::List => {
            print_out(cli.json, &store.state().verifiers, |v| {
                format!(
                    "{}\t{}\t{}\t{}\t{}",
                    v.id,
                    v.name,
                    v.email,
                    v.phone,
                    if v.is_internal { "internal" } else { "external" }
                )
            })?;
        }
        VerifierCommands::Add {
            name,
            email,
            phone,
            internal,
        } => {
            let v = store.add_verifier(VerifierDraft {
                name: name.clone(),
                email: email.clone(),
                phone: phone.clone(),
                is_internal: *internal,
            })?;
            print_one(cli.json, v, |v| format!("added verifier {}", v.id))?;
        }
        VerifierCommands::Update {
            id,
            name,
            email,
            phone,
            internal,
        } => {
            let v = store.update_verifier(
                id,
                VerifierPatch {
                    name: name.clone(),
                    email: email.clone(),
                    phone: phone.clone(),
                    is_internal: *internal,
                },
            )?;
            print_one(cli.json, v, |v| format!("updated verifier {}", v.id))?;
        }
        VerifierCommands::Remove { id, yes } => {
            let name = store
                .state()
                .verifier(id)
                .map(|v| v.name.clone())
                .ok_or_else(|| StoreError::VerifierNotFound(id.clone()))?;
            if !confirm(&format!("Delete verifier \"{}\"?", name), *yes)? {
                print_one(cli.json, "aborted", |s| s.to_string())?;
                return Ok(());
            }
            let v = store.delete_verifier(id)?;
            print_one(cli.json, v, |v| format!("removed verifier {}", v.id))?;
        }
    }
    Ok(())
}
