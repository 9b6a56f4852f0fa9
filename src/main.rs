use clap::Parser;
use regutrack::commands::{
    handle_manage_commands, handle_transfer_commands, handle_view_commands,
};
use regutrack::*;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => Ok(()),
        Err(err) if cli.json => {
            print_error(true, &err);
            std::process::exit(1);
        }
        Err(err) => Err(err),
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config()?;
    let data_dir = resolve_data_dir(cli.data_dir.as_deref(), &config)?;
    let path = state_path(&data_dir);
    let state = load_state(&path);
    let mut store = Store::new(state, Box::new(FileSink::new(path.clone())));

    let ctx = RunContext {
        today: cli
            .today
            .unwrap_or_else(|| chrono::Local::now().date_naive()),
        due_soon_days: config.dashboard.due_soon_days,
        state_file: path,
    };
    tracing::debug!(today = %ctx.today, state_file = %ctx.state_file.display(), "starting");

    if handle_view_commands(cli, &store, &ctx, &config)? {
        return Ok(());
    }
    if handle_manage_commands(cli, &mut store)? {
        return Ok(());
    }
    if handle_transfer_commands(cli, &mut store, &ctx)? {
        return Ok(());
    }
    unreachable!("every command has a handler")
}

/// Logs go to stderr so `--json` output stays parseable. `RUST_LOG` wins over
/// `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "regutrack=warn",
        1 => "regutrack=info",
        _ => "regutrack=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
