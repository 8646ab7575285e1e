use clap::Parser;
use gridkit_cli::{
    cli::{Cli, Commands, ConfigCommands},
    config::{load_config, GridkitConfig},
};
use tracing::{debug, error};
use tracing_subscriber::FmtSubscriber;

mod commands;

use commands::matrix::{self, SolverOverrides};
use commands::util::configure_threads;

fn main() {
    let cli = Cli::parse();

    // `config init` must work before any file exists.
    let loaded = match &cli.command {
        Commands::Config {
            command: ConfigCommands::Init { .. },
        } => Ok(GridkitConfig::default()),
        _ => load_config(cli.config.as_deref()),
    };
    let level = cli.log_level.unwrap_or_else(|| {
        loaded
            .as_ref()
            .map(|config| config.logging.tracing_level())
            .unwrap_or(tracing::Level::INFO)
    });

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let result = loaded.and_then(|config| run(&cli, &config));
    if let Err(err) = result {
        error!("{err:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli, config: &GridkitConfig) -> anyhow::Result<()> {
    configure_threads(&cli.threads);
    debug!(?config, "effective configuration");

    match &cli.command {
        Commands::Pinv {
            input,
            strike,
            method,
            tolerance,
            max_iterations,
            policy,
            out,
        } => {
            let solver = SolverOverrides {
                tolerance: *tolerance,
                max_iterations: *max_iterations,
                policy: *policy,
            }
            .apply(config.solver.clone());
            matrix::handle_pinv(
                input,
                *strike,
                matrix::pinv_method(*method, solver),
                out.as_deref(),
            )
        }
        Commands::Split {
            input,
            sign,
            sparse,
            out,
        } => matrix::handle_split(input, *sign, *sparse, out.as_deref()),
        Commands::Interpolate { input, axis, out } => {
            matrix::handle_interpolate(input, *axis, out.as_deref())
        }
        Commands::Grid { command } => commands::grid::handle(command, &config.solver),
        Commands::Config { command } => {
            commands::config::handle(command, cli.config.as_deref(), config)
        }
    }
}
