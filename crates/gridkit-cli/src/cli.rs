use clap::{CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use gridkit_algo::ConvergencePolicy;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gridkit", author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level (overrides the config file)
    #[arg(long, global = true)]
    pub log_level: Option<tracing::Level>,

    /// Path to the configuration file (default: ~/.gridkit/config.toml)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Worker threads for parallel solves ("auto" or a number)
    #[arg(long, global = true, default_value = "auto")]
    pub threads: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Strike-out pseudo-inverse of a square matrix
    Pinv {
        /// Headerless matrix CSV
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Index of the row and column to strike
        #[arg(long)]
        strike: usize,
        #[arg(long, value_enum, default_value_t = MethodArg::Dense)]
        method: MethodArg,
        /// Relative residual tolerance for the sparse method
        #[arg(long)]
        tolerance: Option<f64>,
        /// Iteration cap per column for the sparse method
        #[arg(long)]
        max_iterations: Option<usize>,
        /// Non-convergence handling for the sparse method (strict, lenient)
        #[arg(long)]
        policy: Option<ConvergencePolicy>,
        /// Output CSV (stdout if omitted)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
    /// Positive or negative part of a matrix
    Split {
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        #[arg(long, value_enum)]
        sign: SignArg,
        /// Split in compressed sparse row storage
        #[arg(long)]
        sparse: bool,
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
    /// Fill NaN entries by linear interpolation
    Interpolate {
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// 0 interpolates down each column, 1 along each row
        #[arg(long, default_value_t = 0)]
        axis: usize,
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
    /// SciGRID network utilities
    Grid {
        #[command(subcommand)]
        command: GridCommands,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct NetworkArgs {
    /// SciGRID vertices CSV
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub vertices: PathBuf,
    /// SciGRID links CSV
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub links: PathBuf,
    /// Fill missing line attributes and assign capacities
    #[arg(long)]
    pub extend: bool,
    /// Add a 380 kV link between two vertex ids, e.g. `--link 788:782`
    #[arg(long = "link", value_parser = parse_link)]
    pub extra_links: Vec<(usize, usize)>,
}

fn parse_link(raw: &str) -> Result<(usize, usize), String> {
    let (from, to) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected FROM:TO, got '{raw}'"))?;
    let parse = |id: &str| {
        id.trim()
            .parse::<usize>()
            .map_err(|err| format!("invalid vertex id '{id}': {err}"))
    };
    Ok((parse(from)?, parse(to)?))
}

#[derive(Subcommand, Debug)]
pub enum GridCommands {
    /// Print topology statistics
    Stats {
        #[command(flatten)]
        network: NetworkArgs,
    },
    /// List connected islands
    Islands {
        #[command(flatten)]
        network: NetworkArgs,
        /// Print the bus to island assignment table
        #[arg(long)]
        emit: bool,
    },
    /// Write the susceptance Laplacian as a dense CSV
    Laplacian {
        #[command(flatten)]
        network: NetworkArgs,
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
    /// Write the PTDF matrix (lines x buses) as a dense CSV
    Ptdf {
        #[command(flatten)]
        network: NetworkArgs,
        /// Vertex id of the slack bus
        #[arg(long)]
        slack: usize,
        #[arg(long, value_enum, default_value_t = MethodArg::Dense)]
        method: MethodArg,
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MethodArg {
    Dense,
    Sparse,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignArg {
    Positive,
    Negative,
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        build_cli_command().debug_assert();
    }

    #[test]
    fn parses_pinv_options() {
        let cli = Cli::try_parse_from([
            "gridkit",
            "pinv",
            "l.csv",
            "--strike",
            "2",
            "--method",
            "sparse",
            "--policy",
            "lenient",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.log_level, Some(tracing::Level::DEBUG));
        match cli.command {
            Commands::Pinv {
                strike,
                method,
                policy,
                ..
            } => {
                assert_eq!(strike, 2);
                assert_eq!(method, MethodArg::Sparse);
                assert_eq!(policy, Some(ConvergencePolicy::Lenient));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_repeated_links() {
        let cli = Cli::try_parse_from([
            "gridkit", "grid", "stats", "--vertices", "v.csv", "--links", "l.csv", "--link",
            "788:782", "--link", "1:2",
        ])
        .unwrap();
        let Commands::Grid {
            command: GridCommands::Stats { network },
        } = cli.command
        else {
            panic!("expected grid stats");
        };
        assert_eq!(network.extra_links, vec![(788, 782), (1, 2)]);
        assert!(parse_link("788-782").is_err());
    }

    #[test]
    fn rejects_unknown_policy() {
        let result = Cli::try_parse_from([
            "gridkit", "pinv", "l.csv", "--strike", "0", "--policy", "sloppy",
        ]);
        assert!(result.is_err());
    }
}
