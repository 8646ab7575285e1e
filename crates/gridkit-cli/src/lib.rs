pub mod cli;
pub mod config;

pub use cli::{
    build_cli_command, Cli, Commands, ConfigCommands, GridCommands, MethodArg, NetworkArgs,
    SignArg,
};
pub use config::{default_config_path, load_config, save_config, GridkitConfig, LoggingConfig};
