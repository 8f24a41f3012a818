use std::path::PathBuf;

use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use quartz_utils::Target;

mod commands;
mod config;
mod error;
mod io;
mod utils;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "quartz")]
#[command(about = "Quartz toolchain support utilities", long_about = None)]
#[command(after_help = "Fatal diagnostics are written to stderr and exit with status 1.")]
struct Args {
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    /// Configuration file (defaults to the nearest quartz.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Translate a syscall to the numbering of a target
    Syscall {
        /// Syscall number (Linux x86-64 convention) or name
        #[arg(value_name = "ID", required_unless_present = "list", allow_negative_numbers = true)]
        id: Option<String>,
        /// Emission target (defaults to the configured target, then the host)
        #[arg(short, long, value_name = "TARGET")]
        target: Option<Target>,
        /// Print the whole table for the target
        #[arg(short, long, conflicts_with = "id")]
        list: bool,
    },

    /// Round a value up to a power-of-two alignment
    Align {
        #[arg(value_name = "VALUE", allow_negative_numbers = true)]
        value: i64,
        #[arg(value_name = "ALIGNMENT", allow_negative_numbers = true)]
        alignment: i64,
    },

    /// Report a fatal diagnostic at a source location
    Report {
        /// Source file the location refers to
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// 1-based line
        #[arg(short, long)]
        line: usize,
        /// 1-based column
        #[arg(short, long)]
        column: usize,
        /// Message to report
        #[arg(value_name = "MESSAGE")]
        message: String,
    },

    /// Write a quartz.toml
    Init {
        /// Directory to create the file in
        #[arg(value_name = "DIR", default_value = ".")]
        dir: PathBuf,
        /// Target to pin (defaults to the host)
        #[arg(short, long, value_name = "TARGET")]
        target: Option<Target>,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> miette::Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config_path = args.config;
    let load_config = || -> Result<Config, error::CliError> {
        let config = Config::load(config_path.as_deref())?;
        log::trace!("configuration: {:?}", config);
        quartz_utils::set_render_options(config.render_options());
        Ok(config)
    };

    match args.command {
        Command::Syscall { id, target, list } => {
            commands::syscall::handle_syscall(&load_config()?, id, target, list)?
        }
        Command::Align { value, alignment } => commands::align::handle_align(value, alignment)?,
        Command::Report { file, line, column, message } => {
            load_config()?;
            commands::report::handle_report(&file, line, column, &message)
        }
        Command::Init { dir, target, force } => commands::init::handle_init(dir, target, force)?,
    }
    Ok(())
}
