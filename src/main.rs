mod cli;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cli::check::{cmd_check, CheckArgs};
use cli::dump::{cmd_dump, DumpArgs};
use cli::fmt::{cmd_fmt, FmtArgs};
use cli::passes::cmd_passes;
use cli::run::{cmd_run, RunArgs};

#[derive(Parser)]
#[command(
    name = "beautify",
    version,
    about = "Rewrite programs into equivalent, harder-to-read programs"
)]
struct Cli {
    /// Raise the log level (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the rewrite passes over a program
    Run(RunArgs),
    /// Print the parsed tree, optionally with depth annotations
    Dump(DumpArgs),
    /// Compare what two programs print
    Check(CheckArgs),
    /// Parse and re-print programs in canonical form
    Fmt(FmtArgs),
    /// List the available passes
    Passes,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Run(args) => cmd_run(args),
        Command::Dump(args) => cmd_dump(args),
        Command::Check(args) => cmd_check(args),
        Command::Fmt(args) => cmd_fmt(args),
        Command::Passes => cmd_passes(),
    }
}
