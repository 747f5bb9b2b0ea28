use std::path::PathBuf;
use std::process;

use clap::Args;

use beautify::equiv::check_equivalence_with;

use super::{read_source, resolve_settings};

#[derive(Args)]
pub struct CheckArgs {
    /// The program as written
    pub original: PathBuf,
    /// The rewritten program
    pub transformed: PathBuf,
    /// Step budget for each program
    #[arg(long, value_name = "N")]
    pub max_steps: Option<u64>,
}

pub fn cmd_check(args: CheckArgs) {
    let settings = resolve_settings(&args.original, None, true, args.max_steps);
    let original = read_source(&args.original);
    let transformed = read_source(&args.transformed);

    eprintln!(
        "Checking {} against {}...",
        args.transformed.display(),
        args.original.display()
    );
    let report = check_equivalence_with(&original, &transformed, settings.max_steps);
    print!("{}", report.format_report());
    if !report.is_equivalent() {
        process::exit(1);
    }
}
