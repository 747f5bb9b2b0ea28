use std::path::PathBuf;
use std::process;

use clap::Args;
use tracing::info;

use beautify::diagnostic::Diagnostic;
use beautify::equiv::check_equivalence_with;
use beautify::Pipeline;

use super::{fail, load_and_parse, parse_passes_arg, resolve_settings};

#[derive(Args)]
pub struct RunArgs {
    /// Input program
    pub input: PathBuf,
    /// Comma-separated pass list (default: beautify.toml, then the full pipeline)
    #[arg(long, value_name = "LIST")]
    pub passes: Option<String>,
    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Run both programs and exit 1 if their output differs
    #[arg(long)]
    pub check: bool,
    /// Step budget for each program under --check
    #[arg(long, value_name = "N")]
    pub max_steps: Option<u64>,
    /// Print per-pass rewrite counts and timings to stderr
    #[arg(long)]
    pub stats: bool,
}

pub fn cmd_run(args: RunArgs) {
    let passes = parse_passes_arg(args.passes.as_deref());
    let settings = resolve_settings(&args.input, passes, args.check, args.max_steps);

    let pipeline = Pipeline::new(settings.passes.clone());
    let (source, mut module) = load_and_parse(&args.input);
    let report = match pipeline.run(&mut module) {
        Ok(report) => report,
        Err(e) => fail(Diagnostic::from(e), &args.input, &source),
    };
    if args.stats {
        eprintln!("{}", report);
    }
    let transformed = beautify::format::format_module(&module);

    match &args.output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &transformed) {
                eprintln!("error: cannot write '{}': {}", path.display(), e);
                process::exit(1);
            }
            info!(output = %path.display(), "wrote transformed program");
        }
        None => print!("{}", transformed),
    }

    if settings.check {
        let result = check_equivalence_with(&source, &transformed, settings.max_steps);
        eprint!("{}", result.format_report());
        if !result.is_equivalent() {
            process::exit(1);
        }
    }
}
