use std::path::{Path, PathBuf};
use std::process;

use beautify::ast::Module;
use beautify::format::format_module;
use clap::Args;
use tracing::debug;

use super::{load_and_parse, resolve_py_files};

#[derive(Args)]
pub struct FmtArgs {
    /// Program or directory to reformat (defaults to current directory)
    pub input: Option<PathBuf>,
    /// Report files that would change and exit 1, without writing
    #[arg(long)]
    pub check: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Unchanged,
    Reformatted,
    Failed,
}

pub fn cmd_fmt(args: FmtArgs) {
    let FmtArgs { input, check } = args;
    let input = input.unwrap_or_else(|| PathBuf::from("."));

    // A single program fails the same way every other subcommand does.
    if !input.is_dir() {
        let (source, module) = load_and_parse(&input);
        let outcome = reprint(&input, &source, &module, check);
        if outcome == Outcome::Failed || (check && outcome == Outcome::Reformatted) {
            process::exit(1);
        }
        return;
    }

    let files = resolve_py_files(&input);
    if files.is_empty() {
        eprintln!("No .py files found in '{}'", input.display());
        return;
    }

    let outcomes: Vec<Outcome> = files.iter().map(|file| reprint_file(file, check)).collect();
    let changed = outcomes.iter().filter(|&&o| o == Outcome::Reformatted).count();
    let failed = outcomes.iter().filter(|&&o| o == Outcome::Failed).count();
    eprintln!(
        "{} file(s): {} {}, {} failed",
        files.len(),
        changed,
        if check { "would be reformatted" } else { "reformatted" },
        failed
    );

    if failed > 0 || (check && changed > 0) {
        process::exit(1);
    }
}

/// Directory mode: a file that cannot be read or parsed is reported and
/// skipped.
fn reprint_file(path: &Path, check: bool) -> Outcome {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", path.display(), e);
            return Outcome::Failed;
        }
    };
    match beautify::parse_source(&source, &path.to_string_lossy()) {
        Ok(module) => reprint(path, &source, &module, check),
        Err(_) => {
            eprintln!("error: parse errors in '{}'", path.display());
            Outcome::Failed
        }
    }
}

fn reprint(path: &Path, source: &str, module: &Module, check: bool) -> Outcome {
    let formatted = format_module(module);
    if formatted == source {
        debug!(file = %path.display(), "already formatted");
        return Outcome::Unchanged;
    }
    if check {
        eprintln!("would reformat: {}", path.display());
        return Outcome::Reformatted;
    }
    match std::fs::write(path, &formatted) {
        Ok(()) => {
            eprintln!("reformatted: {}", path.display());
            Outcome::Reformatted
        }
        Err(e) => {
            eprintln!("error: cannot write '{}': {}", path.display(), e);
            Outcome::Failed
        }
    }
}
