pub mod check;
pub mod dump;
pub mod fmt;
pub mod passes;
pub mod run;

use std::path::{Path, PathBuf};
use std::process;

use beautify::ast::Module;
use beautify::diagnostic::{render_diagnostics, Diagnostic};
use beautify::passes::{parse_pass_list, PassId};
use beautify::project::{Project, Settings};

/// Read a source file, exiting on error.
pub fn read_source(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", path.display(), e);
            process::exit(1);
        }
    }
}

/// Load and parse a program, rendering diagnostics and exiting on error.
pub fn load_and_parse(path: &Path) -> (String, Module) {
    let source = read_source(path);
    let filename = path.to_string_lossy().to_string();
    match beautify::parse_source(&source, &filename) {
        Ok(module) => (source, module),
        Err(_) => {
            eprintln!("error: parse errors in '{}'", path.display());
            process::exit(1);
        }
    }
}

/// Render one diagnostic against its source and exit.
pub fn fail(diag: Diagnostic, path: &Path, source: &str) -> ! {
    let filename = path.to_string_lossy().to_string();
    render_diagnostics(&[diag], &filename, source);
    process::exit(1);
}

/// Parse a `--passes` value, exiting on an unknown name.
pub fn parse_passes_arg(list: Option<&str>) -> Option<Vec<PassId>> {
    let list = list?;
    match parse_pass_list(list) {
        Ok(passes) => Some(passes),
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

/// Combine command-line values with the beautify.toml that applies to
/// `input`, if there is one.
pub fn resolve_settings(
    input: &Path,
    passes: Option<Vec<PassId>>,
    check: bool,
    max_steps: Option<u64>,
) -> Settings {
    let project = match Project::for_input(input) {
        Ok(project) => project,
        Err(e) => {
            eprintln!("error: {}", e.message);
            if let Some(help) = e.help {
                eprintln!("  help: {}", help);
            }
            process::exit(1);
        }
    };
    Settings::resolve(project.as_ref(), passes, check, max_steps)
}

/// Resolve a file or directory argument to the `.py` files it names.
pub fn resolve_py_files(input: &Path) -> Vec<PathBuf> {
    if input.is_dir() {
        let mut result = Vec::new();
        collect_py_files(input, &mut result);
        result.sort();
        result
    } else {
        vec![input.to_path_buf()]
    }
}

fn collect_py_files(dir: &Path, result: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if !name.starts_with('.') && name != "target" {
                collect_py_files(&path, result);
            }
        } else if path.extension().is_some_and(|e| e == "py") {
            result.push(path);
        }
    }
}
