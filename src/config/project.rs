use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::diagnostic::Diagnostic;
use crate::passes::{parse_pass_list, PassId};
use crate::pipeline::Pipeline;
use crate::runtime::DEFAULT_MAX_STEPS;
use crate::span::Span;

pub const CONFIG_FILE: &str = "beautify.toml";

/// Settings from a beautify.toml file. Every field is optional; unset
/// fields fall back to the built-in defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Project {
    pub root_dir: PathBuf,
    /// `[pipeline] passes`, in order.
    pub passes: Option<Vec<PassId>>,
    /// `[pipeline] check`: run the equivalence harness after transforming.
    pub check: Option<bool>,
    /// `[runtime] max_steps`.
    pub max_steps: Option<u64>,
}

/// Parse a minimal TOML string array: `["a", "b", "c"]` → `vec!["a", "b", "c"]`.
fn parse_string_array(s: &str) -> Option<Vec<String>> {
    let s = s.trim();
    let inner = s.strip_prefix('[')?.strip_suffix(']')?;
    Some(
        inner
            .split(',')
            .map(|part| part.trim().trim_matches('"').trim_matches('\'').to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    )
}

/// Strip a trailing `# comment` that is not inside a string.
fn strip_comment(line: &str) -> &str {
    let mut quote = None;
    for (i, ch) in line.char_indices() {
        match (quote, ch) {
            (None, '"' | '\'') => quote = Some(ch),
            (Some(q), c) if c == q => quote = None,
            (None, '#') => return &line[..i],
            _ => {}
        }
    }
    line
}

fn config_error(path: &Path, line: usize, message: String) -> Diagnostic {
    Diagnostic::error(
        format!("{}:{}: {}", path.display(), line, message),
        Span::dummy(),
    )
}

impl Project {
    /// Load settings from a beautify.toml file.
    pub fn load(toml_path: &Path) -> Result<Project, Diagnostic> {
        let content = std::fs::read_to_string(toml_path).map_err(|e| {
            Diagnostic::error(
                format!("cannot read '{}': {}", toml_path.display(), e),
                Span::dummy(),
            )
        })?;
        let root_dir = toml_path.parent().unwrap_or(Path::new(".")).to_path_buf();
        let mut project = Self::parse(&content, toml_path)?;
        project.root_dir = root_dir;
        debug!(path = %toml_path.display(), "loaded project settings");
        Ok(project)
    }

    /// Section-aware minimal TOML parsing. `path` is only used in messages.
    pub fn parse(content: &str, path: &Path) -> Result<Project, Diagnostic> {
        let mut project = Project::default();
        let mut current_section = String::new();

        for (index, line) in content.lines().enumerate() {
            let line_no = index + 1;
            let trimmed = strip_comment(line).trim();
            if trimmed.is_empty() {
                continue;
            }
            // Section headers: [pipeline], [runtime]
            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                current_section = trimmed[1..trimmed.len() - 1].trim().to_string();
                continue;
            }
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(config_error(
                    path,
                    line_no,
                    format!("expected `key = value`, found `{}`", trimmed),
                ));
            };
            let key = key.trim().trim_matches('"');
            let value = value.trim();

            match (current_section.as_str(), key) {
                ("pipeline", "passes") => {
                    let names = parse_string_array(value).ok_or_else(|| {
                        config_error(path, line_no, "`passes` must be an array of pass names".to_string())
                    })?;
                    let passes = parse_pass_list(&names.join(",")).map_err(|e| {
                        config_error(path, line_no, e.to_string()).with_help(format!(
                            "known passes: {}",
                            PassId::ALL.map(|p| p.name()).join(", ")
                        ))
                    })?;
                    project.passes = Some(passes);
                }
                ("pipeline", "check") => {
                    let check = value.parse::<bool>().map_err(|_| {
                        config_error(path, line_no, format!("`check` must be true or false, found `{}`", value))
                    })?;
                    project.check = Some(check);
                }
                ("runtime", "max_steps") => {
                    let steps = value.replace('_', "").parse::<u64>().map_err(|_| {
                        config_error(
                            path,
                            line_no,
                            format!("`max_steps` must be a positive integer, found `{}`", value),
                        )
                    })?;
                    project.max_steps = Some(steps);
                }
                (section, key) => {
                    warn!(section, key, line = line_no, "ignoring unknown setting in {}", CONFIG_FILE);
                }
            }
        }

        Ok(project)
    }

    /// Try to find a beautify.toml in the given directory or its ancestors.
    pub fn find(start_dir: &Path) -> Option<PathBuf> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.exists() {
                return Some(candidate);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Find and load the settings that apply to `input`, if any.
    pub fn for_input(input: &Path) -> Result<Option<Project>, Diagnostic> {
        let dir = match input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        match Self::find(&dir) {
            Some(path) => Self::load(&path).map(Some),
            None => Ok(None),
        }
    }
}

/// Effective settings for one run: command-line values first, then the
/// project file, then the built-in defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub passes: Vec<PassId>,
    pub check: bool,
    pub max_steps: u64,
}

impl Settings {
    pub fn resolve(
        project: Option<&Project>,
        passes: Option<Vec<PassId>>,
        check: bool,
        max_steps: Option<u64>,
    ) -> Settings {
        let passes = passes
            .or_else(|| project.and_then(|p| p.passes.clone()))
            .unwrap_or_else(|| Pipeline::default_order().passes().to_vec());
        let check = check || project.and_then(|p| p.check).unwrap_or(false);
        let max_steps = max_steps
            .or_else(|| project.and_then(|p| p.max_steps))
            .unwrap_or(DEFAULT_MAX_STEPS);
        Settings {
            passes,
            check,
            max_steps,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::resolve(None, None, false, None)
    }
}
