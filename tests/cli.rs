use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const FIZZBUZZ: &str = include_str!("programs/fizzbuzz.py");

fn beautify_cmd(args: &[&str], dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_beautify"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run beautify binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_run_writes_transformed_program() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("fizzbuzz.py"), FIZZBUZZ).unwrap();

    let output = beautify_cmd(&["run", "fizzbuzz.py", "-o", "out.py", "--check"], dir.path());
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("EQUIVALENT"));

    let transformed = fs::read_to_string(dir.path().join("out.py")).unwrap();
    assert!(!transformed.contains("for "));
    assert!(transformed.contains("i = 1\n"));
}

#[test]
fn test_run_prints_to_stdout_with_selected_passes() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("prog.py"), "if a or b:\n    x = 1\n").unwrap();

    let output = beautify_cmd(&["run", "prog.py", "--passes", "demorgan-flipper"], dir.path());
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "if not (not a and not b):\n    x = 1\n");
}

#[test]
fn test_run_uses_project_config() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir(&src).unwrap();
    fs::write(
        dir.path().join("beautify.toml"),
        "[pipeline]\npasses = [\"DoubleNegativeCreator\"]\n",
    )
    .unwrap();
    fs::write(src.join("prog.py"), "x = 1 < 2\n").unwrap();

    let output = beautify_cmd(&["run", "src/prog.py"], dir.path());
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "x = not 1 >= 2\n");

    // The command line wins over the file.
    let output = beautify_cmd(&["run", "src/prog.py", "--passes", "SafetyPasser"], dir.path());
    assert_eq!(stdout(&output), "x = 1 < 2\n");
}

#[test]
fn test_run_rejects_bad_ordering() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("prog.py"), "x = 1\n").unwrap();

    let output = beautify_cmd(&["run", "prog.py", "--passes", "IfDepthMaximizer"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("needs a depth annotation"));
}

#[test]
fn test_run_rejects_unknown_pass() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("prog.py"), "x = 1\n").unwrap();

    let output = beautify_cmd(&["run", "prog.py", "--passes", "Scrambler"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("unknown pass `Scrambler`"));
}

#[test]
fn test_parse_error_exits_with_failure() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bad.py"), "while x:\n    pass\n").unwrap();

    let output = beautify_cmd(&["run", "bad.py"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("parse errors in 'bad.py'"));
}

#[test]
fn test_check_reports_divergence() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.py"), "print(1)\nprint(2)\n").unwrap();
    fs::write(dir.path().join("b.py"), "print(1)\nprint(3)\n").unwrap();

    let output = beautify_cmd(&["check", "a.py", "b.py"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("DIVERGED"), "{}", out);
    assert!(out.contains("output line 2"), "{}", out);

    let output = beautify_cmd(&["check", "a.py", "a.py"], dir.path());
    assert!(output.status.success());
}

#[test]
fn test_dump_annotated_tree() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("prog.py"), "if a:\n    pass\n").unwrap();

    let output = beautify_cmd(&["dump", "prog.py", "--annotate", "--no-color"], dir.path());
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.starts_with("Module:\n"), "{}", out);
    assert!(out.contains("| | | _statement_depth=1\n"), "{}", out);
    assert!(!out.contains("<unset>"), "{}", out);
}

#[test]
fn test_fmt_check_and_rewrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("messy.py");
    fs::write(&path, "x=1+2 # sum\nif x :\n  print( x )\n").unwrap();

    let output = beautify_cmd(&["fmt", "--check", "messy.py"], dir.path());
    assert_eq!(output.status.code(), Some(1));

    let output = beautify_cmd(&["fmt", "messy.py"], dir.path());
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "x = 1 + 2\nif x:\n    print(x)\n"
    );

    let output = beautify_cmd(&["fmt", "--check", "."], dir.path());
    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

#[test]
fn test_fmt_directory_skips_unparsable_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bad.py"), "while x:\n    pass\n").unwrap();
    fs::write(dir.path().join("good.py"), "x=1\n").unwrap();

    let output = beautify_cmd(&["fmt", "."], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("parse errors in"), "{}", stderr(&output));
    assert!(stderr(&output).contains("2 file(s): 1 reformatted, 1 failed"));
    assert_eq!(fs::read_to_string(dir.path().join("good.py")).unwrap(), "x = 1\n");
}

#[test]
fn test_passes_lists_every_pass() {
    let dir = tempfile::tempdir().unwrap();
    let output = beautify_cmd(&["passes"], dir.path());
    assert!(output.status.success());
    let out = stdout(&output);
    for name in [
        "SafetyPasser",
        "ForLoopUnroller",
        "DeMorganFlipper",
        "DoubleNegativeCreator",
        "NodeDepthAnnotator",
        "IfDepthMaximizer",
    ] {
        assert!(out.contains(name), "missing {} in:\n{}", name, out);
    }
    assert!(out.contains("default order: DeMorganFlipper,"));
}

#[test]
fn test_verbose_logs_pass_summaries() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("prog.py"), "x = a and b\n").unwrap();

    let output = beautify_cmd(&["-v", "run", "prog.py", "--passes", "DeMorganFlipper"], dir.path());
    assert!(output.status.success());
    assert!(stderr(&output).contains("pass finished"), "{}", stderr(&output));
}
