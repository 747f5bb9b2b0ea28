use super::*;

fn run(source: &str) -> Result<String, RuntimeError> {
    let module = crate::parse_source_silent(source).unwrap();
    run_module(&module, DEFAULT_MAX_STEPS)
}

fn out(source: &str) -> String {
    run(source).unwrap()
}

// --- Output ---

#[test]
fn test_print_formats_like_str() {
    assert_eq!(
        out("print(1, 'a', 2.5, True, None, [1, 'b'])\n"),
        "1 a 2.5 True None [1, 'b']\n"
    );
    assert_eq!(out("print()\n"), "\n");
}

#[test]
fn test_assignment_and_names() {
    assert_eq!(out("x = 2\ny = x * 3\nprint(y)\n"), "6\n");
}

// --- Arithmetic ---

#[test]
fn test_floor_division_and_modulo_signs() {
    assert_eq!(
        out("print(7 // 2, -7 // 2, 7 // -2, -7 // -2)\n"),
        "3 -4 -4 3\n"
    );
    assert_eq!(out("print(7 % 3, -7 % 3, 7 % -3, -7 % -3)\n"), "1 2 -2 -1\n");
    assert_eq!(out("print(7.5 // 2, -7.5 % 2)\n"), "3.0 0.5\n");
}

#[test]
fn test_true_division_is_float() {
    assert_eq!(out("print(6 / 3, 1 / 4)\n"), "2.0 0.25\n");
}

#[test]
fn test_mixed_numeric_and_bool() {
    assert_eq!(out("print(True + 1, 2 * 1.5, -True)\n"), "2 3.0 -1\n");
}

#[test]
fn test_sequences() {
    assert_eq!(
        out("print('ab' + 'c', 'x' * 3, [1] + [2], [0] * 2)\n"),
        "abc xxx [1, 2] [0, 0]\n"
    );
    assert_eq!(out("print('ab' * -1, [1] * 0, 2 * 'c')\n"), " [] cc\n");
}

#[test]
fn test_huge_repetition_hits_budget_instead_of_allocating() {
    assert!(matches!(
        run("x = 'ab' * 9000000000000000000\n"),
        Err(RuntimeError::StepLimit { .. })
    ));
    assert!(matches!(
        run("x = [1, 2] * 4611686018427387904\n"),
        Err(RuntimeError::StepLimit { .. })
    ));
    assert!(matches!(
        run("x = [1, 2, 3] * 9223372036854775807\n"),
        Err(RuntimeError::Overflow { .. })
    ));
    // Nothing to allocate, however many times.
    assert_eq!(
        out("print('' * 9223372036854775807, [] * 9223372036854775807)\n"),
        " []\n"
    );
}

#[test]
fn test_division_by_zero() {
    assert!(matches!(run("x = 1 // 0\n"), Err(RuntimeError::ZeroDivision { .. })));
    assert!(matches!(run("x = 1 % 0\n"), Err(RuntimeError::ZeroDivision { .. })));
    assert!(matches!(run("x = 1.0 / 0\n"), Err(RuntimeError::ZeroDivision { .. })));
}

#[test]
fn test_integer_overflow_is_an_error() {
    assert!(matches!(
        run("x = 9223372036854775807 + 1\n"),
        Err(RuntimeError::Overflow { .. })
    ));
}

#[test]
fn test_type_errors() {
    assert!(matches!(run("x = 'a' + 1\n"), Err(RuntimeError::TypeError { .. })));
    assert!(matches!(run("x = 'a' < 1\n"), Err(RuntimeError::TypeError { .. })));
    assert!(matches!(run("x = 1 in 2\n"), Err(RuntimeError::TypeError { .. })));
    assert!(matches!(run("for i in 3:\n    pass\n"), Err(RuntimeError::TypeError { .. })));
}

// --- Logic ---

#[test]
fn test_short_circuit_returns_deciding_operand() {
    assert_eq!(out("print(0 or 'x', 1 and 0, [] or [], 2 and 3)\n"), "x 0 [] 3\n");
}

#[test]
fn test_short_circuit_skips_evaluation() {
    // The right operand would fail if evaluated.
    assert_eq!(out("print(True or undefined, False and undefined)\n"), "True False\n");
}

#[test]
fn test_chained_comparison() {
    assert_eq!(out("print(1 < 2 < 3, 1 < 3 < 2, 3 > 2 == 2)\n"), "True False True\n");
    // Later links are not evaluated once the chain fails.
    assert_eq!(out("print(2 < 1 < undefined)\n"), "False\n");
}

#[test]
fn test_identity_and_membership() {
    assert_eq!(
        out("a = [1]\nb = a\nprint(a is b, a is [1], a == [1], None is None, 1 is not None)\n"),
        "True False True True True\n"
    );
    assert_eq!(
        out("print(2 in [1, 2], 3 not in [1, 2], 'b' in 'abc', 1 in [True])\n"),
        "True True True True\n"
    );
}

// --- Control flow ---

#[test]
fn test_if_elif_else() {
    let source = "for i in [1, 2, 3]:\n    if i == 1:\n        print('one')\n    elif i == 2:\n        print('two')\n    else:\n        print('many')\n";
    assert_eq!(out(source), "one\ntwo\nmany\n");
}

#[test]
fn test_for_else_runs_after_loop() {
    assert_eq!(
        out("for i in range(2):\n    print(i)\nelse:\n    print('done', i)\n"),
        "0\n1\ndone 1\n"
    );
}

#[test]
fn test_loop_over_string() {
    assert_eq!(out("for c in 'ab':\n    print(c)\n"), "a\nb\n");
}

// --- Builtins ---

#[test]
fn test_range_forms() {
    assert_eq!(
        out("print(range(3), range(1, 3), range(5, 0, -2), range(3, 1))\n"),
        "[0, 1, 2] [1, 2] [5, 3, 1] []\n"
    );
    assert!(matches!(run("x = range(1, 2, 0)\n"), Err(RuntimeError::ValueError { .. })));
}

#[test]
fn test_len_str_abs() {
    assert_eq!(
        out("print(len([1, 2]), len('abc'), str(12) + '!', abs(-3), abs(-2.5))\n"),
        "2 3 12! 3 2.5\n"
    );
}

#[test]
fn test_min_max() {
    assert_eq!(
        out("print(min(3, 1, 2), max([4, 9, 2]), max('a', 'b'), min(1, 1.0))\n"),
        "1 9 b 1\n"
    );
    assert!(matches!(run("x = max([])\n"), Err(RuntimeError::ValueError { .. })));
}

#[test]
fn test_builtin_arity_errors() {
    assert!(matches!(run("x = len(1, 2)\n"), Err(RuntimeError::TypeError { .. })));
    assert!(matches!(run("x = abs()\n"), Err(RuntimeError::TypeError { .. })));
}

#[test]
fn test_undefined_names() {
    let err = run("print(x)\n").unwrap_err();
    assert_eq!(err.to_string(), "name 'x' is not defined");
    assert!(matches!(run("f(1)\n"), Err(RuntimeError::UndefinedName { .. })));
}

#[test]
fn test_calling_a_value_is_an_error() {
    assert!(matches!(run("x = 1\nx(2)\n"), Err(RuntimeError::TypeError { .. })));
}

// --- Budget ---

#[test]
fn test_step_limit() {
    let module = crate::parse_source_silent("for i in range(100):\n    x = i\n").unwrap();
    let err = run_module(&module, 50).unwrap_err();
    assert!(matches!(err, RuntimeError::StepLimit { limit: 50, .. }));
    assert!(run_module(&module, 1_000).is_ok());
}

#[test]
fn test_huge_range_hits_budget_instead_of_allocating() {
    let module = crate::parse_source_silent("x = range(1000000000000)\n").unwrap();
    assert!(matches!(
        run_module(&module, 1_000),
        Err(RuntimeError::StepLimit { .. })
    ));
}

#[test]
fn test_interpreter_exposes_state() {
    let module = crate::parse_source_silent("x = 40 + 2\nprint(x)\n").unwrap();
    let mut interp = Interpreter::new(100);
    interp.run(&module).unwrap();
    assert_eq!(interp.output(), "42\n");
    assert!(matches!(interp.global("x"), Some(Value::Int(42))));
    assert_eq!(interp.steps(), 3);
}

#[test]
fn test_error_spans_point_at_source() {
    let source = "x = 1\ny = x + 'a'\n";
    let err = run(source).unwrap_err();
    assert_eq!(&source[err.span().range()], "x + 'a'");
}
