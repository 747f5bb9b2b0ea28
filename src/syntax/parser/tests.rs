use crate::ast::*;
use crate::diagnostic::Diagnostic;

fn parse(source: &str) -> Module {
    match crate::parse_source_silent(source) {
        Ok(module) => module,
        Err(errors) => panic!("parse failed: {:?}", errors),
    }
}

fn parse_err(source: &str) -> Vec<Diagnostic> {
    match crate::parse_source_silent(source) {
        Ok(_) => panic!("expected a parse error for {:?}", source),
        Err(errors) => errors,
    }
}

fn only_expr(source: &str) -> Expr {
    let module = parse(source);
    match &module.body[0].kind {
        StmtKind::Expr(e) => e.node.clone(),
        StmtKind::Assign { value, .. } => value.node.clone(),
        other => panic!("expected expression statement, got {}", other.name()),
    }
}

#[test]
fn test_simple_statements() {
    let module = parse("x = 1\nprint(x)\npass\n");
    let kinds: Vec<_> = module.body.iter().map(|s| s.kind.name()).collect();
    assert_eq!(kinds, vec!["Assign", "Expr", "Pass"]);
}

#[test]
fn test_statement_ids_are_unique() {
    let module = parse("if a:\n    x = 1\nelse:\n    y = 2\nfor i in xs:\n    pass\n");
    let mut ids = Vec::new();
    visit::walk_stmts(&module.body, &mut |s| ids.push(s.id));
    let count = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), count);
    assert_eq!(count, module.stmt_count());
}

#[test]
fn test_elif_desugars_to_nested_if() {
    let module = parse("if a:\n    x = 1\nelif b:\n    x = 2\nelse:\n    x = 3\n");
    assert_eq!(module.body.len(), 1);
    let StmtKind::If { orelse, .. } = &module.body[0].kind else {
        panic!("expected If");
    };
    assert_eq!(orelse.len(), 1);
    let StmtKind::If { body, orelse, .. } = &orelse[0].kind else {
        panic!("expected nested If");
    };
    assert_eq!(body.len(), 1);
    assert_eq!(orelse.len(), 1);
}

#[test]
fn test_for_with_else() {
    let module = parse("for i in range(3):\n    print(i)\nelse:\n    print(9)\n");
    let StmtKind::For {
        target,
        iter,
        body,
        orelse,
    } = &module.body[0].kind
    else {
        panic!("expected For");
    };
    assert_eq!(target.node, "i");
    assert!(matches!(iter.node, Expr::Call { .. }));
    assert_eq!(body.len(), 1);
    assert_eq!(orelse.len(), 1);
}

#[test]
fn test_inline_body() {
    let module = parse("if x: pass\nelse: y = 1\n");
    let StmtKind::If { body, orelse, .. } = &module.body[0].kind else {
        panic!("expected If");
    };
    assert!(matches!(body[0].kind, StmtKind::Pass));
    assert!(matches!(orelse[0].kind, StmtKind::Assign { .. }));
}

#[test]
fn test_bool_ops_are_flattened() {
    let Expr::BoolOp { op, values } = only_expr("a or b or c\n") else {
        panic!("expected BoolOp");
    };
    assert_eq!(op, BoolOp::Or);
    assert_eq!(values.len(), 3);
}

#[test]
fn test_and_binds_tighter_than_or() {
    let Expr::BoolOp { op, values } = only_expr("a or b and c\n") else {
        panic!("expected BoolOp");
    };
    assert_eq!(op, BoolOp::Or);
    assert!(matches!(
        values[1].node,
        Expr::BoolOp {
            op: BoolOp::And,
            ..
        }
    ));
}

#[test]
fn test_not_binds_looser_than_comparison() {
    let Expr::UnaryOp { op, operand } = only_expr("not a == b\n") else {
        panic!("expected UnaryOp");
    };
    assert_eq!(op, UnaryOp::Not);
    assert!(matches!(operand.node, Expr::Compare { .. }));
}

#[test]
fn test_comparison_chain() {
    let Expr::Compare {
        ops, comparators, ..
    } = only_expr("a < b <= c != d\n")
    else {
        panic!("expected Compare");
    };
    assert_eq!(ops, vec![CmpOp::Lt, CmpOp::LtE, CmpOp::NotEq]);
    assert_eq!(comparators.len(), 3);
}

#[test]
fn test_two_word_comparisons() {
    let Expr::Compare { ops, .. } = only_expr("a is not b not in c in d is e\n") else {
        panic!("expected Compare");
    };
    assert_eq!(ops, vec![CmpOp::IsNot, CmpOp::NotIn, CmpOp::In, CmpOp::Is]);
}

#[test]
fn test_arithmetic_precedence_and_associativity() {
    let Expr::BinOp { op, lhs, rhs } = only_expr("a - b - c * d\n") else {
        panic!("expected BinOp");
    };
    assert_eq!(op, BinOp::Sub);
    assert!(matches!(lhs.node, Expr::BinOp { op: BinOp::Sub, .. }));
    assert!(matches!(rhs.node, Expr::BinOp { op: BinOp::Mul, .. }));
}

#[test]
fn test_unary_minus_and_calls() {
    let Expr::Call { func, args } = only_expr("max(-1, [2, 3], f(x)(y))\n") else {
        panic!("expected Call");
    };
    assert_eq!(func.node, Expr::Name("max".to_string()));
    assert_eq!(args.len(), 3);
    assert!(matches!(args[0].node, Expr::UnaryOp { op: UnaryOp::Neg, .. }));
    assert!(matches!(&args[1].node, Expr::List(items) if items.len() == 2));
    assert!(matches!(&args[2].node, Expr::Call { func, .. } if matches!(func.node, Expr::Call { .. })));
}

#[test]
fn test_literals() {
    let Expr::List(items) = only_expr("[1, 2.5, 'hi', True, False, None]\n") else {
        panic!("expected List");
    };
    let literals: Vec<_> = items.into_iter().map(|e| e.node).collect();
    assert_eq!(
        literals,
        vec![
            Expr::Literal(Literal::Int(1)),
            Expr::Literal(Literal::Float(2.5)),
            Expr::Literal(Literal::Str("hi".to_string())),
            Expr::Literal(Literal::Bool(true)),
            Expr::Literal(Literal::Bool(false)),
            Expr::Literal(Literal::None),
        ]
    );
}

#[test]
fn test_parenthesised_expression() {
    let Expr::BinOp { op, lhs, .. } = only_expr("(a + b) * c\n") else {
        panic!("expected BinOp");
    };
    assert_eq!(op, BinOp::Mul);
    assert!(matches!(lhs.node, Expr::BinOp { op: BinOp::Add, .. }));
}

#[test]
fn test_spans_cover_statement() {
    let source = "x = a + b\n";
    let module = parse(source);
    let span = module.body[0].span;
    assert_eq!(&source[span.range()], "x = a + b");
}

#[test]
fn test_blank_lines_and_comments() {
    let module = parse("# header\n\nx = 1  # trailing\n\n\ny = 2\n");
    assert_eq!(module.body.len(), 2);
}

#[test]
fn test_error_unknown_two_word_operator() {
    let errors = parse_err("x = a not is b\n");
    assert!(errors[0].message.contains("not is"));
}

#[test]
fn test_error_missing_expression() {
    let errors = parse_err("x = \n");
    assert!(errors[0].message.contains("expected expression"));
}

#[test]
fn test_error_unsupported_statement() {
    let errors = parse_err("while x:\n    pass\n");
    assert!(!errors.is_empty());
}

#[test]
fn test_error_missing_block() {
    let errors = parse_err("if x:\ny = 1\n");
    assert!(errors[0].message.contains("indented block"));
}

#[test]
fn test_error_dangling_else() {
    let errors = parse_err("x = 1\nelse:\n    pass\n");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("without a matching 'if'"));
}

#[test]
fn test_error_unexpected_indent() {
    let errors = parse_err("x = 1\n    y = 2\n");
    assert!(errors[0].message.contains("unexpected indent"));
}

#[test]
fn test_error_tuple() {
    let errors = parse_err("x = (1, 2)\n");
    assert!(errors[0].message.contains("tuples"));
}

#[test]
fn test_error_assignment_to_call() {
    let errors = parse_err("f(x) = 1\n");
    assert!(errors[0].message.contains("expected end of line"));
}

#[test]
fn test_nesting_limit() {
    let source = format!("x = {}1{}\n", "(".repeat(200), ")".repeat(200));
    let errors = parse_err(&source);
    assert!(errors.iter().any(|d| d.message.contains("nesting depth")));
}

#[test]
fn test_errors_recover_per_line() {
    let errors = parse_err("x = )\ny = 1\nz = ]\n");
    assert_eq!(errors.len(), 2);
}
