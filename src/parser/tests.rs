use super::ast::*;
use super::*;
use crate::lexer::Lexer;

fn parse_ok(src: &str) -> Class {
    let lexer = Lexer::tokenize(src).expect("lex failed");
    Parser::new(lexer).parse_class().expect("parse failed")
}

#[test]
fn parses_minimal_package() {
    let class = parse_ok("package demo\n");
    assert_eq!(class.name.name, "demo");
    assert!(class.imports.is_empty());
    assert!(class.functions.is_empty());
}

#[test]
fn parses_single_import() {
    let class = parse_ok("package demo\nimport \"std\"\n");
    assert_eq!(
        class.imports,
        vec![Import::Single(Ident {
            name: "std".into(),
            span: Span::new(0, 0),
        })]
    );
}

#[test]
fn parses_import_list() {
    let class = parse_ok("package demo\nimport (\n\"std\"\n\"fmt\"\n)\n");
    match &class.imports[0] {
        Import::List(names) => {
            assert_eq!(names.len(), 2);
            assert_eq!(names[0].name, "std");
            assert_eq!(names[1].name, "fmt");
        }
        other => panic!("expected import list, got {other:?}"),
    }
}

#[test]
fn parses_function_with_args_and_return_type() {
    let class = parse_ok("package demo\nfunc greet(name string) string {\nreturn name\n}\n");
    let func = &class.functions[0];
    assert_eq!(func.name.name, "greet");
    assert_eq!(func.arguments.len(), 1);
    assert_eq!(func.arguments[0].name.name, "name");
    assert_eq!(func.arguments[0].ty.name, "string");
    assert_eq!(func.return_types.len(), 1);
    assert_eq!(func.return_types[0].name, "string");
    assert_eq!(
        func.statements,
        vec![Stmt::Return {
            value: Expr::Identifier(Ident {
                name: "name".into(),
                span: Span::new(0, 0)
            }),
            span: Span::new(0, 0),
        }]
    );
}

#[test]
fn parses_function_with_no_return_type() {
    let class = parse_ok("package demo\nfunc noop() {\n}\n");
    assert!(class.functions[0].return_types.is_empty());
}

#[test]
fn var_decl_assign_and_create_are_distinct_statements() {
    let class = parse_ok("package demo\nfunc f() {\nvar x int\nx = 1\ny := 2\n}\n");
    let stmts = &class.functions[0].statements;
    assert!(matches!(stmts[0], Stmt::VarDecl { .. }));
    assert!(matches!(stmts[1], Stmt::VarAssign { .. }));
    assert!(matches!(stmts[2], Stmt::VarCreate { .. }));
}

#[test]
fn expression_is_left_associative_with_equal_precedence() {
    let class = parse_ok("package demo\nfunc f() {\nx := 1 + 2 * 3\n}\n");
    let Stmt::VarCreate { value, .. } = &class.functions[0].statements[0] else {
        panic!("expected var-create statement");
    };
    // (1 + 2) * 3, not 1 + (2 * 3): no precedence climbing.
    assert_eq!(value.to_source(), "1 + 2 * 3");
    match value {
        Expr::Binary {
            op: BinOp::Mul,
            left,
            ..
        } => {
            assert!(matches!(**left, Expr::Binary { op: BinOp::Add, .. }));
        }
        other => panic!("expected top-level multiply, got {other:?}"),
    }
}

#[test]
fn parses_method_call_with_arguments() {
    let class = parse_ok("package demo\nfunc f() {\nplayer.Send(\"hi\" name)\n}\n");
    let Stmt::Expr(Expr::MethodCall {
        object,
        method,
        arguments,
        ..
    }) = &class.functions[0].statements[0]
    else {
        panic!("expected method-call statement");
    };
    assert_eq!(object.name, "player");
    assert_eq!(method.name, "Send");
    assert_eq!(arguments.len(), 2);
}

#[test]
fn parses_if_else() {
    let class =
        parse_ok("package demo\nfunc f() {\nif x == 1 {\nreturn x\n} else {\nreturn 0\n}\n}\n");
    let Stmt::If {
        then_block,
        else_block,
        ..
    } = &class.functions[0].statements[0]
    else {
        panic!("expected if statement");
    };
    assert_eq!(then_block.len(), 1);
    assert!(else_block.is_some());
    assert_eq!(else_block.as_ref().unwrap().len(), 1);
}

#[test]
fn if_without_else_has_no_else_block() {
    let class = parse_ok("package demo\nfunc f() {\nif x == 1 {\nreturn x\n}\n}\n");
    let Stmt::If { else_block, .. } = &class.functions[0].statements[0] else {
        panic!("expected if statement");
    };
    assert!(else_block.is_none());
}

#[test]
fn unexpected_token_is_a_fatal_parse_error() {
    let lexer = Lexer::tokenize("package demo\nfunc f( {\n}\n").unwrap();
    let err = Parser::new(lexer).parse_class().unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedToken { .. }));
}

#[test]
fn unexpected_eof_is_a_distinct_parse_error() {
    let lexer = Lexer::tokenize("package demo\nfunc f(").unwrap();
    let err = Parser::new(lexer).parse_class().unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedEof { .. }));
}

#[test]
fn round_trip_through_to_source_is_structurally_equal() {
    let original = parse_ok("package demo\nfunc f(a int) int {\nx := a + 1\nreturn x\n}\n");
    let reparsed = parse_ok(&original.to_source());
    assert_eq!(original, reparsed);
}

#[test]
fn parse_entry_point_rejects_lex_errors() {
    let result = parse("package demo\nfunc f() {\n\"unterminated\n}\n");
    assert!(matches!(result, Err(ParseFailure::Lex(_))));
}
