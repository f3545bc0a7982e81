use crate::interpreter::lexer::Lexer;
use crate::interpreter::parser::Parser;
use super::*;

fn analyze(source: &str) -> Result<()> {
    let ast = Parser::new(Lexer::new(source, "test.ion")).parse().expect("parse error");
    SemanticAnalyzer::new().analyze(&ast)
}

fn assert_not_declared(source: &str, expected_kind: SymbolKind, expected_name: &str) {
    match analyze(source) {
        Err(Error::NotDeclared { kind, name, .. }) => {
            assert_eq!(expected_kind, kind);
            assert_eq!(expected_name, name);
        },
        other => panic!("expected NotDeclared for {}, got {:?}", expected_name, other),
    }
}

fn assert_already_declared(source: &str, expected_name: &str) {
    match analyze(source) {
        Err(Error::AlreadyDeclared { name, .. }) => assert_eq!(expected_name, name),
        other => panic!("expected AlreadyDeclared for {}, got {:?}", expected_name, other),
    }
}

mod declarations {
    use super::*;

    #[test]
    fn valid_program() {
        assert_eq!(Ok(()), analyze(r#"
            var total = 0
            var names = ["a", "b"]

            func Main() {
                for name in names {
                    total += Size(name)
                }

                for i in 0..Size(ARGS) step 1 {
                    WriteLine("{ARGS[i]}: {Add(i, total)}")
                }

                var x = PI * 2.0
                x++
            }

            func Add(a, b) {
                return a + b
            }
        "#));
    }

    #[test]
    fn duplicate_variable() {
        assert_already_declared("func Main() { var x = 1 var x = 2 }", "x");
        assert_already_declared("var g = 1 var g = 2 func Main() { }", "g");
    }

    #[test]
    fn duplicate_function() {
        assert_already_declared("func Main() { }\nfunc Main() { }", "Main");
        assert_already_declared("func Main() { }\nfunc WriteLine(x) { }", "WriteLine");
    }

    #[test]
    fn duplicate_parameter() {
        assert_already_declared("func Main() { }\nfunc F(a, a) { }", "a");
    }

    #[test]
    fn names_of_enclosing_scopes_cannot_be_reused() {
        assert_already_declared("var x = 1 func Main() { var x = \"inner\" }", "x");
        assert_already_declared("func Main() { var x = 1 if true { var x = 2.0 } }", "x");
        assert_already_declared("var i = 9\nfunc Main() { for i in 0..2 { WriteLine(i) } }", "i");
        assert_already_declared("var a = 1\nfunc Main() { }\nfunc F(a) { }", "a");
        assert_already_declared("func Main() { var PI = 3 }", "PI");
    }

    #[test]
    fn sibling_scopes_may_reuse_names() {
        assert_eq!(Ok(()), analyze(r#"
            func Main() {
                for i in 0..2 { var x = i }
                for i in 0..2 { var x = i }
                var x = 1
            }

            func F(i) {
                var x = i
            }
        "#));
    }
}

mod usages {
    use super::*;

    #[test]
    fn undeclared_variable() {
        assert_not_declared("func Main() { WriteLine(y) }", SymbolKind::Variable, "y");
        assert_not_declared("func Main() { y = 1 }", SymbolKind::Variable, "y");
        assert_not_declared("func Main() { y[0] = 1 }", SymbolKind::Variable, "y");
        assert_not_declared("func Main() { var s = \"{y}\" }", SymbolKind::Variable, "y");
    }

    #[test]
    fn undeclared_function() {
        assert_not_declared("func Main() { Nope(1) }", SymbolKind::Function, "Nope");
    }

    #[test]
    fn functions_are_not_variables() {
        assert_not_declared("func Main() { var x = WriteLine }", SymbolKind::Variable, "WriteLine");
    }

    #[test]
    fn block_variables_do_not_escape() {
        assert_not_declared("func Main() { if true { var inner = 1 } WriteLine(inner) }", SymbolKind::Variable, "inner");
        assert_not_declared("func Main() { while false { var inner = 1 } inner++ }", SymbolKind::Variable, "inner");
        assert_not_declared("func Main() { for i in 0..2 { } WriteLine(i) }", SymbolKind::Variable, "i");
    }

    #[test]
    fn locals_of_other_functions_are_hidden() {
        assert_not_declared("func Main() { F() WriteLine(local) }\nfunc F() { var local = 1 }", SymbolKind::Variable, "local");
    }

    #[test]
    fn initializer_cannot_use_its_own_variable() {
        assert_not_declared("func Main() { var x = x + 1 }", SymbolKind::Variable, "x");
    }
}

#[test]
fn statements_share_the_global_scope() {
    let mut analyzer = SemanticAnalyzer::new();
    let mut parser = Parser::new(Lexer::new("var x = 1 x += 2 WriteLine(x)", "repl"));
    let statements = parser.parse_statements().expect("parse error");
    let ast = parser.into_ast();

    for statement in statements {
        assert_eq!(Ok(()), analyzer.analyze_statement(&ast, statement));
    }

    let mut analyzer = SemanticAnalyzer::with_scope(analyzer.scope());
    let mut parser = Parser::new(Lexer::new("var x = 3", "repl"));
    let statement = parser.statement().expect("parse error");
    let ast = parser.into_ast();

    assert!(matches!(analyzer.analyze_statement(&ast, statement), Err(Error::AlreadyDeclared { .. })));
}

#[test]
fn failed_scopes_are_left() {
    let mut analyzer = SemanticAnalyzer::new();
    let scope = analyzer.scope();

    let mut parser = Parser::new(Lexer::new("if true { WriteLine(nope) }", "repl"));
    let statement = parser.statement().expect("parse error");
    let ast = parser.into_ast();

    assert!(analyzer.analyze_statement(&ast, statement).is_err());
    assert!(Rc::ptr_eq(&scope, &analyzer.scope()));
}
