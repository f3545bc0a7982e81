use std::fs;
use pretty_assertions::assert_eq;
use iona_lang::RunError;
use iona_lang::interpreter::error::Error;
use iona_lang::interpreter::evaluator::Interpreter;
use iona_lang::interpreter::lexer::Lexer;
use iona_lang::interpreter::parser::Parser;
use iona_lang::interpreter::semantic::SemanticAnalyzer;
use iona_lang::interpreter::symbols::SymbolKind;
use iona_lang::interpreter::value::ValueKind;

fn run_with(source: &str, args: &[&str], input: &str) -> (Result<(), Error>, String) {
    let mut output = Vec::new();

    let result = (|| {
        let ast = Parser::new(Lexer::new(source, "program.ion")).parse()?;
        SemanticAnalyzer::new().analyze(&ast)?;

        let args = args.iter().map(|arg| arg.to_string()).collect();
        Interpreter::with_io(args, &mut output, input.as_bytes()).interpret(&ast)
    })();

    (result, String::from_utf8(output).expect("output is not UTF-8"))
}

fn run(source: &str) -> (Result<(), Error>, String) {
    run_with(source, &[], "")
}

fn output_of(source: &str) -> String {
    let (result, output) = run(source);
    assert_eq!(Ok(()), result, "program failed; output so far: {:?}", output);
    output
}

#[test]
fn hello_world() {
    assert_eq!("hi\n", output_of(r#"func Main(){ WriteLine("hi") }"#));
}

#[test]
fn global_array_size() {
    assert_eq!("3\n", output_of("var a=[1,2,3]\nfunc Main(){ WriteLine(Size(a)) }"));
}

#[test]
fn range_loop() {
    assert_eq!("0\n1\n2\n", output_of("func Main(){ for i in 0..3 { WriteLine(i) } }"));
}

#[test]
fn if_else() {
    assert_eq!("yes\n", output_of(r#"func Main(){ var x=1 if x==1 { WriteLine("yes") } else { WriteLine("no") } }"#));
}

#[test]
fn interpolated_string() {
    assert_eq!("a2b\n", output_of(r#"func Main(){ var s="a{1+1}b" WriteLine(s) }"#));
}

#[test]
fn block_comments_do_not_nest() {
    assert_eq!("hi\n", output_of("/* lists src/*.ion files */\nfunc Main() { WriteLine(\"hi\") }"));
}

#[test]
fn missing_main() {
    let (result, output) = run("var x = 1\nfunc Helper() { WriteLine(x) }");

    assert!(matches!(result, Err(Error::MissingMain { .. })));
    assert_eq!("", output);
}

#[test]
fn semantic_errors_come_before_any_output() {
    let (result, output) = run(r#"
        func Main() {
            WriteLine("start")
            Helper()
        }

        func Helper() {
            WriteLine(local)
        }
    "#);

    assert!(matches!(result, Err(Error::NotDeclared { kind: SymbolKind::Variable, ref name, .. }) if name == "local"));
    assert_eq!("", output);
}

#[test]
fn functions_may_be_declared_in_any_order() {
    assert_eq!("15\n", output_of(r#"
        var total = 0

        func Main() {
            var values = [1, 2, 3, 4, 5]
            for value in values {
                Add(value)
            }

            WriteLine(total)
        }

        func Add(value) {
            total += value
        }
    "#));
}

#[test]
fn assignments_keep_the_declared_kind() {
    let (result, output) = run(r#"
        func Main() {
            var count = 1
            count = 2
            WriteLine(count)
            count = 2.5
        }
    "#);

    assert!(matches!(result, Err(Error::TypeMismatch { expected: ValueKind::Int, found: ValueKind::Float, .. })));
    assert_eq!("2\n", output);
}

#[test]
fn array_built_ins() {
    assert_eq!("[2, 1, 0]\n3\ntrue\nfalse\n", output_of(r#"
        func Main() {
            var r = Reverse(Range(3))
            WriteLine(r)
            WriteLine(Size(r))
            WriteLine(Contains(r, 2))
            WriteLine(Empty(r))
        }
    "#));
}

#[test]
fn string_built_ins() {
    assert_eq!("HELLO WORLD\n[a, b, c]\ntrue\n", output_of(r#"
        func Main() {
            WriteLine(ToUpperCase(Trim("  hello world  ")))
            WriteLine(Split("a,b,c", ","))
            WriteLine(StartsWith("iona", "io"))
        }
    "#));
}

#[test]
fn built_in_dispatch_errors() {
    let (result, _) = run("func Main() { WriteLine(1, 2) }");
    assert!(matches!(result, Err(Error::ArgumentCount { expected: 1, got: 2, .. })));

    let (result, _) = run("func Main() { var n = Size(1) }");
    assert!(matches!(result, Err(Error::ArgumentKind { index: 0, found: ValueKind::Int, .. })));

    let (result, _) = run("func Main() { var n = Min(1, 2.0) }");
    assert!(matches!(result, Err(Error::Native { ref function, .. }) if function == "Min"));
}

#[test]
fn huge_ranges_are_a_runtime_error() {
    let (result, output) = run("func Main() { var r = Range(INT_MAX) WriteLine(Size(r)) }");

    assert!(matches!(result, Err(Error::Native { ref function, .. }) if function == "Range"));
    assert_eq!("", output);
}

#[test]
fn user_functions_check_their_arity() {
    let (result, _) = run("func Main() { Greet() }\nfunc Greet(name) { WriteLine(name) }");
    assert!(matches!(result, Err(Error::ArgumentCount { expected: 1, got: 0, .. })));
}

#[test]
fn arguments_and_input() {
    let (result, output) = run_with(r#"
        func Main() {
            var name = ReadLine()
            for arg in ARGS {
                WriteLine("{arg}, {name}")
            }
        }
    "#, &["hello", "bye"], "Iona\n");

    assert_eq!(Ok(()), result);
    assert_eq!("hello, Iona\nbye, Iona\n", output);
}

#[test]
fn files_round_trip() {
    let dir = tempfile::tempdir().expect("no temp dir");
    let path = dir.path().join("lines.txt").to_string_lossy().into_owned();

    let (result, output) = run_with(r#"
        func Main() {
            var lines = ["one", "two"]
            FileWriteLines(ARGS[0], lines)
            for line in FileReadLines(ARGS[0]) {
                WriteLine(ToUpperCase(line))
            }
            WriteLine(FileExists(ARGS[0]))
        }
    "#, &[path.as_str()], "");

    assert_eq!(Ok(()), result);
    assert_eq!("ONE\nTWO\ntrue\n", output);
    assert_eq!("one\ntwo\n", fs::read_to_string(&path).expect("file not written"));
}

#[test]
fn source_files() {
    let dir = tempfile::tempdir().expect("no temp dir");
    let path = dir.path().join("script.ion");

    fs::write(&path, "func Main() {\n    WriteLine(1)\n}\n").expect("cannot write script");
    let ast = iona_lang::parse(&path).expect("parse failed");
    assert!(ast.root().is_some());

    fs::write(&path, "var x = 1\nfunc Helper() { }\n").expect("cannot write script");
    assert!(matches!(iona_lang::run_file(&path, vec![]), Err(RunError::Interpreter(Error::MissingMain { .. }))));

    let missing = dir.path().join("missing.ion");
    assert!(matches!(iona_lang::parse(&missing), Err(RunError::Io { .. })));
}
