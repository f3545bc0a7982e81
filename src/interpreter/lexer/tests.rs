use pretty_assertions::assert_eq;
use super::*;

fn scan_all(source: &str) -> Vec<(TokenType, String)> {
    let mut lexer = Lexer::new(source, "test.ion");
    let mut tokens = vec![];

    loop {
        let token = lexer.scan_token().expect("lexer error");

        if token.token_type() == TokenType::Eof {
            break;
        }

        tokens.push((token.token_type(), token.source().to_owned()));
    }

    tokens
}

fn types(source: &str) -> Vec<TokenType> {
    scan_all(source).into_iter().map(|(token_type, _)| token_type).collect()
}

#[test]
fn calls_are_told_apart_from_names() {
    assert_eq!(vec![
        (TokenType::Call, String::from("WriteLine")),
        (TokenType::ParenthesisLeft, String::from("(")),
        (TokenType::Name, String::from("x")),
        (TokenType::ParenthesisRight, String::from(")")),
    ], scan_all("WriteLine(x)"));

    // A space between the name and the parenthesis makes it a plain name
    assert_eq!(vec![TokenType::Name, TokenType::ParenthesisLeft, TokenType::ParenthesisRight], types("f ()"));
}

#[test]
fn keywords() {
    assert_eq!(vec![
        TokenType::Function, TokenType::Return, TokenType::Var,
        TokenType::Int, TokenType::Float, TokenType::Boolean, TokenType::String,
        TokenType::LiteralBoolean, TokenType::LiteralBoolean,
        TokenType::For, TokenType::In, TokenType::Step,
        TokenType::While, TokenType::Do, TokenType::If, TokenType::Else, TokenType::When,
    ], types("func return var int float bool string true false for in step while do if else when"));

    assert_eq!(vec![TokenType::Name, TokenType::Name], types("functional iffy"));
}

#[test]
fn compound_symbols() {
    assert_eq!(vec![
        TokenType::PlusPlus, TokenType::MinusMinus,
        TokenType::Equal, TokenType::NotEqual,
        TokenType::LessEqual, TokenType::GreaterEqual, TokenType::Arrow,
        TokenType::PlusAssign, TokenType::MinusAssign, TokenType::MultiplyAssign, TokenType::DivideAssign,
        TokenType::Less, TokenType::Greater, TokenType::Assign, TokenType::Not,
    ], types("++ -- == != <= >= => += -= *= /= < > = !"));
}

#[test]
fn numbers() {
    assert_eq!(vec![
        (TokenType::LiteralInt, String::from("42")),
        (TokenType::LiteralFloat, String::from("3.25")),
        (TokenType::LiteralInt, String::from("-7")),
        (TokenType::LiteralFloat, String::from("-0.5")),
    ], scan_all("42 3.25 -7 -0.5"));

    // A dot is only part of a number if a digit follows it
    assert_eq!(vec![TokenType::LiteralInt, TokenType::DotDot, TokenType::LiteralInt], types("0..10"));
    assert_eq!(vec![TokenType::LiteralInt, TokenType::Dot, TokenType::Name], types("1.x"));
}

#[test]
fn minus_is_folded_into_literals() {
    assert_eq!(vec![TokenType::Name, TokenType::LiteralInt], types("x -1"));
    assert_eq!(vec![TokenType::Name, TokenType::Minus, TokenType::Name], types("x - y"));
}

#[test]
fn strings_are_kept_verbatim() {
    assert_eq!(vec![(TokenType::LiteralString, String::from("a {b + 1} c"))], scan_all("\"a {b + 1} c\""));
}

#[test]
fn comments_and_semicolons_are_skipped() {
    let source = "a; // line comment\n/* block\n comment * with / inside */ b /* no /* nesting */ c";

    assert_eq!(vec![
        (TokenType::Name, String::from("a")),
        (TokenType::Name, String::from("b")),
        (TokenType::Name, String::from("c")),
    ], scan_all(source));
}

#[test]
fn block_comments_end_at_the_first_close() {
    assert_eq!(vec![
        (TokenType::Function, String::from("func")),
        (TokenType::Call, String::from("Main")),
    ], scan_all("/* lists src/*.ion files */\nfunc Main"));

    assert_eq!(vec![
        (TokenType::Name, String::from("a")),
        (TokenType::Multiply, String::from("*")),
        (TokenType::Divide, String::from("/")),
    ], scan_all("/* /* */ a */"));

    assert_eq!(Vec::<(TokenType, String)>::new(), scan_all("/* never closed"));
}

#[test]
fn lines_are_tracked() {
    let mut lexer = Lexer::new("a\n\n  b", "lines.ion");

    let a = lexer.scan_token().unwrap();
    let b = lexer.scan_token().unwrap();

    assert_eq!(1, a.pos().line);
    assert_eq!(3, b.pos().line);
    assert_eq!(3, b.pos().column);
    assert_eq!("lines.ion", &*b.pos().file);
}

#[test]
fn invalid_character_is_fatal() {
    let mut lexer = Lexer::new("a\n  #", "bad.ion");
    lexer.scan_token().unwrap();

    match lexer.scan_token() {
        Err(Error::InvalidCharacter { pos, character }) => {
            assert_eq!('#', character);
            assert_eq!(2, pos.line);
        },
        other => panic!("expected invalid character error, got {:?}", other),
    }
}

#[test]
fn unterminated_string_is_fatal() {
    let mut lexer = Lexer::new("\"abc", "bad.ion");
    assert!(matches!(lexer.scan_token(), Err(Error::UnterminatedString { .. })));
}

#[test]
fn end_of_input_repeats() {
    let mut lexer = Lexer::new("", "empty.ion");

    assert_eq!(TokenType::Eof, lexer.scan_token().unwrap().token_type());
    assert_eq!(TokenType::Eof, lexer.scan_token().unwrap().token_type());
}
