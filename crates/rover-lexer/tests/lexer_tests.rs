//! Lexer tests for RoverScript.
//!
//! Covers: command words and abbreviations, operator rewrites, literals,
//! comments, the two-space statement separator, private members, error
//! recovery, and the 100-iteration determinism test.

use rover_lexer::{tokenize, Command, Lexer, Op, TokenKind};
use rover_types::{ErrorCode, Severity, SourceFile};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Lex source text and return just the token kinds (excluding final Eof).
fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source)
        .into_iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .map(|t| t.kind)
        .collect()
}

fn cmd(command: Command, spelling: &str) -> TokenKind {
    TokenKind::Command {
        command,
        spelling: spelling.into(),
    }
}

fn ident(name: &str) -> TokenKind {
    TokenKind::Identifier(name.into())
}

fn num(text: &str) -> TokenKind {
    TokenKind::Number(text.into())
}

fn op(op: Op) -> TokenKind {
    TokenKind::Operator(op)
}

fn diagnostics(source: &str) -> Vec<(ErrorCode, Severity)> {
    let sf = SourceFile::new("mission.cos", source);
    let result = Lexer::new(&sf).lex();
    result
        .errors
        .errors
        .iter()
        .chain(&result.errors.warnings)
        .map(|d| (d.code, d.severity))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_full_and_abbreviated_commands() {
    let pairs = [
        ("s", Command::Set),
        ("Set", Command::Set),
        ("d", Command::Do),
        ("DO", Command::Do),
        ("w", Command::Write),
        ("write", Command::Write),
        ("i", Command::If),
        ("IF", Command::If),
        ("e", Command::Else),
        ("Else", Command::Else),
        ("ei", Command::ElseIf),
        ("ElseIf", Command::ElseIf),
        ("f", Command::For),
        ("For", Command::For),
        ("While", Command::While),
        ("q", Command::Quit),
        ("Quit", Command::Quit),
        ("Return", Command::Return),
    ];
    for (src, expected) in pairs {
        assert_eq!(kinds(src), vec![cmd(expected, src)], "command '{src}'");
    }
}

#[test]
fn test_command_spelling_is_preserved() {
    let k = kinds("SeT");
    assert_eq!(k, vec![cmd(Command::Set, "SeT")]);
    assert_eq!(k[0].to_string(), "SeT");
}

#[test]
fn test_words_containing_commands_are_identifiers() {
    assert_eq!(kinds("sx"), vec![ident("sx")]);
    assert_eq!(kinds("done"), vec![ident("done")]);
    assert_eq!(kinds("memory"), vec![ident("memory")]);
}

#[test]
fn test_command_word_after_dot_is_still_lexed_as_command() {
    // The parser decides it is a member name.
    assert_eq!(
        kinds("obj.do"),
        vec![ident("obj"), TokenKind::Dot, cmd(Command::Do, "do")]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Identifiers & private members
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_dollar_identifiers() {
    assert_eq!(
        kinds("$Piece(x)"),
        vec![
            ident("$Piece"),
            TokenKind::LParen,
            ident("x"),
            TokenKind::RParen
        ]
    );
}

#[test]
fn test_private_member() {
    assert_eq!(
        kinds("memory.%Set"),
        vec![
            ident("memory"),
            TokenKind::Dot,
            TokenKind::Private("Set".into())
        ]
    );
}

#[test]
fn test_underscore_is_concatenation_not_part_of_name() {
    assert_eq!(kinds("a_b"), vec![ident("a"), op(Op::Plus), ident("b")]);
}

#[test]
fn test_digits_inside_identifiers() {
    assert_eq!(kinds("x1y2"), vec![ident("x1y2")]);
}

// ─────────────────────────────────────────────────────────────────────
// Operators
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_single_char_operators() {
    let pairs = [
        ("+", Op::Plus),
        ("-", Op::Minus),
        ("*", Op::Star),
        ("/", Op::Slash),
        ("=", Op::Assign),
        ("<", Op::Less),
        (">", Op::Greater),
        ("&", Op::And),
        ("!", Op::Or),
        ("'", Op::Not),
        ("_", Op::Plus),
    ];
    for (src, expected) in pairs {
        assert_eq!(kinds(src), vec![op(expected)], "operator '{src}'");
    }
}

#[test]
fn test_two_char_operators() {
    let pairs = [
        ("==", Op::EqEq),
        ("!=", Op::NotEq),
        ("'=", Op::NotEq),
        ("<=", Op::LessEq),
        (">=", Op::GreaterEq),
    ];
    for (src, expected) in pairs {
        assert_eq!(kinds(src), vec![op(expected)], "operator '{src}'");
    }
}

#[test]
fn test_assignment_statement() {
    assert_eq!(
        kinds("s x=1"),
        vec![cmd(Command::Set, "s"), ident("x"), op(Op::Assign), num("1")]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Literals
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_numbers_keep_their_text() {
    assert_eq!(kinds("10"), vec![num("10")]);
    assert_eq!(kinds("3.25"), vec![num("3.25")]);
    assert_eq!(kinds("007"), vec![num("007")]);
}

#[test]
fn test_leading_dot_number() {
    assert_eq!(kinds(".5"), vec![num(".5")]);
    assert_eq!(kinds("x=.25"), vec![ident("x"), op(Op::Assign), num(".25")]);
    assert_eq!(kinds("a.b"), vec![ident("a"), TokenKind::Dot, ident("b")]);
}

#[test]
fn test_plain_string() {
    assert_eq!(kinds(r#""hello""#), vec![TokenKind::String("hello".into())]);
}

#[test]
fn test_string_escapes() {
    assert_eq!(
        kinds(r#""say \"hi\" \\ bye""#),
        vec![TokenKind::String(r#"say "hi" \ bye"#.into())]
    );
}

#[test]
fn test_other_backslashes_are_literal() {
    assert_eq!(kinds(r#""a\nb""#), vec![TokenKind::String(r"a\nb".into())]);
}

#[test]
fn test_string_keeps_double_spaces_and_comment_markers() {
    assert_eq!(
        kinds(r#""a  b # c // d""#),
        vec![TokenKind::String("a  b # c // d".into())]
    );
}

#[test]
fn test_unterminated_string_ends_at_line_end() {
    let k = kinds("w \"abc\nq");
    assert_eq!(
        k,
        vec![
            cmd(Command::Write, "w"),
            TokenKind::String("abc".into()),
            TokenKind::Newline,
            cmd(Command::Quit, "q"),
        ]
    );
    assert_eq!(
        diagnostics("w \"abc"),
        vec![(ErrorCode::UNTERMINATED_STRING, Severity::Warning)]
    );
}

#[test]
fn test_non_ascii_text_in_strings() {
    assert_eq!(
        kinds("\"café ✓\""),
        vec![TokenKind::String("café ✓".into())]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Comments & separators
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_slash_slash_comment() {
    assert_eq!(
        kinds("s x=1 // set x\nq"),
        vec![
            cmd(Command::Set, "s"),
            ident("x"),
            op(Op::Assign),
            num("1"),
            TokenKind::Newline,
            cmd(Command::Quit, "q"),
        ]
    );
}

#[test]
fn test_hash_comment() {
    assert_eq!(kinds("# header\nq"), vec![TokenKind::Newline, cmd(Command::Quit, "q")]);
}

#[test]
fn test_slash_alone_is_division() {
    assert_eq!(kinds("a/b"), vec![ident("a"), op(Op::Slash), ident("b")]);
}

#[test]
fn test_double_space_separates_statements() {
    assert_eq!(
        kinds("s x=1  q"),
        vec![
            cmd(Command::Set, "s"),
            ident("x"),
            op(Op::Assign),
            num("1"),
            TokenKind::Newline,
            cmd(Command::Quit, "q"),
        ]
    );
}

#[test]
fn test_long_space_run_is_one_separator() {
    let k = kinds("q     q");
    assert_eq!(
        k,
        vec![cmd(Command::Quit, "q"), TokenKind::Newline, cmd(Command::Quit, "q")]
    );
}

#[test]
fn test_single_spaces_and_tabs_are_ignored() {
    assert_eq!(
        kinds("d\tMove( )"),
        vec![
            cmd(Command::Do, "d"),
            ident("Move"),
            TokenKind::LParen,
            TokenKind::RParen
        ]
    );
}

#[test]
fn test_crlf_line_endings() {
    assert_eq!(
        kinds("q\r\nq"),
        vec![cmd(Command::Quit, "q"), TokenKind::Newline, cmd(Command::Quit, "q")]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Error recovery
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_unknown_characters_are_skipped() {
    assert_eq!(kinds("s x@=1"), kinds("s x=1"));
    assert_eq!(
        diagnostics("s x@=1"),
        vec![(ErrorCode::UNKNOWN_CHARACTER, Severity::Warning)]
    );
}

#[test]
fn test_unknown_multibyte_character_is_skipped_whole() {
    assert_eq!(kinds("q € q"), vec![cmd(Command::Quit, "q"), cmd(Command::Quit, "q")]);
    let sf = SourceFile::new("mission.cos", "q € q");
    let result = Lexer::new(&sf).lex();
    assert!(result.errors.warnings[0].message.contains('€'));
}

#[test]
fn test_bare_percent_is_unknown() {
    assert_eq!(kinds("% x"), vec![ident("x")]);
}

#[test]
fn test_lexer_never_reports_errors() {
    let sf = SourceFile::new("mission.cos", "@@@ \"open ~ ^");
    let result = Lexer::new(&sf).lex();
    assert!(!result.errors.has_errors());
    assert!(result.errors.total_warnings >= 4);
}

#[test]
fn test_always_ends_with_eof() {
    for src in ["", "q", "s x=1\n", "\"open", "{{{"] {
        let tokens = tokenize(src);
        assert_eq!(tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof), "{src:?}");
    }
}

// ─────────────────────────────────────────────────────────────────────
// Spans
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_spans_track_lines() {
    let tokens = tokenize("s x=1\nd Move()");
    let d = tokens
        .iter()
        .find(|t| matches!(t.kind, TokenKind::Command { command: Command::Do, .. }))
        .map(|t| t.span)
        .unwrap();
    assert_eq!((d.start_line, d.start_col), (2, 1));

    let move_tok = &tokens[tokens.len() - 4];
    assert_eq!(move_tok.kind, ident("Move"));
    assert_eq!((move_tok.span.start_col, move_tok.span.end_col), (3, 6));
}

// ─────────────────────────────────────────────────────────────────────
// Full programs & determinism
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_for_loop_tokens() {
    assert_eq!(
        kinds("f i=1:1:2 { d Move() }"),
        vec![
            cmd(Command::For, "f"),
            ident("i"),
            op(Op::Assign),
            num("1"),
            TokenKind::Colon,
            num("1"),
            TokenKind::Colon,
            num("2"),
            TokenKind::LBrace,
            cmd(Command::Do, "d"),
            ident("Move"),
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::RBrace,
        ]
    );
}

#[test]
fn test_determinism_100_iterations() {
    let source = r#"
# patrol
s count=memory.%Get("count")+1
i rover.fuel<10!('ready) { d Turn("left") }
ei $Piece(x,".",1)'="ok"&(y>=2) { w "low", count_"!" }
e { d Move() }
"#;
    let first = tokenize(source);
    for _ in 0..100 {
        assert_eq!(tokenize(source), first);
    }
}
