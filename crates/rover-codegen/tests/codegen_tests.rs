//! Transpiler tests for RoverScript.
//!
//! Covers: literal transpilation scenarios, every statement form, expression
//! emission, line layout, malformed passthrough, the source map and
//! determinism.

use rover_codegen::{emit_with_source_map, transpile};
use rover_lexer::tokenize;
use rover_parser::parse;

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

fn js(source: &str) -> String {
    transpile(tokenize(source))
}

fn assert_js(source: &str, expected: &str) {
    let actual = js(source);
    assert_eq!(actual, expected, "\nsource:   {source:?}\nactual:   {actual:?}");
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Literal scenarios
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_scenario_simple_set() {
    assert_js("s x=1", "x = 1;");
}

#[test]
fn test_leading_dot_number() {
    assert_js("s x=.5", "x = .5;");
    assert_js("s y=1+.25", "y = 1 + .25;");
}

#[test]
fn test_scenario_memory_private_set() {
    assert_js(r#"Do memory.%Set("x",1)"#, r#"await memory._Set("x",1);"#);
}

#[test]
fn test_scenario_context_private_set() {
    assert_js(r#"Do context.%Set("x",1)"#, r#"await context._Set("x",1);"#);
}

#[test]
fn test_scenario_nested_lib_calls() {
    assert_js(
        r#"s x=$Piece($Random(10),".",1)"#,
        r#"x = lib.Piece(lib.Random(10),".",1);"#,
    );
}

#[test]
fn test_scenario_for_loop_on_one_line() {
    assert_js(
        "f i=1:1:2 { d Move() }",
        "for (let i = 1; i <= 2; i += 1) { await context.Move(); }",
    );
}

// ═══════════════════════════════════════════════════════════════════════
// 2. Statements
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_set_pairs_joined_by_space() {
    assert_js("s a=1,b=a+1", "a = 1; b = a + 1;");
}

#[test]
fn test_set_memory_member() {
    assert_js("s memory.count=memory.count+1", "memory.count = memory.count + 1;");
}

#[test]
fn test_do_without_call_is_not_awaited() {
    assert_js("d ready", "context.ready;");
}

#[test]
fn test_do_on_local_is_not_qualified() {
    assert_js(
        "s t=rover\nd t.Scan(\"front\")",
        "t = rover;\nawait t.Scan(\"front\");",
    );
}

#[test]
fn test_do_on_capability_namespace() {
    assert_js(r#"d roverApi.Turn("east")"#, r#"await roverApi.Turn("east");"#);
}

#[test]
fn test_do_private_name_without_dot() {
    assert_js("d %Init()", "await context._Init();");
}

#[test]
fn test_write_joins_arguments_with_space() {
    assert_js(
        r#"w "Fuel:", rover.fuel"#,
        r#"roverApi.Write("Fuel:" + " " + rover.fuel);"#,
    );
}

#[test]
fn test_write_parenthesises_loose_arguments() {
    assert_js(r#"w "n", n+1"#, r#"roverApi.Write("n" + " " + (n + 1));"#);
    assert_js(r#"w "far", x>2"#, r#"roverApi.Write("far" + " " + (x > 2));"#);
    assert_js("w n+1", "roverApi.Write(n + 1);");
}

#[test]
fn test_write_without_arguments() {
    assert_js("w", r#"roverApi.Write("");"#);
}

#[test]
fn test_quit_and_return() {
    assert_js("q", "return;");
    assert_js("Return", "return;");
}

#[test]
fn test_if_elseif_else_across_lines() {
    let src = "i x>1 {\n  d Move()\n}\nei x=1 {\n  q\n}\ne {\n  w \"no\"\n}";
    let expected = "if (x > 1) {\nawait context.Move();\n}\nelse if (x == 1) {\nreturn;\n}\nelse {\nroverApi.Write(\"no\");\n}";
    assert_js(src, expected);
}

#[test]
fn test_if_else_on_one_line() {
    assert_js(
        "i x { q } e { d Move() }",
        "if (x) { return; } else { await context.Move(); }",
    );
}

#[test]
fn test_while_loop() {
    assert_js(
        "while rover.fuel>0 { d Move() }",
        "while (rover.fuel > 0) { await context.Move(); }",
    );
}

#[test]
fn test_for_without_step_defaults_to_one() {
    assert_js(
        "f i=0:n-1 { w i }",
        "for (let i = 0; i <= n - 1; i += 1) { roverApi.Write(i); }",
    );
}

#[test]
fn test_nested_blocks_keep_source_lines() {
    let src = "f i=1:3 {\n  i i=2 { q }\n  d Move()\n}";
    let expected =
        "for (let i = 1; i <= 3; i += 1) {\nif (i == 2) { return; }\nawait context.Move();\n}";
    assert_js(src, expected);
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Expressions
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_not_or_and_not_equals() {
    assert_js("i 'done!(n'=3) { q }", "if (!done || (n != 3)) { return; }");
}

#[test]
fn test_and_operator() {
    assert_js("i a&b { q }", "if (a && b) { return; }");
}

#[test]
fn test_underscore_concatenation() {
    assert_js(r#"s msg=a_"-"_b"#, r#"msg = a + "-" + b;"#);
}

#[test]
fn test_unary_minus() {
    assert_js("s v=-1", "v = -1;");
}

#[test]
fn test_parentheses_are_kept() {
    assert_js("s v=(a+b)*c", "v = (a + b) * c;");
}

#[test]
fn test_lib_call_without_parens() {
    assert_js("s r=$Random", "r = lib.Random();");
}

#[test]
fn test_object_literal() {
    assert_js(
        r#"d memory.%Set("pos",{x:rover.x,"z":rover.z})"#,
        r#"await memory._Set("pos",{x: rover.x, "z": rover.z});"#,
    );
}

#[test]
fn test_string_escapes_survive() {
    assert_js(r#"w "say \"hi\"""#, r#"roverApi.Write("say \"hi\"");"#);
}

#[test]
fn test_numbers_kept_as_written() {
    assert_js("s v=1.50", "v = 1.50;");
}

// ═══════════════════════════════════════════════════════════════════════
// 4. Malformed passthrough
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_line_without_command_is_copied() {
    assert_js("x=1\nq", "x=1\nreturn;");
}

#[test]
fn test_malformed_object_is_copied() {
    assert_js("s o={a 1}", "o = {a 1};");
}

#[test]
fn test_missing_operand_emits_nothing_for_it() {
    assert_js("s x=", "x = ;");
}

// ═══════════════════════════════════════════════════════════════════════
// 5. Layout & source map
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_double_space_stays_on_one_line() {
    assert_js("s x=1  w x", "x = 1; roverApi.Write(x);");
}

#[test]
fn test_blank_lines_and_comments_collapse() {
    assert_js("# plan\ns x=1 // first\n\n// done\nq", "x = 1;\nreturn;");
}

#[test]
fn test_empty_program() {
    assert_js("", "");
    assert_js("// nothing", "");
}

#[test]
fn test_source_map_points_at_script_lines() {
    let program = parse(tokenize("s x=1\n\nd Move()  q\n  w x")).program;
    let (js, map) = emit_with_source_map(&program);
    assert_eq!(js, "x = 1;\nawait context.Move(); return;\nroverApi.Write(x);");
    let lines: Vec<(u32, u32)> = map
        .entries
        .iter()
        .map(|e| (e.js_line, e.span.start_line))
        .collect();
    assert_eq!(lines, vec![(1, 1), (2, 3), (3, 4)]);
}

// ═══════════════════════════════════════════════════════════════════════
// 6. Determinism
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_same_tokens_same_output() {
    let tokens = tokenize("i rover.fuel<10 { q }\nd Move()");
    assert_eq!(transpile(tokens.clone()), transpile(tokens));
}

#[test]
fn test_determinism_100_iterations() {
    let src = r#"s n=memory.%Get("n")+1
i n>3!('ready) { d Turn("left") }
ei $Piece(x,".",1)="ok" { w "go", n }
e { f i=1:1:n { d Move() } }
d memory.%Set("state",{n:n,at:rover.x_","_rover.z})"#;
    let tokens = tokenize(src);
    let first = transpile(tokens.clone());
    for _ in 0..100 {
        assert_eq!(transpile(tokens.clone()), first);
    }
}
