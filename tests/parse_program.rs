use proptest::prelude::*;
use rstest::rstest;

use std::thread;

use pragmash::limits::MAX_NESTING_DEPTH;
use pragmash::{
    parse_program, parse_program_with_limits, Argument, Block, Command, ForBlock, ParseLimits,
    PragmashError, WhileBlock,
};

fn lit(s: &str) -> Argument {
    Argument::literal(s)
}

fn command_block(blocks: &[Block]) -> &Command {
    match &blocks[0] {
        Block::Command(cmd) => cmd,
        other => panic!("expected a command block, got {:?}", other),
    }
}

#[test]
fn echo_hi() {
    let blocks = parse_program("echo hi").unwrap();
    assert_eq!(
        blocks,
        vec![Block::Command(Command {
            name: lit("echo"),
            args: vec![lit("hi")],
        })]
    );
}

#[test]
fn for_loop_example() {
    let blocks = parse_program("for x } \n echo x \n }").unwrap();
    assert_eq!(
        blocks,
        vec![Block::For(ForBlock {
            key: None,
            value: lit("x"),
            body: vec![Block::Command(Command {
                name: lit("echo"),
                args: vec![lit("x")],
            })],
        })]
    );
}

#[test]
fn unclosed_for_loop_example() {
    let err = parse_program("for x }").unwrap_err();
    assert!(matches!(err.root_cause(), PragmashError::MissingClose));
    assert!(err.to_string().starts_with("Error at line 1: "));
}

#[test]
fn empty_line_produces_nothing() {
    assert!(parse_program("").unwrap().is_empty());
    assert!(parse_program("\n\n   \n").unwrap().is_empty());

    let blocks = parse_program("\necho a").unwrap();
    assert_eq!(blocks.len(), 1);
}

#[test]
fn blank_lines_inside_bodies() {
    let blocks = parse_program("while a }\n\n  echo x\n\n}\n\necho y").unwrap();
    assert_eq!(blocks.len(), 2);
    let Block::While(WhileBlock { body, .. }) = &blocks[0] else {
        panic!("expected while-loop");
    };
    assert_eq!(body.len(), 1);
}

#[test]
fn sub_commands_three_deep() {
    let blocks = parse_program("echo (a 1 (b 2 (c 3)))").unwrap();
    let echo = command_block(&blocks);
    assert_eq!(echo.name, lit("echo"));

    let a = echo.args[0].as_command().unwrap();
    assert_eq!(a.name, lit("a"));
    assert_eq!(a.args[0], lit("1"));

    let b = a.args[1].as_command().unwrap();
    assert_eq!(b.name, lit("b"));
    assert_eq!(b.args[0], lit("2"));

    let c = b.args[1].as_command().unwrap();
    assert_eq!(c.name, lit("c"));
    assert_eq!(c.args, vec![lit("3")]);
}

#[test]
fn loop_headers_take_sub_commands() {
    let blocks = parse_program("for i (range 3) }\n}").unwrap();
    let Block::For(f) = &blocks[0] else {
        panic!("expected for-loop");
    };
    let range = f.value.as_command().unwrap();
    assert_eq!(range.name, lit("range"));
    assert_eq!(f.key, Some(lit("i")));
}

#[rstest]
#[case("for x", "missing body-open marker '}' in for-loop")]
#[case("while a b", "missing body-open marker '}' in while-loop")]
#[case("for }", "invalid number of arguments for for-loop: expected 1 or 2, found 0")]
#[case("for a b c }\n}", "invalid number of arguments for for-loop: expected 1 or 2, found 3")]
#[case("while }\n} x", "unexpected tokens after close marker '}'")]
#[case("while }\necho", "missing close marker '}'")]
#[case("echo ()", "no tokens in command")]
#[case("echo (\"x)", "missing ) for sub-command starting at column 6")]
fn structural_errors(#[case] source: &str, #[case] message: &str) {
    let err = parse_program(source).unwrap_err();
    assert_eq!(err.to_string(), format!("Error at line 1: {}", message));
}

#[rstest]
#[case("echo a\necho \"b", 2)]
#[case("echo a\n\n\nfor x }\n", 4)]
#[case("while }\n  while }\n  }\n", 1)]
#[case("echo a \\\n  b\necho )", 3)]
fn errors_name_the_outermost_line(#[case] source: &str, #[case] line: usize) {
    let err = parse_program(source).unwrap_err();
    assert_eq!(err.line(), Some(line));
}

#[test]
fn dangling_continuation_is_not_line_decorated() {
    let err = parse_program("echo \\").unwrap_err();
    assert!(matches!(err, PragmashError::DanglingContinuation { line: 1 }));
}

/// Run `f` on a thread with the stack a Linux main thread gets by default.
fn on_main_sized_stack<T, F>(f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    thread::Builder::new()
        .stack_size(8 * 1024 * 1024)
        .spawn(f)
        .unwrap()
        .join()
        .unwrap()
}

fn deepest_limits() -> ParseLimits {
    let toml = format!("[limits]\nmax_nesting_depth = {}\n", MAX_NESTING_DEPTH);
    ParseLimits::from_toml_str(&toml).unwrap()
}

fn nested_whiles(depth: usize) -> String {
    format!("{}echo x\n{}", "while }\n".repeat(depth), "}\n".repeat(depth))
}

fn nested_sub_commands(depth: usize) -> String {
    format!("echo {}x{}", "(a ".repeat(depth), ")".repeat(depth))
}

#[test]
fn bodies_nest_to_the_highest_allowed_depth() {
    let (ok, too_deep) = on_main_sized_stack(|| {
        let limits = deepest_limits();
        (
            parse_program_with_limits(&nested_whiles(MAX_NESTING_DEPTH), &limits).map(|b| b.len()),
            parse_program_with_limits(&nested_whiles(MAX_NESTING_DEPTH + 1), &limits).map(|b| b.len()),
        )
    });
    assert_eq!(ok.unwrap(), 1);
    let err = too_deep.unwrap_err();
    assert!(matches!(
        err.root_cause(),
        PragmashError::NestingTooDeep { depth, max } if *depth == MAX_NESTING_DEPTH + 1 && *max == MAX_NESTING_DEPTH
    ));
}

#[test]
fn sub_commands_nest_to_the_highest_allowed_depth() {
    let (ok, too_deep) = on_main_sized_stack(|| {
        let limits = deepest_limits();
        (
            parse_program_with_limits(&nested_sub_commands(MAX_NESTING_DEPTH), &limits).map(|b| b.len()),
            parse_program_with_limits(&nested_sub_commands(MAX_NESTING_DEPTH + 1), &limits).map(|b| b.len()),
        )
    });
    assert_eq!(ok.unwrap(), 1);
    let err = too_deep.unwrap_err();
    assert_eq!(err.line(), Some(1));
    assert!(matches!(err.root_cause(), PragmashError::NestingTooDeep { .. }));
}

fn word() -> impl Strategy<Value = String> {
    "[a-z0-9_.=+-]{1,8}".prop_filter("keywords and markers", |w| {
        !matches!(w.as_str(), "for" | "while" | "}")
    })
}

proptest! {
    #[test]
    fn literal_commands_keep_every_token(words in prop::collection::vec(word(), 1..10)) {
        let blocks = parse_program(&words.join(" ")).unwrap();
        prop_assert_eq!(blocks.len(), 1);

        let cmd = command_block(&blocks);
        prop_assert_eq!(cmd.name.as_literal(), Some(words[0].as_str()));
        prop_assert_eq!(cmd.args.len(), words.len() - 1);
        for (arg, w) in cmd.args.iter().zip(&words[1..]) {
            prop_assert_eq!(arg.as_literal(), Some(w.as_str()));
        }
    }

    #[test]
    fn while_condition_keeps_order(cond in prop::collection::vec(word(), 0..6)) {
        let src = format!("while {} }}\n  echo body\n}}", cond.join(" "));
        let blocks = parse_program(&src).unwrap();

        let Block::While(w) = &blocks[0] else {
            panic!("expected while-loop");
        };
        let got: Vec<&str> = w.condition.iter().filter_map(|a| a.as_literal()).collect();
        prop_assert_eq!(got, cond.iter().map(String::as_str).collect::<Vec<_>>());
        prop_assert_eq!(w.body.len(), 1);
    }

    #[test]
    fn for_header_sets_key_and_value(key in word(), value in word(), with_key in any::<bool>()) {
        let header = if with_key { format!("{} {}", key, value) } else { value.clone() };
        let blocks = parse_program(&format!("for {} }}\n}}", header)).unwrap();

        let Block::For(f) = &blocks[0] else {
            panic!("expected for-loop");
        };
        prop_assert_eq!(f.value.as_literal(), Some(value.as_str()));
        prop_assert_eq!(f.key.as_ref().and_then(|k| k.as_literal()), with_key.then_some(key.as_str()));
    }

    #[test]
    fn blank_lines_never_change_the_tree(blank in prop::collection::vec(" {0,3}", 0..4)) {
        let padding = blank.join("\n");
        let src = format!("{p}\nfor x }}\n{p}\necho x\n{p}\n}}\n{p}", p = padding);
        let expected = parse_program("for x }\necho x\n}").unwrap();
        prop_assert_eq!(parse_program(&src).unwrap(), expected);
    }
}
