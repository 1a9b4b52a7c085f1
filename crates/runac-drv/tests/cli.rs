//! Drives the built `runac` binary as a subprocess against the §8.2
//! end-to-end scenarios and the §8.3 CLI contract. These assert on the
//! observable contract only - exit code, the success line, diagnostic
//! prefixes, and the structural shape of the emitted `.s` file - they never
//! assemble or execute the generated assembly.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn runac() -> Command {
    Command::cargo_bin("runac").unwrap()
}

fn compile_ok(source: &str) -> String {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.runa");
    let output = dir.path().join("out.s");
    fs::write(&input, source).unwrap();

    runac()
        .arg(&input)
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully compiled"));

    fs::read_to_string(&output).unwrap()
}

#[test]
fn s1_arithmetic_fold_compiles_and_prints_success_line() {
    let asm = compile_ok(
        "Process called \"main\" returns Integer:\n  \
         Let x be 2 plus 3 multiplied by 4\n  \
         Return x\nEnd Process",
    );
    assert!(asm.contains(".globl main"));
}

#[test]
fn s2_string_print_interns_the_literal() {
    let asm = compile_ok(
        "Process called \"main\" returns Integer:\n  \
         Print \"Hello, world!\"\n  \
         Return 0\nEnd Process",
    );
    assert!(asm.contains("Hello, world!"));
}

#[test]
fn assembly_has_all_six_sections_in_order_and_each_header_once() {
    let asm = compile_ok("Process called \"main\" returns Integer:\n  Return 0\nEnd Process");
    for header in [".section .rodata", ".section .data", ".section .bss", ".text", ".section .note.GNU-stack"] {
        assert_eq!(asm.matches(header).count(), 1, "expected exactly one `{header}`");
    }
    let rodata = asm.find(".section .rodata").unwrap();
    let text = asm.find(".text").unwrap();
    let trailer = asm.find(".section .note.GNU-stack").unwrap();
    assert!(rodata < text && text < trailer);
}

#[test]
fn missing_input_file_exits_nonzero_with_a_readable_message() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist.runa");
    let output = dir.path().join("out.s");

    runac()
        .arg(&missing)
        .arg(&output)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("could not read"));
}

#[test]
fn wrong_argument_count_is_a_command_line_error() {
    runac().arg("only-one-argument").assert().failure().code(1);
}

#[test]
fn lex_error_reports_the_lexer_error_prefix() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.runa");
    let output = dir.path().join("out.s");
    fs::write(&input, "Process called \"main\" returns Integer:\n  Return \"unterminated\nEnd Process").unwrap();

    runac()
        .arg(&input)
        .arg(&output)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("[LEXER ERROR]"));
}

#[test]
fn parse_error_reports_the_parser_error_prefix() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.runa");
    let output = dir.path().join("out.s");
    fs::write(&input, "Process called \"main\" returns Integer:\n  Let\nEnd Process").unwrap();

    runac()
        .arg(&input)
        .arg(&output)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("[PARSER ERROR]"));
}

#[test]
fn codegen_error_reports_the_codegen_error_prefix() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.runa");
    let output = dir.path().join("out.s");
    fs::write(
        &input,
        "Process called \"main\" returns Integer:\n  Return undeclared_name\nEnd Process",
    )
    .unwrap();

    runac()
        .arg(&input)
        .arg(&output)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("[CODEGEN ERROR]"));
}

#[test]
fn emit_tokens_dumps_to_stderr_without_changing_exit_code() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.runa");
    let output = dir.path().join("out.s");
    fs::write(&input, "Process called \"main\" returns Integer:\n  Return 0\nEnd Process").unwrap();

    runac()
        .arg(&input)
        .arg(&output)
        .arg("--emit-tokens")
        .assert()
        .success()
        .stderr(predicate::str::contains("Token"));
}

#[test]
fn emit_ast_dumps_a_debug_rendering_without_changing_exit_code() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.runa");
    let output = dir.path().join("out.s");
    fs::write(&input, "Process called \"main\" returns Integer:\n  Return 0\nEnd Process").unwrap();

    runac()
        .arg(&input)
        .arg(&output)
        .arg("--emit-ast")
        .assert()
        .success()
        .stderr(predicate::str::contains("Program"));
}

#[test]
fn missing_final_return_warns_but_still_succeeds() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.runa");
    let output = dir.path().join("out.s");
    fs::write(
        &input,
        "Process called \"main\" returns Integer:\n  Print \"no return here\"\nEnd Process",
    )
    .unwrap();

    runac()
        .arg(&input)
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("[CODEGEN WARNING]"));
}

#[test]
fn more_than_six_parameters_compiles_successfully() {
    let asm = compile_ok(
        "Process called \"seven\" takes a as Integer, b as Integer, c as Integer, d as Integer, \
         e as Integer, f as Integer, g as Integer returns Integer:\n  \
         Return g\nEnd Process\n\
         Process called \"main\" returns Integer:\n  \
         Return seven(1, 2, 3, 4, 5, 6, 7)\nEnd Process",
    );
    assert!(asm.contains("16(%rbp)"));
}
