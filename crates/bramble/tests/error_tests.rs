mod common;

use bramble::{EvalError, SyntaxError};
use common::{run_err, run_with_sink};

// ═══════════════════════════════════════════════════════════════════════
// Name Errors
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn undeclared_identifier() {
    let err = run_err("missing");
    assert_eq!(err.to_string(), "Identifier 'missing' not found");
    assert!(err.span().is_some());
}

#[test]
fn assignment_to_missing_binding() {
    let err = run_err("ghost = 1;");
    assert_eq!(
        err.to_string(),
        "Variable 'ghost' is immutable or doesn't exist"
    );
}

#[test]
fn duplicate_declaration_in_same_scope() {
    let err = run_err("let a = 1; let a = 2;");
    assert_eq!(err.to_string(), "Variable 'a' is already declared");
}

#[test]
fn duplicate_declaration_in_enclosing_block() {
    let err = run_err("let a = 1; { let a = 2; }");
    assert_eq!(err.to_string(), "Variable 'a' is already declared");
}

#[test]
fn builtin_names_cannot_be_redeclared() {
    let err = run_err("let puts = 1;");
    assert_eq!(err.to_string(), "Variable 'puts' is already declared");
}

// ═══════════════════════════════════════════════════════════════════════
// Type Errors
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn condition_must_be_bool() {
    let err = run_err("if (1) puts(1);");
    assert_eq!(err.to_string(), "Condition must be a bool, got int");
}

#[test]
fn negation_requires_bool() {
    let err = run_err("!5");
    assert_eq!(err.to_string(), "Cannot apply '!' to int");
}

#[test]
fn operator_type_mismatches() {
    assert_eq!(
        run_err("let x = 1 + true;").to_string(),
        "Cannot apply '+' to int and bool"
    );
    assert_eq!(
        run_err("let x = [1] - [1];").to_string(),
        "Cannot apply '-' to array and array"
    );
    assert_eq!(
        run_err("let x = \"a\" < \"b\";").to_string(),
        "Cannot apply '<' to string and string"
    );
    assert_eq!(
        run_err("let x = 1 && true;").to_string(),
        "Cannot apply '&&' to int and bool"
    );
}

#[test]
fn invoking_a_non_function() {
    let err = run_err("let n = 3; n(1);");
    assert_eq!(err.to_string(), "Unable to invoke int");
}

#[test]
fn array_index_must_be_int() {
    let err = run_err("let a = [1]; a[\"x\"];");
    assert_eq!(err.to_string(), "Array index must be an int, got string");
}

// ═══════════════════════════════════════════════════════════════════════
// Arity and Domain Errors
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn arity_mismatch() {
    let err = run_err("let f = fn(x, y){ x + y }; f(1);");
    assert_eq!(err.to_string(), "Expected 2 arguments, got 1");
}

#[test]
fn index_out_of_range() {
    assert_eq!(
        run_err("let a = [1, 2]; a[5];").to_string(),
        "Index out of range"
    );
    assert_eq!(
        run_err("let a = [1, 2]; a[0 - 1];").to_string(),
        "Index out of range"
    );
}

#[test]
fn key_not_found() {
    let err = run_err("let d = {\"a\": 1}; d[\"b\"];");
    assert_eq!(err.to_string(), "Key not found");
}

#[test]
fn cannot_index_scalars() {
    let err = run_err("let n = 5; n[0];");
    assert_eq!(err.to_string(), "Cannot use index operator on int");
}

#[test]
fn duplicate_dict_key_in_literal() {
    let err = run_err("let d = {\"a\": 1, \"a\": 2};");
    assert_eq!(err.to_string(), "Duplicate key");
}

#[test]
fn duplicate_dict_key_by_value_equality() {
    // 1 and 2/2 are equal by value, whatever the spelling.
    let err = run_err("let d = {1: \"a\", 2 / 2: \"b\"};");
    assert_eq!(err.to_string(), "Duplicate key");
}

#[test]
fn duplicate_key_in_dict_merge() {
    let err = run_err("let d = {\"a\": 1} + {\"a\": 2};");
    assert_eq!(err.to_string(), "Duplicate key");
}

#[test]
fn division_by_zero() {
    let err = run_err("let x = 1 / 0;");
    assert_eq!(err.to_string(), "Division by zero");
}

#[test]
fn void_call_in_value_position() {
    let err = run_err("let x = puts(1);");
    assert_eq!(err.to_string(), "Function didn't return a value");
}

#[test]
fn assert_failure() {
    let err = run_err("assert(1 == 2);");
    assert_eq!(err.to_string(), "Assert failed");
}

#[test]
fn assert_requires_bool() {
    let err = run_err("assert(1);");
    assert_eq!(err.to_string(), "Assert requires a bool, got int");
}

#[test]
fn map_requires_array_or_dict() {
    let err = run_err("map(5, fn(x){ puts(x); });");
    assert_eq!(err.to_string(), "Cannot map over int");
}

#[test]
fn stack_overflow_is_caught() {
    use bramble::{syntax, EvalContext, Interpreter};

    // A small ceiling keeps the host stack shallow while exercising the
    // limit.
    let program = syntax::parse("let f = fn(){ return f(); }; f();").unwrap();
    let err = Interpreter::new()
        .with_sink(Box::new(common::SharedSink::default()))
        .with_context(EvalContext::with_max_call_depth(64))
        .run(&program)
        .unwrap_err();
    assert!(matches!(err, EvalError::StackOverflow { max: 64 }));
}

// ═══════════════════════════════════════════════════════════════════════
// Propagation and Reporting
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn errors_unwind_through_nested_calls() {
    let src = "
        let inner = fn(){ return missing; };
        let outer = fn(){ return inner(); };
        outer();
    ";
    let err = run_err(src);
    assert_eq!(err.to_string(), "Identifier 'missing' not found");
}

#[test]
fn partial_output_is_not_rolled_back() {
    let (result, output) = common::run_with_output("puts(\"before\"); assert(false);");
    assert!(result.is_err());
    assert_eq!(output, "before\n");
}

#[test]
fn each_failure_is_reported_once() {
    let (result, sink) = run_with_sink("let f = fn(){ assert(false); }; f();");
    assert!(result.is_err());
    assert_eq!(sink.failures().len(), 1);
}

#[test]
fn failures_carry_the_call_stack_innermost_first() {
    let src = "
        let boom = fn(){ assert(false); };
        let outer = fn(){ boom(); };
        outer();
    ";
    let (result, sink) = run_with_sink(src);
    assert!(result.is_err());

    let failures = sink.failures();
    assert_eq!(failures.len(), 1);
    let lines: Vec<&str> = failures[0].lines().collect();
    assert_eq!(lines[0], "ERROR: Assert failed in <input>");
    assert_eq!(lines[1], "> in function assert(condition)");
    assert_eq!(lines[2], "> in function boom()");
    assert_eq!(lines[3], "> in function outer()");
}

#[test]
fn ranged_failures_include_line_and_column() {
    let (result, sink) = run_with_sink("let a = 1;\nlet b = nope;");
    assert!(result.is_err());
    let failures = sink.failures();
    assert_eq!(
        failures[0],
        "ERROR: Identifier 'nope' not found at 2:9 in <input>"
    );
}

#[test]
fn interpreter_is_reusable_after_an_error() {
    use bramble::{syntax, Interpreter, Value};

    let mut interp = Interpreter::new().with_sink(Box::new(common::SharedSink::default()));

    let bad = syntax::parse("assert(false);").unwrap();
    assert!(interp.run(&bad).is_err());

    // The scope stack drained during unwinding; a fresh run works.
    let good = syntax::parse("1 + 1").unwrap();
    assert_eq!(interp.run(&good).unwrap(), Some(Value::Int(2)));
}

// ═══════════════════════════════════════════════════════════════════════
// Syntax Errors
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn syntax_errors_carry_positions() {
    let errs = bramble::syntax::parse("let a = @;").unwrap_err();
    assert!(matches!(
        errs[0],
        SyntaxError::UnexpectedCharacter { ch: '@', .. }
    ));
    assert_eq!(errs[0].pos().line, 1);
    assert_eq!(errs[0].pos().column, 9);
}

#[test]
fn non_call_statement_is_a_syntax_error() {
    let errs = bramble::syntax::parse("1 + 2; puts(3);").unwrap_err();
    assert_eq!(
        errs[0].to_string(),
        "Only call expressions can be used as statements"
    );
}
