//! Shared helpers for the integration suites

#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use bramble::environment::Frame;
use bramble::syntax::ast::Span;
use bramble::{syntax, BufferSink, DiagnosticSink, EvalError, Interpreter, Value};

/// A diagnostic sink with a handle the test keeps after the interpreter
/// takes ownership of the box.
#[derive(Clone, Default)]
pub struct SharedSink(pub Rc<RefCell<BufferSink>>);

impl SharedSink {
    pub fn failures(&self) -> Vec<String> {
        self.0.borrow().failures.clone()
    }
}

impl DiagnosticSink for SharedSink {
    fn fail(&mut self, span: Option<Span>, message: &str, trace: &[Frame]) {
        self.0.borrow_mut().fail(span, message, trace);
    }

    fn warn(&mut self, span: Option<Span>, message: &str) {
        self.0.borrow_mut().warn(span, message);
    }
}

/// A `Write` handle over a shared buffer, for capturing `puts` output.
#[derive(Clone, Default)]
pub struct SharedOut(pub Rc<RefCell<Vec<u8>>>);

impl SharedOut {
    pub fn text(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("valid utf-8 output")
    }
}

impl Write for SharedOut {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Parse and run a program with a silent sink, returning the top-level
/// result.
pub fn run(src: &str) -> Result<Option<Value>, EvalError> {
    let program = syntax::parse(src).expect("parse failed");
    Interpreter::new()
        .with_sink(Box::new(SharedSink::default()))
        .run(&program)
}

/// Like [`run`], also capturing everything `puts` wrote.
pub fn run_with_output(src: &str) -> (Result<Option<Value>, EvalError>, String) {
    let program = syntax::parse(src).expect("parse failed");
    let out = SharedOut::default();
    let result = Interpreter::new()
        .with_sink(Box::new(SharedSink::default()))
        .with_output(Box::new(out.clone()))
        .run(&program);
    (result, out.text())
}

/// Like [`run`], also returning the sink so tests can assert on what
/// was reported.
pub fn run_with_sink(src: &str) -> (Result<Option<Value>, EvalError>, SharedSink) {
    let program = syntax::parse(src).expect("parse failed");
    let sink = SharedSink(Rc::new(RefCell::new(BufferSink::new("<input>"))));
    let result = Interpreter::new()
        .with_sink(Box::new(sink.clone()))
        .run(&program);
    (result, sink)
}

/// Run a program expected to succeed silently.
pub fn run_ok(src: &str) -> Option<Value> {
    run(src).expect("program failed")
}

/// Run a program expected to fail, returning the error.
pub fn run_err(src: &str) -> EvalError {
    run(src).expect_err("program unexpectedly succeeded")
}
