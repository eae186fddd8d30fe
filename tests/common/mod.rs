#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use yaupl::config::InterpreterConfig;
use yaupl::reporter::BufferedReporter;
use yaupl::runner::Runner;

/// Writer whose bytes stay readable after it was boxed into an interpreter.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub struct Outcome {
    pub output: String,
    pub errors: Vec<String>,
    pub exit_code: i32,
}

impl Outcome {
    pub fn lines(&self) -> Vec<&str> {
        self.output.lines().collect()
    }
}

pub fn run_with(config: InterpreterConfig, source: &str) -> Outcome {
    let out = SharedBuffer::new();
    let reporter = Rc::new(BufferedReporter::new());

    let mut runner = Runner::new(config, reporter.clone(), Box::new(out.clone()));
    runner.run_source(source);

    Outcome {
        output: out.contents(),
        errors: reporter.messages(),
        exit_code: runner.exit_code(),
    }
}

pub fn run(source: &str) -> Outcome {
    run_with(InterpreterConfig::default(), source)
}
