use std::path::PathBuf;

// the host stack grows on demand (see `crate::stack`); this only bounds
// runaway recursion
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// Runtime knobs for one [`crate::interpreter::Interpreter`].
#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    /// Echo the value of every expression statement (the REPL does this).
    pub repl_mode: bool,

    /// Directory relative imports are resolved against.
    pub script_dir: PathBuf,

    /// Nesting limit for user function calls; exceeding it is a runtime error.
    pub max_call_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            repl_mode: false,
            script_dir: PathBuf::from("."),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

impl InterpreterConfig {
    pub fn repl() -> Self {
        Self {
            repl_mode: true,
            ..Self::default()
        }
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }
}
