pub mod ast;
pub mod ast_printer;
pub mod builtins;
pub mod config;
pub mod environment;
pub mod error;
pub mod function;
pub mod import;
pub mod interpreter;
pub mod parser;
pub mod reporter;
pub mod resolver;
pub mod runner;
pub mod scanner;
pub mod source;
pub mod stack;
pub mod token;
pub mod value;
