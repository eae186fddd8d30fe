use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use yaupl::ast_printer::AstPrinter;
use yaupl::config::InterpreterConfig;
use yaupl::parser::Parser;
use yaupl::reporter::{ConsoleReporter, FileReporter, SharedReporter};
use yaupl::runner::{self, Runner};
use yaupl::scanner::Scanner;
use yaupl::source;

const LOG_FILE: &str = "yaupl.log";

#[derive(ClapParser, Debug)]
#[command(version, about = "yaupl language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Option<Commands>,

    /// Enable logging to yaupl.log
    #[arg(long, global = true)]
    log: bool,

    /// Append diagnostics to FILE instead of printing them to stderr
    #[arg(long, global = true, value_name = "FILE")]
    error_log: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs a yaupl script
    Run { filename: PathBuf },

    /// Starts the interactive prompt
    Repl,

    /// Tokenizes a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print the tokens as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Parses a file and prints every statement in prefix form
    Parse { filename: PathBuf },
}

fn init_logger() -> Result<()> {
    let log_file = File::create(LOG_FILE).context(format!("Failed to create {}", LOG_FILE))?;

    Builder::new()
        .format(|buf, record| {
            // Strip 'yaupl::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("yaupl::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized, writing to {}", LOG_FILE);
    Ok(())
}

fn read_script(filename: &Path) -> Result<String> {
    source::read_source(filename).context(format!("Failed to read file {:?}", filename))
}

fn tokenize(filename: &Path, json: bool, reporter: SharedReporter) -> Result<i32> {
    info!("Running Tokenize subcommand");

    let text: String = read_script(filename)?;
    let scanned = Scanner::new(&text).scan_tokens(reporter.as_ref());

    if json {
        let rendered =
            serde_json::to_string_pretty(&scanned.tokens).context("Failed to encode tokens")?;
        println!("{}", rendered);
    } else {
        for token in &scanned.tokens {
            debug!("Scanned token: {}", token);
            println!("{}", token);
        }
    }

    if scanned.had_error {
        debug!("Tokenization failed, exiting with code 65");
        return Ok(runner::EXIT_STATIC_ERROR);
    }

    info!("Tokenization completed successfully");
    Ok(0)
}

fn parse(filename: &Path, reporter: SharedReporter) -> Result<i32> {
    info!("Running Parse subcommand");

    let text: String = read_script(filename)?;
    let scanned = Scanner::new(&text).scan_tokens(reporter.as_ref());
    let mut parser = Parser::new(&scanned.tokens, reporter);

    for stmt in parser.parse() {
        println!("{}", AstPrinter::print_stmt(&stmt));
    }

    if scanned.had_error || parser.had_error() {
        return Ok(runner::EXIT_STATIC_ERROR);
    }

    Ok(0)
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        // Initialize a minimal logger to avoid "no logger" errors
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    let reporter: SharedReporter = match &args.error_log {
        Some(path) => Rc::new(FileReporter::new(path)),
        None => Rc::new(ConsoleReporter::new()),
    };

    let code: i32 = match args.commands.unwrap_or(Commands::Repl) {
        Commands::Run { filename } => {
            info!("Running Run subcommand");

            let mut runner = Runner::new(
                InterpreterConfig::default(),
                reporter,
                Box::new(io::stdout()),
            );

            let code = runner
                .run_file(&filename)
                .context(format!("Failed to run {:?}", filename))?;

            info!("Program finished with status {}", code);
            code
        }

        Commands::Repl => {
            let mut runner = Runner::new(
                InterpreterConfig::repl(),
                reporter,
                Box::new(io::stdout()),
            );

            runner.run_prompt(io::stdin().lock(), &mut io::stdout())?;
            0
        }

        Commands::Tokenize { filename, json } => tokenize(&filename, json, reporter)?,

        Commands::Parse { filename } => parse(&filename, reporter)?,
    };

    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}
