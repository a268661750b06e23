mod config;
mod diagnostic;
mod host;
mod repl;

use std::path::{Path, PathBuf};
use std::process;
use std::thread;

use clap::{Parser, Subcommand};
use log::debug;
use segc_interpreter::Interpreter;

use config::{AppConfig, ColorChoice};
use diagnostic::{read_script, Failure};
use host::{Host, HostArgs};

#[derive(Parser, Debug)]
#[command(name = "segc", version, about = "Run, host and explore SEGC scripts")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// When to use colours
    #[arg(long, value_enum, value_name = "WHEN", env = "SEGC_COLOR", default_value = "auto", global = true)]
    color: ColorChoice,

    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Most function calls that may be active at once
    #[arg(long, value_name = "N", env = "SEGC_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH, global = true)]
    max_depth: usize,
}

/// Scripts run on a worker thread with this much stack, enough for
/// `DEFAULT_MAX_DEPTH` nested calls in an unoptimized build.
const WORKER_STACK_SIZE: usize = 256 * 1024 * 1024;
const DEFAULT_MAX_DEPTH: usize = 2000;

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a script's entry point and exit with the value it returns
    Run {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Function to call after loading
        #[arg(long, value_name = "NAME", env = "SEGC_ENTRY", default_value = "main")]
        entry: String,

        /// Integer arguments for the entry point
        #[arg(value_name = "ARGS", allow_negative_numbers = true)]
        args: Vec<i64>,
    },
    /// Drive a script through start/update without rendering
    Host(HostArgs),
    /// Interactive prompt (the default)
    Repl,
}

fn main() {
    let cli = Cli::parse();
    let config = AppConfig::new(cli.color, cli.verbose, cli.max_depth);
    config.install();

    let worker = thread::Builder::new()
        .name("segc".to_string())
        .stack_size(WORKER_STACK_SIZE)
        .spawn(move || dispatch(cli.command, &config));
    let outcome = match worker.map(|handle| handle.join()) {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(_)) => Err(Failure::Fatal("the interpreter thread panicked".to_string())),
        Err(e) => Err(Failure::Fatal(format!("failed to start the interpreter thread: {}", e))),
    };

    match outcome {
        Ok(code) => process::exit(code),
        Err(failure) => {
            failure.render();
            process::exit(1);
        }
    }
}

fn dispatch(command: Option<Command>, config: &AppConfig) -> Result<i32, Failure> {
    match command {
        None | Some(Command::Repl) => {
            repl::start_repl(config.max_depth);
            Ok(0)
        }
        Some(Command::Run { file, entry, args }) => run_file(&file, &entry, &args, config.max_depth),
        Some(Command::Host(args)) => Host::new(args, config.max_depth).run().map(|_| 0),
    }
}

/// Loads `path`, checks the entry point against the given arguments and calls
/// it. The returned integer becomes the process exit code; values outside the
/// `i32` range are rejected rather than truncated. The platform may still keep
/// only the low bits (8 on Unix).
fn run_file(path: &Path, entry: &str, args: &[i64], max_depth: usize) -> Result<i32, Failure> {
    let source = read_script(path)?;
    let mut interp = Interpreter::with_max_depth(max_depth);
    interp.load(&source).map_err(|e| Failure::script(&source, e))?;

    let arity = interp.arity(entry).ok_or_else(|| Failure::missing_entry(entry))?;
    if arity != args.len() {
        return Err(Failure::Fatal(format!(
            "'{}' expects {} argument(s), {} given on the command line",
            entry,
            arity,
            args.len()
        )));
    }

    let code = interp.call(entry, args).map_err(|e| Failure::script(&source, e))?;
    debug!("'{}' returned {}", entry, code);
    i32::try_from(code).map_err(|_| {
        Failure::Fatal(format!(
            "'{}' returned {}, which is outside the range of an exit code",
            entry, code
        ))
    })
}
