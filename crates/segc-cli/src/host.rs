//! Headless game host.
//!
//! Drives a script the way a game loop would, without rendering: the script is
//! loaded and `start(width height)` is called once, then `update(input)` runs
//! once per tick. Watched globals are printed after every tick so the state the
//! script keeps between frames can be inspected or diffed.

use std::path::PathBuf;

use clap::Args;
use log::{debug, info};
use owo_colors::OwoColorize;
use segc_interpreter::Interpreter;
use segc_syntax::error::Error;

use crate::diagnostic::{read_script, Failure};

#[derive(Args, Debug)]
pub struct HostArgs {
    /// Script to host
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Number of update ticks to run
    #[arg(long, value_name = "N", env = "SEGC_TICKS", default_value_t = 60)]
    pub ticks: u64,

    /// Width passed to start
    #[arg(long, value_name = "PX", env = "SEGC_WIDTH", default_value_t = 640)]
    pub width: i64,

    /// Height passed to start
    #[arg(long, value_name = "PX", env = "SEGC_HEIGHT", default_value_t = 640)]
    pub height: i64,

    /// Input values passed to update, cycled across ticks
    #[arg(
        long,
        value_name = "VALUES",
        value_delimiter = ',',
        allow_negative_numbers = true,
        default_value = "0"
    )]
    pub input: Vec<i64>,

    /// Globals to print after every tick
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub watch: Vec<String>,

    /// Reload the script from disk every N ticks
    #[arg(long, value_name = "N")]
    pub reload_every: Option<u64>,

    /// Drop all globals before each reload
    #[arg(long)]
    pub reset_on_reload: bool,
}

pub struct Host {
    args: HostArgs,
    interp: Interpreter,
    source: String,
}

impl Host {
    pub fn new(args: HostArgs, max_depth: usize) -> Self {
        Self {
            args,
            interp: Interpreter::with_max_depth(max_depth),
            source: String::new(),
        }
    }

    pub fn run(&mut self) -> Result<(), Failure> {
        self.reload()?;
        self.print_state("start", None);

        for tick in 1..=self.args.ticks {
            if let Some(every) = self.args.reload_every {
                if every > 0 && tick > 1 && (tick - 1) % every == 0 {
                    info!("reloading {} before tick {}", self.args.file.display(), tick);
                    if self.args.reset_on_reload {
                        self.interp.reset_globals();
                    }
                    self.reload()?;
                }
            }

            if !self.interp.has_function("update") {
                return Err(Failure::missing_entry("update"));
            }
            let input = self.input_for(tick);
            let result = self.interp.call("update", &[input]).map_err(|err| self.script_error(err))?;
            self.print_state(&format!("tick {}", tick), Some(result));
        }
        Ok(())
    }

    /// Reads, runs and starts the script. Functions from an earlier load are
    /// replaced; globals are kept.
    fn reload(&mut self) -> Result<(), Failure> {
        self.source = read_script(&self.args.file)?;
        self.interp.load(&self.source).map_err(|err| self.script_error(err))?;

        if !self.interp.has_function("start") {
            return Err(Failure::missing_entry("start"));
        }
        debug!("calling start({} {})", self.args.width, self.args.height);
        self.interp
            .call("start", &[self.args.width, self.args.height])
            .map_err(|err| self.script_error(err))?;
        Ok(())
    }

    fn input_for(&self, tick: u64) -> i64 {
        if self.args.input.is_empty() {
            return 0;
        }
        let ix = ((tick - 1) % self.args.input.len() as u64) as usize;
        self.args.input[ix]
    }

    fn script_error(&self, err: Error) -> Failure {
        Failure::script(&self.source, err)
    }

    fn print_state(&self, label: &str, result: Option<i64>) {
        let mut line = format!("[{}]", label);
        if let Some(v) = result {
            line.push_str(&format!(" update={}", v));
        }
        for name in &self.args.watch {
            match self.interp.read_global(name) {
                Some(v) => line.push_str(&format!(" {}={}", name, v)),
                None => line.push_str(&format!(" {}=<unset>", name)),
            }
        }
        println!("{}", line.cyan());
    }
}
