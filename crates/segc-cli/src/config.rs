use std::io::IsTerminal;

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

/// Settings resolved once from the command line and environment.
pub struct AppConfig {
    pub color_enabled: bool,
    pub verbose: bool,
    pub max_depth: usize,
}

impl AppConfig {
    pub fn new(color: ColorChoice, verbose: bool, max_depth: usize) -> Self {
        let color_enabled = match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => std::io::stderr().is_terminal() && std::io::stdout().is_terminal(),
        };

        AppConfig {
            color_enabled,
            verbose,
            max_depth,
        }
    }

    /// Applies the colour choice to every `owo-colors` call and installs the
    /// logger. `RUST_LOG` wins over `--verbose`.
    pub fn install(&self) {
        owo_colors::set_override(self.color_enabled);

        let default_filter = if self.verbose { "debug" } else { "warn" };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
            .format_timestamp(None)
            .init();
    }
}
