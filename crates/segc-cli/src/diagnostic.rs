use std::fs;
use std::path::Path;

use owo_colors::OwoColorize;
use segc_syntax::error::{Error, ErrorKind};

/// Prints `err` to stderr: label and message, the offending source line with a
/// caret when the error is located, then the worked example or a suggestion.
pub fn render_error(source: &str, err: &Error) {
    eprintln!("{}: {}", err.phase().red().bold(), err.msg.red());
    if let (Some(line), Some(col)) = (err.line, err.col) {
        eprintln!("  --> line {}, column {}", line, col);
        if let Some(src_line) = source.lines().nth(line.saturating_sub(1)) {
            let gutter = format!("{:3} | ", line);
            eprintln!("     |");
            eprintln!("{}{}", gutter.bright_black(), src_line);
            let marker = format!("{}^", " ".repeat(gutter.len() + col.saturating_sub(1)));
            eprintln!("{}{}", marker.red(), " here".red());
            eprintln!("     |");
        }
    }

    if let Some(hint) = &err.hint {
        eprintln!("{}", "Help: write it like this".yellow());
        eprintln!("    {} {}", "wrong:".bright_black(), hint.wrong);
        eprintln!("    {} {}", "right:".bright_black(), hint.right);
    } else if let Some(help) = suggestion(err.kind) {
        eprintln!("{}", format!("Help: {}", help).yellow());
    }
}

/// Prints a failure that did not come from the language itself, such as an
/// unreadable file.
pub fn render_fatal(msg: &str) {
    eprintln!("{}: {}", "error".red().bold(), msg.red());
}

/// Anything that stops a command. Language errors keep the source they were
/// raised against so they can be rendered with context.
#[derive(Debug)]
pub enum Failure {
    Fatal(String),
    Script { source: String, err: Error },
}

impl Failure {
    pub fn script(source: &str, err: Error) -> Self {
        Failure::Script {
            source: source.to_string(),
            err,
        }
    }

    pub fn missing_entry(name: &str) -> Self {
        Failure::Fatal(format!("the script does not define '{}'", name))
    }

    pub fn render(&self) {
        match self {
            Failure::Fatal(msg) => render_fatal(msg),
            Failure::Script { source, err } => render_error(source, err),
        }
    }
}

pub fn read_script(path: &Path) -> Result<String, Failure> {
    fs::read_to_string(path)
        .map_err(|e| Failure::Fatal(format!("failed to read {}: {}", path.display(), e)))
}

fn suggestion(kind: ErrorKind) -> Option<&'static str> {
    let help = match kind {
        ErrorKind::UnknownCharacter => {
            "only letters, digits, '_' inside names and the operators + - * / = == < > & | ! are allowed"
        }
        ErrorKind::InvalidNumber => "integer literals must fit in 64 bits",
        ErrorKind::UndefinedVariable => {
            "assign the variable before reading it; functions only see their own locals and globals"
        }
        ErrorKind::UndefinedFunction => "check the spelling, functions are declared with 'fn name(params) { ... }'",
        ErrorKind::ArityMismatch => "pass exactly one argument per declared parameter",
        ErrorKind::NilOperand | ErrorKind::NilAssignment => {
            "'while' and untaken branches produce no value; use 'ret' to produce one"
        }
        ErrorKind::DivisionByZero => "check the divisor with an 'if' before dividing",
        ErrorKind::RecursionLimit => "make sure recursion reaches its base case, or raise --max-depth",
        ErrorKind::NestingLimit => "split the expression with intermediate variables",
        _ => return None,
    };
    Some(help)
}
