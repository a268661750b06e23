use std::io::{self, BufRead, Write};

use owo_colors::OwoColorize;
use segc_interpreter::Interpreter;
use segc_syntax::ast::Item;
use segc_syntax::error::Result;
use segc_syntax::token::TokenKind;

use crate::diagnostic::render_error;

pub fn start_repl(max_depth: usize) {
    println!("{}", "SEGC REPL. Type :help for help, :quit to exit.".bold().green());

    let mut interp = Interpreter::with_max_depth(max_depth);
    let stdin = io::stdin();
    let mut input = stdin.lock();

    let mut buffer = String::new();
    loop {
        let prompt = if buffer.is_empty() { "segc> " } else { "... > " };
        print!("{}", prompt.cyan());
        let _ = io::stdout().flush();

        let mut line = String::new();
        let n = match input.read_line(&mut line) {
            Ok(n) => n,
            Err(_) => {
                println!("<input error>");
                break;
            }
        };
        if n == 0 {
            println!("\nGoodbye.");
            break;
        }
        let trimmed = line.trim();

        if buffer.is_empty() && trimmed.starts_with(':') {
            if !command(&mut interp, trimmed) {
                println!("Goodbye.");
                break;
            }
            continue;
        }

        buffer.push_str(&line);
        if !is_complete(&buffer) {
            continue;
        }

        if let Err(e) = eval(&mut interp, &buffer) {
            render_error(&buffer, &e);
        }
        buffer.clear();
    }
}

/// Runs a `:command`. Returns false when the REPL should exit.
fn command(interp: &mut Interpreter, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let rest: Vec<&str> = parts.collect();

    match name {
        ":quit" | ":q" | ":exit" => return false,
        ":help" | ":h" => print_help(),
        ":vars" => print_vars(interp),
        ":funcs" => print_funcs(interp),
        ":get" => match rest.first() {
            Some(var) => match interp.read_global(var) {
                Some(v) => println!("{} = {}", var.yellow(), v.bright_blue()),
                None => println!("{}", format!("'{}' is not a global", var).red()),
            },
            None => println!("{}", "usage: :get NAME".red()),
        },
        ":call" => match rest.split_first() {
            Some((func, args)) => call(interp, func, args),
            None => println!("{}", "usage: :call NAME [ARGS...]".red()),
        },
        ":reset" => {
            interp.reset();
            println!("{}", "State reset.".yellow());
        }
        _ => println!("{}", "Unknown command. Type :help.".red()),
    }
    true
}

fn call(interp: &mut Interpreter, func: &str, args: &[&str]) {
    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        match arg.parse::<i64>() {
            Ok(v) => values.push(v),
            Err(_) => {
                println!("{}", format!("'{}' is not an integer", arg).red());
                return;
            }
        }
    }
    match interp.call(func, &values) {
        Ok(v) => println!("{}", v.bright_blue()),
        Err(e) => render_error("", &e),
    }
}

/// Loads declarations and top-level assignments, echoing what each one did.
fn eval(interp: &mut Interpreter, source: &str) -> Result<()> {
    let tokens = segc_lexer::tokenize(source)?;
    let program = segc_parser::parse(tokens)?;
    interp.run(&program)?;

    for item in &program.items {
        match item {
            Item::Function(f) => println!("{} {}/{}", "defined".dimmed(), f.name.yellow(), f.params.len()),
            Item::Assign { name, .. } => {
                if let Some(v) = interp.read_global(name) {
                    println!("{} = {}", name.yellow(), v.bright_blue());
                }
            }
        }
    }
    Ok(())
}

fn print_help() {
    println!("{}", "Commands:".bold());
    for (cmd, what) in [
        (":call NAME ARGS..", "Call a function with integer arguments"),
        (":get NAME", "Show a global"),
        (":vars", "List globals"),
        (":funcs", "List defined functions"),
        (":reset", "Forget all functions and globals"),
        (":help", "Show this help"),
        (":quit", "Exit the REPL"),
    ] {
        println!("  {} {}", format!("{:<18}", cmd).yellow(), what);
    }
    println!("Enter 'fn' declarations or 'name = expr' assignments. Input continues until braces and parentheses balance.");
}

fn print_vars(interp: &Interpreter) {
    let vars = interp.globals();
    if vars.is_empty() {
        println!("{}", "<no vars>".dimmed());
        return;
    }
    for (k, v) in vars {
        println!("{} = {}", k.yellow(), v.bright_blue());
    }
}

fn print_funcs(interp: &Interpreter) {
    let names = interp.function_names();
    if names.is_empty() {
        println!("{}", "<no functions>".dimmed());
        return;
    }
    for n in names {
        let arity = interp.arity(&n).unwrap_or_default();
        println!("{}/{}", n.yellow(), arity);
    }
}

/// True once every `{` and `(` typed so far has been closed. Input that does
/// not even scan is complete so its error is reported right away.
fn is_complete(input: &str) -> bool {
    let tokens = match segc_lexer::tokenize(input) {
        Ok(t) => t,
        Err(_) => return true,
    };
    let mut braces = 0i32;
    let mut parens = 0i32;
    for tk in &tokens {
        match tk.kind {
            TokenKind::LBrace => braces += 1,
            TokenKind::RBrace => braces -= 1,
            TokenKind::LParen => parens += 1,
            TokenKind::RParen => parens -= 1,
            _ => {}
        }
    }
    braces <= 0 && parens <= 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_waits_for_balanced_braces() {
        assert!(!is_complete("fn f(x) {\n"));
        assert!(!is_complete("fn f(x"));
        assert!(is_complete("fn f(x) {\n ret x\n}\n"));
        assert!(is_complete("x = 1\n"));
        assert!(is_complete("x = $\n"));
    }

    #[test]
    fn eval_defines_functions_and_globals() {
        let mut interp = Interpreter::new();
        eval(&mut interp, "fn twice(n) { ret n * 2 }\nx = twice(4)").unwrap();
        assert_eq!(interp.read_global("x"), Some(8));
        assert_eq!(interp.arity("twice"), Some(1));
    }

    #[test]
    fn commands_keep_running_until_quit() {
        let mut interp = Interpreter::new();
        assert!(command(&mut interp, ":vars"));
        assert!(command(&mut interp, ":get nothing"));
        assert!(command(&mut interp, ":reset"));
        assert!(!command(&mut interp, ":quit"));
    }
}
