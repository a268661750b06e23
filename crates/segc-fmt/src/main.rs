use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser as ClapParser;
use segc_syntax::ast::*;
use segc_syntax::error::Error;

const INDENT: &str = "    ";

#[derive(ClapParser, Debug)]
#[command(name = "segc-fmt", version, about = "Format SEGC source files")]
struct Args {
    /// Exit non-zero if the file is not already formatted
    #[arg(long, conflicts_with = "write")]
    check: bool,

    /// Rewrite the file in place
    #[arg(long)]
    write: bool,

    #[arg(value_name = "FILE")]
    file: PathBuf,
}

fn main() {
    let args = Args::parse();

    let src = match fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: failed to read {}: {}", args.file.display(), e);
            process::exit(1);
        }
    };
    let program = match parse(&src) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}: {}", e.phase(), e);
            process::exit(1);
        }
    };

    let formatted = format_program(&program);

    if args.check {
        if normalize_newlines(&formatted) != normalize_newlines(&src) {
            eprintln!("{}: not formatted", args.file.display());
            process::exit(1);
        }
        println!("{}: ok", args.file.display());
    } else if args.write {
        if let Err(e) = fs::write(&args.file, formatted) {
            eprintln!("error: failed to write {}: {}", args.file.display(), e);
            process::exit(1);
        }
    } else {
        print!("{}", formatted);
    }
}

fn parse(src: &str) -> Result<Program, Error> {
    let tokens = segc_lexer::tokenize(src)?;
    segc_parser::parse(tokens)
}

fn normalize_newlines(s: &str) -> String {
    s.replace("\r\n", "\n")
}

/// Canonical layout: one statement per line, four-space indentation, braces
/// on the same line as their header and a blank line around every function.
/// Comments and skipped top-level tokens are dropped.
fn format_program(p: &Program) -> String {
    let mut out = String::new();
    let mut prev_was_fn = false;
    for (i, item) in p.items.iter().enumerate() {
        let is_fn = matches!(item, Item::Function(_));
        if i > 0 && (is_fn || prev_was_fn) {
            out.push('\n');
        }
        match item {
            Item::Function(f) => out.push_str(&format_function(f)),
            Item::Assign { name, value } => {
                out.push_str(&format!("{} = {}\n", name, format_node(value, 0)));
            }
        }
        prev_was_fn = is_fn;
    }
    out
}

fn format_function(f: &Function) -> String {
    format!(
        "fn {}({}) {}\n",
        f.name,
        f.params.join(" "),
        format_block(&f.body, 0)
    )
}

/// Formats `{ ... }` whose closing brace sits at `indent`.
fn format_block(b: &Block, indent: usize) -> String {
    if b.body.is_empty() {
        return "{}".to_string();
    }
    let mut out = String::from("{\n");
    for node in &b.body {
        out.push_str(&INDENT.repeat(indent + 1));
        out.push_str(&format_node(node, indent + 1));
        out.push('\n');
    }
    out.push_str(&INDENT.repeat(indent));
    out.push('}');
    out
}

fn format_conditional(c: &Conditional, indent: usize) -> String {
    let mut out = String::from(c.kind.keyword());
    if let Some(cond) = &c.cond {
        out.push(' ');
        out.push_str(&format_node(cond, indent));
    }
    out.push(' ');
    out.push_str(&format_block(&c.body, indent));
    if let Some(next) = &c.next {
        out.push(' ');
        out.push_str(&format_conditional(next, indent));
    }
    out
}

/// `indent` is the level of the line the node starts on, used by any block it
/// contains.
fn format_node(n: &Node, indent: usize) -> String {
    match n {
        Node::Number(v) => v.to_string(),
        Node::Ident(name) => name.clone(),
        Node::Assign { name, value } => format!("{} = {}", name, format_node(value, indent)),
        Node::Call { name, args } => {
            let args: Vec<String> = args.iter().map(|a| format_node(a, indent)).collect();
            format!("{}({})", name, args.join(" "))
        }
        Node::Return(value) => format!("ret {}", format_node(value, indent)),
        Node::Block(b) => format_block(b, indent),
        Node::Binary { left, op, right } => format!(
            "{} {} {}",
            format_node(left, indent),
            op.symbol(),
            format_node(right, indent)
        ),
        Node::Unary { op, operand } => format!("{}{}", op.symbol(), format_node(operand, indent)),
        Node::Conditional(c) => format_conditional(c, indent),
    }
}
