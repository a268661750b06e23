use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

use clap::{ArgAction, Parser};
use serde::Serialize;

use segc_interpreter::Interpreter;
use segc_syntax::error::Error;

#[derive(Parser, Debug)]
#[command(name = "segc-bench", about = "Run SEGC benchmarks")]
struct Cli {
    /// Specific script(s) to run, by file stem (e.g. fib). Runs everything discovered if omitted.
    #[arg(short = 't', long = "test", action = ArgAction::Append)]
    tests: Vec<String>,

    /// Measured iterations per script
    #[arg(short = 'n', long = "iterations", default_value_t = 10)]
    iterations: u32,

    /// Unmeasured warmup iterations
    #[arg(short = 'w', long = "warmup", default_value_t = 2)]
    warmup: u32,

    /// Entry point called after the top-level code runs, when it takes no arguments
    #[arg(long, value_name = "NAME", env = "SEGC_ENTRY", default_value = "main")]
    entry: String,

    /// Output JSON file; default: benchmark/results/<timestamp>.json
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Also benchmark the scripts under demos/
    #[arg(long = "include-demos", default_value_t = false)]
    include_demos: bool,

    /// List discovered scripts and exit
    #[arg(long = "list", default_value_t = false)]
    list: bool,
}

#[derive(Debug, Serialize)]
struct BenchResult {
    name: String,
    iterations: u32,
    avg_total_ms: f64,
    min_total_ms: f64,
    max_total_ms: f64,
    avg_tokenize_ms: f64,
    avg_parse_ms: f64,
    avg_run_ms: f64,
    avg_call_ms: Option<f64>,
    entry_result: Option<i64>,
}

#[derive(Debug, Serialize)]
struct OutputDoc {
    timestamp: String,
    segc_version: String,
    benchmarks: Vec<BenchResult>,
}

#[derive(Debug, Clone)]
struct ScriptCase {
    name: String,
    path: PathBuf,
}

/// Phase timings of a single iteration.
struct Sample {
    tokenize: Duration,
    parse: Duration,
    run: Duration,
    call: Option<(Duration, i64)>,
    total: Duration,
}

fn workspace_root() -> PathBuf {
    // crates/segc-bench -> crates -> root
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest.ancestors().nth(2).unwrap_or(manifest).to_path_buf()
}

fn discover_scripts(include_demos: bool) -> Vec<ScriptCase> {
    let root = workspace_root();
    let mut out = Vec::new();

    let mut candidates = vec![root.join("benchmark/scripts")];
    if include_demos {
        candidates.push(root.join("demos"));
    }

    for dir in candidates {
        let Ok(entries) = fs::read_dir(&dir) else { continue };
        for e in entries.flatten() {
            let p = e.path();
            if p.extension().and_then(|s| s.to_str()) == Some("sc") {
                let name = p.file_stem().and_then(|s| s.to_str()).unwrap_or("").to_string();
                out.push(ScriptCase { name, path: p });
            }
        }
    }

    out.sort_by(|a, b| a.name.cmp(&b.name));
    out
}

fn sample(src: &str, entry: &str) -> Result<Sample, Error> {
    let t0 = Instant::now();

    let mut t = Instant::now();
    let tokens = segc_lexer::tokenize(src)?;
    let tokenize = t.elapsed();

    t = Instant::now();
    let program = segc_parser::parse(tokens)?;
    let parse = t.elapsed();

    t = Instant::now();
    let mut interp = Interpreter::new();
    interp.run(&program)?;
    let run = t.elapsed();

    let call = if interp.arity(entry) == Some(0) {
        t = Instant::now();
        let result = interp.call(entry, &[])?;
        Some((t.elapsed(), result))
    } else {
        None
    };

    Ok(Sample {
        tokenize,
        parse,
        run,
        call,
        total: t0.elapsed(),
    })
}

fn measure_script(case: &ScriptCase, cli: &Cli) -> Result<BenchResult, String> {
    let src = fs::read_to_string(&case.path)
        .map_err(|e| format!("failed to read {}: {}", case.path.display(), e))?;
    let fail = |e: Error| format!("{}: {}: {}", case.name, e.phase(), e);

    for _ in 0..cli.warmup {
        sample(&src, &cli.entry).map_err(fail)?;
    }

    let mut samples = Vec::with_capacity(cli.iterations as usize);
    for _ in 0..cli.iterations {
        samples.push(sample(&src, &cli.entry).map_err(fail)?);
    }

    let totals: Vec<f64> = samples.iter().map(|s| dur_ms(s.total)).collect();
    let (avg_t, min_t, max_t) = stats(&totals);
    let calls: Vec<(Duration, i64)> = samples.iter().filter_map(|s| s.call).collect();

    Ok(BenchResult {
        name: case.name.clone(),
        iterations: cli.iterations,
        avg_total_ms: avg_t,
        min_total_ms: min_t,
        max_total_ms: max_t,
        avg_tokenize_ms: avg_ms(&samples, |s| s.tokenize),
        avg_parse_ms: avg_ms(&samples, |s| s.parse),
        avg_run_ms: avg_ms(&samples, |s| s.run),
        avg_call_ms: if calls.is_empty() {
            None
        } else {
            Some(stats(&calls.iter().map(|(d, _)| dur_ms(*d)).collect::<Vec<_>>()).0)
        },
        entry_result: calls.last().map(|(_, v)| *v),
    })
}

fn avg_ms(samples: &[Sample], phase: impl Fn(&Sample) -> Duration) -> f64 {
    let vals: Vec<f64> = samples.iter().map(|s| dur_ms(phase(s))).collect();
    stats(&vals).0
}

fn dur_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

fn stats(vals: &[f64]) -> (f64, f64, f64) {
    if vals.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let min = vals.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = vals.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let avg = vals.iter().sum::<f64>() / (vals.len() as f64);
    (avg, min, max)
}

fn write_report(path: &Path, doc: &OutputDoc) -> Result<(), String> {
    let json = serde_json::to_string_pretty(doc).map_err(|e| format!("failed to serialize results: {}", e))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("failed to create {}: {}", parent.display(), e))?;
    }
    fs::write(path, json).map_err(|e| format!("failed to write {}: {}", path.display(), e))
}

fn run(cli: &Cli) -> Result<(), String> {
    let mut scripts = discover_scripts(cli.include_demos);

    if cli.list {
        println!("Discovered scripts:");
        for s in &scripts {
            println!("- {} ({})", s.name, s.path.display());
        }
        return Ok(());
    }

    if !cli.tests.is_empty() {
        let wanted: std::collections::HashSet<_> = cli.tests.iter().map(|s| s.to_lowercase()).collect();
        scripts.retain(|s| wanted.contains(&s.name.to_lowercase()));
        if scripts.is_empty() {
            return Err("no matching scripts, use --list to see what is available".to_string());
        }
    }
    if scripts.is_empty() {
        return Err("no .sc scripts found in benchmark/scripts".to_string());
    }

    let mut results = Vec::new();
    for case in &scripts {
        let r = measure_script(case, cli)?;
        let call = match (r.avg_call_ms, r.entry_result) {
            (Some(ms), Some(v)) => format!(" call={:.3}ms -> {}", ms, v),
            _ => String::new(),
        };
        println!(
            "{:>12}: total avg={:.3}ms min={:.3}ms max={:.3}ms | tokenize={:.3}ms parse={:.3}ms run={:.3}ms{}",
            r.name, r.avg_total_ms, r.min_total_ms, r.max_total_ms, r.avg_tokenize_ms, r.avg_parse_ms, r.avg_run_ms, call
        );
        results.push(r);
    }

    let out_path = match &cli.output {
        Some(p) => p.clone(),
        None => {
            let ts_file = chrono::Utc::now().format("%Y-%m-%d_%H-%M-%SZ").to_string();
            workspace_root().join("benchmark/results").join(format!("{}.json", ts_file))
        }
    };

    let doc = OutputDoc {
        timestamp: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        segc_version: env!("CARGO_PKG_VERSION").to_string(),
        benchmarks: results,
    };
    write_report(&out_path, &doc)?;

    println!("\nSaved results to {}", out_path.display());
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(msg) = run(&cli) {
        eprintln!("error: {}", msg);
        process::exit(2);
    }
}
