use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::PathBuf;
use std::process::Command;

fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir.parent().unwrap().parent().unwrap().to_path_buf()
}

fn segc() -> Command {
    let mut cmd = Command::cargo_bin("segc").unwrap();
    cmd.env("SEGC_COLOR", "never")
        .env_remove("RUST_LOG")
        .env_remove("SEGC_ENTRY")
        .env_remove("SEGC_MAX_DEPTH")
        .env_remove("SEGC_TICKS");
    cmd
}

fn script(dir: &tempfile::TempDir, name: &str, src: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, src).unwrap();
    path
}

#[test]
fn run_exits_with_entry_result() {
    let root = workspace_root();
    segc()
        .arg("run")
        .arg(root.join("demos/factorial.sc"))
        .arg("5")
        .assert()
        .code(120);
}

#[test]
fn run_passes_arguments_in_order() {
    let root = workspace_root();
    let demo = root.join("demos/conditionals.sc");
    segc().arg("run").arg(&demo).args(["3", "5"]).assert().code(1);
    segc().arg("run").arg(&demo).args(["5", "5"]).assert().code(2);
    segc().arg("run").arg(&demo).args(["7", "-5"]).assert().code(3);
}

#[test]
fn run_checks_argument_count_before_calling() {
    let root = workspace_root();
    segc()
        .arg("run")
        .arg(root.join("demos/factorial.sc"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("expects 1 argument(s), 0 given"));
}

#[test]
fn run_uses_configured_entry_point() {
    let tmp = tempfile::tempdir().unwrap();
    let path = script(&tmp, "entry.sc", "fn other() { ret 7 }");

    segc()
        .arg("run")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not define 'main'"));
    segc().arg("run").arg(&path).env("SEGC_ENTRY", "other").assert().code(7);
    segc().args(["run", "--entry", "other"]).arg(&path).assert().code(7);
}

#[test]
fn missing_file_is_fatal() {
    segc()
        .args(["run", "does/not/exist.sc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn syntax_error_shows_location_and_hint() {
    let tmp = tempfile::tempdir().unwrap();
    let path = script(&tmp, "bad.sc", "fn main() {\n  x = 1\n");

    segc()
        .arg("run")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Syntax error"))
        .stderr(predicate::str::contains("line 1, column 11"));

    let path = script(&tmp, "params.sc", "fn main x) { ret 0 }");
    segc()
        .arg("run")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("fn myFunction(x){}"));
}

#[test]
fn runtime_error_is_reported() {
    let tmp = tempfile::tempdir().unwrap();
    let path = script(&tmp, "div.sc", "fn main() { ret 1 / 0 }");

    segc()
        .arg("run")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Runtime error"))
        .stderr(predicate::str::contains("divide"));
}

const COUNTDOWN: &str = "fn f(n) { if n == 0 { ret 0 } ret 1 + f(n - 1) } fn main(n) { ret f(n) }";

#[cfg(unix)]
#[test]
fn run_handles_deep_recursion() {
    let tmp = tempfile::tempdir().unwrap();
    let path = script(&tmp, "deep.sc", COUNTDOWN);

    segc().arg("run").arg(&path).arg("500").assert().code(244);
    segc().arg("run").arg(&path).arg("1500").assert().code(220);
}

#[test]
fn runaway_recursion_is_a_runtime_error() {
    let tmp = tempfile::tempdir().unwrap();
    let path = script(&tmp, "deep.sc", COUNTDOWN);

    segc()
        .arg("run")
        .arg(&path)
        .arg("100000")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Runtime error"))
        .stderr(predicate::str::contains("calls are already active"));

    segc()
        .args(["--max-depth", "10"])
        .arg("run")
        .arg(&path)
        .arg("20")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("more than 10 calls"));

    segc()
        .env("SEGC_MAX_DEPTH", "10")
        .arg("run")
        .arg(&path)
        .arg("8")
        .assert()
        .code(8);
}

#[test]
fn long_operator_chain_is_a_syntax_error() {
    let tmp = tempfile::tempdir().unwrap();
    let src = format!("x = 1{}\nfn main() {{ ret 0 }}", " + 1".repeat(200_000));
    let path = script(&tmp, "chain.sc", &src);

    segc()
        .arg("run")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Syntax error"))
        .stderr(predicate::str::contains("nesting is deeper than"));
}

#[test]
fn out_of_range_exit_code_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let path = script(&tmp, "big.sc", "fn main() { ret 5000000000 }");

    segc()
        .arg("run")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("outside the range of an exit code"));
}

#[test]
fn host_calls_start_then_update_each_tick() {
    let root = workspace_root();
    segc()
        .args(["host", "--ticks", "2", "--input", "0,1", "--watch", "playerY,missing"])
        .arg(root.join("demos/game.sc"))
        .assert()
        .success()
        .stdout(predicate::str::contains("[start] playerY=500 missing=<unset>"))
        .stdout(predicate::str::contains("[tick 1] update=500 playerY=500"))
        .stdout(predicate::str::contains("[tick 2] update=460 playerY=500"));
}

#[test]
fn host_reads_ticks_from_environment() {
    let root = workspace_root();
    segc()
        .arg("host")
        .arg(root.join("demos/game.sc"))
        .env("SEGC_TICKS", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("[tick 1]"))
        .stdout(predicate::str::contains("[tick 2]").not());
}

#[test]
fn host_reloads_script() {
    let root = workspace_root();
    segc()
        .args(["host", "--ticks", "3", "--reload-every", "1", "--reset-on-reload"])
        .arg(root.join("demos/game.sc"))
        .env("RUST_LOG", "info")
        .assert()
        .success()
        .stderr(predicate::str::contains("reloading"))
        .stdout(predicate::str::contains("[tick 3]"));
}

#[test]
fn host_requires_start_and_update() {
    let tmp = tempfile::tempdir().unwrap();
    let no_start = script(&tmp, "no_start.sc", "fn update(i) { ret i }");
    segc()
        .arg("host")
        .arg(&no_start)
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not define 'start'"));

    let no_update = script(&tmp, "no_update.sc", "fn start(w h) { ret 0 }");
    segc()
        .arg("host")
        .arg(&no_update)
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not define 'update'"));
    segc().args(["host", "--ticks", "0"]).arg(&no_update).assert().success();
}

#[test]
fn repl_evaluates_definitions_and_commands() {
    let mut cmd = assert_cmd::Command::cargo_bin("segc").unwrap();
    cmd.env("SEGC_COLOR", "never")
        .arg("repl")
        .write_stdin("fn twice(n) {\n  ret n * 2\n}\nx = 5\n:call twice 21\n:get x\n:funcs\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("defined twice/1"))
        .stdout(predicate::str::contains("42"))
        .stdout(predicate::str::contains("x = 5"))
        .stdout(predicate::str::contains("Goodbye."));
}
