//! End-to-end tests for the `brutus` binary.

use std::path::Path;
use std::process::{Command, Output};

fn command(args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_brutus"));
    cmd.args(args).env("NO_COLOR", "1").env_remove("BRUT_LOG");
    cmd
}

fn brutus(args: &[&str]) -> Output {
    command(args).output().expect("failed to spawn brutus")
}

fn brutus_in(cwd: &Path, args: &[&str]) -> Output {
    command(args)
        .current_dir(cwd)
        .output()
        .expect("failed to spawn brutus")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}

const WRITE_RESULT: &str = r#"
local out = ...
local f = assert(io.open(out, "wb"))
f:write(tostring(RESULT))
f:close()
"#;

#[test]
fn test_version_reports_format() {
    let output = brutus(&["--version"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("(bundle format 1.0)"));
}

#[test]
fn test_ship_then_run() {
    let app = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    write(app.path(), "util.lua", "return { answer = function() return 6 * 7 end }");
    write(
        app.path(),
        "main.lua",
        &format!("RESULT = require('util').answer() .. ':' .. tostring(platform.bundle){}", WRITE_RESULT),
    );
    let app_dir = app.path().to_str().unwrap();

    let shipped = brutus(&["ship", "--dir", app_dir]);
    assert!(shipped.status.success(), "{}", stderr(&shipped));
    assert!(app.path().join("brut.dat").is_file());
    assert!(stdout(&shipped).contains("Wrote"));

    // Remove the loose sources so only the container can satisfy the run.
    std::fs::remove_file(app.path().join("main.lua")).unwrap();
    std::fs::remove_file(app.path().join("util.lua")).unwrap();

    let result = scratch.path().join("result.txt");
    let ran = brutus(&["run", "--dir", app_dir, result.to_str().unwrap()]);
    assert!(ran.status.success(), "{}", stderr(&ran));
    assert_eq!(std::fs::read_to_string(&result).unwrap(), "42:true");
}

#[test]
fn test_run_loose_main() {
    let app = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    write(
        app.path(),
        "main.lua",
        &format!("RESULT = tostring(platform.bundle){}", WRITE_RESULT),
    );

    let result = scratch.path().join("result.txt");
    let ran = brutus(&["run", "--dir", app.path().to_str().unwrap(), result.to_str().unwrap()]);
    assert!(ran.status.success(), "{}", stderr(&ran));
    assert_eq!(std::fs::read_to_string(&result).unwrap(), "false");
}

#[test]
fn test_run_relative_dir() {
    let parent = tempfile::tempdir().unwrap();
    let app = parent.path().join("app");
    std::fs::create_dir(&app).unwrap();
    write(&app, "helper.lua", "return 'loose'");
    write(&app, "main.lua", &format!("RESULT = require('helper'){}", WRITE_RESULT));

    // The result path is relative to the program directory after the chdir.
    let ran = brutus_in(parent.path(), &["run", "--dir", "app", "result.txt"]);
    assert!(ran.status.success(), "{}", stderr(&ran));
    assert_eq!(std::fs::read_to_string(app.join("result.txt")).unwrap(), "loose");

    let shipped = brutus_in(parent.path(), &["ship", "--dir", "app"]);
    assert!(shipped.status.success(), "{}", stderr(&shipped));
    std::fs::remove_file(app.join("main.lua")).unwrap();
    std::fs::remove_file(app.join("result.txt")).unwrap();

    let ran = brutus_in(parent.path(), &["run", "--dir", "app", "result.txt"]);
    assert!(ran.status.success(), "{}", stderr(&ran));
    assert_eq!(std::fs::read_to_string(app.join("result.txt")).unwrap(), "loose");
}

#[test]
fn test_default_command_passes_args() {
    let app = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    write(
        app.path(),
        "main.lua",
        &format!("RESULT = select('#', ...) .. ':' .. select(2, ...){}", WRITE_RESULT),
    );

    let result = scratch.path().join("result.txt");
    let ran = brutus(&[
        "--dir",
        app.path().to_str().unwrap(),
        "--",
        result.to_str().unwrap(),
        "-x",
    ]);
    assert!(ran.status.success(), "{}", stderr(&ran));
    assert_eq!(std::fs::read_to_string(&result).unwrap(), "2:-x");
}

#[test]
fn test_usage_error_exit_code() {
    let output = brutus(&["--no-such-flag"]);
    assert_eq!(output.status.code(), Some(1));

    let output = brutus(&["--help"]);
    assert!(output.status.success());
}

#[test]
fn test_ship_rejects_syntax_error() {
    let app = tempfile::tempdir().unwrap();
    write(app.path(), "main.lua", "print(");

    let shipped = brutus(&["ship", "--dir", app.path().to_str().unwrap()]);
    assert_eq!(shipped.status.code(), Some(2));
    assert!(stderr(&shipped).contains("main.lua"), "{}", stderr(&shipped));
    assert!(!app.path().join("brut.dat").exists());

    // Without the check the source is packed as-is and fails at run time.
    let shipped = brutus(&["ship", "--dir", app.path().to_str().unwrap(), "--no-check"]);
    assert!(shipped.status.success(), "{}", stderr(&shipped));
    let ran = brutus(&["run", "--dir", app.path().to_str().unwrap()]);
    assert_eq!(ran.status.code(), Some(2));
}

#[test]
fn test_script_error_exit_code() {
    let app = tempfile::tempdir().unwrap();
    write(app.path(), "main.lua", "error('kaboom')");

    let ran = brutus(&["run", "--dir", app.path().to_str().unwrap()]);
    assert_eq!(ran.status.code(), Some(2));
    assert!(stderr(&ran).contains("kaboom"), "{}", stderr(&ran));
}

#[test]
fn test_nothing_to_run_exit_code() {
    let app = tempfile::tempdir().unwrap();
    let ran = brutus(&["run", "--dir", app.path().to_str().unwrap()]);
    assert_eq!(ran.status.code(), Some(1));
    assert!(stderr(&ran).contains("main.lua"), "{}", stderr(&ran));
}

#[test]
fn test_invalid_bundle_exit_code() {
    let app = tempfile::tempdir().unwrap();
    write(app.path(), "brut.dat", "not a bundle");
    write(app.path(), "main.lua", "print('loose')");

    let ran = brutus(&["run", "--dir", app.path().to_str().unwrap()]);
    assert_eq!(ran.status.code(), Some(1));
    assert!(stderr(&ran).contains("malformed header"), "{}", stderr(&ran));
}

#[test]
fn test_verify() {
    let app = tempfile::tempdir().unwrap();
    let bundles = tempfile::tempdir().unwrap();
    write(app.path(), "main.lua", "print('hi')");

    let good = bundles.path().join("good.dat");
    let shipped = brutus(&[
        "ship",
        "--dir",
        app.path().to_str().unwrap(),
        "--output",
        good.to_str().unwrap(),
    ]);
    assert!(shipped.status.success(), "{}", stderr(&shipped));

    let verified = brutus(&["verify", bundles.path().to_str().unwrap()]);
    assert!(verified.status.success(), "{}", stderr(&verified));
    assert!(stdout(&verified).contains("PASS"));
    assert!(stdout(&verified).contains("1/1 ok"));

    write(bundles.path(), "bad.dat", "brut");
    let verified = brutus(&["verify", bundles.path().to_str().unwrap()]);
    assert_eq!(verified.status.code(), Some(1));
    assert!(stdout(&verified).contains("FAIL"));
    assert!(stdout(&verified).contains("1/2 ok"));
}
