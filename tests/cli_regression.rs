// CLI regression tests: verdict output, rendering of miette diagnostics, exit codes.

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

fn pushdown() -> Command {
    Command::cargo_bin("pushdown").unwrap()
}

#[test]
fn run_prints_verdict_per_input() {
    pushdown()
        .args(["run", "--preset", "anbn", "aabb", "aab"])
        .assert()
        .success()
        .stdout(contains("ACCEPTED").and(contains("REJECTED")));
}

#[test]
fn run_with_path_trace_ends_in_accept() {
    pushdown()
        .args(["run", "-p", "balanced-parens", "--trace", "path", "(())"])
        .assert()
        .success()
        .stdout(contains("Transition: ACCEPT").and(contains("(consumed '(')")));
}

#[test]
fn run_emits_json() {
    pushdown()
        .args(["run", "--preset", "anbn", "--json", "ab"])
        .assert()
        .success()
        .stdout(contains("\"verdict\": \"accepted\"").and(contains("\"engine\": \"search\"")));
}

#[test]
fn unknown_preset_is_a_diagnostic() {
    pushdown()
        .args(["run", "--preset", "nope", "x"])
        .assert()
        .failure()
        .stderr(contains("pushdown::presets::unknown_preset").or(contains("help:")));
}

#[test]
fn malformed_definition_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let bad_file = dir.path().join("bad.yaml");
    fs::write(&bad_file, "states: q\nstart: q\ntransitions:\n  - q,a,Z q,Z\n").unwrap();

    pushdown()
        .arg("run")
        .arg("--definition")
        .arg(&bad_file)
        .arg("a")
        .assert()
        .failure()
        .stderr(contains("pushdown::syntax").or(contains("help:")));
}

#[test]
fn source_is_required() {
    pushdown().args(["run", "ab"]).assert().failure();
}

#[test]
fn compare_flags_divergence() {
    pushdown()
        .args(["compare", "--preset", "even-palindromes", "abba", "ab"])
        .assert()
        .success()
        .stdout(contains("DIVERGES").and(contains("1 of 2 input(s) diverge")));
}

#[test]
fn automatic_step_runs_to_the_end() {
    pushdown()
        .args(["step", "--preset", "anbn", "aabb", "--auto", "--delay-ms", "0"])
        .assert()
        .success()
        .stdout(contains("--- Step 5: Accepted! ---"));
}

#[test]
fn interactive_step_reads_commands_from_stdin() {
    pushdown()
        .args(["step", "--preset", "anbn", "ab"])
        .write_stdin("\n\n\nq\n")
        .assert()
        .success()
        .stdout(contains("Transitioned to q1").and(contains("Accepted!")));
}

#[test]
fn check_walks_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("good.yaml"),
        "states: q,f\nstart: q\naccept: f\ntransitions:\n  - q,ε,Z -> f,Z\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("sloppy.json"),
        r#"{"states": ["q", "lost"], "start": "q"}"#,
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "not a definition").unwrap();

    pushdown()
        .arg("check")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(contains("good.yaml: ok").and(contains("0 error(s), 1 warning(s)")));
}

#[test]
fn check_fails_on_structural_errors() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("empty.yaml");
    fs::write(&file, "accept: q\n").unwrap();

    pushdown()
        .arg("check")
        .arg(&file)
        .assert()
        .failure()
        .stdout(contains("1 error(s)"));
}

#[test]
fn presets_are_listed() {
    pushdown()
        .arg("presets")
        .assert()
        .success()
        .stdout(contains("balanced-parens").and(contains("even-palindromes")));
}

#[test]
fn large_depth_bound_on_epsilon_loop_rejects_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let looping = dir.path().join("loop.yaml");
    fs::write(
        &looping,
        "states: q,f\nstart: q\naccept: f\ntransitions:\n  - q,ε,ε -> q,A\n",
    )
    .unwrap();

    pushdown()
        .arg("run")
        .arg("--definition")
        .arg(&looping)
        .args(["--max-depth", "100000", "ab"])
        .assert()
        .success()
        .stdout(contains("REJECTED").and(contains("depth limit of 100000 reached 1 time(s)")));
}
