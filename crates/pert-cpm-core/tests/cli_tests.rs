#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.write_stdin(script.to_string()).assert()
}

const DIAMOND: &str = "add A 3\nadd B 2 A\nadd C 4 A\nadd D 1 B,C\n";

#[test]
fn cli_computes_critical_path() {
    run_cli(&format!("{DIAMOND}compute\nquit\n"))
        .success()
        .stdout(str_contains("Critical Path: A -> C -> D"))
        .stdout(str_contains("CPM Time: 8"))
        .stdout(str_contains("activities=4, critical=3, duration=8"));
}

#[test]
fn cli_rejects_compute_on_empty_network() {
    run_cli("compute\nquit\n")
        .success()
        .stdout(str_contains("Please add activities before calculating CPM."));
}

#[test]
fn cli_delete_command_removes_activity() {
    let assert = run_cli(&format!("{DIAMOND}delete C\ncompute\nquit\n")).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains("Deleted activity C."));
    assert!(output.contains("Critical Path: A -> B -> D"), "{output}");
    assert!(output.contains("CPM Time: 6"), "{output}");
}

#[test]
fn cli_reports_unknown_dependency() {
    run_cli("add A 3\nadd B 2 Z\nquit\n")
        .success()
        .stdout(str_contains("Error [dependency_not_found] (B)"));
}

#[test]
fn cli_reports_cycles_on_compute() {
    run_cli("add A 1\nadd B 1 A\ndep A B\ncompute\nquit\n")
        .success()
        .stdout(str_contains("'A' now depends on 'B'."))
        .stdout(str_contains("CPM error [cycle]"));
}

#[test]
fn cli_rejects_negative_duration() {
    run_cli("add A -2\nquit\n")
        .success()
        .stdout(str_contains("Error [invalid_duration] (A)"));
}

#[test]
fn cli_pert_summary_and_target() {
    let assert = run_cli(
        "pert add T1 1 2 3\npert add T2 2 4 6\npert show\npert target 2\npert show\nquit\n",
    )
    .success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains("Task 'T2' added (expected=4, variance=0.44)."));
    assert!(output.contains("PERT Project Time: 6"));
    assert!(output.contains("Variance of Total Project: 0.56"));
    assert!(output.contains("Standard Deviation: 0.75"));
    assert!(output.contains("Probability of Completion (target 6):"));
    assert!(output.contains("  T1: 0.53"));
    assert!(output.contains("Target set to 2."));
    assert!(output.contains("  T2: 0.45"), "{output}");
}

#[test]
fn cli_pert_clear_empties_estimator() {
    run_cli("pert add T1 1 2 3\npert clear\npert show\nquit\n")
        .success()
        .stdout(str_contains("PERT tasks cleared."))
        .stdout(str_contains("No PERT tasks."));
}

#[test]
fn cli_unknown_command_hints_help() {
    run_cli("frobnicate\n")
        .success()
        .stdout(str_contains("Unknown command 'frobnicate'"));
}
