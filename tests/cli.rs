//! Pruebas de la línea de comandos de portscout.
//!
//! No dependen de la salida real de ss/netstat/lsof: solo validan argumentos
//! y las operaciones que se rechazan antes de invocar herramientas.

use assert_cmd::Command;
use predicates::prelude::*;

fn portscout() -> Command {
    let mut cmd = Command::cargo_bin("portscout").expect("binario portscout");
    cmd.env_remove("PORTSCOUT_DEMO_MODE")
        .env_remove("PORTSCOUT_ENABLE_KILL");
    cmd
}

#[test]
fn help_lists_subcommands() {
    portscout()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("kill"));
}

#[test]
fn list_help_shows_filters() {
    portscout()
        .args(["list", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--protocol"))
        .stdout(predicate::str::contains("--process"))
        .stdout(predicate::str::contains("--source"));
}

#[test]
fn invalid_protocol_rejected() {
    portscout()
        .args(["list", "--protocol", "sctp"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sctp"));
}

#[test]
fn out_of_range_port_rejected() {
    portscout().args(["list", "-p", "70000"]).assert().failure();
}

#[test]
fn missing_subcommand_fails() {
    portscout().assert().failure();
}

#[test]
fn kill_refused_in_demo_flag() {
    portscout()
        .args(["kill", "999999", "--demo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("modo demo"));
}

#[test]
fn kill_refused_in_demo_env() {
    portscout()
        .env("PORTSCOUT_DEMO_MODE", "1")
        .args(["kill", "999999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("modo demo"));
}

#[test]
fn kill_refused_when_disabled() {
    portscout()
        .env("PORTSCOUT_ENABLE_KILL", "false")
        .args(["kill", "999999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("deshabilitada"));
}

#[test]
fn kill_pid_zero_rejected() {
    portscout()
        .args(["kill", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("PID inválido"));
}

#[test]
fn kill_help_describes_demo_refusal() {
    portscout()
        .args(["kill", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rechaza la terminación"));
}
