//! Integration tests for grainctl-cli.
//!
//! Every test runs the built binary against a temporary store directory.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn grainctl_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_grainctl"))
}

fn scripts_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("scripts")
}

fn run(args: &[&str], store: &Path) -> Output {
    let output = grainctl_bin()
        .args(args)
        .arg("--store")
        .arg(store)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run grainctl");
    assert!(
        output.status.success(),
        "grainctl {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn simulate_browse_script() {
    let dir = tempfile::tempdir().unwrap();
    let script = scripts_dir().join("browse.toml");
    let output = run(&["simulate", script.to_str().unwrap()], dir.path());
    let text = stdout(&output);

    assert!(text.contains("splash -> vu_meter"));
    assert!(text.contains("vu_meter -> load"));
    assert!(text.contains("load -> vu_meter"));
    assert!(text.contains("final mode:    vu_meter"));
    // two taps plus the recall itself
    assert!(text.contains("bank 0 slot 3"));
}

#[test]
fn simulate_json_summary() {
    let dir = tempfile::tempdir().unwrap();
    let script = scripts_dir().join("browse.toml");
    let output = run(&["simulate", script.to_str().unwrap(), "--json"], dir.path());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["mode"], "vu_meter");
    assert_eq!(summary["ticks"], 8000);
    assert_eq!(summary["cursor"]["bank"], 0);
    assert_eq!(summary["cursor"]["slot"], 3);
    assert_eq!(summary["leds"].as_array().unwrap().len(), 4);
    assert_eq!(summary["transitions"][0]["to"], "vu_meter");
}

#[test]
fn simulate_calibration_persists() {
    let dir = tempfile::tempdir().unwrap();
    let script = scripts_dir().join("calibrate.toml");
    let output = run(
        &["simulate", script.to_str().unwrap(), "--hold-write"],
        dir.path(),
    );
    let text = stdout(&output);
    assert!(text.contains("calibration_1 -> calibration_2"));
    assert!(text.contains("calibration_2 -> vu_meter"));

    let shown = stdout(&run(&["settings", "show"], dir.path()));
    assert!(shown.contains("pitch scale:    -100.0"));
    assert!(!shown.contains("factory defaults written"));
}

#[test]
fn simulate_rejects_bad_script() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("bad.toml");
    std::fs::write(
        &script,
        "ticks = 10\n[[steps]]\nat = 1\naction = \"set\"\nchannel = \"volume\"\nvalue = 1.0\n",
    )
    .unwrap();

    let output = grainctl_bin()
        .args(["simulate", script.to_str().unwrap()])
        .output()
        .expect("failed to run grainctl");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("volume"));
}

#[test]
fn settings_show_and_reset() {
    let dir = tempfile::tempdir().unwrap();
    let first = stdout(&run(&["settings"], dir.path()));
    assert!(first.contains("factory defaults written"));
    assert!(first.contains("pitch scale:    -84.2600"));
    assert!(dir.path().join("settings.toml").exists());

    let second = stdout(&run(&["settings", "show"], dir.path()));
    assert!(!second.contains("factory defaults written"));

    let reset = stdout(&run(&["settings", "reset"], dir.path()));
    assert!(reset.contains("reset"));
}

#[test]
fn presets_list_and_show() {
    let dir = tempfile::tempdir().unwrap();
    let listing = stdout(&run(&["presets", "list"], dir.path()));
    assert!(listing.contains("0 of 12 written"));
    assert_eq!(listing.matches("(empty)").count(), 12);

    let output = grainctl_bin()
        .args(["presets", "show", "1", "2", "--store"])
        .arg(dir.path())
        .output()
        .expect("failed to run grainctl");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("empty"));
}

#[test]
fn factory_reads_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let pot = stdout(&run(&["factory", "0x08", "--set", "texture=1.0"], dir.path()));
    assert_eq!(pot.trim(), "0xff (255)");

    let gate = stdout(&run(&["factory", "0x43", "--gate"], dir.path()));
    assert_eq!(gate.trim(), "0x01 (1)");

    let switch = stdout(&run(&["factory", "66"], dir.path()));
    assert_eq!(switch.trim(), "0x00 (0)");

    let missing_gate = stdout(&run(&["factory", "0x44", "--gate"], dir.path()));
    assert_eq!(missing_gate.trim(), "0x00 (0)");
}
