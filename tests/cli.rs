//! Runs the `build-layer` binary the way a deploy script would.

mod common;

use common::{skip_without_shell, Workspace, FAKE_NPM, SCOPE};
use std::process::Command;

fn build_layer_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_build-layer"))
}

#[test]
fn json_report_lists_staged_dependencies() {
    if skip_without_shell() {
        return;
    }
    let ws = Workspace::new(&[("@scope/pkgA", "1.0.0"), ("leftpad", "2.0.0")]).expect("workspace");
    ws.add_internal_package("@scope/pkgA").expect("pkgA");
    ws.write("fake-npm.sh", FAKE_NPM).expect("script");
    let install = format!("sh {}", ws.root().join("fake-npm.sh").display());

    let output = build_layer_bin()
        .arg("--cwd")
        .arg(ws.root())
        .args(["--scope", SCOPE, "--install-command", install.as_str(), "--json"])
        .output()
        .expect("run build-layer");
    assert!(
        output.status.success(),
        "build-layer failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("report json");
    assert_eq!(report["external"], serde_json::json!(["leftpad"]));
    assert_eq!(report["internal"], serde_json::json!(["@scope/pkgA"]));
    assert!(ws
        .staging_dir()
        .join("node_modules/@scope/pkgA/package.json")
        .is_file());
}

#[test]
fn failure_names_the_step_and_keeps_installer_output() {
    if skip_without_shell() {
        return;
    }
    let ws = Workspace::new(&[("leftpad", "2.0.0")]).expect("workspace");
    ws.write("fail.sh", "echo 'fetching'; echo 'npm ERR! 404 leftpad' >&2; exit 2")
        .expect("script");
    let install = format!("sh {}", ws.root().join("fail.sh").display());

    let output = build_layer_bin()
        .arg("--cwd")
        .arg(ws.root())
        .args(["--install-command", install.as_str()])
        .output()
        .expect("run build-layer");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("install external dependencies"), "{stderr}");
    assert!(stderr.contains("npm ERR! 404 leftpad"), "{stderr}");
    assert!(stderr.contains("fetching"), "{stderr}");
}

#[test]
fn missing_manifest_exits_non_zero() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = build_layer_bin()
        .arg("--cwd")
        .arg(dir.path())
        .output()
        .expect("run build-layer");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("read manifest"), "{stderr}");
}
