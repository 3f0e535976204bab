use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "goblin-siege"])
        .status()
        .expect("failed to invoke cargo check for goblin-siege CLI binary");

    assert!(status.success(), "cargo check --bin goblin-siege should succeed");
}

#[test]
fn headless_run_exits_cleanly() {
    let output = Command::new(env!("CARGO_BIN_EXE_goblin-siege"))
        .current_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/../.."))
        .args(["--headless", "240", "--wave-size", "3", "--seed", "5"])
        .output()
        .expect("failed to launch goblin-siege");

    assert!(
        output.status.success(),
        "headless run failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}
