use std::fs;
use std::process::Command;

use tempfile::TempDir;

#[test]
fn dry_run_reports_field_bounds_without_a_window() {
    let output = Command::new(env!("CARGO_BIN_EXE_heatmap"))
        .args(["--dry-run", "--formula", "constant", "--value", "0.3", "--field-size", "4x4"])
        .output()
        .expect("failed to run heatmap --dry-run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("constant(0.3) 4x4: min 0 max 1"), "{stdout}");
}

#[test]
fn missing_shader_files_exit_with_failure_code() {
    let shader_dir = TempDir::new().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_heatmap"))
        .arg("--shader-dir")
        .arg(shader_dir.path())
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run heatmap");

    if cfg!(unix) {
        assert_eq!(output.status.code(), Some(255));
    }
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("texture.vert"), "{stderr}");
}

#[test]
fn missing_fragment_shader_is_named() {
    let shader_dir = TempDir::new().unwrap();
    fs::write(
        shader_dir.path().join("texture.vert"),
        include_str!("../../../resources/shaders/texture.vert"),
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_heatmap"))
        .arg("--shader-dir")
        .arg(shader_dir.path())
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run heatmap");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("texture.frag"), "{stderr}");
}

#[test]
fn zero_field_size_is_rejected_by_the_parser() {
    let output = Command::new(env!("CARGO_BIN_EXE_heatmap"))
        .args(["--dry-run", "--field-size", "0x10"])
        .output()
        .expect("failed to run heatmap");

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
}
