//! End-to-end tests for `zmk2vial convert`.
#![allow(unused_variables)] // Temp dirs must be kept alive even if not directly accessed

use std::process::Command;
use tempfile::TempDir;

mod fixtures;

use fixtures::*;

/// Path to the zmk2vial binary
fn zmk2vial_bin() -> &'static str {
    env!("CARGO_BIN_EXE_zmk2vial")
}

/// A command isolated from the user's config file and working directory.
fn zmk2vial(workdir: &TempDir) -> Command {
    let mut cmd = Command::new(zmk2vial_bin());
    cmd.current_dir(workdir.path())
        .env("ZMK2VIAL_CONFIG_DIR", workdir.path().join("config"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_convert_local_keymap_with_template() {
    let (keymap_path, keymap_temp) = create_temp_keymap();
    let (template_path, template_temp) = create_temp_template();
    let workdir = TempDir::new().unwrap();
    let output_path = workdir.path().join("corne.vil");

    let output = zmk2vial(&workdir)
        .args([
            "convert",
            "--local",
            keymap_path.to_str().unwrap(),
            "--template",
            template_path.to_str().unwrap(),
            "--output",
            output_path.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Found 4 layers: default, lower, raise, adjust"));
    assert!(stdout.contains("Found 2 macros"));
    assert!(stdout.contains("Found 2 combos"));
    assert!(stdout.contains("Created 8 tap dances"));
    assert!(stdout.contains(&format!("Template: {}", template_path.display())));

    let vil = read_json(&output_path);
    assert_eq!(vil["uid"], 1_234_567_890_123_456_789u64);
    assert_eq!(vil["layout"][0][0][0], "KC_TAB");
    assert_eq!(vil["settings"]["4"], 180);
    assert_eq!(vil["tap_dance"].as_array().unwrap().len(), 32);
}

#[test]
fn test_convert_output_is_compact_json() {
    let (keymap_path, keymap_temp) = create_temp_keymap();
    let (template_path, template_temp) = create_temp_template();
    let workdir = TempDir::new().unwrap();
    let output_path = workdir.path().join("out.vil");

    let output = zmk2vial(&workdir)
        .args(["convert", "-l", keymap_path.to_str().unwrap()])
        .args(["-t", template_path.to_str().unwrap()])
        .args(["-o", output_path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(0));

    let content = std::fs::read_to_string(&output_path).unwrap();
    assert!(content.starts_with(r#"{"version":1,"uid":1234567890123456789,"layout":"#));
    assert!(!content.contains('\n'));
    assert!(!content.contains(": "));
    // Template settings keep their order, new ones follow
    assert!(content.contains(r#""settings":{"1":1,"4":180,"7":50,"10":125}"#));
}

#[test]
fn test_convert_is_default_command() {
    let (keymap_path, keymap_temp) = create_temp_keymap();
    let (template_path, template_temp) = create_temp_template();
    let workdir = TempDir::new().unwrap();

    let output = zmk2vial(&workdir)
        .args([
            "--local",
            keymap_path.to_str().unwrap(),
            "--template",
            template_path.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    // Default output file in the working directory
    let vil = read_json(&workdir.path().join("zmk-converted.vil"));
    assert_eq!(vil["layout"].as_array().unwrap().len(), 10);
}

#[test]
fn test_convert_template_from_working_directory() {
    let (keymap_path, keymap_temp) = create_temp_keymap();
    let workdir = TempDir::new().unwrap();
    std::fs::write(workdir.path().join("vial.vil"), template_json().to_string()).unwrap();

    // Search only the working directory so a stray /tmp/vial.vil is ignored
    let config_dir = workdir.path().join("config");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "[template]\nsearch_paths = [\"vial.vil\"]\n",
    )
    .unwrap();

    let output = zmk2vial(&workdir)
        .args(["convert", "--local", keymap_path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Template: vial.vil"));

    let vil = read_json(&workdir.path().join("zmk-converted.vil"));
    assert_eq!(vil["vial_protocol"], 6);
}

#[test]
fn test_convert_broken_template_is_not_fatal() {
    let (keymap_path, keymap_temp) = create_temp_keymap();
    let (template_path, template_temp) = create_temp_file("broken.vil", "{ not json");
    let workdir = TempDir::new().unwrap();
    let output_path = workdir.path().join("out.vil");

    let output = zmk2vial(&workdir)
        .args([
            "convert",
            "--local",
            keymap_path.to_str().unwrap(),
            "--template",
            template_path.to_str().unwrap(),
            "--output",
            output_path.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let vil = read_json(&output_path);
    assert_eq!(vil["layout"].as_array().unwrap().len(), 10);
}

#[test]
fn test_convert_missing_keymap_writes_nothing() {
    let workdir = TempDir::new().unwrap();
    let output_path = workdir.path().join("out.vil");

    let output = zmk2vial(&workdir)
        .args([
            "convert",
            "--local",
            "/nonexistent/corne.keymap",
            "--output",
            output_path.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2), "Should fail with I/O error");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read keymap file"));
    assert!(!output_path.exists());
}

#[test]
fn test_convert_invalid_repo() {
    let workdir = TempDir::new().unwrap();

    let output = zmk2vial(&workdir)
        .args(["convert", "--repo", "not-a-repo"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1), "Should fail with validation error");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("owner/name"));
}
