extern crate assert_cmd;
extern crate predicates;
extern crate tempfile;

use assert_cmd::Command;
use predicates::prelude::*;

fn zoom() -> Command {
    Command::cargo_bin("zoom").unwrap()
}

#[test]
fn renders_a_short_zoom() {
    let dir = tempfile::tempdir().unwrap();
    zoom()
        .args(&["--size", "32x18", "--frames", "3", "--iterations", "50"])
        .arg("--output")
        .arg(dir.path())
        .assert()
        .success();

    for i in 0..3 {
        assert!(dir.path().join(format!("frame{:05}.png", i)).is_file());
    }
    assert!(!dir.path().join("frame00003.png").exists());
}

#[test]
fn every_strategy_combination_runs() {
    for &(frames, rows, animation) in &[
        ("serial", "serial", "serial"),
        ("parallel", "serial", "concurrent"),
        ("serial", "parallel", "concurrent"),
        ("parallel", "parallel", "serial"),
    ] {
        let dir = tempfile::tempdir().unwrap();
        zoom()
            .args(&["-s", "12x8", "-n", "2", "-i", "20"])
            .args(&["-f", frames, "-r", rows, "-a", animation, "-j", "0"])
            .arg("-o")
            .arg(dir.path())
            .assert()
            .success();
        assert!(dir.path().join("frame00001.png").is_file());
    }
}

#[test]
fn nested_parallel_strategies_render_a_large_frame() {
    let dir = tempfile::tempdir().unwrap();
    zoom()
        .args(&["-s", "640x480", "-n", "1", "-i", "50", "-f", "parallel", "-r", "parallel"])
        .arg("-o")
        .arg(dir.path())
        .assert()
        .success();
    assert!(dir.path().join("frame00000.png").is_file());
}

#[test]
fn accepts_a_negative_center() {
    let dir = tempfile::tempdir().unwrap();
    zoom()
        .args(&["-s", "8x8", "-n", "1", "-c", "-1.25,0", "-w", "0.25"])
        .arg("-o")
        .arg(dir.path())
        .assert()
        .success();
    assert!(dir.path().join("frame00000.png").is_file());
}

#[test]
fn rejects_malformed_sizes() {
    zoom()
        .args(&["--size", "wide", "--frames", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not parse output image size"));

    zoom()
        .args(&["--size", "0x10", "--frames", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be positive"));
}

#[test]
fn rejects_unknown_strategies() {
    zoom()
        .args(&["--frame-strategy", "sideways"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sideways"));
}

#[test]
fn rejects_a_zoom_that_underflows() {
    let dir = tempfile::tempdir().unwrap();
    zoom()
        .args(&["-s", "4x4", "-w", "1e-300", "-z", "1e-10", "-n", "5"])
        .arg("-o")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid frame settings"));
    assert!(!dir.path().join("frame00000.png").exists());
}
