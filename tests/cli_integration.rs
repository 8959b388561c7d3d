//! End-to-end tests of the filebench binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn filebench() -> Command {
    let mut cmd = Command::cargo_bin("filebench").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_three_directories_report_pairs() {
    let root = tempdir().unwrap();
    let dirs: Vec<_> = ["a", "b", "c"].iter().map(|d| root.path().join(d)).collect();
    let dir_arg = dirs
        .iter()
        .map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join(",");

    let output = filebench()
        .args(["--dir", &dir_arg, "--files", "10", "--size", "1"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    for dir in &dirs {
        let count = fs::read_dir(dir).unwrap().count();
        assert_eq!(count, 10);
        assert_eq!(fs::metadata(dir.join("file_000010.dat")).unwrap().len(), 1048576);

        let label = dir.display().to_string();
        // Checkpoints at 5 and 10, the phase-end summary, and the final report
        let wrote = stdout.lines().filter(|l| l.contains(&format!("{} - Wrote:", label))).count();
        let read = stdout.lines().filter(|l| l.contains(&format!("{} - Read:", label))).count();
        assert_eq!(wrote, 4);
        assert_eq!(read, 4);
    }

    assert!(stdout.contains("Write Speed is:"));
    assert!(stdout.contains("Read Speed is:"));
    assert!(stdout.contains("10.000 MB in"));
}

#[test]
fn test_zero_files_reads_existing() {
    let root = tempdir().unwrap();
    fs::write(root.path().join("old.bin"), vec![1u8; 2048]).unwrap();

    filebench()
        .args(["--dir", &root.path().display().to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote:  0.000 MB"))
        .stdout(predicate::str::contains("Write Speed is:  0.000 MB/s"))
        .stdout(predicate::str::contains("Read:  0.002 MB"));

    // Nothing was written
    assert_eq!(fs::read_dir(root.path()).unwrap().count(), 1);
}

#[test]
fn test_json_output() {
    let root = tempdir().unwrap();

    let output = filebench()
        .args(["--dir", &root.path().display().to_string()])
        .args(["--files", "2", "--size", "1", "--seed", "3", "--json", "--quiet"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["write"]["files_succeeded"], 2);
    assert_eq!(reports[0]["read"]["bytes"], 2 * 1048576);
    assert_eq!(reports[0]["errors"].as_array().unwrap().len(), 0);
}

#[test]
fn test_shared_directory_readers() {
    let root = tempdir().unwrap();

    filebench()
        .args(["--dir", &root.path().display().to_string()])
        .args(["--readers", "3", "--files", "2", "--size", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[worker 2] - Read:"));

    assert_eq!(fs::read_dir(root.path()).unwrap().count(), 6);
    assert!(root.path().join("file_w001_000002.dat").is_file());
}

#[test]
fn test_directory_creation_failure_exits_nonzero() {
    let root = tempdir().unwrap();
    let blocker = root.path().join("blocker");
    fs::write(&blocker, b"file").unwrap();

    filebench()
        .args(["--dir", &blocker.join("sub").display().to_string(), "--files", "1", "--size", "1"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Failed to create directory"));
}

#[test]
fn test_invalid_size_rejected() {
    filebench()
        .args(["--size", "0"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("File size must be greater than 0"));
}

#[test]
fn test_config_file_with_flag_override() {
    let root = tempdir().unwrap();
    let config_path = root.path().join("bench.toml");
    let target = root.path().join("target");
    fs::write(
        &config_path,
        format!(
            "directories = [{:?}]\nfiles_to_write = 4\nfile_size_mb = 1\n",
            target.display().to_string()
        ),
    )
    .unwrap();

    filebench()
        .args(["--config", &config_path.display().to_string(), "--files", "2"])
        .assert()
        .success();

    assert_eq!(fs::read_dir(&target).unwrap().count(), 2);
}
