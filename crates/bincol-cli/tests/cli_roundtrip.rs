//! Integration tests for the CLI binary.

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("bincol"))
}

#[test]
fn prints_both_schemas_and_exits_zero() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;

    cli()
        .args(["--out-dir", tmp.path().to_string_lossy().as_ref()])
        .assert()
        .success()
        .stdout(contains("Schema of"))
        .stdout(contains("binary.parquet"))
        .stdout(contains("binary.orc"))
        .stdout(contains("binary: binary"));

    assert!(tmp.path().join("binary.parquet").exists());
    assert!(tmp.path().join("binary.orc").exists());
    Ok(())
}

#[test]
fn unusable_out_dir_exits_nonzero() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;

    // A regular file where a directory is expected.
    let blocker = tmp.path().join("blocker");
    std::fs::write(&blocker, b"not a directory")?;

    cli()
        .args(["--out-dir", blocker.to_string_lossy().as_ref()])
        .assert()
        .failure()
        .stderr(contains("not usable"));
    Ok(())
}
