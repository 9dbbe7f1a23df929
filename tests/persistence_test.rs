#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::io::Write;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_rocksdb_balances_survive_restart() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    // 1. First run: seed balances and spend 60 of FOOD
    let mut csv1 = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv1, "mcc,amount,merchant").unwrap();
    writeln!(csv1, "5411,60.0,Supermarket").unwrap();

    let mut cmd1 = Command::new(cargo_bin!("benefit-authorizer"));
    cmd1.arg(csv1.path())
        .arg("--balances")
        .arg("tests/fixtures/balances.csv")
        .arg("--db-path")
        .arg(&db_path);

    let output1 = cmd1.output().expect("Failed to execute command");
    assert!(output1.status.success());
    let stdout1 = String::from_utf8_lossy(&output1.stdout);
    assert_eq!(stdout1, "{\"code\": \"00\"}\n");

    // 2. Second run: no seeding, the remaining 40 must be recovered
    let mut csv2 = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv2, "mcc,amount,merchant").unwrap();
    writeln!(csv2, "5411,60.0,Supermarket").unwrap();
    writeln!(csv2, "5411,40.0,Supermarket").unwrap();

    let mut cmd2 = Command::new(cargo_bin!("benefit-authorizer"));
    cmd2.arg(csv2.path()).arg("--db-path").arg(&db_path);

    let output2 = cmd2.output().expect("Failed to execute command");
    assert!(output2.status.success());
    let stdout2 = String::from_utf8_lossy(&output2.stdout);
    assert_eq!(stdout2, "{\"code\": \"51\"}\n{\"code\": \"00\"}\n");
}
