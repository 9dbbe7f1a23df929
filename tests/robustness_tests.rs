use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

mod common;

#[test]
fn test_malformed_rows_answer_07() {
    let dir = tempdir().unwrap();
    let transactions = dir.path().join("transactions.csv");
    let balances = dir.path().join("balances.csv");

    common::write_csv(
        &balances,
        &["category", "balance"],
        &[&["FOOD", "10.0"]],
    )
    .unwrap();
    common::write_csv(
        &transactions,
        &["mcc", "amount", "merchant"],
        &[
            &["5411", "1.0", "Supermarket"],
            &["5411", "not_a_number", "Supermarket"],
            &["5411", "-5", "Supermarket"],
            &["5411", "2.0", "Supermarket"],
        ],
    )
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("benefit-authorizer"));
    cmd.arg(&transactions).arg("--balances").arg(&balances);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error reading transaction"))
        .stdout(
            "{\"code\": \"00\"}\n\
             {\"code\": \"07\"}\n\
             {\"code\": \"07\"}\n\
             {\"code\": \"00\"}\n",
        );
}

#[test]
fn test_invalid_balances_file_fails_fast() {
    let dir = tempdir().unwrap();
    let transactions = dir.path().join("transactions.csv");
    let balances = dir.path().join("balances.csv");

    common::write_csv(&balances, &["category", "balance"], &[&["TRAVEL", "10.0"]]).unwrap();
    common::write_csv(
        &transactions,
        &["mcc", "amount", "merchant"],
        &[&["5411", "1.0", "Supermarket"]],
    )
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("benefit-authorizer"));
    cmd.arg(&transactions).arg("--balances").arg(&balances);

    cmd.assert().failure().stdout(predicate::str::is_empty());
}

#[test]
fn test_padded_merchant_must_match_exactly() {
    let dir = tempdir().unwrap();
    let transactions = dir.path().join("transactions.csv");
    let balances = dir.path().join("balances.csv");
    let mappings = dir.path().join("mappings.csv");

    common::write_csv(
        &balances,
        &["category", "balance"],
        &[&["MEAL", "100"], &["CASH", "5"]],
    )
    .unwrap();
    common::write_csv(
        &mappings,
        &["merchant", "corrected_mcc"],
        &[&["UBER EATS                   SAO PAULO BR", "5812"]],
    )
    .unwrap();
    common::write_csv(
        &transactions,
        &["mcc", "amount", "merchant"],
        &[
            &["9999", "20", "UBER EATS                   SAO PAULO BR"],
            &["9999", "20", "UBER EATS SAO PAULO BR"],
        ],
    )
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("benefit-authorizer"));
    cmd.arg(&transactions)
        .arg("--balances")
        .arg(&balances)
        .arg("--mappings")
        .arg(&mappings);

    // The second merchant is not mapped, so it is charged to CASH and declined.
    cmd.assert()
        .success()
        .stdout("{\"code\": \"00\"}\n{\"code\": \"51\"}\n");
}
