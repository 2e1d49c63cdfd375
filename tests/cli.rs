#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn cli() -> Command {
    Command::cargo_bin("escala-cli").unwrap()
}

#[test]
fn lists_national_holidays() {
    cli()
        .args(["holidays", "--year", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-02-13 | Carnaval"))
        .stdout(predicate::str::contains("2024-12-25 | Natal | nacional | +2 | principal"));
}

#[test]
fn custom_holiday_roundtrip_through_store() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("feriados.json");
    let store = store.to_str().unwrap();

    cli()
        .args(["--store", store, "--org", "acme", "add-holiday"])
        .args(["--date", "2024-07-15", "--name", "Fundação", "--bonus", "1.5"])
        .assert()
        .success();

    cli()
        .args(["--store", store, "--org", "acme", "holidays", "--year", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-07-15 | Fundação | organizacional | +1.5"));

    let out = dir.path().join("export.json");
    cli()
        .args(["--store", store, "--org", "acme", "export-holidays", "--out"])
        .arg(&out)
        .assert()
        .success();
    let exported = fs::read_to_string(&out).unwrap();
    assert!(exported.contains("\"folgasAdicionais\": 1.5"));
}

#[test]
fn invalid_holiday_exits_with_error() {
    cli()
        .args(["add-holiday", "--date", "15/07/2024", "--name", "X"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("YYYY-MM-DD"));
}

#[test]
fn generates_a_grid() {
    let dir = tempdir().unwrap();
    let members = dir.path().join("members.csv");
    fs::write(
        &members,
        "id,name,eligibility,budget_weekday,budget_weekend\nana,Ana,both,5,5\nbia,Bia,both,5,5\n",
    )
    .unwrap();
    let out_csv = dir.path().join("escala.csv");

    cli()
        .args(["generate", "--start", "2024-03-04", "--end", "2024-03-08", "--members"])
        .arg(&members)
        .arg("--out-csv")
        .arg(&out_csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Ana | T F1 T F1 T"))
        .stdout(predicate::str::contains("Bia | F1 T F1 T F1"));

    let csv = fs::read_to_string(&out_csv).unwrap();
    assert!(csv.starts_with("member_id,member_name,date,rotation,duty,streak,code"));
    assert_eq!(csv.lines().count(), 11);
}

#[test]
fn inverted_range_fails() {
    let dir = tempdir().unwrap();
    let members = dir.path().join("members.csv");
    fs::write(&members, "id,name,eligibility,budget_weekday,budget_weekend\nana,Ana,both,5,5\n")
        .unwrap();

    cli()
        .args(["generate", "--start", "2024-03-08", "--end", "2024-03-04", "--members"])
        .arg(&members)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid range"));
}
