use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

const HEADER: [&str; 8] = [
    "order_id",
    "total_amount",
    "payment_method",
    "settlement_mode",
    "split_ratio",
    "subsidy_amount",
    "settlement_price",
    "quantity",
];

#[test]
fn test_malformed_csv_handling() {
    let output_path = std::path::PathBuf::from("robustness_test.csv");
    let mut wtr = csv::Writer::from_path(&output_path).unwrap();
    wtr.write_record(HEADER).unwrap();

    // Valid order
    wtr.write_record(["1001", "100000", "wechat", "normal_split", "0.8", "", "", ""])
        .unwrap();
    // Text in an amount field
    wtr.write_record(["1002", "not_a_number", "wechat", "normal_split", "", "", "", ""])
        .unwrap();
    // Valid order again
    wtr.write_record(["1003", "5000", "cash", "normal_split", "", "", "", ""])
        .unwrap();
    wtr.flush().unwrap();
    drop(wtr);

    let mut cmd = Command::new(cargo_bin!("mall-settlement"));
    cmd.arg(&output_path);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error reading order"))
        .stdout(predicate::str::contains(
            "1001,settled,normal_split,100000,600,99400,79520,19880,0.6",
        ))
        .stdout(predicate::str::contains(
            "1003,settled,normal_split,5000,0,5000,4000,1000,0",
        ))
        .stdout(predicate::str::contains("1002").not());

    std::fs::remove_file(output_path).ok();
}

#[test]
fn test_unknown_mode_and_method_skipped() {
    let output_path = std::path::PathBuf::from("unknown_mode_test.csv");
    let mut wtr = csv::Writer::from_path(&output_path).unwrap();
    wtr.write_record(HEADER).unwrap();

    // Unknown settlement mode
    wtr.write_record(["2001", "10000", "wechat", "barter", "", "", "", ""])
        .unwrap();
    // Unknown payment method
    wtr.write_record(["2002", "10000", "unknown_wallet", "normal_split", "", "", "", ""])
        .unwrap();
    // Valid order
    wtr.write_record(["2003", "10000", "wechat", "normal_split", "", "", "", ""])
        .unwrap();
    wtr.flush().unwrap();
    drop(wtr);

    let mut cmd = Command::new(cargo_bin!("mall-settlement"));
    cmd.arg(&output_path);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("unsupported settlement mode: barter"))
        .stderr(predicate::str::contains(
            "unsupported payment method: unknown_wallet",
        ))
        .stdout(predicate::str::contains("2003,settled,normal_split,10000,60,9940,7952,1988,0.6"))
        .stdout(predicate::str::contains("2001").not())
        .stdout(predicate::str::contains("2002").not());

    std::fs::remove_file(output_path).ok();
}
