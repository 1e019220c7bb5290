mod common;

use common::*;

#[test]
fn test_inspect_plain() {
    let dir = results_dir();

    let output = trustlog()
        .arg("inspect")
        .arg(dir.path().join("wsn.wsn1.cr.pyterm.log"))
        .output()
        .expect("Failed to run trustlog");
    assert!(output.status.success());

    insta::assert_snapshot!(String::from_utf8_lossy(&output.stdout), @r"
    2021-03-04 12:00:00.500 keystore 00124b0014d52bd6 success
    2021-03-04 12:00:01.000 trust-update f4ce36b29cb59ade cr
    2021-03-04 12:00:01.300 task fd00::1 monitoring len=10
    2021-03-04 12:00:02.600 reputation-receive fd00::2 success
    2021-03-04 12:00:03.000 reputation-send success
    ");
}

#[test]
fn test_inspect_json_lines() {
    let dir = results_dir();

    let output = trustlog()
        .args(["--format", "json", "inspect"])
        .arg(dir.path().join("wsn.wsn1.cr.pyterm.log"))
        .output()
        .expect("Failed to run trustlog");
    assert!(output.status.success());

    let lines: Vec<serde_json::Value> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line is JSON"))
        .collect();

    assert_eq!(lines.len(), 5);
    assert_eq!(lines[2]["event"]["event"], "task");
    assert_eq!(lines[2]["event"]["data"]["target"], "fd00::1");
    assert_eq!(lines[4]["event"]["data"], "success");
}

#[test]
fn test_inspect_missing_file() {
    let dir = results_dir();

    trustlog()
        .arg("inspect")
        .arg(dir.path().join("wsn.wsn5.cr.pyterm.log"))
        .assert()
        .failure()
        .stderr(predicates::str::contains("Failed to open"));
}
