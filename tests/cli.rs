//! End-to-end CLI tests
//!
//! Runs the `invoicedb` binary and checks that stdout carries exactly one
//! JSON response per command while log events go to stderr.

use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn invoicedb(args: &[&str], stdin: Option<&str>) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_invoicedb"))
        .args(args)
        .env("INVOICEDB_LOG_LEVEL", "TRACE")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn invoicedb");

    {
        let mut pipe = child.stdin.take().unwrap();
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes()).unwrap();
        }
    }

    child.wait_with_output().unwrap()
}

/// Runs a command that must succeed and returns its `data` payload.
fn run_ok(args: &[&str], stdin: Option<&str>) -> Value {
    let output = invoicedb(args, stdin);
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(
        output.status.success(),
        "{:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );

    let response: Value = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("stdout is not one JSON value ({e}): {stdout:?}"));
    assert_eq!(response["status"], "ok");
    response["data"].clone()
}

fn init(dir: &TempDir) -> PathBuf {
    let config = dir.path().join("invoicedb.json");
    let db = dir.path().join("invoices.db");
    run_ok(
        &[
            "init",
            "--config",
            path_str(&config),
            "--db-file",
            path_str(&db),
            "--wait-ms",
            "50",
            "--unit-sleep-ms",
            "5",
        ],
        None,
    );
    config
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

const INVOICE: &str = r#"{
    "name": "FV 1/06/2019",
    "buyer": {"name": "Buyer", "address": "Dluga 5", "city": "Gdansk",
              "zipCode": "80-001", "nip": "5840001234",
              "bankAccountNumber": "11111111111111111111111111"},
    "seller": {"name": "Seller", "address": "Prosta 1", "city": "Warszawa",
               "zipCode": "00-001", "nip": "5260250274",
               "bankAccountNumber": "22222222222222222222222222"},
    "issueDate": "2019-06-15",
    "paymentDate": "2019-07-15",
    "products": [{"product": {"name": "Desk", "netPrice": 10000, "vatRate": 23},
                  "amount": 2}],
    "paymentState": "NOT_PAID"
}"#;

// =============================================================================
// Raw line commands
// =============================================================================

#[test]
fn test_store_commands_print_single_json_response() {
    let dir = TempDir::new().unwrap();
    let config = init(&dir);
    let c = path_str(&config);

    assert_eq!(run_ok(&["list", "--config", c], None)["lines"], serde_json::json!([]));

    run_ok(&["append", "--config", c, "K1|foo"], None);
    run_ok(&["append", "--config", c, "K2|bar"], None);
    assert_eq!(run_ok(&["get", "--config", c, "K1"], None)["line"], "K1|foo");
    assert_eq!(run_ok(&["delete", "--config", c, "K1"], None)["removed"], 1);
    assert_eq!(
        run_ok(&["list", "--config", c], None)["lines"],
        serde_json::json!(["K2|bar"])
    );
}

#[test]
fn test_log_events_go_to_stderr() {
    let dir = TempDir::new().unwrap();
    let config = init(&dir);

    let output = invoicedb(&["list", "--config", path_str(&config)], None);
    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();

    assert!(!stdout.contains("STORE_OPENED"));
    assert!(stderr.contains("STORE_OPENED"));
    for line in stderr.lines() {
        let event: Value = serde_json::from_str(line).unwrap();
        assert!(event["event"].is_string());
    }
}

#[test]
fn test_failure_exits_nonzero_with_empty_stdout() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.json");

    let output = invoicedb(&["list", "--config", path_str(&missing)], None);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("INVOICEDB_CLI_CONFIG_ERROR"));
}

// =============================================================================
// Invoice commands
// =============================================================================

#[test]
fn test_invoice_round_trip() {
    let dir = TempDir::new().unwrap();
    let config = init(&dir);
    let c = path_str(&config);

    let added = run_ok(&["invoice", "add", "--config", c], Some(INVOICE));
    assert_eq!(added["invoiceId"], 1);
    assert_eq!(added["name"], "FV 1/06/2019");

    let found = run_ok(&["invoice", "get", "--config", c, "1"], None);
    assert_eq!(found, added);

    let all = run_ok(&["invoice", "list", "--config", c], None);
    assert_eq!(all.as_array().map(Vec::len), Some(1));

    assert_eq!(run_ok(&["invoice", "remove", "--config", c, "1"], None)["removed"], 1);
    assert_eq!(run_ok(&["invoice", "list", "--config", c], None), serde_json::json!([]));

    let output = invoicedb(&["invoice", "get", "--config", c, "1"], None);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("INVOICEDB_INVOICE_NOT_FOUND"));
}

#[test]
fn test_invoice_add_rejects_invalid_input() {
    let dir = TempDir::new().unwrap();
    let config = init(&dir);
    let c = path_str(&config);

    // Payment due before the invoice was issued
    let invalid = INVOICE.replace("2019-07-15", "2019-06-01");

    let output = invoicedb(&["invoice", "add", "--config", c], Some(&invalid));
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("INVOICEDB_INVOICE_INVALID"));
    assert_eq!(run_ok(&["invoice", "list", "--config", c], None), serde_json::json!([]));
}
