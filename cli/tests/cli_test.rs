use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::error::Error;
use std::process::Command;

fn bench_cmd() -> Result<Command, Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("upcase-bench")?;
    cmd.env_remove("UPCASE_TRACE");
    Ok(cmd)
}

#[test]
fn runs_three_variants_in_order() -> Result<(), Box<dyn Error>> {
    let output = bench_cmd()?.args(["100", "50"]).output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3, "unexpected output: {stdout}");
    for (line, label) in lines.iter().zip(["naive", "branchless", "c std"]) {
        let prefix = format!("function: {label} | ");
        assert!(line.starts_with(&prefix), "line {line:?} should start with {prefix:?}");
        assert!(
            line.ends_with(" microseconds") || line.ends_with("wrong output"),
            "line {line:?} has no result"
        );
    }
    Ok(())
}

#[test]
fn timing_has_three_decimals() -> Result<(), Box<dyn Error>> {
    bench_cmd()?
        .args(["--seed", "1", "5", "16"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^function: naive \| time: \d+\.\d{3} microseconds\n")?);
    Ok(())
}

#[test]
fn rejects_non_numeric_rounds() -> Result<(), Box<dyn Error>> {
    bench_cmd()?
        .args(["abc", "10"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: N must be a non-zero positive integer."))
        .stdout(predicate::str::contains("Usage: ").and(predicate::str::contains("N L")))
        .stdout(predicate::str::contains("Example: "))
        .stdout(predicate::str::contains("function:").not());
    Ok(())
}

#[test]
fn rejects_negative_rounds_as_zero() -> Result<(), Box<dyn Error>> {
    bench_cmd()?
        .args(["-3", "10"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: N must be a non-zero positive integer."))
        .stderr(predicate::str::contains("Invalid invocation.").not())
        .stdout(predicate::str::contains("Usage: "));
    Ok(())
}

#[test]
fn help_still_works() -> Result<(), Box<dyn Error>> {
    bench_cmd()?
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("--strict"));
    Ok(())
}

#[test]
fn rejects_zero_length() -> Result<(), Box<dyn Error>> {
    bench_cmd()?
        .args(["10", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: L must be a non-zero positive integer."))
        .stdout(predicate::str::contains("L = length of test string"));
    Ok(())
}

#[test]
fn rejects_wrong_argument_count() -> Result<(), Box<dyn Error>> {
    bench_cmd()?
        .arg("10")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid invocation."))
        .stdout(predicate::str::contains("Usage: "));

    bench_cmd()?
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid invocation."));
    Ok(())
}

#[test]
fn json_format_reports_every_variant() -> Result<(), Box<dyn Error>> {
    let output = bench_cmd()?.args(["--format", "json", "--seed", "7", "4", "32"]).output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(!stdout.contains("function: "));
    assert!(stdout.contains("\"seed\": 7"));
    assert!(stdout.contains("\"rounds\": 4"));
    assert!(stdout.contains("\"length\": 32"));
    for label in ["naive", "branchless", "c std"] {
        assert!(stdout.contains(&format!("\"function\": \"{label}\"")));
    }
    Ok(())
}

#[test]
fn only_restricts_variants() -> Result<(), Box<dyn Error>> {
    let output = bench_cmd()?.args(["--only", "branchless", "3", "8"]).output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.starts_with("function: branchless | "));
    Ok(())
}

#[test]
fn strict_succeeds_when_all_variants_match() -> Result<(), Box<dyn Error>> {
    bench_cmd()?.args(["--strict", "10", "100"]).assert().success();
    Ok(())
}

#[test]
fn trace_logs_go_to_stderr() -> Result<(), Box<dyn Error>> {
    let output = Command::cargo_bin("upcase-bench")?
        .env("UPCASE_TRACE", "upcase::bench=debug")
        .args(["--seed", "3", "2", "8"])
        .output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(stdout.lines().count(), 3);
    assert!(String::from_utf8(output.stderr)?.contains("benchmark start"));
    Ok(())
}
