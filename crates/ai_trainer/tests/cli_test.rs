//! Tests of the `dyslexia-predict` binary: stdout carries exactly one JSON document

use anyhow::Result;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(args: &[&str]) -> Result<Output> {
    Ok(Command::new(env!("CARGO_BIN_EXE_dyslexia-predict"))
        .args(args)
        .output()?)
}

fn stdout_json(output: &Output) -> Result<serde_json::Value> {
    let stdout = String::from_utf8(output.stdout.clone())?;
    assert_eq!(stdout.lines().count(), 1, "stdout: {}", stdout);
    Ok(serde_json::from_str(stdout.trim_end())?)
}

fn write_fixtures(dir: &Path) -> Result<()> {
    let mut training = String::from("age,score,dyslexia\n");
    for i in 0..40 {
        let high = i % 2 == 0;
        training.push_str(&format!(
            "{},{},{}\n",
            6 + i % 9,
            if high { "high" } else { "low" },
            u8::from(high)
        ));
    }
    std::fs::write(dir.join("training.csv"), training)?;
    std::fs::write(dir.join("prediction.csv"), "age,score\n7,high\n9,high\n10,low\n")?;
    Ok(())
}

#[test]
fn test_missing_arguments() -> Result<()> {
    let output = run(&[])?;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        String::from_utf8(output.stdout)?,
        "{\"error\": \"Both training and prediction data must be provided\"}\n"
    );

    let output = run(&["training.csv"])?;
    assert_eq!(output.status.code(), Some(1));

    let output = run(&["", "prediction.csv"])?;
    assert_eq!(output.status.code(), Some(1));
    Ok(())
}

#[test]
fn test_successful_run() -> Result<()> {
    let dir = TempDir::new()?;
    write_fixtures(dir.path())?;
    let training = dir.path().join("training.csv");
    let prediction = dir.path().join("prediction.csv");

    let output = run(&[
        training.to_str().unwrap(),
        prediction.to_str().unwrap(),
    ])?;
    assert_eq!(output.status.code(), Some(0));

    let json = stdout_json(&output)?;
    assert_eq!(json["accuracy"], 1.0);
    assert_eq!(json["prediction"], "Dyslexia Likely");
    assert_eq!(json.as_object().map(|o| o.len()), Some(2));
    Ok(())
}

#[test]
fn test_pipeline_error_exits_zero() -> Result<()> {
    let dir = TempDir::new()?;
    write_fixtures(dir.path())?;
    let training = dir.path().join("training.csv");
    let absent = dir.path().join("absent.csv");

    let output = run(&[training.to_str().unwrap(), absent.to_str().unwrap()])?;
    assert_eq!(output.status.code(), Some(0));

    let json = stdout_json(&output)?;
    let error = json["error"].as_str().unwrap_or_default();
    assert!(error.starts_with("file not found: "), "error: {}", error);
    Ok(())
}

#[test]
fn test_label_flag() -> Result<()> {
    let dir = TempDir::new()?;
    write_fixtures(dir.path())?;
    let training = dir.path().join("training.csv");
    let prediction = dir.path().join("prediction.csv");

    // "dyslexia" becomes a feature the prediction data lacks
    let output = run(&[
        training.to_str().unwrap(),
        prediction.to_str().unwrap(),
        "--label",
        "at_risk",
    ])?;
    assert_eq!(output.status.code(), Some(0));

    let json = stdout_json(&output)?;
    assert!(json["error"]
        .as_str()
        .unwrap_or_default()
        .starts_with("schema mismatch: "));
    Ok(())
}

#[test]
fn test_extra_arguments_are_ignored() -> Result<()> {
    let dir = TempDir::new()?;
    write_fixtures(dir.path())?;
    let training = dir.path().join("training.csv");
    let prediction = dir.path().join("prediction.csv");

    let output = run(&[
        training.to_str().unwrap(),
        prediction.to_str().unwrap(),
        "unused",
        "also-unused",
    ])?;
    assert_eq!(output.status.code(), Some(0));

    let json = stdout_json(&output)?;
    assert_eq!(json["prediction"], "Dyslexia Likely");
    Ok(())
}
