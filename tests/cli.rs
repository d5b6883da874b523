use assert_cmd::prelude::*;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tempfile::tempdir;

fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join(name)
}

fn rotorcrypt() -> Command {
    Command::cargo_bin("rotorcrypt").expect("binary is built")
}

#[test]
fn converts_input_file_to_stdout() -> Result<(), Box<dyn std::error::Error>> {
    let output = rotorcrypt()
        .arg(testdata("naval.conf"))
        .arg(testdata("hiawatha.in"))
        .output()?;

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout)?,
        "QVPQS OKOIL PUBKJ ZPISF XDW\n"
    );
    Ok(())
}

#[test]
fn writes_output_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let out_path = temp.path().join("out.txt");

    let status = rotorcrypt()
        .arg(testdata("naval.conf"))
        .arg(testdata("hiawatha.in"))
        .arg(&out_path)
        .status()?;

    assert!(status.success());
    assert_eq!(fs::read_to_string(&out_path)?, "QVPQS OKOIL PUBKJ ZPISF XDW\n");
    Ok(())
}

#[test]
fn reads_standard_input() -> Result<(), Box<dyn std::error::Error>> {
    let mut child = rotorcrypt()
        .arg(testdata("naval.conf"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()?;
    child
        .stdin
        .take()
        .ok_or("stdin not captured")?
        .write_all(b"* B Beta I II III AAAA\nHELLO WORLD\n\nHELLO WORLD\n")?;
    let output = child.wait_with_output()?;

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout)?,
        "ILBDA AMTAZ\n\nXTEYN TZOMG\n"
    );
    Ok(())
}

#[test]
fn bad_configuration_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config = temp.path().join("bad.conf");
    fs::write(&config, "ABCD 2 1\nR R (AB) (CD)\nM MA (AZ)\n")?;

    let output = rotorcrypt()
        .arg(&config)
        .arg(testdata("hiawatha.in"))
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("Error:"), "stderr was: {}", stderr);
    assert!(stderr.contains("configuration error"), "stderr was: {}", stderr);
    Ok(())
}

#[test]
fn lowercase_message_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let input = temp.path().join("lower.in");
    fs::write(&input, "* B Beta I II III AAAA\nhello world\n")?;

    let output = rotorcrypt()
        .arg(testdata("naval.conf"))
        .arg(&input)
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("Error: encoding error"), "stderr was: {}", stderr);
    Ok(())
}

#[test]
fn missing_input_file_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let output = rotorcrypt()
        .arg(testdata("naval.conf"))
        .arg(temp.path().join("absent.in"))
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8(output.stderr)?.contains("could not open"));
    Ok(())
}

#[test]
fn wrong_argument_count_fails() -> Result<(), Box<dyn std::error::Error>> {
    let none = rotorcrypt().output()?;
    assert_eq!(none.status.code(), Some(1));

    let too_many = rotorcrypt()
        .args(["a.conf", "b.in", "c.out", "d.extra"])
        .output()?;
    assert_eq!(too_many.status.code(), Some(1));
    Ok(())
}

#[test]
fn help_exits_zero() -> Result<(), Box<dyn std::error::Error>> {
    let output = rotorcrypt().arg("--help").output()?;
    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout)?.contains("CONFIG"));
    Ok(())
}
