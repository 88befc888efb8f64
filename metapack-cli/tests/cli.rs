use predicates::prelude::*;
use serde_json::{json, Value};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

struct Sample {
    dir: TempDir,
    input: PathBuf,
    schema: PathBuf,
}

fn build_sample() -> Result<Sample, Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("profile.json");
    let schema = dir.path().join("profile.schema.json");

    fs::write(
        &schema,
        r#"{"userId": "UINT32", "nickName": "STRING", "isVip": "BOOL", "age": "UINT8", "tags": ["STRING"]}"#,
    )?;
    fs::write(
        &input,
        r#"{"age": 34, "isVip": true, "nickName": "ABC", "userId": 101, "tags": ["a", "b"]}"#,
    )?;

    Ok(Sample { dir, input, schema })
}

fn metapack() -> Result<assert_cmd::Command, Box<dyn Error>> {
    Ok(assert_cmd::Command::cargo_bin("metapack")?)
}

#[test]
fn pack_then_unpack_roundtrips() -> Result<(), Box<dyn Error>> {
    let sample = build_sample()?;
    let packed = sample.dir.path().join("profile.bin");

    metapack()?
        .args(["pack", sample.input.to_str().unwrap(), "-s"])
        .arg(&sample.schema)
        .arg("-o")
        .arg(&packed)
        .assert()
        .success()
        .stderr(predicate::str::contains("Packed to"));

    // 4 + 4+3 + 1 + 1 + 4 + (4+1) * 2, plus the footer
    assert_eq!(fs::metadata(&packed)?.len(), 27 + 2);

    let output = metapack()?
        .arg("unpack")
        .arg(&packed)
        .arg("--schema")
        .arg(&sample.schema)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;
    assert_eq!(
        value,
        json!({"userId": 101, "nickName": "ABC", "isVip": true, "age": 34, "tags": ["a", "b"]})
    );
    Ok(())
}

#[test]
fn mismatched_flags_fail_checksum() -> Result<(), Box<dyn Error>> {
    let sample = build_sample()?;
    let packed = sample.dir.path().join("profile.bin");

    metapack()?
        .arg("pack")
        .arg(&sample.input)
        .arg("--schema")
        .arg(&sample.schema)
        .arg("-o")
        .arg(&packed)
        .args(["--secret", "7"])
        .assert()
        .success();

    metapack()?
        .arg("unpack")
        .arg(&packed)
        .arg("--schema")
        .arg(&sample.schema)
        .args(["--secret", "8"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Data mismatch!"));
    Ok(())
}

#[test]
fn config_file_sets_options() -> Result<(), Box<dyn Error>> {
    let sample = build_sample()?;
    let config = sample.dir.path().join("metapack.toml");
    fs::write(&config, "use_checksum = false\nuse_encrypt = false\n")?;
    let packed = sample.dir.path().join("plain.bin");

    metapack()?
        .arg("pack")
        .arg(&sample.input)
        .arg("--schema")
        .arg(&sample.schema)
        .arg("-o")
        .arg(&packed)
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    let bytes = fs::read(&packed)?;
    assert_eq!(bytes.len(), 27);
    // userId 101, unobfuscated
    assert_eq!(&bytes[..4], &[0, 0, 0, 101]);
    Ok(())
}

#[test]
fn pack_reports_missing_field() -> Result<(), Box<dyn Error>> {
    let sample = build_sample()?;
    fs::write(&sample.input, r#"{"userId": 1}"#)?;

    metapack()?
        .arg("pack")
        .arg(&sample.input)
        .arg("--schema")
        .arg(&sample.schema)
        .arg("-o")
        .arg(sample.dir.path().join("out.bin"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing field: nickName"));
    Ok(())
}

#[test]
fn null_schema_is_rejected() -> Result<(), Box<dyn Error>> {
    let sample = build_sample()?;
    fs::write(&sample.schema, "null")?;

    metapack()?
        .arg("inspect")
        .arg(&sample.schema)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid schema!"));
    Ok(())
}

#[test]
fn size_json_report() -> Result<(), Box<dyn Error>> {
    let sample = build_sample()?;
    let output = metapack()?
        .arg("size")
        .arg(&sample.input)
        .arg("--schema")
        .arg(&sample.schema)
        .args(["--format", "json", "--no-checksum"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let report: Value = serde_json::from_slice(&output)?;
    assert_eq!(report["metapack_bytes"], 27);
    assert!(report["json_bytes"].as_u64().unwrap() > 27);
    Ok(())
}

#[test]
fn inspect_lists_fields_in_order() -> Result<(), Box<dyn Error>> {
    let sample = build_sample()?;
    let output = metapack()?
        .arg("inspect")
        .arg(&sample.schema)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output)?;
    let user_id = stdout.find("userId").unwrap();
    let nick = stdout.find("nickName").unwrap();
    let tags = stdout.find("tags").unwrap();
    assert!(user_id < nick && nick < tags);
    assert!(stdout.contains("4+N"));
    assert!(stdout.contains("minimum encoded size: 14 bytes"));
    Ok(())
}
