use std::fs;

use konwert::{
    convert_file, from_str, from_xml_str, ConversionRequest, ConvertOptions, ErrorKind, Format,
};
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn workspace() -> Result<TempDir, std::io::Error> {
    tempfile::tempdir()
}

#[test]
fn test_json_file_to_xml_file() -> TestResult {
    let dir = workspace()?;
    let input = dir.path().join("data.json");
    let output = dir.path().join("data.xml");
    fs::write(&input, r#"{"a": 1, "b": [2, 3]}"#)?;

    let report = convert_file(&ConversionRequest::new(&input, &output))?;
    assert_eq!(report.from, Format::Json);
    assert_eq!(report.to, Format::Xml);

    let written = fs::read_to_string(&output)?;
    assert_eq!(report.bytes_written, written.len());
    let root = from_xml_str(&written)?;
    assert_eq!(root.name, "root");
    assert_eq!(root.child("a").and_then(|a| a.text.as_deref()), Some("1"));
    Ok(())
}

#[test]
fn test_uppercase_extensions_are_detected() -> TestResult {
    let dir = workspace()?;
    let input = dir.path().join("DATA.YML");
    let output = dir.path().join("DATA.JSON");
    fs::write(&input, "k: v\n")?;

    convert_file(&ConversionRequest::new(&input, &output))?;
    assert_eq!(from_str(&fs::read_to_string(&output)?)?, from_str(r#"{"k":"v"}"#)?);
    Ok(())
}

#[test]
fn test_malformed_json_writes_nothing() -> TestResult {
    let dir = workspace()?;
    let input = dir.path().join("bad.json");
    let output = dir.path().join("out.xml");
    fs::write(&input, r#"{"a": }"#)?;

    let err = convert_file(&ConversionRequest::new(&input, &output)).err();
    assert_eq!(
        err.as_ref().map(|e| e.kind()),
        Some(&ErrorKind::Parse {
            format: Format::Json
        })
    );
    assert!(!output.exists());
    assert_eq!(fs::read_dir(dir.path())?.count(), 1);
    Ok(())
}

#[test]
fn test_failed_conversion_keeps_previous_output() -> TestResult {
    let dir = workspace()?;
    let input = dir.path().join("in.json");
    let output = dir.path().join("out.xml");
    fs::write(&input, r#"{"bad key": 1}"#)?;
    fs::write(&output, "<previous/>")?;

    let err = convert_file(&ConversionRequest::new(&input, &output)).err();
    assert!(matches!(
        err.as_ref().map(|e| e.kind()),
        Some(ErrorKind::InvalidTagName { .. })
    ));
    assert_eq!(fs::read_to_string(&output)?, "<previous/>");
    Ok(())
}

#[test]
fn test_missing_input_is_not_found() -> TestResult {
    let dir = workspace()?;
    let input = dir.path().join("missing.yaml");
    let output = dir.path().join("out.json");

    let err = convert_file(&ConversionRequest::new(&input, &output)).err();
    assert!(matches!(
        err.as_ref().map(|e| e.kind()),
        Some(ErrorKind::NotFound { path }) if *path == input
    ));
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_unsupported_extensions_fail_before_reading() -> TestResult {
    let dir = workspace()?;
    let output = dir.path().join("out.json");

    // the input does not exist: detection must fail first
    let err = convert_file(&ConversionRequest::new(dir.path().join("in.txt"), &output)).err();
    assert!(matches!(
        err.as_ref().map(|e| e.kind()),
        Some(ErrorKind::UnsupportedFormat { .. })
    ));

    let input = dir.path().join("in.json");
    fs::write(&input, "{}")?;
    let err = convert_file(&ConversionRequest::new(&input, dir.path().join("out.csv"))).err();
    assert!(matches!(
        err.as_ref().map(|e| e.kind()),
        Some(ErrorKind::UnsupportedFormat { extension }) if extension == "csv"
    ));
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_missing_output_directory_is_write_error() -> TestResult {
    let dir = workspace()?;
    let input = dir.path().join("in.json");
    fs::write(&input, "[1, 2]")?;

    let output = dir.path().join("nope").join("out.yaml");
    let err = convert_file(&ConversionRequest::new(&input, &output)).err();
    assert_eq!(err.as_ref().map(|e| e.kind()), Some(&ErrorKind::Write));
    Ok(())
}

#[test]
fn test_request_options_are_applied() -> TestResult {
    let dir = workspace()?;
    let input = dir.path().join("in.yaml");
    let output = dir.path().join("out.json");
    fs::write(&input, "a: 1\n")?;

    let mut options = ConvertOptions::default();
    options.json.indent = 2;
    convert_file(&ConversionRequest::new(&input, &output).with_options(options))?;
    assert_eq!(fs::read_to_string(&output)?, "{\n  \"a\": 1\n}\n");
    Ok(())
}
