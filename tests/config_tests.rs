use impala2trino::{ArgumentCapture, ConversionConfig, ConversionError, SqlConverter};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_config_file() {
    let file = config_file(
        r#"
argument_capture = "balanced"

[[post_processing.identifier_renames]]
pattern = "\\bgb_to_est\\b"
replacement = "reporting.to_est"
"#,
    );

    let config = ConversionConfig::from_file(file.path()).unwrap();
    assert_eq!(config.argument_capture, ArgumentCapture::Balanced);

    let output = SqlConverter::new(config)
        .convert("SELECT default.gb_to_est(ifnull(ts, created), 'EDT') FROM t")
        .unwrap();
    assert_eq!(
        output.sql,
        "SELECT reporting.to_est(COALESCE(ts, created), 'EST5EDT') FROM t"
    );
}

#[test]
fn test_missing_config_file() {
    let err = ConversionConfig::from_file("/nonexistent/impala2trino.toml").unwrap_err();
    assert!(matches!(err, ConversionError::Config { .. }));
}

#[test]
fn test_invalid_rename_pattern_is_fatal() {
    let file = config_file(
        r#"
[[post_processing.identifier_renames]]
pattern = "(unclosed"
replacement = "x"
"#,
    );

    let converter = SqlConverter::new(ConversionConfig::from_file(file.path()).unwrap());
    let err = converter.convert("SELECT ifnull(a, 0)").unwrap_err();

    match err {
        ConversionError::Failed {
            warnings, stats, ..
        } => {
            assert_eq!(stats.total_conversions, 1);
            assert_eq!(stats.errors, 1);
            assert_eq!(warnings.len(), 1);
            assert!(warnings[0].starts_with("Failed to convert SQL: Invalid pattern '(unclosed'"));
        }
        other => panic!("expected a pipeline failure, got {:?}", other),
    }
}
