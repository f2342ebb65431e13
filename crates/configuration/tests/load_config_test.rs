use configuration::{load_config_from, ConfigError};
use core_types::{ReturnBasis, WindowAnchor};
use rust_decimal_macros::dec;
use std::io::Write;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = load_config_from(&dir.path().join("absent.toml")).expect("defaults load");
    assert_eq!(config.allocation.top_n, 10);
    assert_eq!(config.metric_windows().len(), 3);
}

#[test]
fn file_sections_override_defaults() {
    let file = write_config(
        r#"
[data]
funds_file = "fixtures/funds.csv"
series_dir = "fixtures/series"

[[metrics.windows]]
label = "YTD"

[[metrics.windows]]
label = "1Y"
years = 1
basis = "total"

[allocation]
budget = 250000
top_n = 3
"#,
    );

    let config = load_config_from(file.path()).expect("config loads");
    assert_eq!(config.data.series_dir.to_str(), Some("fixtures/series"));
    assert_eq!(config.allocation.budget, dec!(250000));
    assert_eq!(config.allocation.top_n, 3);

    let windows = config.metric_windows();
    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0].anchor, WindowAnchor::YearStart);
    assert_eq!(windows[1].anchor, WindowAnchor::YearsBack(1));
    assert_eq!(windows[1].basis, ReturnBasis::Total);

    // Untouched sections keep their defaults.
    assert_eq!(config.comparison_windows().len(), 2);
}

#[test]
fn invalid_values_fail_validation() {
    let file = write_config(
        r#"
[allocation]
top_n = 0
"#,
    );

    let err = load_config_from(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError(_)));
}
