use crate::config::SIZE_INDICATOR_REGEX;
use proptest::prelude::*;
use std::io::Write;

use super::*;

#[test]
fn test_size_indicator_regex_matches_known_indicators() {
    let titles = vec![
        "XS ◾ Fix typo",
        "XS✔ ◾ Fix typo",
        "S⚠️ ◾ Add parser",
        "M ◾ Add parser",
        "L✔ ◾ Add parser",
        "XL⚠️ ◾ Add parser",
        "2XL ◾ Add parser",
        "13XL✔ ◾ Add parser",
    ];

    for title in titles {
        assert!(
            SIZE_INDICATOR_REGEX.is_match(title),
            "SIZE_INDICATOR_REGEX should match title '{}'",
            title
        );
    }
}

#[test]
fn test_size_indicator_regex_rejects_other_titles() {
    let titles = vec![
        "Fix typo",
        "XXL ◾ Add parser",    // Not a label this system produces
        "0XL ◾ Add parser",    // Leading zero
        "S✔◾ Add parser",      // Missing whitespace
        "feat: XS ◾ Add",      // Not a prefix
        "s ◾ lower case label", // Labels are upper case
    ];

    for title in titles {
        assert!(
            !SIZE_INDICATOR_REGEX.is_match(title),
            "SIZE_INDICATOR_REGEX should not match title '{}'",
            title
        );
    }
}

proptest! {
    #[test]
    fn test_size_indicator_regex_random_inputs(input in ".*") {
        let _ = SIZE_INDICATOR_REGEX.is_match(&input);
    }
}

#[test]
fn test_metrics_config_default() {
    let config = MetricsConfig::default();

    assert_eq!(config.base_size, 200.0);
    assert_eq!(config.growth_rate, 2.0);
    assert_eq!(config.test_factor, Some(1.0));
    assert_eq!(config.file_matching_patterns, vec!["**/*".to_string()]);
    assert!(config.code_file_extensions.contains("rs"));
    assert!(config.code_file_extensions.contains("ts"));
    assert!(!config.code_file_extensions.contains("md"));
}

#[test]
fn test_pr_metrics_config_default_matches_runtime_default() {
    let config = PrMetricsConfig::default();

    assert_eq!(config.schema_version, 1);
    assert_eq!(config.to_metrics_config(), MetricsConfig::default());
}

#[test]
fn test_to_metrics_config_keeps_valid_values() {
    let config = PrMetricsConfig {
        schema_version: 1,
        metrics: MetricsSettings {
            base_size: 100.0,
            growth_rate: 1.5,
            test_factor: Some(0.5),
            file_matching_patterns: vec!["**/*".to_string(), "!**/*.md".to_string()],
            code_file_extensions: vec!["rs".to_string()],
        },
    };

    let metrics = config.to_metrics_config();

    assert_eq!(metrics.base_size, 100.0);
    assert_eq!(metrics.growth_rate, 1.5);
    assert_eq!(metrics.test_factor, Some(0.5));
    assert_eq!(metrics.file_matching_patterns.len(), 2);
    assert_eq!(metrics.code_file_extensions.len(), 1);
}

#[test]
fn test_to_metrics_config_falls_back_for_invalid_base_size() {
    for base_size in [0.0, -5.0, f64::NAN, f64::INFINITY] {
        let mut config = PrMetricsConfig::default();
        config.metrics.base_size = base_size;

        assert_eq!(config.to_metrics_config().base_size, DEFAULT_BASE_SIZE);
    }
}

#[test]
fn test_to_metrics_config_falls_back_for_invalid_growth_rate() {
    for growth_rate in [1.0, 0.5, -2.0, f64::NAN] {
        let mut config = PrMetricsConfig::default();
        config.metrics.growth_rate = growth_rate;

        assert_eq!(config.to_metrics_config().growth_rate, DEFAULT_GROWTH_RATE);
    }
}

#[test]
fn test_to_metrics_config_zero_test_factor_disables_check() {
    let mut config = PrMetricsConfig::default();
    config.metrics.test_factor = Some(0.0);

    assert_eq!(config.to_metrics_config().test_factor, None);
}

#[test]
fn test_to_metrics_config_missing_test_factor_disables_check() {
    let mut config = PrMetricsConfig::default();
    config.metrics.test_factor = None;

    assert_eq!(config.to_metrics_config().test_factor, None);
}

#[test]
fn test_to_metrics_config_negative_test_factor_uses_default() {
    let mut config = PrMetricsConfig::default();
    config.metrics.test_factor = Some(-1.0);

    assert_eq!(
        config.to_metrics_config().test_factor,
        Some(DEFAULT_TEST_FACTOR)
    );
}

#[test]
fn test_to_metrics_config_empty_patterns_use_default() {
    let mut config = PrMetricsConfig::default();
    config.metrics.file_matching_patterns = vec!["  ".to_string()];

    assert_eq!(
        config.to_metrics_config().file_matching_patterns,
        vec!["**/*".to_string()]
    );
}

#[test]
fn test_to_metrics_config_normalizes_extensions() {
    let mut config = PrMetricsConfig::default();
    config.metrics.code_file_extensions = vec![
        "*.TS".to_string(),
        ".Rs".to_string(),
        "py".to_string(),
        "".to_string(),
    ];

    let extensions = config.to_metrics_config().code_file_extensions;

    assert_eq!(
        extensions.into_iter().collect::<Vec<_>>(),
        vec!["py".to_string(), "rs".to_string(), "ts".to_string()]
    );
}

#[test]
fn test_normalize_extension() {
    assert_eq!(normalize_extension("*.cs"), Some("cs".to_string()));
    assert_eq!(normalize_extension(".CS"), Some("cs".to_string()));
    assert_eq!(normalize_extension(" cs "), Some("cs".to_string()));
    assert_eq!(normalize_extension("*."), None);
    assert_eq!(normalize_extension(""), None);
}

#[test]
fn test_load_pr_metrics_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    writeln!(
        file,
        r#"
schemaVersion = 1

[metrics]
base_size = 50
growth_rate = 3.0
test_factor = 0.0
file_matching_patterns = ["**/*", "!**/generated/**"]
code_file_extensions = ["rs"]
"#
    )
    .expect("Failed to write config");

    let config = load_pr_metrics_config(file.path()).expect("Failed to load config");

    assert_eq!(config.metrics.base_size, 50.0);
    assert_eq!(config.metrics.growth_rate, 3.0);
    assert_eq!(config.metrics.test_factor, Some(0.0));
    assert_eq!(config.metrics.file_matching_patterns.len(), 2);

    let metrics = config.to_metrics_config();
    assert_eq!(metrics.test_factor, None);
}

#[test]
fn test_load_pr_metrics_config_uses_defaults_for_missing_fields() {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "schemaVersion = 1").expect("Failed to write config");

    let config = load_pr_metrics_config(file.path()).expect("Failed to load config");

    assert_eq!(config, PrMetricsConfig::default());
}

#[test]
fn test_load_pr_metrics_config_missing_file() {
    let result = load_pr_metrics_config("/definitely/not/here/.pr-metrics.toml");

    assert!(matches!(result, Err(ConfigLoadError::NotFound(_))));
}

#[test]
fn test_load_pr_metrics_config_unsupported_schema() {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "schemaVersion = 2").expect("Failed to write config");

    let result = load_pr_metrics_config(file.path());

    assert!(matches!(
        result,
        Err(ConfigLoadError::UnsupportedSchemaVersion(2))
    ));
}

#[test]
fn test_load_pr_metrics_config_malformed() {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "schemaVersion = \"one\"").expect("Failed to write config");

    let result = load_pr_metrics_config(file.path());

    assert!(matches!(result, Err(ConfigLoadError::Parse(_))));
}
