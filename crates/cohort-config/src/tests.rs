//! Tests for run configuration.

use super::*;

#[test]
fn test_defaults() {
    let config = CohortConfig::default();
    assert_eq!(config.min_group_size, 5);
    assert_eq!(config.time_limit_seconds, 30.0);
    assert!(!config.save_model);
    assert_eq!(config.input.id_column, "Mouse ID");
    assert_eq!(config.input.tumor_size_column, "Tumor size");
    assert_eq!(config.output.workbook_file_name, "mouse_grouping.xlsx");
    assert_eq!(config.output.model_file_name, "mouse_grouping.lp");
    config.validate().unwrap();
}

#[test]
fn test_toml_parsing() {
    let toml = r#"
        min_group_size = 8
        time_limit_seconds = 120.5
        save_model = true

        [input]
        id_column = "Animal"
        tumor_size_column = "Volume"

        [output]
        workbook_file_name = "groups.xlsx"
        model_file_name = "groups.lp"
    "#;

    let config = CohortConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.min_group_size, 8);
    assert_eq!(config.time_limit_seconds, 120.5);
    assert!(config.save_model);
    assert_eq!(config.input.id_column, "Animal");
    assert_eq!(config.output.workbook_file_name, "groups.xlsx");
    config.validate().unwrap();
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let config = CohortConfig::from_toml_str("min_group_size = 3").unwrap();
    assert_eq!(config.min_group_size, 3);
    assert_eq!(config.time_limit_seconds, 30.0);
    assert_eq!(config.input, InputColumns::default());
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        min_group_size: 4
        time_limit_seconds: 15
        input:
          id_column: Animal
          tumor_size_column: Volume
    "#;

    let config = CohortConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.min_group_size, 4);
    assert_eq!(config.time_limit_seconds, 15.0);
    assert_eq!(config.input.id_column, "Animal");
}

#[test]
fn test_builder() {
    let config = CohortConfig::new()
        .with_min_group_size(7)
        .with_time_limit_seconds(5.0)
        .with_save_model(true);
    assert_eq!(config.min_group_size, 7);
    assert_eq!(config.time_limit(), Duration::from_secs(5));
    assert!(config.save_model);
}

#[test]
fn test_missing_file_is_an_error() {
    assert!(CohortConfig::load("definitely-not-here.toml").is_err());
}

#[test]
fn test_validate_rejects_zero_group_size() {
    let config = CohortConfig::new().with_min_group_size(0);
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_validate_rejects_bad_time_limits() {
    for seconds in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let config = CohortConfig::new().with_time_limit_seconds(seconds);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}

#[test]
fn test_validate_rejects_colliding_columns() {
    let mut config = CohortConfig::new();
    config.input.tumor_size_column = config.input.id_column.clone();
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_validate_rejects_non_lp_model_name() {
    let mut config = CohortConfig::new();
    config.output.model_file_name = "model.mps".to_owned();
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}
