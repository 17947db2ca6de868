// Configuration loading tests

use std::io::Write;
use tempfile::NamedTempFile;

use guardmark::config::{Config, LogFormat, PageScope};
use guardmark::watermark::{LayerKind, Pattern, PositionAnchor, ProtectionMode, Rgb};

fn write_yaml(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(yaml.as_bytes())
        .expect("Failed to write temp file");
    file
}

#[test]
fn test_can_load_full_config_from_file() {
    let file = write_yaml(
        r##"
watermark:
  text: "DRAFT"
  font_size: 36
  opacity: 0.25
  rotation: -30
  color: "#0a0"
  position: bottom-right
  spacing: 120
  pattern: anti-removal
  random_seed: "batch-7"
  protection_mode: custom
  layers:
    randomized_grid: { enabled: true, count: 3 }
    zonal: { enabled: true }
pages:
  scope: odd-only
  margin: 36
preview:
  scale: 2.0
  background: "#f0f0f0"
logging:
  level: debug
  format: json
"##,
    );

    let config = Config::from_file(file.path()).expect("Failed to load config");
    assert!(config.validate().is_ok());

    let wm = &config.watermark;
    assert_eq!(wm.text, "DRAFT");
    assert_eq!(wm.font_size, 36.0);
    assert_eq!(wm.rotation, -30.0);
    assert_eq!(wm.color, Rgb::from_bytes([0x00, 0xaa, 0x00]));
    assert_eq!(wm.position, PositionAnchor::BottomRight);
    assert_eq!(wm.pattern, Pattern::AntiRemoval);
    assert_eq!(wm.effective_seed(), "batch-7");
    assert_eq!(wm.protection_mode, ProtectionMode::Custom);

    let layers = wm.layer_set();
    assert_eq!(layers.enabled_count(), 2);
    assert_eq!(layers.get(LayerKind::RandomizedGrid).count, 3);
    assert_eq!(layers.get(LayerKind::Zonal).count, 2);
    assert!(!layers.is_enabled(LayerKind::NoiseScatter));

    assert_eq!(config.pages.scope, PageScope::OddOnly);
    assert_eq!(config.pages.margin, 36.0);
    assert!(config.pages.includes(3));
    assert!(!config.pages.includes(4));
    assert_eq!(config.preview.scale, 2.0);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_minimal_config_uses_defaults() {
    let config = Config::from_yaml_with_env("watermark:\n  text: \"X\"\n").unwrap();

    assert_eq!(config.watermark.font_size, 48.0);
    assert_eq!(config.watermark.opacity, 0.3);
    assert_eq!(config.watermark.rotation, 45.0);
    assert_eq!(config.watermark.spacing, 150.0);
    assert_eq!(config.watermark.pattern, Pattern::Diagonal);
    assert_eq!(config.watermark.color, Rgb::new(1.0, 0.0, 0.0));
    assert_eq!(config.pages.scope, PageScope::All);
    assert_eq!(config.preview.scale, 1.0);
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn test_environment_variable_substitution() {
    std::env::set_var("GUARDMARK_IT_OWNER", "ACME CORP");
    let config =
        Config::from_yaml_with_env("watermark:\n  text: \"${GUARDMARK_IT_OWNER}\"\n").unwrap();
    assert_eq!(config.watermark.text, "ACME CORP");
}

#[test]
fn test_missing_environment_variable_is_an_error() {
    let err = Config::from_yaml_with_env("watermark:\n  text: \"${GUARDMARK_IT_UNSET_VAR}\"\n")
        .unwrap_err();
    assert!(err.contains("GUARDMARK_IT_UNSET_VAR"));
}

#[test]
fn test_invalid_values_fail_validation() {
    let cases = [
        "watermark:\n  text: \"\"\n",
        "watermark:\n  text: X\n  opacity: 1.5\n",
        "watermark:\n  text: X\n  spacing: -10\n",
        "watermark:\n  text: X\n  layers:\n    zonal: { enabled: true, count: 9 }\n",
        "pages:\n  margin: -1\n",
        "preview:\n  scale: 0\n",
    ];
    for yaml in cases {
        let config = Config::from_yaml_with_env(yaml).unwrap();
        assert!(config.validate().is_err(), "accepted: {}", yaml);
    }
}

#[test]
fn test_unparseable_values_rejected() {
    assert!(Config::from_yaml_with_env("watermark:\n  text: X\n  color: \"red\"\n").is_err());
    assert!(Config::from_yaml_with_env("watermark:\n  text: X\n  pattern: spiral\n").is_err());
}

#[test]
fn test_missing_file_reported() {
    let err = Config::from_file("/nonexistent/guardmark.yaml").unwrap_err();
    assert!(err.starts_with("Failed to read config file"));
}
