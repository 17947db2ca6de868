// Protection score and preset tests

use rstest::rstest;

use guardmark::watermark::presets;
use guardmark::watermark::{
    score, LayerKind, LayerSet, LayerSpec, Pattern, ProtectionLevel, ProtectionMode,
    WatermarkConfig,
};

fn config(pattern: Pattern, mode: ProtectionMode) -> WatermarkConfig {
    WatermarkConfig {
        protection_mode: mode,
        ..WatermarkConfig::new("SCORE", pattern)
    }
}

#[rstest]
#[case(Pattern::AntiRemoval, ProtectionMode::Smart, 100)]
#[case(Pattern::AntiRemoval, ProtectionMode::Heavy, 100)]
#[case(Pattern::AntiRemoval, ProtectionMode::Light, 12)]
#[case(Pattern::Paranoid, ProtectionMode::Smart, 51)]
#[case(Pattern::Paranoid, ProtectionMode::Heavy, 79)]
#[case(Pattern::Diagonal, ProtectionMode::Heavy, 0)]
fn test_mode_scores(#[case] pattern: Pattern, #[case] mode: ProtectionMode, #[case] value: u8) {
    let s = score(&config(pattern, mode));
    assert_eq!(s.value, value);
    assert_eq!(s.level, ProtectionLevel::from_value(value));
}

#[test]
fn test_score_is_monotonic_in_layers() {
    let mut layers = LayerSet::none();
    let mut previous = 0;

    for kind in LayerKind::ALL {
        *layers.get_mut(kind) = LayerSpec::on(1);
        let config = WatermarkConfig {
            protection_mode: ProtectionMode::Custom,
            layers: Some(layers),
            ..WatermarkConfig::new("X", Pattern::AntiRemoval)
        };
        let s = score(&config);
        assert!(s.value > previous, "{} did not raise the score", kind.as_str());
        previous = s.value;
    }
}

#[test]
fn test_paranoid_ignores_layers_outside_its_family() {
    let mut layers = LayerSet::none();
    *layers.get_mut(LayerKind::RandomizedGrid) = LayerSpec::on(2);
    *layers.get_mut(LayerKind::Zonal) = LayerSpec::on(5);
    let config = WatermarkConfig {
        protection_mode: ProtectionMode::Custom,
        layers: Some(layers),
        ..WatermarkConfig::new("X", Pattern::Paranoid)
    };

    let s = score(&config);
    assert_eq!(s.enabled_layers, 1);
    assert_eq!(s.total_count, 2);
}

#[test]
fn test_presets_lookup_and_score() {
    let copyright = presets::find("COPYRIGHT").expect("preset exists");
    assert_eq!(copyright.pattern(), Pattern::AntiRemoval);
    assert_eq!(score(&copyright.config()).level, ProtectionLevel::VeryHigh);

    let confidential = presets::find("confidential").expect("preset exists");
    assert_eq!(score(&confidential.config()).value, 0);

    assert!(presets::find("spiral").is_none());

    for preset in presets::all() {
        assert!(preset.config().validate().is_ok(), "{}", preset.name);
    }
}
