use super::*;

use std::{
    env,
    time::{SystemTime, UNIX_EPOCH},
};

#[test]
fn defaults_are_valid() {
    let settings = Settings::default();
    assert_eq!(settings.age_min, 10);
    assert_eq!(settings.age_max, 18);
    settings.validate().expect("defaults validate");
}

#[test]
fn env_overrides_take_precedence_in_order() {
    let mut settings = Settings::default();
    let vars: HashMap<&str, &str> = [
        ("ENROLLMENT_ENDPOINT_URL", "http://first.example/exec"),
        ("APP__ENDPOINT_URL", "http://second.example/exec"),
        ("APP__AGE_MIN", "11"),
        ("APP__AGE_MAX", "not-a-number"),
    ]
    .into_iter()
    .collect();

    apply_env(&mut settings, |key| vars.get(key).map(|v| v.to_string()));

    assert_eq!(settings.endpoint_url, "http://second.example/exec");
    assert_eq!(settings.age_min, 11);
    assert_eq!(settings.age_max, DEFAULT_AGE_MAX);
}

#[test]
fn settings_file_overrides_defaults() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("enrollment_settings_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join(SETTINGS_FILE);
    fs::write(
        &path,
        "endpoint_url = \"http://127.0.0.1:9000/exec\"\nage_min = 9\nage_max = 19\n",
    )
    .expect("write settings");

    let mut settings = Settings::default();
    apply_file(&mut settings, &path);

    assert_eq!(settings.endpoint_url, "http://127.0.0.1:9000/exec");
    assert_eq!(settings.age_min, 9);
    assert_eq!(settings.age_max, 19);

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn missing_or_malformed_file_keeps_defaults() {
    let mut settings = Settings::default();
    apply_file(&mut settings, Path::new("/nonexistent/enrollment.toml"));
    assert_eq!(settings, Settings::default());
}

#[test]
fn rejects_non_http_endpoint_and_inverted_range() {
    let settings = Settings {
        endpoint_url: "ftp://example.org/exec".into(),
        ..Settings::default()
    };
    assert!(matches!(
        settings.validate(),
        Err(SettingsError::InvalidEndpoint { .. })
    ));

    let settings = Settings {
        age_min: 19,
        age_max: 10,
        ..Settings::default()
    };
    assert_eq!(
        settings.validate(),
        Err(SettingsError::InvertedAgeRange { min: 19, max: 10 })
    );
}

#[test]
fn age_range_is_inclusive() {
    let settings = Settings::default();
    assert!(settings.age_in_range(10));
    assert!(settings.age_in_range(18));
    assert!(!settings.age_in_range(9));
    assert!(!settings.age_in_range(19));
    assert_eq!(settings.age_warning(), "La edad debe estar entre 10 y 18 años.");
}
