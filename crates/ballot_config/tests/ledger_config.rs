use std::{env, fs, path::PathBuf};

use ballot_config::{ConfigError, ElectionWindow, LedgerConfig};
use primitives::{Address, DEFAULT_MIN_CANDIDATE_AGE};

fn write_config(name: &str, contents: &str) -> PathBuf {
    let path = env::temp_dir().join(format!("ballot-config-{}-{name}", std::process::id()));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn loads_toml_and_fills_defaults() {
    let commissioner = Address::from_seed("ec");
    let path = write_config(
        "partial.toml",
        &format!(
            r#"
commissioner = "{commissioner}"
min_voter_age = 21

[election_window]
start = 1000
end = 5000
"#
        ),
    );

    let config = LedgerConfig::from_file(&path).unwrap();

    assert_eq!(config.commissioner, commissioner);
    assert_eq!(config.min_voter_age, 21);
    assert_eq!(config.min_candidate_age, DEFAULT_MIN_CANDIDATE_AGE);
    assert_eq!(config.election_window, ElectionWindow::new(1000, 5000));

    fs::remove_file(path).ok();
}

#[test]
fn loads_json_sources() {
    let path = write_config(
        "settings.json",
        r#"{ "min_security_deposit": 5, "deposit_refund_threshold_bps": 2500 }"#,
    );

    let config = LedgerConfig::from_file(&path).unwrap();

    assert_eq!(config.min_security_deposit, 5);
    assert_eq!(config.deposit_refund_threshold_bps, 2500);
    assert_eq!(config.commissioner, LedgerConfig::default().commissioner);

    fs::remove_file(path).ok();
}

#[test]
fn rejects_inverted_windows_from_file() {
    let path = write_config(
        "inverted.toml",
        r#"
[election_window]
start = 10
end = 5
"#,
    );

    let result = LedgerConfig::from_file(&path);
    assert!(matches!(result, Err(ConfigError::Invalid(_))));

    fs::remove_file(path).ok();
}

#[test]
fn missing_files_are_load_errors() {
    let result = LedgerConfig::from_file(env::temp_dir().join("ballot-config-does-not-exist.toml"));
    assert!(matches!(result, Err(ConfigError::Load(_))));
}
