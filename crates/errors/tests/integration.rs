//! Integration tests for error types

use eim_errors::*;

#[test]
fn domain_errors_convert_to_root_error() {
    let cmd_err = CommandError::Spawn {
        message: "eim: No such file or directory".into(),
    };
    let err: Error = cmd_err.into();
    assert!(matches!(err, Error::Command(_)));
}

#[test]
fn error_display_is_user_readable() {
    let err = ConfigError::RegistryNotFound {
        path: "/opt/esp/eim_idf.json".into(),
    };
    assert_eq!(
        err.to_string(),
        "registry file not found: /opt/esp/eim_idf.json"
    );
}

#[test]
fn command_error_exposes_its_message() {
    let err = CommandError::rejected("backend refused");
    assert_eq!(err.message(), "backend refused");
    assert_eq!(err.to_string(), "backend refused");
}

#[test]
fn errors_are_cloneable() {
    let err = SessionError::AlreadyRunning;
    let cloned = err.clone();
    assert_eq!(err.to_string(), cloned.to_string());
}

#[test]
fn io_errors_keep_their_path() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err = Error::io_with_path(&io, "/tmp/eim_idf.json");
    match err {
        Error::Io { kind, path, .. } => {
            assert_eq!(kind, std::io::ErrorKind::NotFound);
            assert_eq!(path.unwrap().to_str(), Some("/tmp/eim_idf.json"));
        }
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn json_errors_become_config_parse_errors() {
    let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
    let err: Error = json_err.into();
    assert!(matches!(err, Error::Config(ConfigError::Parse { .. })));
}
