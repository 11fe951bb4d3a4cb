//! End-to-end tests running a fake `op` shell script
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::OnceLock;

use op_binding::{
    Config, Credentials, Error, Named, OnePassword, Op, OpExecutor, Session,
};
use tempfile::TempDir;

const SIGN_IN_ADDRESS: &str = "https://acme.1password.com";

const SCRIPT: &str = r#"#!/bin/sh
echo "$1" >> "$(dirname "$0")/$OP_DEVICE.log"
case "$1" in
  --version)
    echo "1.8.0"
    ;;
  signin)
    read -r password
    if [ "$password" != "hunter2" ]; then
      echo "[ERROR] 401: Authentication required." >&2
      exit 1
    fi
    echo "tok"
    ;;
  signout)
    if [ "$OP_SESSION_acme" != "tok" ]; then
      echo "[ERROR] You are not currently signed in." >&2
      exit 1
    fi
    ;;
  list)
    if [ "$OP_SESSION_acme" != "tok" ]; then
      echo "[ERROR] You are not currently signed in. Please run \`op signin --help\` for instructions" >&2
      exit 1
    fi
    echo '[{"uuid":"V1","name":"Private","desc":""}]'
    ;;
  args)
    shift
    printf '%s\n' "$@"
    ;;
  device)
    printf '%s' "$OP_DEVICE"
    ;;
esac
"#;

static FAKE_OP: OnceLock<TempDir> = OnceLock::new();

/// Path of the fake executable. Every test calls this before starting any
/// process so the script is fully written before anything forks.
fn fake_op() -> PathBuf {
    let dir = FAKE_OP.get_or_init(|| {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("op");
        fs::write(&path, SCRIPT).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        dir
    });
    dir.path().join("op")
}

/// Device ids are unique per test so each test gets its own call log
fn config(device_prefix: &str) -> Config {
    Config::new()
        .with_executable(fake_op())
        .with_device(&format!("{:a<26}", device_prefix))
        .unwrap()
}

fn calls(config: &Config) -> Vec<String> {
    let log = fake_op().with_file_name(format!("{}.log", config.device()));
    fs::read_to_string(log)
        .unwrap_or_default()
        .lines()
        .map(String::from)
        .collect()
}

fn credentials(password: &'static str) -> Credentials {
    Credentials::new(SIGN_IN_ADDRESS, "jane@example.com", "A3-KEY", move || {
        password.to_string()
    })
}

#[test]
fn test_version() {
    let op = Op::new(config("version"));
    assert_eq!(op.version().unwrap(), "1.8.0");
}

#[test]
fn test_signin_returns_session() {
    let op = Op::new(config("signin"));

    let session = op
        .signin(SIGN_IN_ADDRESS, "jane@example.com", "A3-KEY", &|| {
            "hunter2".to_string()
        })
        .unwrap();

    assert_eq!(session.token(), "tok");
    assert_eq!(session.shorthand(), "acme");
    assert_eq!(session.environment_variable_name(), "OP_SESSION_acme");
}

#[test]
fn test_signin_with_wrong_password() {
    let op = Op::new(config("wrongpassword"));

    let error = op
        .signin(SIGN_IN_ADDRESS, "jane@example.com", "A3-KEY", &|| {
            "wrong".to_string()
        })
        .unwrap_err();

    assert_eq!(error.to_string(), "[ERROR] 401: Authentication required.");
    assert!(!error.is_session_expired());
}

#[test]
fn test_execute_without_session_is_not_signed_in() {
    let op = Op::new(config("nosession"));

    let error = op
        .execute(None, &[Some("list".to_string()), Some("vaults".to_string())])
        .unwrap_err();

    assert!(error.is_session_expired());
}

#[test]
fn test_device_variable_is_set() {
    let config = config("device");
    let op = Op::new(config.clone());

    let stdout = op.execute(None, &[Some("device".to_string())]).unwrap();

    assert_eq!(stdout, config.device());
}

#[test]
fn test_global_flags_are_appended() {
    let op = Op::new(
        config("flags")
            .with_cache(true)
            .with_config_dir("/tmp/op-config"),
    );

    let stdout = op
        .execute(None, &[Some("args".to_string()), None, Some("x".to_string())])
        .unwrap();

    assert_eq!(stdout, "x\n--cache\n--config=/tmp/op-config\n");
}

#[test]
fn test_client_signs_in_lists_and_signs_out() {
    let config = config("client");
    {
        let client = OnePassword::new(config.clone(), credentials("hunter2"));
        let vaults = client.vaults().list().unwrap();
        assert_eq!(vaults.len(), 1);
        assert_eq!(vaults[0].name(), "Private");
    }

    assert_eq!(calls(&config), vec!["signin", "list", "signout"]);
}

#[test]
fn test_client_with_wrong_password() {
    let config = config("clientwrong");
    {
        let client = OnePassword::new(config.clone(), credentials("wrong"));
        let error = client.vaults().list().unwrap_err();
        assert!(error.to_string().contains("401"));
    }

    assert_eq!(calls(&config), vec!["signin"]);
}

#[test]
fn test_pre_authenticated_client_keeps_session() {
    let config = config("preauth");
    {
        let client = OnePassword::pre_authenticated(config.clone(), Session::new("tok", "acme"));
        assert_eq!(client.vaults().list().unwrap().len(), 1);
    }

    assert_eq!(calls(&config), vec!["list"]);
}

#[test]
fn test_missing_executable() {
    fake_op();
    let config = Config::new().with_executable("/nonexistent/bin/op");
    let client = OnePassword::new(config, credentials("hunter2"));

    match client.users().list().unwrap_err() {
        Error::Spawn { executable, .. } => assert_eq!(executable, "/nonexistent/bin/op"),
        other => panic!("expected spawn error, got {:?}", other),
    }
}
