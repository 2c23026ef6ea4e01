//! End-to-end runs of the `rewrite_config` binary

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const ISOLATED_VARIABLES: &[&str] = &[
    "GRAVITINO_IO_IMPL",
    "GRAVITINO_URI",
    "GRAVITINO_WAREHOUSE",
    "GRAVITINO_CREDENTIAL_PROVIDER_TYPE",
    "GRAVITINO_GCS_CREDENTIAL_FILE_PATH",
    "GRAVITINO_REWRITER_CONFIG_PATH",
    "GRAVITINO_REWRITER_WRITE_MODE",
    "GRAVITINO_REWRITER_LOG_FORMAT",
    "GRAVITINO_REWRITER_LOG_LEVEL",
];

fn rewrite_config(workdir: &Path, vars: &[(&str, &str)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_rewrite_config"));
    command.current_dir(workdir).env("RUST_LOG", "debug");
    for name in ISOLATED_VARIABLES {
        command.env_remove(name);
    }
    for (name, value) in vars {
        command.env(name, value);
    }
    command.output().expect("failed to run rewrite_config")
}

fn workdir_with_conf(content: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("conf")).unwrap();
    fs::write(
        dir.path().join("conf/gravitino-iceberg-rest-server.conf"),
        content,
    )
    .unwrap();
    dir
}

#[test]
fn test_rewrites_default_path() {
    let dir = workdir_with_conf("# server\ngravitino.iceberg-rest.httpPort = 9001\n");

    let output = rewrite_config(
        dir.path(),
        &[
            ("GRAVITINO_URI", "jdbc:sqlite:/tmp/x.db"),
            ("GRAVITINO_WAREHOUSE", "/tmp/warehouse"),
        ],
    );

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let written =
        fs::read_to_string(dir.path().join("conf/gravitino-iceberg-rest-server.conf")).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines[0], "gravitino.iceberg-rest.httpPort = 9001");
    assert!(lines.contains(&"gravitino.iceberg-rest.uri = jdbc:sqlite:/tmp/x.db"));
    assert!(lines.contains(&"gravitino.iceberg-rest.warehouse = /tmp/warehouse"));
    assert!(lines.contains(&"gravitino.iceberg-rest.catalog-backend = jdbc"));
    assert_eq!(lines.len(), 9);
    assert!(output.stdout.is_empty());
}

#[test]
fn test_password_is_redacted_in_logs() {
    let dir = workdir_with_conf("");

    let output = rewrite_config(dir.path(), &[]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("gravitino.iceberg-rest.jdbc-password"));
    assert!(stderr.contains("***"));
    let written =
        fs::read_to_string(dir.path().join("conf/gravitino-iceberg-rest-server.conf")).unwrap();
    assert!(written.contains("gravitino.iceberg-rest.jdbc-password = iceberg\n"));
}

#[test]
fn test_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();

    let output = rewrite_config(dir.path(), &[]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Configuration file not found"));
    assert!(!dir.path().join("conf").exists());
}

#[test]
fn test_malformed_line_fails() {
    let dir = workdir_with_conf("valid = yes\nnot a pair\n");

    let output = rewrite_config(dir.path(), &[]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Malformed line 2"));
}

#[test]
fn test_configured_path_and_write_mode() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.conf");
    fs::write(&path, "keep = me\n").unwrap();

    let output = rewrite_config(
        dir.path(),
        &[
            ("GRAVITINO_REWRITER_CONFIG_PATH", "custom.conf"),
            ("GRAVITINO_REWRITER_WRITE_MODE", "delete-then-write"),
            ("GRAVITINO_REWRITER_LOG_FORMAT", "json"),
        ],
    );

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("keep = me\n"));
    assert!(written.ends_with("gravitino.iceberg-rest.jdbc.schema-version = V1\n"));
}

#[cfg(unix)]
#[test]
fn test_non_unicode_variable_fails_without_writing() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    let original = "keep = me\n";
    let dir = workdir_with_conf(original);

    let mut command = Command::new(env!("CARGO_BIN_EXE_rewrite_config"));
    command.current_dir(dir.path());
    for name in ISOLATED_VARIABLES {
        command.env_remove(name);
    }
    command.env(
        "GRAVITINO_GCS_CREDENTIAL_FILE_PATH",
        OsString::from_vec(b"/data/caf\xe9.json".to_vec()),
    );
    let output = command.output().expect("failed to run rewrite_config");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr)
        .contains("GRAVITINO_GCS_CREDENTIAL_FILE_PATH is not valid Unicode"));
    let written =
        fs::read_to_string(dir.path().join("conf/gravitino-iceberg-rest-server.conf")).unwrap();
    assert_eq!(written, original);
}
