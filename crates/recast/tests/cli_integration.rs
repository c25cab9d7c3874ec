//! End-to-end tests of the recast binary.

use std::path::Path;
use std::process::{Command, Output};

const MODEL: &str = r#"{
    "types": [
        { "name": "com.example.User",
          "properties": [
            { "name": "id", "type": { "name": "String", "kind": "scalar" } },
            { "name": "age", "type": { "name": "Int", "kind": "scalar" } }
          ] },
        { "name": "com.example.UserDto",
          "properties": [
            { "name": "id", "type": { "name": "String", "kind": "scalar" } },
            { "name": "age", "type": { "name": "Int", "kind": "scalar" }, "mutable": true }
          ],
          "constructors": [ { "parameters": [
            { "name": "id", "type": { "name": "String", "kind": "scalar" } }
          ] } ] },
        { "name": "com.example.Draft",
          "properties": [ { "name": "id", "type": { "name": "String", "kind": "scalar", "nullable": true } } ] }
    ],
    "declarations": [
        { "source": { "name": "com.example.User", "kind": "record" },
          "target": { "name": "com.example.UserDto", "kind": "record" } }
    ]
}"#;

const FAILING: &str = r#"{
    "declarations": [
        { "source": { "name": "com.example.Draft", "kind": "record" },
          "target": { "name": "com.example.UserDto", "kind": "record" },
          "name": "draftToDto" }
    ]
}"#;

fn recast(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_recast"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run recast")
}

fn project(extra: Option<&str>) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::create_dir_all(dir.path().join("model")).unwrap();
    std::fs::write(dir.path().join("model/users.json"), MODEL).unwrap();
    if let Some(extra) = extra {
        std::fs::write(dir.path().join("model/extra.json"), extra).unwrap();
    }
    std::fs::write(
        dir.path().join("recast.toml"),
        "[output]\ndirectory = \"out\"\n\n[logging]\nlevel = \"warn\"\n",
    )
    .unwrap();
    dir
}

#[test]
fn test_generate_writes_one_file_per_declaration() {
    let dir = project(None);
    let out = recast(dir.path(), &["generate"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let text = std::fs::read_to_string(dir.path().join("out/toUserDto.kt")).unwrap();
    assert!(text.contains("fun com.example.User.toUserDto(): com.example.UserDto"));
    assert!(text.contains("age = source.age"));
}

#[test]
fn test_check_fails_on_null_safety_violation() {
    let dir = project(Some(FAILING));
    let out = recast(dir.path(), &["check", "--json"]);
    assert_eq!(out.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["succeeded"], 1);
    assert_eq!(value["failed"], 1);
    assert_eq!(value["diagnostics"][0]["function"], "draftToDto");
    assert_eq!(value["diagnostics"][0]["kind"], "null-safety-violation");
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_rules_lists_in_resolution_order() {
    let dir = project(None);
    let out = recast(dir.path(), &["rules", "--json"]);
    assert!(out.status.success());

    let rows: Vec<serde_json::Value> = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(rows[0]["id"], "same-type");
    assert_eq!(rows[0]["priority"], 0);
}

#[test]
fn test_missing_input_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("recast.toml"), "").unwrap();
    let out = recast(dir.path(), &["check"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Input path does not exist"));
}
