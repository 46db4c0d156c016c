use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn run(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_option-schema"))
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("failed to run option-schema")
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("failed to write fixture");
    path
}

fn valid_options_json() -> String {
    serde_json::json!([
        {
            "type": 3,
            "name": "query",
            "description": "Search text",
            "required": true,
            "autocomplete": true
        },
        {
            "type": 4,
            "name": "limit",
            "description": "Maximum results",
            "min_value": 1,
            "max_value": 50
        }
    ])
    .to_string()
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

#[test]
fn validate_accepts_valid_json_and_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let json = write(dir.path(), "search.json", &valid_options_json());
    let yaml = write(
        dir.path(),
        "color.yaml",
        r#"
type: 3
name: color
description: Pick a color
choices:
  - name: Red
    value: red
  - name: Blue
    value: blue
"#,
    );

    let output = run(
        &["validate", json.to_str().unwrap(), yaml.to_str().unwrap()],
        dir.path(),
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Validated 2 schema file(s)."));
}

#[test]
fn validate_reports_tree_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "bad.json",
        r#"{"type": 5, "name": "flag", "description": "A flag", "channel_types": [0]}"#,
    );

    let output = run(&["validate", path.to_str().unwrap()], dir.path());
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("channel types are only allowed on CHANNEL options: flag"));
    assert!(stderr.contains("1 schema file(s) failed validation"));
}

#[test]
fn validate_rejects_setter_violations() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "bad.json", r#"{"type": 42, "name": "x"}"#);

    let output = run(&["validate", path.to_str().unwrap()], dir.path());
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("option type must be between 1 and 10"));
}

#[test]
fn validate_continues_after_load_failure() {
    let dir = tempfile::tempdir().unwrap();
    let broken = write(dir.path(), "broken.json", r#"{"type": 42, "name": "x"}"#);
    let invalid = write(
        dir.path(),
        "invalid.json",
        r#"{"type": 3, "name": "Upper", "description": "Bad name"}"#,
    );
    let valid = write(dir.path(), "valid.json", &valid_options_json());

    let output = run(
        &[
            "validate",
            broken.to_str().unwrap(),
            invalid.to_str().unwrap(),
            valid.to_str().unwrap(),
        ],
        dir.path(),
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("option type must be between 1 and 10"));
    assert!(stderr.contains("invalid option name: Upper"));
    assert!(stderr.contains("2 schema file(s) failed validation"));
}

#[test]
fn validate_rejects_unknown_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "bad.json", r#"{"type": 3, "name": "x", "color": 1}"#);

    let output = run(&["validate", path.to_str().unwrap()], dir.path());
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid option record"));
}

// ---------------------------------------------------------------------------
// render
// ---------------------------------------------------------------------------

#[test]
fn render_writes_wire_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "search.json", &valid_options_json());
    let output_path = dir.path().join("out").join("search.wire.json");

    let output = run(
        &[
            "render",
            "--input",
            input.to_str().unwrap(),
            "--output",
            output_path.to_str().unwrap(),
        ],
        dir.path(),
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let rendered: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(rendered[0]["name"], "query");
    assert_eq!(rendered[1]["max_value"], 50);
    assert!(rendered[1].get("choices").is_none());
}

#[test]
fn render_single_record_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "ping.json",
        r#"{"type": 1, "name": "ping", "description": "Ping the bot"}"#,
    );

    let output = run(
        &["render", "--input", input.to_str().unwrap(), "--compact"],
        dir.path(),
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        r#"{"description":"Ping the bot","name":"ping","type":1}"#
    );
}

#[test]
fn render_refuses_invalid_schema_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "bad.json",
        r#"{"type": 3, "name": "Color", "description": "Pick"}"#,
    );

    let output = run(&["render", "--input", input.to_str().unwrap()], dir.path());
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid option name: Color"));
}

#[test]
fn render_allows_invalid_schema_when_configured() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "bad.json",
        r#"{"type": 3, "name": "Color", "description": "Pick"}"#,
    );
    write(
        dir.path(),
        ".option-schema.yml",
        "output:\n  pretty: false\nvalidation:\n  allow_invalid: true\n",
    );

    let output = run(&["render", "--input", input.to_str().unwrap()], dir.path());
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(r#""name":"Color""#));
}

// ---------------------------------------------------------------------------
// init-config
// ---------------------------------------------------------------------------

#[test]
fn init_config_writes_defaults_once() {
    let dir = tempfile::tempdir().unwrap();

    let first = run(&["init-config"], dir.path());
    assert!(first.status.success());
    let written = fs::read_to_string(dir.path().join(".option-schema.yml")).unwrap();
    assert!(written.contains("pretty: true"));

    let second = run(&["init-config"], dir.path());
    assert!(!second.status.success());
    assert!(String::from_utf8_lossy(&second.stderr).contains("already exists"));
}
