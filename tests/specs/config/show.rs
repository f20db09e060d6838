//! `lattice config` behavior

use crate::prelude::*;

fn shown(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{:?}", output);
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn defaults_without_a_config_file() {
    let project = Project::empty();
    let config = shown(project.lattice().args(["config", "show"]));

    assert_eq!(config["baseURL"], "");
    assert_eq!(config["timeout"], 30000);
    assert_eq!(config["headers"]["Accept"], "application/json");
    assert_eq!(config["cache"]["ttl"], 300000);
    assert_eq!(config["retry"]["retryOn"], serde_json::json!([408, 429, 500, 502, 503, 504]));
}

#[test]
fn json_file_overrides_defaults() {
    let project = Project::empty();
    project.file(
        "lattice.json",
        r#"{ "baseURL": "https://cms.example.com", "retry": { "maxRetries": 5 } }"#,
    );

    let config = shown(
        project
            .lattice()
            .args(["--config", "lattice.json", "config", "show"]),
    );
    assert_eq!(config["baseURL"], "https://cms.example.com");
    assert_eq!(config["retry"]["maxRetries"], 5);
    assert_eq!(config["retry"]["retryDelay"], 1000);
}

#[test]
fn toml_file_is_accepted() {
    let project = Project::empty();
    project.file("lattice.toml", "timeout = 1500\n\n[cache]\nenabled = false\n");

    let config = shown(
        project
            .lattice()
            .args(["--config", "lattice.toml", "config", "show"]),
    );
    assert_eq!(config["timeout"], 1500);
    assert_eq!(config["cache"]["enabled"], false);
}

#[test]
fn environment_overrides_file() {
    let project = Project::empty();
    project.file("lattice.json", r#"{ "baseURL": "https://file.test" }"#);

    let config = shown(
        project
            .lattice()
            .env("LATTICE_BASE_URL", "https://env.test")
            .env("LATTICE_TIMEOUT_MS", "250")
            .args(["--config", "lattice.json", "config", "show"]),
    );
    assert_eq!(config["baseURL"], "https://env.test");
    assert_eq!(config["timeout"], 250);
}

#[test]
fn malformed_file_falls_back_with_warning() {
    let project = Project::empty();
    project.file("broken.json", "{ \"baseURL\": ");

    project
        .lattice()
        .args(["--config", "broken.json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"timeout\": 30000"))
        .stderr(predicate::str::contains("using default client config"));
}

#[test]
fn text_format_summarizes() {
    Project::empty()
        .lattice()
        .args(["config", "show", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("baseURL    (unset)"))
        .stdout(predicate::str::contains("maxRetries=3"));
}

#[test]
fn endpoint_lookup() {
    let project = Project::empty();
    project.file(
        "lattice.json",
        r#"{ "endpoints": { "articles": "/v2/articles" } }"#,
    );

    project
        .lattice()
        .args(["-c", "lattice.json", "config", "endpoint", "articles"])
        .assert()
        .success()
        .stdout("/v2/articles\n");

    project
        .lattice()
        .args(["-c", "lattice.json", "config", "endpoint", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no endpoint named 'missing'"));
}
