//! `lattice fetch` against a local canned server

use crate::prelude::*;

#[test]
fn prints_json_body() {
    let (base, server) = serve(vec![Canned::json(200, r#"{"headline":"hello"}"#)]);

    Project::empty()
        .lattice()
        .args(["fetch", "/news", "--base-url", &base, "-p", "lang=en"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"headline\": \"hello\""));

    let heads = server.join().unwrap();
    assert!(heads[0].starts_with("GET /news?lang=en HTTP/1.1"), "{}", heads[0]);
}

#[test]
fn token_is_sent_as_bearer() {
    let (base, server) = serve(vec![Canned::json(200, "{}")]);

    Project::empty()
        .lattice()
        .args(["fetch", &format!("{}/me", base), "--token", "s3cret"])
        .assert()
        .success();

    let heads = server.join().unwrap();
    let head = heads[0].to_ascii_lowercase();
    assert!(head.contains("authorization: bearer s3cret"), "{}", heads[0]);
}

#[test]
fn retryable_status_is_retried() {
    let (base, server) = serve(vec![
        Canned::json(503, r#"{"error":"busy"}"#),
        Canned::json(200, r#"{"ok":true}"#),
    ]);
    let project = Project::empty();
    project.file(
        "lattice.json",
        &format!(r#"{{ "baseURL": "{}", "retry": {{ "retryDelay": 10 }} }}"#, base),
    );

    project
        .lattice()
        .args(["-c", "lattice.json", "fetch", "/flaky"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ok\": true"));

    assert_eq!(server.join().unwrap().len(), 2);
}

#[test]
fn http_error_reports_status() {
    let (base, server) = serve(vec![Canned::json(404, r#"{"error":"missing"}"#)]);

    Project::empty()
        .lattice()
        .args(["fetch", &format!("{}/gone", base)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("HTTP_ERROR"))
        .stderr(predicate::str::contains("HTTP 404"));

    server.join().unwrap();
}

#[test]
fn events_flag_streams_lifecycle_events() {
    let (base, server) = serve(vec![Canned::json(200, "[]")]);

    Project::empty()
        .lattice()
        .args(["fetch", &format!("{}/list", base), "--events"])
        .assert()
        .success()
        .stderr(predicate::str::contains("api:request-success"));

    server.join().unwrap();
}
