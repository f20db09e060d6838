//! `lattice fetch` failure reporting

use crate::prelude::*;

#[test]
fn unreachable_host_is_a_network_error() {
    let url = format!("http://127.0.0.1:{}/articles", closed_port());

    Project::empty()
        .lattice()
        .args(["fetch", &url, "--retries", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NETWORK_ERROR"))
        .stderr(predicate::str::contains("--base-url"));
}

#[test]
fn relative_endpoint_without_base_url_is_invalid() {
    Project::empty()
        .lattice()
        .args(["fetch", "/articles"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("INVALID_REQUEST"));
}

#[test]
fn malformed_body_is_rejected_before_sending() {
    Project::empty()
        .lattice()
        .args(["fetch", "http://127.0.0.1:1/x", "-X", "POST", "--data", "{oops"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--data is not valid JSON"));
}

#[test]
fn unsupported_method_is_rejected() {
    Project::empty()
        .lattice()
        .args(["fetch", "http://127.0.0.1:1/x", "-X", "BREW"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported method: BREW"));
}

#[test]
fn unknown_named_endpoint_lists_known_ones() {
    let project = Project::empty();
    project.file("lattice.json", r#"{ "endpoints": { "feed": "/rss" } }"#);

    project
        .lattice()
        .args(["-c", "lattice.json", "fetch", "@articles"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no endpoint named 'articles'"))
        .stderr(predicate::str::contains("Known endpoints: feed"));
}

#[test]
fn invalid_timeout_is_a_usage_error() {
    Project::empty()
        .lattice()
        .args(["fetch", "/x", "--timeout", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--timeout"));
}
