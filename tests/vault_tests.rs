//! Integration tests for the vault client against an in-memory vault.

mod support;

use kvpoll::errors::KvPollError;
use kvpoll::http::{Intercepted, Method};
use kvpoll::vault::VaultClient;
use support::{MemoryVault, Recorder, BASE};

// ---------------------------------------------------------------------------
// get
// ---------------------------------------------------------------------------

#[test]
fn get_returns_current_value() {
    let vault = MemoryVault::new().with_secret("db-pass", "sealed-v1");
    let client = vault.client();

    assert_eq!(client.get("db-pass").unwrap(), "sealed-v1");

    let requests = vault.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::Get);
    assert_eq!(requests[0].url, format!("{BASE}/secrets/db-pass?api-version=7.4"));
    assert_eq!(
        requests[0].header_value("Authorization"),
        Some("Bearer test-token")
    );
}

#[test]
fn get_missing_secret_is_not_found() {
    let vault = MemoryVault::new();
    match vault.client().get("nope") {
        Err(KvPollError::NotFound(name)) => assert_eq!(name, "nope"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn rejected_token_is_unauthorized() {
    let vault = MemoryVault::new().with_secret("db-pass", "x");
    match vault.client_with_token("stale").get("db-pass") {
        Err(KvPollError::Unauthorized(msg)) => assert!(msg.contains("Unauthorized")),
        other => panic!("expected Unauthorized, got {other:?}"),
    }
}

#[test]
fn transport_failure_is_network_error() {
    let vault = MemoryVault::new().with_secret("db-pass", "x");
    vault.set_network_down(true);
    assert!(matches!(
        vault.client().get("db-pass"),
        Err(KvPollError::Network(_))
    ));
}

#[test]
fn invalid_name_never_reaches_the_wire() {
    let vault = MemoryVault::new();
    let client = vault.client();

    for bad in ["", "a/b", "x?api-version=1", "under_score"] {
        assert!(matches!(
            client.get(bad),
            Err(KvPollError::InvalidSecretName(_))
        ));
        assert!(client.set(bad, "v").is_err());
        assert!(client.delete(bad).is_err());
    }
    assert_eq!(vault.request_count(), 0);
}

// ---------------------------------------------------------------------------
// set
// ---------------------------------------------------------------------------

#[test]
fn set_creates_then_updates() {
    let vault = MemoryVault::new();
    let client = vault.client();

    client.set("api-key", "first").unwrap();
    assert_eq!(client.get("api-key").unwrap(), "first");

    client.set("api-key", "second").unwrap();
    assert_eq!(client.get("api-key").unwrap(), "second");
    assert_eq!(vault.versions("api-key"), 2);
}

#[test]
fn repeated_set_is_last_write_wins() {
    let vault = MemoryVault::new();
    let client = vault.client();

    for _ in 0..3 {
        client.set("token", "same").unwrap();
    }
    assert_eq!(client.get("token").unwrap(), "same");
}

#[test]
fn set_sends_json_value_with_put() {
    let vault = MemoryVault::new();
    vault.client().set("db-pass", "p@ss \"quoted\"").unwrap();

    let req = &vault.requests()[0];
    assert_eq!(req.method, Method::Put);
    assert_eq!(req.header_value("Content-Type"), Some("application/json"));
    assert_eq!(vault.client().get("db-pass").unwrap(), "p@ss \"quoted\"");
}

// ---------------------------------------------------------------------------
// delete
// ---------------------------------------------------------------------------

#[test]
fn delete_removes_secret() {
    let vault = MemoryVault::new().with_secret("old", "v");
    let client = vault.client();

    client.delete("old").unwrap();
    assert!(matches!(client.get("old"), Err(KvPollError::NotFound(_))));
}

#[test]
fn deleting_twice_is_not_found() {
    let vault = MemoryVault::new().with_secret("old", "v");
    let client = vault.client();

    client.delete("old").unwrap();
    assert!(matches!(client.delete("old"), Err(KvPollError::NotFound(_))));
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

#[test]
fn list_returns_names_only() {
    let vault = MemoryVault::new()
        .with_secret("b-secret", "value-b")
        .with_secret("a-secret", "value-a");

    let items = vault.client().list().unwrap();
    let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["a-secret", "b-secret"]);
    assert!(items.iter().all(|i| i.enabled == Some(true)));
}

#[test]
fn list_follows_next_link() {
    let vault = MemoryVault::new()
        .with_secret("one", "1")
        .with_secret("two", "2")
        .with_secret("three", "3")
        .with_secret("four", "4")
        .with_secret("five", "5")
        .paged(2);

    let items = vault.client().list().unwrap();
    assert_eq!(items.len(), 5);
    // 2 + 2 + 1
    assert_eq!(vault.request_count(), 3);
}

#[test]
fn list_follows_next_link_with_default_port() {
    let vault = MemoryVault::new()
        .with_secret("a", "1")
        .with_secret("b", "2")
        .with_secret("c", "3")
        .paged(2)
        .with_link_origin(&format!("{BASE}:443"));

    let items = vault.client().list().unwrap();
    let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);

    let requests = vault.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[1].url,
        format!("{BASE}:443/secrets?api-version=7.4&$skiptoken=2")
    );
    assert_eq!(
        requests[1].header_value("Authorization"),
        Some("Bearer test-token")
    );
}

#[test]
fn list_refuses_next_link_to_another_host() {
    let vault = MemoryVault::new()
        .with_secret("a", "1")
        .with_secret("b", "2")
        .with_secret("c", "3")
        .paged(2)
        .with_link_origin("https://elsewhere.test");

    assert!(matches!(
        vault.client().list(),
        Err(KvPollError::InvalidResponse(_))
    ));
    // the token never went to the other host
    assert_eq!(vault.request_count(), 1);
}

#[test]
fn list_empty_vault() {
    let vault = MemoryVault::new();
    assert!(vault.client().list().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// interception
// ---------------------------------------------------------------------------

#[test]
fn interceptor_records_request_then_response_for_each_call() {
    let vault = MemoryVault::new().with_secret("db-pass", "v");
    let recorder = Recorder::default();
    let transport = Intercepted::new(Box::new(vault.clone())).with(recorder.clone());
    let client = VaultClient::new(
        BASE,
        Box::new(transport),
        Box::new(kvpoll::auth::StaticToken::new(support::TOKEN)),
    );

    client.get("db-pass").unwrap();
    assert!(client.get("missing").is_err());

    let events = recorder.events.borrow();
    assert_eq!(
        *events,
        vec![
            format!("request GET {BASE}/secrets/db-pass?api-version=7.4"),
            "response 200".to_string(),
            format!("request GET {BASE}/secrets/missing?api-version=7.4"),
            "response 404".to_string(),
        ]
    );
}

#[test]
fn interceptor_does_not_alter_results() {
    let vault = MemoryVault::new().with_secret("db-pass", "sealed-v1");
    let transport = Intercepted::new(Box::new(vault.clone())).with(Recorder::default());
    let client = VaultClient::new(
        format!("{BASE}/"),
        Box::new(transport),
        Box::new(kvpoll::auth::StaticToken::new(support::TOKEN)),
    );

    assert_eq!(client.base_url(), BASE);
    assert_eq!(client.get("db-pass").unwrap(), "sealed-v1");
}
