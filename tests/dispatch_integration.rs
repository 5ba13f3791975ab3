//! Dispatcher integration tests
//!
//! Exercises the full orchestration path against mock adapters: credential
//! partitioning, token gating, concurrent fan-out, and result aggregation.

use std::sync::{Arc, Mutex};

use crosscast::platforms::mock::MockClient;
use crosscast::{
    Content, Credential, CredentialStore, Dispatcher, FailureReason, MemoryCredentialStore,
    OverallStatus, Platform, PlatformRegistry, PublishRequest,
};

struct Harness {
    registry: PlatformRegistry,
    store: Arc<MemoryCredentialStore>,
}

impl Harness {
    fn new() -> Self {
        Self {
            registry: PlatformRegistry::new(),
            store: Arc::new(MemoryCredentialStore::new()),
        }
    }

    /// Register a mock adapter and return its (verify, publish) counters.
    fn add(&mut self, client: MockClient) -> (Arc<Mutex<usize>>, Arc<Mutex<usize>>) {
        let counters = client.counters();
        self.registry.register(Arc::new(client));
        counters
    }

    fn connect(&self, platform: Platform, token: &str) {
        self.store.connect(
            "alice",
            Credential::new(platform, &format!("{}-user", platform), token),
        );
    }

    fn dispatcher(self) -> (Dispatcher, Arc<MemoryCredentialStore>) {
        let store = Arc::clone(&self.store);
        (
            Dispatcher::new(Arc::new(self.registry), self.store),
            store,
        )
    }
}

fn text_request(platforms: Vec<Platform>) -> PublishRequest {
    PublishRequest::new(Content::text_only("hello fediverse"), platforms)
}

// Scenario A: facebook and twitter connected and valid, linkedin requested
// but not connected.
#[tokio::test]
async fn partial_success_when_one_platform_not_connected() {
    let mut harness = Harness::new();
    harness.add(MockClient::success(Platform::Facebook, "fb-1"));
    harness.add(MockClient::success(Platform::Twitter, "tw-1"));
    let (li_verify, li_publish) = harness.add(MockClient::success(Platform::Linkedin, "li-1"));
    harness.connect(Platform::Facebook, "fb-token");
    harness.connect(Platform::Twitter, "tw-token");
    let (dispatcher, _store) = harness.dispatcher();

    let result = dispatcher
        .dispatch_for_principal(
            "alice",
            &text_request(vec![
                Platform::Facebook,
                Platform::Twitter,
                Platform::Linkedin,
            ]),
        )
        .await
        .unwrap();

    assert_eq!(result.overall, OverallStatus::PartialSuccess);
    assert_eq!(
        result.succeeded_platforms(),
        vec![Platform::Facebook, Platform::Twitter]
    );
    assert_eq!(result.failed.len(), 1);
    assert_eq!(result.failed[0].platform, Platform::Linkedin);
    assert_eq!(result.failed[0].reason, FailureReason::NotConnected);

    // An unconnected platform never triggers a remote call
    assert_eq!(*li_verify.lock().unwrap(), 0);
    assert_eq!(*li_publish.lock().unwrap(), 0);
}

// Scenario B: the only connected platform rejects the publish.
#[tokio::test]
async fn all_failed_when_remote_rejects_publish() {
    let mut harness = Harness::new();
    harness.add(MockClient::publish_failure(Platform::Facebook, "rate limited"));
    harness.connect(Platform::Facebook, "fb-token");
    let (dispatcher, _store) = harness.dispatcher();

    let result = dispatcher
        .dispatch_for_principal("alice", &text_request(vec![Platform::Facebook]))
        .await
        .unwrap();

    assert_eq!(result.overall, OverallStatus::AllFailed);
    assert!(result.succeeded.is_empty());
    assert_eq!(result.failed[0].reason, FailureReason::PublishRejected);
    // The adapter's message survives verbatim
    assert_eq!(result.failed[0].detail, "rate limited");
}

// Scenario D: no principal supplied; synthetic successes, no store or
// remote traffic.
#[tokio::test]
async fn demo_mode_succeeds_without_any_calls() {
    let mut harness = Harness::new();
    let (fb_verify, fb_publish) = harness.add(MockClient::success(Platform::Facebook, "fb-1"));
    let (tw_verify, tw_publish) = harness.add(MockClient::success(Platform::Twitter, "tw-1"));
    let (dispatcher, store) = harness.dispatcher();

    let result = dispatcher
        .dispatch(None, &text_request(vec![Platform::Facebook, Platform::Twitter]))
        .await
        .unwrap();

    assert_eq!(result.overall, OverallStatus::AllSucceeded);
    assert_eq!(result.succeeded.len(), 2);
    assert!(result
        .succeeded
        .iter()
        .all(|s| s.remote_id.starts_with("demo-")));

    assert_eq!(*fb_verify.lock().unwrap(), 0);
    assert_eq!(*fb_publish.lock().unwrap(), 0);
    assert_eq!(*tw_verify.lock().unwrap(), 0);
    assert_eq!(*tw_publish.lock().unwrap(), 0);
    // No last-used stamps were written either
    assert!(store.list_all("alice").is_empty());
}

#[tokio::test]
async fn expired_token_skips_publish_call() {
    let mut harness = Harness::new();
    let (verify, publish) = harness.add(MockClient::expired_token(Platform::Twitter));
    harness.connect(Platform::Twitter, "stale-token");
    let (dispatcher, store) = harness.dispatcher();

    let result = dispatcher
        .dispatch_for_principal("alice", &text_request(vec![Platform::Twitter]))
        .await
        .unwrap();

    assert_eq!(result.overall, OverallStatus::AllFailed);
    assert_eq!(result.failed[0].reason, FailureReason::TokenExpired);

    // One identity check, zero publish attempts
    assert_eq!(*verify.lock().unwrap(), 1);
    assert_eq!(*publish.lock().unwrap(), 0);

    // The credential is left intact for the caller to reconnect
    let active = store.list_active("alice").await.unwrap();
    assert_eq!(active.len(), 1);
    assert!(active[0].last_used_at.is_none());
}

#[tokio::test]
async fn every_requested_platform_is_accounted_for_exactly_once() {
    let mut harness = Harness::new();
    harness.add(MockClient::success(Platform::Facebook, "fb-1"));
    harness.add(MockClient::expired_token(Platform::Twitter));
    harness.add(MockClient::publish_failure(Platform::Linkedin, "server error"));
    harness.connect(Platform::Facebook, "t1");
    harness.connect(Platform::Twitter, "t2");
    harness.connect(Platform::Linkedin, "t3");
    let (dispatcher, _store) = harness.dispatcher();

    let targets = vec![
        Platform::Facebook,
        Platform::Twitter,
        Platform::Linkedin,
        Platform::Instagram,
    ];
    let result = dispatcher
        .dispatch_for_principal("alice", &text_request(targets.clone()))
        .await
        .unwrap();

    assert_eq!(
        result.succeeded.len() + result.failed.len(),
        targets.len()
    );
    for platform in targets {
        let in_succeeded = result.succeeded_platforms().contains(&platform);
        let in_failed = result.failed_platforms().contains(&platform);
        assert!(
            in_succeeded ^ in_failed,
            "{} must appear in exactly one bucket",
            platform
        );
    }
    assert_eq!(result.overall, OverallStatus::PartialSuccess);
}

#[tokio::test]
async fn one_platform_failure_never_aborts_the_others() {
    let mut harness = Harness::new();
    harness.add(MockClient::publish_failure(Platform::Facebook, "boom"));
    harness.add(MockClient::success(Platform::Twitter, "tw-1"));
    harness.add(MockClient::success(Platform::Linkedin, "li-1"));
    harness.connect(Platform::Facebook, "t1");
    harness.connect(Platform::Twitter, "t2");
    harness.connect(Platform::Linkedin, "t3");
    let (dispatcher, _store) = harness.dispatcher();

    let result = dispatcher
        .dispatch_for_principal(
            "alice",
            &text_request(vec![
                Platform::Facebook,
                Platform::Twitter,
                Platform::Linkedin,
            ]),
        )
        .await
        .unwrap();

    assert_eq!(
        result.succeeded_platforms(),
        vec![Platform::Twitter, Platform::Linkedin]
    );
    assert_eq!(result.failed_platforms(), vec![Platform::Facebook]);
    assert_eq!(result.overall, OverallStatus::PartialSuccess);
}

#[tokio::test]
async fn content_reaches_the_adapter_unchanged() {
    let mut harness = Harness::new();
    let client = MockClient::success(Platform::Facebook, "fb-1");
    let published = client.published_handle();
    harness.registry.register(Arc::new(client));
    harness.connect(Platform::Facebook, "t1");
    let (dispatcher, _store) = harness.dispatcher();

    let request = PublishRequest::new(
        Content::with_image(
            "look at this",
            url::Url::parse("https://img.example/cat.jpg").unwrap(),
        ),
        vec![Platform::Facebook],
    );
    dispatcher
        .dispatch_for_principal("alice", &request)
        .await
        .unwrap();

    let published = published.lock().unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].text, "look at this");
    assert_eq!(
        published[0].image_url.as_ref().unwrap().as_str(),
        "https://img.example/cat.jpg"
    );
}
