//! Integration tests for `BatchDownloadClient` using wiremock HTTP mocks.

use exn_net::BatchDownloadClient;
use exn_scheduler::{DownloadError, DownloadScope, DownloadService};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> BatchDownloadClient {
    BatchDownloadClient::new(base_url, 30).expect("client construction should not fail")
}

async fn mount_index(server: &MockServer, scope_path: &str, batches: &[&str]) {
    Mock::given(method("GET"))
        .and(path(format!("/{scope_path}/index.json")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "batches": batches })),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn full_scope_fetches_every_listed_batch() {
    let server = MockServer::start().await;
    mount_index(&server, "full", &["full/batch-1.zip", "full/batch-2.zip"]).await;

    for batch in ["batch-1.zip", "batch-2.zip"] {
        Mock::given(method("GET"))
            .and(path(format!("/full/{batch}")))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"key-batch".to_vec()))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = test_client(&server.uri());
    client
        .start_batch_download(DownloadScope::All, CancellationToken::new())
        .await
        .expect("download should succeed");
}

#[tokio::test]
async fn seven_day_scope_uses_its_own_index() {
    let server = MockServer::start().await;
    mount_index(&server, "7days", &[]).await;

    let client = test_client(&server.uri());
    client
        .start_batch_download(DownloadScope::SevenDays, CancellationToken::new())
        .await
        .expect("empty run should succeed");
}

#[tokio::test]
async fn missing_index_is_a_failed_download() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/full/index.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .start_batch_download(DownloadScope::All, CancellationToken::new())
        .await
        .expect_err("download should fail");

    assert!(matches!(err, DownloadError::Failed(_)), "got: {err:?}");
}

#[tokio::test]
async fn failed_batch_file_aborts_the_run() {
    let server = MockServer::start().await;
    mount_index(&server, "full", &["full/batch-1.zip"]).await;

    Mock::given(method("GET"))
        .and(path("/full/batch-1.zip"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .start_batch_download(DownloadScope::All, CancellationToken::new())
        .await
        .expect_err("download should fail");

    assert!(matches!(err, DownloadError::Failed(_)), "got: {err:?}");
}

#[tokio::test]
async fn cancelled_token_short_circuits_the_run() {
    let server = MockServer::start().await;

    // No mocks mounted: a cancelled run must not reach the network.
    let cancel = CancellationToken::new();
    cancel.cancel();

    let client = test_client(&server.uri());
    let err = client
        .start_batch_download(DownloadScope::All, cancel)
        .await
        .expect_err("cancelled run must not succeed");

    assert!(matches!(err, DownloadError::Cancelled), "got: {err:?}");
}
