//! Integration tests for the document-store and asset-store adapters.
//!
//! **Coverage:**
//! - Merge writes mask exactly the keys present in the partial
//! - Reads decode the wire document and treat 404 as absence
//! - Uploads produce a public `alt=media` URL and map failures to
//!   `UploadFailed`

use profilesync_core::{AssetStore, DocumentStore};
use profilesync_domain::ProfileSyncError;
use profilesync_infra::{FirestoreClient, InfraConfig, SessionToken, StorageClient};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOC_PATH: &str = "/v1/projects/test-project/databases/(default)/documents/users/uid-123";

fn documents_for(server: &MockServer) -> FirestoreClient {
    let token = SessionToken::new();
    token.set("session-token");
    let config = InfraConfig::for_endpoint(&server.uri());
    FirestoreClient::new(&config, token).unwrap()
}

fn assets_for(server: &MockServer) -> StorageClient {
    let token = SessionToken::new();
    token.set("session-token");
    let config = InfraConfig::for_endpoint(&server.uri());
    StorageClient::new(&config, token).unwrap()
}

#[tokio::test]
async fn merge_write_masks_exactly_the_present_keys() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(DOC_PATH))
        .and(query_param("updateMask.fieldPaths", "faculty"))
        .and(body_partial_json(json!({
            "fields": {
                "faculty": { "stringValue": "Mathematics" },
                "program": { "stringValue": "Statistics" },
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let documents = documents_for(&server);
    documents
        .merge_write(
            "users",
            "uid-123",
            &json!({ "faculty": "Mathematics", "program": "Statistics" }),
        )
        .await
        .unwrap();

    // Both edited keys are masked; untouched keys must be absent.
    let requests = server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap_or_default();
    assert!(query.contains("updateMask.fieldPaths=program"));
    assert!(!query.contains("coop"));
    assert!(!query.contains("gradTerm"));
}

#[tokio::test]
async fn merge_write_encodes_cleared_and_numeric_values() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(DOC_PATH))
        .and(body_partial_json(json!({
            "fields": {
                "gradTerm": { "stringValue": "" },
                "gradYear": { "nullValue": null },
                "coop": { "stringValue": "no" },
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let documents = documents_for(&server);
    documents
        .merge_write(
            "users",
            "uid-123",
            &json!({ "gradTerm": "", "gradYear": null, "coop": "no" }),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn empty_partial_issues_no_request() {
    let server = MockServer::start().await;
    let documents = documents_for(&server);

    documents.merge_write("users", "uid-123", &json!({})).await.unwrap();
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn read_decodes_the_stored_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DOC_PATH))
        .and(header("Authorization", "Bearer session-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/test-project/databases/(default)/documents/users/uid-123",
            "fields": {
                "faculty": { "stringValue": "Mathematics" },
                "gradYear": { "integerValue": "2027" },
                "coop": { "stringValue": "yes" },
            }
        })))
        .mount(&server)
        .await;

    let documents = documents_for(&server);
    let doc = documents.read("users", "uid-123").await.unwrap().unwrap();

    assert_eq!(doc["faculty"], json!("Mathematics"));
    assert_eq!(doc["gradYear"], json!(2027));
}

#[tokio::test]
async fn missing_document_reads_as_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DOC_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": 404, "status": "NOT_FOUND" }
        })))
        .mount(&server)
        .await;

    let documents = documents_for(&server);
    assert!(documents.read("users", "uid-123").await.unwrap().is_none());
}

#[tokio::test]
async fn server_errors_surface_as_remote_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(DOC_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let documents = documents_for(&server);
    let err = documents
        .merge_write("users", "uid-123", &json!({ "faculty": "Arts" }))
        .await
        .unwrap_err();
    assert!(matches!(err, ProfileSyncError::RemoteUnavailable(_)));
}

#[tokio::test]
async fn a_transient_server_error_is_retried_once_within_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DOC_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DOC_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "fields": { "faculty": { "stringValue": "Science" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = SessionToken::new();
    token.set("session-token");
    let mut config = InfraConfig::for_endpoint(&server.uri());
    config.http_max_attempts = 2;
    let documents = FirestoreClient::new(&config, token).unwrap();

    let doc = documents.read("users", "uid-123").await.unwrap().unwrap();
    assert_eq!(doc["faculty"], json!("Science"));
}

#[tokio::test]
async fn upload_returns_a_tokened_media_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v0/b/test-bucket/o"))
        .and(query_param("uploadType", "media"))
        .and(query_param("name", "avatars/uid-123/1_me.png"))
        .and(header("Content-Type", "image/png"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "avatars/uid-123/1_me.png",
            "downloadTokens": "tok-1",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let assets = assets_for(&server);
    let url = assets
        .upload("avatars/uid-123/1_me.png", "image/png", vec![0u8; 16])
        .await
        .unwrap();

    assert_eq!(
        url,
        format!(
            "{}/v0/b/test-bucket/o/avatars%2Fuid-123%2F1_me.png?alt=media&token=tok-1",
            server.uri()
        )
    );
}

#[tokio::test]
async fn upload_failure_maps_to_upload_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v0/b/test-bucket/o"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "message": "Permission denied." }
        })))
        .mount(&server)
        .await;

    let assets = assets_for(&server);
    let err = assets.upload("avatars/uid-123/1_me.png", "image/png", vec![1]).await.unwrap_err();
    assert_eq!(err, ProfileSyncError::UploadFailed("Permission denied.".into()));
}
