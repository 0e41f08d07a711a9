//! End-to-end scenarios driving the axum `Router` in-process via
//! `tower::ServiceExt::oneshot`, without binding a real socket — the
//! literal scenarios from the spec's testable-properties section.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use secsend_crypto::envelope::{sign_key, verify_key};
use secsend_crypto::{Key, RootId};
use secsend_protocol::metadata::ALGO;
use secsend_protocol::wire::{ConfigResponse, EmptyResponse, MetadataResponse, UploadNewResponse};
use secsend_protocol::EncryptedFileMetadata;
use secsend_relay::config::RelayConfig;
use secsend_relay::error::ServerError;
use secsend_relay::handlers::upload::create_with_retry;
use secsend_relay::routes::build_router;
use secsend_relay::state::AppState;
use secsend_store::ObjectStore;

fn sample_envelope(timeout_s: u64) -> EncryptedFileMetadata {
    EncryptedFileMetadata {
        name: b"ENCRYPTED_NAME".to_vec(),
        mime_type: b"ENCRYPTED_MIME_TYPE".to_vec(),
        iv: vec![0u8; 12],
        chunk_size: b"ENCRYPTED_CHUNK_SIZE".to_vec(),
        key_sign: vec![],
        timeout_s,
        timeout_ts: 0.0,
        complete: false,
        algo: ALGO.to_string(),
        version: 1,
    }
}

fn test_state(tmp: &tempfile::TempDir, timeout_s_valid: Vec<u64>, filesize_limit: u64) -> AppState {
    let config = RelayConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        backend_files_root: tmp.path().to_string_lossy().into_owned(),
        timeout_s_valid,
        filesize_limit,
        html_root: None,
    };
    AppState::new(ObjectStore::new(tmp.path()), config)
}

async fn post_json(app: &axum::Router, uri: &str, body: &EncryptedFileMetadata) -> axum::http::Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn post_bytes(app: &axum::Router, uri: &str, bytes: &[u8]) -> axum::http::Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::from(bytes.to_vec()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn get(app: &axum::Router, uri: &str) -> axum::http::Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::http::Response<Body>) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::http::Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

#[tokio::test]
async fn scenario_round_trip_tiny_file() {
    let tmp = tempfile::tempdir().unwrap();
    let app = build_router(test_state(&tmp, vec![0], 0));

    let envelope = sample_envelope(0);
    let resp = post_json(&app, "/v1/upload/new", &envelope).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created: UploadNewResponse = body_json(resp).await;
    let root_id = RootId::parse(&created.root_id).unwrap();
    let file_id = root_id.file_id();

    let resp = post_bytes(&app, &format!("/v1/upload/push/{}", created.root_id), b"hell").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = post_bytes(&app, &format!("/v1/upload/push/{}", created.root_id), b"o world!").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = post_bytes(&app, &format!("/v1/upload/finish/{}", created.root_id), b"").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = get(&app, &format!("/v1/metadata/{}", file_id.render())).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let meta: MetadataResponse = body_json(resp).await;
    assert_eq!(meta.size, 12);
    assert!(meta.metadata.complete);
    assert_eq!(meta.metadata.name, envelope.name);
    assert_eq!(meta.metadata.mime_type, envelope.mime_type);
    assert_eq!(meta.metadata.chunk_size, envelope.chunk_size);

    let resp = get(&app, &format!("/v1/download/{}", file_id.render())).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await, b"hello world!".to_vec());

    // a file-id is not an authenticated delete capability
    let resp = post_bytes(&app, &format!("/v1/delete/{}", file_id.render()), b"").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = post_bytes(&app, &format!("/v1/delete/{}", created.root_id), b"").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let _: EmptyResponse = body_json(resp).await;

    let resp = get(&app, &format!("/v1/download/{}", file_id.render())).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn scenario_timeout_expires_after_finish() {
    let tmp = tempfile::tempdir().unwrap();
    let app = build_router(test_state(&tmp, vec![0, 1], 0));

    let envelope = sample_envelope(1);
    let resp = post_json(&app, "/v1/upload/new", &envelope).await;
    let created: UploadNewResponse = body_json(resp).await;
    let root_id = RootId::parse(&created.root_id).unwrap();
    let file_id = root_id.file_id();

    post_bytes(&app, &format!("/v1/upload/push/{}", created.root_id), b"data").await;
    tokio::time::sleep(std::time::Duration::from_secs(2)).await;
    let resp = post_bytes(&app, &format!("/v1/upload/finish/{}", created.root_id), b"").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = get(&app, &format!("/v1/download/{}", file_id.render())).await;
    assert_eq!(resp.status(), StatusCode::OK);

    tokio::time::sleep(std::time::Duration::from_secs(2)).await;
    let resp = get(&app, &format!("/v1/download/{}", file_id.render())).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn scenario_invalid_timeout_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let app = build_router(test_state(&tmp, vec![0, 1], 0));

    let envelope = sample_envelope(4);
    let resp = post_json(&app, "/v1/upload/new", &envelope).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn scenario_size_limit_exceeded() {
    let tmp = tempfile::tempdir().unwrap();
    let app = build_router(test_state(&tmp, vec![0], 1024));

    let envelope = sample_envelope(0);
    let resp = post_json(&app, "/v1/upload/new", &envelope).await;
    let created: UploadNewResponse = body_json(resp).await;

    let resp = post_bytes(&app, &format!("/v1/upload/push/{}", created.root_id), &vec![b'A'; 4]).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = post_bytes(&app, &format!("/v1/upload/push/{}", created.root_id), &vec![b'A'; 1020]).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = post_bytes(&app, &format!("/v1/upload/finish/{}", created.root_id), b"").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn scenario_range_download_resumes_at_offset() {
    let tmp = tempfile::tempdir().unwrap();
    let app = build_router(test_state(&tmp, vec![0], 0));

    let envelope = sample_envelope(0);
    let resp = post_json(&app, "/v1/upload/new", &envelope).await;
    let created: UploadNewResponse = body_json(resp).await;
    let root_id = RootId::parse(&created.root_id).unwrap();
    let file_id = root_id.file_id();

    post_bytes(&app, &format!("/v1/upload/push/{}", created.root_id), b"0123456789").await;
    post_bytes(&app, &format!("/v1/upload/finish/{}", created.root_id), b"").await;

    let request = Request::builder()
        .uri(format!("/v1/download/{}", file_id.render()))
        .header("range", "bytes=5-")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(body_bytes(resp).await, b"56789".to_vec());
}

#[tokio::test]
async fn scenario_config_advertises_server_limits() {
    let tmp = tempfile::tempdir().unwrap();
    let app = build_router(test_state(&tmp, vec![0, 3600], 4096));

    let resp = get(&app, "/v1/config").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cfg: ConfigResponse = body_json(resp).await;
    assert_eq!(cfg.timeout_s_valid, vec![0, 3600]);
    assert_eq!(cfg.filesize_limit, 4096);
}

#[tokio::test]
async fn push_while_locked_is_rejected() {
    use secsend_store::ObjectStore as Store;

    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(&tmp, vec![0], 0);
    let app = build_router(state.clone());

    let envelope = sample_envelope(0);
    let resp = post_json(&app, "/v1/upload/new", &envelope).await;
    let created: UploadNewResponse = body_json(resp).await;
    let root_id = RootId::parse(&created.root_id).unwrap();
    let file_id = root_id.file_id();

    let store: Store = Store::new(tmp.path());
    let handle = store.open(file_id);
    let _lock = handle.lock_write().await.unwrap();

    let resp = post_bytes(&app, &format!("/v1/upload/push/{}", created.root_id), b"x").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

/// spec.md scenario 5: `upload/new` gives up after exhausting its retry
/// budget. A real root-id collision is a 2^80 coincidence, so this drives
/// the retry loop directly via `create_with_retry` with an id source that
/// always returns the same already-taken id, the same way the original
/// scenario monkey-patches `ID_LEN=1` down to a 256-id space to force it.
#[tokio::test]
async fn scenario_id_exhaustion_after_eight_collisions() {
    let tmp = tempfile::tempdir().unwrap();
    let store = ObjectStore::new(tmp.path());
    let envelope = sample_envelope(0);

    let taken = RootId::generate();
    store.create(taken.file_id(), &envelope).await.unwrap();

    let err = create_with_retry(&store, &envelope, move || taken).await.unwrap_err();
    assert!(matches!(err, ServerError::IdUnavailable));
}

/// spec.md scenario 6: a recipient detects a wrong key via the key-proof
/// carried in the (still server-opaque) metadata envelope, before ever
/// requesting ciphertext. The relay cannot itself reject a wrong key — it
/// never sees one — so this exercises the real `/v1/metadata` response and
/// then the client-side check `commands/receive.rs` performs on it.
#[tokio::test]
async fn scenario_wrong_key_fails_verification_before_download() {
    let tmp = tempfile::tempdir().unwrap();
    let app = build_router(test_state(&tmp, vec![0], 0));

    let key = Key::generate();
    let iv = [4u8; 12];
    let key_sign = sign_key(&key, &iv);
    let mut envelope = sample_envelope(0);
    envelope.iv = iv.to_vec();
    envelope.key_sign = key_sign.to_vec();

    let resp = post_json(&app, "/v1/upload/new", &envelope).await;
    let created: UploadNewResponse = body_json(resp).await;
    let root_id = RootId::parse(&created.root_id).unwrap();
    let file_id = root_id.file_id();

    post_bytes(&app, &format!("/v1/upload/push/{}", created.root_id), b"secret data").await;
    post_bytes(&app, &format!("/v1/upload/finish/{}", created.root_id), b"").await;

    let resp = get(&app, &format!("/v1/metadata/{}", file_id.render())).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let meta: MetadataResponse = body_json(resp).await;

    let stored_iv: [u8; 12] = meta.metadata.iv.as_slice().try_into().unwrap();
    let stored_sign: [u8; 32] = meta.metadata.key_sign.as_slice().try_into().unwrap();
    assert!(verify_key(&stored_sign, &key, &stored_iv));

    // The recipient holds the wrong key: verification must fail before any
    // `/v1/download` request is made, matching `InvalidKey`'s contract that
    // no ciphertext is consumed on a failed key-proof.
    let wrong_key = Key::generate();
    assert!(!verify_key(&stored_sign, &wrong_key, &stored_iv));
}
