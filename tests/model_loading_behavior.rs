//! Behavior-driven tests for startup model loading
//!
//! These tests verify HOW the loader picks a model version from the registry,
//! downloads it, and fails when it cannot produce a model to serve.

use pricecast_core::{
    config::API_KEY_SECRET, FeatureRecord, HttpError, HttpResponse, LoadError, ModelArtifact,
    ModelLoader, Predictor, RegistryClient, RegistryError, ScriptedHttpClient, SecretsDirProvider,
    ServiceConfig, FEATURE_COUNT, FIELD_NAMES,
};
use std::sync::Arc;
use tempfile::tempdir;

const BASE: &str = "https://registry.test";
const DETAILS: &str = "https://registry.test/api/rest/v2/registry-model/details";
const DOWNLOAD: &str = "https://registry.test/api/rest/v2/registry-model/item/download";

fn persistence_artifact() -> String {
    let mut coefficients = vec![0.0; FEATURE_COUNT];
    coefficients[FEATURE_COUNT - 1] = 1.0;
    ModelArtifact::linear(FIELD_NAMES, coefficients, 0.0)
        .to_json()
        .expect("artifact serializes")
}

fn loader_for(http: Arc<ScriptedHttpClient>, artifact_dir: &std::path::Path) -> ModelLoader {
    let registry = RegistryClient::new(http, BASE, "test-key");
    ModelLoader::new(registry, "paulescu", "linear-model", artifact_dir)
}

fn download_requests(http: &ScriptedHttpClient) -> usize {
    http.sent()
        .iter()
        .filter(|request| request.url.starts_with(DOWNLOAD))
        .count()
}

// =============================================================================
// Version selection
// =============================================================================

#[tokio::test]
async fn when_no_production_version_exists_loader_fails_without_downloading() {
    // Given: A registry whose versions are all staging or untagged
    let http = Arc::new(ScriptedHttpClient::new().route(
        DETAILS,
        HttpResponse::ok_json(
            r#"{"versions":[{"version":"1.0.0","status":"Staging"},{"version":"0.9.0"}]}"#,
        ),
    ));
    let dir = tempdir().expect("tempdir");
    let loader = loader_for(http.clone(), dir.path());

    // When: The model is loaded
    let error = loader.load().await.expect_err("no production model");

    // Then: The failure names the model and nothing is downloaded or written
    assert!(matches!(
        error,
        LoadError::NoProductionVersion { ref workspace, ref model }
            if workspace == "paulescu" && model == "linear-model"
    ));
    assert_eq!(download_requests(&http), 0);
    assert!(!dir.path().join("model.json").exists());
}

#[tokio::test]
async fn when_one_production_version_exists_loader_downloads_and_deserializes_it() {
    // Given: A registry with exactly one production version
    let http = Arc::new(
        ScriptedHttpClient::new()
            .route(
                DETAILS,
                HttpResponse::ok_json(
                    r#"{"versions":[{"version":"1.0.0","status":"Archived"},{"version":"1.1.0","status":"Production"}]}"#,
                ),
            )
            .route(DOWNLOAD, HttpResponse::ok_json(persistence_artifact())),
    );
    let dir = tempdir().expect("tempdir");
    let loader = loader_for(http.clone(), dir.path());

    // When: The model is loaded
    let loaded = loader.load().await.expect("model loads");

    // Then: That version is downloaded to local storage and ready to predict
    assert_eq!(loaded.version.version, "1.1.0");
    assert_eq!(loaded.artifact_path, dir.path().join("model.json"));
    assert!(loaded.artifact_path.exists());
    assert_eq!(loaded.predictor.feature_names().len(), FEATURE_COUNT);

    let download = http
        .sent()
        .into_iter()
        .find(|request| request.url.starts_with(DOWNLOAD))
        .expect("download issued");
    assert!(download.url.contains("version=1.1.0"));
}

#[tokio::test]
async fn when_several_production_versions_exist_loader_takes_the_first_listed() {
    // Given: A registry that lists two production versions
    let http = Arc::new(ScriptedHttpClient::new().route(
        DETAILS,
        HttpResponse::ok_json(
            r#"{"versions":[{"version":"2.0.0","status":"Production"},{"version":"1.0.0","status":"Production"}]}"#,
        ),
    ));
    let dir = tempdir().expect("tempdir");
    let loader = loader_for(http, dir.path());

    // When: The production version is selected
    let version = loader
        .select_production_version()
        .await
        .expect("selection succeeds");

    // Then: Registry order decides
    assert_eq!(version.version, "2.0.0");
}

// =============================================================================
// Startup failures
// =============================================================================

#[tokio::test]
async fn when_registry_does_not_know_the_model_user_sees_model_not_found() {
    // Given: A registry that returns 404 for the model details
    let http = Arc::new(
        ScriptedHttpClient::new().route(DETAILS, HttpResponse::with_status(404, "")),
    );
    let dir = tempdir().expect("tempdir");
    let loader = loader_for(http, dir.path());

    // When: The model is loaded
    let error = loader.load().await.expect_err("unknown model");

    // Then: The registry error says which model was missing
    assert!(matches!(
        error,
        LoadError::Registry(RegistryError::ModelNotFound { ref model, .. }) if model == "linear-model"
    ));
}

#[tokio::test]
async fn when_registry_is_unreachable_startup_fails_with_transport_error() {
    // Given: A registry connection that fails
    let http = Arc::new(
        ScriptedHttpClient::new().fail(DETAILS, HttpError::new("connection failed: refused")),
    );
    let dir = tempdir().expect("tempdir");
    let loader = loader_for(http, dir.path());

    // When / Then: Loading fails with the transport error
    let error = loader.load().await.expect_err("unreachable");
    assert!(matches!(error, LoadError::Registry(RegistryError::Transport(_))));
}

#[tokio::test]
async fn when_downloaded_artifact_is_corrupt_startup_fails() {
    // Given: A production version whose artifact is not a model document
    let http = Arc::new(
        ScriptedHttpClient::new()
            .route(
                DETAILS,
                HttpResponse::ok_json(r#"{"versions":[{"version":"1.0.0","status":"Production"}]}"#),
            )
            .route(DOWNLOAD, HttpResponse::ok_json("not json")),
    );
    let dir = tempdir().expect("tempdir");
    let loader = loader_for(http, dir.path());

    // When / Then: Deserialization fails and startup aborts
    let error = loader.load().await.expect_err("corrupt artifact");
    assert!(matches!(error, LoadError::Artifact(_)));
}

// =============================================================================
// Credentials
// =============================================================================

#[tokio::test]
async fn when_secrets_directory_is_mounted_its_key_authenticates_registry_calls() {
    // Given: A mounted secrets directory holding the registry key
    let secrets = tempdir().expect("tempdir");
    std::fs::write(secrets.path().join(API_KEY_SECRET), "mounted-key\n").expect("write secret");
    let artifacts = tempdir().expect("tempdir");

    let config = ServiceConfig {
        registry_url: String::from(BASE),
        artifact_dir: artifacts.path().to_path_buf(),
        secrets_dir: secrets.path().to_path_buf(),
        ..ServiceConfig::default()
    };
    let http = Arc::new(
        ScriptedHttpClient::new()
            .route(
                DETAILS,
                HttpResponse::ok_json(r#"{"versions":[{"version":"1.0.0","status":"Production"}]}"#),
            )
            .route(DOWNLOAD, HttpResponse::ok_json(persistence_artifact())),
    );

    // When: The loader is wired from config and runs
    let provider = SecretsDirProvider::new(&config.secrets_dir);
    let loader = ModelLoader::from_config(&config, http.clone(), &provider).expect("wired");
    let loaded = loader.load().await.expect("model loads");

    // Then: Every registry call carries the mounted key
    let frame = FeatureRecord::from_values([5.0; FEATURE_COUNT])
        .expect("finite")
        .to_frame();
    assert_eq!(loaded.predictor.predict(&frame).expect("predict"), vec![5.0]);
    for request in http.sent() {
        assert_eq!(
            request.headers.get("authorization").map(String::as_str),
            Some("Bearer mounted-key")
        );
    }
}

#[tokio::test]
async fn when_timeout_is_configured_every_registry_call_carries_it() {
    // Given: A config with a non-default registry timeout
    let secrets = tempdir().expect("tempdir");
    std::fs::write(secrets.path().join(API_KEY_SECRET), "mounted-key").expect("write secret");
    let artifacts = tempdir().expect("tempdir");

    let config = ServiceConfig {
        registry_url: String::from(BASE),
        artifact_dir: artifacts.path().to_path_buf(),
        secrets_dir: secrets.path().to_path_buf(),
        timeout_ms: 1234,
        ..ServiceConfig::default()
    };
    let http = Arc::new(
        ScriptedHttpClient::new()
            .route(
                DETAILS,
                HttpResponse::ok_json(r#"{"versions":[{"version":"1.0.0","status":"Production"}]}"#),
            )
            .route(DOWNLOAD, HttpResponse::ok_json(persistence_artifact())),
    );

    // When: The loader is wired from config and runs
    let provider = SecretsDirProvider::new(&config.secrets_dir);
    let loader = ModelLoader::from_config(&config, http.clone(), &provider).expect("wired");
    loader.load().await.expect("model loads");

    // Then: Both the details lookup and the download use the configured timeout
    let sent = http.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(download_requests(&http), 1);
    for request in sent {
        assert_eq!(request.timeout_ms, 1234);
    }
}
