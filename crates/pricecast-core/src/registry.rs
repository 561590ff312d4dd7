//! Client for the remote model registry.
//!
//! Only the read side is used: list the versions of a registered model and
//! download one version's artifact to local storage.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::artifact::ARTIFACT_FILE_NAME;
use crate::error::RegistryError;
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, HttpResponse};

const DETAILS_PATH: &str = "/api/rest/v2/registry-model/details";
const DOWNLOAD_PATH: &str = "/api/rest/v2/registry-model/item/download";

/// One registered version of a model, in the order the registry lists them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelVersion {
    pub version: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub stages: Vec<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl ModelVersion {
    /// Case-insensitive status match: `"Production"` matches `"production"`.
    pub fn has_status(&self, status: &str) -> bool {
        self.status
            .as_deref()
            .is_some_and(|own| own.eq_ignore_ascii_case(status))
    }
}

#[derive(Debug, Deserialize)]
struct RegistryModelDetails {
    #[serde(default)]
    versions: Vec<ModelVersion>,
}

#[derive(Clone)]
pub struct RegistryClient {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    auth: HttpAuth,
    timeout_ms: u64,
}

impl std::fmt::Debug for RegistryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryClient")
            .field("base_url", &self.base_url)
            .field("auth", &self.auth)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

impl RegistryClient {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            auth: HttpAuth::BearerToken(api_key.into()),
            timeout_ms: crate::config::DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// All versions of `model`, in registry order.
    pub async fn get_model_versions(
        &self,
        workspace: &str,
        model: &str,
    ) -> Result<Vec<ModelVersion>, RegistryError> {
        let url = format!(
            "{}{DETAILS_PATH}?workspaceName={}&modelName={}",
            self.base_url,
            urlencoding::encode(workspace),
            urlencoding::encode(model),
        );

        let response = self.get(&url, workspace, model).await?;
        let details: RegistryModelDetails = serde_json::from_str(&response.body)?;
        debug!(
            workspace,
            model,
            count = details.versions.len(),
            "listed registry versions"
        );
        Ok(details.versions)
    }

    /// Versions of `model` whose status equals `status`, registry order kept.
    pub async fn find_versions(
        &self,
        workspace: &str,
        model: &str,
        status: &str,
    ) -> Result<Vec<ModelVersion>, RegistryError> {
        let versions = self.get_model_versions(workspace, model).await?;
        Ok(versions
            .into_iter()
            .filter(|version| version.has_status(status))
            .collect())
    }

    /// Downloads one version's artifact into `output_dir` and returns its path.
    pub async fn download_registry_model(
        &self,
        workspace: &str,
        model: &str,
        version: &str,
        output_dir: &Path,
    ) -> Result<PathBuf, RegistryError> {
        let url = format!(
            "{}{DOWNLOAD_PATH}?workspaceName={}&modelName={}&version={}",
            self.base_url,
            urlencoding::encode(workspace),
            urlencoding::encode(model),
            urlencoding::encode(version),
        );

        let response = self.get(&url, workspace, model).await?;

        let path = output_dir.join(ARTIFACT_FILE_NAME);
        std::fs::create_dir_all(output_dir)
            .and_then(|_| std::fs::write(&path, response.body.as_bytes()))
            .map_err(|source| RegistryError::Write {
                path: path.clone(),
                source,
            })?;

        info!(
            workspace,
            model,
            version,
            path = %path.display(),
            bytes = response.body.len(),
            "downloaded model artifact"
        );
        Ok(path)
    }

    async fn get(
        &self,
        url: &str,
        workspace: &str,
        model: &str,
    ) -> Result<HttpResponse, RegistryError> {
        let request = HttpRequest::get(url)
            .with_auth(&self.auth)
            .with_header("accept", "application/json")
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await?;
        match response.status {
            _ if response.is_success() => Ok(response),
            401 | 403 => Err(RegistryError::Unauthorized {
                status: response.status,
            }),
            404 => Err(RegistryError::ModelNotFound {
                workspace: workspace.to_owned(),
                model: model.to_owned(),
            }),
            status => Err(RegistryError::Status {
                status,
                body: response.body,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::http_client::{HttpError, ScriptedHttpClient};

    const BASE: &str = "https://registry.test";

    fn details_url() -> String {
        format!("{BASE}{DETAILS_PATH}")
    }

    fn client_with(http: ScriptedHttpClient) -> (RegistryClient, Arc<ScriptedHttpClient>) {
        let http = Arc::new(http);
        let client = RegistryClient::new(http.clone(), format!("{BASE}/"), "key-1");
        (client, http)
    }

    #[tokio::test]
    async fn find_versions_filters_by_status_in_registry_order() {
        let body = r#"{"versions":[
            {"version":"1.0.0","status":"Staging"},
            {"version":"1.1.0","status":"Production"},
            {"version":"1.2.0","status":"production"}
        ]}"#;
        let (client, _) = client_with(
            ScriptedHttpClient::new().route(details_url(), HttpResponse::ok_json(body)),
        );

        let versions = client
            .find_versions("paulescu", "linear-model", "production")
            .await
            .expect("listing succeeds");

        let names: Vec<&str> = versions.iter().map(|v| v.version.as_str()).collect();
        assert_eq!(names, vec!["1.1.0", "1.2.0"]);
    }

    #[tokio::test]
    async fn requests_carry_bearer_key_and_encoded_query() {
        let (client, http) = client_with(
            ScriptedHttpClient::new().route(details_url(), HttpResponse::ok_json("{}")),
        );

        let versions = client
            .get_model_versions("my team", "linear-model")
            .await
            .expect("empty listing");
        assert!(versions.is_empty());

        let sent = http.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].url.contains("workspaceName=my%20team"));
        assert_eq!(
            sent[0].headers.get("authorization").map(String::as_str),
            Some("Bearer key-1")
        );
    }

    #[tokio::test]
    async fn unauthorized_status_is_classified() {
        let (client, _) = client_with(
            ScriptedHttpClient::new().route(details_url(), HttpResponse::with_status(401, "")),
        );

        let error = client
            .get_model_versions("paulescu", "linear-model")
            .await
            .expect_err("bad key");
        assert!(matches!(error, RegistryError::Unauthorized { status: 401 }));
    }

    #[tokio::test]
    async fn transport_failure_surfaces_as_transport_error() {
        let (client, _) = client_with(
            ScriptedHttpClient::new().fail(details_url(), HttpError::timeout("request timeout")),
        );

        let error = client
            .get_model_versions("paulescu", "linear-model")
            .await
            .expect_err("timeout");
        assert!(matches!(error, RegistryError::Transport(ref e) if e.timed_out()));
    }

    #[tokio::test]
    async fn download_writes_artifact_file() {
        let dir = tempdir().expect("tempdir");
        let (client, http) = client_with(ScriptedHttpClient::new().route(
            format!("{BASE}{DOWNLOAD_PATH}"),
            HttpResponse::ok_json("{\"artifact\":true}"),
        ));

        let path = client
            .download_registry_model("paulescu", "linear-model", "1.1.0", dir.path())
            .await
            .expect("download");

        assert_eq!(path, dir.path().join(ARTIFACT_FILE_NAME));
        assert_eq!(
            std::fs::read_to_string(&path).expect("read back"),
            "{\"artifact\":true}"
        );
        assert!(http.sent()[0].url.ends_with("version=1.1.0"));
    }
}
