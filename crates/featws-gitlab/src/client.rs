//! GitLab v4 REST client

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::{Error, Result};
use crate::models::{
    Commit, CommitAction, CommitRequest, Namespace, Pipeline, Project, RepositoryFile,
};

/// Async client for the subset of the GitLab API the service uses
///
/// One instance is shared process-wide; `reqwest::Client` is cheap to
/// clone and pools connections internally.
#[derive(Debug, Clone)]
pub struct GitlabClient {
    http: reqwest::Client,
    base_url: String,
}

impl GitlabClient {
    /// Build a client for the given GitLab host
    ///
    /// # Arguments
    ///
    /// * `base_url` - Host URL, e.g. `https://gitlab.example.com`
    /// * `token` - Private token sent as `PRIVATE-TOKEN` on every request
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value or the
    /// underlying HTTP client cannot be constructed.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut token_value = HeaderValue::from_str(token)?;
        token_value.set_sensitive(true);
        headers.insert("PRIVATE-TOKEN", token_value);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v4/{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: Response, resource: &str) -> Result<T> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                resource: resource.to_string(),
            });
        }
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.json().await?)
    }

    /// Fetch a namespace by its name or full path
    pub async fn get_namespace(&self, name: &str) -> Result<Namespace> {
        let url = self.api_url(&format!("namespaces/{}", urlencoding::encode(name)));
        let response = self.http.get(url).send().await?;
        Self::decode(response, &format!("namespace {name}")).await
    }

    /// Fetch a project by its `namespace/path` identifier
    pub async fn get_project(&self, path_with_namespace: &str) -> Result<Project> {
        let url = self.api_url(&format!(
            "projects/{}",
            urlencoding::encode(path_with_namespace)
        ));
        let response = self.http.get(url).send().await?;
        Self::decode(response, &format!("project {path_with_namespace}")).await
    }

    /// Create a project under the given namespace
    pub async fn create_project(&self, name: &str, namespace_id: u64) -> Result<Project> {
        let response = self
            .http
            .post(self.api_url("projects"))
            .json(&json!({ "name": name, "namespace_id": namespace_id }))
            .send()
            .await?;
        Self::decode(response, &format!("project {name}")).await
    }

    /// Read a repository file, decoding its base64 content
    ///
    /// Absence is reported as the distinguishable [`Error::NotFound`];
    /// callers that tolerate missing files use [`read_string`].
    ///
    /// [`read_string`]: GitlabClient::read_string
    pub async fn get_file(&self, project: &Project, reference: &str, path: &str) -> Result<String> {
        let url = self.api_url(&format!(
            "projects/{}/repository/files/{}",
            project.id,
            urlencoding::encode(path)
        ));
        let response = self
            .http
            .get(url)
            .query(&[("ref", reference)])
            .send()
            .await?;
        let file: RepositoryFile = Self::decode(response, &format!("file {path}")).await?;

        tracing::trace!(path = %file.file_path, "fetched repository file");
        let bytes = BASE64.decode(file.content.trim())?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Read a repository file, returning an empty string when it is absent
    ///
    /// Used on paths where absence is legal (VERSION bootstrap, optional
    /// rule files). Any error other than not-found still fails.
    pub async fn read_string(
        &self,
        project: &Project,
        reference: &str,
        path: &str,
    ) -> Result<String> {
        match self.get_file(project, reference, path).await {
            Ok(content) => Ok(content),
            Err(e) if e.is_not_found() => Ok(String::new()),
            Err(e) => Err(e),
        }
    }

    /// Plan a create-or-update action for one file
    ///
    /// Probes the file on the given reference: absent means `create`,
    /// present means `update`. Any other fetch error fails the plan.
    pub async fn plan_create_or_update(
        &self,
        project: &Project,
        reference: &str,
        path: &str,
        content: impl Into<String>,
    ) -> Result<CommitAction> {
        match self.get_file(project, reference, path).await {
            Ok(_) => Ok(CommitAction::update(path, content)),
            Err(e) if e.is_not_found() => Ok(CommitAction::create(path, content)),
            Err(e) => Err(e),
        }
    }

    /// Emit one commit containing all of the given file actions
    pub async fn create_commit(
        &self,
        project: &Project,
        branch: &str,
        message: &str,
        actions: &[CommitAction],
    ) -> Result<Commit> {
        let body = CommitRequest {
            branch,
            commit_message: message,
            actions,
        };
        let response = self
            .http
            .post(self.api_url(&format!("projects/{}/repository/commits", project.id)))
            .json(&body)
            .send()
            .await?;

        let commit: Commit =
            Self::decode(response, &format!("commit on {}", project.path_with_namespace)).await?;
        tracing::debug!(
            project = %project.path_with_namespace,
            commit = %commit.short_id,
            files = actions.len(),
            "created commit"
        );
        Ok(commit)
    }

    /// Fetch the most recent pipeline of a project, if any
    pub async fn latest_pipeline(&self, project: &Project) -> Result<Option<Pipeline>> {
        let response = self
            .http
            .get(self.api_url(&format!("projects/{}/pipelines", project.id)))
            .query(&[("per_page", "1")])
            .send()
            .await?;
        let pipelines: Vec<Pipeline> =
            Self::decode(response, &format!("pipelines of project {}", project.id)).await?;
        Ok(pipelines.into_iter().next())
    }

    /// Probe host reachability for readiness checks
    ///
    /// Any HTTP response counts as reachable; only transport failures
    /// surface as errors.
    pub async fn ping(&self) -> Result<()> {
        self.http.get(self.api_url("version")).send().await?;
        Ok(())
    }
}
