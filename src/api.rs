//! Client for the project and data-management endpoints.
//!
//! Every call obtains a token from the [`TokenCache`] first, so an expiring
//! credential is refreshed transparently between requests.

use crate::auth::{AuthClient, AuthError};
use crate::configuration::Configuration;
use crate::http_utils::{ApiError, HttpClient, HttpRequestConfig};
use crate::model::{FolderContents, FolderNode, ProjectInfo, ProjectResponse, TopFoldersResponse};
use crate::token_cache::{Clock, TokenCache};
use std::sync::Arc;
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Authentication(#[from] AuthError),
    #[error("{0}")]
    Request(#[from] ApiError),
}

pub struct DataManagementClient {
    http: HttpClient,
    tokens: TokenCache,
    hub_id: String,
}

impl DataManagementClient {
    pub fn new(http: HttpClient, tokens: TokenCache, hub_id: impl Into<String>) -> Self {
        Self {
            http,
            tokens,
            hub_id: hub_id.into(),
        }
    }

    pub fn from_configuration(
        configuration: &Configuration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ClientError> {
        let http = HttpClient::new(HttpRequestConfig::from_configuration(configuration))?;
        let mut tokens = TokenCache::new(AuthClient::from_configuration(configuration), clock);
        if let Some(token) = configuration.access_token() {
            trace!("Using pre-supplied access token");
            tokens = tokens.with_access_token(token, configuration.token_lifetime());
        }
        Ok(Self::new(http, tokens, configuration.hub_id()))
    }

    /// GET the path made of `segments`; each segment is percent-encoded.
    async fn get<T>(&mut self, segments: &[&str]) -> Result<T, ClientError>
    where
        T: serde::de::DeserializeOwned,
    {
        let credential = self.tokens.get_valid_token(&self.http).await?;
        Ok(self.http.get(segments, &credential.token).await?)
    }

    pub async fn get_project(&mut self, project_id: &str) -> Result<ProjectInfo, ClientError> {
        trace!("Fetching project {}...", project_id);
        let hub_id = self.hub_id.clone();
        let response: ProjectResponse = self
            .get(&["project", "v1", "hubs", hub_id.as_str(), "projects", project_id])
            .await?;
        Ok(response.data)
    }

    pub async fn get_top_folders(&mut self, project_id: &str) -> Result<Vec<FolderNode>, ClientError> {
        trace!("Fetching top folders of project {}...", project_id);
        let hub_id = self.hub_id.clone();
        let response: TopFoldersResponse = self
            .get(&["project", "v1", "hubs", hub_id.as_str(), "projects", project_id, "topFolders"])
            .await?;
        Ok(response.data)
    }

    pub async fn get_folder_contents(
        &mut self,
        project_id: &str,
        folder_id: &str,
    ) -> Result<FolderContents, ClientError> {
        trace!("Fetching contents of folder {} in project {}...", folder_id, project_id);
        self.get(&["data", "v1", "projects", project_id, "folders", folder_id, "contents"])
            .await
    }
}
